// rc522/src/device/crc.rs
//! CRC_A through the chip's coprocessor.

use crate::device::handle::{Device, Initialized};
use crate::device::registers::{irq, PcdCommand, Register, FIFO_FLUSH};
use crate::utils::PollBudget;
use crate::{Error, Result};

impl Device<Initialized> {
    /// Run the CalcCRC command over `data` and return the CRC_A bytes in
    /// transmission order (low byte first).
    pub fn calculate_crc(&mut self, data: &[u8]) -> Result<[u8; 2]> {
        self.write_register(Register::Command, PcdCommand::Idle as u8)?;
        self.write_register(Register::DivIrq, irq::CRC)?;
        self.write_register(Register::FifoLevel, FIFO_FLUSH)?;
        self.write_register_burst(Register::FifoData, data)?;
        self.write_register(Register::Command, PcdCommand::CalcCrc as u8)?;

        let mut budget = PollBudget::new(self.config.crc_poll_budget);
        loop {
            if !budget.tick() {
                log::debug!("CRC coprocessor did not finish over {} bytes", data.len());
                return Err(Error::Timeout);
            }
            if self.read_register(Register::DivIrq)? & irq::CRC != 0 {
                break;
            }
        }

        self.write_register(Register::Command, PcdCommand::Idle as u8)?;
        let lsb = self.read_register(Register::CrcResultLsb)?;
        let msb = self.read_register(Register::CrcResultMsb)?;
        Ok([lsb, msb])
    }
}
