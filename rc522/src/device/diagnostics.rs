// rc522/src/device/diagnostics.rs
//! Register dump for bring-up and field debugging.

use crate::device::handle::Device;
use crate::device::registers::Register;
use crate::Result;

impl<S> Device<S> {
    /// Read every documented register except FIFODataReg (reading it would
    /// consume FIFO content).
    pub fn dump_registers(&mut self) -> Result<Vec<(Register, u8)>> {
        let mut dump = Vec::with_capacity(Register::ALL.len());
        for reg in Register::ALL {
            if reg == Register::FifoData {
                continue;
            }
            let value = self.read_register(reg)?;
            log::debug!("{:<16} {:#04x} = {:#04x}", format!("{:?}", reg), reg.index(), value);
            dump.push((reg, value));
        }
        Ok(dump)
    }
}
