// rc522/src/device/registers.rs
//! MFRC522 register map and the register transport built on `Transport`.

use crate::device::handle::Device;
use crate::transport::ChipSelect;
use crate::{Error, Result};

/// MFRC522 registers (datasheet section 9.2). The SPI address byte is the
/// register index shifted left by one, bit 7 set for reads.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    // Page 0: command and status
    Command = 0x01,
    ComIEn = 0x02,
    DivIEn = 0x03,
    ComIrq = 0x04,
    DivIrq = 0x05,
    Error = 0x06,
    Status1 = 0x07,
    Status2 = 0x08,
    FifoData = 0x09,
    FifoLevel = 0x0A,
    WaterLevel = 0x0B,
    Control = 0x0C,
    BitFraming = 0x0D,
    Coll = 0x0E,
    // Page 1: command
    Mode = 0x11,
    TxMode = 0x12,
    RxMode = 0x13,
    TxControl = 0x14,
    TxAsk = 0x15,
    TxSel = 0x16,
    RxSel = 0x17,
    RxThreshold = 0x18,
    Demod = 0x19,
    MfTx = 0x1C,
    MfRx = 0x1D,
    SerialSpeed = 0x1F,
    // Page 2: configuration
    CrcResultMsb = 0x21,
    CrcResultLsb = 0x22,
    ModWidth = 0x24,
    RfCfg = 0x26,
    GsN = 0x27,
    CwGsP = 0x28,
    ModGsP = 0x29,
    TMode = 0x2A,
    TPrescaler = 0x2B,
    TReloadHigh = 0x2C,
    TReloadLow = 0x2D,
    TCounterValHigh = 0x2E,
    TCounterValLow = 0x2F,
    // Page 3: test
    TestSel1 = 0x31,
    TestSel2 = 0x32,
    TestPinEn = 0x33,
    TestPinValue = 0x34,
    TestBus = 0x35,
    AutoTest = 0x36,
    Version = 0x37,
    AnalogTest = 0x38,
    TestDac1 = 0x39,
    TestDac2 = 0x3A,
    TestAdc = 0x3B,
}

impl Register {
    /// Every documented register, in address order.
    pub const ALL: [Register; 50] = [
        Register::Command,
        Register::ComIEn,
        Register::DivIEn,
        Register::ComIrq,
        Register::DivIrq,
        Register::Error,
        Register::Status1,
        Register::Status2,
        Register::FifoData,
        Register::FifoLevel,
        Register::WaterLevel,
        Register::Control,
        Register::BitFraming,
        Register::Coll,
        Register::Mode,
        Register::TxMode,
        Register::RxMode,
        Register::TxControl,
        Register::TxAsk,
        Register::TxSel,
        Register::RxSel,
        Register::RxThreshold,
        Register::Demod,
        Register::MfTx,
        Register::MfRx,
        Register::SerialSpeed,
        Register::CrcResultMsb,
        Register::CrcResultLsb,
        Register::ModWidth,
        Register::RfCfg,
        Register::GsN,
        Register::CwGsP,
        Register::ModGsP,
        Register::TMode,
        Register::TPrescaler,
        Register::TReloadHigh,
        Register::TReloadLow,
        Register::TCounterValHigh,
        Register::TCounterValLow,
        Register::TestSel1,
        Register::TestSel2,
        Register::TestPinEn,
        Register::TestPinValue,
        Register::TestBus,
        Register::AutoTest,
        Register::Version,
        Register::AnalogTest,
        Register::TestDac1,
        Register::TestDac2,
        Register::TestAdc,
    ];

    pub fn index(self) -> u8 {
        self as u8
    }

    /// SPI address byte for a write: bit 7 clear, bit 0 clear.
    pub fn write_address(self) -> u8 {
        (self.index() << 1) & 0x7E
    }

    /// SPI address byte for a read: bit 7 set.
    pub fn read_address(self) -> u8 {
        self.write_address() | 0x80
    }

    /// Decode the register index carried in an SPI address byte.
    pub fn from_address(address: u8) -> Option<Self> {
        let index = (address & 0x7E) >> 1;
        Self::ALL.iter().copied().find(|r| r.index() == index)
    }
}

/// PCD commands written to CommandReg[3:0]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PcdCommand {
    Idle = 0x00,
    Mem = 0x01,
    GenerateRandomId = 0x02,
    CalcCrc = 0x03,
    Transmit = 0x04,
    NoCmdChange = 0x07,
    Receive = 0x08,
    Transceive = 0x0C,
    MfAuthent = 0x0E,
    SoftReset = 0x0F,
}

impl PcdCommand {
    pub fn from_bits(bits: u8) -> Option<Self> {
        use PcdCommand::*;
        let cmd = match bits & 0x0F {
            0x00 => Idle,
            0x01 => Mem,
            0x02 => GenerateRandomId,
            0x03 => CalcCrc,
            0x04 => Transmit,
            0x07 => NoCmdChange,
            0x08 => Receive,
            0x0C => Transceive,
            0x0E => MfAuthent,
            0x0F => SoftReset,
            _ => return None,
        };
        Some(cmd)
    }
}

/// ComIrqReg / DivIrqReg bits
pub mod irq {
    pub const SET1: u8 = 0x80;
    pub const TX: u8 = 0x40;
    pub const RX: u8 = 0x20;
    pub const IDLE: u8 = 0x10;
    pub const HI_ALERT: u8 = 0x08;
    pub const LO_ALERT: u8 = 0x04;
    pub const ERR: u8 = 0x02;
    pub const TIMER: u8 = 0x01;
    /// All seven request bits of ComIrqReg
    pub const ALL: u8 = 0x7F;
    /// DivIrqReg.CRCIRq
    pub const CRC: u8 = 0x04;
}

/// ErrorReg bits
pub mod error_bits {
    pub const WR: u8 = 0x80;
    pub const TEMP: u8 = 0x40;
    pub const BUFFER_OVFL: u8 = 0x10;
    pub const COLL: u8 = 0x08;
    pub const CRC: u8 = 0x04;
    pub const PARITY: u8 = 0x02;
    pub const PROTOCOL: u8 = 0x01;
    /// Errors that abort an exchange before the FIFO is read
    pub const FATAL: u8 = BUFFER_OVFL | PARITY | PROTOCOL;
}

/// FIFOLevelReg.FlushBuffer
pub const FIFO_FLUSH: u8 = 0x80;
/// FIFOLevelReg[6:0]
pub const FIFO_LEVEL_MASK: u8 = 0x7F;
/// BitFramingReg.StartSend
pub const START_SEND: u8 = 0x80;
/// CollReg.ValuesAfterColl
pub const VALUES_AFTER_COLL: u8 = 0x80;
/// CollReg.CollPosNotValid
pub const COLL_POS_NOT_VALID: u8 = 0x20;
/// CollReg.CollPos[4:0], 0 meaning bit 32
pub const COLL_POS_MASK: u8 = 0x1F;
/// ControlReg.RxLastBits[2:0]
pub const RX_LAST_BITS_MASK: u8 = 0x07;
/// Status2Reg.MFCrypto1On
pub const MF_CRYPTO1_ON: u8 = 0x08;
/// CommandReg.PowerDown
pub const POWER_DOWN: u8 = 0x10;
/// TxControlReg.Tx1RFEn | Tx2RFEn
pub const TX_ANTENNA: u8 = 0x03;
/// TModeReg.TAuto
pub const T_AUTO: u8 = 0x80;
/// RFCfgReg.RxGain[2:0]
pub const RX_GAIN_MASK: u8 = 0x70;

impl<S> Device<S> {
    pub fn write_register(&mut self, reg: Register, value: u8) -> Result<()> {
        log::trace!("{:?} <- {:#04x}", reg, value);
        let mut cs = ChipSelect::acquire(&mut *self.transport)?;
        cs.exchange(&[reg.write_address(), value])?;
        Ok(())
    }

    /// Write several bytes to the same register (used for FIFODataReg).
    pub fn write_register_burst(&mut self, reg: Register, values: &[u8]) -> Result<()> {
        log::trace!(
            "{:?} <- [{}]",
            reg,
            crate::utils::bytes_to_hex_spaced(values)
        );
        let mut tx = Vec::with_capacity(values.len() + 1);
        tx.push(reg.write_address());
        tx.extend_from_slice(values);

        let mut cs = ChipSelect::acquire(&mut *self.transport)?;
        cs.exchange(&tx)?;
        Ok(())
    }

    pub fn read_register(&mut self, reg: Register) -> Result<u8> {
        let rx = {
            let mut cs = ChipSelect::acquire(&mut *self.transport)?;
            cs.exchange(&[reg.read_address(), 0x00])?
        };
        let value = rx
            .get(1)
            .copied()
            .ok_or_else(|| Error::Transport(format!("short read from {:?}", reg)))?;
        log::trace!("{:?} -> {:#04x}", reg, value);
        Ok(value)
    }

    /// Read `count` bytes from the same register. The read address is
    /// clocked `count` times followed by a 0x00 terminator.
    pub fn read_register_burst(&mut self, reg: Register, count: usize) -> Result<Vec<u8>> {
        if count == 0 {
            return Ok(Vec::new());
        }
        let mut tx = vec![reg.read_address(); count];
        tx.push(0x00);

        let rx = {
            let mut cs = ChipSelect::acquire(&mut *self.transport)?;
            cs.exchange(&tx)?
        };
        if rx.len() != tx.len() {
            return Err(Error::Transport(format!(
                "burst read from {:?}: expected {} bytes, got {}",
                reg,
                tx.len(),
                rx.len()
            )));
        }
        log::trace!(
            "{:?} -> [{}]",
            reg,
            crate::utils::bytes_to_hex_spaced(&rx[1..])
        );
        Ok(rx[1..].to_vec())
    }

    pub fn set_register_bits(&mut self, reg: Register, mask: u8) -> Result<()> {
        let value = self.read_register(reg)?;
        self.write_register(reg, value | mask)
    }

    pub fn clear_register_bits(&mut self, reg: Register, mask: u8) -> Result<()> {
        let value = self.read_register(reg)?;
        self.write_register(reg, value & !mask)
    }
}
