// rc522/src/protocol/command.rs

/// Commands sent to the PICC over the RF interface (ISO/IEC 14443-3,
/// MIFARE Classic MF1S50 section 9, MIFARE Ultralight MF0ICU1 section 8.6).
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PiccCommand {
    /// REQuest type A, 7-bit short frame
    ReqA = 0x26,
    /// Wake-UP type A, also wakes halted PICCs. 7-bit short frame
    WupA = 0x52,
    SelCl1 = 0x93,
    SelCl2 = 0x95,
    SelCl3 = 0x97,
    /// HaLT type A
    HltA = 0x50,
    MfAuthKeyA = 0x60,
    MfAuthKeyB = 0x61,
    MfRead = 0x30,
    MfWrite = 0xA0,
    MfDecrement = 0xC0,
    MfIncrement = 0xC1,
    MfRestore = 0xC2,
    MfTransfer = 0xB0,
    UlWrite = 0xA2,
}

impl PiccCommand {
    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// SEL byte for cascade level 1..=3.
    pub fn select_for_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(PiccCommand::SelCl1),
            2 => Some(PiccCommand::SelCl2),
            3 => Some(PiccCommand::SelCl3),
            _ => None,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        use PiccCommand::*;
        let cmd = match code {
            0x26 => ReqA,
            0x52 => WupA,
            0x93 => SelCl1,
            0x95 => SelCl2,
            0x97 => SelCl3,
            0x50 => HltA,
            0x60 => MfAuthKeyA,
            0x61 => MfAuthKeyB,
            0x30 => MfRead,
            0xA0 => MfWrite,
            0xC0 => MfDecrement,
            0xC1 => MfIncrement,
            0xC2 => MfRestore,
            0xB0 => MfTransfer,
            0xA2 => UlWrite,
            _ => return None,
        };
        Some(cmd)
    }
}

/// The value-block commands that share the two-step exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueCommand {
    Decrement,
    Increment,
    Restore,
}

impl From<ValueCommand> for PiccCommand {
    fn from(cmd: ValueCommand) -> Self {
        match cmd {
            ValueCommand::Decrement => PiccCommand::MfDecrement,
            ValueCommand::Increment => PiccCommand::MfIncrement,
            ValueCommand::Restore => PiccCommand::MfRestore,
        }
    }
}
