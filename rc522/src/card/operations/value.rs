// rc522/src/card/operations/value.rs
//! Value block commands. The result lands in the PICC's transfer buffer
//! and reaches memory only through `transfer`.

use crate::device::{Device, Initialized};
use crate::protocol::{PiccCommand, ValueCommand};
use crate::Result;

impl Device<Initialized> {
    pub fn decrement(&mut self, block: u8, delta: i32) -> Result<()> {
        self.value_operation(ValueCommand::Decrement, block, delta)
    }

    pub fn increment(&mut self, block: u8, delta: i32) -> Result<()> {
        self.value_operation(ValueCommand::Increment, block, delta)
    }

    /// Copy `block` into the transfer buffer. The second step carries a
    /// zero operand.
    pub fn restore(&mut self, block: u8) -> Result<()> {
        self.value_operation(ValueCommand::Restore, block, 0)
    }

    /// Write the transfer buffer to `block`.
    pub fn transfer(&mut self, block: u8) -> Result<()> {
        self.mifare_transceive(&[PiccCommand::MfTransfer.code(), block], false)
    }

    fn value_operation(&mut self, command: ValueCommand, block: u8, delta: i32) -> Result<()> {
        let command = PiccCommand::from(command);
        self.mifare_transceive(&[command.code(), block], false)?;
        // the PICC does not ACK the operand
        self.mifare_transceive(&delta.to_le_bytes(), true)
    }
}
