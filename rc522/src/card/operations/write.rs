// rc522/src/card/operations/write.rs

use crate::constants::{MF_BLOCK_SIZE, UL_PAGE_SIZE};
use crate::device::{Device, Initialized};
use crate::protocol::PiccCommand;
use crate::{Error, Result};

impl Device<Initialized> {
    /// MIFARE WRITE: command frame, ACK, then the 16 data bytes, ACK.
    /// Extra bytes beyond the first 16 are ignored.
    pub fn write_block(&mut self, block: u8, data: &[u8]) -> Result<()> {
        if data.len() < MF_BLOCK_SIZE {
            return Err(Error::InvalidArgument(format!(
                "block write needs {} bytes, got {}",
                MF_BLOCK_SIZE,
                data.len()
            )));
        }
        self.mifare_transceive(&[PiccCommand::MfWrite.code(), block], false)?;
        self.mifare_transceive(&data[..MF_BLOCK_SIZE], false)
    }

    /// Ultralight WRITE of one 4-byte page.
    pub fn ultralight_write(&mut self, page: u8, data: &[u8; UL_PAGE_SIZE]) -> Result<()> {
        let mut frame = [0u8; 2 + UL_PAGE_SIZE];
        frame[0] = PiccCommand::UlWrite.code();
        frame[1] = page;
        frame[2..].copy_from_slice(data);
        self.mifare_transceive(&frame, false)
    }
}
