// rc522/src/card/operations/read.rs

use crate::constants::{MF_BLOCK_SIZE, MF_READ_BUFFER_SIZE};
use crate::device::communicate::TransceiveRequest;
use crate::device::{Device, Initialized};
use crate::protocol::PiccCommand;
use crate::types::BlockData;
use crate::{Error, Result};

impl Device<Initialized> {
    /// MIFARE READ of `block` into `buffer`.
    ///
    /// Classic cards return one 16-byte block, Ultralight cards four pages
    /// starting at `block`. The two trailing CRC_A bytes are verified and
    /// left in the buffer. Returns the number of bytes written (18).
    pub fn mifare_read(&mut self, block: u8, buffer: &mut [u8]) -> Result<usize> {
        if buffer.len() < MF_READ_BUFFER_SIZE {
            return Err(Error::BufferTooSmall {
                needed: MF_READ_BUFFER_SIZE,
                available: buffer.len(),
            });
        }

        let mut frame = [PiccCommand::MfRead.code(), block, 0, 0];
        let crc = self.calculate_crc(&frame[..2])?;
        frame[2..].copy_from_slice(&crc);

        let request = TransceiveRequest::transceive(&frame)
            .expecting(MF_READ_BUFFER_SIZE)
            .with_crc_check(true);
        let response = self.communicate(&request)?;
        buffer[..response.len()].copy_from_slice(&response.data);
        Ok(response.len())
    }

    /// Read one block and strip the CRC.
    pub fn read_block(&mut self, block: u8) -> Result<BlockData> {
        let mut buffer = [0u8; MF_READ_BUFFER_SIZE];
        let n = self.mifare_read(block, &mut buffer)?;
        if n < MF_BLOCK_SIZE + 2 {
            return Err(Error::Communication);
        }
        BlockData::try_from(&buffer[..MF_BLOCK_SIZE])
    }
}
