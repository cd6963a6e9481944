// rc522/src/card/operations/mod.rs
//! MIFARE Classic and Ultralight memory commands. All of them assume the
//! target PICC has been selected; block commands on Classic cards also need
//! a prior `authenticate`.

pub mod auth;
pub mod read;
pub mod value;
pub mod write;

use crate::constants::MF_BLOCK_SIZE;
use crate::device::communicate::TransceiveRequest;
use crate::device::{Device, Initialized};
use crate::{Error, Result};

/// Answer buffer for ACK/NAK frames; an ACK is a single nibble, 18 leaves
/// room for a misbehaving PICC without overflowing.
const ACK_CAPACITY: usize = 18;

impl Device<Initialized> {
    /// Send `data` with CRC_A appended and expect the 4-bit MIFARE ACK.
    ///
    /// With `accept_timeout` a silent PICC counts as success; value
    /// operations rely on this for their second step.
    pub fn mifare_transceive(&mut self, data: &[u8], accept_timeout: bool) -> Result<()> {
        if data.len() > MF_BLOCK_SIZE {
            return Err(Error::InvalidArgument(format!(
                "{} bytes exceed one MIFARE frame",
                data.len()
            )));
        }
        let mut frame = Vec::with_capacity(data.len() + 2);
        frame.extend_from_slice(data);
        let crc = self.calculate_crc(data)?;
        frame.extend_from_slice(&crc);

        let request = TransceiveRequest::transceive(&frame).expecting(ACK_CAPACITY);
        let response = match self.communicate(&request) {
            Ok(response) => response,
            Err(Error::Timeout) if accept_timeout => return Ok(()),
            Err(e) => return Err(e),
        };
        if !response.is_ack() {
            log::debug!(
                "MIFARE NAK/garbage: {}",
                crate::utils::frame_to_hex(&response.data, response.valid_bits)
            );
            return Err(Error::Communication);
        }
        Ok(())
    }
}
