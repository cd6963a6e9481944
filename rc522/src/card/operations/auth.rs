// rc522/src/card/operations/auth.rs

use crate::device::communicate::TransceiveRequest;
use crate::device::registers::{Register, MF_CRYPTO1_ON};
use crate::device::{Device, Initialized};
use crate::types::{KeyType, MifareKey, Uid};
use crate::{Error, Result};

impl Device<Initialized> {
    /// Run MFAuthent for `block`. On success the chip's Crypto1 unit is on
    /// and every further exchange with the PICC is encrypted until
    /// `stop_crypto1`.
    pub fn authenticate(
        &mut self,
        key_type: KeyType,
        block: u8,
        key: &MifareKey,
        uid: &Uid,
    ) -> Result<()> {
        // MFAuthent takes the first four UID bytes regardless of UID size
        let serial = uid.as_bytes().get(..4).ok_or_else(|| {
            Error::InvalidArgument(format!("uid of {} bytes cannot authenticate", uid.size()))
        })?;

        let mut frame = [0u8; 12];
        frame[0] = key_type.command();
        frame[1] = block;
        frame[2..8].copy_from_slice(key.as_bytes());
        frame[8..].copy_from_slice(serial);

        log::debug!("authenticating block {} with key {:?}", block, key_type);
        self.communicate(&TransceiveRequest::authenticate(&frame))?;
        Ok(())
    }

    /// Leave the authenticated state so the PICC can be talked to in clear
    /// again (e.g. to select another card).
    pub fn stop_crypto1(&mut self) -> Result<()> {
        self.clear_register_bits(Register::Status2, MF_CRYPTO1_ON)
    }
}
