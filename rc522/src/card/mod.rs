// rc522/src/card/mod.rs

use crate::device::{Device, Initialized};
use crate::types::{Atqa, BlockData, KeyType, MifareKey, PiccType, Uid};
use crate::Result;

pub mod discovery;
pub mod operations;
pub mod select;

/// A selected PICC: its UID (with SAK) and, when known, the ATQA it
/// answered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Card {
    uid: Uid,
    atqa: Option<Atqa>,
}

impl Card {
    pub fn new(uid: Uid) -> Self {
        Self { uid, atqa: None }
    }

    pub fn with_atqa(mut self, atqa: Atqa) -> Self {
        self.atqa = Some(atqa);
        self
    }

    pub fn uid(&self) -> &Uid {
        &self.uid
    }

    pub fn atqa(&self) -> Option<Atqa> {
        self.atqa
    }

    pub fn sak(&self) -> u8 {
        self.uid.sak()
    }

    pub fn picc_type(&self) -> PiccType {
        self.uid.picc_type()
    }

    /// Authenticate `block` against this card's UID.
    pub fn authenticate(
        &self,
        device: &mut Device<Initialized>,
        key_type: KeyType,
        block: u8,
        key: &MifareKey,
    ) -> Result<()> {
        device.authenticate(key_type, block, key, &self.uid)
    }

    /// Authenticate with `key` and read `block`.
    pub fn read_block(
        &self,
        device: &mut Device<Initialized>,
        key_type: KeyType,
        key: &MifareKey,
        block: u8,
    ) -> Result<BlockData> {
        self.authenticate(device, key_type, block, key)?;
        device.read_block(block)
    }

    /// Authenticate with `key` and write `data` to `block`.
    pub fn write_block(
        &self,
        device: &mut Device<Initialized>,
        key_type: KeyType,
        key: &MifareKey,
        block: u8,
        data: &BlockData,
    ) -> Result<()> {
        self.authenticate(device, key_type, block, key)?;
        device.write_block(block, data.as_bytes())
    }

    /// HLTA plus leaving Crypto1, the usual end of a card session.
    pub fn halt(&self, device: &mut Device<Initialized>) -> Result<()> {
        device.halt_a()?;
        device.stop_crypto1()
    }
}

impl Device<Initialized> {
    /// REQA followed by anticollision; the returned card carries its ATQA.
    pub fn poll_card(&mut self) -> Result<Card> {
        let atqa = self.request_a()?;
        Ok(self.read_card_serial()?.with_atqa(atqa))
    }
}
