// rc522/src/types.rs

use derive_more::Display;
use std::convert::TryFrom;

use crate::constants::{MAX_UID_LEN, MF_BLOCK_SIZE, MF_KEY_SIZE, SAK_CASCADE_BIT};
use crate::Error;

/// UID (4, 7 または 10 バイト) と SAK
///
/// Filled in one cascade level at a time by `select`; `size` is 0 until the
/// first level completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Uid {
    bytes: [u8; MAX_UID_LEN],
    size: u8,
    sak: u8,
}

impl Uid {
    /// Empty UID, the usual starting point for `select(.., 0)`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a UID from known bytes, for selecting a specific card.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Self::try_from(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.size as usize]
    }

    pub fn size(&self) -> usize {
        self.size as usize
    }

    pub fn sak(&self) -> u8 {
        self.sak
    }

    /// Card type as reported by the SAK of the final cascade level.
    pub fn picc_type(&self) -> PiccType {
        PiccType::from_sak(self.sak)
    }

    pub fn to_hex(&self) -> String {
        crate::utils::bytes_to_hex(self.as_bytes())
    }

    pub(crate) fn raw(&self) -> &[u8; MAX_UID_LEN] {
        &self.bytes
    }

    pub(crate) fn set_byte(&mut self, index: usize, value: u8) {
        self.bytes[index] = value;
    }

    pub(crate) fn complete(&mut self, size: u8, sak: u8) {
        self.size = size;
        self.sak = sak;
    }
}

impl TryFrom<&[u8]> for Uid {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if !matches!(bytes.len(), 4 | 7 | 10) {
            return Err(Error::InvalidArgument(format!(
                "uid must be 4, 7 or 10 bytes, got {}",
                bytes.len()
            )));
        }
        let mut uid = Self::default();
        uid.bytes[..bytes.len()].copy_from_slice(bytes);
        uid.size = bytes.len() as u8;
        Ok(uid)
    }
}

/// MIFARE Crypto1 key (6 バイト)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MifareKey([u8; MF_KEY_SIZE]);

impl MifareKey {
    /// Factory default transport key.
    pub const DEFAULT: Self = Self([0xFF; MF_KEY_SIZE]);

    pub const fn from_bytes(bytes: [u8; MF_KEY_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; MF_KEY_SIZE] {
        &self.0
    }
}

impl Default for MifareKey {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Which sector key to authenticate with
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyType {
    A = 0x60,
    B = 0x61,
}

impl KeyType {
    pub fn command(&self) -> u8 {
        *self as u8
    }
}

/// ATQA - Answer To reQuest, type A (2 バイト)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Atqa([u8; 2]);

impl Atqa {
    pub fn from_bytes(bytes: [u8; 2]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 2] {
        &self.0
    }

    pub fn as_u16(&self) -> u16 {
        u16::from_le_bytes(self.0)
    }
}

/// BlockData (16 バイト)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockData([u8; MF_BLOCK_SIZE]);

impl BlockData {
    pub fn from_bytes(bytes: [u8; MF_BLOCK_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; MF_BLOCK_SIZE] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        crate::utils::bytes_to_hex_spaced(self.as_bytes())
    }

    pub fn to_ascii_safe(&self) -> String {
        self.0
            .iter()
            .map(|&b| {
                if b.is_ascii_graphic() || b == b' ' {
                    b as char
                } else {
                    '.'
                }
            })
            .collect()
    }
}

impl TryFrom<&[u8]> for BlockData {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.len() < MF_BLOCK_SIZE {
            return Err(Error::InvalidArgument(format!(
                "block data must be {} bytes, got {}",
                MF_BLOCK_SIZE,
                bytes.len()
            )));
        }
        let mut arr = [0u8; MF_BLOCK_SIZE];
        arr.copy_from_slice(&bytes[..MF_BLOCK_SIZE]);
        Ok(Self(arr))
    }
}

/// PICC type derived from the SAK byte (NXP AN10833).
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PiccType {
    #[display(fmt = "Unknown type")]
    Unknown,
    #[display(fmt = "PICC compliant with ISO/IEC 14443-4")]
    Iso14443_4,
    #[display(fmt = "PICC compliant with ISO/IEC 18092 (NFC)")]
    Iso18092,
    #[display(fmt = "MIFARE Mini, 320 bytes")]
    MifareMini,
    #[display(fmt = "MIFARE 1KB")]
    Mifare1K,
    #[display(fmt = "MIFARE 4KB")]
    Mifare4K,
    #[display(fmt = "MIFARE Ultralight or Ultralight C")]
    MifareUltralight,
    #[display(fmt = "MIFARE Plus")]
    MifarePlus,
    #[display(fmt = "MIFARE TNP3XXX")]
    Tnp3xxx,
    #[display(fmt = "SAK indicates UID is not complete")]
    NotComplete,
}

impl PiccType {
    pub fn from_sak(sak: u8) -> Self {
        if sak & SAK_CASCADE_BIT != 0 {
            return PiccType::NotComplete;
        }
        match sak {
            0x09 => PiccType::MifareMini,
            0x08 => PiccType::Mifare1K,
            0x18 => PiccType::Mifare4K,
            0x00 => PiccType::MifareUltralight,
            0x10 | 0x11 => PiccType::MifarePlus,
            0x01 => PiccType::Tnp3xxx,
            _ if sak & 0x20 != 0 => PiccType::Iso14443_4,
            _ if sak & 0x40 != 0 => PiccType::Iso18092,
            _ => PiccType::Unknown,
        }
    }

    /// True for the MIFARE Classic family that needs Crypto1 authentication.
    pub fn is_mifare_classic(&self) -> bool {
        matches!(
            self,
            PiccType::MifareMini | PiccType::Mifare1K | PiccType::Mifare4K
        )
    }
}

/// Chip revision read from VersionReg
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChipVersion {
    V1_0,
    V2_0,
    /// Fudan FM17522 clone
    Fm17522,
    Unknown(u8),
}

impl ChipVersion {
    pub fn from_register(value: u8) -> Self {
        match value {
            0x91 => ChipVersion::V1_0,
            0x92 => ChipVersion::V2_0,
            0x88 => ChipVersion::Fm17522,
            other => ChipVersion::Unknown(other),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ChipVersion::Unknown(_))
    }
}

/// Receiver gain, RFCfgReg[6:4]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RxGain {
    Db18 = 0b010,
    Db23 = 0b011,
    Db33 = 0b100,
    Db38 = 0b101,
    Db43 = 0b110,
    Db48 = 0b111,
}

impl RxGain {
    /// Value as placed in RFCfgReg.
    pub fn register_value(&self) -> u8 {
        (*self as u8) << 4
    }

    pub fn from_register(value: u8) -> Self {
        // 000/001 alias 010/011 on the chip
        match (value >> 4) & 0x07 {
            0b000 | 0b010 => RxGain::Db18,
            0b001 | 0b011 => RxGain::Db23,
            0b100 => RxGain::Db33,
            0b101 => RxGain::Db38,
            0b110 => RxGain::Db43,
            _ => RxGain::Db48,
        }
    }
}
