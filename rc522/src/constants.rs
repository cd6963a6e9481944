// rc522/src/constants.rs
//! Common protocol constants used across the crate

/// ISO 14443-3 cascade tag, sent in place of the first UID byte when the
/// UID does not fit in the current cascade level.
pub const CASCADE_TAG: u8 = 0x88;

/// SAK bit signalling that the UID is not complete yet.
pub const SAK_CASCADE_BIT: u8 = 0x04;

/// MIFARE ACK nibble (4-bit response)
pub const MF_ACK: u8 = 0x0A;

/// MIFARE Classic key length in bytes
pub const MF_KEY_SIZE: usize = 6;

/// MIFARE block payload length
pub const MF_BLOCK_SIZE: usize = 16;

/// Block payload plus trailing CRC_A
pub const MF_READ_BUFFER_SIZE: usize = MF_BLOCK_SIZE + 2;

/// MIFARE Ultralight page length
pub const UL_PAGE_SIZE: usize = 4;

/// Longest UID defined by ISO 14443-3 (triple size)
pub const MAX_UID_LEN: usize = 10;

/// Highest `known_bits` accepted by select (10 bytes)
pub const MAX_UID_BITS: u8 = 80;

/// Size of the select/anticollision frame buffer: SEL, NVB, 4 UID bytes,
/// BCC and CRC_A.
pub const SELECT_FRAME_LEN: usize = 9;

/// Capacity of the MFRC522 FIFO in bytes
pub const FIFO_SIZE: usize = 64;

/// Minimum settle time after releasing the hardware reset line
pub const RESET_SETTLE_MS: u64 = 50;
