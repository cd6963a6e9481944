// rc522/src/protocol/frame.rs

use crate::constants::{CASCADE_TAG, SELECT_FRAME_LEN};
use crate::protocol::checksum::bcc;
use crate::{Error, Result};

/// Working buffer for one cascade level of ANTICOLLISION / SELECT.
///
/// Layout: `[SEL] [NVB] [uid0|CT] [uid] [uid] [uid] [BCC] [CRC_A] [CRC_A]`.
/// BCC and CRC_A are only meaningful once all 32 bits of the level are
/// known. `known_bits` counts bits from byte 2, cascade tag included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectFrame {
    buf: [u8; SELECT_FRAME_LEN],
    known_bits: u8,
}

impl SelectFrame {
    /// NVB for a full SELECT: seven whole bytes.
    pub const NVB_SELECT: u8 = 0x70;

    /// Start a level with `prefix` (already known UID bytes of this level)
    /// of which `prefix_bits` are valid.
    pub fn new(sel: u8, cascade_tag: bool, prefix: &[u8], prefix_bits: u8) -> Result<Self> {
        let room = if cascade_tag { 3 } else { 4 };
        if prefix.len() > room || prefix_bits as usize > prefix.len() * 8 {
            return Err(Error::Internal(format!(
                "select prefix of {} bytes / {} bits does not fit the level",
                prefix.len(),
                prefix_bits
            )));
        }

        let mut buf = [0u8; SELECT_FRAME_LEN];
        buf[0] = sel;
        let mut index = 2;
        if cascade_tag {
            buf[index] = CASCADE_TAG;
            index += 1;
        }
        buf[index..index + prefix.len()].copy_from_slice(prefix);

        let known_bits = if cascade_tag { prefix_bits + 8 } else { prefix_bits };
        Ok(Self {
            buf,
            known_bits: known_bits.min(32),
        })
    }

    pub fn known_bits(&self) -> u8 {
        self.known_bits
    }

    /// True once every UID bit of the level is known and a SELECT can go out.
    pub fn is_complete(&self) -> bool {
        self.known_bits >= 32
    }

    pub fn mark_complete(&mut self) {
        self.known_bits = 32;
    }

    /// Number of valid bits in the last transmitted byte (and RxAlign).
    pub fn tx_last_bits(&self) -> u8 {
        if self.is_complete() {
            0
        } else {
            self.known_bits % 8
        }
    }

    /// Index of the first byte the PICC answer lands in.
    fn response_index(&self) -> usize {
        2 + (self.known_bits / 8) as usize
    }

    /// Bytes the PICC may still send back during anticollision.
    pub fn response_capacity(&self) -> usize {
        SELECT_FRAME_LEN - self.response_index()
    }

    /// Set NVB and return the ANTICOLLISION frame.
    pub fn anticollision(&mut self) -> &[u8] {
        let index = self.response_index();
        let extra = self.tx_last_bits();
        self.buf[1] = ((index as u8) << 4) | extra;
        let used = index + usize::from(extra != 0);
        &self.buf[..used]
    }

    /// Set NVB and BCC; return the seven bytes CRC_A is computed over.
    pub fn select_header(&mut self) -> &[u8] {
        self.buf[1] = Self::NVB_SELECT;
        self.buf[6] = bcc(&self.buf[2..6]);
        &self.buf[..7]
    }

    /// Append CRC_A and return the full SELECT frame.
    pub fn select_with_crc(&mut self, crc: [u8; 2]) -> &[u8] {
        self.buf[7] = crc[0];
        self.buf[8] = crc[1];
        &self.buf[..SELECT_FRAME_LEN]
    }

    /// Merge an anticollision answer into the buffer after the known bits.
    /// Bits of the first byte below the known boundary are kept.
    pub fn merge_response(&mut self, data: &[u8]) {
        let index = self.response_index();
        let extra = self.known_bits % 8;
        for (i, &byte) in data.iter().enumerate() {
            let pos = index + i;
            if pos >= SELECT_FRAME_LEN {
                break;
            }
            if i == 0 && extra != 0 {
                let keep = (1u8 << extra) - 1;
                self.buf[pos] = (self.buf[pos] & keep) | (byte & !keep);
            } else {
                self.buf[pos] = byte;
            }
        }
    }

    /// Record a collision at 1-based bit `position` of the level: every bit
    /// before it is now known and the colliding bit is guessed as 1.
    pub fn resolve_collision(&mut self, position: u8) -> Result<()> {
        if position == 0 || position > 32 {
            return Err(Error::Internal(format!(
                "collision position {} outside level",
                position
            )));
        }
        if position <= self.known_bits {
            return Err(Error::Collision);
        }
        let bit = position - 1;
        let byte = 2 + (bit / 8) as usize;
        // clear anything above the colliding bit in that byte, then set it
        let mask = (1u8 << (bit % 8)) - 1;
        self.buf[byte] = (self.buf[byte] & mask) | (1 << (bit % 8));
        self.known_bits = position;
        Ok(())
    }

    /// Whether the received BCC matches the four UID-field bytes.
    pub fn bcc_matches(&self) -> bool {
        bcc(&self.buf[2..6]) == self.buf[6]
    }

    pub fn has_cascade_tag(&self) -> bool {
        self.buf[2] == CASCADE_TAG
    }

    /// The UID bytes this level contributes (3 after a cascade tag, else 4).
    pub fn uid_bytes(&self) -> &[u8] {
        if self.has_cascade_tag() {
            &self.buf[3..6]
        } else {
            &self.buf[2..6]
        }
    }

    pub fn as_bytes(&self) -> &[u8; SELECT_FRAME_LEN] {
        &self.buf
    }
}
