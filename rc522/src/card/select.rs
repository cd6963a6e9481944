// rc522/src/card/select.rs
//! Cascaded ANTICOLLISION / SELECT (ISO/IEC 14443-3, 6.5.3).

use crate::constants::{MAX_UID_BITS, SAK_CASCADE_BIT};
use crate::device::communicate::{Response, TransceiveRequest};
use crate::device::registers::{Register, COLL_POS_MASK, COLL_POS_NOT_VALID, VALUES_AFTER_COLL};
use crate::device::{Device, Initialized};
use crate::protocol::{PiccCommand, SelectFrame};
use crate::types::Uid;
use crate::{Error, Result};

/// Select state machine. Each state owns the frame it works on.
#[derive(Debug)]
enum SelectState {
    BuildFrame,
    AntiCollide(SelectFrame),
    Select(SelectFrame),
    CascadeAdvance { frame: SelectFrame, sak: Response },
    Done,
    Failed(Error),
}

struct Selector<'d, 'u> {
    device: &'d mut Device<Initialized>,
    uid: &'u mut Uid,
    known_bits: u8,
    level: u8,
    retries_left: u8,
}

impl Device<Initialized> {
    /// Run anticollision and selection for `uid`.
    ///
    /// `known_bits` UID bits of `uid` are taken as given (0 to select
    /// whichever card wins). On success `uid` holds the complete UID and the
    /// SAK of the last cascade level.
    pub fn select(&mut self, uid: &mut Uid, known_bits: u8) -> Result<()> {
        if known_bits > MAX_UID_BITS {
            return Err(Error::InvalidArgument(format!(
                "known_bits {} exceeds {}",
                known_bits, MAX_UID_BITS
            )));
        }
        self.clear_register_bits(Register::Coll, VALUES_AFTER_COLL)?;

        let retries_left = self.config.select_timeout_retries;
        Selector {
            device: self,
            uid,
            known_bits,
            level: 1,
            retries_left,
        }
        .run()
    }
}

impl Selector<'_, '_> {
    fn run(mut self) -> Result<()> {
        let mut state = SelectState::BuildFrame;
        loop {
            let next = match state {
                SelectState::BuildFrame => self.build_frame(),
                SelectState::AntiCollide(frame) => self.anticollide(frame),
                SelectState::Select(frame) => self.select(frame),
                SelectState::CascadeAdvance { frame, sak } => self.advance(frame, sak),
                SelectState::Done => return Ok(()),
                SelectState::Failed(e) => return Err(e),
            };
            state = next.unwrap_or_else(SelectState::Failed);
        }
    }

    fn uid_index(&self) -> usize {
        3 * (self.level as usize - 1)
    }

    fn build_frame(&mut self) -> Result<SelectState> {
        let sel = PiccCommand::select_for_level(self.level)
            .ok_or_else(|| Error::Internal(format!("no cascade level {}", self.level)))?;
        let index = self.uid_index();
        let use_cascade_tag = self.known_bits != 0
            && match self.level {
                1 => self.uid.size() > 4,
                2 => self.uid.size() > 7,
                _ => false,
            };

        let level_known = self.known_bits.saturating_sub(8 * index as u8);
        let room: u8 = if use_cascade_tag { 3 } else { 4 };
        let prefix_bits = level_known.min(room * 8);
        let prefix_len = prefix_bits.div_ceil(8) as usize;
        let prefix = &self.uid.raw()[index..index + prefix_len];

        let frame = SelectFrame::new(sel.code(), use_cascade_tag, prefix, prefix_bits)?;
        log::trace!(
            "cascade level {}: {} known bits{}",
            self.level,
            frame.known_bits(),
            if use_cascade_tag { " (CT)" } else { "" }
        );
        Ok(if frame.is_complete() {
            SelectState::Select(frame)
        } else {
            SelectState::AntiCollide(frame)
        })
    }

    fn anticollide(&mut self, mut frame: SelectFrame) -> Result<SelectState> {
        let tx = frame.anticollision().to_vec();
        let align = frame.tx_last_bits();
        let request = TransceiveRequest::transceive(&tx)
            .with_tx_last_bits(align)
            .with_rx_align(align)
            .expecting(frame.response_capacity());

        let exchange = match self.device.run_command(&request) {
            Ok(exchange) => exchange,
            Err(Error::Timeout) => return self.retry(SelectState::AntiCollide(frame)),
            Err(e) => return Err(e),
        };
        frame.merge_response(&exchange.response.data);

        if exchange.collision {
            let coll = self.device.read_register(Register::Coll)?;
            if coll & COLL_POS_NOT_VALID != 0 {
                return Err(Error::Collision);
            }
            let position = match coll & COLL_POS_MASK {
                0 => 32,
                p => p,
            };
            log::debug!("collision at bit {} of level {}", position, self.level);
            frame.resolve_collision(position)?;
            return Ok(if frame.is_complete() {
                SelectState::Select(frame)
            } else {
                SelectState::AntiCollide(frame)
            });
        }

        // UID remainder plus BCC
        if exchange.response.len() + 2 < frame.response_capacity() {
            return Err(Error::Communication);
        }
        frame.mark_complete();
        if !frame.bcc_matches() {
            log::debug!("BCC mismatch on level {}", self.level);
            return Err(Error::Communication);
        }
        Ok(SelectState::Select(frame))
    }

    fn select(&mut self, mut frame: SelectFrame) -> Result<SelectState> {
        let header = frame.select_header().to_vec();
        let crc = self.device.calculate_crc(&header)?;
        let tx = frame.select_with_crc(crc).to_vec();

        match self
            .device
            .communicate(&TransceiveRequest::transceive(&tx).expecting(3))
        {
            Ok(sak) => Ok(SelectState::CascadeAdvance { frame, sak }),
            Err(Error::Timeout) => self.retry(SelectState::Select(frame)),
            Err(e) => Err(e),
        }
    }

    fn advance(&mut self, frame: SelectFrame, sak: Response) -> Result<SelectState> {
        let index = self.uid_index();
        for (i, &byte) in frame.uid_bytes().iter().enumerate() {
            self.uid.set_byte(index + i, byte);
        }

        if sak.len() != 3 || sak.valid_bits != 0 {
            return Err(Error::Communication);
        }
        let crc = self.device.calculate_crc(&sak.data[..1])?;
        if sak.data[1..] != crc {
            return Err(Error::CrcMismatch);
        }

        let sak = sak.data[0];
        if sak & SAK_CASCADE_BIT == 0 {
            if frame.has_cascade_tag() {
                // CT announced more UID bytes than the SAK admits
                return Err(Error::Communication);
            }
            self.uid.complete((index + 4) as u8, sak);
            return Ok(SelectState::Done);
        }
        if self.level >= 3 {
            return Err(Error::Internal("SAK requests a fourth cascade level".into()));
        }
        self.level += 1;
        Ok(SelectState::BuildFrame)
    }

    /// Repeat `state` after a timeout, or reset the chip once the retry
    /// budget is spent.
    fn retry(&mut self, state: SelectState) -> Result<SelectState> {
        if self.retries_left == 0 {
            log::warn!("select timed out repeatedly, resetting MFRC522");
            self.device.reinitialize()?;
            return Err(Error::Timeout);
        }
        self.retries_left -= 1;
        log::debug!("select timeout, {} retries left", self.retries_left);
        Ok(state)
    }
}
