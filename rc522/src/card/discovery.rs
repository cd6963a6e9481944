// rc522/src/card/discovery.rs
//! REQA / WUPA / HLTA and the card-present helpers.

use crate::card::Card;
use crate::device::communicate::TransceiveRequest;
use crate::device::registers::{Register, VALUES_AFTER_COLL};
use crate::device::{Device, Initialized};
use crate::protocol::PiccCommand;
use crate::types::{Atqa, Uid};
use crate::{Error, Result};

/// REQA and WUPA are 7-bit short frames.
const SHORT_FRAME_BITS: u8 = 7;

impl Device<Initialized> {
    /// REQA: invite PICCs in IDLE state. Returns the ATQA.
    pub fn request_a(&mut self) -> Result<Atqa> {
        self.request_or_wakeup(PiccCommand::ReqA)
    }

    /// WUPA: invite PICCs in IDLE and HALT state. Returns the ATQA.
    pub fn wakeup_a(&mut self) -> Result<Atqa> {
        self.request_or_wakeup(PiccCommand::WupA)
    }

    fn request_or_wakeup(&mut self, command: PiccCommand) -> Result<Atqa> {
        self.clear_register_bits(Register::Coll, VALUES_AFTER_COLL)?;
        let frame = [command.code()];
        let request = TransceiveRequest::transceive(&frame)
            .with_tx_last_bits(SHORT_FRAME_BITS)
            .expecting(2);
        let response = self.communicate(&request)?;
        if response.len() != 2 || response.valid_bits != 0 {
            log::debug!(
                "{:?}: malformed ATQA ({} bytes, {} valid bits)",
                command,
                response.len(),
                response.valid_bits
            );
            return Err(Error::Communication);
        }
        Ok(Atqa::from_bytes([response.data[0], response.data[1]]))
    }

    /// True when a PICC in IDLE state answers REQA. Halted cards stay
    /// silent.
    pub fn is_new_card_present(&mut self) -> bool {
        self.request_a().is_ok()
    }

    /// Select whichever card wins anticollision and return it.
    pub fn read_card_serial(&mut self) -> Result<Card> {
        let mut uid = Uid::new();
        self.select(&mut uid, 0)?;
        log::debug!("selected {} ({})", uid.to_hex(), uid.picc_type());
        Ok(Card::new(uid))
    }

    /// HLTA: put the selected PICC into HALT. Success is signalled by
    /// silence, so a timeout is the expected outcome.
    pub fn halt_a(&mut self) -> Result<()> {
        let mut frame = [PiccCommand::HltA.code(), 0x00, 0x00, 0x00];
        let crc = self.calculate_crc(&frame[..2])?;
        frame[2..].copy_from_slice(&crc);

        match self.communicate(&TransceiveRequest::transceive(&frame)) {
            Err(Error::Timeout) => Ok(()),
            Ok(_) => Err(Error::Communication),
            Err(e) => Err(e),
        }
    }
}
