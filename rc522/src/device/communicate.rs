// rc522/src/device/communicate.rs
//! Command/IRQ engine: load the FIFO, start a PCD command, poll for
//! completion and collect the PICC answer.

use crate::constants::{FIFO_SIZE, MF_ACK};
use crate::device::handle::{Device, Initialized};
use crate::device::registers::{
    error_bits, irq, PcdCommand, Register, FIFO_FLUSH, FIFO_LEVEL_MASK, RX_LAST_BITS_MASK,
    START_SEND,
};
use crate::utils::{frame_to_hex, PollBudget};
use crate::{Error, Result};

/// One command round trip through the chip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransceiveRequest<'a> {
    pub command: PcdCommand,
    /// ComIrqReg bits that signal successful completion
    pub wait_irq: u8,
    pub send: &'a [u8],
    /// Valid bits in the last transmitted byte, 0 meaning all 8
    pub tx_last_bits: u8,
    /// Bit position where the first received bit is stored
    pub rx_align: u8,
    /// Receive capacity in bytes; 0 when no answer data is wanted
    pub capacity: usize,
    pub check_crc: bool,
}

impl<'a> TransceiveRequest<'a> {
    /// Transceive, completing on RxIRq or IdleIRq.
    pub fn transceive(send: &'a [u8]) -> Self {
        Self {
            command: PcdCommand::Transceive,
            wait_irq: irq::RX | irq::IDLE,
            send,
            tx_last_bits: 0,
            rx_align: 0,
            capacity: 0,
            check_crc: false,
        }
    }

    /// MFAuthent, completing on IdleIRq.
    pub fn authenticate(send: &'a [u8]) -> Self {
        Self {
            command: PcdCommand::MfAuthent,
            wait_irq: irq::IDLE,
            ..Self::transceive(send)
        }
    }

    pub fn with_tx_last_bits(mut self, bits: u8) -> Self {
        self.tx_last_bits = bits;
        self
    }

    pub fn with_rx_align(mut self, align: u8) -> Self {
        self.rx_align = align;
        self
    }

    pub fn expecting(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_crc_check(mut self, check: bool) -> Self {
        self.check_crc = check;
        self
    }

    /// BitFramingReg value: RxAlign[6:4], TxLastBits[2:0]
    pub fn bit_framing(&self) -> u8 {
        ((self.rx_align & 0x07) << 4) | (self.tx_last_bits & 0x07)
    }

    fn validate(&self) -> Result<()> {
        if self.tx_last_bits > 7 || self.rx_align > 7 {
            return Err(Error::InvalidArgument(format!(
                "bit framing out of range: tx_last_bits={} rx_align={}",
                self.tx_last_bits, self.rx_align
            )));
        }
        if self.send.len() > FIFO_SIZE {
            return Err(Error::InvalidArgument(format!(
                "{} bytes do not fit the {}-byte FIFO",
                self.send.len(),
                FIFO_SIZE
            )));
        }
        Ok(())
    }
}

/// Data returned by the PICC.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    pub data: Vec<u8>,
    /// Valid bits in the last received byte, 0 meaning all 8
    pub valid_bits: u8,
}

impl Response {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Single 4-bit 0xA answer.
    pub fn is_ack(&self) -> bool {
        self.data.len() == 1 && self.valid_bits == 4 && self.data[0] & 0x0F == MF_ACK
    }
}

/// Raw engine outcome. `collision` keeps the received prefix available to
/// the anticollision loop instead of failing the whole call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Exchange {
    pub response: Response,
    pub collision: bool,
}

impl Device<Initialized> {
    /// Execute one PCD command and return the PICC answer.
    ///
    /// A bit collision surfaces as `Error::Collision` after the FIFO has been
    /// drained; a timer expiry or an exhausted poll budget as
    /// `Error::Timeout`.
    pub fn communicate(&mut self, request: &TransceiveRequest<'_>) -> Result<Response> {
        let exchange = self.run_command(request)?;
        if exchange.collision {
            return Err(Error::Collision);
        }
        Ok(exchange.response)
    }

    /// Plain Transceive without framing adjustments or CRC verification.
    pub fn transceive(&mut self, send: &[u8], capacity: usize) -> Result<Response> {
        self.communicate(&TransceiveRequest::transceive(send).expecting(capacity))
    }

    pub(crate) fn run_command(&mut self, request: &TransceiveRequest<'_>) -> Result<Exchange> {
        request.validate()?;
        log::debug!(
            "PCD {:?} >> {}",
            request.command,
            frame_to_hex(request.send, request.tx_last_bits)
        );

        self.write_register(Register::Command, PcdCommand::Idle as u8)?;
        self.write_register(Register::ComIrq, irq::ALL)?;
        self.write_register(Register::FifoLevel, FIFO_FLUSH)?;
        self.write_register_burst(Register::FifoData, request.send)?;
        self.write_register(Register::BitFraming, request.bit_framing())?;
        self.write_register(Register::Command, request.command as u8)?;
        if request.command == PcdCommand::Transceive {
            self.set_register_bits(Register::BitFraming, START_SEND)?;
        }

        self.wait_for_irq(request.wait_irq)?;

        let errors = self.read_register(Register::Error)?;
        if errors & error_bits::FATAL != 0 {
            log::debug!("PCD {:?} failed, ErrorReg={:#04x}", request.command, errors);
            return Err(Error::Communication);
        }

        let mut response = Response::default();
        if request.capacity > 0 {
            let level = (self.read_register(Register::FifoLevel)? & FIFO_LEVEL_MASK) as usize;
            if level > request.capacity {
                return Err(Error::BufferTooSmall {
                    needed: level,
                    available: request.capacity,
                });
            }
            response.data = self.read_register_burst(Register::FifoData, level)?;
            response.valid_bits = self.read_register(Register::Control)? & RX_LAST_BITS_MASK;
            log::debug!(
                "PICC << {}",
                frame_to_hex(&response.data, response.valid_bits)
            );
        }

        if errors & error_bits::COLL != 0 {
            log::debug!("bit collision during {:?}", request.command);
            return Ok(Exchange {
                response,
                collision: true,
            });
        }

        if request.capacity > 0 && request.check_crc {
            self.verify_crc(&response)?;
        }

        Ok(Exchange {
            response,
            collision: false,
        })
    }

    fn wait_for_irq(&mut self, wait_irq: u8) -> Result<()> {
        let mut budget = PollBudget::new(self.config.irq_poll_budget);
        while budget.tick() {
            let pending = self.read_register(Register::ComIrq)?;
            if pending & wait_irq != 0 {
                return Ok(());
            }
            if pending & irq::TIMER != 0 {
                return Err(Error::Timeout);
            }
        }
        log::debug!("ComIrqReg poll budget exhausted");
        Err(Error::Timeout)
    }

    fn verify_crc(&mut self, response: &Response) -> Result<()> {
        let data = &response.data;
        if data.len() == 1 && response.valid_bits == 4 {
            return Err(Error::MifareNack);
        }
        if data.len() < 2 || response.valid_bits != 0 {
            return Err(Error::CrcMismatch);
        }
        let (payload, tail) = data.split_at(data.len() - 2);
        let expected = self.calculate_crc(payload)?;
        if tail != expected {
            return Err(Error::CrcMismatch);
        }
        Ok(())
    }
}
