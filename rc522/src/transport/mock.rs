// rc522/src/transport/mock.rs

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::constants::FIFO_SIZE;
use crate::device::registers::{
    error_bits, irq, PcdCommand, Register, COLL_POS_NOT_VALID, FIFO_FLUSH, MF_CRYPTO1_ON,
    RX_LAST_BITS_MASK, START_SEND, TX_ANTENNA,
};
use crate::protocol::crc_a;
use crate::transport::traits::Transport;
use crate::{Error, Result};

/// What the RF side does with one transmitted frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RfReply {
    /// Nobody answers; the receive timer expires.
    Silent,
    /// A clean answer, laid out as the chip stores it in the FIFO.
    Data { bytes: Vec<u8>, valid_bits: u8 },
    /// Several PICCs answered and disagreed at 1-based bit `position` of
    /// the cascade level. Positions outside 1..=32 flag CollPosNotValid.
    Collision {
        bytes: Vec<u8>,
        valid_bits: u8,
        position: u8,
    },
    /// Answer received with the given ErrorReg bits set.
    Error(u8),
    /// The chip never raises an interrupt.
    Stall,
}

impl RfReply {
    pub fn data(bytes: Vec<u8>, valid_bits: u8) -> Self {
        RfReply::Data { bytes, valid_bits }
    }

    /// 4-bit MIFARE ACK.
    pub fn ack() -> Self {
        RfReply::data(vec![crate::constants::MF_ACK], 4)
    }
}

/// The antenna field and whatever PICCs are in it.
pub trait RfField {
    /// Handle one frame sent by the chip. `tx_last_bits` is the number of
    /// valid bits in the last byte (0 meaning 8).
    fn transceive(&mut self, frame: &[u8], tx_last_bits: u8) -> RfReply;

    /// MFAuthent with `command` (0x60/0x61), `block`, `key` and the four
    /// serial bytes. Returns whether the three-pass handshake succeeds.
    fn authenticate(&mut self, _command: u8, _block: u8, _key: &[u8], _serial: &[u8]) -> bool {
        false
    }

    /// Chip reset drops the field; PICCs lose power.
    fn power_cycle(&mut self) {}
}

/// Register reset values (datasheet section 9.3).
fn reset_registers() -> [u8; 64] {
    let mut regs = [0u8; 64];
    let defaults = [
        (Register::Command, 0x20),
        (Register::ComIEn, 0x80),
        (Register::ComIrq, 0x14),
        (Register::Status1, 0x21),
        (Register::WaterLevel, 0x08),
        (Register::Control, 0x10),
        (Register::Coll, 0xA0),
        (Register::Mode, 0x3F),
        (Register::TxControl, 0x80),
        (Register::TxSel, 0x10),
        (Register::RxSel, 0x84),
        (Register::RxThreshold, 0x84),
        (Register::Demod, 0x4D),
        (Register::MfTx, 0x62),
        (Register::SerialSpeed, 0xEB),
        (Register::CrcResultMsb, 0xFF),
        (Register::CrcResultLsb, 0xFF),
        (Register::ModWidth, 0x26),
        (Register::RfCfg, 0x48),
        (Register::GsN, 0x88),
        (Register::CwGsP, 0x20),
        (Register::ModGsP, 0x20),
        (Register::Version, 0x92),
    ];
    for (reg, value) in defaults {
        regs[reg.index() as usize] = value;
    }
    regs
}

struct SimulatedChip {
    regs: [u8; 64],
    fifo: VecDeque<u8>,
    field: Option<Box<dyn RfField>>,
    cs_asserted: bool,
    cs_violations: usize,
    selects: usize,
    deselects: usize,
    exchanges: usize,
    failing_exchanges: usize,
    resets: usize,
    rf_frames: Vec<Vec<u8>>,
    last_auth: Option<Vec<u8>>,
    stall_crc: bool,
}

impl SimulatedChip {
    fn new() -> Self {
        Self {
            regs: reset_registers(),
            fifo: VecDeque::with_capacity(FIFO_SIZE),
            field: None,
            cs_asserted: false,
            cs_violations: 0,
            selects: 0,
            deselects: 0,
            exchanges: 0,
            failing_exchanges: 0,
            resets: 0,
            rf_frames: Vec::new(),
            last_auth: None,
            stall_crc: false,
        }
    }

    fn reg(&self, reg: Register) -> u8 {
        self.regs[reg.index() as usize]
    }

    fn reg_mut(&mut self, reg: Register) -> &mut u8 {
        &mut self.regs[reg.index() as usize]
    }

    fn power_on_reset(&mut self) {
        self.regs = reset_registers();
        self.fifo.clear();
    }

    fn read(&mut self, address: u8) -> u8 {
        let Some(reg) = Register::from_address(address) else {
            return 0;
        };
        match reg {
            Register::FifoData => self.fifo.pop_front().unwrap_or(0),
            Register::FifoLevel => self.fifo.len() as u8,
            other => self.reg(other),
        }
    }

    fn write(&mut self, address: u8, value: u8) {
        let Some(reg) = Register::from_address(address) else {
            return;
        };
        match reg {
            Register::ComIrq | Register::DivIrq => {
                let bits = value & irq::ALL;
                let slot = self.reg_mut(reg);
                if value & irq::SET1 != 0 {
                    *slot |= bits;
                } else {
                    *slot &= !bits;
                }
            }
            Register::FifoLevel => {
                if value & FIFO_FLUSH != 0 {
                    self.fifo.clear();
                    *self.reg_mut(Register::Error) &= !error_bits::BUFFER_OVFL;
                }
            }
            Register::FifoData => {
                if self.fifo.len() < FIFO_SIZE {
                    self.fifo.push_back(value);
                } else {
                    *self.reg_mut(Register::Error) |= error_bits::BUFFER_OVFL;
                }
            }
            Register::Command => {
                // commands complete synchronously in the simulator
                *self.reg_mut(Register::Command) = value;
                self.execute(value & 0x0F);
            }
            Register::BitFraming => {
                *self.reg_mut(Register::BitFraming) = value & !START_SEND;
                let transceiving = PcdCommand::from_bits(self.reg(Register::Command))
                    == Some(PcdCommand::Transceive);
                if value & START_SEND != 0 && transceiving {
                    self.transmit(value & RX_LAST_BITS_MASK);
                }
            }
            other => *self.reg_mut(other) = value,
        }
    }

    fn execute(&mut self, command: u8) {
        match PcdCommand::from_bits(command) {
            Some(PcdCommand::CalcCrc) => {
                if self.stall_crc {
                    return;
                }
                let data: Vec<u8> = self.fifo.drain(..).collect();
                let [lsb, msb] = crc_a(&data);
                *self.reg_mut(Register::CrcResultLsb) = lsb;
                *self.reg_mut(Register::CrcResultMsb) = msb;
                *self.reg_mut(Register::DivIrq) |= irq::CRC;
            }
            Some(PcdCommand::MfAuthent) => self.authenticate(),
            Some(PcdCommand::SoftReset) => self.power_on_reset(),
            _ => {}
        }
    }

    fn authenticate(&mut self) {
        let frame: Vec<u8> = self.fifo.drain(..).collect();
        self.last_auth = Some(frame.clone());
        let accepted = frame.len() == 12
            && self
                .field
                .as_mut()
                .is_some_and(|f| f.authenticate(frame[0], frame[1], &frame[2..8], &frame[8..12]));

        if accepted {
            *self.reg_mut(Register::Status2) |= MF_CRYPTO1_ON;
            *self.reg_mut(Register::ComIrq) |= irq::IDLE;
            *self.reg_mut(Register::Command) &= !0x0F;
        } else {
            *self.reg_mut(Register::ComIrq) |= irq::TIMER;
        }
    }

    fn transmit(&mut self, tx_last_bits: u8) {
        let frame: Vec<u8> = self.fifo.drain(..).collect();
        self.rf_frames.push(frame.clone());
        *self.reg_mut(Register::Error) = 0;
        *self.reg_mut(Register::ComIrq) |= irq::TX;

        let antenna_on = self.reg(Register::TxControl) & TX_ANTENNA == TX_ANTENNA;
        let reply = match self.field.as_mut() {
            Some(field) if antenna_on => field.transceive(&frame, tx_last_bits),
            _ => RfReply::Silent,
        };

        match reply {
            RfReply::Silent => *self.reg_mut(Register::ComIrq) |= irq::TIMER,
            RfReply::Data { bytes, valid_bits } => {
                self.receive(&bytes, valid_bits);
                *self.reg_mut(Register::ComIrq) |= irq::RX;
            }
            RfReply::Collision {
                bytes,
                valid_bits,
                position,
            } => {
                self.receive(&bytes, valid_bits);
                let coll = if position == 0 || position > 32 {
                    COLL_POS_NOT_VALID
                } else {
                    position & 0x1F
                };
                let keep = self.reg(Register::Coll) & 0x80;
                *self.reg_mut(Register::Coll) = keep | coll;
                *self.reg_mut(Register::Error) |= error_bits::COLL;
                *self.reg_mut(Register::ComIrq) |= irq::RX | irq::ERR;
            }
            RfReply::Error(flags) => {
                *self.reg_mut(Register::Error) |= flags;
                *self.reg_mut(Register::ComIrq) |= irq::RX | irq::ERR;
            }
            RfReply::Stall => {}
        }
    }

    fn receive(&mut self, bytes: &[u8], valid_bits: u8) {
        self.fifo.clear();
        self.fifo.extend(bytes.iter().take(FIFO_SIZE));
        let control = self.reg(Register::Control) & !RX_LAST_BITS_MASK;
        *self.reg_mut(Register::Control) = control | (valid_bits & RX_LAST_BITS_MASK);
    }
}

/// Register-level MFRC522 simulator behind the `Transport` boundary.
///
/// It decodes the SPI address convention, keeps a register file and FIFO,
/// runs CalcCRC, Transceive and MFAuthent, and forwards RF frames to an
/// `RfField`. Clones share the same chip, so a clone kept by the test acts
/// as a probe after the other one is boxed into a `Device`.
#[derive(Clone)]
pub struct MockTransport {
    chip: Rc<RefCell<SimulatedChip>>,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let chip = self.chip.borrow();
        f.debug_struct("MockTransport")
            .field("cs_asserted", &chip.cs_asserted)
            .field("exchanges", &chip.exchanges)
            .field("resets", &chip.resets)
            .field("rf_frames", &chip.rf_frames.len())
            .finish()
    }
}

impl MockTransport {
    /// A chip with an empty field.
    pub fn new() -> Self {
        Self {
            chip: Rc::new(RefCell::new(SimulatedChip::new())),
        }
    }

    pub fn with_field(field: impl RfField + 'static) -> Self {
        let mock = Self::new();
        mock.set_field(field);
        mock
    }

    pub fn set_field(&self, field: impl RfField + 'static) {
        self.chip.borrow_mut().field = Some(Box::new(field));
    }

    /// Current register content, without read side effects.
    pub fn register(&self, reg: Register) -> u8 {
        match reg {
            Register::FifoLevel => self.chip.borrow().fifo.len() as u8,
            other => self.chip.borrow().reg(other),
        }
    }

    /// Poke a register directly, bypassing write semantics.
    pub fn set_register(&self, reg: Register, value: u8) {
        *self.chip.borrow_mut().reg_mut(reg) = value;
    }

    pub fn resets(&self) -> usize {
        self.chip.borrow().resets
    }

    pub fn exchange_count(&self) -> usize {
        self.chip.borrow().exchanges
    }

    /// Frames the chip put on air, oldest first.
    pub fn rf_frames(&self) -> Vec<Vec<u8>> {
        self.chip.borrow().rf_frames.clone()
    }

    /// FIFO content of the last MFAuthent command.
    pub fn last_auth(&self) -> Option<Vec<u8>> {
        self.chip.borrow().last_auth.clone()
    }

    /// Keep the CRC coprocessor from ever finishing.
    pub fn stall_crc(&self, stall: bool) {
        self.chip.borrow_mut().stall_crc = stall;
    }

    /// Make the next `n` exchanges fail at the transport level.
    pub fn fail_next_exchanges(&self, n: usize) {
        self.chip.borrow_mut().failing_exchanges = n;
    }

    /// True when every select was paired with a deselect and no exchange
    /// ran outside a select.
    pub fn cs_balanced(&self) -> bool {
        let chip = self.chip.borrow();
        !chip.cs_asserted && chip.cs_violations == 0 && chip.selects == chip.deselects
    }

    pub fn cs_asserted(&self) -> bool {
        self.chip.borrow().cs_asserted
    }
}

impl Transport for MockTransport {
    fn select(&mut self) -> Result<()> {
        let mut chip = self.chip.borrow_mut();
        if chip.cs_asserted {
            chip.cs_violations += 1;
        }
        chip.cs_asserted = true;
        chip.selects += 1;
        Ok(())
    }

    fn deselect(&mut self) -> Result<()> {
        let mut chip = self.chip.borrow_mut();
        if !chip.cs_asserted {
            chip.cs_violations += 1;
        }
        chip.cs_asserted = false;
        chip.deselects += 1;
        Ok(())
    }

    fn exchange(&mut self, tx: &[u8]) -> Result<Vec<u8>> {
        let mut chip = self.chip.borrow_mut();
        if !chip.cs_asserted {
            chip.cs_violations += 1;
        }
        if chip.failing_exchanges > 0 {
            chip.failing_exchanges -= 1;
            return Err(Error::Transport("simulated SPI fault".into()));
        }
        chip.exchanges += 1;

        let mut rx = vec![0u8; tx.len()];
        let Some(&first) = tx.first() else {
            return Ok(rx);
        };
        if first & 0x80 != 0 {
            // byte i+1 clocks out the register addressed by byte i
            for i in 0..tx.len() - 1 {
                rx[i + 1] = chip.read(tx[i]);
            }
        } else {
            for &value in &tx[1..] {
                chip.write(first, value);
            }
        }
        Ok(rx)
    }

    fn reset(&mut self) -> Result<()> {
        let mut chip = self.chip.borrow_mut();
        chip.resets += 1;
        chip.power_on_reset();
        if let Some(field) = chip.field.as_mut() {
            field.power_cycle();
        }
        Ok(())
    }
}
