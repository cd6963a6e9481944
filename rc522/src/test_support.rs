//! Test support helpers intended for use by unit and integration tests.
//!
//! `SimulatedCard` models an ISO/IEC 14443-3 type A PICC with MIFARE
//! memory, `SimulatedField` puts several of them in front of the antenna
//! and resolves their answers bit by bit, `ScriptedField` plays back a
//! fixed list of replies. All of them plug into `MockTransport`.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::constants::{CASCADE_TAG, MF_BLOCK_SIZE, UL_PAGE_SIZE};
use crate::device::{Device, Initialized};
use crate::protocol::{bcc, crc_a, PiccCommand};
use crate::types::MifareKey;
use crate::Result;

pub use crate::transport::mock::{MockTransport, RfField, RfReply};

/// MIFARE NAK: invalid operation
const NAK_INVALID: u8 = 0x04;
/// MIFARE NAK: CRC or parity error
const NAK_CRC: u8 = 0x05;

/// ISO/IEC 14443-3 PICC states (HALT and ACTIVE only, no `*` variants).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PiccState {
    Idle,
    Ready { level: usize },
    Active,
    Halt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    None,
    Write(u8),
    Value { command: u8, block: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Memory {
    Classic,
    Ultralight,
}

/// One simulated PICC.
#[derive(Debug, Clone)]
pub struct SimulatedCard {
    uid: Vec<u8>,
    sak: u8,
    atqa: [u8; 2],
    kind: Memory,
    memory: Vec<u8>,
    key_a: MifareKey,
    key_b: MifareKey,
    state: PiccState,
    authenticated_sector: Option<u8>,
    pending: Pending,
    transfer_buffer: Option<i32>,
}

impl SimulatedCard {
    fn new(uid: &[u8], sak: u8, atqa: [u8; 2], kind: Memory, memory_len: usize) -> Self {
        assert!(matches!(uid.len(), 4 | 7 | 10), "uid must be 4, 7 or 10 bytes");
        Self {
            uid: uid.to_vec(),
            sak,
            atqa,
            kind,
            memory: vec![0; memory_len],
            key_a: MifareKey::DEFAULT,
            key_b: MifareKey::DEFAULT,
            state: PiccState::Idle,
            authenticated_sector: None,
            pending: Pending::None,
            transfer_buffer: None,
        }
    }

    /// MIFARE Classic 1K: 64 blocks, SAK 0x08.
    ///
    /// Panics unless `uid` is 4, 7 or 10 bytes long (true for every
    /// constructor).
    pub fn mifare_1k(uid: &[u8]) -> Self {
        let atqa = if uid.len() == 4 { [0x04, 0x00] } else { [0x44, 0x00] };
        Self::new(uid, 0x08, atqa, Memory::Classic, 64 * MF_BLOCK_SIZE)
    }

    /// MIFARE Ultralight: 16 pages of 4 bytes, SAK 0x00, 7-byte UID.
    pub fn ultralight(uid: &[u8]) -> Self {
        Self::new(uid, 0x00, [0x44, 0x00], Memory::Ultralight, 16 * UL_PAGE_SIZE)
    }

    /// Any PICC with the given SAK and ATQA and no memory commands.
    pub fn with_sak(uid: &[u8], sak: u8, atqa: [u8; 2]) -> Self {
        Self::new(uid, sak, atqa, Memory::Classic, 64 * MF_BLOCK_SIZE)
    }

    pub fn with_keys(mut self, key_a: MifareKey, key_b: MifareKey) -> Self {
        self.key_a = key_a;
        self.key_b = key_b;
        self
    }

    pub fn uid(&self) -> &[u8] {
        &self.uid
    }

    pub fn state(&self) -> PiccState {
        self.state
    }

    pub fn block(&self, block: u8) -> [u8; MF_BLOCK_SIZE] {
        let start = block as usize * MF_BLOCK_SIZE;
        let mut out = [0u8; MF_BLOCK_SIZE];
        out.copy_from_slice(&self.memory[start..start + MF_BLOCK_SIZE]);
        out
    }

    pub fn set_block(&mut self, block: u8, data: [u8; MF_BLOCK_SIZE]) {
        let start = block as usize * MF_BLOCK_SIZE;
        self.memory[start..start + MF_BLOCK_SIZE].copy_from_slice(&data);
    }

    pub fn page(&self, page: u8) -> [u8; UL_PAGE_SIZE] {
        let start = page as usize * UL_PAGE_SIZE;
        let mut out = [0u8; UL_PAGE_SIZE];
        out.copy_from_slice(&self.memory[start..start + UL_PAGE_SIZE]);
        out
    }

    /// Format `block` as a value block holding `value`.
    pub fn set_value_block(&mut self, block: u8, value: i32) {
        self.set_block(block, value_block(value, block));
    }

    /// Decode `block` as a value block.
    pub fn value(&self, block: u8) -> Option<i32> {
        let b = self.block(block);
        let v = i32::from_le_bytes([b[0], b[1], b[2], b[3]]);
        let inv = i32::from_le_bytes([b[4], b[5], b[6], b[7]]);
        let copy = i32::from_le_bytes([b[8], b[9], b[10], b[11]]);
        (v == copy && v == !inv && b[12] == !b[13] && b[12] == b[14] && b[13] == b[15])
            .then_some(v)
    }

    /// Number of cascade levels needed for this UID.
    fn levels(&self) -> usize {
        match self.uid.len() {
            4 => 1,
            7 => 2,
            _ => 3,
        }
    }

    /// The five bytes (UID field + BCC) this PICC sends at `level` (0-based).
    fn level_data(&self, level: usize) -> [u8; 5] {
        let last = level + 1 == self.levels();
        let mut field = [0u8; 4];
        if last {
            field.copy_from_slice(&self.uid[3 * level..3 * level + 4]);
        } else {
            field[0] = CASCADE_TAG;
            field[1..].copy_from_slice(&self.uid[3 * level..3 * level + 3]);
        }
        [field[0], field[1], field[2], field[3], bcc(&field)]
    }

    fn sak_for_level(&self, level: usize) -> u8 {
        if level + 1 == self.levels() {
            self.sak
        } else {
            crate::constants::SAK_CASCADE_BIT
        }
    }

    fn reply(&mut self, frame: &[u8], tx_last_bits: u8) -> RfReply {
        if frame.len() == 1 && tx_last_bits == 7 {
            return self.short_frame(frame[0]);
        }
        match self.state {
            PiccState::Ready { level } => self.anticollision(level, frame),
            PiccState::Active => self.active(frame),
            PiccState::Idle | PiccState::Halt => RfReply::Silent,
        }
    }

    fn short_frame(&mut self, command: u8) -> RfReply {
        let woken = match (command, self.state) {
            (0x26, PiccState::Idle) => true,
            (0x52, PiccState::Idle | PiccState::Halt) => true,
            _ => false,
        };
        if woken {
            self.state = PiccState::Ready { level: 0 };
            self.authenticated_sector = None;
            self.pending = Pending::None;
            RfReply::data(self.atqa.to_vec(), 0)
        } else {
            if matches!(self.state, PiccState::Ready { .. } | PiccState::Active) {
                self.state = PiccState::Idle;
            }
            RfReply::Silent
        }
    }

    fn anticollision(&mut self, level: usize, frame: &[u8]) -> RfReply {
        let expected_sel = [0x93, 0x95, 0x97][level];
        if frame.len() < 2 || frame[0] != expected_sel {
            self.state = PiccState::Idle;
            return RfReply::Silent;
        }
        let data = self.level_data(level);
        let nvb = frame[1];

        if nvb == 0x70 {
            let crc_ok = frame.len() == 9 && crc_a(&frame[..7]) == frame[7..9];
            if !crc_ok || frame[2..7] != data {
                // not addressed: stay READY for another SELECT
                return RfReply::Silent;
            }
            let sak = self.sak_for_level(level);
            self.state = if level + 1 == self.levels() {
                PiccState::Active
            } else {
                PiccState::Ready { level: level + 1 }
            };
            let crc = crc_a(&[sak]);
            return RfReply::data(vec![sak, crc[0], crc[1]], 0);
        }

        let known = (((nvb >> 4) as usize).saturating_sub(2)) * 8 + (nvb & 0x0F) as usize;
        if known >= 40 {
            return RfReply::Silent;
        }
        for bit in 0..known {
            let sent = frame.get(2 + bit / 8).copied().unwrap_or(0);
            if (sent >> (bit % 8)) & 1 != (data[bit / 8] >> (bit % 8)) & 1 {
                return RfReply::Silent;
            }
        }

        let mut answer = data[known / 8..].to_vec();
        answer[0] &= !((1u8 << (known % 8)) - 1);
        RfReply::data(answer, 0)
    }

    fn active(&mut self, frame: &[u8]) -> RfReply {
        if frame.len() < 3 || crc_a(&frame[..frame.len() - 2]) != frame[frame.len() - 2..] {
            return nak(NAK_CRC);
        }
        let payload = &frame[..frame.len() - 2];

        match std::mem::replace(&mut self.pending, Pending::None) {
            Pending::Write(block) if payload.len() == MF_BLOCK_SIZE => {
                let mut data = [0u8; MF_BLOCK_SIZE];
                data.copy_from_slice(payload);
                self.set_block(block, data);
                return RfReply::ack();
            }
            Pending::Value { command, block } if payload.len() == 4 => {
                let operand = i32::from_le_bytes([payload[0], payload[1], payload[2], payload[3]]);
                let Some(current) = self.value(block) else {
                    return RfReply::Silent;
                };
                self.transfer_buffer = Some(match command {
                    0xC0 => current.wrapping_sub(operand),
                    0xC1 => current.wrapping_add(operand),
                    _ => current,
                });
                // no answer to the operand
                return RfReply::Silent;
            }
            Pending::None => {}
            _ => return nak(NAK_INVALID),
        }

        let command = payload[0];
        let arg = payload.get(1).copied().unwrap_or(0);
        match PiccCommand::from_code(command) {
            Some(PiccCommand::HltA) if arg == 0 => {
                self.state = PiccState::Halt;
                self.authenticated_sector = None;
                RfReply::Silent
            }
            Some(PiccCommand::MfRead) => self.read(arg),
            Some(PiccCommand::MfWrite) if self.may_access(arg) => {
                self.pending = Pending::Write(arg);
                RfReply::ack()
            }
            Some(PiccCommand::UlWrite) if self.kind == Memory::Ultralight && payload.len() == 6 => {
                let start = arg as usize * UL_PAGE_SIZE;
                if start + UL_PAGE_SIZE > self.memory.len() {
                    return nak(NAK_INVALID);
                }
                self.memory[start..start + UL_PAGE_SIZE].copy_from_slice(&payload[2..6]);
                RfReply::ack()
            }
            Some(
                PiccCommand::MfDecrement | PiccCommand::MfIncrement | PiccCommand::MfRestore,
            ) if self.may_access(arg) && self.value(arg).is_some() => {
                self.pending = Pending::Value { command, block: arg };
                RfReply::ack()
            }
            Some(PiccCommand::MfTransfer) if self.may_access(arg) => {
                match self.transfer_buffer.take() {
                    Some(v) => {
                        self.set_value_block(arg, v);
                        RfReply::ack()
                    }
                    None => nak(NAK_INVALID),
                }
            }
            _ => nak(NAK_INVALID),
        }
    }

    fn may_access(&self, block: u8) -> bool {
        match self.kind {
            Memory::Classic => {
                (block as usize) < self.memory.len() / MF_BLOCK_SIZE
                    && self.authenticated_sector == Some(block / 4)
            }
            Memory::Ultralight => false,
        }
    }

    fn read(&self, block: u8) -> RfReply {
        let data = match self.kind {
            Memory::Classic => {
                if !self.may_access(block) {
                    return nak(NAK_INVALID);
                }
                self.block(block).to_vec()
            }
            Memory::Ultralight => {
                // four pages, rolling over at the end of memory
                let pages = self.memory.len() / UL_PAGE_SIZE;
                if block as usize >= pages {
                    return nak(NAK_INVALID);
                }
                (0..4)
                    .flat_map(|i| self.page(((block as usize + i) % pages) as u8))
                    .collect()
            }
        };
        let mut answer = data;
        let crc = crc_a(&answer);
        answer.extend_from_slice(&crc);
        RfReply::data(answer, 0)
    }

    fn authenticate(&mut self, command: u8, block: u8, key: &[u8], serial: &[u8]) -> bool {
        if self.state != PiccState::Active || self.kind != Memory::Classic {
            return false;
        }
        let expected = match command {
            0x60 => &self.key_a,
            0x61 => &self.key_b,
            _ => return false,
        };
        if key != expected.as_bytes() || serial != &self.uid[..4] {
            self.authenticated_sector = None;
            return false;
        }
        self.authenticated_sector = Some(block / 4);
        true
    }

    fn power_cycle(&mut self) {
        self.state = PiccState::Idle;
        self.authenticated_sector = None;
        self.pending = Pending::None;
        self.transfer_buffer = None;
    }
}

fn nak(code: u8) -> RfReply {
    RfReply::data(vec![code & 0x0F], 4)
}

/// MIFARE value block layout: value, !value, value, addr, !addr, addr, !addr.
pub fn value_block(value: i32, address: u8) -> [u8; MF_BLOCK_SIZE] {
    let v = value.to_le_bytes();
    let inv = (!value).to_le_bytes();
    let mut b = [0u8; MF_BLOCK_SIZE];
    b[0..4].copy_from_slice(&v);
    b[4..8].copy_from_slice(&inv);
    b[8..12].copy_from_slice(&v);
    b[12..].copy_from_slice(&[address, !address, address, !address]);
    b
}

/// Cards in front of the antenna. Clones share the same cards so tests
/// can inspect them after handing the field to a `MockTransport`.
#[derive(Debug, Clone, Default)]
pub struct SimulatedField {
    cards: Rc<RefCell<Vec<SimulatedCard>>>,
}

impl SimulatedField {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn single(card: SimulatedCard) -> Self {
        Self::with_cards(vec![card])
    }

    pub fn with_cards(cards: Vec<SimulatedCard>) -> Self {
        Self {
            cards: Rc::new(RefCell::new(cards)),
        }
    }

    /// Snapshot of card `index`.
    pub fn card(&self, index: usize) -> SimulatedCard {
        self.cards.borrow()[index].clone()
    }

    pub fn update_card(&self, index: usize, f: impl FnOnce(&mut SimulatedCard)) {
        f(&mut self.cards.borrow_mut()[index]);
    }
}

impl RfField for SimulatedField {
    fn transceive(&mut self, frame: &[u8], tx_last_bits: u8) -> RfReply {
        let mut answers: Vec<Vec<u8>> = Vec::new();
        let mut single = None;
        for card in self.cards.borrow_mut().iter_mut() {
            match card.reply(frame, tx_last_bits) {
                RfReply::Silent => {}
                RfReply::Data { bytes, valid_bits } => {
                    single = Some(valid_bits);
                    answers.push(bytes);
                }
                other => return other,
            }
        }

        match answers.len() {
            0 => RfReply::Silent,
            1 => RfReply::data(answers.remove(0), single.unwrap_or(0)),
            _ => superpose(frame, answers, single.unwrap_or(0)),
        }
    }

    fn authenticate(&mut self, command: u8, block: u8, key: &[u8], serial: &[u8]) -> bool {
        self.cards
            .borrow_mut()
            .iter_mut()
            .any(|c| c.authenticate(command, block, key, serial))
    }

    fn power_cycle(&mut self) {
        for card in self.cards.borrow_mut().iter_mut() {
            card.power_cycle();
        }
    }
}

/// Combine simultaneous answers the way Manchester coding does: identical
/// bits come through, the first differing bit is a collision.
fn superpose(frame: &[u8], answers: Vec<Vec<u8>>, valid_bits: u8) -> RfReply {
    let len = answers.iter().map(Vec::len).max().unwrap_or(0);
    let first = &answers[0];
    let bit_of = |a: &Vec<u8>, bit: usize| (a.get(bit / 8).copied().unwrap_or(0) >> (bit % 8)) & 1;

    let collided = (0..len * 8).find(|&bit| {
        let b = bit_of(first, bit);
        answers.iter().any(|a| bit_of(a, bit) != b)
    });
    let Some(bit) = collided else {
        return RfReply::data(first.clone(), valid_bits);
    };

    // bits before the answer: whole bytes already known in the level
    let level_offset = if frame.len() >= 2 && matches!(frame[0], 0x93 | 0x95 | 0x97) {
        ((frame[1] >> 4) as usize).saturating_sub(2) * 8
    } else {
        0
    };
    let position = level_offset + bit + 1;

    let byte = bit / 8;
    let mut bytes: Vec<u8> = (0..=byte).map(|i| first.get(i).copied().unwrap_or(0)).collect();
    // bits from the collision on are not valid
    bytes[byte] &= (1u8 << (bit % 8)) - 1;
    RfReply::Collision {
        bytes,
        valid_bits: ((bit % 8) + 1) as u8 % 8,
        position: u8::try_from(position).unwrap_or(u8::MAX),
    }
}

/// Replays queued replies and records what was sent. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct ScriptedField {
    inner: Rc<RefCell<Script>>,
}

#[derive(Debug, Default)]
struct Script {
    replies: VecDeque<RfReply>,
    frames: Vec<Vec<u8>>,
    tx_last_bits: Vec<u8>,
    accept_auth: bool,
}

impl ScriptedField {
    pub fn new(replies: Vec<RfReply>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Script {
                replies: replies.into(),
                ..Default::default()
            })),
        }
    }

    pub fn push(&self, reply: RfReply) {
        self.inner.borrow_mut().replies.push_back(reply);
    }

    pub fn accept_auth(&self, accept: bool) {
        self.inner.borrow_mut().accept_auth = accept;
    }

    pub fn frames(&self) -> Vec<Vec<u8>> {
        self.inner.borrow().frames.clone()
    }

    pub fn tx_last_bits(&self) -> Vec<u8> {
        self.inner.borrow().tx_last_bits.clone()
    }
}

impl RfField for ScriptedField {
    fn transceive(&mut self, frame: &[u8], tx_last_bits: u8) -> RfReply {
        let mut script = self.inner.borrow_mut();
        script.frames.push(frame.to_vec());
        script.tx_last_bits.push(tx_last_bits);
        script.replies.pop_front().unwrap_or(RfReply::Silent)
    }

    fn authenticate(&mut self, _command: u8, _block: u8, _key: &[u8], _serial: &[u8]) -> bool {
        self.inner.borrow().accept_auth
    }
}

/// A fresh simulator and a probe clone sharing its state.
#[doc(hidden)]
pub fn mock_pair() -> (MockTransport, MockTransport) {
    let mock = MockTransport::new();
    let probe = mock.clone();
    (mock, probe)
}

/// Create and initialize a Device backed by a simulator with an empty
/// field; the returned probe shares the simulator state.
#[doc(hidden)]
pub fn initialized_device() -> Result<(Device<Initialized>, MockTransport)> {
    device_with_field(SimulatedField::empty())
}

/// Like `initialized_device`, with `field` in front of the antenna.
#[doc(hidden)]
pub fn device_with_field(
    field: impl RfField + 'static,
) -> Result<(Device<Initialized>, MockTransport)> {
    let mock = MockTransport::with_field(field);
    let probe = mock.clone();
    let device = Device::new_with_transport(Box::new(mock)).initialize()?;
    Ok((device, probe))
}
