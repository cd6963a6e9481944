// Shared helpers for the integration tests. Each test file pulls this in
// with `#[path = "../common/mod.rs"] mod common;`.
#![allow(dead_code)]

pub mod fixtures;

pub use fixtures::*;

use rc522::device::{Device, Initialized};
use rc522::test_support::{self, MockTransport, SimulatedCard, SimulatedField};
use rc522::{KeyType, MifareKey, Uid};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Initialized device with `cards` in the field. Returns the simulator
/// probe and a handle on the cards.
pub fn field_device(
    cards: Vec<SimulatedCard>,
) -> (Device<Initialized>, MockTransport, SimulatedField) {
    init_logger();
    let field = SimulatedField::with_cards(cards);
    let (device, probe) = test_support::device_with_field(field.clone()).unwrap();
    (device, probe, field)
}

/// A selected MIFARE 1K card authenticated for the sector of `block`.
pub fn authenticated_1k(block: u8) -> (Device<Initialized>, SimulatedField, Uid) {
    let (mut device, _probe, field) = field_device(vec![SimulatedCard::mifare_1k(&SINGLE_UID)]);
    let card = device.poll_card().unwrap();
    device
        .authenticate(KeyType::A, block, &MifareKey::DEFAULT, card.uid())
        .unwrap();
    (device, field, *card.uid())
}
