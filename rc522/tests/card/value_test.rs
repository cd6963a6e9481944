#[path = "../common/mod.rs"]
mod common;

use common::*;
use rc522::test_support::value_block;
use rc522::Error;

#[test]
fn increment_then_transfer() {
    let (mut device, field, _uid) = authenticated_1k(4);
    field.update_card(0, |c| c.set_value_block(5, 100));

    device.increment(5, 25).unwrap();
    // nothing reaches memory before TRANSFER
    assert_eq!(field.card(0).value(5), Some(100));
    device.transfer(5).unwrap();
    assert_eq!(field.card(0).value(5), Some(125));
}

#[test]
fn decrement_into_another_block() {
    let (mut device, field, _uid) = authenticated_1k(4);
    field.update_card(0, |c| c.set_value_block(5, 10));

    device.decrement(5, 30).unwrap();
    device.transfer(6).unwrap();
    assert_eq!(field.card(0).value(6), Some(-20));
    assert_eq!(field.card(0).block(6), value_block(-20, 6));
    assert_eq!(field.card(0).value(5), Some(10));
}

#[test]
fn restore_copies_a_value_block() {
    let (mut device, field, _uid) = authenticated_1k(4);
    field.update_card(0, |c| c.set_value_block(4, 7_000));

    device.restore(4).unwrap();
    device.transfer(6).unwrap();
    assert_eq!(field.card(0).value(6), Some(7_000));
}

#[test]
fn value_command_on_plain_block_is_refused() {
    let (mut device, field, _uid) = authenticated_1k(4);
    field.update_card(0, |c| c.set_block(5, sample_block()));
    assert_eq!(device.increment(5, 1), Err(Error::Communication));
}

#[test]
fn transfer_without_pending_value_is_refused() {
    let (mut device, _field, _uid) = authenticated_1k(4);
    assert_eq!(device.transfer(5), Err(Error::Communication));
}
