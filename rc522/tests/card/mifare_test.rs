#[path = "../common/mod.rs"]
mod common;

use common::*;
use rc522::test_support::SimulatedCard;
use rc522::{BlockData, Error, KeyType, MifareKey, Status};

#[test]
fn write_then_read_back() {
    let (mut device, field, _uid) = authenticated_1k(4);
    device.write_block(5, &sample_block()).unwrap();
    assert_eq!(field.card(0).block(5), sample_block());

    let block = device.read_block(5).unwrap();
    assert_eq!(block.as_bytes(), &sample_block());
}

#[test]
fn raw_read_keeps_crc_bytes() {
    let (mut device, field, _uid) = authenticated_1k(8);
    field.update_card(0, |c| c.set_block(9, sample_block()));

    let mut buffer = [0u8; 18];
    assert_eq!(device.mifare_read(9, &mut buffer).unwrap(), 18);
    assert_eq!(buffer.to_vec(), with_crc(&sample_block()));
}

#[test]
fn undersized_read_buffer_is_rejected_before_io() {
    let (mut device, _field, _uid) = authenticated_1k(4);
    let mut buffer = [0u8; 17];
    assert_eq!(
        device.mifare_read(4, &mut buffer),
        Err(Error::BufferTooSmall {
            needed: 18,
            available: 17
        })
    );
}

#[test]
fn short_write_data_is_invalid() {
    let (mut device, _field, _uid) = authenticated_1k(4);
    let result = device.write_block(4, &[0u8; 15]);
    assert_eq!(Status::of(&result), Status::InvalidArgument);
}

#[test]
fn block_outside_authenticated_sector_is_nacked() {
    let (mut device, _field, _uid) = authenticated_1k(4);
    assert_eq!(device.read_block(8), Err(Error::MifareNack));
    assert_eq!(
        device.write_block(8, &sample_block()),
        Err(Error::Communication)
    );
}

#[test]
fn wrong_key_fails_authentication() {
    let secret = MifareKey::from_bytes([0xA0, 0xA1, 0xA2, 0xA3, 0xA4, 0xA5]);
    let card = SimulatedCard::mifare_1k(&SINGLE_UID).with_keys(secret, secret);
    let (mut device, probe, _field) = field_device(vec![card]);
    let selected = device.poll_card().unwrap();

    let result = selected.authenticate(&mut device, KeyType::A, 4, &MifareKey::DEFAULT);
    assert_eq!(result, Err(Error::Timeout));

    let auth = probe.last_auth().unwrap();
    assert_eq!(auth[0], 0x60);
    assert_eq!(auth[1], 4);
    assert_eq!(&auth[2..8], MifareKey::DEFAULT.as_bytes());
    assert_eq!(&auth[8..], &SINGLE_UID);
}

#[test]
fn card_session_with_key_b() {
    let key_b = MifareKey::from_bytes([0xB0, 0xB1, 0xB2, 0xB3, 0xB4, 0xB5]);
    let card = SimulatedCard::mifare_1k(&DOUBLE_UID).with_keys(MifareKey::DEFAULT, key_b);
    let (mut device, probe, field) = field_device(vec![card]);
    let selected = device.poll_card().unwrap();

    let data = BlockData::from_bytes(sample_block());
    selected
        .write_block(&mut device, KeyType::B, &key_b, 12, &data)
        .unwrap();
    let read = selected
        .read_block(&mut device, KeyType::B, &key_b, 12)
        .unwrap();
    assert_eq!(read, data);
    // 7-byte UID: MFAuthent carries the first four bytes
    assert_eq!(&probe.last_auth().unwrap()[8..], &DOUBLE_UID[..4]);

    selected.halt(&mut device).unwrap();
    assert_eq!(field.card(0).state(), rc522::test_support::PiccState::Halt);
}

#[test]
fn ultralight_page_write_and_read() {
    let (mut device, _probe, field) = field_device(vec![SimulatedCard::ultralight(&DOUBLE_UID)]);
    let card = device.poll_card().unwrap();
    assert_eq!(card.picc_type(), rc522::PiccType::MifareUltralight);

    device.ultralight_write(4, &[0x01, 0x02, 0x03, 0x04]).unwrap();
    device.ultralight_write(5, &[0x05, 0x06, 0x07, 0x08]).unwrap();
    assert_eq!(field.card(0).page(4), [0x01, 0x02, 0x03, 0x04]);

    let mut buffer = [0u8; 18];
    device.mifare_read(4, &mut buffer).unwrap();
    assert_eq!(&buffer[..8], &[1, 2, 3, 4, 5, 6, 7, 8]);
}
