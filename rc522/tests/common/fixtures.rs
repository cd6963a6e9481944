// fixtures.rs — UIDs, blocks and frames used across the integration tests

use rc522::protocol::crc_a;
use rc522::test_support::RfReply;

pub const SINGLE_UID: [u8; 4] = [0xDE, 0xAD, 0xBE, 0xEF];

pub const DOUBLE_UID: [u8; 7] = [0x04, 0x52, 0x1A, 0x2B, 0x3C, 0x4D, 0x80];

pub const TRIPLE_UID: [u8; 10] = [0x08, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x99, 0xAA];

pub fn sample_block() -> [u8; 16] {
    let mut b = [0u8; 16];
    for (i, byte) in b.iter_mut().enumerate() {
        *byte = 0xA0 ^ i as u8;
    }
    b
}

/// `data` followed by its CRC_A.
pub fn with_crc(data: &[u8]) -> Vec<u8> {
    let mut v = data.to_vec();
    v.extend_from_slice(&crc_a(data));
    v
}

/// SELECT frame for one cascade level: SEL, 0x70, UID field, BCC, CRC_A.
pub fn select_frame(sel: u8, uid_field: [u8; 4]) -> Vec<u8> {
    let bcc = uid_field.iter().fold(0u8, |acc, b| acc ^ b);
    let mut frame = vec![sel, 0x70];
    frame.extend_from_slice(&uid_field);
    frame.push(bcc);
    with_crc(&frame)
}

pub fn sak_reply(sak: u8) -> RfReply {
    RfReply::data(with_crc(&[sak]), 0)
}

/// Parse a frame written as spaced hex, e.g. `"93 20"`.
pub fn frame(spaced_hex: &str) -> Vec<u8> {
    hex::decode(spaced_hex.replace(' ', "")).expect("valid hex literal")
}
