#[path = "../common/mod.rs"]
mod common;

use proptest::prelude::*;
use rc522::protocol::{bcc, crc_a};

#[test]
fn crc_a_examples() {
    assert_eq!(crc_a(&[0x00, 0x00]), [0xA0, 0x1E]);
    assert_eq!(crc_a(&[0x12, 0x34]), [0x26, 0xCF]);
    assert_eq!(crc_a(&[0x50, 0x00]), [0x57, 0xCD]);
    assert_eq!(common::with_crc(&[0x50, 0x00]), vec![0x50, 0x00, 0x57, 0xCD]);
}

#[test]
fn select_frame_fixture_carries_bcc() {
    let frame = common::select_frame(0x93, common::SINGLE_UID);
    assert_eq!(frame.len(), 9);
    assert_eq!(frame[6], bcc(&common::SINGLE_UID));
}

proptest! {
    // CRC_A over a frame with its own CRC appended leaves residue 0
    #[test]
    fn crc_residue_is_zero(data in proptest::collection::vec(any::<u8>(), 0..32)) {
        let framed = common::with_crc(&data);
        prop_assert_eq!(crc_a(&framed), [0x00, 0x00]);
    }

    #[test]
    fn bcc_of_field_and_bcc_is_zero(field in any::<[u8; 4]>()) {
        let check = bcc(&field);
        let mut all = field.to_vec();
        all.push(check);
        prop_assert_eq!(bcc(&all), 0);
    }
}
