use rc522::protocol::{PiccCommand, SelectFrame};
use rc522::Error;

#[test]
fn fresh_level_sends_nvb_20() {
    let mut frame = SelectFrame::new(0x93, false, &[], 0).unwrap();
    assert_eq!(frame.anticollision(), &[0x93, 0x20]);
    assert_eq!(frame.response_capacity(), 7);
    assert_eq!(frame.tx_last_bits(), 0);
}

#[test]
fn cascade_tag_counts_as_known_bits() {
    let mut frame = SelectFrame::new(0x93, true, &[0x04, 0x52], 16).unwrap();
    assert_eq!(frame.known_bits(), 24);
    assert_eq!(frame.anticollision(), &[0x93, 0x50, 0x88, 0x04, 0x52]);
}

#[test]
fn partial_byte_is_sent_with_tx_last_bits() {
    let mut frame = SelectFrame::new(0x93, false, &[0x12, 0x05], 11).unwrap();
    assert_eq!(frame.tx_last_bits(), 3);
    assert_eq!(frame.anticollision(), &[0x93, 0x33, 0x12, 0x05]);
}

#[test]
fn merge_keeps_bits_below_the_boundary() {
    let mut frame = SelectFrame::new(0x93, false, &[0x12, 0x05], 11).unwrap();
    frame.merge_response(&[0xF8, 0x34, 0x56]);
    assert_eq!(&frame.as_bytes()[2..6], &[0x12, 0xFD, 0x34, 0x56]);
}

#[test]
fn collision_forces_bit_to_one() {
    let mut frame = SelectFrame::new(0x93, false, &[], 0).unwrap();
    frame.merge_response(&[0xFF, 0x00, 0x00, 0x00, 0x00]);
    frame.resolve_collision(6).unwrap();
    assert_eq!(frame.known_bits(), 6);
    // bits 0..=4 kept, bit 5 forced to 1, bits above cleared
    assert_eq!(frame.as_bytes()[2], 0x3F);
}

#[test]
fn collision_inside_known_bits_is_rejected() {
    let mut frame = SelectFrame::new(0x93, true, &[], 0).unwrap();
    assert_eq!(frame.resolve_collision(4), Err(Error::Collision));
    assert!(matches!(frame.resolve_collision(0), Err(Error::Internal(_))));
    assert!(matches!(frame.resolve_collision(33), Err(Error::Internal(_))));
}

#[test]
fn select_frame_layout() {
    let mut frame = SelectFrame::new(0x95, false, &[0x3C, 0x4D, 0x80, 0x11], 32).unwrap();
    assert!(frame.is_complete());
    let header = frame.select_header().to_vec();
    assert_eq!(header, vec![0x95, 0x70, 0x3C, 0x4D, 0x80, 0x11, 0x3C ^ 0x4D ^ 0x80 ^ 0x11]);
    let crc = rc522::protocol::crc_a(&header);
    let full = frame.select_with_crc(crc);
    assert_eq!(full.len(), 9);
    assert_eq!(&full[7..], &crc);
    assert!(frame.bcc_matches());
    assert_eq!(frame.uid_bytes(), &[0x3C, 0x4D, 0x80, 0x11]);
}

#[test]
fn oversized_prefix_is_internal() {
    assert!(matches!(
        SelectFrame::new(0x93, true, &[1, 2, 3, 4], 32),
        Err(Error::Internal(_))
    ));
}

#[test]
fn picc_command_codes() {
    assert_eq!(PiccCommand::from_code(0x30), Some(PiccCommand::MfRead));
    assert_eq!(PiccCommand::HltA.code(), 0x50);
    assert_eq!(PiccCommand::from_code(0x00), None);
}
