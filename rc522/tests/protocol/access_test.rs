use rc522::protocol::access_bits;
use rc522::Status;

#[test]
fn factory_trailer_access_bytes() {
    assert_eq!(access_bits(0, 0, 0, 1).unwrap(), [0xFF, 0x07, 0x80]);
}

#[test]
fn all_conditions_set() {
    // C1 = C2 = C3 = 0xF
    assert_eq!(access_bits(7, 7, 7, 7).unwrap(), [0x00, 0xF0, 0xFF]);
}

#[test]
fn condition_wider_than_three_bits() {
    let result = access_bits(0, 0, 0b1000, 0);
    assert_eq!(Status::of(&result), Status::InvalidArgument);
}
