#[path = "../common/mod.rs"]
mod common;

use common::*;
use proptest::prelude::*;
use rc522::test_support::SimulatedCard;
use rc522::Uid;

/// First differing bit in transmission order (byte 0 LSB first).
fn first_difference(a: &[u8; 4], b: &[u8; 4]) -> Option<usize> {
    (0..32).find(|&bit| (a[bit / 8] ^ b[bit / 8]) >> (bit % 8) & 1 != 0)
}

#[test]
fn colliding_bit_is_resolved_as_one() {
    let a = [0x01, 0x02, 0x03, 0x04];
    let b = [0x09, 0x02, 0x03, 0x04];
    let (mut device, probe, _field) = field_device(vec![
        SimulatedCard::mifare_1k(&a),
        SimulatedCard::mifare_1k(&b),
    ]);
    device.request_a().unwrap();

    let mut uid = Uid::new();
    device.select(&mut uid, 0).unwrap();
    assert_eq!(uid.as_bytes(), &b);

    let frames = probe.rf_frames();
    assert_eq!(frames[1], frame("93 20"));
    // four bits known, bit 3 forced to 1, bits 0..=2 unchanged
    assert_eq!(frames[2], frame("93 24 09"));
    assert_eq!(frames[3], select_frame(0x93, b));
}

#[test]
fn collision_on_last_bit_of_level() {
    let a = [0xDE, 0xAD, 0xBE, 0x6F];
    let (mut device, probe, _field) = field_device(vec![
        SimulatedCard::mifare_1k(&a),
        SimulatedCard::mifare_1k(&SINGLE_UID),
    ]);
    device.request_a().unwrap();

    let mut uid = Uid::new();
    device.select(&mut uid, 0).unwrap();
    assert_eq!(uid.as_bytes(), &SINGLE_UID);
    // every bit known after the collision: SELECT follows immediately
    assert_eq!(probe.rf_frames()[2], select_frame(0x93, SINGLE_UID));
}

#[test]
fn loser_stays_ready_and_can_be_selected_next() {
    let a = [0x01, 0x02, 0x03, 0x04];
    let b = [0x09, 0x02, 0x03, 0x04];
    let (mut device, _probe, _field) = field_device(vec![
        SimulatedCard::mifare_1k(&a),
        SimulatedCard::mifare_1k(&b),
    ]);
    let first = device.poll_card().unwrap();
    assert_eq!(first.uid().as_bytes(), &b);
    first.halt(&mut device).unwrap();

    let second = device.poll_card().unwrap();
    assert_eq!(second.uid().as_bytes(), &a);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn two_cards_resolve_to_the_one_bit_winner(
        a in any::<[u8; 4]>().prop_filter("no CT", |u| u[0] != 0x88),
        b in any::<[u8; 4]>().prop_filter("no CT", |u| u[0] != 0x88),
    ) {
        prop_assume!(a != b);
        let bit = first_difference(&a, &b).unwrap();
        let winner = if (a[bit / 8] >> (bit % 8)) & 1 == 1 { a } else { b };

        let (mut device, probe, _field) = field_device(vec![
            SimulatedCard::mifare_1k(&a),
            SimulatedCard::mifare_1k(&b),
        ]);
        device.request_a().unwrap();
        let mut uid = Uid::new();
        device.select(&mut uid, 0).unwrap();
        prop_assert_eq!(uid.as_bytes(), &winner[..]);

        // the frame after the collision carries exactly bit+1 known bits
        let frames = probe.rf_frames();
        let next = &frames[2];
        let known = bit + 1;
        if known < 32 {
            prop_assert_eq!(next[1], (((2 + known / 8) as u8) << 4) | (known % 8) as u8);
            let byte = next[2 + bit / 8];
            prop_assert_eq!((byte >> (bit % 8)) & 1, 1);
            let low = (1u8 << (bit % 8)) - 1;
            prop_assert_eq!(byte & low, winner[bit / 8] & low);
        }
    }
}
