use rc522::device::Register;
use rc522::transport::{ChipSelect, MockTransport, Transport};
use rc522::Error;

#[test]
fn guard_asserts_and_releases() {
    let mut mock = MockTransport::new();
    let probe = mock.clone();
    {
        let mut cs = ChipSelect::acquire(&mut mock).unwrap();
        assert!(probe.cs_asserted());
        let rx = cs.exchange(&[Register::Version.read_address(), 0x00]).unwrap();
        assert_eq!(rx, vec![0x00, 0x92]);
    }
    assert!(!probe.cs_asserted());
    assert!(probe.cs_balanced());
}

#[test]
fn guard_releases_when_the_exchange_fails() {
    let mut mock = MockTransport::new();
    let probe = mock.clone();
    probe.fail_next_exchanges(2);

    for _ in 0..2 {
        let mut cs = ChipSelect::acquire(&mut mock).unwrap();
        assert!(matches!(cs.exchange(&[0x80, 0x00]), Err(Error::Transport(_))));
    }
    assert!(probe.cs_balanced());
    assert_eq!(probe.exchange_count(), 0);
}

#[test]
fn boxed_transport_shares_the_simulator() {
    let probe = MockTransport::new();
    let mut boxed: Box<dyn Transport> = Box::new(probe.clone());
    boxed.reset().unwrap();
    boxed.reset().unwrap();
    assert_eq!(probe.resets(), 2);
}
