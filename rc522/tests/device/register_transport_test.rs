#[path = "../common/mod.rs"]
mod common;

use rc522::device::{Device, Register};
use rc522::transport::MockTransport;
use rc522::{Error, Status};

fn device() -> (Device, MockTransport) {
    let mock = MockTransport::new();
    let probe = mock.clone();
    (Device::new_with_transport(Box::new(mock)), probe)
}

#[test]
fn single_register_write_and_read() {
    let (mut dev, probe) = device();
    dev.write_register(Register::TPrescaler, 0x3E).unwrap();
    assert_eq!(probe.register(Register::TPrescaler), 0x3E);
    assert_eq!(dev.read_register(Register::TPrescaler).unwrap(), 0x3E);
    assert_eq!(dev.read_register(Register::Version).unwrap(), 0x92);
    assert!(probe.cs_balanced());
}

#[test]
fn burst_write_fills_fifo_and_burst_read_drains_it() {
    let (mut dev, probe) = device();
    dev.write_register_burst(Register::FifoData, &[0x10, 0x20, 0x30])
        .unwrap();
    assert_eq!(dev.read_register(Register::FifoLevel).unwrap(), 3);
    assert_eq!(
        dev.read_register_burst(Register::FifoData, 3).unwrap(),
        vec![0x10, 0x20, 0x30]
    );
    assert_eq!(dev.read_register_burst(Register::FifoData, 0).unwrap(), Vec::<u8>::new());
    assert_eq!(probe.register(Register::FifoLevel), 0);
}

#[test]
fn one_exchange_per_operation() {
    let (mut dev, probe) = device();
    let before = probe.exchange_count();
    dev.write_register_burst(Register::FifoData, &[0; 8]).unwrap();
    dev.read_register_burst(Register::FifoData, 8).unwrap();
    assert_eq!(probe.exchange_count(), before + 2);
}

#[test]
fn bit_helpers_are_read_modify_write() {
    let (mut dev, probe) = device();
    dev.write_register(Register::TxControl, 0x80).unwrap();
    dev.set_register_bits(Register::TxControl, 0x03).unwrap();
    assert_eq!(probe.register(Register::TxControl), 0x83);
    dev.clear_register_bits(Register::TxControl, 0x01).unwrap();
    assert_eq!(probe.register(Register::TxControl), 0x82);
}

#[test]
fn chip_select_released_after_transport_failure() {
    let (mut dev, probe) = device();
    probe.fail_next_exchanges(1);

    let result = dev.read_register(Register::Version);
    assert!(matches!(result, Err(Error::Transport(_))));
    assert_eq!(Status::of(&result), Status::InternalError);
    assert!(!probe.cs_asserted());
    assert!(probe.cs_balanced());

    assert_eq!(dev.read_register(Register::Version).unwrap(), 0x92);
}
