#[path = "../common/mod.rs"]
mod common;

use rc522::protocol::crc_a;
use rc522::device::{PcdCommand, Register, TransceiveRequest};
use rc522::test_support::{self, RfReply, ScriptedField};
use rc522::{Error, RxGain, Status};

#[test]
fn crc_bridge_reproduces_reference_values() {
    let (mut device, _probe) = test_support::initialized_device().unwrap();
    // HLTA, low byte first
    assert_eq!(device.calculate_crc(&[0x50, 0x00]).unwrap(), [0x57, 0xCD]);
    assert_eq!(device.calculate_crc(&[0x00, 0x00]).unwrap(), [0xA0, 0x1E]);
    let payload = [0x30, 0x04];
    assert_eq!(device.calculate_crc(&payload).unwrap(), crc_a(&payload));
}

#[test]
fn crc_timeout_when_coprocessor_stalls() {
    let (mut device, probe) = test_support::initialized_device().unwrap();
    probe.stall_crc(true);
    let result = device.calculate_crc(&[0x30, 0x01]);
    assert_eq!(Status::of(&result), Status::Timeout);
}

#[test]
fn timeout_and_collision_stay_distinct() {
    let field = ScriptedField::new(vec![
        RfReply::Silent,
        RfReply::Collision {
            bytes: vec![0x00],
            valid_bits: 1,
            position: 1,
        },
        RfReply::Stall,
    ]);
    let (mut device, _probe) = test_support::device_with_field(field).unwrap();

    assert_eq!(device.transceive(&[0x93, 0x20], 5), Err(Error::Timeout));
    assert_eq!(device.transceive(&[0x93, 0x20], 5), Err(Error::Collision));
    assert_eq!(device.transceive(&[0x93, 0x20], 5), Err(Error::Timeout));
}

#[test]
fn buffer_overflow_flag_is_a_communication_error() {
    let field = ScriptedField::new(vec![RfReply::Error(0x10)]);
    let (mut device, _probe) = test_support::device_with_field(field).unwrap();
    let result = device.transceive(&[0x26], 2);
    assert_eq!(Status::of(&result), Status::CommunicationError);
}

#[test]
fn request_without_answer_data_skips_fifo() {
    let field = ScriptedField::new(vec![RfReply::data(vec![0xAA, 0xBB], 0)]);
    let (mut device, probe) = test_support::device_with_field(field).unwrap();
    let response = device
        .communicate(&TransceiveRequest::transceive(&[0x01, 0x02]))
        .unwrap();
    assert!(response.is_empty());
    // the answer is still sitting in the FIFO
    assert_eq!(probe.register(Register::FifoLevel), 2);
}

#[test]
fn authenticate_request_uses_idle_irq() {
    let req = TransceiveRequest::authenticate(&[0x60]);
    assert_eq!(req.command, PcdCommand::MfAuthent);
    assert_eq!(req.wait_irq, 0x10);
    let req = TransceiveRequest::transceive(&[0x26]);
    assert_eq!(req.wait_irq, 0x30);
}

#[test]
fn soft_reset_and_antenna_control() {
    let (mut device, probe) = test_support::initialized_device().unwrap();
    device.set_antenna_gain(RxGain::Db18).unwrap();
    device.soft_reset().unwrap();
    assert_eq!(device.antenna_gain().unwrap(), RxGain::Db18);
    assert_eq!(probe.register(Register::TxControl) & 0x03, 0x03);

    device.antenna_off().unwrap();
    let field_off = device.transceive(&[0x26], 2);
    assert_eq!(field_off, Err(Error::Timeout));
}
