use rc522::device::registers::{irq, PcdCommand};
use rc522::device::Register;
use rc522::test_support::{RfReply, ScriptedField};
use rc522::transport::{MockTransport, Transport};

fn write(mock: &mut MockTransport, reg: Register, values: &[u8]) {
    let mut tx = vec![reg.write_address()];
    tx.extend_from_slice(values);
    mock.select().unwrap();
    mock.exchange(&tx).unwrap();
    mock.deselect().unwrap();
}

#[test]
fn start_send_puts_the_fifo_on_air() {
    let field = ScriptedField::new(vec![RfReply::data(vec![0x04, 0x00], 0)]);
    let mut mock = MockTransport::with_field(field.clone());
    write(&mut mock, Register::TxControl, &[0x83]);
    write(&mut mock, Register::FifoData, &[0x26]);
    write(&mut mock, Register::Command, &[PcdCommand::Transceive as u8]);
    write(&mut mock, Register::BitFraming, &[0x87]);

    assert_eq!(field.frames(), vec![vec![0x26]]);
    assert_eq!(field.tx_last_bits(), vec![7]);
    assert_eq!(mock.register(Register::FifoLevel), 2);
    assert_eq!(mock.register(Register::ComIrq) & irq::RX, irq::RX);
    // StartSend is self-clearing
    assert_eq!(mock.register(Register::BitFraming), 0x07);
}

#[test]
fn antenna_off_keeps_the_field_quiet() {
    let field = ScriptedField::new(vec![RfReply::data(vec![0x04, 0x00], 0)]);
    let mut mock = MockTransport::with_field(field.clone());
    write(&mut mock, Register::FifoData, &[0x26]);
    write(&mut mock, Register::Command, &[PcdCommand::Transceive as u8]);
    write(&mut mock, Register::BitFraming, &[0x87]);

    assert!(field.frames().is_empty());
    assert_eq!(mock.rf_frames(), vec![vec![0x26]]);
    assert_eq!(mock.register(Register::ComIrq) & irq::TIMER, irq::TIMER);
}

#[test]
fn collision_reply_sets_coll_register() {
    let field = ScriptedField::new(vec![RfReply::Collision {
        bytes: vec![0x01],
        valid_bits: 3,
        position: 3,
    }]);
    let mut mock = MockTransport::with_field(field);
    write(&mut mock, Register::TxControl, &[0x83]);
    write(&mut mock, Register::FifoData, &[0x93, 0x20]);
    write(&mut mock, Register::Command, &[PcdCommand::Transceive as u8]);
    write(&mut mock, Register::BitFraming, &[0x80]);

    assert_eq!(mock.register(Register::Coll) & 0x3F, 0x03);
    assert_eq!(mock.register(Register::Error) & 0x08, 0x08);
    assert_eq!(mock.register(Register::Control) & 0x07, 3);
}

#[test]
fn soft_reset_restores_power_on_values() {
    let mut mock = MockTransport::new();
    write(&mut mock, Register::TPrescaler, &[0x3E]);
    write(&mut mock, Register::Command, &[PcdCommand::SoftReset as u8]);
    assert_eq!(mock.register(Register::TPrescaler), 0x00);
    assert_eq!(mock.register(Register::Version), 0x92);
}
