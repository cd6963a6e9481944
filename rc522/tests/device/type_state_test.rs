#[path = "../common/mod.rs"]
mod common;

use rc522::device::{Config, Device, DeviceBuilder, Register};
use rc522::transport::{MockTransport, Transport};
use rc522::{ChipVersion, Error, RxGain};

#[test]
fn initialize_transitions_and_reports_version() {
    common::init_logger();
    let mock = MockTransport::new();
    let probe = mock.clone();

    let boxed: Box<dyn Transport> = Box::new(mock);
    let device = Device::new_with_transport(boxed);
    assert_eq!(device.config(), &Config::default());

    let mut initialized = device.initialize().unwrap();
    assert_eq!(initialized.version().unwrap(), ChipVersion::V2_0);
    assert_eq!(probe.resets(), 1);
}

#[test]
fn builder_without_transport_is_rejected() {
    assert!(matches!(
        DeviceBuilder::new().build(),
        Err(Error::InvalidArgument(_))
    ));
}

#[test]
fn builder_config_reaches_the_chip() {
    let mock = MockTransport::new();
    let probe = mock.clone();
    let config = Config {
        timer_prescaler: 0x0D3E,
        timer_reload: 30,
        ..Config::default()
    }
    .with_rx_gain(RxGain::Db38);

    let _device = DeviceBuilder::new()
        .with_transport(Box::new(mock))
        .with_config(config)
        .build()
        .unwrap();

    assert_eq!(probe.register(Register::TMode), 0x8D);
    assert_eq!(probe.register(Register::TPrescaler), 0x3E);
    assert_eq!(probe.register(Register::TReloadHigh), 0x00);
    assert_eq!(probe.register(Register::TReloadLow), 30);
    assert_eq!(probe.register(Register::RfCfg) & 0x70, 0x50);
}

#[test]
fn unknown_chip_version_is_reported_raw() {
    let mock = MockTransport::new();
    let probe = mock.clone();
    let mut device = Device::new_with_transport(Box::new(mock))
        .initialize()
        .unwrap();
    probe.set_register(Register::Version, 0x12);
    assert_eq!(device.version().unwrap(), ChipVersion::Unknown(0x12));
}

#[test]
fn into_transport_hands_the_bus_back() {
    let mock = MockTransport::new();
    let probe = mock.clone();
    let device = Device::new_with_transport(Box::new(mock))
        .initialize()
        .unwrap();
    let mut transport = device.into_transport();
    transport.reset().unwrap();
    assert_eq!(probe.resets(), 2);
}
