// rc522/src/device/builder.rs

use crate::device::config::Config;
use crate::device::handle::{Device, Initialized, Uninitialized};
use crate::transport::Transport;
use crate::types::RxGain;
use crate::{Error, Result};

/// Helper to construct a Device with optional configuration.
#[derive(Default)]
pub struct DeviceBuilder {
    transport: Option<Box<dyn Transport>>,
    config: Config,
}

impl DeviceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provide an already-created transport instance (e.g. MockTransport)
    pub fn with_transport(mut self, transport: Box<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn with_rx_gain(mut self, gain: RxGain) -> Self {
        self.config.rx_gain = gain;
        self
    }

    pub fn with_select_timeout_retries(mut self, retries: u8) -> Self {
        self.config.select_timeout_retries = retries;
        self
    }

    /// Consume the builder and return an uninitialized Device.
    /// Requires a transport to be provided; otherwise returns InvalidArgument.
    pub fn build_uninitialized(self) -> Result<Device<Uninitialized>> {
        self.config.validate()?;
        match self.transport {
            Some(t) => Ok(Device::with_config(t, self.config)),
            None => Err(Error::InvalidArgument("no transport configured".into())),
        }
    }

    /// Build and run the initialization sequence.
    pub fn build(self) -> Result<Device<Initialized>> {
        self.build_uninitialized()?.initialize()
    }
}
