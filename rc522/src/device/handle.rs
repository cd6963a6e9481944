// rc522/src/device/handle.rs

use std::marker::PhantomData;

use crate::device::config::{Config, MOD_WIDTH_DEFAULT, MODE_CRC_PRESET_6363, TX_ASK_FORCE_100};
use crate::device::registers::{PcdCommand, Register, POWER_DOWN, RX_GAIN_MASK, TX_ANTENNA};
use crate::transport::Transport;
use crate::types::{ChipVersion, RxGain};
use crate::utils::PollBudget;
use crate::{Error, Result};

/// Type-state markers
pub struct Uninitialized;
pub struct Initialized;

/// MFRC522 handle that enforces initialization state at compile time.
///
/// All register traffic goes through the boxed `Transport`; the handle owns
/// it exclusively, so no two operations can interleave on the bus.
pub struct Device<State = Uninitialized> {
    pub(crate) transport: Box<dyn Transport>,
    pub(crate) config: Config,
    _state: PhantomData<State>,
}

impl Device<Uninitialized> {
    /// Wrap a transport with the default configuration.
    pub fn new_with_transport(transport: Box<dyn Transport>) -> Self {
        Self::with_config(transport, Config::default())
    }

    pub fn with_config(transport: Box<dyn Transport>, config: Config) -> Self {
        Self {
            transport,
            config,
            _state: PhantomData,
        }
    }

    /// Pulse the reset line and program timer, modulation, CRC preset,
    /// antenna and receiver gain. Returns an initialized Device on success.
    pub fn initialize(self) -> Result<Device<Initialized>> {
        let mut this = self;
        this.config.validate()?;
        this.hard_reset()?;
        this.configure()?;
        log::debug!("MFRC522 initialized ({:?})", this.config);

        Ok(Device {
            transport: this.transport,
            config: this.config,
            _state: PhantomData,
        })
    }
}

impl<S> Device<S> {
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Give the transport back, e.g. to hand the bus to another driver.
    pub fn into_transport(self) -> Box<dyn Transport> {
        self.transport
    }

    pub(crate) fn hard_reset(&mut self) -> Result<()> {
        log::debug!("pulsing MFRC522 reset line");
        self.transport.reset()
    }

    /// Register programming shared by initialize, reinitialize and
    /// soft_reset.
    pub(crate) fn configure(&mut self) -> Result<()> {
        let [reload_hi, reload_lo] = self.config.timer_reload.to_be_bytes();
        let tmode = self.config.tmode();
        let prescaler_lo = (self.config.timer_prescaler & 0xFF) as u8;

        self.write_register(Register::TxMode, 0x00)?;
        self.write_register(Register::RxMode, 0x00)?;
        self.write_register(Register::ModWidth, MOD_WIDTH_DEFAULT)?;
        self.write_register(Register::TMode, tmode)?;
        self.write_register(Register::TPrescaler, prescaler_lo)?;
        self.write_register(Register::TReloadHigh, reload_hi)?;
        self.write_register(Register::TReloadLow, reload_lo)?;
        self.write_register(Register::TxAsk, TX_ASK_FORCE_100)?;
        self.write_register(Register::Mode, MODE_CRC_PRESET_6363)?;
        self.enable_antenna()?;
        self.write_gain(self.config.rx_gain)
    }

    fn enable_antenna(&mut self) -> Result<()> {
        let value = self.read_register(Register::TxControl)?;
        if value & TX_ANTENNA != TX_ANTENNA {
            self.write_register(Register::TxControl, value | TX_ANTENNA)?;
        }
        Ok(())
    }

    fn write_gain(&mut self, gain: RxGain) -> Result<()> {
        let value = self.read_register(Register::RfCfg)?;
        let next = (value & !RX_GAIN_MASK) | gain.register_value();
        if next != value {
            self.write_register(Register::RfCfg, next)?;
        }
        Ok(())
    }
}

impl Device<Initialized> {
    /// Hardware reset followed by the full configuration sequence. Used to
    /// recover a chip that stopped answering.
    pub fn reinitialize(&mut self) -> Result<()> {
        self.hard_reset()?;
        self.configure()
    }

    /// SoftReset command, wait for CommandReg.PowerDown to clear, then
    /// restore the configuration the reset wiped.
    pub fn soft_reset(&mut self) -> Result<()> {
        self.write_register(Register::Command, PcdCommand::SoftReset as u8)?;

        let mut budget = PollBudget::new(self.config.soft_reset_poll_budget);
        loop {
            if !budget.tick() {
                log::warn!("MFRC522 did not leave power-down after soft reset");
                return Err(Error::Timeout);
            }
            if self.read_register(Register::Command)? & POWER_DOWN == 0 {
                break;
            }
        }
        self.configure()
    }

    pub fn antenna_on(&mut self) -> Result<()> {
        self.enable_antenna()
    }

    pub fn antenna_off(&mut self) -> Result<()> {
        self.clear_register_bits(Register::TxControl, TX_ANTENNA)
    }

    pub fn antenna_gain(&mut self) -> Result<RxGain> {
        Ok(RxGain::from_register(self.read_register(Register::RfCfg)?))
    }

    /// Program a new receiver gain; remembered so later resets restore it.
    pub fn set_antenna_gain(&mut self, gain: RxGain) -> Result<()> {
        self.config.rx_gain = gain;
        self.write_gain(gain)
    }

    pub fn version(&mut self) -> Result<ChipVersion> {
        let raw = self.read_register(Register::Version)?;
        let version = ChipVersion::from_register(raw);
        if !version.is_known() {
            log::warn!("unexpected VersionReg value {:#04x}", raw);
        }
        Ok(version)
    }
}
