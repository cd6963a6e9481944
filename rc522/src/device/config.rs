//! Engine configuration: poll budgets, select retry policy and the chip
//! settings written during initialisation.

use crate::types::RxGain;
use crate::utils::timeout::{
    DEFAULT_CRC_POLL_BUDGET, DEFAULT_IRQ_POLL_BUDGET, DEFAULT_SOFT_RESET_POLL_BUDGET,
};
use crate::{Error, Result};

/// Number of Timeout retries inside one select before the chip is reset
pub const SELECT_TIMEOUT_RETRIES: u8 = 10;

/// TPrescaler 0x0A9 = 169 => f_timer = 13.56 MHz / (2 * 169 + 1) = 40 kHz
pub const TIMER_PRESCALER: u16 = 0x0A9;

/// TReload 0x3E8 = 1000 ticks of 25 us => 25 ms receive timeout
pub const TIMER_RELOAD: u16 = 0x03E8;

/// TxASKReg.Force100ASK
pub const TX_ASK_FORCE_100: u8 = 0x40;

/// ModeReg: TxWaitRF, MSBFirst off, CRC preset 0x6363
pub const MODE_CRC_PRESET_6363: u8 = 0x3D;

/// ModWidthReg reset value
pub const MOD_WIDTH_DEFAULT: u8 = 0x26;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Config {
    /// ComIrqReg reads before a command is declared timed out
    pub irq_poll_budget: u32,
    /// DivIrqReg reads while waiting for the CRC coprocessor
    pub crc_poll_budget: u32,
    /// CommandReg reads while waiting for a soft reset to finish
    pub soft_reset_poll_budget: u32,
    /// Timeout retries per select before a full chip reset
    pub select_timeout_retries: u8,
    /// 12-bit timer prescaler (TModeReg[3:0] : TPrescalerReg)
    pub timer_prescaler: u16,
    /// 16-bit timer reload value
    pub timer_reload: u16,
    pub rx_gain: RxGain,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            irq_poll_budget: DEFAULT_IRQ_POLL_BUDGET,
            crc_poll_budget: DEFAULT_CRC_POLL_BUDGET,
            soft_reset_poll_budget: DEFAULT_SOFT_RESET_POLL_BUDGET,
            select_timeout_retries: SELECT_TIMEOUT_RETRIES,
            timer_prescaler: TIMER_PRESCALER,
            timer_reload: TIMER_RELOAD,
            rx_gain: RxGain::Db43,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.timer_prescaler > 0x0FFF {
            return Err(Error::InvalidArgument(format!(
                "timer prescaler {:#x} exceeds 12 bits",
                self.timer_prescaler
            )));
        }
        if self.irq_poll_budget == 0 || self.crc_poll_budget == 0 {
            return Err(Error::InvalidArgument("poll budgets must be non-zero".into()));
        }
        Ok(())
    }

    pub fn with_irq_poll_budget(mut self, iterations: u32) -> Self {
        self.irq_poll_budget = iterations;
        self
    }

    pub fn with_crc_poll_budget(mut self, iterations: u32) -> Self {
        self.crc_poll_budget = iterations;
        self
    }

    pub fn with_select_timeout_retries(mut self, retries: u8) -> Self {
        self.select_timeout_retries = retries;
        self
    }

    pub fn with_rx_gain(mut self, gain: RxGain) -> Self {
        self.rx_gain = gain;
        self
    }

    /// TModeReg value: TAuto plus the prescaler high nibble.
    pub fn tmode(&self) -> u8 {
        crate::device::registers::T_AUTO | ((self.timer_prescaler >> 8) & 0x0F) as u8
    }
}
