// rc522/src/transport/hal.rs
//! `Transport` over embedded-hal 0.2 blocking SPI and GPIO traits.

use core::fmt::Debug;

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::blocking::spi::Transfer;
use embedded_hal::digital::v2::OutputPin;

use crate::constants::RESET_SETTLE_MS;
use crate::transport::traits::Transport;
use crate::{Error, Result};

/// Width of the low pulse on NRSTPD
const RESET_PULSE_MS: u32 = 1;

/// SPI bus, chip-select pin, reset pin and a delay source.
///
/// The SPI peripheral must be configured for mode 0, MSB first, at most
/// 10 MHz.
pub struct HalTransport<SPI, CS, RST, D> {
    spi: SPI,
    cs: CS,
    rst: RST,
    delay: D,
}

impl<SPI, CS, RST, D> HalTransport<SPI, CS, RST, D>
where
    SPI: Transfer<u8>,
    SPI::Error: Debug,
    CS: OutputPin,
    CS::Error: Debug,
    RST: OutputPin,
    RST::Error: Debug,
    D: DelayMs<u32>,
{
    pub fn new(spi: SPI, cs: CS, rst: RST, delay: D) -> Self {
        Self {
            spi,
            cs,
            rst,
            delay,
        }
    }

    /// Give the peripherals back.
    pub fn release(self) -> (SPI, CS, RST, D) {
        (self.spi, self.cs, self.rst, self.delay)
    }
}

fn pin_error<E: Debug>(what: &str, e: E) -> Error {
    Error::Transport(format!("{}: {:?}", what, e))
}

impl<SPI, CS, RST, D> Transport for HalTransport<SPI, CS, RST, D>
where
    SPI: Transfer<u8>,
    SPI::Error: Debug,
    CS: OutputPin,
    CS::Error: Debug,
    RST: OutputPin,
    RST::Error: Debug,
    D: DelayMs<u32>,
{
    fn select(&mut self) -> Result<()> {
        self.cs.set_low().map_err(|e| pin_error("NSS low", e))
    }

    fn deselect(&mut self) -> Result<()> {
        self.cs.set_high().map_err(|e| pin_error("NSS high", e))
    }

    fn exchange(&mut self, tx: &[u8]) -> Result<Vec<u8>> {
        let mut buf = tx.to_vec();
        let rx = self
            .spi
            .transfer(&mut buf)
            .map_err(|e| pin_error("SPI transfer", e))?;
        Ok(rx.to_vec())
    }

    fn reset(&mut self) -> Result<()> {
        self.rst.set_low().map_err(|e| pin_error("NRSTPD low", e))?;
        self.delay.delay_ms(RESET_PULSE_MS);
        self.rst.set_high().map_err(|e| pin_error("NRSTPD high", e))?;
        self.delay.delay_ms(RESET_SETTLE_MS as u32);
        Ok(())
    }
}
