// rc522/src/transport/traits.rs

use crate::Result;

/// Transport trait abstracts the chip-select gated byte channel (SPI and a
/// reset line) away from the register and protocol logic.
pub trait Transport {
    /// Assert chip select (drive NSS low).
    fn select(&mut self) -> Result<()>;

    /// Release chip select.
    fn deselect(&mut self) -> Result<()>;

    /// Full-duplex exchange: clock out `tx` and return the bytes clocked in,
    /// one per transmitted byte.
    fn exchange(&mut self, tx: &[u8]) -> Result<Vec<u8>>;

    /// Pulse the active-low reset line and wait for the chip to settle
    /// (at least `RESET_SETTLE_MS`).
    fn reset(&mut self) -> Result<()>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn select(&mut self) -> Result<()> {
        (**self).select()
    }

    fn deselect(&mut self) -> Result<()> {
        (**self).deselect()
    }

    fn exchange(&mut self, tx: &[u8]) -> Result<Vec<u8>> {
        (**self).exchange(tx)
    }

    fn reset(&mut self) -> Result<()> {
        (**self).reset()
    }
}

/// Scoped chip-select acquisition. NSS is asserted on creation and released
/// when the guard goes out of scope, on every exit path.
pub struct ChipSelect<'a> {
    transport: &'a mut dyn Transport,
}

impl<'a> ChipSelect<'a> {
    pub fn acquire(transport: &'a mut dyn Transport) -> Result<Self> {
        transport.select()?;
        Ok(Self { transport })
    }

    pub fn exchange(&mut self, tx: &[u8]) -> Result<Vec<u8>> {
        self.transport.exchange(tx)
    }
}

impl Drop for ChipSelect<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.transport.deselect() {
            log::warn!("failed to release chip select: {}", e);
        }
    }
}
