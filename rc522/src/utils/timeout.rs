//! Iteration budgets for the chip's busy-wait loops.
//!
//! The engine never sleeps while waiting on the MFRC522: it re-reads a
//! status register until a bit shows up or the budget runs out. One
//! register read over SPI takes a roughly fixed time, so the budget maps to
//! a deterministic worst-case latency.

/// Default ComIrqReg poll budget (about 36 ms at typical SPI clocks)
pub const DEFAULT_IRQ_POLL_BUDGET: u32 = 2000;

/// Default DivIrqReg poll budget while the CRC unit runs
pub const DEFAULT_CRC_POLL_BUDGET: u32 = 5000;

/// Default CommandReg.PowerDown poll budget after a soft reset
pub const DEFAULT_SOFT_RESET_POLL_BUDGET: u32 = 1000;

/// Counts down the register reads a poll loop may still perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollBudget {
    remaining: u32,
}

impl PollBudget {
    pub fn new(iterations: u32) -> Self {
        Self {
            remaining: iterations,
        }
    }

    /// Consume one iteration. Returns false once the budget is spent.
    pub fn tick(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }
}
