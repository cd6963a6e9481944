// rc522/src/protocol/mod.rs

pub mod access;
pub mod checksum;
pub mod command;
pub mod frame;

pub use access::access_bits;
pub use checksum::{bcc, crc_a};
pub use command::{PiccCommand, ValueCommand};
pub use frame::SelectFrame;
