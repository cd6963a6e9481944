// rc522/src/prelude.rs

pub use crate::card::Card;
pub use crate::device::{
    Config, Device, DeviceBuilder, Initialized, Response, TransceiveRequest, Uninitialized,
};
pub use crate::transport::{MockTransport, Transport};
pub use crate::{
    Atqa, BlockData, ChipVersion, Error, KeyType, MifareKey, PiccType, Result, RxGain, Status,
    Uid,
};

// Re-export small utilities for convenience
pub use crate::utils::{bytes_to_hex, bytes_to_hex_spaced};
