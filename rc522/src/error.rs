// rc522/src/error.rs

use derive_more::Display;
use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("error in communication")]
    Communication,

    #[error("collision detected")]
    Collision,

    #[error("timeout in communication")]
    Timeout,

    #[error("buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },

    #[error("internal error: {0}")]
    Internal(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("CRC_A does not match")]
    CrcMismatch,

    #[error("MIFARE PICC responded with NAK")]
    MifareNack,

    // SPI/GPIO レベルの失敗。チップとの通信路そのものが壊れている
    #[error("transport error: {0}")]
    Transport(String),
}

impl Error {
    /// Collapse the error into the closed status taxonomy.
    pub fn status(&self) -> Status {
        match self {
            Error::Communication => Status::CommunicationError,
            Error::Collision => Status::Collision,
            Error::Timeout => Status::Timeout,
            Error::BufferTooSmall { .. } => Status::BufferTooSmall,
            Error::Internal(_) | Error::Transport(_) => Status::InternalError,
            Error::InvalidArgument(_) => Status::InvalidArgument,
            Error::CrcMismatch => Status::CrcMismatch,
            Error::MifareNack => Status::MifareNack,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Outcome of an engine operation, one value per call.
///
/// The `Display` text doubles as the diagnostic name table.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Status {
    #[display(fmt = "Success")]
    Ok,
    #[display(fmt = "Error in communication")]
    CommunicationError,
    #[display(fmt = "Collision detected")]
    Collision,
    #[display(fmt = "Timeout in communication")]
    Timeout,
    #[display(fmt = "A buffer is not big enough")]
    BufferTooSmall,
    #[display(fmt = "Internal error in the code, should not happen")]
    InternalError,
    #[display(fmt = "Invalid argument")]
    InvalidArgument,
    #[display(fmt = "The CRC_A does not match")]
    CrcMismatch,
    #[display(fmt = "A MIFARE PICC responded with NAK")]
    MifareNack,
}

impl Status {
    pub fn of<T>(result: &Result<T>) -> Self {
        match result {
            Ok(_) => Status::Ok,
            Err(e) => e.status(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Status::Ok)
    }
}
