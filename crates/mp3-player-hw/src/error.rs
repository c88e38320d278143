//! Error types for the MP3 module driver.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when talking to the module.
#[derive(Error, Debug)]
pub enum Error {
    /// Serial port does not exist.
    #[error("Serial port not found at {0}")]
    PortNotFound(String),

    /// Serial port could not be opened or configured.
    #[error("Serial port error: {0}")]
    Serial(#[from] tokio_serial::Error),

    /// Writing a frame to the serial line failed.
    #[error("Serial write failed: {0}")]
    SerialIo(#[from] std::io::Error),

    /// Unknown command name.
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// Value does not fit in a single protocol byte.
    #[error("Invalid byte value (must be 0-255 or 0x00-0xFF): {0}")]
    InvalidByte(String),
}
