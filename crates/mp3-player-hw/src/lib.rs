//! MP3 Player Hardware Library
//!
//! Driver for UART-controlled MP3 playback modules (DFPlayer Mini and
//! compatible boards). Commands are sent as fixed 10-byte frames; the
//! module's replies are never read.

pub mod delay;
pub mod error;
pub mod player;
pub mod protocol;
pub mod serial;

pub use delay::{Delay, RecordingDelay, ThreadDelay};
pub use error::{Error, Result};
pub use player::Mp3Player;
pub use protocol::{build_frame, checksum, Command, Frame};

/// Module UART baud rate.
pub const BAUD_RATE: u32 = 9600;

/// Volume set when starting the first track.
pub const DEFAULT_VOLUME: u8 = 20;

/// Highest volume the module accepts.
pub const MAX_VOLUME: u8 = 0x30;
