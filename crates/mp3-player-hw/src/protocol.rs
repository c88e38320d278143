//! Serial protocol definitions and frame encoding.
//!
//! Frame structure (10 bytes, multi-byte fields big-endian):
//! - Start byte: 0x7E
//! - Version byte: 0xFF
//! - Length byte: 0x06 (bytes between start and checksum, excluding start)
//! - Command byte, acknowledge flag, two parameter bytes
//! - Checksum (high, low): negated 16-bit sum of version through param2
//! - End byte: 0xEF

use crate::{Error, Result};
use std::str::FromStr;

/// Total frame size.
pub const FRAME_SIZE: usize = 10;

/// Frame start marker.
pub const START_BYTE: u8 = 0x7E;

/// Protocol version byte.
pub const VERSION_BYTE: u8 = 0xFF;

/// Length byte, constant for every command.
pub const COMMAND_LENGTH: u8 = 0x06;

/// Acknowledge flag. 0x01 asks the module to reply; replies are never read.
pub const ACKNOWLEDGE: u8 = 0x00;

/// Frame end marker.
pub const END_BYTE: u8 = 0xEF;

/// An encoded command frame.
pub type Frame = [u8; FRAME_SIZE];

/// Module command codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Command {
    /// Play next track.
    Next = 0x01,
    /// Play previous track.
    Previous = 0x02,
    /// Set volume (0x00-0x30).
    SetVolume = 0x06,
    /// Resume playback.
    Resume = 0x0D,
    /// Pause playback.
    Pause = 0x0E,
    /// Play track by index.
    PlayTrack = 0x11,
    /// Initialize and select storage.
    Initialize = 0x3F,
}

impl Command {
    /// Converts a byte value to Command.
    pub fn from_byte(value: u8) -> Result<Self> {
        match value {
            0x01 => Ok(Command::Next),
            0x02 => Ok(Command::Previous),
            0x06 => Ok(Command::SetVolume),
            0x0D => Ok(Command::Resume),
            0x0E => Ok(Command::Pause),
            0x11 => Ok(Command::PlayTrack),
            0x3F => Ok(Command::Initialize),
            _ => Err(Error::InvalidCommand(format!("0x{:02X}", value))),
        }
    }
}

impl From<Command> for u8 {
    fn from(command: Command) -> Self {
        command as u8
    }
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "next" => Ok(Command::Next),
            "previous" | "prev" => Ok(Command::Previous),
            "volume" | "set-volume" => Ok(Command::SetVolume),
            "resume" => Ok(Command::Resume),
            "pause" => Ok(Command::Pause),
            "track" | "play-track" => Ok(Command::PlayTrack),
            "init" | "initialize" => Ok(Command::Initialize),
            _ => Command::from_byte(parse_byte(s)?),
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Next => write!(f, "next"),
            Command::Previous => write!(f, "previous"),
            Command::SetVolume => write!(f, "set-volume"),
            Command::Resume => write!(f, "resume"),
            Command::Pause => write!(f, "pause"),
            Command::PlayTrack => write!(f, "play-track"),
            Command::Initialize => write!(f, "initialize"),
        }
    }
}

/// Computes the frame checksum.
///
/// The checksum is the two's-complement negation of the 16-bit sum of the
/// version, length, command, acknowledge and both parameter bytes.
pub fn checksum(command: u8, param1: u8, param2: u8) -> u16 {
    let sum = [
        VERSION_BYTE,
        COMMAND_LENGTH,
        command,
        ACKNOWLEDGE,
        param1,
        param2,
    ]
    .iter()
    .fold(0u16, |acc, &x| acc.wrapping_add(x as u16));
    0u16.wrapping_sub(sum)
}

/// Builds a command frame.
pub fn build_frame(command: u8, param1: u8, param2: u8) -> Frame {
    let [checksum_high, checksum_low] = checksum(command, param1, param2).to_be_bytes();
    [
        START_BYTE,
        VERSION_BYTE,
        COMMAND_LENGTH,
        command,
        ACKNOWLEDGE,
        param1,
        param2,
        checksum_high,
        checksum_low,
        END_BYTE,
    ]
}

/// Splits a 16-bit argument into (param1, param2).
pub fn split_param(value: u16) -> (u8, u8) {
    let [high, low] = value.to_be_bytes();
    (high, low)
}

/// Parses a byte given in decimal or `0x`-prefixed hex.
pub fn parse_byte(s: &str) -> Result<u8> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse::<u8>(),
    };
    parsed.map_err(|_| Error::InvalidByte(s.to_string()))
}

/// Formats a frame as space-separated hex bytes.
pub fn format_frame(frame: &[u8]) -> String {
    frame
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
