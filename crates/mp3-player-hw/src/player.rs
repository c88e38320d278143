//! Playback control over the module's serial line.

use crate::delay::{Delay, ThreadDelay};
use crate::protocol::{build_frame, split_param, Command};
use crate::serial::open_port;
use crate::{Result, DEFAULT_VOLUME};
use std::io::Write;
use tokio_serial::SerialPort;
use tracing::{debug, info};

/// Cooldown after opening the port, before the first command.
pub const INIT_DELAY_MS: u64 = 1000;

/// Delay after a playback command.
pub const COMMAND_DELAY_MS: u64 = 500;

/// Delay after a volume change.
pub const VOLUME_DELAY_MS: u64 = 2000;

/// MP3 module controller.
///
/// Owns the byte sink the frames are written to and the delay used to pace
/// commands. Operations take `&mut self`; concurrent use must go through the
/// caller's own synchronization.
pub struct Mp3Player<W, D = ThreadDelay> {
    port: W,
    delay: D,
    playing: bool,
}

impl Mp3Player<Box<dyn SerialPort>, ThreadDelay> {
    /// Opens the serial port and initializes the player.
    pub fn open(port_path: &str) -> Result<Self> {
        let port = open_port(port_path)?;
        Ok(Self::init(port, ThreadDelay))
    }
}

impl<W: Write, D: Delay> Mp3Player<W, D> {
    /// Initializes the player on an already-open connection.
    ///
    /// Waits for the module to settle and clears the playing flag.
    pub fn init(port: W, mut delay: D) -> Self {
        debug!("Waiting for module initialization ({}ms)", INIT_DELAY_MS);
        delay.delay_ms(INIT_DELAY_MS);
        Self {
            port,
            delay,
            playing: false,
        }
    }

    /// Encodes and writes a single command frame.
    ///
    /// Parameters are sent as given; no range checks are applied.
    pub fn send_command(&mut self, command: impl Into<u8>, param1: u8, param2: u8) -> Result<()> {
        let frame = build_frame(command.into(), param1, param2);

        debug!("Sending frame: {:02X?}", frame);

        self.port.write_all(&frame)?;
        self.port.flush()?;
        Ok(())
    }

    /// Selects storage, sets the default volume and starts track 1.
    pub fn play_first_track(&mut self) -> Result<()> {
        self.send_command(Command::Initialize, 0, 0)?;
        self.delay.delay_ms(COMMAND_DELAY_MS);
        self.set_volume(DEFAULT_VOLUME)?;
        self.delay.delay_ms(COMMAND_DELAY_MS);
        self.send_command(Command::PlayTrack, 0, 1)?;
        self.delay.delay_ms(COMMAND_DELAY_MS);
        self.playing = true;
        info!("Started first track");
        Ok(())
    }

    /// Plays a track by its 1-based index.
    pub fn play_track(&mut self, index: u16) -> Result<()> {
        let (high, low) = split_param(index);
        self.send_command(Command::PlayTrack, high, low)?;
        self.delay.delay_ms(COMMAND_DELAY_MS);
        self.playing = true;
        info!("Playing track {}", index);
        Ok(())
    }

    /// Pauses playback. The playing flag is left unchanged.
    pub fn pause(&mut self) -> Result<()> {
        self.send_command(Command::Pause, 0, 0)?;
        self.delay.delay_ms(COMMAND_DELAY_MS);
        info!("Paused");
        Ok(())
    }

    /// Resumes playback. The playing flag is left unchanged.
    pub fn resume(&mut self) -> Result<()> {
        self.send_command(Command::Resume, 0, 1)?;
        self.delay.delay_ms(COMMAND_DELAY_MS);
        info!("Resumed");
        Ok(())
    }

    /// Skips to the next track.
    pub fn next(&mut self) -> Result<()> {
        self.send_command(Command::Next, 0, 1)?;
        self.delay.delay_ms(COMMAND_DELAY_MS);
        info!("Next track");
        Ok(())
    }

    /// Goes back to the previous track.
    pub fn previous(&mut self) -> Result<()> {
        self.send_command(Command::Previous, 0, 1)?;
        self.delay.delay_ms(COMMAND_DELAY_MS);
        info!("Previous track");
        Ok(())
    }

    /// Sets the volume. The module accepts 0x00-0x30; larger values are
    /// passed through.
    pub fn set_volume(&mut self, volume: u8) -> Result<()> {
        self.send_command(Command::SetVolume, 0, volume)?;
        self.delay.delay_ms(VOLUME_DELAY_MS);
        info!("Volume set to {}", volume);
        Ok(())
    }

    /// Returns true once playback has been started.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Records a playback state change made outside this player's knowledge.
    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    /// Returns the delay capability.
    pub fn delay(&self) -> &D {
        &self.delay
    }

    /// Returns the underlying connection.
    pub fn port(&self) -> &W {
        &self.port
    }

    /// Consumes the player and returns the connection and delay.
    pub fn into_parts(self) -> (W, D) {
        (self.port, self.delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delay::RecordingDelay;
    use crate::protocol::FRAME_SIZE;
    use crate::Error;

    fn player() -> Mp3Player<Vec<u8>, RecordingDelay> {
        Mp3Player::init(Vec::new(), RecordingDelay::new())
    }

    fn frames(bytes: &[u8]) -> Vec<&[u8]> {
        assert_eq!(bytes.len() % FRAME_SIZE, 0);
        bytes.chunks(FRAME_SIZE).collect()
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "disconnected",
            ))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_init() {
        let player = player();
        assert!(!player.is_playing());
        assert!(player.port().is_empty());
        assert_eq!(player.delay().delays(), &[INIT_DELAY_MS]);
    }

    #[test]
    fn test_play_first_track() {
        let mut player = player();
        player.play_first_track().unwrap();
        assert!(player.is_playing());

        let (port, delay) = player.into_parts();
        let sent = frames(&port);
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[0], build_frame(0x3F, 0, 0));
        assert_eq!(sent[1], build_frame(0x06, 0, 20));
        assert_eq!(sent[2], build_frame(0x11, 0, 1));
        assert_eq!(delay.delays(), &[1000, 500, 2000, 500, 500]);
    }

    #[test]
    fn test_pause() {
        let mut player = player();
        player.pause().unwrap();
        assert_eq!(
            player.port().as_slice(),
            &[0x7E, 0xFF, 0x06, 0x0E, 0x00, 0x00, 0x00, 0xFE, 0xE7, 0xEF]
        );
        assert_eq!(player.delay().delays(), &[1000, 500]);
    }

    #[test]
    fn test_transport_commands() {
        let mut player = player();
        player.resume().unwrap();
        player.next().unwrap();
        player.previous().unwrap();

        let sent = frames(player.port());
        assert_eq!(sent[0], build_frame(0x0D, 0, 1));
        assert_eq!(sent[1], build_frame(0x01, 0, 1));
        assert_eq!(sent[2], build_frame(0x02, 0, 1));
        assert_eq!(player.delay().delays(), &[1000, 500, 500, 500]);
    }

    #[test]
    fn test_pause_resume_keep_flag() {
        let mut player = player();
        player.play_first_track().unwrap();
        player.pause().unwrap();
        assert!(player.is_playing());

        player.set_playing(false);
        player.resume().unwrap();
        assert!(!player.is_playing());
    }

    #[test]
    fn test_set_volume_idempotent() {
        let mut player = player();
        player.set_volume(20).unwrap();
        player.set_volume(20).unwrap();

        let sent = frames(player.port());
        assert_eq!(sent[0], sent[1]);
        assert_eq!(
            sent[0],
            &[0x7E, 0xFF, 0x06, 0x06, 0x00, 0x00, 0x14, 0xFE, 0xD7, 0xEF]
        );
        assert_eq!(player.delay().delays(), &[1000, 2000, 2000]);
    }

    #[test]
    fn test_set_volume_out_of_range() {
        let mut player = player();
        player.set_volume(0).unwrap();
        player.set_volume(255).unwrap();

        let sent = frames(player.port());
        assert_eq!(sent[0][6], 0x00);
        assert_eq!(sent[1][6], 0xFF);
    }

    #[test]
    fn test_play_track() {
        let mut player = player();
        player.play_track(0x0102).unwrap();
        assert!(player.is_playing());
        assert_eq!(player.port().as_slice(), build_frame(0x11, 0x01, 0x02));
    }

    #[test]
    fn test_send_raw_command() {
        let mut player = player();
        player.send_command(0x42u8, 0x00, 0x00).unwrap();
        assert_eq!(player.port().as_slice(), build_frame(0x42, 0, 0));
        // Raw sends are not paced
        assert_eq!(player.delay().delays(), &[1000]);
    }

    #[test]
    fn test_open_missing_port() {
        let result = Mp3Player::open("/dev/does-not-exist-mp3");
        assert!(matches!(result, Err(Error::PortNotFound(_))));
    }

    #[test]
    fn test_write_failure_is_reported() {
        let mut player = Mp3Player::init(FailingWriter, RecordingDelay::new());
        let result = player.play_first_track();
        assert!(matches!(result, Err(Error::SerialIo(_))));
        assert!(!player.is_playing());
        assert_eq!(player.delay().delays(), &[1000]);
    }
}
