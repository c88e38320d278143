//! MP3 Module Control Tool
//!
//! CLI for driving a DFPlayer-style MP3 module over a serial port.

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mp3_player_hw::protocol::{build_frame, format_frame, parse_byte, FRAME_SIZE};
use mp3_player_hw::{Command, Delay, Mp3Player, RecordingDelay, MAX_VOLUME};
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::Config;

#[derive(Parser)]
#[command(name = "mp3ctl")]
#[command(about = "Control tool for UART MP3 modules")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file
    #[arg(short, long, default_value = "mp3ctl.toml")]
    config: PathBuf,

    /// Serial port path (overrides the configuration file)
    #[arg(short, long)]
    device: Option<String>,

    /// Print frames and delays instead of writing to the serial port
    #[arg(long)]
    dry_run: bool,

    /// Start the first track right after initialization
    #[arg(long)]
    autoplay: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Select storage, set volume 20 and play track 1
    PlayFirst,
    /// Pause playback
    Pause,
    /// Resume playback
    Resume,
    /// Skip to the next track
    Next,
    /// Go back to the previous track
    Previous,
    /// Set the volume (0-48)
    Volume {
        /// Volume level, decimal or 0x-hex
        #[arg(value_parser = parse_byte_arg)]
        level: u8,
    },
    /// Play a track by index
    Track {
        /// Track index (1-based)
        index: u16,
    },
    /// Send a raw command frame
    Send {
        /// Command name or byte (e.g. pause, 0x0E)
        #[arg(value_parser = parse_command_arg)]
        command: u8,

        /// First parameter byte
        #[arg(default_value = "0", value_parser = parse_byte_arg)]
        param1: u8,

        /// Second parameter byte
        #[arg(default_value = "0", value_parser = parse_byte_arg)]
        param2: u8,
    },
    /// Print the encoded frame without touching the serial port
    Frame {
        /// Command name or byte (e.g. volume, 0x06)
        #[arg(value_parser = parse_command_arg)]
        command: u8,

        /// First parameter byte
        #[arg(default_value = "0", value_parser = parse_byte_arg)]
        param1: u8,

        /// Second parameter byte
        #[arg(default_value = "0", value_parser = parse_byte_arg)]
        param2: u8,
    },
}

fn parse_byte_arg(s: &str) -> std::result::Result<u8, String> {
    parse_byte(s).map_err(|e| e.to_string())
}

fn parse_command_arg(s: &str) -> std::result::Result<u8, String> {
    s.parse::<Command>()
        .map(u8::from)
        .or_else(|_| parse_byte(s))
        .map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Commands::Frame {
        command,
        param1,
        param2,
    } = cli.command
    {
        println!("{}", frame_line(command, param1, param2));
        return Ok(());
    }

    let config = Config::load_or_default(&cli.config).with_context(|| {
        format!(
            "Failed to load configuration from {}",
            cli.config.display()
        )
    })?;
    let device = cli
        .device
        .clone()
        .unwrap_or_else(|| config.serial.device.clone());
    let autoplay = cli.autoplay || config.player.autoplay;

    if cli.dry_run {
        let mut player = Mp3Player::init(Vec::new(), RecordingDelay::new());
        run(&mut player, &cli.command, autoplay)?;
        print_dry_run(&player);
        return Ok(());
    }

    let mut player = Mp3Player::open(&device)
        .with_context(|| format!("Failed to open serial port {}", device))?;
    info!("Module initialized on {}", device);

    run(&mut player, &cli.command, autoplay)
}

fn run<W: Write, D: Delay>(
    player: &mut Mp3Player<W, D>,
    command: &Commands,
    autoplay: bool,
) -> Result<()> {
    // play-first already starts the first track
    if autoplay && !matches!(command, Commands::PlayFirst) {
        player
            .play_first_track()
            .context("Failed to start playback")?;
    }

    match command {
        Commands::PlayFirst => player.play_first_track()?,
        Commands::Pause => player.pause()?,
        Commands::Resume => player.resume()?,
        Commands::Next => player.next()?,
        Commands::Previous => player.previous()?,
        Commands::Volume { level } => {
            if *level > MAX_VOLUME {
                warn!(
                    "Volume {} is above the module's maximum of {}",
                    level, MAX_VOLUME
                );
            }
            player.set_volume(*level)?;
        }
        Commands::Track { index } => player.play_track(*index)?,
        Commands::Send {
            command,
            param1,
            param2,
        } => player.send_command(*command, *param1, *param2)?,
        Commands::Frame { .. } => anyhow::bail!("frame does not talk to the module"),
    }

    Ok(())
}

fn frame_line(command: u8, param1: u8, param2: u8) -> String {
    format_frame(&build_frame(command, param1, param2))
}

fn print_dry_run(player: &Mp3Player<Vec<u8>, RecordingDelay>) {
    for frame in player.port().chunks(FRAME_SIZE) {
        println!("{}", format_frame(frame));
    }
    let delays = player.delay().delays();
    println!(
        "delays (ms): {:?} total {}ms",
        delays,
        player.delay().total_ms()
    );
}
