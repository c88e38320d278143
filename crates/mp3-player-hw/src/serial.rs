//! Serial port setup for the module's UART.

use crate::{Error, Result, BAUD_RATE};
use std::time::Duration;
use tokio_serial::{DataBits, Parity, SerialPort, StopBits};
use tracing::{debug, info};

/// Write timeout for a single frame.
const WRITE_TIMEOUT: Duration = Duration::from_millis(500);

/// Opens the serial port at the module's baud rate (8N1).
pub fn open_port(port_path: &str) -> Result<Box<dyn SerialPort>> {
    debug!("Opening serial port {} at {} baud", port_path, BAUD_RATE);

    let port = tokio_serial::new(port_path, BAUD_RATE)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .timeout(WRITE_TIMEOUT)
        .open()
        .map_err(|e| {
            // Report a missing device distinctly from other open failures
            if !std::path::Path::new(port_path).exists() {
                debug!("Failed to open {}: {}", port_path, e);
                return Error::PortNotFound(port_path.to_string());
            }
            Error::Serial(e)
        })?;

    info!("Serial port opened: {} ({} baud)", port_path, BAUD_RATE);
    Ok(port)
}
