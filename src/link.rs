//! Serial link to the waveform generator.
//!
//! The device streams newline-terminated text frames continuously; reads are
//! therefore line-oriented and timeout-bounded, and a timeout is a normal,
//! frequent outcome rather than an error. Writes are fire-and-forget command
//! lines.

use std::io::{ErrorKind, Read, Write};

use serialport::{SerialPort, SerialPortType};

use crate::constants::{PORT_KEYWORDS, READ_TIMEOUT, SETTLE_DELAY};
use crate::error::TransportError;

/// Lifecycle of the physical link, tracked by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkState {
    Closed,
    Open,
    Failed(String),
}

/// Byte-stream seam between the acquisition loop, the command path and the
/// physical port, so both can run against in-memory fakes in tests.
pub trait LineTransport: Send {
    /// Blocks up to the read timeout and returns the bytes accumulated
    /// before a line terminator (terminator excluded, CR stripped). An empty
    /// buffer means the timeout elapsed with no complete line.
    fn read_line(&mut self) -> Result<Vec<u8>, TransportError>;

    /// Writes `bytes` to the device. Not retried on failure.
    fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError>;
}

/// The real serial transport.
pub struct SerialLink {
    port: Option<Box<dyn SerialPort>>,
    /// Bytes of a line still being accumulated across timed-out reads.
    pending: Vec<u8>,
}

impl SerialLink {
    /// Opens `identifier` at `baud` and waits out the device's post-open
    /// settle period.
    pub fn open(identifier: &str, baud: u32) -> Result<Self, TransportError> {
        let port = serialport::new(identifier, baud)
            .timeout(READ_TIMEOUT)
            .open()
            .map_err(|e| TransportError::Unavailable(format!("{identifier}: {e}")))?;
        std::thread::sleep(SETTLE_DELAY);
        log::info!("opened {identifier} at {baud} baud");
        Ok(Self {
            port: Some(port),
            pending: Vec::new(),
        })
    }

    /// Best-effort liveness probe: one bounded line read. A silent device is
    /// reported as [`TransportError::Timeout`].
    pub fn probe(&mut self) -> Result<(), TransportError> {
        let line = self.read_line()?;
        if line.is_empty() && self.pending.is_empty() {
            return Err(TransportError::Timeout);
        }
        Ok(())
    }

    /// Second handle onto the same port, for the command path. The clone
    /// shares the file descriptor but owns its own read/write position.
    pub fn try_clone(&self) -> Result<Self, TransportError> {
        let port = self
            .port
            .as_ref()
            .ok_or_else(|| TransportError::Unavailable("link already closed".into()))?
            .try_clone()
            .map_err(|e| TransportError::Unavailable(e.to_string()))?;
        Ok(Self {
            port: Some(port),
            pending: Vec::new(),
        })
    }

    /// Releases the port handle. Idempotent; safe to call from teardown in
    /// any state.
    pub fn close(&mut self) {
        if self.port.take().is_some() {
            log::info!("serial link closed");
        }
    }
}

impl Drop for SerialLink {
    fn drop(&mut self) {
        self.close();
    }
}

impl LineTransport for SerialLink {
    fn read_line(&mut self) -> Result<Vec<u8>, TransportError> {
        let port = self
            .port
            .as_mut()
            .ok_or_else(|| TransportError::Unavailable("link closed".into()))?;

        let mut byte = [0u8; 1];
        loop {
            match port.read(&mut byte) {
                Ok(0) => return Err(TransportError::Unavailable("device disconnected".into())),
                Ok(_) => match byte[0] {
                    b'\n' => return Ok(std::mem::take(&mut self.pending)),
                    b'\r' => {}
                    b => self.pending.push(b),
                },
                // Timeout is a normal outcome: report an empty read and keep
                // the partial line for the next call.
                Err(e) if e.kind() == ErrorKind::TimedOut || e.kind() == ErrorKind::WouldBlock => {
                    return Ok(Vec::new());
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(TransportError::Unavailable(e.to_string())),
            }
        }
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        let port = self
            .port
            .as_mut()
            .ok_or_else(|| TransportError::Unavailable("link closed".into()))?;
        port.write_all(bytes)
            .and_then(|_| port.flush())
            .map_err(|e| TransportError::WriteFailure(e.to_string()))
    }
}

/// Picks a likely device port: the first enumerated USB port whose product
/// description mentions one of [`PORT_KEYWORDS`], falling back to `default`.
/// Best-effort only; ambiguity resolves to enumeration order.
pub fn discover_port(default: &str) -> String {
    let ports = match serialport::available_ports() {
        Ok(ports) => ports,
        Err(e) => {
            log::warn!("port enumeration failed: {e}");
            return default.to_string();
        }
    };
    for info in ports {
        if let SerialPortType::UsbPort(usb) = &info.port_type {
            let product = usb.product.as_deref().unwrap_or("");
            if PORT_KEYWORDS.iter().any(|kw| product.contains(kw)) {
                log::info!("auto-discovered {} ({product})", info.port_name);
                return info.port_name;
            }
        }
    }
    log::info!("no matching port found, falling back to {default}");
    default.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_is_idempotent_in_any_state() {
        let mut link = SerialLink {
            port: None,
            pending: Vec::new(),
        };
        link.close();
        link.close();
        assert!(link.read_line().is_err());
        assert!(link.write(b"wave=sine,freq=1,amp=1,phase=0\n").is_err());
    }
}
