use thiserror::Error;

/// Failures of the physical serial link.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("device unavailable: {0}")]
    Unavailable(String),

    #[error("timed out waiting for device data")]
    Timeout,

    #[error("write failed: {0}")]
    WriteFailure(String),
}

/// A sample line that could not be turned into a trustworthy sample.
///
/// Frame errors are always recovered locally: the acquisition loop drops the
/// line and moves on, it never escalates them.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    #[error("malformed sample line")]
    Malformed,

    #[error("sample value {0} outside 0-4095")]
    OutOfRange(u32),
}

/// A waveform command field outside its device-defined range.
///
/// Values are rejected, never clamped, so nothing silently different from
/// what the user asked for reaches the device.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} value {value} outside {min}-{max}")]
    FieldOutOfRange {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },
}

/// Failure of a waveform command send, surfaced synchronously to the caller.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("transport failure: {0}")]
    TransportFailure(#[from] TransportError),
}
