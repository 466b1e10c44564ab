//! Acquisition and estimation core for a serial-attached waveform generator.
//!
//! A background producer reads `GEN:<dac>,IN:<adc>` lines from the device
//! and fills two fixed-size sample windows; consumers take snapshots on
//! their own cadence and derive a live zero-crossing frequency estimate.
//! A separate synchronous command path configures the generator's waveform.

pub mod acquisition;
pub mod command;
pub mod constants;
pub mod error;
pub mod estimator;
pub mod frame;
pub mod input;
pub mod link;
pub mod messages;
pub mod ring;
pub mod session;

pub use acquisition::LoopState;
pub use command::{WaveformCommand, WaveformKind};
pub use error::{CommandError, FrameError, TransportError, ValidationError};
pub use frame::Sample;
pub use link::LinkState;
pub use ring::RingBuffer;
pub use session::Monitor;
