//! Background acquisition: read lines, decode, buffer.
//!
//! The loop is the sole writer of the shared sample windows. It never
//! terminates on protocol noise; a malformed or out-of-range line is dropped
//! and the loop proceeds. Only an explicit stop request or an unrecoverable
//! transport failure ends it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crossbeam_channel::Sender;

use crate::constants::WINDOW_SAMPLES;
use crate::frame;
use crate::link::LineTransport;
use crate::messages::LinkEvent;
use crate::ring::RingBuffer;

/// Externally observable state of the acquisition loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
    Paused,
    Stopped,
}

/// The generated and input windows, kept under one lock so a lockstep push
/// of a decoded pair is atomic with respect to a two-window snapshot.
pub struct SampleWindows {
    pub generated: RingBuffer<u16>,
    pub input: RingBuffer<u16>,
}

impl SampleWindows {
    fn new() -> Self {
        Self {
            generated: RingBuffer::new(WINDOW_SAMPLES, 0),
            input: RingBuffer::new(WINDOW_SAMPLES, 0),
        }
    }
}

/// State shared between the producer thread and the control/consumer path.
///
/// The windows have a single writer (the loop); the flags have a single
/// writer each (the control path). Eventual visibility within one loop
/// iteration is all the pause/stop transitions need.
pub struct SharedState {
    windows: Mutex<SampleWindows>,
    paused: AtomicBool,
    stopped: AtomicBool,
    started: AtomicBool,
}

impl SharedState {
    pub fn new() -> Self {
        Self {
            windows: Mutex::new(SampleWindows::new()),
            paused: AtomicBool::new(false),
            stopped: AtomicBool::new(false),
            started: AtomicBool::new(false),
        }
    }

    pub(crate) fn windows(&self) -> MutexGuard<'_, SampleWindows> {
        // A poisoned lock still holds structurally valid windows; recover
        // the data rather than poisoning the whole pipeline.
        self.windows.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn pause(&self) {
        self.paused.store(true, Ordering::Relaxed);
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::Relaxed);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Relaxed)
    }

    /// Terminal. The producer observes this within one bounded read cycle.
    pub fn request_stop(&self) {
        self.stopped.store(true, Ordering::Relaxed);
    }

    pub fn stop_requested(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }

    pub(crate) fn mark_started(&self) {
        self.started.store(true, Ordering::Relaxed);
    }

    pub fn loop_state(&self) -> LoopState {
        if self.stop_requested() {
            LoopState::Stopped
        } else if !self.started.load(Ordering::Relaxed) {
            LoopState::Idle
        } else if self.is_paused() {
            LoopState::Paused
        } else {
            LoopState::Running
        }
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}

/// The producer: owns the reader half of the link for the lifetime of the
/// loop and releases it on exit. Closing the underlying port is the
/// teardown path's job, after the loop has observably stopped.
pub struct AcquisitionLoop<T: LineTransport> {
    transport: T,
    shared: Arc<SharedState>,
    events: Sender<LinkEvent>,
}

impl<T: LineTransport> AcquisitionLoop<T> {
    pub fn new(transport: T, shared: Arc<SharedState>, events: Sender<LinkEvent>) -> Self {
        Self {
            transport,
            shared,
            events,
        }
    }

    /// Runs until stop is requested or the transport fails unrecoverably.
    /// Returns the transport so the caller controls when it is closed.
    pub fn run(mut self) -> T {
        self.shared.mark_started();
        loop {
            if self.shared.stop_requested() {
                break;
            }

            let line = match self.transport.read_line() {
                Ok(line) => line,
                Err(e) => {
                    log::warn!("acquisition stopped: {e}");
                    let _ = self.events.try_send(LinkEvent::Failure(e.to_string()));
                    self.shared.request_stop();
                    break;
                }
            };
            // Timeout: a no-op iteration, back to the stop check.
            if line.is_empty() {
                continue;
            }

            let text = String::from_utf8_lossy(&line);
            let sample = match frame::parse_line(&text) {
                Ok(sample) => sample,
                Err(e) => {
                    log::debug!("dropped frame {text:?}: {e}");
                    continue;
                }
            };

            // Paused: keep draining the transport, discard the sample.
            if self.shared.is_paused() {
                continue;
            }

            let mut windows = self.shared.windows();
            windows.generated.push(sample.generated);
            windows.input.push(sample.input);
        }
        self.transport
    }
}
