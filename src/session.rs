//! The collaborator-facing session: owns the producer thread, the shared
//! windows and the writer half of the link.

use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crossbeam_channel::{bounded, Receiver};

use crate::acquisition::{AcquisitionLoop, LoopState, SharedState};
use crate::command::{self, WaveformCommand};
use crate::constants::CHANNEL_CAPACITY;
use crate::error::{CommandError, TransportError};
use crate::estimator;
use crate::link::{discover_port, LineTransport, LinkState, SerialLink};
use crate::messages::LinkEvent;

/// Live monitoring session over one device.
///
/// The acquisition thread is the sole writer of the sample windows; every
/// accessor here reads through an owned snapshot. Waveform commands go out
/// synchronously through a second handle on the link, independent of the
/// read path.
pub struct Monitor {
    shared: Arc<SharedState>,
    /// Writer half of the link; released by `stop()` once the producer has
    /// exited, so nothing can write through a torn-down session.
    writer: Mutex<Option<Box<dyn LineTransport>>>,
    events: Receiver<LinkEvent>,
    link_state: Mutex<LinkState>,
    producer: Option<JoinHandle<()>>,
}

impl Monitor {
    /// Opens the device and starts acquisition.
    ///
    /// With no `identifier`, auto-discovery scans for a USB port matching the
    /// device keywords and falls back to the platform default. Open or probe
    /// failure is fatal here; retrying is the caller's decision.
    pub fn start(identifier: Option<&str>, baud: u32) -> Result<Self, TransportError> {
        let port_name = match identifier {
            Some(name) => name.to_string(),
            None => discover_port(crate::constants::DEFAULT_PORT),
        };
        let mut reader = SerialLink::open(&port_name, baud)?;
        reader.probe()?;
        let writer = reader.try_clone()?;
        Ok(Self::from_transport(reader, writer))
    }

    /// Starts a session over pre-built transport halves. This is the seam
    /// for tests and simulated devices; `start` uses it with the two serial
    /// handles.
    pub fn from_transport<R, W>(reader: R, writer: W) -> Self
    where
        R: LineTransport + 'static,
        W: LineTransport + 'static,
    {
        let shared = Arc::new(SharedState::new());
        let (event_tx, event_rx) = bounded(CHANNEL_CAPACITY);

        let loop_shared = Arc::clone(&shared);
        let producer = std::thread::spawn(move || {
            // The loop hands the reader back on exit and it is dropped here,
            // strictly after the loop has stopped.
            let _reader = AcquisitionLoop::new(reader, loop_shared, event_tx).run();
        });

        Self {
            shared,
            writer: Mutex::new(Some(Box::new(writer))),
            events: event_rx,
            link_state: Mutex::new(LinkState::Open),
            producer: Some(producer),
        }
    }

    /// Stops buffering decoded samples at the next loop iteration boundary.
    /// Idempotent; the transport keeps draining while paused.
    pub fn pause(&self) {
        self.shared.pause();
    }

    pub fn resume(&self) {
        self.shared.resume();
    }

    pub fn loop_state(&self) -> LoopState {
        self.shared.loop_state()
    }

    /// Current link state, folding in any failure the producer reported.
    pub fn link_state(&self) -> LinkState {
        let mut state = self.link_state.lock().unwrap_or_else(|e| e.into_inner());
        while let Ok(LinkEvent::Failure(reason)) = self.events.try_recv() {
            *state = LinkState::Failed(reason);
        }
        state.clone()
    }

    /// Point-in-time copies of the generated and input windows, oldest
    /// first, each exactly the window capacity long.
    pub fn latest_samples(&self) -> (Vec<u16>, Vec<u16>) {
        let windows = self.shared.windows();
        (windows.generated.snapshot(), windows.input.snapshot())
    }

    /// Zero-crossing estimate over the current input window at the nominal
    /// sample cadence. `None` while the window carries no usable signal.
    pub fn estimated_frequency(&self) -> Option<f64> {
        let input = {
            let windows = self.shared.windows();
            windows.input.snapshot()
        };
        estimator::estimate_nominal(&input)
    }

    /// Validates, encodes and sends a waveform command, synchronously.
    /// Fails with a transport error once the session has been stopped.
    pub fn send_waveform(&self, cmd: &WaveformCommand) -> Result<(), CommandError> {
        let mut writer = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        match writer.as_mut() {
            Some(writer) => command::send(writer.as_mut(), cmd),
            None => Err(CommandError::TransportFailure(TransportError::Unavailable(
                "link closed".into(),
            ))),
        }
    }

    /// Tears the session down: signals the producer, waits for it to exit,
    /// then releases the writer. Safe to call more than once.
    pub fn stop(&mut self) {
        self.shared.request_stop();
        if let Some(handle) = self.producer.take() {
            if handle.join().is_err() {
                log::warn!("acquisition thread panicked during shutdown");
            }
            // Producer has observably stopped; only now release the writer.
            self.writer.lock().unwrap_or_else(|e| e.into_inner()).take();
            let mut state = self.link_state.lock().unwrap_or_else(|e| e.into_inner());
            if !matches!(*state, LinkState::Failed(_)) {
                *state = LinkState::Closed;
            }
        }
    }
}

impl Drop for Monitor {
    fn drop(&mut self) {
        self.stop();
    }
}
