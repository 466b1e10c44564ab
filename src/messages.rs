use crate::command::WaveformCommand;

/// Messages from the acquisition thread to the session/consumer side.
#[derive(Debug, Clone)]
pub enum LinkEvent {
    /// Unrecoverable transport failure; the acquisition loop has stopped.
    Failure(String),
}

/// Messages from the collaborator's input thread to its consumer loop.
#[derive(Debug, Clone)]
pub enum UiEvent {
    Pause,
    Resume,
    SendWaveform(WaveformCommand),
    Export(String),
    Quit,
}
