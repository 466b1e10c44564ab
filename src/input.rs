//! Text commands for the line-oriented collaborator binary.

use crate::command::{WaveformCommand, WaveformKind};
use crate::messages::UiEvent;

/// Maps one stdin line to a [`UiEvent`]. Unknown or incomplete commands map
/// to `None` and are reported by the caller.
pub fn parse_command(line: &str) -> Option<UiEvent> {
    let mut parts = line.split_whitespace();
    match parts.next()? {
        "pause" => Some(UiEvent::Pause),
        "resume" => Some(UiEvent::Resume),
        "quit" | "exit" => Some(UiEvent::Quit),
        "export" => Some(UiEvent::Export(parts.next()?.to_string())),
        "wave" => {
            let kind = WaveformKind::parse_kind(parts.next()?)?;
            let frequency_hz = parts.next()?.parse().ok()?;
            let amplitude = parts.next()?.parse().ok()?;
            let phase = parts.next()?.parse().ok()?;
            Some(UiEvent::SendWaveform(WaveformCommand {
                kind,
                frequency_hz,
                amplitude,
                phase,
            }))
        }
        _ => None,
    }
}
