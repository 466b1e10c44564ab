use crate::error::{CommandError, ValidationError};
use crate::link::LineTransport;

/// Waveform shapes the generator firmware understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveformKind {
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

impl WaveformKind {
    pub fn as_str(self) -> &'static str {
        match self {
            WaveformKind::Sine => "sine",
            WaveformKind::Square => "square",
            WaveformKind::Triangle => "triangle",
            WaveformKind::Sawtooth => "sawtooth",
        }
    }

    pub fn parse_kind(text: &str) -> Option<Self> {
        match text {
            "sine" => Some(WaveformKind::Sine),
            "square" => Some(WaveformKind::Square),
            "triangle" => Some(WaveformKind::Triangle),
            "sawtooth" => Some(WaveformKind::Sawtooth),
            _ => None,
        }
    }
}

/// A waveform configuration destined for the device.
///
/// Fields are kept wide so user input can be carried as-is and rejected by
/// [`WaveformCommand::validate`] instead of being clamped on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveformCommand {
    pub kind: WaveformKind,
    /// Hz; no device-declared upper bound.
    pub frequency_hz: u32,
    /// Valid range 0-255.
    pub amplitude: u32,
    /// Valid range 0-360 degrees.
    pub phase: u32,
}

impl WaveformCommand {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.amplitude > 255 {
            return Err(ValidationError::FieldOutOfRange {
                field: "amplitude",
                value: self.amplitude,
                min: 0,
                max: 255,
            });
        }
        if self.phase > 360 {
            return Err(ValidationError::FieldOutOfRange {
                field: "phase",
                value: self.phase,
                min: 0,
                max: 360,
            });
        }
        Ok(())
    }

    /// Serializes to the device's command line. Validation precedes
    /// serialization, so an invalid command never produces output.
    pub fn encode(&self) -> Result<String, ValidationError> {
        self.validate()?;
        Ok(format!(
            "wave={},freq={},amp={},phase={}\n",
            self.kind.as_str(),
            self.frequency_hz,
            self.amplitude,
            self.phase
        ))
    }
}

/// Validates, encodes and writes `cmd` through `transport`.
///
/// Transport failures surface to the caller unchanged; there is no retry.
pub fn send(transport: &mut dyn LineTransport, cmd: &WaveformCommand) -> Result<(), CommandError> {
    let line = cmd.encode()?;
    transport.write(line.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;

    struct RecordingTransport {
        written: Vec<u8>,
    }

    impl LineTransport for RecordingTransport {
        fn read_line(&mut self) -> Result<Vec<u8>, TransportError> {
            Ok(Vec::new())
        }

        fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
            self.written.extend_from_slice(bytes);
            Ok(())
        }
    }

    struct BrokenTransport;

    impl LineTransport for BrokenTransport {
        fn read_line(&mut self) -> Result<Vec<u8>, TransportError> {
            Ok(Vec::new())
        }

        fn write(&mut self, _bytes: &[u8]) -> Result<(), TransportError> {
            Err(TransportError::WriteFailure("pipe closed".into()))
        }
    }

    fn sine(frequency_hz: u32, amplitude: u32, phase: u32) -> WaveformCommand {
        WaveformCommand {
            kind: WaveformKind::Sine,
            frequency_hz,
            amplitude,
            phase,
        }
    }

    #[test]
    fn encodes_exact_wire_shape() {
        assert_eq!(
            sine(1000, 200, 0).encode().unwrap(),
            "wave=sine,freq=1000,amp=200,phase=0\n"
        );
    }

    #[test]
    fn encodes_each_kind() {
        for (kind, name) in [
            (WaveformKind::Sine, "sine"),
            (WaveformKind::Square, "square"),
            (WaveformKind::Triangle, "triangle"),
            (WaveformKind::Sawtooth, "sawtooth"),
        ] {
            let cmd = WaveformCommand {
                kind,
                frequency_hz: 50,
                amplitude: 10,
                phase: 90,
            };
            assert_eq!(
                cmd.encode().unwrap(),
                format!("wave={name},freq=50,amp=10,phase=90\n")
            );
        }
    }

    #[test]
    fn rejects_amplitude_out_of_range() {
        assert_eq!(
            sine(1000, 300, 0).encode(),
            Err(ValidationError::FieldOutOfRange {
                field: "amplitude",
                value: 300,
                min: 0,
                max: 255,
            })
        );
    }

    #[test]
    fn rejects_phase_out_of_range() {
        assert!(sine(1000, 200, 361).encode().is_err());
        assert!(sine(1000, 200, 360).encode().is_ok());
    }

    #[test]
    fn invalid_command_performs_no_write() {
        let mut transport = RecordingTransport { written: Vec::new() };
        let err = send(&mut transport, &sine(1000, 300, 0)).unwrap_err();
        assert!(matches!(err, CommandError::Invalid(_)));
        assert!(transport.written.is_empty());
    }

    #[test]
    fn valid_command_writes_one_line() {
        let mut transport = RecordingTransport { written: Vec::new() };
        send(&mut transport, &sine(440, 128, 180)).unwrap();
        assert_eq!(
            transport.written,
            b"wave=sine,freq=440,amp=128,phase=180\n"
        );
    }

    #[test]
    fn write_failure_surfaces_as_transport_failure() {
        let err = send(&mut BrokenTransport, &sine(1000, 200, 0)).unwrap_err();
        assert!(matches!(err, CommandError::TransportFailure(_)));
    }
}
