use crate::constants::SAMPLE_VALUE_MAX;
use crate::error::FrameError;

/// One synchronized DAC/ADC reading, immutable once decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub generated: u16,
    pub input: u16,
}

/// Decodes one line of the device's text protocol: `GEN:<int>,IN:<int>`.
///
/// Missing prefixes, a missing separator or a non-integer field yield
/// [`FrameError::Malformed`]; an integer outside the 12-bit range yields
/// [`FrameError::OutOfRange`]. Out-of-range values are rejected rather than
/// clamped so the buffered windows stay trustworthy.
pub fn parse_line(line: &str) -> Result<Sample, FrameError> {
    let line = line.trim();
    let (gen_part, in_part) = line.split_once(',').ok_or(FrameError::Malformed)?;
    let gen_text = gen_part.strip_prefix("GEN:").ok_or(FrameError::Malformed)?;
    let in_text = in_part.strip_prefix("IN:").ok_or(FrameError::Malformed)?;

    let generated = parse_value(gen_text)?;
    let input = parse_value(in_text)?;
    Ok(Sample { generated, input })
}

fn parse_value(text: &str) -> Result<u16, FrameError> {
    // Parse wide first so an oversized reading classifies as out-of-range,
    // not malformed.
    let value: u32 = text.trim().parse().map_err(|_| FrameError::Malformed)?;
    if value > SAMPLE_VALUE_MAX {
        return Err(FrameError::OutOfRange(value));
    }
    Ok(value as u16)
}
