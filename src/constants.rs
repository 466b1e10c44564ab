use std::time::Duration;

/// Number of samples retained per channel window.
pub const WINDOW_SAMPLES: usize = 1024;
/// Highest value the device's 12-bit DAC/ADC can report.
pub const SAMPLE_VALUE_MAX: u32 = 4095;
/// Nominal time between consecutive sample pairs. The firmware emits one
/// `GEN:/IN:` line per millisecond, so a crossing-index distance of k samples
/// corresponds to a period of k milliseconds.
pub const SAMPLE_INTERVAL_MS: f64 = 1.0;
/// Serial line rate the device ships with.
pub const DEFAULT_BAUD: u32 = 115_200;
/// Port used when auto-discovery finds nothing and the caller gave none.
pub const DEFAULT_PORT: &str = "/dev/ttyUSB0";
/// Substrings matched against a port's USB product description during discovery.
pub const PORT_KEYWORDS: [&str; 2] = ["USB", "ESP32"];
/// Upper bound on a single blocking line read.
pub const READ_TIMEOUT: Duration = Duration::from_secs(1);
/// Time the device needs after the port opens before it streams reliably.
pub const SETTLE_DELAY: Duration = Duration::from_secs(2);
/// Consumer cadence for snapshots and estimate refresh.
pub const REFRESH_INTERVAL: Duration = Duration::from_millis(50);
/// Channel capacity for inter-thread messages.
pub const CHANNEL_CAPACITY: usize = 64;
