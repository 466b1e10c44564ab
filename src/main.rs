//! Line-oriented collaborator for the monitor core: prints the live
//! frequency estimate and accepts `pause`, `resume`,
//! `wave <kind> <freq> <amp> <phase>`, `export <path>` and `quit` on stdin.

use std::io::{BufRead, Write};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, Sender};

use wavemon::constants::{CHANNEL_CAPACITY, DEFAULT_BAUD, REFRESH_INTERVAL};
use wavemon::messages::UiEvent;
use wavemon::{input, LinkState, Monitor};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let port = std::env::args().nth(1);
    let mut monitor = match Monitor::start(port.as_deref(), DEFAULT_BAUD) {
        Ok(monitor) => monitor,
        Err(e) => {
            eprintln!("could not start monitor: {e}");
            return Err(e.into());
        }
    };

    let (event_tx, event_rx): (Sender<UiEvent>, Receiver<UiEvent>) = bounded(CHANNEL_CAPACITY);
    spawn_stdin_reader(event_tx);

    println!("commands: pause | resume | wave <kind> <freq> <amp> <phase> | export <path> | quit");
    run_consumer_loop(&monitor, &event_rx);

    monitor.stop();
    Ok(())
}

/// Forwards stdin lines as events. The thread is detached; it ends with the
/// process once stdin closes.
fn spawn_stdin_reader(event_tx: Sender<UiEvent>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match input::parse_command(&line) {
                Some(event) => {
                    let quitting = matches!(event, UiEvent::Quit);
                    let _ = event_tx.send(event);
                    if quitting {
                        break;
                    }
                }
                None if line.trim().is_empty() => {}
                None => eprintln!("unrecognized command: {line}"),
            }
        }
        let _ = event_tx.send(UiEvent::Quit);
    });
}

/// Fixed-cadence consumer: drains pending events, refreshes the estimate
/// readout once a second, and exits on quit or link failure.
fn run_consumer_loop(monitor: &Monitor, event_rx: &Receiver<UiEvent>) {
    let mut last_readout = Instant::now() - Duration::from_secs(1);

    loop {
        let tick_start = Instant::now();

        while let Ok(event) = event_rx.try_recv() {
            match event {
                UiEvent::Quit => return,
                UiEvent::Pause => monitor.pause(),
                UiEvent::Resume => monitor.resume(),
                UiEvent::SendWaveform(cmd) => match monitor.send_waveform(&cmd) {
                    Ok(()) => println!("sent {}", cmd.encode().unwrap_or_default().trim_end()),
                    Err(e) => eprintln!("command rejected: {e}"),
                },
                UiEvent::Export(path) => {
                    let (gen, input) = monitor.latest_samples();
                    match export_csv(std::path::Path::new(&path), &gen, &input) {
                        Ok(()) => println!("exported {} samples to {path}", gen.len()),
                        Err(e) => eprintln!("export failed: {e}"),
                    }
                }
            }
        }

        if let LinkState::Failed(reason) = monitor.link_state() {
            eprintln!("link failed: {reason}");
            return;
        }

        if last_readout.elapsed() >= Duration::from_secs(1) {
            last_readout = Instant::now();
            match monitor.estimated_frequency() {
                Some(freq) => println!("estimated frequency: {freq:.1} Hz"),
                None => println!("estimated frequency: --"),
            }
        }

        let elapsed = tick_start.elapsed();
        if elapsed < REFRESH_INTERVAL {
            std::thread::sleep(REFRESH_INTERVAL - elapsed);
        }
    }
}

/// Writes one snapshot pair as CSV: a header row, then one row per sample
/// index.
fn export_csv(path: &std::path::Path, gen: &[u16], input: &[u16]) -> std::io::Result<()> {
    let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
    writeln!(file, "Sample,Generated,Input")?;
    for (i, (g, v)) in gen.iter().zip(input.iter()).enumerate() {
        writeln!(file, "{i},{g},{v}")?;
    }
    file.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_csv_writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capture.csv");
        export_csv(&path, &[10, 20], &[30, 40]).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "Sample,Generated,Input\n0,10,30\n1,20,40\n");
    }
}
