//! Per-file progress lines with speed and ETA.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use corpus_transfer::{SpeedCalculator, UploadProgress};

struct FileState {
    filename: String,
    speed: SpeedCalculator,
    last_bytes: u64,
}

/// Renders progress snapshots from any number of concurrent sessions.
#[derive(Default)]
pub struct ProgressPrinter {
    sessions: HashMap<String, FileState>,
}

impl ProgressPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `progress` and returns the line to show for it.
    pub fn line(&mut self, progress: &UploadProgress) -> String {
        self.line_at(progress, Instant::now())
    }

    fn line_at(&mut self, progress: &UploadProgress, now: Instant) -> String {
        let state = self
            .sessions
            .entry(progress.session_id.clone())
            .or_insert_with(|| {
                // The window opens when the session started, not at the first ack.
                let mut speed = SpeedCalculator::default();
                speed.add_sample_at(now.checked_sub(progress.elapsed).unwrap_or(now), 0);
                FileState {
                    filename: progress.filename.clone(),
                    speed,
                    last_bytes: 0,
                }
            });
        state
            .speed
            .add_sample_at(now, progress.bytes_sent.saturating_sub(state.last_bytes));
        state.last_bytes = progress.bytes_sent;

        let speed = state.speed.bytes_per_second();
        let eta = state
            .speed
            .eta(progress.remaining_bytes())
            .map(format_duration)
            .unwrap_or_else(|| "--".into());

        if progress.chunks_sent == progress.total_chunks {
            self.sessions.remove(&progress.session_id);
        }

        render(progress, speed, &eta)
    }

    /// Drops state for a file that completed or failed. Its last progress
    /// event may never have arrived.
    pub fn finish(&mut self, filename: &str) {
        self.sessions.retain(|_, state| state.filename != filename);
    }
}

fn render(progress: &UploadProgress, speed: f64, eta: &str) -> String {
    format!(
        "[{}] {}/{} chunks {:5.1}% {} of {} at {}/s, ETA {}",
        progress.filename,
        progress.chunks_sent,
        progress.total_chunks,
        progress.percentage,
        format_bytes(progress.bytes_sent),
        format_bytes(progress.total_bytes),
        format_bytes(speed as u64),
        eta,
    )
}

pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs >= 3600 {
        format!("{}h{:02}m", secs / 3600, (secs % 3600) / 60)
    } else if secs >= 60 {
        format!("{}m{:02}s", secs / 60, secs % 60)
    } else {
        format!("{secs}s")
    }
}
