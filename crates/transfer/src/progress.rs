use std::collections::VecDeque;
use std::time::{Duration, Instant};

use serde::Serialize;

/// Callback invoked after each acknowledged chunk.
pub type ProgressCallback = Box<dyn Fn(&UploadProgress) + Send + Sync>;

/// Progress snapshot of one upload session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadProgress {
    pub session_id: String,
    pub filename: String,
    pub chunks_sent: u32,
    pub total_chunks: u32,
    pub bytes_sent: u64,
    pub total_bytes: u64,
    /// `chunks_sent / total_chunks * 100`, exactly 100 once the last chunk is in.
    pub percentage: f64,
    /// Time since the session started.
    #[serde(skip)]
    pub elapsed: Duration,
}

impl UploadProgress {
    pub fn new(
        session_id: String,
        filename: String,
        chunks_sent: u32,
        total_chunks: u32,
        bytes_sent: u64,
        total_bytes: u64,
    ) -> Self {
        let percentage = if total_chunks == 0 {
            0.0
        } else {
            f64::from(chunks_sent) / f64::from(total_chunks) * 100.0
        };
        Self {
            session_id,
            filename,
            chunks_sent,
            total_chunks,
            bytes_sent,
            total_bytes,
            percentage,
            elapsed: Duration::ZERO,
        }
    }

    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }

    pub fn remaining_bytes(&self) -> u64 {
        self.total_bytes.saturating_sub(self.bytes_sent)
    }
}

// ---------------------------------------------------------------------------
// SpeedCalculator
// ---------------------------------------------------------------------------

const DEFAULT_WINDOW: Duration = Duration::from_secs(5);
const DEFAULT_MAX_SAMPLES: usize = 100;

/// Transfer speed over a sliding window of acknowledged-byte samples.
pub struct SpeedCalculator {
    samples: VecDeque<(Instant, u64)>,
    max_samples: usize,
    window: Duration,
}

impl Default for SpeedCalculator {
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl SpeedCalculator {
    /// `window` defaults to 5 s, `max_samples` to 100.
    pub fn new(window: Option<Duration>, max_samples: Option<usize>) -> Self {
        Self {
            samples: VecDeque::new(),
            max_samples: max_samples.unwrap_or(DEFAULT_MAX_SAMPLES).max(2),
            window: window.unwrap_or(DEFAULT_WINDOW),
        }
    }

    /// Records `bytes` transferred now.
    pub fn add_sample(&mut self, bytes: u64) {
        self.add_sample_at(Instant::now(), bytes);
    }

    /// Records `bytes` transferred at `at`. Samples must not go back in time.
    pub fn add_sample_at(&mut self, at: Instant, bytes: u64) {
        self.samples.push_back((at, bytes));

        while let Some(&(t, _)) = self.samples.front() {
            if at.duration_since(t) > self.window {
                self.samples.pop_front();
            } else {
                break;
            }
        }
        while self.samples.len() > self.max_samples {
            self.samples.pop_front();
        }
    }

    /// Average bytes/second across the window; 0.0 with fewer than 2 samples.
    ///
    /// The first sample only marks the start of the window, so its bytes
    /// are not counted.
    pub fn bytes_per_second(&self) -> f64 {
        let (Some(&(first, _)), Some(&(last, _))) = (self.samples.front(), self.samples.back())
        else {
            return 0.0;
        };
        if self.samples.len() < 2 {
            return 0.0;
        }
        let elapsed = last.duration_since(first);
        if elapsed.is_zero() {
            return 0.0;
        }
        let bytes: u64 = self.samples.iter().skip(1).map(|&(_, b)| b).sum();
        bytes as f64 / elapsed.as_secs_f64()
    }

    /// Estimated time to move `remaining_bytes`, if a speed is known.
    pub fn eta(&self, remaining_bytes: u64) -> Option<Duration> {
        let speed = self.bytes_per_second();
        (speed > 0.0).then(|| Duration::from_secs_f64(remaining_bytes as f64 / speed))
    }

    pub fn reset(&mut self) {
        self.samples.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(sent: u32, total: u32) -> UploadProgress {
        UploadProgress::new("s".into(), "f".into(), sent, total, 0, 0)
    }

    #[test]
    fn percentage_is_strictly_increasing_and_ends_at_100() {
        for total in [1u32, 2, 3, 7, 10, 333, 1024] {
            let values: Vec<f64> = (1..=total).map(|i| progress(i, total).percentage).collect();
            assert!(values.windows(2).all(|w| w[0] < w[1]), "total={total}");
            assert_eq!(*values.last().unwrap(), 100.0);
            assert!(values.iter().all(|v| (0.0..=100.0).contains(v)));
        }
    }

    #[test]
    fn zero_total_is_zero_percent() {
        assert_eq!(progress(0, 0).percentage, 0.0);
    }

    #[test]
    fn remaining_bytes_saturates() {
        let p = UploadProgress::new("s".into(), "f".into(), 1, 1, 20, 10);
        assert_eq!(p.remaining_bytes(), 0);
    }

    #[test]
    fn speed_needs_two_samples() {
        let mut calc = SpeedCalculator::default();
        assert_eq!(calc.bytes_per_second(), 0.0);
        calc.add_sample(1024);
        assert_eq!(calc.bytes_per_second(), 0.0);
        assert!(calc.eta(1024).is_none());
    }

    #[test]
    fn speed_over_window() {
        let mut calc = SpeedCalculator::default();
        let t0 = Instant::now();
        calc.add_sample_at(t0, 0);
        calc.add_sample_at(t0 + Duration::from_secs(1), 1000);
        calc.add_sample_at(t0 + Duration::from_secs(2), 1000);
        assert!((calc.bytes_per_second() - 1000.0).abs() < 1e-6);

        let eta = calc.eta(5000).unwrap();
        assert!((eta.as_secs_f64() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn old_samples_leave_the_window() {
        let mut calc = SpeedCalculator::new(Some(Duration::from_secs(2)), None);
        let t0 = Instant::now();
        calc.add_sample_at(t0, 0);
        calc.add_sample_at(t0 + Duration::from_secs(1), 1_000_000);
        calc.add_sample_at(t0 + Duration::from_secs(10), 0);
        calc.add_sample_at(t0 + Duration::from_secs(11), 100);
        assert!((calc.bytes_per_second() - 100.0).abs() < 1e-6);
    }

    #[test]
    fn sample_count_is_capped() {
        let mut calc = SpeedCalculator::new(None, Some(3));
        let t0 = Instant::now();
        for i in 0..10u64 {
            calc.add_sample_at(t0 + Duration::from_millis(i * 10), 10);
        }
        assert_eq!(calc.samples.len(), 3);
    }

    #[test]
    fn reset_clears_samples() {
        let mut calc = SpeedCalculator::default();
        calc.add_sample(1);
        calc.add_sample(1);
        calc.reset();
        assert_eq!(calc.bytes_per_second(), 0.0);
    }
}
