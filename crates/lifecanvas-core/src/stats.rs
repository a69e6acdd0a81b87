#![forbid(unsafe_code)]

//! Rolling-window frame-rate statistics.

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

/// Maximum number of samples kept in the frame history.
pub const FRAME_HISTORY_CAPACITY: usize = 100;

/// Smallest interval a sample may represent; guards against `1000 / 0`.
const MIN_FRAME_DELTA: Duration = Duration::from_micros(1);

/// Summary of the current frame history, produced by every [`FrameStats::record`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Instantaneous rate of the frame just recorded.
    pub latest: f64,
    /// Arithmetic mean of the history.
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Number of samples the aggregates were computed over.
    pub samples: usize,
}

impl fmt::Display for FrameReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.samples;
        writeln!(f, "Frames per Second:")?;
        writeln!(f, "         latest = {:.0}", self.latest)?;
        writeln!(f, "avg of last {n:>3} = {:.0}", self.mean)?;
        writeln!(f, "min of last {n:>3} = {:.0}", self.min)?;
        write!(f, "max of last {n:>3} = {:.0}", self.max)
    }
}

/// Bounded FIFO of instantaneous frame rates.
///
/// The last timestamp is seeded at construction so the first `record` has a
/// defined delta.
#[derive(Debug, Clone)]
pub struct FrameStats {
    history: VecDeque<f64>,
    last: Duration,
}

impl FrameStats {
    #[must_use]
    pub fn new(now: Duration) -> Self {
        Self {
            history: VecDeque::with_capacity(FRAME_HISTORY_CAPACITY + 1),
            last: now,
        }
    }

    /// Record a frame at `now` and summarize the updated history.
    pub fn record(&mut self, now: Duration) -> FrameReport {
        let delta = now.saturating_sub(self.last).max(MIN_FRAME_DELTA);
        self.last = now;

        let delta_ms = delta.as_secs_f64() * 1000.0;
        let latest = 1000.0 / delta_ms;
        self.history.push_back(latest);
        if self.history.len() > FRAME_HISTORY_CAPACITY {
            self.history.pop_front();
        }

        self.summarize(latest)
    }

    /// Re-seed the last timestamp without recording a sample.
    ///
    /// Used when resuming from pause so the paused interval is not counted.
    pub fn rearm(&mut self, now: Duration) {
        self.last = now;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.history.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Samples from oldest to newest.
    pub fn samples(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        self.history.iter().copied()
    }

    /// Report over the current history, or `None` before the first frame.
    #[must_use]
    pub fn report(&self) -> Option<FrameReport> {
        self.history.back().map(|&latest| self.summarize(latest))
    }

    fn summarize(&self, latest: f64) -> FrameReport {
        let samples = self.history.len();
        let (sum, min, max) = self.history.iter().fold(
            (0.0, f64::INFINITY, f64::NEG_INFINITY),
            |(sum, min, max), &fps| (sum + fps, min.min(fps), max.max(fps)),
        );
        FrameReport {
            latest,
            mean: sum / samples as f64,
            min,
            max,
            samples,
        }
    }
}
