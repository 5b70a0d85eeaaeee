use std::time::{Duration, Instant};

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::StatsError;

/// Monotonic time source, measured from an arbitrary origin.
pub trait Clock {
    fn now(&self) -> Duration;
}

#[derive(Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        MonotonicClock {
            origin: Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub mode: f64,
    pub variance: f64,
    pub std_dev: f64,
    pub elapsed_seconds: f64,
}

impl Stats {
    pub fn compute(data: &[f64]) -> Result<Stats, StatsError> {
        Stats::compute_with_clock(data, &MonotonicClock::default())
    }

    /// Only the arithmetic is timed; `data` must already be fully parsed.
    pub fn compute_with_clock<C: Clock>(data: &[f64], clock: &C) -> Result<Stats, StatsError> {
        let count = data.len();
        match count {
            0 => return Err(StatsError::EmptyInput),
            1 => return Err(StatsError::InsufficientData { count }),
            _ => {}
        }

        let start = clock.now();

        let mean = data.iter().sum::<f64>() / count as f64;
        let median = median(data);
        let mode = mode(data);
        let variance = data
            .iter()
            .map(|value| (value - mean).powi(2))
            .sum::<f64>()
            / (count - 1) as f64;
        let std_dev = variance.sqrt();

        let elapsed = clock.now().saturating_sub(start);

        Ok(Stats {
            count,
            mean,
            median,
            mode,
            variance,
            std_dev,
            elapsed_seconds: elapsed.as_secs_f64(),
        })
    }
}

fn median(data: &[f64]) -> f64 {
    let mut sorted = data.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.
    } else {
        sorted[mid]
    }
}

// Ties go to the value seen first in `data`.
fn mode(data: &[f64]) -> f64 {
    let mut counts: IndexMap<u64, (f64, usize)> = IndexMap::with_capacity(data.len());
    for &value in data {
        // -0.0 and 0.0 are the same value
        let key = if value == 0. { 0f64.to_bits() } else { value.to_bits() };
        counts.entry(key).or_insert((value, 0)).1 += 1;
    }

    let mut best = (data[0], 0);
    for &(value, seen) in counts.values() {
        if seen > best.1 {
            best = (value, seen);
        }
    }
    best.0
}
