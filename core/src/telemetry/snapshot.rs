//! telemetry/snapshot.rs
//!
//! Immutable view of one replay (or an aggregate of several).
use std::time::Duration;
use serde::{Deserialize, Serialize};

use crate::telemetry::counters::TelemetryCounters;
use crate::telemetry::timers::{StageTimes, TelemetryTimer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub counters: TelemetryCounters,
    /// compressed / raw; 0.0 when nothing was compressed.
    pub compression_ratio: f64,
    pub throughput_raw_bytes_per_sec: f64,
    pub elapsed: Duration,
    pub stage_times: StageTimes,
}

impl TelemetrySnapshot {
    pub fn from(counters: &TelemetryCounters, timer: &TelemetryTimer) -> Self {
        let elapsed = timer.elapsed();

        let compression_ratio = if counters.bytes_raw > 0 {
            counters.bytes_compressed as f64 / counters.bytes_raw as f64
        } else {
            0.0
        };

        let throughput = if elapsed.as_secs_f64() > 0.0 {
            counters.bytes_raw as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        Self {
            counters: counters.clone(),
            compression_ratio,
            throughput_raw_bytes_per_sec: throughput,
            elapsed,
            stage_times: timer.stage_times.clone(),
        }
    }

    /// Fraction of successfully compressed assets that used a dictionary.
    pub fn dict_hit_rate(&self) -> f64 {
        let ok = self.counters.assets - self.counters.assets_failed;
        if ok == 0 {
            0.0
        } else {
            self.counters.dict_hits as f64 / ok as f64
        }
    }

    /// Combine with another snapshot (elapsed times add up).
    pub fn merge(&self, other: &TelemetrySnapshot) -> TelemetrySnapshot {
        let mut counters = self.counters.clone();
        counters.merge(&other.counters);
        let mut stage_times = self.stage_times.clone();
        stage_times.merge(&other.stage_times);
        let elapsed = self.elapsed + other.elapsed;

        let compression_ratio = if counters.bytes_raw > 0 {
            counters.bytes_compressed as f64 / counters.bytes_raw as f64
        } else {
            0.0
        };
        let throughput = if elapsed.as_secs_f64() > 0.0 {
            counters.bytes_raw as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        TelemetrySnapshot {
            counters,
            compression_ratio,
            throughput_raw_bytes_per_sec: throughput,
            elapsed,
            stage_times,
        }
    }
}

impl Default for TelemetrySnapshot {
    fn default() -> Self {
        Self {
            counters: TelemetryCounters::default(),
            compression_ratio: 0.0,
            throughput_raw_bytes_per_sec: 0.0,
            elapsed: Duration::ZERO,
            stage_times: StageTimes::default(),
        }
    }
}
