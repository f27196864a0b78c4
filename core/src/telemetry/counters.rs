//! telemetry/counters.rs
//! Mutable counters collected while replaying assets through a strategy.
//!
//! Converted into an immutable `TelemetrySnapshot` at the end of a replay.
use std::ops::AddAssign;
use serde::{Deserialize, Serialize};

#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryCounters {
    pub assets: u64,
    pub assets_failed: u64,
    pub bytes_raw: u64,
    pub bytes_compressed: u64,
    /// Assets compressed with a non-empty dictionary.
    pub dict_hits: u64,
    pub dict_bytes: u64,
}

impl TelemetryCounters {
    /// Record one successfully compressed asset.
    ///
    /// - `raw_len`: asset length before compression
    /// - `comp_len`: compressed length
    /// - `dict_len`: dictionary length handed to the codec (0 = none)
    pub fn add_asset(&mut self, raw_len: usize, comp_len: usize, dict_len: usize) {
        self.assets += 1;
        self.bytes_raw += raw_len as u64;
        self.bytes_compressed += comp_len as u64;
        if dict_len > 0 {
            self.dict_hits += 1;
            self.dict_bytes += dict_len as u64;
        }
    }

    /// Record an asset whose compression failed; it contributes no bytes.
    pub fn add_failure(&mut self) {
        self.assets += 1;
        self.assets_failed += 1;
    }

    pub fn merge(&mut self, other: &TelemetryCounters) {
        self.assets += other.assets;
        self.assets_failed += other.assets_failed;
        self.bytes_raw += other.bytes_raw;
        self.bytes_compressed += other.bytes_compressed;
        self.dict_hits += other.dict_hits;
        self.dict_bytes += other.dict_bytes;
    }
}

impl AddAssign for TelemetryCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}
