//! strategy/types.rs
//! Strategy identifiers and the shared replay context.
use std::{fmt, str::FromStr, sync::Arc};
use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};

use crate::strategy::table::DictionaryTable;

/// The eight dictionary-selection strategies.
#[repr(u8)]
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash,
    TryFromPrimitive, Serialize, Deserialize,
)]
pub enum StrategyKind {
    /// No dictionary; the reference.
    S0 = 0,
    /// First asset, fixed for the whole replay.
    S1 = 1,
    /// Previous asset.
    S2 = 2,
    /// Rolling window over all previous assets.
    S3 = 3,
    /// Last asset of the same type, else the first asset.
    S4 = 4,
    /// Static per-type table.
    S5 = 5,
    /// Static per-type table, replaced by the last asset of that type.
    S6 = 6,
    /// Static per-type table, extended into a rolling per-type window.
    S7 = 7,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 8] = [
        StrategyKind::S0,
        StrategyKind::S1,
        StrategyKind::S2,
        StrategyKind::S3,
        StrategyKind::S4,
        StrategyKind::S5,
        StrategyKind::S6,
        StrategyKind::S7,
    ];

    pub fn id(&self) -> u8 {
        *self as u8
    }

    pub fn describe(&self) -> &'static str {
        match self {
            StrategyKind::S0 => "no dictionary",
            StrategyKind::S1 => "first asset",
            StrategyKind::S2 => "previous asset",
            StrategyKind::S3 => "rolling window of all previous assets",
            StrategyKind::S4 => "previous asset of same type, else first asset",
            StrategyKind::S5 => "static per-type dictionary",
            StrategyKind::S6 => "static per-type, replaced by previous of same type",
            StrategyKind::S7 => "static per-type, extended by a rolling per-type window",
        }
    }

    /// Whether the strategy reads the static dictionary table.
    pub fn uses_static_table(&self) -> bool {
        matches!(self, StrategyKind::S5 | StrategyKind::S6 | StrategyKind::S7)
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.id())
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        let digits = t.strip_prefix('S').or_else(|| t.strip_prefix('s')).unwrap_or(t);
        digits
            .parse::<u8>()
            .ok()
            .and_then(|n| StrategyKind::try_from_primitive(n).ok())
            .ok_or_else(|| format!("unknown strategy {s:?} (expected S0..S7)"))
    }
}

/// Read-only inputs every replay shares.
#[derive(Clone, Debug)]
pub struct StrategyContext {
    pub dictionary_size: usize,
    pub table: Arc<DictionaryTable>,
}

impl StrategyContext {
    pub fn new(dictionary_size: usize, table: Arc<DictionaryTable>) -> Self {
        Self { dictionary_size, table }
    }

    /// Context with an empty static table.
    pub fn without_table(dictionary_size: usize) -> Self {
        Self::new(dictionary_size, Arc::new(DictionaryTable::default()))
    }
}
