//! strategy/mod.rs
//! Dictionary-selection strategies and the replay engine.

pub mod engine;
pub mod policies;
pub mod table;
pub mod types;

pub use engine::{replay, replay_with, total_compressed_size, ReplayOutcome, ReplayStep};
pub use policies::{build_policy, DictionaryPolicy};
pub use table::DictionaryTable;
pub use types::{StrategyContext, StrategyKind};
