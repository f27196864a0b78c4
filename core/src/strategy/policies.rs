//! strategy/policies.rs
//! Per-strategy dictionary state.
//!
//! A policy is built fresh for every replay. For each asset, in order, the
//! engine calls `select` (dictionary for this asset) and then `observe`
//! (fold the asset into the state). Every dictionary returned by `select`
//! is at most `dictionary_size` bytes long.
use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;

use crate::strategy::table::DictionaryTable;
use crate::strategy::types::{StrategyContext, StrategyKind};
use crate::types::Asset;
use crate::utils::{append_tail_window, head, tail};

pub trait DictionaryPolicy: Send {
    fn kind(&self) -> StrategyKind;
    /// Dictionary to compress `asset` with; `None` means no dictionary.
    fn select(&self, asset: &Asset) -> Option<&[u8]>;
    /// Update state after `asset` was compressed.
    fn observe(&mut self, asset: &Asset);
}

/// Zero-copy prefix of the asset content, bounded by `limit`.
fn head_of(asset: &Asset, limit: usize) -> Bytes {
    asset.content.slice(..asset.content.len().min(limit))
}

pub fn build_policy(kind: StrategyKind, ctx: &StrategyContext) -> Box<dyn DictionaryPolicy> {
    let limit = ctx.dictionary_size;
    match kind {
        StrategyKind::S0 => Box::new(NoDictionary),
        StrategyKind::S1 => Box::new(FirstAsset { limit, dict: None }),
        StrategyKind::S2 => Box::new(PreviousAsset { limit, dict: None }),
        StrategyKind::S3 => Box::new(RollingWindow { limit, window: None }),
        StrategyKind::S4 => Box::new(PreviousOfTypeOrFirst { limit, first: None, by_type: HashMap::new() }),
        StrategyKind::S5 => Box::new(StaticTable { limit, table: Arc::clone(&ctx.table) }),
        StrategyKind::S6 => Box::new(StaticThenPrevious { limit, by_type: seed_from(&ctx.table) }),
        StrategyKind::S7 => Box::new(StaticRollingByType {
            limit,
            by_type: ctx.table.iter().map(|(ct, d)| (ct.clone(), tail(d, limit).to_vec())).collect(),
        }),
    }
}

fn seed_from(table: &DictionaryTable) -> HashMap<String, Bytes> {
    table.iter().map(|(ct, d)| (ct.clone(), d.clone())).collect()
}

/// S0
pub struct NoDictionary;

impl DictionaryPolicy for NoDictionary {
    fn kind(&self) -> StrategyKind {
        StrategyKind::S0
    }

    fn select(&self, _asset: &Asset) -> Option<&[u8]> {
        None
    }

    fn observe(&mut self, _asset: &Asset) {}
}

/// S1: set once from the first asset, never touched again.
pub struct FirstAsset {
    limit: usize,
    dict: Option<Bytes>,
}

impl DictionaryPolicy for FirstAsset {
    fn kind(&self) -> StrategyKind {
        StrategyKind::S1
    }

    fn select(&self, _asset: &Asset) -> Option<&[u8]> {
        self.dict.as_deref()
    }

    fn observe(&mut self, asset: &Asset) {
        if self.dict.is_none() {
            self.dict = Some(head_of(asset, self.limit));
        }
    }
}

/// S2
pub struct PreviousAsset {
    limit: usize,
    dict: Option<Bytes>,
}

impl DictionaryPolicy for PreviousAsset {
    fn kind(&self) -> StrategyKind {
        StrategyKind::S2
    }

    fn select(&self, _asset: &Asset) -> Option<&[u8]> {
        self.dict.as_deref()
    }

    fn observe(&mut self, asset: &Asset) {
        self.dict = Some(head_of(asset, self.limit));
    }
}

/// S3: `tail(window ++ head(asset))` after every asset.
pub struct RollingWindow {
    limit: usize,
    window: Option<Vec<u8>>,
}

impl DictionaryPolicy for RollingWindow {
    fn kind(&self) -> StrategyKind {
        StrategyKind::S3
    }

    fn select(&self, _asset: &Asset) -> Option<&[u8]> {
        self.window.as_deref()
    }

    fn observe(&mut self, asset: &Asset) {
        let window = self.window.get_or_insert_with(Vec::new);
        append_tail_window(window, head(&asset.content, self.limit), self.limit);
    }
}

/// S4: the first asset goes without; later ones use the previous asset of
/// their type, falling back to the first asset of the replay.
pub struct PreviousOfTypeOrFirst {
    limit: usize,
    first: Option<Bytes>,
    by_type: HashMap<String, Bytes>,
}

impl DictionaryPolicy for PreviousOfTypeOrFirst {
    fn kind(&self) -> StrategyKind {
        StrategyKind::S4
    }

    fn select(&self, asset: &Asset) -> Option<&[u8]> {
        let first = self.first.as_deref()?;
        Some(self.by_type.get(&asset.content_type).map(|d| &d[..]).unwrap_or(first))
    }

    fn observe(&mut self, asset: &Asset) {
        let head = head_of(asset, self.limit);
        if self.first.is_none() {
            self.first = Some(head.clone());
        }
        self.by_type.insert(asset.content_type.clone(), head);
    }
}

/// S5: static table only.
pub struct StaticTable {
    limit: usize,
    table: Arc<DictionaryTable>,
}

impl DictionaryPolicy for StaticTable {
    fn kind(&self) -> StrategyKind {
        StrategyKind::S5
    }

    fn select(&self, asset: &Asset) -> Option<&[u8]> {
        self.table.get(&asset.content_type).map(|d| tail(d, self.limit))
    }

    fn observe(&mut self, _asset: &Asset) {}
}

/// S6: per-type map seeded from the static table, each entry replaced by
/// the head of the latest asset of that type.
pub struct StaticThenPrevious {
    limit: usize,
    by_type: HashMap<String, Bytes>,
}

impl DictionaryPolicy for StaticThenPrevious {
    fn kind(&self) -> StrategyKind {
        StrategyKind::S6
    }

    fn select(&self, asset: &Asset) -> Option<&[u8]> {
        self.by_type.get(&asset.content_type).map(|d| tail(d, self.limit))
    }

    fn observe(&mut self, asset: &Asset) {
        self.by_type.insert(asset.content_type.clone(), head_of(asset, self.limit));
    }
}

/// S7: per-type rolling window seeded from the static table.
pub struct StaticRollingByType {
    limit: usize,
    by_type: HashMap<String, Vec<u8>>,
}

impl DictionaryPolicy for StaticRollingByType {
    fn kind(&self) -> StrategyKind {
        StrategyKind::S7
    }

    fn select(&self, asset: &Asset) -> Option<&[u8]> {
        self.by_type.get(&asset.content_type).map(|d| &d[..])
    }

    fn observe(&mut self, asset: &Asset) {
        let window = self.by_type.entry(asset.content_type.clone()).or_default();
        append_tail_window(window, head(&asset.content, self.limit), self.limit);
    }
}
