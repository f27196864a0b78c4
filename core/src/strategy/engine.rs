//! strategy/engine.rs
//! Replays an ordered asset list through one strategy and one codec.
use serde::Serialize;

use crate::compression::{CodecError, CodecProvider, CompressionCodec};
use crate::strategy::policies::build_policy;
use crate::strategy::types::{StrategyContext, StrategyKind};
use crate::telemetry::{Stage, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};
use crate::types::Asset;

/// Result of one `(strategy, codec, quality)` replay.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayOutcome {
    pub kind: StrategyKind,
    pub codec: CompressionCodec,
    pub quality: i32,
    /// Sum of compressed sizes over assets that compressed successfully.
    pub total_compressed: u64,
    /// Per-asset compressed size in replay order; `None` where the codec failed.
    pub sizes: Vec<Option<usize>>,
    pub failures: usize,
    pub telemetry: TelemetrySnapshot,
}

/// What the engine decided for one asset. Handed to inspectors.
#[derive(Debug)]
pub struct ReplayStep<'a> {
    pub position: usize,
    pub asset: &'a Asset,
    pub dictionary: Option<&'a [u8]>,
    pub compressed_len: Option<usize>,
}

pub fn replay(
    kind: StrategyKind,
    assets: &[Asset],
    codec: &dyn CodecProvider,
    quality: i32,
    ctx: &StrategyContext,
) -> Result<ReplayOutcome, CodecError> {
    replay_with(kind, assets, codec, quality, ctx, |_| {})
}

/// Like [`replay`], calling `inspect` after every asset.
///
/// Quality is checked once before the first asset, so a bad setting fails
/// the whole replay instead of every asset. Per-asset codec errors are
/// logged and recorded as `None`; the strategy still observes the asset.
pub fn replay_with<F>(
    kind: StrategyKind,
    assets: &[Asset],
    codec: &dyn CodecProvider,
    quality: i32,
    ctx: &StrategyContext,
    mut inspect: F,
) -> Result<ReplayOutcome, CodecError>
where
    F: FnMut(&ReplayStep<'_>),
{
    codec.validate_quality(quality)?;

    let mut policy = build_policy(kind, ctx);
    let mut counters = TelemetryCounters::default();
    let mut timer = TelemetryTimer::new();
    let mut sizes = Vec::with_capacity(assets.len());
    let mut total = 0u64;

    for (position, asset) in assets.iter().enumerate() {
        let dictionary = policy.select(asset);
        debug_assert!(
            dictionary.map_or(true, |d| d.len() <= ctx.dictionary_size),
            "{} produced a {} byte dictionary (limit {})",
            kind,
            dictionary.map_or(0, <[u8]>::len),
            ctx.dictionary_size
        );

        let result = timer.time(Stage::Compress, || codec.compress(&asset.content, dictionary, quality));
        let compressed_len = match result {
            Ok(out) => {
                counters.add_asset(asset.len(), out.len(), dictionary.map_or(0, <[u8]>::len));
                total += out.len() as u64;
                Some(out.len())
            }
            Err(e) => {
                log::warn!(
                    "{} {} q{}: asset #{} ({}) failed: {}",
                    codec.name(), kind, quality, asset.index, asset.path, e
                );
                counters.add_failure();
                None
            }
        };

        inspect(&ReplayStep { position, asset, dictionary, compressed_len });
        sizes.push(compressed_len);
        policy.observe(asset);
    }

    timer.finish();
    let failures = counters.assets_failed as usize;
    log::debug!(
        "{} {} q{}: {} assets, {} bytes, {} failures",
        codec.name(), kind, quality, assets.len(), total, failures
    );

    Ok(ReplayOutcome {
        kind,
        codec: codec.codec(),
        quality,
        total_compressed: total,
        sizes,
        failures,
        telemetry: TelemetrySnapshot::from(&counters, &timer),
    })
}

/// Total compressed bytes of `assets` under `kind`; failed assets add nothing.
pub fn total_compressed_size(
    kind: StrategyKind,
    assets: &[Asset],
    codec: &dyn CodecProvider,
    quality: i32,
    ctx: &StrategyContext,
) -> Result<u64, CodecError> {
    replay(kind, assets, codec, quality, ctx).map(|o| o.total_compressed)
}
