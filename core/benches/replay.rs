//! Criterion benchmarks for strategy replays.
//!
//! Run with:
//!   cargo bench --bench replay
//!
//! The corpus is synthetic: a few content types with shared boilerplate,
//! so dictionary strategies have something to find.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dictbench_core::compression::{provider, CompressionCodec};
use dictbench_core::strategy::{replay, StrategyContext, StrategyKind};
use dictbench_core::types::Asset;

fn synthetic_assets(count: usize) -> Vec<Asset> {
    let types = ["text/html", "text/css", "application/javascript"];
    (0..count)
        .map(|i| {
            let ct = types[i % types.len()];
            let mut body = format!("/* {ct} asset {i} */\n");
            for line in 0..200 {
                body.push_str(&format!("<div class=\"row-{}\" data-id=\"{}\">item {}</div>\n", line % 7, i, line));
            }
            Asset::new(i, format!("https://bench.test/{i}"), ct, body.into_bytes())
        })
        .collect()
}

fn bench_strategies(c: &mut Criterion) {
    let assets = synthetic_assets(24);
    let raw: u64 = assets.iter().map(|a| a.len() as u64).sum();
    let ctx = StrategyContext::without_table(32 * 1024);

    for codec in CompressionCodec::ALL {
        let p = provider(codec);
        let mut group = c.benchmark_group(format!("replay_{codec}"));
        group.throughput(Throughput::Bytes(raw));
        for kind in [StrategyKind::S0, StrategyKind::S2, StrategyKind::S3, StrategyKind::S4] {
            group.bench_with_input(BenchmarkId::new(kind.to_string(), 6), &assets, |b, assets| {
                b.iter(|| replay(kind, assets, p.as_ref(), 6, &ctx).unwrap().total_compressed)
            });
        }
        group.finish();
    }
}

criterion_group!(benches, bench_strategies);
criterion_main!(benches);
