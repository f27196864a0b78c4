//! dictbench: dictionary strategy compression benchmark.
mod args;

use std::fs;

use anyhow::{bail, Context};
use clap::Parser;
use dictbench_core::bench::{BenchConfig, CsvSink, Harness};
use dictbench_core::dictgen::{build_static_table, ProgressReporter};

use crate::args::Args;

fn main() -> anyhow::Result<()> {
    log_init::init();
    let args = Args::parse();
    if !args.gen_dict && !args.compress {
        bail!("nothing to do: pass --gen-dict and/or --compress");
    }
    let config = args.to_config()?;

    if args.gen_dict {
        gen_dict(&config)?;
    }
    if args.compress {
        compress(&config, &args)?;
    }
    Ok(())
}

fn gen_dict(config: &BenchConfig) -> anyhow::Result<()> {
    let (tx, reporter) = ProgressReporter::spawn();
    let result = build_static_table(&config.dataset_dir, &config.dict_dir, config.dictionary_size, Some(&tx));
    drop(tx);
    reporter.join();

    let summary = result.context("building static dictionaries")?;
    log::info!(
        "trained {} dictionaries, skipped {} content types",
        summary.trained.len(),
        summary.skipped.len()
    );
    Ok(())
}

fn compress(config: &BenchConfig, args: &Args) -> anyhow::Result<()> {
    let harness = Harness::new(config.clone()).context("starting harness")?;
    let mut sink = CsvSink::create(&args.output, harness.qualities())?;
    let summary = harness.run(&mut sink)?;

    log::info!(
        "{} directories, {} assets, ratio {:.4}, results in {}",
        summary.directories_run,
        summary.assets,
        summary.telemetry.compression_ratio,
        args.output.display()
    );

    if let Some(path) = &args.summary {
        let json = serde_json::to_string_pretty(&summary)?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    }
    Ok(())
}
