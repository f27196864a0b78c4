//! Command line arguments and how they fold into a `BenchConfig`.
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use dictbench_core::bench::{BenchConfig, QualityRange};
use dictbench_core::compression::CompressionCodec;
use dictbench_core::strategy::StrategyKind;

#[derive(Parser, Debug)]
#[command(name = "dictbench", version, about = "Compare dictionary strategies over a captured web corpus")]
pub struct Args {
    /// Train static per-content-type dictionaries from the dataset
    #[arg(long = "gen-dict")]
    pub gen_dict: bool,

    /// Run the compression benchmark
    #[arg(short = 'c', long)]
    pub compress: bool,

    /// JSON configuration file; flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Path to the dataset
    #[arg(long)]
    pub dataset: Option<PathBuf>,

    /// Path to the static dictionaries
    #[arg(long)]
    pub dicts: Option<PathBuf>,

    /// Size of the dictionary to use, in bytes
    #[arg(long = "ds")]
    pub dictionary_size: Option<usize>,

    /// Skip directories that have at most this many assets
    #[arg(long)]
    pub skip: Option<usize>,

    /// Lowest quality, applied to every selected codec
    #[arg(long)]
    pub quality_min: Option<i32>,

    /// Highest quality, applied to every selected codec
    #[arg(long)]
    pub quality_max: Option<i32>,

    /// Codecs to benchmark (zstd, deflate)
    #[arg(long = "codec", value_delimiter = ',')]
    pub codecs: Vec<CompressionCodec>,

    /// Strategies to replay (S0..S7)
    #[arg(long = "strategy", value_delimiter = ',')]
    pub strategies: Vec<StrategyKind>,

    /// Replay worker threads; 0 sizes the pool from the host
    #[arg(long)]
    pub workers: Option<usize>,

    /// Where to save the CSV results
    #[arg(short = 'x', long, default_value = "./output.csv")]
    pub output: PathBuf,

    /// Optional JSON run summary
    #[arg(long)]
    pub summary: Option<PathBuf>,
}

impl Args {
    pub fn to_config(&self) -> anyhow::Result<BenchConfig> {
        let mut config = match &self.config {
            Some(path) => BenchConfig::from_json_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => BenchConfig::default(),
        };

        if let Some(d) = &self.dataset {
            config.dataset_dir = d.clone();
        }
        if let Some(d) = &self.dicts {
            config.dict_dir = d.clone();
        }
        if let Some(n) = self.dictionary_size {
            config.dictionary_size = n;
        }
        if let Some(n) = self.skip {
            config.skip_threshold = n;
        }
        if let Some(n) = self.workers {
            config.workers = n;
        }
        if !self.codecs.is_empty() {
            config.codecs = self.codecs.clone();
        }
        if !self.strategies.is_empty() {
            config.strategies = self.strategies.clone();
        }

        if self.quality_min.is_some() || self.quality_max.is_some() {
            for &codec in &config.codecs.clone() {
                let current = config.quality_range(codec);
                let range = QualityRange::new(
                    self.quality_min.unwrap_or(current.min),
                    self.quality_max.unwrap_or(current.max),
                );
                config.set_quality_range(codec, range);
            }
        }

        config.validate()?;
        Ok(config)
    }
}
