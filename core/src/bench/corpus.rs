//! bench/corpus.rs
//! Corpus directory discovery and asset loading.
use std::fs;
use std::path::{Path, PathBuf};

use crate::bench::manifest::{load_manifest, ManifestRecord};
use crate::types::{Asset, BenchError};

/// One captured website: its assets in manifest order.
#[derive(Debug, Clone)]
pub struct CorpusDir {
    pub name: String,
    pub path: PathBuf,
    pub assets: Vec<Asset>,
    /// Indices listed in the manifest whose file could not be read.
    pub missing: Vec<usize>,
}

/// Subdirectories of `dataset_dir`, sorted by name.
pub fn discover(dataset_dir: &Path) -> Result<Vec<PathBuf>, BenchError> {
    let listing = fs::read_dir(dataset_dir).map_err(|e| BenchError::path(dataset_dir, e))?;
    let mut dirs = Vec::new();
    for entry in listing {
        let entry = entry.map_err(|e| BenchError::path(dataset_dir, e))?;
        if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    Ok(dirs)
}

pub fn dir_name(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string())
}

/// Read the file of every record. Unreadable assets are logged and listed
/// in `missing`; a length differing from the manifest only warns.
pub fn load_assets(dir: &Path, records: &[ManifestRecord]) -> CorpusDir {
    let mut assets = Vec::with_capacity(records.len());
    let mut missing = Vec::new();

    for rec in records {
        let file = dir.join(rec.index.to_string());
        match fs::read(&file) {
            Ok(content) => {
                if let Some(declared) = rec.declared_len {
                    if declared != content.len() as u64 {
                        log::warn!(
                            "{}: manifest says {} bytes, file has {}",
                            file.display(), declared, content.len()
                        );
                    }
                }
                assets.push(Asset::new(rec.index, rec.path.clone(), &rec.content_type, content));
            }
            Err(e) => {
                log::warn!("skipping asset {}: {}", file.display(), e);
                missing.push(rec.index);
            }
        }
    }

    CorpusDir { name: dir_name(dir), path: dir.to_path_buf(), assets, missing }
}

/// Manifest plus assets of one directory.
pub fn load_corpus_dir(dir: &Path) -> Result<CorpusDir, BenchError> {
    let records = load_manifest(dir)?;
    Ok(load_assets(dir, &records))
}
