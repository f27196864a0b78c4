//! bench/manifest.rs
//! Corpus manifest: one `<path>{{{{<content-type>[;params]}}}}<len>` record per line.
use std::fs;
use std::path::Path;

use crate::constants::{MANIFEST_FILE_NAME, MANIFEST_TYPE_CLOSE, MANIFEST_TYPE_OPEN};
use crate::types::BenchError;
use crate::utils::content_type_key;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRecord {
    /// Ordinal among non-empty lines; names the asset file.
    pub index: usize,
    pub path: String,
    /// Canonical content type.
    pub content_type: String,
    pub declared_len: Option<u64>,
}

/// Parse one record. The last `{{{{` on the line opens the type field, so
/// paths may themselves contain braces.
pub fn parse_record(index: usize, line: &str) -> Result<ManifestRecord, String> {
    let open = line
        .rfind(MANIFEST_TYPE_OPEN)
        .ok_or_else(|| format!("missing {MANIFEST_TYPE_OPEN}"))?;
    let (path, rest) = (&line[..open], &line[open + MANIFEST_TYPE_OPEN.len()..]);
    let close = rest
        .find(MANIFEST_TYPE_CLOSE)
        .ok_or_else(|| format!("missing {MANIFEST_TYPE_CLOSE}"))?;
    let raw_type = &rest[..close];
    let len_field = rest[close + MANIFEST_TYPE_CLOSE.len()..].trim();

    let declared_len = if len_field.is_empty() {
        None
    } else {
        Some(len_field.parse::<u64>().map_err(|_| format!("bad length {len_field:?}"))?)
    };

    Ok(ManifestRecord {
        index,
        path: path.to_string(),
        content_type: content_type_key(raw_type).to_string(),
        declared_len,
    })
}

/// Parse manifest text. Malformed lines are logged and skipped; their
/// index is still consumed so later records keep pointing at their files.
pub fn parse_manifest(text: &str, origin: &Path) -> Vec<ManifestRecord> {
    let mut records = Vec::new();
    let lines = text.lines().map(|l| l.trim_end_matches('\r')).filter(|l| !l.trim().is_empty());
    for (index, line) in lines.enumerate() {
        match parse_record(index, line) {
            Ok(rec) => records.push(rec),
            Err(msg) => log::warn!("{}: skipping record {}: {}", origin.display(), index, msg),
        }
    }
    records
}

/// Read and parse `<dir>/manifest`.
pub fn load_manifest(dir: &Path) -> Result<Vec<ManifestRecord>, BenchError> {
    let path = dir.join(MANIFEST_FILE_NAME);
    let text = fs::read_to_string(&path).map_err(|e| BenchError::Manifest {
        path: path.clone(),
        msg: e.to_string(),
    })?;
    Ok(parse_manifest(&text, &path))
}
