//! strategy/table.rs
//! Static per-content-type dictionaries, loaded once from a directory.
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use bytes::Bytes;

use crate::types::BenchError;
use crate::utils::{content_type_from_dict_file, dict_file_name, tail};

#[derive(Clone, Debug, Default)]
pub struct DictionaryTable {
    entries: HashMap<String, Bytes>,
}

impl DictionaryTable {
    /// Load every `<type>.dict` file in `dir`. A missing directory yields an
    /// empty table. Entries longer than `dictionary_size` keep their tail.
    pub fn load(dir: &Path, dictionary_size: usize) -> Result<Self, BenchError> {
        let mut table = DictionaryTable::default();
        if !dir.is_dir() {
            log::warn!("dictionary directory {} not found; static table is empty", dir.display());
            return Ok(table);
        }

        let listing = fs::read_dir(dir).map_err(|e| BenchError::path(dir, e))?;
        for entry in listing {
            let entry = entry.map_err(|e| BenchError::path(dir, e))?;
            let file_name = entry.file_name();
            let Some(content_type) = file_name.to_str().and_then(content_type_from_dict_file) else {
                continue;
            };

            let path = entry.path();
            let bytes = match fs::read(&path) {
                Ok(b) => b,
                Err(e) => {
                    log::warn!("skipping dictionary {}: {}", path.display(), e);
                    continue;
                }
            };
            if bytes.len() > dictionary_size {
                log::warn!(
                    "dictionary for {} is {} bytes; keeping last {}",
                    content_type, bytes.len(), dictionary_size
                );
            }
            table.insert(content_type, tail(&bytes, dictionary_size).to_vec());
        }

        log::info!("loaded {} static dictionaries from {}", table.len(), dir.display());
        Ok(table)
    }

    /// Write every entry to `dir` using the `<type>.dict` naming rule.
    pub fn save(&self, dir: &Path) -> Result<(), BenchError> {
        fs::create_dir_all(dir).map_err(|e| BenchError::path(dir, e))?;
        for (content_type, dict) in &self.entries {
            let path = dir.join(dict_file_name(content_type));
            fs::write(&path, dict).map_err(|e| BenchError::path(&path, e))?;
        }
        Ok(())
    }

    pub fn insert(&mut self, content_type: impl Into<String>, dict: impl Into<Bytes>) {
        self.entries.insert(content_type.into(), dict.into());
    }

    pub fn get(&self, content_type: &str) -> Option<&Bytes> {
        self.entries.get(content_type)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Bytes)> {
        self.entries.iter()
    }
}

impl FromIterator<(String, Bytes)> for DictionaryTable {
    fn from_iter<I: IntoIterator<Item = (String, Bytes)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}
