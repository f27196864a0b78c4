//! constants.rs
//! Workspace-wide defaults shared by the codecs, strategies and harness.

/// Default dictionary size (bytes) shared by every strategy in one run.
pub const DEFAULT_DICTIONARY_SIZE: usize = 32 * 1024; // 32 KiB

/// Upper bound for any dictionary handed to a codec (16 MiB).
pub const MAX_DICTIONARY_SIZE: usize = 16 * 1024 * 1024;

/// Capacity of each internal buffer of a streaming session.
pub const STREAM_BUFFER_SIZE: usize = 64 * 1024; // 64 KiB

/// Default quality sweep, applied to every codec unless overridden.
pub const DEFAULT_QUALITY_MIN: i32 = 4;
pub const DEFAULT_QUALITY_MAX: i32 = 8;

/// Corpus layout.
pub const MANIFEST_FILE_NAME: &str = "manifest";
pub const DEFAULT_DATASET_DIR: &str = "./dataset/";
pub const DEFAULT_DICT_DIR: &str = "./dicts/";

/// Manifest record delimiters: `<path>{{{{<type>}}}}<len>`.
pub const MANIFEST_TYPE_OPEN: &str = "{{{{";
pub const MANIFEST_TYPE_CLOSE: &str = "}}}}";

/// Static dictionary file naming: `text/html` -> `text__html.dict`.
pub const DICT_FILE_SUFFIX: &str = ".dict";
pub const DICT_TYPE_SEPARATOR: &str = "__";

/// Capacity of the dictionary builder progress channel.
pub const PROGRESS_CHANNEL_CAP: usize = 64;
