//! compression/provider.rs
//! The codec capability the strategies and the harness program against.
use std::io::Write;
use std::ops::RangeInclusive;

use crate::compression::oneshot::{compress_all, decompress_all};
use crate::compression::stream::StreamingSession;
use crate::compression::types::{CodecError, CompressionCodec, Compressor, Decompressor};
use crate::constants::MAX_DICTIONARY_SIZE;

/// One-shot and streaming compression over a pluggable backend.
///
/// Implementors supply the quality range and session factories; the
/// provided methods own validation and the session lifecycle. Every
/// one-shot call creates one backend session and drops it before
/// returning, on success and on every error path.
pub trait CodecProvider: Send + Sync {
    fn codec(&self) -> CompressionCodec;

    /// Supported quality levels, inclusive.
    fn quality_range(&self) -> RangeInclusive<i32>;

    /// Fresh backend compression session at `quality` (already validated).
    fn new_compressor(&self, quality: i32) -> Result<Box<dyn Compressor>, CodecError>;

    /// Fresh backend decompression session.
    fn new_decompressor(&self) -> Result<Box<dyn Decompressor>, CodecError>;

    fn name(&self) -> &'static str {
        self.codec().name()
    }

    fn validate_quality(&self, quality: i32) -> Result<(), CodecError> {
        let range = self.quality_range();
        if range.contains(&quality) {
            Ok(())
        } else {
            Err(CodecError::Configuration {
                codec: self.name(),
                msg: format!("quality {} outside supported range {}..={}", quality, range.start(), range.end()),
            })
        }
    }

    /// Compress `raw`, priming the backend with `dictionary` when non-empty.
    fn compress(&self, raw: &[u8], dictionary: Option<&[u8]>, quality: i32) -> Result<Vec<u8>, CodecError> {
        self.validate_quality(quality)?;
        let dictionary = validate_dictionary(self.name(), dictionary)?;

        let mut session = self.new_compressor(quality)?;
        if let Some(dict) = dictionary {
            session.set_dictionary(dict)?;
        }
        compress_all(self.name(), session.as_mut(), raw)
    }

    /// Inverse of [`CodecProvider::compress`] under the same dictionary.
    fn decompress(&self, compressed: &[u8], dictionary: Option<&[u8]>) -> Result<Vec<u8>, CodecError> {
        let dictionary = validate_dictionary(self.name(), dictionary)?;

        let mut session = self.new_decompressor()?;
        if let Some(dict) = dictionary {
            session.set_dictionary(dict)?;
        }
        decompress_all(self.name(), session.as_mut(), compressed)
    }
}

impl dyn CodecProvider {
    /// Open a bounded streaming session writing compressed bytes to `sink`.
    pub fn open_stream<W: Write>(
        &self,
        sink: W,
        quality: i32,
        dictionary: Option<&[u8]>,
    ) -> Result<StreamingSession<W>, CodecError> {
        StreamingSession::open(self, sink, quality, dictionary)
    }
}

/// Empty dictionaries mean "none"; oversized ones are rejected up front.
pub fn validate_dictionary<'a>(codec: &'static str, dictionary: Option<&'a [u8]>) -> Result<Option<&'a [u8]>, CodecError> {
    match dictionary {
        Some(d) if d.len() > MAX_DICTIONARY_SIZE => Err(CodecError::Configuration {
            codec,
            msg: format!("dictionary of {} bytes exceeds {} byte limit", d.len(), MAX_DICTIONARY_SIZE),
        }),
        Some(d) if d.is_empty() => Ok(None),
        other => Ok(other),
    }
}
