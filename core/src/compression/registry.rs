//! compression/registry.rs
//! Codec registry and factory functions.
use std::ops::RangeInclusive;
use std::sync::Arc;

use crate::compression::codecs::{DeflateCodec, ZstdCodec};
use crate::compression::constants::*;
use crate::compression::provider::{validate_dictionary, CodecProvider};
use crate::compression::types::{CodecError, CompressionCodec, Compressor, Decompressor};

#[derive(Debug, Clone)]
pub struct CodecInfo {
    pub codec: CompressionCodec,
    pub name: &'static str,
    pub supports_dict: bool,
    pub quality_range: RangeInclusive<i32>,
    pub default_level: i32,
}

pub fn resolve(codec: CompressionCodec) -> CodecInfo {
    match codec {
        CompressionCodec::Zstd => CodecInfo {
            codec,
            name: "zstd",
            supports_dict: true,
            quality_range: ZSTD_MIN_LEVEL..=ZSTD_MAX_LEVEL,
            default_level: DEFAULT_LEVEL_ZSTD,
        },
        CompressionCodec::Deflate => CodecInfo {
            codec,
            name: "deflate",
            supports_dict: true,
            quality_range: DEFLATE_MIN_LEVEL..=DEFLATE_MAX_LEVEL,
            default_level: DEFAULT_LEVEL_DEFLATE,
        },
    }
}

pub fn resolve_id(codec_id: u16) -> Result<CodecInfo, CodecError> {
    CompressionCodec::verify(codec_id).map(resolve)
}

/// Shared provider for `codec`.
pub fn provider(codec: CompressionCodec) -> Arc<dyn CodecProvider> {
    match codec {
        CompressionCodec::Zstd => Arc::new(ZstdCodec),
        CompressionCodec::Deflate => Arc::new(DeflateCodec),
    }
}

pub fn providers(codecs: &[CompressionCodec]) -> Vec<Arc<dyn CodecProvider>> {
    codecs.iter().copied().map(provider).collect()
}

/// Backend compressor at `level` (codec default when `None`), primed with `dict`.
pub fn create_compressor(codec: CompressionCodec, level: Option<i32>, dict: Option<&[u8]>)
    -> Result<Box<dyn Compressor>, CodecError>
{
    let p = provider(codec);
    let level = level.unwrap_or(resolve(codec).default_level);
    p.validate_quality(level)?;

    let mut compressor = p.new_compressor(level)?;
    if let Some(d) = validate_dictionary(p.name(), dict)? {
        compressor.set_dictionary(d)?;
    }
    Ok(compressor)
}

pub fn create_decompressor(codec: CompressionCodec, dict: Option<&[u8]>)
    -> Result<Box<dyn Decompressor>, CodecError>
{
    let p = provider(codec);
    let mut decompressor = p.new_decompressor()?;
    if let Some(d) = validate_dictionary(p.name(), dict)? {
        decompressor.set_dictionary(d)?;
    }
    Ok(decompressor)
}
