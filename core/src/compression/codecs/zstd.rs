//! src/compression/codecs/zstd.rs
//!
//! Zstd backend over the `zstd-safe` streaming contexts.
//!
//! Design notes:
//! - One `CCtx`/`DCtx` per session; the context is freed when the session drops.
//! - Raw-content dictionaries are loaded with `ZSTD_CCtx_loadDictionary`.
//! - Frames carry a content checksum so a wrong dictionary surfaces as an error.
use std::ops::RangeInclusive;

use zstd_safe::{zstd_sys::ZSTD_EndDirective, CCtx, CParameter, DCtx, ErrorCode, InBuffer, OutBuffer};

use crate::compression::constants::{ZSTD_MAX_LEVEL, ZSTD_MIN_LEVEL};
use crate::compression::provider::CodecProvider;
use crate::compression::types::{CodecError, CompressionCodec, Compressor, Decompressor, Flush, Progress};

const CODEC: &str = "zstd";

fn error_name(code: ErrorCode) -> String {
    zstd_safe::get_error_name(code).to_string()
}

fn resource(msg: impl Into<String>) -> CodecError {
    CodecError::Resource { codec: CODEC, msg: msg.into() }
}

fn corrupt(msg: impl Into<String>) -> CodecError {
    CodecError::CorruptInput { codec: CODEC, msg: msg.into() }
}

/// Zstd provider: levels 1..=22.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZstdCodec;

impl CodecProvider for ZstdCodec {
    fn codec(&self) -> CompressionCodec {
        CompressionCodec::Zstd
    }

    fn quality_range(&self) -> RangeInclusive<i32> {
        ZSTD_MIN_LEVEL..=ZSTD_MAX_LEVEL
    }

    fn new_compressor(&self, quality: i32) -> Result<Box<dyn Compressor>, CodecError> {
        Ok(Box::new(ZstdCompressor::new(quality)?))
    }

    fn new_decompressor(&self) -> Result<Box<dyn Decompressor>, CodecError> {
        Ok(Box::new(ZstdDecompressor::new()?))
    }
}

/// Zstd streaming compressor.
pub struct ZstdCompressor {
    cctx: CCtx<'static>,
    started: bool,
}

impl ZstdCompressor {
    /// # Errors
    /// - `CodecError::Resource` if the context cannot be allocated or configured.
    pub fn new(level: i32) -> Result<Self, CodecError> {
        let mut cctx = CCtx::try_create().ok_or_else(|| resource("failed to allocate compression context"))?;
        cctx.set_parameter(CParameter::CompressionLevel(level))
            .map_err(|c| resource(format!("set level {level}: {}", error_name(c))))?;
        cctx.set_parameter(CParameter::ChecksumFlag(true))
            .map_err(|c| resource(format!("enable checksum: {}", error_name(c))))?;
        Ok(Self { cctx, started: false })
    }
}

impl Compressor for ZstdCompressor {
    fn set_dictionary(&mut self, dict: &[u8]) -> Result<(), CodecError> {
        if self.started {
            return Err(CodecError::StateError("zstd dictionary set after compression started".into()));
        }
        self.cctx
            .load_dictionary(dict)
            .map_err(|c| resource(format!("load dictionary: {}", error_name(c))))?;
        Ok(())
    }

    fn compress(&mut self, input: &[u8], output: &mut [u8], flush: Flush) -> Result<Progress, CodecError> {
        self.started = true;
        let directive = match flush {
            Flush::None => ZSTD_EndDirective::ZSTD_e_continue,
            Flush::Finish => ZSTD_EndDirective::ZSTD_e_end,
        };

        let mut in_buf = InBuffer::around(input);
        let mut out_buf = OutBuffer::around(output);
        let remaining = self
            .cctx
            .compress_stream2(&mut out_buf, &mut in_buf, directive)
            .map_err(|c| resource(error_name(c)))?;

        let consumed = in_buf.pos();
        Ok(Progress {
            consumed,
            produced: out_buf.pos(),
            done: flush == Flush::Finish && remaining == 0 && consumed == input.len(),
        })
    }
}

/// Zstd streaming decompressor. Accepts exactly one frame.
pub struct ZstdDecompressor {
    dctx: DCtx<'static>,
    finished: bool,
}

impl ZstdDecompressor {
    pub fn new() -> Result<Self, CodecError> {
        let dctx = DCtx::try_create().ok_or_else(|| resource("failed to allocate decompression context"))?;
        Ok(Self { dctx, finished: false })
    }
}

impl Decompressor for ZstdDecompressor {
    fn set_dictionary(&mut self, dict: &[u8]) -> Result<(), CodecError> {
        self.dctx
            .load_dictionary(dict)
            .map_err(|c| resource(format!("load dictionary: {}", error_name(c))))?;
        Ok(())
    }

    fn decompress(&mut self, input: &[u8], output: &mut [u8]) -> Result<Progress, CodecError> {
        if self.finished {
            if input.is_empty() {
                return Ok(Progress { done: true, ..Progress::default() });
            }
            return Err(corrupt(format!("{} trailing bytes after frame end", input.len())));
        }

        let mut in_buf = InBuffer::around(input);
        let mut out_buf = OutBuffer::around(output);
        let hint = self
            .dctx
            .decompress_stream(&mut out_buf, &mut in_buf)
            .map_err(|c| corrupt(error_name(c)))?;

        // hint == 0: frame fully decoded and flushed
        self.finished = hint == 0;
        Ok(Progress {
            consumed: in_buf.pos(),
            produced: out_buf.pos(),
            done: self.finished,
        })
    }
}
