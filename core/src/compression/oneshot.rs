//! compression/oneshot.rs
//! Drive a backend session over a whole in-memory buffer.
//!
//! The output vector grows geometrically; the backend only ever sees
//! `&[u8]` / `&mut [u8]` views.
use crate::compression::constants::initial_output_capacity;
use crate::compression::types::{CodecError, Compressor, Decompressor, Flush};

/// Compress `raw` to a complete stream (header, payload, trailer).
pub fn compress_all(codec: &'static str, session: &mut dyn Compressor, raw: &[u8]) -> Result<Vec<u8>, CodecError> {
    let mut out = vec![0u8; initial_output_capacity(raw.len())];
    let mut written = 0usize;
    let mut input = raw;

    loop {
        if written == out.len() {
            out.resize(out.len() * 2, 0);
        }
        let progress = session.compress(input, &mut out[written..], Flush::Finish)?;
        input = &input[progress.consumed..];
        written += progress.produced;

        if progress.done {
            break;
        }
        if progress.is_stalled() && written < out.len() {
            return Err(CodecError::Resource { codec, msg: "backend made no progress while finishing".into() });
        }
    }

    out.truncate(written);
    Ok(out)
}

/// Decompress one complete stream. Truncated input and trailing bytes are errors.
pub fn decompress_all(codec: &'static str, session: &mut dyn Decompressor, compressed: &[u8]) -> Result<Vec<u8>, CodecError> {
    let mut out = vec![0u8; initial_output_capacity(compressed.len() * 4)];
    let mut written = 0usize;
    let mut input = compressed;

    loop {
        if written == out.len() {
            out.resize(out.len() * 2, 0);
        }
        let progress = session.decompress(input, &mut out[written..])?;
        input = &input[progress.consumed..];
        written += progress.produced;

        if progress.done {
            if !input.is_empty() {
                return Err(CodecError::CorruptInput {
                    codec,
                    msg: format!("{} trailing bytes after end of stream", input.len()),
                });
            }
            break;
        }
        if progress.is_stalled() && written < out.len() {
            return Err(CodecError::CorruptInput { codec, msg: "truncated stream".into() });
        }
    }

    out.truncate(written);
    Ok(out)
}
