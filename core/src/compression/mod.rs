//! compression/mod.rs
//! One-shot and streaming compression behind the `CodecProvider` capability.
//!
//! Notes:
//! - Output is deterministic for a given (input, dictionary, quality).
//! - Each one-shot call owns exactly one backend context for its duration.
//! - Backends exchange bytes through slice views only (`Compressor`/`Decompressor`).

pub mod buffer;
pub mod codecs;
pub mod constants;
pub mod oneshot;
pub mod provider;
pub mod registry;
pub mod stream;
pub mod types;

pub use buffer::StreamBuffer;
pub use constants::*;
pub use provider::*;
pub use registry::*;
pub use stream::{SessionState, StreamingSession};
pub use types::*;
