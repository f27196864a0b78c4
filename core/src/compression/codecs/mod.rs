//! compression/codecs/mod.rs
//! Backend variants behind `CodecProvider`.

pub mod deflate;
pub mod zstd;

pub use self::deflate::*;
pub use self::zstd::*;
