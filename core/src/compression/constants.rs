/// Stable codec IDs (u16) for config files and reports.
pub mod codec_ids {
    pub const ZSTD: u16    = 0x0001;
    pub const DEFLATE: u16 = 0x0003;
}

/// Supported quality ranges per backend.
pub const ZSTD_MIN_LEVEL: i32 = 1;
pub const ZSTD_MAX_LEVEL: i32 = 22;
pub const DEFLATE_MIN_LEVEL: i32 = 0;
pub const DEFLATE_MAX_LEVEL: i32 = 9;

/// Default compression levels (balanced).
pub const DEFAULT_LEVEL_ZSTD: i32 = 4;
pub const DEFAULT_LEVEL_DEFLATE: i32 = 6;

/// Initial output allocation for one-shot calls: input + 1/8 + slack.
#[inline]
pub fn initial_output_capacity(input_len: usize) -> usize {
    input_len + (input_len >> 3) + 128
}
