//! Knobs for [`Encoder`](crate::Encoder) and [`Decoder`](crate::Decoder).

/// Encoder settings.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct EncoderOptions {
    /// Write strings of 32 to 255 bytes with the 1-byte length prefix
    /// (`0xd9`). Off by default, in which case they use the 2-byte prefix.
    pub str8: bool,
}

impl EncoderOptions {
    /// Sets [`EncoderOptions::str8`].
    pub fn str8(mut self, enabled: bool) -> Self {
        self.str8 = enabled;
        self
    }
}

/// Nesting accepted by a default [`DecoderOptions`].
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Decoder settings.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DecoderOptions {
    /// Deepest container nesting accepted before decoding fails with
    /// [`Error::DepthLimit`](crate::Error::DepthLimit).
    pub max_depth: usize,
}

impl DecoderOptions {
    /// Sets [`DecoderOptions::max_depth`].
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

impl Default for DecoderOptions {
    fn default() -> Self {
        DecoderOptions {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
