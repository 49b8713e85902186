/// Encoder settings shared by every codec a registry constructs.
///
/// Decoding never depends on this: everything a decoder needs comes from the
/// stream data and its `/DecodeParms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterConfig {
    /// Flate compression level, 0 (store) to 9 (best).
    compression_level: u32,
    /// Whether the LZW encoder widens its codes one entry early.
    early_change: bool,
    /// Wrap ASCIIHex/ASCII85 output after this many characters, 0 for never.
    line_width: usize,
}

impl FilterConfig {
    pub fn new() -> Self {
        Self {
            compression_level: 6,
            early_change: true,
            line_width: 0,
        }
    }

    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = level.min(9);
        self
    }

    pub fn with_early_change(mut self, early_change: bool) -> Self {
        self.early_change = early_change;
        self
    }

    pub fn with_line_width(mut self, width: usize) -> Self {
        self.line_width = width;
        self
    }

    pub fn compression_level(&self) -> u32 {
        self.compression_level
    }

    pub fn early_change(&self) -> bool {
        self.early_change
    }

    pub fn line_width(&self) -> usize {
        self.line_width
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self::new()
    }
}
