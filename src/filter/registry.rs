use std::sync::OnceLock;

use log::debug;

use super::{Codec, FilterKind};
use crate::config::FilterConfig;
use crate::error::{PdfError, Result};

/// Lazily built, shared codecs: one per filter kind for the registry's lifetime.
///
/// Codecs are handed out as `&Codec` and are never mutated after
/// construction. Concurrent first lookups of the same kind construct it once.
pub struct FilterRegistry {
    config: FilterConfig,
    slots: [OnceLock<Option<Codec>>; FilterKind::ALL.len()],
}

impl FilterRegistry {
    pub fn new(config: FilterConfig) -> Self {
        Self {
            config,
            slots: std::array::from_fn(|_| OnceLock::new()),
        }
    }

    /// Process-wide registry with the default configuration
    pub fn global() -> &'static FilterRegistry {
        static GLOBAL: OnceLock<FilterRegistry> = OnceLock::new();
        GLOBAL.get_or_init(FilterRegistry::default)
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// The codec for `kind`, or `UnsupportedFilter` when there is none.
    ///
    /// Filter kinds come from document content, so a missing codec is a data
    /// problem for the caller to handle, not a bug.
    pub fn create(&self, kind: FilterKind) -> Result<&Codec> {
        self.slots[kind.index()]
            .get_or_init(|| {
                let codec = Codec::new(kind, &self.config);
                if codec.is_none() {
                    debug!("no codec available for {}", kind);
                }
                codec
            })
            .as_ref()
            .ok_or_else(|| PdfError::UnsupportedFilter(kind.name().to_string()))
    }

    /// Look a codec up by its `/Filter` name
    pub fn create_by_name(&self, name: &str) -> Result<&Codec> {
        let kind =
            FilterKind::from_name(name).ok_or_else(|| PdfError::UnsupportedFilter(name.to_string()))?;
        self.create(kind)
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::new(FilterConfig::default())
    }
}
