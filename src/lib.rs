//! Stream filters for reading and writing PDF files.
//!
//! Codecs are looked up by [`FilterKind`] in a [`FilterRegistry`], which builds
//! each one once and shares it. Decoding is always whole-buffer; encoding can
//! be done in one call or progressively through a [`FilterEngine`]:
//!
//! ```
//! use pdf_filters::{FilterEngine, FilterKind, FilterRegistry};
//!
//! let codec = FilterRegistry::global().create(FilterKind::FlateDecode)?;
//! let mut engine = FilterEngine::new(codec);
//! engine.begin_encode(Vec::<u8>::new())?;
//! engine.encode_block(b"BT /F1 12 Tf ")?;
//! engine.encode_block(b"(Hello) Tj ET")?;
//! let body = engine.end_encode()?;
//!
//! assert_eq!(codec.decode(&body, None)?, b"BT /F1 12 Tf (Hello) Tj ET");
//! # Ok::<(), pdf_filters::PdfError>(())
//! ```

pub mod config;
pub mod error;
pub mod filter;
pub mod types;

pub use config::FilterConfig;
pub use error::{LogicError, PdfError, Result};
pub use filter::{
    decode_stream, decode_stream_with, encode_stream, filter_entry, Codec, FilterEngine,
    FilterKind, FilterRegistry, Sink,
};
pub use types::{Dictionary, PdfObject};
