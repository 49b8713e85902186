use thiserror::Error;

use crate::filter::FilterKind;

/// Misuse of the progressive encoding API. These are bugs in the calling
/// code, never a property of the data being filtered.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicError {
    #[error("begin_encode called while a session is open")]
    AlreadyEncoding,

    #[error("no encoding session is open")]
    NotEncoding,
}

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("Internal logic error: {0}")]
    Logic(#[from] LogicError),

    #[error("Invalid document structure: {0}")]
    InvalidStructure(String),

    #[error("Unsupported filter: {0}")]
    UnsupportedFilter(String),

    #[error("Filter {0} cannot encode")]
    EncodeUnsupported(FilterKind),

    #[error("Compression failed: {0}")]
    CompressError(String),

    #[error("Decompression failed: {0}")]
    DecompressError(String),

    #[error("Corrupt {filter} data at byte {position}: {message}")]
    CorruptData {
        filter: FilterKind,
        position: usize,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PdfError {
    /// True for contract violations, false for every data-format error.
    pub fn is_logic_error(&self) -> bool {
        matches!(self, PdfError::Logic(_))
    }

    pub(crate) fn corrupt(filter: FilterKind, position: usize, message: impl Into<String>) -> Self {
        PdfError::CorruptData {
            filter,
            position,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PdfError>;
