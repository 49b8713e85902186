mod object;

pub use object::{Dictionary, PdfObject};
