use super::codec::Output;
use super::FilterKind;
use crate::error::{PdfError, Result};

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsciiHexCodec {
    line_width: usize,
}

impl AsciiHexCodec {
    pub fn new(line_width: usize) -> Self {
        Self { line_width }
    }

    pub(crate) fn encoder(&self) -> AsciiHexEncoder {
        AsciiHexEncoder {
            line_width: self.line_width,
            column: 0,
        }
    }

    /// Decode ASCII hex encoded data
    pub fn decode(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut result = Vec::with_capacity(data.len() / 2);
        let mut high: Option<u8> = None;

        for (position, &b) in data.iter().enumerate() {
            if is_pdf_whitespace(b) {
                continue;
            }
            if b == b'>' {
                break; // End of data marker
            }

            let nibble = hex_val(b).ok_or_else(|| {
                PdfError::corrupt(
                    FilterKind::AsciiHexDecode,
                    position,
                    format!("Invalid hex char: 0x{:02X}", b),
                )
            })?;

            match high.take() {
                Some(h) => result.push((h << 4) | nibble),
                None => high = Some(nibble),
            }
        }

        // An odd final digit behaves as if followed by 0
        if let Some(h) = high {
            result.push(h << 4);
        }

        Ok(result)
    }
}

pub(crate) struct AsciiHexEncoder {
    line_width: usize,
    column: usize,
}

impl AsciiHexEncoder {
    pub(crate) fn step(&mut self, input: &[u8], out: &mut Output<'_>) -> Result<()> {
        for &b in input {
            self.emit(HEX_DIGITS[(b >> 4) as usize], out)?;
            self.emit(HEX_DIGITS[(b & 0x0F) as usize], out)?;
        }
        Ok(())
    }

    pub(crate) fn finish(&mut self, out: &mut Output<'_>) -> Result<()> {
        self.column = 0;
        out.push(b'>')
    }

    fn emit(&mut self, digit: u8, out: &mut Output<'_>) -> Result<()> {
        if self.line_width > 0 && self.column == self.line_width {
            out.push(b'\n')?;
            self.column = 0;
        }
        self.column += 1;
        out.push(digit)
    }
}

pub(crate) fn is_pdf_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0C | 0x00)
}

fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
