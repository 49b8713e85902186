use super::ascii_hex::is_pdf_whitespace;
use super::codec::Output;
use super::FilterKind;
use crate::error::{PdfError, Result};

const EOD: &[u8; 2] = b"~>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ascii85Codec {
    line_width: usize,
}

impl Ascii85Codec {
    pub fn new(line_width: usize) -> Self {
        Self { line_width }
    }

    pub(crate) fn encoder(&self) -> Ascii85Encoder {
        Ascii85Encoder {
            group: [0; 4],
            count: 0,
            line_width: self.line_width,
            column: 0,
        }
    }

    pub fn decode(&self, data: &[u8]) -> Result<Vec<u8>> {
        let corrupt = |position, message: &str| {
            PdfError::corrupt(FilterKind::Ascii85Decode, position, message)
        };

        let mut result = Vec::with_capacity(data.len() / 5 * 4 + 4);
        let mut value: u64 = 0;
        let mut count = 0;

        let start = data
            .iter()
            .position(|&b| !is_pdf_whitespace(b))
            .unwrap_or(data.len());
        let start = if data[start..].starts_with(b"<~") {
            start + 2
        } else {
            start
        };

        for (offset, &b) in data[start..].iter().enumerate() {
            let position = start + offset;
            match b {
                b if is_pdf_whitespace(b) => continue,
                b'~' => break,
                b'z' if count == 0 => result.extend_from_slice(&[0; 4]),
                b'z' => return Err(corrupt(position, "'z' inside a group")),
                b'!'..=b'u' => {
                    value = value * 85 + u64::from(b - b'!');
                    count += 1;
                    if count == 5 {
                        let word = u32::try_from(value)
                            .map_err(|_| corrupt(position, "group overflows 32 bits"))?;
                        result.extend_from_slice(&word.to_be_bytes());
                        value = 0;
                        count = 0;
                    }
                }
                _ => {
                    let message = format!("invalid character 0x{:02X}", b);
                    return Err(corrupt(position, message.as_str()));
                }
            }
        }

        match count {
            0 => {}
            1 => return Err(corrupt(data.len(), "final group has a single character")),
            _ => {
                // Pad the partial group with 'u' and keep count - 1 bytes
                for _ in count..5 {
                    value = value * 85 + 84;
                }
                let word = u32::try_from(value)
                    .map_err(|_| corrupt(data.len(), "group overflows 32 bits"))?;
                result.extend_from_slice(&word.to_be_bytes()[..count - 1]);
            }
        }

        Ok(result)
    }
}

pub(crate) struct Ascii85Encoder {
    group: [u8; 4],
    count: usize,
    line_width: usize,
    column: usize,
}

impl Ascii85Encoder {
    pub(crate) fn step(&mut self, input: &[u8], out: &mut Output<'_>) -> Result<()> {
        for &b in input {
            self.group[self.count] = b;
            self.count += 1;
            if self.count == 4 {
                self.flush_group(out)?;
            }
        }
        Ok(())
    }

    pub(crate) fn finish(&mut self, out: &mut Output<'_>) -> Result<()> {
        if self.count > 0 {
            self.flush_group(out)?;
        }
        self.column = 0;
        out.write(EOD)
    }

    fn flush_group(&mut self, out: &mut Output<'_>) -> Result<()> {
        let count = self.count;
        self.group[count..].fill(0);
        self.count = 0;

        let mut value = u32::from_be_bytes(self.group);
        if count == 4 && value == 0 {
            return self.emit(&[b'z'], out);
        }

        let mut digits = [0u8; 5];
        for digit in digits.iter_mut().rev() {
            *digit = (value % 85) as u8 + b'!';
            value /= 85;
        }
        self.emit(&digits[..count + 1], out)
    }

    fn emit(&mut self, chars: &[u8], out: &mut Output<'_>) -> Result<()> {
        for &c in chars {
            if self.line_width > 0 && self.column == self.line_width {
                out.push(b'\n')?;
                self.column = 0;
            }
            self.column += 1;
            out.push(c)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FilterConfig;
    use crate::filter::Codec;

    fn codec() -> Codec {
        Codec::new(FilterKind::Ascii85Decode, &FilterConfig::default()).unwrap()
    }

    #[test]
    fn test_empty_input_is_just_terminator() {
        assert_eq!(codec().encode(b"").unwrap(), b"~>");
        assert_eq!(codec().decode(b"~>", None).unwrap(), b"");
    }

    #[test]
    fn test_known_vectors() {
        assert_eq!(codec().encode(b"Man ").unwrap(), b"9jqo^~>");
        assert_eq!(codec().encode(b"sure.").unwrap(), b"F*2M7/c~>");
        assert_eq!(codec().decode(b"F*2M7/c~>", None).unwrap(), b"sure.");
    }

    #[test]
    fn test_zero_group_shorthand() {
        assert_eq!(codec().encode(&[0, 0, 0, 0]).unwrap(), b"z~>");
        // A partial zero group is not abbreviated
        assert_eq!(codec().encode(&[0, 0]).unwrap(), b"!!!~>");
        assert_eq!(codec().decode(b"zz~>", None).unwrap(), vec![0u8; 8]);
    }

    #[test]
    fn test_decode_accepts_prefix_and_whitespace() {
        let result = codec().decode(b"  <~9jq\no^\r\n~>", None).unwrap();
        assert_eq!(result, b"Man ");
    }

    #[test]
    fn test_decode_errors() {
        let err = codec().decode(b"9jz~>", None).unwrap_err();
        assert!(matches!(err, PdfError::CorruptData { position: 2, .. }));

        assert!(codec().decode(b"9jqo^9~>", None).is_err());
        assert!(codec().decode(b"s8W-\"~>", None).is_err());
        assert!(codec().decode(b"9j{o^~>", None).is_err());
    }

    #[test]
    fn test_line_wrapping() {
        let config = FilterConfig::new().with_line_width(5);
        let codec = Codec::new(FilterKind::Ascii85Decode, &config).unwrap();
        let encoded = codec.encode(b"Man Man ").unwrap();
        assert_eq!(encoded, b"9jqo^\n9jqo^~>");
        assert_eq!(codec.decode(&encoded, None).unwrap(), b"Man Man ");
    }
}
