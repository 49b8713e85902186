//! LZW as used by PDF: MSB-first codes of 9 to 12 bits, a Clear code that
//! resets the table and an end-of-data code.
//!
//! With early change (the default) the code width grows one table entry
//! sooner than plain LZW would, matching what most PDF writers emit. That is
//! the same switch point TIFF uses.

use log::debug;
use weezl::{BitOrder, LzwStatus, decode, encode};

use super::codec::Output;
use super::predictor::Predictor;
use super::FilterKind;
use crate::error::{PdfError, Result};
use crate::types::Dictionary;

const SYMBOL_BITS: u8 = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LzwCodec {
    early_change: bool,
}

impl LzwCodec {
    pub fn new(early_change: bool) -> Self {
        Self { early_change }
    }

    pub(crate) fn encoder(&self) -> LzwEncoder {
        let inner = if self.early_change {
            encode::Encoder::with_tiff_size_switch(BitOrder::Msb, SYMBOL_BITS)
        } else {
            encode::Encoder::new(BitOrder::Msb, SYMBOL_BITS)
        };
        LzwEncoder { inner }
    }

    pub fn decode(&self, data: &[u8], params: Option<&Dictionary>) -> Result<Vec<u8>> {
        let early_change = params
            .and_then(|p| p.get("EarlyChange"))
            .and_then(|v| v.as_int())
            .is_none_or(|v| v != 0);
        let predictor = Predictor::from_params(FilterKind::LzwDecode, params)?;

        let result = decode_codes(data, early_change)?;

        match predictor {
            Some(predictor) => predictor.decode(FilterKind::LzwDecode, &result),
            None => Ok(result),
        }
    }
}

fn decode_codes(mut data: &[u8], early_change: bool) -> Result<Vec<u8>> {
    let mut decoder = if early_change {
        decode::Decoder::with_tiff_size_switch(BitOrder::Msb, SYMBOL_BITS)
    } else {
        decode::Decoder::new(BitOrder::Msb, SYMBOL_BITS)
    };

    let mut result = Vec::with_capacity(data.len() * 3);
    let mut chunk = [0u8; 4096];
    let mut position = 0;

    loop {
        let step = decoder.decode_bytes(data, &mut chunk);
        data = &data[step.consumed_in..];
        position += step.consumed_in;
        result.extend_from_slice(&chunk[..step.consumed_out]);

        match step.status {
            Ok(LzwStatus::Ok) => {}
            Ok(LzwStatus::Done) => break,
            Ok(LzwStatus::NoProgress) => {
                // Writers occasionally omit the end-of-data code
                debug!("LZWDecode: data ended without an EOD code");
                break;
            }
            Err(e) => {
                return Err(PdfError::corrupt(FilterKind::LzwDecode, position, e.to_string()));
            }
        }
    }

    Ok(result)
}

pub(crate) struct LzwEncoder {
    inner: encode::Encoder,
}

impl LzwEncoder {
    pub(crate) fn step(&mut self, mut input: &[u8], out: &mut Output<'_>) -> Result<()> {
        while !input.is_empty() {
            let mut consumed = 0;
            out.fill_with(|buf| {
                let step = self.inner.encode_bytes(input, buf);
                step.status.map_err(|e| PdfError::CompressError(format!("LZWDecode failed: {}", e)))?;
                consumed = step.consumed_in;
                Ok(step.consumed_out)
            })?;
            input = &input[consumed..];
        }
        Ok(())
    }

    /// Emit the pending code, EOD and the padding bits
    pub(crate) fn finish(&mut self, out: &mut Output<'_>) -> Result<()> {
        self.inner.finish();
        loop {
            let mut status = LzwStatus::Ok;
            out.fill_with(|buf| {
                let step = self.inner.encode_bytes(&[], buf);
                status = step
                    .status
                    .map_err(|e| PdfError::CompressError(format!("LZWDecode failed: {}", e)))?;
                Ok(step.consumed_out)
            })?;
            match status {
                LzwStatus::Done => return Ok(()),
                LzwStatus::Ok => {}
                LzwStatus::NoProgress => {
                    return Err(PdfError::CompressError("LZWDecode: encoder stalled before EOD".into()));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FilterConfig;
    use crate::filter::Codec;
    use crate::types::PdfObject;

    fn codec(early_change: bool) -> Codec {
        let config = FilterConfig::new().with_early_change(early_change);
        Codec::new(FilterKind::LzwDecode, &config).unwrap()
    }

    fn early_change_params(value: i64) -> Dictionary {
        let mut params = Dictionary::new();
        params.insert("EarlyChange".into(), PdfObject::Int(value));
        params
    }

    #[test]
    fn test_reference_example() {
        // The sample sequence from the LZWDecode section of the PDF reference
        let input = [45u8, 45, 45, 45, 45, 65, 45, 45, 45, 66];
        let encoded = [0x80, 0x0B, 0x60, 0x50, 0x22, 0x0C, 0x0C, 0x85, 0x01];
        assert_eq!(codec(true).encode(&input).unwrap(), encoded);
        assert_eq!(codec(true).decode(&encoded, None).unwrap(), input);
    }

    #[test]
    fn test_empty() {
        let encoded = codec(true).encode(b"").unwrap();
        // Clear then EOD, 9 bits each
        assert_eq!(encoded, [0x80, 0x40, 0x40]);
        assert_eq!(codec(true).decode(&encoded, None).unwrap(), b"");
    }

    #[test]
    fn test_table_fills_and_resets() {
        let input: Vec<u8> = (0..40_000u32).map(|i| (i.wrapping_mul(2_654_435_761) >> 13) as u8).collect();
        for early in [true, false] {
            let encoded = codec(early).encode(&input).unwrap();
            let params = early_change_params(i64::from(early));
            assert_eq!(codec(early).decode(&encoded, Some(&params)).unwrap(), input);
        }
    }

    #[test]
    fn test_width_boundaries() {
        // Lengths around the points where the code width changes
        for len in [250usize, 253, 254, 255, 256, 257, 510, 511, 512, 513, 1022, 1023, 1024, 2047, 2048] {
            let input: Vec<u8> = (0..len * 4).map(|i| (i % 7 + (i / 13) % 5) as u8).collect();
            for early in [true, false] {
                let encoded = codec(early).encode(&input).unwrap();
                let params = early_change_params(i64::from(early));
                assert_eq!(
                    codec(early).decode(&encoded, Some(&params)).unwrap(),
                    input,
                    "len {} early {}",
                    len,
                    early
                );
            }
        }
    }

    #[test]
    fn test_invalid_code() {
        // Clear, 'A', then code 300 while the table only reaches 258
        let encoded = [0x80, 0x10, 0x65, 0x80];
        let err = codec(true).decode(&encoded, None).unwrap_err();
        assert!(matches!(err, PdfError::CorruptData { filter: FilterKind::LzwDecode, .. }));
    }

    #[test]
    fn test_without_early_change() {
        // Enough distinct strings to pass the 9 to 10 bit switch
        let input: Vec<u8> = (0..2000u32).map(|i| (i.wrapping_mul(2_654_435_761) >> 13) as u8).collect();
        let late = codec(false).encode(&input).unwrap();
        assert_ne!(late, codec(true).encode(&input).unwrap());
        assert_eq!(codec(false).decode(&late, Some(&early_change_params(0))).unwrap(), input);
    }

    #[test]
    fn test_missing_eod_is_tolerated() {
        let encoded = codec(true).encode(b"ABABABA").unwrap();
        let truncated = &encoded[..encoded.len() - 1];
        let decoded = codec(true).decode(truncated, None).unwrap();
        assert!(b"ABABABA".starts_with(&decoded));
    }
}
