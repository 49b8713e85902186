//! Predictor post-processing for Flate and LZW streams.
//!
//! `/DecodeParms` may ask for the decompressed bytes to be un-predicted row by
//! row, either with the TIFF horizontal differencing predictor (2) or with a
//! per-row PNG filter tag (10 to 15).

use log::{debug, warn};

use super::FilterKind;
use crate::error::{PdfError, Result};
use crate::types::Dictionary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Predictor {
    kind: u8,
    colors: usize,
    bits_per_component: usize,
    row_bytes: usize,
}

impl Predictor {
    /// Read predictor settings, or `None` when no prediction applies
    pub fn from_params(filter: FilterKind, params: Option<&Dictionary>) -> Result<Option<Self>> {
        let Some(params) = params else {
            return Ok(None);
        };

        let int = |key: &str, default: i64| {
            params.get(key).and_then(|v| v.as_int()).unwrap_or(default)
        };

        let kind = int("Predictor", 1);
        match kind {
            1 => return Ok(None),
            2 | 10..=15 => {}
            other => {
                warn!("{}: ignoring unknown predictor {}", filter, other);
                return Ok(None);
            }
        }

        let colors = int("Colors", 1);
        let bits_per_component = int("BitsPerComponent", 8);
        let columns = int("Columns", 1);

        if !(1..=32).contains(&colors) {
            return Err(PdfError::corrupt(filter, 0, format!("invalid Colors {}", colors)));
        }
        if ![1, 2, 4, 8, 16].contains(&bits_per_component) {
            return Err(PdfError::corrupt(
                filter,
                0,
                format!("invalid BitsPerComponent {}", bits_per_component),
            ));
        }
        if kind == 2 && bits_per_component < 8 {
            return Err(PdfError::corrupt(
                filter,
                0,
                format!("TIFF predictor with {} bits per component is not supported", bits_per_component),
            ));
        }
        if columns < 1 {
            return Err(PdfError::corrupt(filter, 0, format!("invalid Columns {}", columns)));
        }

        let colors = colors as usize;
        let bits_per_component = bits_per_component as usize;
        let row_bits = usize::try_from(columns)
            .ok()
            .and_then(|columns| (colors * bits_per_component).checked_mul(columns))
            .ok_or_else(|| PdfError::corrupt(filter, 0, format!("Columns {} is too large", columns)))?;

        Ok(Some(Self {
            kind: kind as u8,
            colors,
            bits_per_component,
            row_bytes: row_bits.div_ceil(8),
        }))
    }

    fn bytes_per_pixel(&self) -> usize {
        (self.colors * self.bits_per_component).div_ceil(8)
    }

    pub fn decode(&self, filter: FilterKind, data: &[u8]) -> Result<Vec<u8>> {
        if data.is_empty() {
            return Ok(Vec::new());
        }
        if self.row_bytes > data.len() {
            return Err(PdfError::corrupt(
                filter,
                0,
                format!("predictor row of {} bytes exceeds the {} bytes of data", self.row_bytes, data.len()),
            ));
        }

        if self.kind == 2 {
            Ok(self.decode_tiff(data))
        } else {
            self.decode_png(filter, data)
        }
    }

    /// Each component is stored as the difference from the same component
    /// of the pixel to its left. Only 8 and 16 bit components get here.
    fn decode_tiff(&self, data: &[u8]) -> Vec<u8> {
        let mut result = data.to_vec();

        if self.bits_per_component == 8 {
            for row in result.chunks_mut(self.row_bytes) {
                for i in self.colors..row.len() {
                    row[i] = row[i].wrapping_add(row[i - self.colors]);
                }
            }
        } else {
            let stride = self.colors * 2;
            for row in result.chunks_mut(self.row_bytes) {
                let mut i = stride;
                while i + 1 < row.len() {
                    let left = u16::from_be_bytes([row[i - stride], row[i - stride + 1]]);
                    let delta = u16::from_be_bytes([row[i], row[i + 1]]);
                    row[i..i + 2].copy_from_slice(&left.wrapping_add(delta).to_be_bytes());
                    i += 2;
                }
            }
        }

        result
    }

    /// Every row starts with a tag naming the PNG filter used for that row.
    fn decode_png(&self, filter: FilterKind, data: &[u8]) -> Result<Vec<u8>> {
        let row_bytes = self.row_bytes;
        let bpp = self.bytes_per_pixel();
        let row_size = row_bytes + 1;

        let mut result = Vec::with_capacity(data.len() / row_size * row_bytes);
        let mut prev_row = vec![0u8; row_bytes];
        let mut current_row = vec![0u8; row_bytes];

        for (index, row) in data.chunks(row_size).enumerate() {
            if row.len() < row_size {
                debug!("{}: dropping {} trailing predictor bytes", filter, row.len());
                break;
            }

            let (tag, encoded) = (row[0], &row[1..]);
            match tag {
                0 => current_row.copy_from_slice(encoded),
                1 => {
                    for i in 0..row_bytes {
                        let left = if i >= bpp { current_row[i - bpp] } else { 0 };
                        current_row[i] = encoded[i].wrapping_add(left);
                    }
                }
                2 => {
                    for i in 0..row_bytes {
                        current_row[i] = encoded[i].wrapping_add(prev_row[i]);
                    }
                }
                3 => {
                    for i in 0..row_bytes {
                        let left = if i >= bpp { current_row[i - bpp] as u16 } else { 0 };
                        let above = prev_row[i] as u16;
                        current_row[i] = encoded[i].wrapping_add(((left + above) / 2) as u8);
                    }
                }
                4 => {
                    for i in 0..row_bytes {
                        let left = if i >= bpp { current_row[i - bpp] } else { 0 };
                        let upper_left = if i >= bpp { prev_row[i - bpp] } else { 0 };
                        current_row[i] = encoded[i].wrapping_add(paeth(left, prev_row[i], upper_left));
                    }
                }
                other => {
                    return Err(PdfError::corrupt(
                        filter,
                        index * row_size,
                        format!("unknown PNG row filter {}", other),
                    ));
                }
            }

            result.extend_from_slice(&current_row);
            std::mem::swap(&mut prev_row, &mut current_row);
        }

        Ok(result)
    }
}

fn paeth(left: u8, above: u8, upper_left: u8) -> u8 {
    let p = left as i16 + above as i16 - upper_left as i16;
    let pa = (p - left as i16).abs();
    let pb = (p - above as i16).abs();
    let pc = (p - upper_left as i16).abs();

    if pa <= pb && pa <= pc {
        left
    } else if pb <= pc {
        above
    } else {
        upper_left
    }
}
