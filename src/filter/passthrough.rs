//! DCT and CCITT image data is left compressed: decoding hands the bytes to
//! the caller unchanged so an image decoder can take them from there.

use log::{debug, trace};

use super::FilterKind;
use crate::error::{PdfError, Result};
use crate::types::Dictionary;

const JPEG_SOI: [u8; 2] = [0xFF, 0xD8];

pub(crate) fn decode_dct(data: &[u8]) -> Vec<u8> {
    if !data.is_empty() && !data.starts_with(&JPEG_SOI) {
        debug!("DCTDecode: data does not start with a JPEG SOI marker");
    }
    data.to_vec()
}

/// Group 3 / Group 4 fax parameters from `/DecodeParms`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CcittParams {
    /// < 0 pure 2-D (G4), 0 pure 1-D (G3), > 0 mixed
    pub k: i64,
    pub columns: usize,
    /// 0 when the height is not known up front
    pub rows: usize,
    pub black_is_1: bool,
    pub encoded_byte_align: bool,
    pub end_of_block: bool,
}

impl Default for CcittParams {
    fn default() -> Self {
        Self {
            k: 0,
            columns: 1728,
            rows: 0,
            black_is_1: false,
            encoded_byte_align: false,
            end_of_block: true,
        }
    }
}

impl CcittParams {
    pub fn from_params(params: Option<&Dictionary>) -> Result<Self> {
        let mut result = Self::default();
        let Some(params) = params else {
            return Ok(result);
        };

        let int = |key: &str| params.get(key).and_then(|v| v.as_int());
        let flag = |key: &str| params.get(key).and_then(|v| v.as_bool());

        if let Some(k) = int("K") {
            result.k = k;
        }
        if let Some(columns) = int("Columns") {
            result.columns = positive(columns, "Columns")?;
        }
        if let Some(rows) = int("Rows") {
            result.rows = if rows == 0 { 0 } else { positive(rows, "Rows")? };
        }
        if let Some(b) = flag("BlackIs1") {
            result.black_is_1 = b;
        }
        if let Some(b) = flag("EncodedByteAlign") {
            result.encoded_byte_align = b;
        }
        if let Some(b) = flag("EndOfBlock") {
            result.end_of_block = b;
        }

        Ok(result)
    }
}

fn positive(value: i64, key: &str) -> Result<usize> {
    usize::try_from(value)
        .ok()
        .filter(|&v| v > 0)
        .ok_or_else(|| PdfError::corrupt(FilterKind::CcittFaxDecode, 0, format!("invalid {} {}", key, value)))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CcittCodec;

impl CcittCodec {
    pub fn decode(&self, data: &[u8], params: Option<&Dictionary>) -> Result<Vec<u8>> {
        let params = CcittParams::from_params(params)?;
        trace!("CCITTFaxDecode: passing through {} bytes with {:?}", data.len(), params);
        Ok(data.to_vec())
    }
}
