mod ascii85;
mod ascii_hex;
mod codec;
mod engine;
mod flate;
mod kind;
mod lzw;
mod passthrough;
mod predictor;
mod registry;
mod run_length;

use log::debug;

use crate::error::{PdfError, Result};
use crate::types::{Dictionary, PdfObject};

pub use ascii85::Ascii85Codec;
pub use ascii_hex::AsciiHexCodec;
pub use codec::{Codec, Sink};
pub use engine::{FilterEngine, FILTER_INTERNAL_BUFFER_SIZE};
pub use flate::FlateCodec;
pub use kind::FilterKind;
pub use lzw::LzwCodec;
pub use passthrough::{CcittCodec, CcittParams};
pub use predictor::Predictor;
pub use registry::FilterRegistry;
pub use run_length::RunLengthCodec;

/// Decode stream data based on Filter(s) in the stream dictionary
pub fn decode_stream(dict: &Dictionary, data: &[u8]) -> Result<Vec<u8>> {
    decode_stream_with(FilterRegistry::global(), dict, data)
}

/// Like [`decode_stream`], with codecs taken from `registry`
pub fn decode_stream_with(registry: &FilterRegistry, dict: &Dictionary, data: &[u8]) -> Result<Vec<u8>> {
    let filters = get_filters(dict)?;

    if filters.is_empty() {
        // No filters - return raw data
        return Ok(data.to_vec());
    }

    let parms = get_decode_parms(dict, filters.len())?;
    let mut result = data.to_vec();

    for (filter, params) in filters.iter().zip(parms) {
        let codec = registry.create_by_name(filter)?;
        debug!("decoding {} bytes with {}", result.len(), codec.kind());
        result = codec.decode(&result, params)?;
    }

    Ok(result)
}

/// Encode `data` so that decoding with `filters`, in order, gives it back.
///
/// `filters` is listed the way it will appear in `/Filter`, so the encoders
/// run from last to first.
pub fn encode_stream(registry: &FilterRegistry, filters: &[FilterKind], data: &[u8]) -> Result<Vec<u8>> {
    let mut result = data.to_vec();

    for &kind in filters.iter().rev() {
        let codec = registry.create(kind)?;
        debug!("encoding {} bytes with {}", result.len(), kind);
        result = codec.encode(&result)?;
    }

    Ok(result)
}

/// The `/Filter` value naming `filters`: a single name or an array
pub fn filter_entry(filters: &[FilterKind]) -> Option<PdfObject> {
    let name = |kind: &FilterKind| PdfObject::Name(kind.name().to_string());
    match filters {
        [] => None,
        [single] => Some(name(single)),
        many => Some(PdfObject::Array(many.iter().map(name).collect())),
    }
}

/// Extract filter names from dictionary
fn get_filters(dict: &Dictionary) -> Result<Vec<String>> {
    match dict.get("Filter").or_else(|| dict.get("F")) {
        None => Ok(vec![]),
        Some(PdfObject::Name(name)) => Ok(vec![name.clone()]),
        Some(PdfObject::Array(arr)) => arr
            .iter()
            .map(|obj| {
                obj.as_name()
                    .map(|s| s.to_string())
                    .ok_or_else(|| PdfError::InvalidStructure("Filter must be name".into()))
            })
            .collect(),
        _ => Err(PdfError::InvalidStructure("Invalid Filter type".into())),
    }
}

/// Decode parameters for each of `count` filters; `None` means defaults
fn get_decode_parms(dict: &Dictionary, count: usize) -> Result<Vec<Option<&Dictionary>>> {
    let mut parms = vec![None; count];

    match dict.get("DecodeParms").or_else(|| dict.get("DP")) {
        None | Some(PdfObject::Null) => {}
        Some(PdfObject::Dict(d)) => parms[0] = Some(d),
        Some(PdfObject::Array(arr)) => {
            for (slot, obj) in parms.iter_mut().zip(arr) {
                *slot = match obj {
                    PdfObject::Dict(d) => Some(d),
                    PdfObject::Null => None,
                    _ => {
                        return Err(PdfError::InvalidStructure(
                            "DecodeParms entries must be dictionaries".into(),
                        ));
                    }
                };
            }
        }
        _ => return Err(PdfError::InvalidStructure("Invalid DecodeParms type".into())),
    }

    Ok(parms)
}
