use std::mem;

use log::{error, trace};

use super::codec::{Codec, Encoder, Output, Sink};
use crate::error::{LogicError, PdfError, Result};
use crate::types::Dictionary;

/// Capacity of the scratch buffer codecs write through before the sink
pub const FILTER_INTERNAL_BUFFER_SIZE: usize = 4096;

enum EngineState<S> {
    Idle,
    Encoding { sink: S, encoder: Encoder },
}

/// Drives one codec through progressive encoding.
///
/// ```text
/// Idle --begin_encode--> Encoding --encode_block--> Encoding
/// Encoding --end_encode | fail_encode--> Idle
/// ```
///
/// An engine runs at most one session at a time. Engines are cheap, so use one
/// per concurrent logical stream rather than sharing.
pub struct FilterEngine<'c, S: Sink> {
    codec: &'c Codec,
    state: EngineState<S>,
    scratch: Box<[u8]>,
}

impl<'c, S: Sink> FilterEngine<'c, S> {
    pub fn new(codec: &'c Codec) -> Self {
        Self {
            codec,
            state: EngineState::Idle,
            scratch: vec![0u8; FILTER_INTERNAL_BUFFER_SIZE].into_boxed_slice(),
        }
    }

    pub fn codec(&self) -> &'c Codec {
        self.codec
    }

    pub fn is_encoding(&self) -> bool {
        matches!(self.state, EngineState::Encoding { .. })
    }

    /// Open a session writing into `sink`
    pub fn begin_encode(&mut self, sink: S) -> Result<()> {
        if self.is_encoding() {
            return Err(violation(LogicError::AlreadyEncoding));
        }
        let encoder = self.codec.start_encode()?;
        trace!("{}: begin encode", self.codec.kind());
        self.state = EngineState::Encoding { sink, encoder };
        Ok(())
    }

    /// Feed the next block. `input` is not retained after the call returns.
    ///
    /// A codec error ends the session; the engine is `Idle` afterwards.
    pub fn encode_block(&mut self, input: &[u8]) -> Result<()> {
        let EngineState::Encoding { sink, encoder } = &mut self.state else {
            return Err(violation(LogicError::NotEncoding));
        };

        let mut out = Output::new(sink, &mut self.scratch);
        let result = encoder.step(input, &mut out).and_then(|()| out.flush());
        if result.is_err() {
            self.state = EngineState::Idle;
        }
        result
    }

    /// Flush the codec, close the session and hand the sink back.
    ///
    /// The engine is `Idle` when this returns, whether or not the codec
    /// managed to flush.
    pub fn end_encode(&mut self) -> Result<S> {
        let EngineState::Encoding {
            mut sink,
            mut encoder,
        } = mem::replace(&mut self.state, EngineState::Idle)
        else {
            return Err(violation(LogicError::NotEncoding));
        };

        let mut out = Output::new(&mut sink, &mut self.scratch);
        encoder.finish(&mut out)?;
        out.flush()?;
        trace!("{}: end encode", self.codec.kind());
        Ok(sink)
    }

    /// Abandon the open session without flushing. Never fails.
    pub fn fail_encode(&mut self) {
        if self.is_encoding() {
            trace!("{}: encode abandoned", self.codec.kind());
        }
        self.state = EngineState::Idle;
    }

    /// Encode `input` in one go into a new buffer.
    ///
    /// Rejected with [`LogicError::AlreadyEncoding`] while a progressive
    /// session is open on this engine.
    pub fn encode(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        if self.is_encoding() {
            return Err(violation(LogicError::AlreadyEncoding));
        }

        let mut encoder = self.codec.start_encode()?;
        let mut sink: Vec<u8> = Vec::new();
        let mut out = Output::new(&mut sink, &mut self.scratch);
        encoder.step(input, &mut out)?;
        encoder.finish(&mut out)?;
        out.flush()?;
        Ok(sink)
    }

    pub fn decode(&self, input: &[u8], params: Option<&Dictionary>) -> Result<Vec<u8>> {
        self.codec.decode(input, params)
    }
}

fn violation(err: LogicError) -> PdfError {
    error!("filter engine misuse: {}", err);
    PdfError::Logic(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FilterConfig;
    use crate::filter::FilterKind;

    fn codec(kind: FilterKind) -> Codec {
        Codec::new(kind, &FilterConfig::default()).unwrap()
    }

    #[test]
    fn test_block_while_idle_is_logic_error() {
        let codec = codec(FilterKind::AsciiHexDecode);
        let mut engine = FilterEngine::<Vec<u8>>::new(&codec);

        let err = engine.encode_block(b"abc").unwrap_err();
        assert!(matches!(err, PdfError::Logic(LogicError::NotEncoding)));
        let err = engine.end_encode().unwrap_err();
        assert!(matches!(err, PdfError::Logic(LogicError::NotEncoding)));
    }

    #[test]
    fn test_double_begin_is_logic_error() {
        let codec = codec(FilterKind::AsciiHexDecode);
        let mut engine = FilterEngine::new(&codec);

        engine.begin_encode(Vec::<u8>::new()).unwrap();
        let err = engine.begin_encode(Vec::<u8>::new()).unwrap_err();
        assert!(err.is_logic_error());
        // The first session is still intact
        engine.encode_block(b"\x01").unwrap();
        assert_eq!(engine.end_encode().unwrap(), b"01>");
    }

    #[test]
    fn test_progressive_session() {
        let codec = codec(FilterKind::AsciiHexDecode);
        let mut engine = FilterEngine::new(&codec);

        engine.begin_encode(Vec::<u8>::new()).unwrap();
        assert!(engine.is_encoding());
        engine.encode_block(b"He").unwrap();
        engine.encode_block(b"llo").unwrap();
        let out = engine.end_encode().unwrap();
        assert!(!engine.is_encoding());
        assert_eq!(out, b"48656C6C6F>");
    }

    #[test]
    fn test_fail_encode_resets() {
        let codec = codec(FilterKind::Ascii85Decode);
        let mut engine = FilterEngine::new(&codec);

        engine.begin_encode(Vec::<u8>::new()).unwrap();
        engine.encode_block(b"partial").unwrap();
        engine.fail_encode();

        assert!(engine.encode_block(b"more").unwrap_err().is_logic_error());
        assert!(engine.end_encode().unwrap_err().is_logic_error());

        engine.begin_encode(Vec::<u8>::new()).unwrap();
        engine.encode_block(b"hello").unwrap();
        let reused = engine.end_encode().unwrap();
        assert_eq!(reused, codec.encode(b"hello").unwrap());
    }

    #[test]
    fn test_fail_encode_when_idle_is_noop() {
        let codec = codec(FilterKind::RunLengthDecode);
        let mut engine = FilterEngine::<Vec<u8>>::new(&codec);
        engine.fail_encode();
        assert!(!engine.is_encoding());
    }

    #[test]
    fn test_one_shot_rejected_during_session() {
        let codec = codec(FilterKind::FlateDecode);
        let mut engine = FilterEngine::new(&codec);

        engine.begin_encode(Vec::<u8>::new()).unwrap();
        let err = engine.encode(b"data").unwrap_err();
        assert!(matches!(err, PdfError::Logic(LogicError::AlreadyEncoding)));
        engine.fail_encode();
        assert!(engine.encode(b"data").is_ok());
    }

    #[test]
    fn test_begin_on_decode_only_codec_stays_idle() {
        let codec = codec(FilterKind::DctDecode);
        let mut engine = FilterEngine::new(&codec);

        let err = engine.begin_encode(Vec::<u8>::new()).unwrap_err();
        assert!(matches!(err, PdfError::EncodeUnsupported(FilterKind::DctDecode)));
        assert!(!err.is_logic_error());
        assert!(!engine.is_encoding());
    }

    #[test]
    fn test_borrowed_sink() {
        let codec = codec(FilterKind::RunLengthDecode);
        let mut body = b"stream\n".to_vec();
        {
            let mut engine = FilterEngine::new(&codec);
            engine.begin_encode(&mut body).unwrap();
            engine.encode_block(b"AAAA").unwrap();
            engine.end_encode().unwrap();
        }
        assert_eq!(body, b"stream\n\xFDA\x80");
    }

    #[test]
    fn test_decode_passthrough() {
        let codec = codec(FilterKind::AsciiHexDecode);
        let engine = FilterEngine::<Vec<u8>>::new(&codec);
        assert_eq!(engine.decode(b"41 42>", None).unwrap(), b"AB");
    }
}
