use std::io::Write;

use log::debug;

use super::ascii85::{Ascii85Codec, Ascii85Encoder};
use super::ascii_hex::{AsciiHexCodec, AsciiHexEncoder};
use super::engine::FilterEngine;
use super::flate::{FlateCodec, FlateEncoder};
use super::lzw::{LzwCodec, LzwEncoder};
use super::passthrough::{self, CcittCodec};
use super::run_length::{RunLengthCodec, RunLengthEncoder};
use super::FilterKind;
use crate::config::FilterConfig;
use crate::error::{PdfError, Result};
use crate::types::Dictionary;

/// Append-only destination for encoded bytes.
///
/// Every `std::io::Write` is a sink, so `Vec<u8>`, `&mut Vec<u8>` and files
/// can be handed to [`FilterEngine::begin_encode`] directly.
pub trait Sink {
    fn append(&mut self, bytes: &[u8]) -> Result<()>;
}

impl<W: Write + ?Sized> Sink for W {
    fn append(&mut self, bytes: &[u8]) -> Result<()> {
        self.write_all(bytes).map_err(PdfError::Io)
    }
}

/// Batches codec output in the engine's scratch buffer before it reaches
/// the sink.
pub(crate) struct Output<'a> {
    sink: &'a mut dyn Sink,
    scratch: &'a mut [u8],
    len: usize,
}

impl<'a> Output<'a> {
    pub(crate) fn new(sink: &'a mut dyn Sink, scratch: &'a mut [u8]) -> Self {
        Self {
            sink,
            scratch,
            len: 0,
        }
    }

    pub fn push(&mut self, byte: u8) -> Result<()> {
        if self.len == self.scratch.len() {
            self.flush()?;
        }
        self.scratch[self.len] = byte;
        self.len += 1;
        Ok(())
    }

    pub fn write(&mut self, mut bytes: &[u8]) -> Result<()> {
        while !bytes.is_empty() {
            if self.len == self.scratch.len() {
                self.flush()?;
            }
            let n = bytes.len().min(self.scratch.len() - self.len);
            self.scratch[self.len..self.len + n].copy_from_slice(&bytes[..n]);
            self.len += n;
            bytes = &bytes[n..];
        }
        Ok(())
    }

    /// Let `produce` fill the free part of the scratch buffer directly and
    /// return how many bytes it wrote.
    pub fn fill_with<F>(&mut self, produce: F) -> Result<usize>
    where
        F: FnOnce(&mut [u8]) -> Result<usize>,
    {
        if self.len == self.scratch.len() {
            self.flush()?;
        }
        let written = produce(&mut self.scratch[self.len..])?;
        self.len += written;
        Ok(written)
    }

    pub fn flush(&mut self) -> Result<()> {
        if self.len > 0 {
            self.sink.append(&self.scratch[..self.len])?;
            self.len = 0;
        }
        Ok(())
    }
}

/// Per-session encoder state. Lives in the engine, never in the shared codec.
pub(crate) enum Encoder {
    AsciiHex(AsciiHexEncoder),
    Ascii85(Ascii85Encoder),
    Lzw(LzwEncoder),
    Flate(FlateEncoder),
    RunLength(RunLengthEncoder),
}

impl Encoder {
    pub(crate) fn step(&mut self, input: &[u8], out: &mut Output<'_>) -> Result<()> {
        match self {
            Encoder::AsciiHex(e) => e.step(input, out),
            Encoder::Ascii85(e) => e.step(input, out),
            Encoder::Lzw(e) => e.step(input, out),
            Encoder::Flate(e) => e.step(input, out),
            Encoder::RunLength(e) => e.step(input, out),
        }
    }

    pub(crate) fn finish(&mut self, out: &mut Output<'_>) -> Result<()> {
        match self {
            Encoder::AsciiHex(e) => e.finish(out),
            Encoder::Ascii85(e) => e.finish(out),
            Encoder::Lzw(e) => e.finish(out),
            Encoder::Flate(e) => e.finish(out),
            Encoder::RunLength(e) => e.finish(out),
        }
    }
}

/// One codec per implemented filter kind.
///
/// A `Codec` only carries immutable settings, so a single instance can be
/// shared by any number of threads decoding or one-shot encoding at once.
#[derive(Debug, Clone, PartialEq)]
pub enum Codec {
    AsciiHex(AsciiHexCodec),
    Ascii85(Ascii85Codec),
    Lzw(LzwCodec),
    Flate(FlateCodec),
    RunLength(RunLengthCodec),
    Dct,
    Ccitt(CcittCodec),
}

impl Codec {
    /// Build the codec for `kind`, or `None` when no implementation exists
    pub fn new(kind: FilterKind, config: &FilterConfig) -> Option<Self> {
        let codec = match kind {
            FilterKind::AsciiHexDecode => Codec::AsciiHex(AsciiHexCodec::new(config.line_width())),
            FilterKind::Ascii85Decode => Codec::Ascii85(Ascii85Codec::new(config.line_width())),
            FilterKind::LzwDecode => Codec::Lzw(LzwCodec::new(config.early_change())),
            FilterKind::FlateDecode => Codec::Flate(FlateCodec::new(config.compression_level())),
            FilterKind::RunLengthDecode => Codec::RunLength(RunLengthCodec),
            FilterKind::DctDecode => Codec::Dct,
            FilterKind::CcittFaxDecode => Codec::Ccitt(CcittCodec),
            FilterKind::Jbig2Decode | FilterKind::JpxDecode | FilterKind::Crypt => return None,
        };
        debug!("constructed {} codec", kind);
        Some(codec)
    }

    pub fn kind(&self) -> FilterKind {
        match self {
            Codec::AsciiHex(_) => FilterKind::AsciiHexDecode,
            Codec::Ascii85(_) => FilterKind::Ascii85Decode,
            Codec::Lzw(_) => FilterKind::LzwDecode,
            Codec::Flate(_) => FilterKind::FlateDecode,
            Codec::RunLength(_) => FilterKind::RunLengthDecode,
            Codec::Dct => FilterKind::DctDecode,
            Codec::Ccitt(_) => FilterKind::CcittFaxDecode,
        }
    }

    /// DCT and CCITT data is embedded already compressed by an image
    /// encoder, so those codecs only decode.
    pub fn can_encode(&self) -> bool {
        !matches!(self, Codec::Dct | Codec::Ccitt(_))
    }

    pub fn can_decode(&self) -> bool {
        true
    }

    /// Decode a whole stream body into a newly allocated buffer
    pub fn decode(&self, input: &[u8], params: Option<&Dictionary>) -> Result<Vec<u8>> {
        match self {
            Codec::AsciiHex(c) => c.decode(input),
            Codec::Ascii85(c) => c.decode(input),
            Codec::Lzw(c) => c.decode(input, params),
            Codec::Flate(c) => c.decode(input, params),
            Codec::RunLength(c) => c.decode(input),
            Codec::Dct => Ok(passthrough::decode_dct(input)),
            Codec::Ccitt(c) => c.decode(input, params),
        }
    }

    /// One-shot encode on a private engine, safe to call from many threads
    pub fn encode(&self, input: &[u8]) -> Result<Vec<u8>> {
        FilterEngine::<Vec<u8>>::new(self).encode(input)
    }

    /// Start a progressive session's encoder state
    pub(crate) fn start_encode(&self) -> Result<Encoder> {
        let encoder = match self {
            Codec::AsciiHex(c) => Encoder::AsciiHex(c.encoder()),
            Codec::Ascii85(c) => Encoder::Ascii85(c.encoder()),
            Codec::Lzw(c) => Encoder::Lzw(c.encoder()),
            Codec::Flate(c) => Encoder::Flate(c.encoder()),
            Codec::RunLength(c) => Encoder::RunLength(c.encoder()),
            Codec::Dct | Codec::Ccitt(_) => return Err(PdfError::EncodeUnsupported(self.kind())),
        };
        Ok(encoder)
    }
}
