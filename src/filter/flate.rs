use std::io::Read;
use std::mem;

use flate2::read::ZlibDecoder;
use flate2::{Compress, Compression, FlushCompress, Status};

use super::codec::Output;
use super::predictor::Predictor;
use super::FilterKind;
use crate::error::{PdfError, Result};
use crate::types::Dictionary;

/// Input is handed to the compressor in blocks of exactly this size, so the
/// compressed bytes do not depend on how the caller split its writes.
const BLOCK_SIZE: usize = 16 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlateCodec {
    level: u32,
}

impl FlateCodec {
    pub fn new(level: u32) -> Self {
        Self { level }
    }

    pub(crate) fn encoder(&self) -> FlateEncoder {
        FlateEncoder {
            compress: Compress::new(Compression::new(self.level), true),
            pending: Vec::with_capacity(BLOCK_SIZE),
        }
    }

    /// Decompress zlib/deflate data, then undo any predictor
    pub fn decode(&self, data: &[u8], params: Option<&Dictionary>) -> Result<Vec<u8>> {
        let predictor = Predictor::from_params(FilterKind::FlateDecode, params)?;

        let mut decoder = ZlibDecoder::new(data);
        let mut result = Vec::new();

        decoder
            .read_to_end(&mut result)
            .map_err(|e| PdfError::DecompressError(format!("FlateDecode failed: {}", e)))?;

        match predictor {
            Some(predictor) => predictor.decode(FilterKind::FlateDecode, &result),
            None => Ok(result),
        }
    }
}

pub(crate) struct FlateEncoder {
    compress: Compress,
    pending: Vec<u8>,
}

impl FlateEncoder {
    pub(crate) fn step(&mut self, mut input: &[u8], out: &mut Output<'_>) -> Result<()> {
        while !input.is_empty() {
            let n = input.len().min(BLOCK_SIZE - self.pending.len());
            self.pending.extend_from_slice(&input[..n]);
            input = &input[n..];

            if self.pending.len() == BLOCK_SIZE {
                let block = mem::take(&mut self.pending);
                self.deflate(&block, FlushCompress::None, out)?;
                self.pending = block;
                self.pending.clear();
            }
        }
        Ok(())
    }

    pub(crate) fn finish(&mut self, out: &mut Output<'_>) -> Result<()> {
        let block = mem::take(&mut self.pending);
        self.deflate(&block, FlushCompress::Finish, out)
    }

    fn deflate(&mut self, mut input: &[u8], flush: FlushCompress, out: &mut Output<'_>) -> Result<()> {
        loop {
            let compress = &mut self.compress;
            let in_before = compress.total_in();
            let mut status = Status::Ok;

            out.fill_with(|buf| {
                let out_before = compress.total_out();
                status = compress
                    .compress(input, buf, flush)
                    .map_err(|e| PdfError::CompressError(format!("FlateDecode failed: {}", e)))?;
                Ok((compress.total_out() - out_before) as usize)
            })?;

            let consumed = (compress.total_in() - in_before) as usize;
            input = &input[consumed..];

            let done = match flush {
                FlushCompress::Finish => status == Status::StreamEnd,
                _ => input.is_empty(),
            };
            if done {
                return Ok(());
            }
        }
    }
}
