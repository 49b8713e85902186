use super::codec::Output;
use super::FilterKind;
use crate::error::{PdfError, Result};

const EOD: u8 = 128;
const MAX_RUN: usize = 128;
// Shorter runs stay inside literal blocks
const MIN_REPEAT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLengthCodec;

impl RunLengthCodec {
    pub(crate) fn encoder(&self) -> RunLengthEncoder {
        RunLengthEncoder {
            literal: Vec::with_capacity(MAX_RUN),
            run_byte: 0,
            run_len: 0,
        }
    }

    pub fn decode(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut result = Vec::with_capacity(data.len() * 2);
        let mut pos = 0;

        while pos < data.len() {
            let length = data[pos] as usize;
            pos += 1;
            match length {
                0..=127 => {
                    let end = pos + length + 1;
                    let literal = data.get(pos..end).ok_or_else(|| {
                        PdfError::corrupt(
                            FilterKind::RunLengthDecode,
                            pos - 1,
                            format!("literal run of {} bytes is truncated", length + 1),
                        )
                    })?;
                    result.extend_from_slice(literal);
                    pos = end;
                }
                128 => break,
                _ => {
                    let &byte = data.get(pos).ok_or_else(|| {
                        PdfError::corrupt(FilterKind::RunLengthDecode, pos - 1, "repeat run has no byte")
                    })?;
                    result.resize(result.len() + 257 - length, byte);
                    pos += 1;
                }
            }
        }

        Ok(result)
    }
}

pub(crate) struct RunLengthEncoder {
    /// Bytes waiting to go out as one literal block
    literal: Vec<u8>,
    run_byte: u8,
    run_len: usize,
}

impl RunLengthEncoder {
    pub(crate) fn step(&mut self, input: &[u8], out: &mut Output<'_>) -> Result<()> {
        for &b in input {
            if self.run_len > 0 && b == self.run_byte && self.run_len < MAX_RUN {
                self.run_len += 1;
                continue;
            }
            self.end_run(out)?;
            self.run_byte = b;
            self.run_len = 1;
        }
        Ok(())
    }

    pub(crate) fn finish(&mut self, out: &mut Output<'_>) -> Result<()> {
        self.end_run(out)?;
        self.flush_literal(out)?;
        out.push(EOD)
    }

    fn end_run(&mut self, out: &mut Output<'_>) -> Result<()> {
        let len = std::mem::take(&mut self.run_len);
        if len >= MIN_REPEAT {
            self.flush_literal(out)?;
            out.push((257 - len) as u8)?;
            return out.push(self.run_byte);
        }
        for _ in 0..len {
            self.literal.push(self.run_byte);
            if self.literal.len() == MAX_RUN {
                self.flush_literal(out)?;
            }
        }
        Ok(())
    }

    fn flush_literal(&mut self, out: &mut Output<'_>) -> Result<()> {
        if self.literal.is_empty() {
            return Ok(());
        }
        out.push((self.literal.len() - 1) as u8)?;
        out.write(&self.literal)?;
        self.literal.clear();
        Ok(())
    }
}
