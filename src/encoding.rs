//! Streaming transcoders that sit beneath the CSV reader and writer.
//!
//! Both adapters reject input they cannot convert instead of substituting
//! replacement characters, so a bad byte in the dropped file or a character
//! the roster encoding lacks stops the run.

use std::io::{self, Read, Write};

use encoding_rs::{Decoder, DecoderResult, Encoder, EncoderResult, Encoding};

const CHUNK: usize = 8 * 1024;

/// Decodes bytes from `encoding` into UTF-8 as they are read.
pub struct DecodingReader<R> {
    inner: R,
    encoding: &'static Encoding,
    decoder: Decoder,
    input: Box<[u8]>,
    in_start: usize,
    in_end: usize,
    output: Box<[u8]>,
    out_start: usize,
    out_end: usize,
    eof: bool,
    finished: bool,
}

impl<R: Read> DecodingReader<R> {
    pub fn new(inner: R, encoding: &'static Encoding) -> Self {
        Self {
            inner,
            encoding,
            decoder: encoding.new_decoder_without_bom_handling(),
            input: vec![0; CHUNK].into_boxed_slice(),
            in_start: 0,
            in_end: 0,
            // Single-byte katakana expands to three UTF-8 bytes.
            output: vec![0; CHUNK * 3 + 16].into_boxed_slice(),
            out_start: 0,
            out_end: 0,
            eof: false,
            finished: false,
        }
    }

    fn fill_input(&mut self) -> io::Result<()> {
        let n = self.inner.read(&mut self.input)?;
        self.in_start = 0;
        self.in_end = n;
        self.eof = n == 0;
        Ok(())
    }
}

impl<R: Read> Read for DecodingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            if self.out_start < self.out_end {
                let n = buf.len().min(self.out_end - self.out_start);
                buf[..n].copy_from_slice(&self.output[self.out_start..self.out_start + n]);
                self.out_start += n;
                return Ok(n);
            }
            if self.finished {
                return Ok(0);
            }
            if self.in_start == self.in_end && !self.eof {
                self.fill_input()?;
            }

            let last = self.eof;
            let (result, read, written) = self.decoder.decode_to_utf8_without_replacement(
                &self.input[self.in_start..self.in_end],
                &mut self.output,
                last,
            );
            self.in_start += read;
            self.out_start = 0;
            self.out_end = written;

            match result {
                DecoderResult::InputEmpty => {
                    if last {
                        self.finished = true;
                    }
                }
                DecoderResult::OutputFull => {}
                DecoderResult::Malformed(len, _) => {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!(
                            "malformed {} sequence of {len} byte(s)",
                            self.encoding.name()
                        ),
                    ));
                }
            }
        }
    }
}

/// Encodes UTF-8 written to it into `encoding` before passing it on.
pub struct EncodingWriter<W: Write> {
    inner: W,
    encoding: &'static Encoding,
    encoder: Encoder,
    // Trailing bytes of a UTF-8 sequence split across writes.
    pending: Vec<u8>,
    output: Box<[u8]>,
}

impl<W: Write> EncodingWriter<W> {
    pub fn new(inner: W, encoding: &'static Encoding) -> Self {
        Self {
            inner,
            encoding,
            encoder: encoding.new_encoder(),
            pending: Vec::new(),
            output: vec![0; CHUNK].into_boxed_slice(),
        }
    }

    /// Flushes the encoder state and returns the wrapped writer.
    pub fn finish(mut self) -> io::Result<W> {
        if !self.pending.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "stream ended inside a UTF-8 sequence",
            ));
        }
        self.encode("", true)?;
        self.inner.flush()?;
        Ok(self.inner)
    }

    fn encode(&mut self, mut text: &str, last: bool) -> io::Result<()> {
        loop {
            let (result, read, written) =
                self.encoder
                    .encode_from_utf8_without_replacement(text, &mut self.output, last);
            self.inner.write_all(&self.output[..written])?;
            text = &text[read..];

            match result {
                EncoderResult::InputEmpty => return Ok(()),
                EncoderResult::OutputFull => {}
                EncoderResult::Unmappable(c) => {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("{c:?} cannot be encoded as {}", self.encoding.name()),
                    ));
                }
            }
        }
    }
}

impl<W: Write> Write for EncodingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        let complete = match std::str::from_utf8(&self.pending) {
            Ok(text) => text.len(),
            Err(e) if e.error_len().is_none() => e.valid_up_to(),
            Err(e) => return Err(io::Error::new(io::ErrorKind::InvalidData, e)),
        };

        let rest = self.pending.split_off(complete);
        let chunk = std::mem::replace(&mut self.pending, rest);
        let text =
            String::from_utf8(chunk).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.encode(&text, false)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
