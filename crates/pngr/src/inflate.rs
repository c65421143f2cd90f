/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! IDAT aggregation and streaming decompression
//!
//! The payloads of consecutive IDAT chunks form one zlib stream. They are
//! pulled from the chunk stream only when the decompressor asks for more
//! input, so neither the compressed nor the decompressed image is ever
//! held in memory as a whole.
use std::io::Read;

use flate2::read::ZlibDecoder;
use log::{trace, warn};
use pngr_core::bytestream::ByteSourceTrait;

use crate::constants::MIN_CHUNK_SIZE;
use crate::error::FormatError;
use crate::registry::{Chunk, ChunkStream};

/// A pull based producer of decompressed bytes
pub trait DecompressedSource {
    /// Fill `buf` with the next bytes of the stream, returning how many
    /// were written. Zero means the stream has ended.
    fn read_decompressed(&mut self, buf: &mut [u8]) -> Result<usize, FormatError>;
}

impl DecompressedSource for &[u8] {
    fn read_decompressed(&mut self, buf: &mut [u8]) -> Result<usize, FormatError> {
        let n = buf.len().min(self.len());
        let (head, tail) = self.split_at(n);

        buf[..n].copy_from_slice(head);
        *self = tail;

        Ok(n)
    }
}

/// Presents the IDAT payloads of a chunk stream as one continuous reader
///
/// Errors from the chunk stream are kept here, the decompressor only
/// sees an opaque I/O failure and the stage above picks the real error up.
pub struct IdatReader<'a, T: ByteSourceTrait> {
    stream:   &'a mut ChunkStream<T>,
    current:  Vec<u8>,
    position: usize,
    finished: bool,
    error:    Option<FormatError>
}

impl<'a, T: ByteSourceTrait> IdatReader<'a, T> {
    /// `first` is the payload of the first IDAT chunk, which was consumed
    /// while looking for the end of the headers
    pub(crate) fn new(stream: &'a mut ChunkStream<T>, first: Vec<u8>) -> IdatReader<'a, T> {
        IdatReader {
            stream,
            current: first,
            position: 0,
            finished: false,
            error: None
        }
    }

    fn take_error(&mut self) -> Option<FormatError> {
        self.error.take()
    }

    /// Move to the next IDAT payload, returns false once the sequence is over
    fn advance(&mut self) -> Result<bool, FormatError> {
        loop {
            match self.stream.next_chunk()? {
                Some(Chunk::Idat(data)) => {
                    trace!("Next IDAT, {} bytes", data.len());
                    self.current = data;
                    self.position = 0;
                    return Ok(true);
                }
                Some(Chunk::Iend) | None => {
                    self.finished = true;
                    return Ok(false);
                }
                // anything else was already rejected by the ordering rules
                Some(_) => continue
            }
        }
    }

    /// Consume the remaining chunks up to and including IEND
    fn finish(mut self, strict: bool) -> Result<(), FormatError> {
        let mut trailing = self.current.len() - self.position;

        while !self.finished {
            if self.advance()? {
                trailing += self.current.len();
            }
        }
        if trailing > 0 {
            warn!(
                "{} bytes of compressed data after the end of the zlib stream, ignoring",
                trailing
            );
        }
        if !self.stream.seen_iend() {
            if strict {
                return Err(FormatError::Truncated {
                    what:     "IEND chunk",
                    offset:   self.stream.position(),
                    expected: MIN_CHUNK_SIZE as u64,
                    found:    0
                });
            }
            warn!("Stream ended without an IEND chunk");
            return Ok(());
        }
        // nothing may follow IEND, the ordering rules raise the error
        self.stream.next_chunk()?;

        Ok(())
    }
}

impl<'a, T: ByteSourceTrait> Read for IdatReader<'a, T> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        while self.position == self.current.len() {
            if self.finished {
                return Ok(0);
            }
            match self.advance() {
                Ok(true) => (),
                Ok(false) => return Ok(0),
                Err(e) => {
                    let message = format!("{e}");
                    self.error = Some(e);
                    return Err(std::io::Error::new(std::io::ErrorKind::Other, message));
                }
            }
        }
        let remaining = &self.current[self.position..];
        let n = remaining.len().min(buf.len());

        buf[..n].copy_from_slice(&remaining[..n]);
        self.position += n;

        Ok(n)
    }
}

/// Streaming zlib decompressor over the IDAT sequence
pub struct InflateStage<'a, T: ByteSourceTrait> {
    decoder:  ZlibDecoder<IdatReader<'a, T>>,
    produced: usize,
    limit:    usize
}

impl<'a, T: ByteSourceTrait> InflateStage<'a, T> {
    /// Create a stage that fails once more than `limit` bytes come out
    pub fn new(reader: IdatReader<'a, T>, limit: usize) -> InflateStage<'a, T> {
        InflateStage {
            decoder: ZlibDecoder::new(reader),
            produced: 0,
            limit
        }
    }

    /// Number of decompressed bytes handed out so far
    pub const fn produced(&self) -> usize {
        self.produced
    }

    fn map_error(&mut self, err: std::io::Error) -> FormatError {
        // a failure of the chunk stream takes precedence over what zlib made of it
        match self.decoder.get_mut().take_error() {
            Some(e) => e,
            None => FormatError::DecompressionFailed(err.to_string())
        }
    }

    /// Drain the zlib stream and the chunks behind it
    ///
    /// Decompressed bytes past what the image needs and compressed bytes
    /// past the end of the zlib stream are tolerated with a warning. A
    /// chunk after IEND is an error, and in strict mode so is a missing IEND.
    pub fn finish(mut self, strict: bool) -> Result<(), FormatError> {
        let mut scratch = [0_u8; 1024];
        let mut extra = 0;

        loop {
            let read = self.read_decompressed(&mut scratch)?;
            if read == 0 {
                break;
            }
            extra += read;
        }
        if extra > 0 {
            warn!("{} bytes of decompressed data after the last scanline, ignoring", extra);
        }
        self.decoder.into_inner().finish(strict)
    }
}

impl<'a, T: ByteSourceTrait> DecompressedSource for InflateStage<'a, T> {
    fn read_decompressed(&mut self, buf: &mut [u8]) -> Result<usize, FormatError> {
        let read = match self.decoder.read(buf) {
            Ok(read) => read,
            Err(e) => return Err(self.map_error(e))
        };
        self.produced += read;

        if self.produced > self.limit {
            return Err(FormatError::LimitExceeded {
                what:  "decompressed bytes",
                limit: self.limit,
                found: self.produced
            });
        }
        Ok(read)
    }
}
