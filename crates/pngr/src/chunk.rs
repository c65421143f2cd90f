/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Chunk framing
//!
//! Splits a png byte stream into `length - type - data - crc` records,
//! verifying the signature once and the crc of every record.
use core::fmt::{Debug, Display, Formatter};

use log::{trace, warn};
use pngr_core::bytestream::{ByteIoError, ByteReader, ByteSourceTrait};
use pngr_core::options::DecoderOptions;

use crate::constants::{MAX_CHUNK_LENGTH, MIN_CHUNK_SIZE, PNG_SIGNATURE};
use crate::error::FormatError;

/// A four byte chunk tag
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct ChunkType(pub [u8; 4]);

impl ChunkType {
    pub const IHDR: ChunkType = ChunkType(*b"IHDR");
    pub const PLTE: ChunkType = ChunkType(*b"PLTE");
    pub const IDAT: ChunkType = ChunkType(*b"IDAT");
    pub const IEND: ChunkType = ChunkType(*b"IEND");

    /// Critical chunks have bit 5 of the first byte clear (uppercase letter)
    pub const fn is_critical(self) -> bool {
        self.0[0] & (1 << 5) == 0
    }

    pub const fn is_public(self) -> bool {
        self.0[1] & (1 << 5) == 0
    }

    pub const fn is_safe_to_copy(self) -> bool {
        self.0[3] & (1 << 5) != 0
    }

    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl Display for ChunkType {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        for byte in self.0 {
            if byte.is_ascii_alphabetic() {
                write!(f, "{}", char::from(byte))?;
            } else {
                write!(f, "\\x{byte:02x}")?;
            }
        }
        Ok(())
    }
}

impl Debug for ChunkType {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "ChunkType({self})")
    }
}

/// Summary of a framed chunk, kept for inspection after the data is gone
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ChunkInfo {
    /// Offset of the length field from the start of the file
    pub offset:     u64,
    pub chunk_type: ChunkType,
    pub length:     u32,
    pub crc:        u32
}

/// A framed chunk
///
/// Created once per record and never modified, whoever consumes it
/// next owns it.
#[derive(Clone, Debug)]
pub struct RawChunk {
    offset:     u64,
    chunk_type: ChunkType,
    data:       Vec<u8>,
    crc:        u32
}

impl RawChunk {
    pub fn new(offset: u64, chunk_type: ChunkType, data: Vec<u8>, crc: u32) -> RawChunk {
        RawChunk {
            offset,
            chunk_type,
            data,
            crc
        }
    }

    pub const fn offset(&self) -> u64 {
        self.offset
    }

    pub const fn chunk_type(&self) -> ChunkType {
        self.chunk_type
    }

    /// Length of the data field, always at most 2^31-1
    pub fn length(&self) -> u32 {
        self.data.len() as u32
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Stored crc, as read from the stream
    pub const fn crc(&self) -> u32 {
        self.crc
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Crc of the type and data fields
    pub fn computed_crc(&self) -> u32 {
        chunk_crc(self.chunk_type, &self.data)
    }

    pub fn info(&self) -> ChunkInfo {
        ChunkInfo {
            offset:     self.offset,
            chunk_type: self.chunk_type,
            length:     self.length(),
            crc:        self.crc
        }
    }
}

pub(crate) fn chunk_crc(chunk_type: ChunkType, data: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type.as_bytes());
    hasher.update(data);
    hasher.finalize()
}

/// Byte layout of one chunk, relative to the start of the file
#[derive(Copy, Clone, Debug)]
struct ChunkLayout {
    start:     u64,
    data_end:  u64,
    chunk_end: u64
}

impl ChunkLayout {
    const fn new(start: u64, length: u32) -> ChunkLayout {
        let data_end = start + 8 + length as u64;
        ChunkLayout {
            start,
            data_end,
            chunk_end: data_end + 4
        }
    }
}

/// Reads chunks from a byte source
///
/// The reader owns a single cursor, `position`, which only moves after
/// a complete chunk has been framed and checked. A failed read puts the
/// source back at that position.
pub struct ChunkReader<T: ByteSourceTrait> {
    stream:   ByteReader<T>,
    options:  DecoderOptions,
    position: u64,
    size:     u64,
    failed:   bool
}

impl<T: ByteSourceTrait> ChunkReader<T> {
    /// Create a reader with default options and verify the png signature
    pub fn new(source: T) -> Result<ChunkReader<T>, FormatError> {
        ChunkReader::new_with_options(source, DecoderOptions::default())
    }

    /// Create a reader, the source must be positioned at the start of the file
    pub fn new_with_options(
        source: T, options: DecoderOptions
    ) -> Result<ChunkReader<T>, FormatError> {
        let mut stream = ByteReader::new(source);
        let start = stream.position()?;
        let size = stream.remaining()? + start;

        let mut signature = [0_u8; 8];
        let mut filled = 0;

        while filled < signature.len() {
            let read = stream.read_bytes(&mut signature[filled..])?;
            if read == 0 {
                break;
            }
            filled += read;
        }
        if filled != signature.len() || signature != PNG_SIGNATURE {
            return Err(FormatError::BadSignature(signature[..filled].to_vec()));
        }

        Ok(ChunkReader {
            stream,
            options,
            position: start + 8,
            size,
            failed: false
        })
    }

    /// Offset at which the next chunk starts
    pub const fn position(&self) -> u64 {
        self.position
    }

    /// Return true if at least an empty chunk worth of bytes remain
    ///
    /// This is a lookahead only, the cursor is where it was before the call.
    pub fn has_more(&mut self) -> Result<bool, FormatError> {
        match self.stream.peek_at(0, MIN_CHUNK_SIZE) {
            Ok(_) => Ok(true),
            Err(e) if e.is_eof() => Ok(false),
            Err(e) => Err(e.into())
        }
    }

    /// Return true once no bytes follow the last framed chunk
    ///
    /// Unlike [`has_more`](Self::has_more) a partial chunk at the end of the
    /// source still counts, framing it reports the truncation.
    pub const fn is_exhausted(&self) -> bool {
        self.position >= self.size
    }

    /// Frame the next chunk
    pub fn next_chunk(&mut self) -> Result<RawChunk, FormatError> {
        let start = self.position;

        match self.read_chunk(start) {
            Ok((chunk, layout)) => {
                self.position = layout.chunk_end;
                Ok(chunk)
            }
            Err(e) => {
                // leave the source where the failed chunk began
                if let Err(seek) = self.stream.set_position(start) {
                    warn!("Could not rewind to chunk start {}: {}", start, seek);
                }
                Err(e)
            }
        }
    }

    fn truncated(&self, what: &'static str, offset: u64, expected: u64) -> FormatError {
        FormatError::Truncated {
            what,
            offset,
            expected,
            found: self.size.saturating_sub(offset)
        }
    }

    fn map_io(&self, err: ByteIoError, what: &'static str, offset: u64, expected: u64) -> FormatError {
        if err.is_eof() {
            self.truncated(what, offset, expected)
        } else {
            FormatError::Io(err)
        }
    }

    fn read_chunk(&mut self, start: u64) -> Result<(RawChunk, ChunkLayout), FormatError> {
        let header = self
            .stream
            .read_fixed_bytes_or_error::<8>()
            .map_err(|e| self.map_io(e, "chunk header", start, MIN_CHUNK_SIZE as u64))?;

        let length = u32::from_be_bytes([header[0], header[1], header[2], header[3]]);
        let chunk_type = ChunkType([header[4], header[5], header[6], header[7]]);

        if length > MAX_CHUNK_LENGTH {
            return Err(FormatError::InvalidChunkLength {
                offset: start,
                length
            });
        }
        let layout = ChunkLayout::new(start, length);

        // check before allocating, a corrupt length must not reserve gigabytes
        if layout.chunk_end > self.size {
            return Err(FormatError::Truncated {
                what:     "chunk",
                offset:   start,
                expected: layout.chunk_end - layout.start,
                found:    self.size.saturating_sub(layout.start)
            });
        }
        let mut data = vec![0_u8; length as usize];

        self.stream
            .read_exact_bytes(&mut data)
            .map_err(|e| self.map_io(e, "chunk data", start, layout.chunk_end - start))?;

        let crc = self
            .stream
            .get_u32_be_err()
            .map_err(|e| self.map_io(e, "chunk crc", layout.data_end, 4))?;

        trace!("Chunk {} at offset {}, length {}", chunk_type, start, length);

        let chunk = RawChunk::new(start, chunk_type, data, crc);

        if self.options.get_confirm_crc() {
            let computed = chunk.computed_crc();

            if computed != crc {
                return Err(FormatError::CrcMismatch {
                    chunk: chunk_type,
                    offset: start,
                    stored: crc,
                    computed
                });
            }
        }
        Ok((chunk, layout))
    }

    /// Destroy this reader returning the underlying source
    pub fn into_inner(self) -> T {
        self.stream.consume()
    }
}

/// Iterating yields chunks until the source is exhausted or an error occurs,
/// the error is yielded once and iteration stops.
impl<T: ByteSourceTrait> Iterator for ChunkReader<T> {
    type Item = Result<RawChunk, FormatError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        if self.is_exhausted() {
            return None;
        }
        let result = self.next_chunk();
        self.failed = result.is_err();

        Some(result)
    }
}
