/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Errors possible during decoding
use core::fmt::{Debug, Display, Formatter};

use pngr_core::bytestream::ByteIoError;

use crate::chunk::ChunkType;

/// Possible errors that may occur during decoding
///
/// All of them are fatal to the decode that raised them, the input
/// is a fixed byte stream so retrying cannot give a different answer.
pub enum FormatError {
    /// The first eight bytes are not the png signature
    ///
    /// Carries the bytes that were found instead, fewer than eight
    /// if the input was that short.
    BadSignature(Vec<u8>),
    /// The input ended before a structure was complete
    Truncated {
        /// What was being read
        what:     &'static str,
        /// Offset of the structure, in the file for chunks and in the
        /// decompressed stream for scanlines
        offset:   u64,
        expected: u64,
        found:    u64
    },
    /// Stored chunk crc does not match the computed one
    CrcMismatch {
        chunk:    ChunkType,
        offset:   u64,
        stored:   u32,
        computed: u32
    },
    /// IHDR contents are invalid
    InvalidHeader(String),
    /// A chunk declares a length larger than 2^31-1
    InvalidChunkLength { offset: u64, length: u32 },
    /// A chunk marked critical that this decoder does not understand
    UnsupportedCriticalChunk { chunk: ChunkType, offset: u64 },
    /// Chunks appear in an order the format forbids
    ChunkOrderViolation {
        chunk:  ChunkType,
        offset: u64,
        reason: &'static str
    },
    /// Palette is missing, forbidden or malformed
    InvalidPalette(String),
    /// The zlib stream of the image data is corrupt
    DecompressionFailed(String),
    /// A scanline starts with a filter byte outside 0..=4
    InvalidFilterType {
        filter: u8,
        /// Adam7 pass number (1-7), `None` for non interlaced images
        pass:   Option<u8>,
        row:    usize
    },
    /// The request cannot be carried out by this decoder
    UnsupportedFeature(&'static str),
    /// A configured limit was exceeded
    LimitExceeded {
        what:  &'static str,
        limit: usize,
        found: usize
    },
    /// The byte source failed for reasons other than running out of bytes
    Io(ByteIoError)
}

impl Debug for FormatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::BadSignature(found) => {
                writeln!(f, "Bad PNG signature, not a png, found {found:02X?}")
            }
            Self::Truncated {
                what,
                offset,
                expected,
                found
            } => writeln!(
                f,
                "Truncated {what} at offset {offset}, expected {expected} bytes but only {found} remain"
            ),
            Self::CrcMismatch {
                chunk,
                offset,
                stored,
                computed
            } => writeln!(
                f,
                "CRC mismatch in chunk {chunk} at offset {offset}, stored {stored:#010X} but computed {computed:#010X}"
            ),
            Self::InvalidHeader(reason) => writeln!(f, "Invalid IHDR: {reason}"),
            Self::InvalidChunkLength { offset, length } => writeln!(
                f,
                "Chunk at offset {offset} declares length {length}, larger than {}",
                i32::MAX
            ),
            Self::UnsupportedCriticalChunk { chunk, offset } => {
                writeln!(f, "Marker {chunk} at offset {offset} unknown but deemed necessary")
            }
            Self::ChunkOrderViolation {
                chunk,
                offset,
                reason
            } => writeln!(f, "Chunk {chunk} at offset {offset} out of order: {reason}"),
            Self::InvalidPalette(reason) => writeln!(f, "Invalid palette: {reason}"),
            Self::DecompressionFailed(reason) => {
                writeln!(f, "Could not decompress image data: {reason}")
            }
            Self::InvalidFilterType { filter, pass, row } => match pass {
                Some(pass) => writeln!(f, "Unknown filter {filter} in row {row} of pass {pass}"),
                None => writeln!(f, "Unknown filter {filter} in row {row}")
            },
            Self::UnsupportedFeature(feature) => writeln!(f, "Unsupported: {feature}"),
            Self::LimitExceeded { what, limit, found } => writeln!(
                f,
                "{what} {found} larger than maximum configured {limit}, aborting"
            ),
            Self::Io(err) => writeln!(f, "I/O error {:?}", err)
        }
    }
}

impl Display for FormatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for FormatError {}

impl From<ByteIoError> for FormatError {
    fn from(value: ByteIoError) -> Self {
        FormatError::Io(value)
    }
}
