/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use core::fmt::{Debug, Display, Formatter};

use crate::bytestream::ByteSourceTrait;

pub(crate) mod cursor;
mod std_readers;

/// Enumeration of possible methods to seek within a byte source.
///
/// It is analogous to the [SeekFrom](std::io::SeekFrom) in the std library
#[derive(Copy, PartialEq, Eq, Clone, Debug)]
pub enum ByteSeekFrom {
    /// Sets the offset to the provided number of bytes.
    Start(u64),
    /// Sets the offset to the size of this object plus the specified number of
    /// bytes.
    End(i64),
    /// Sets the offset to the current position plus the specified number of
    /// bytes.
    ///
    /// It's an error to seek before byte 0.
    Current(i64)
}

impl ByteSeekFrom {
    pub(crate) fn to_std_seek(self) -> std::io::SeekFrom {
        match self {
            ByteSeekFrom::Start(pos) => std::io::SeekFrom::Start(pos),
            ByteSeekFrom::End(pos) => std::io::SeekFrom::End(pos),
            ByteSeekFrom::Current(pos) => std::io::SeekFrom::Current(pos)
        }
    }
}

/// Errors raised by byte sources
pub enum ByteIoError {
    StdIoError(std::io::Error),
    TryFromIntError(core::num::TryFromIntError),
    /// requested, read
    NotEnoughBytes(usize, usize),
    Generic(&'static str),
    SeekError(&'static str)
}

impl ByteIoError {
    /// Return true if this error means the source ran out of bytes
    ///
    /// The png decoder reports these as truncation of the file rather
    /// than as a generic I/O failure.
    pub fn is_eof(&self) -> bool {
        match self {
            ByteIoError::NotEnoughBytes(..) => true,
            ByteIoError::StdIoError(err) => err.kind() == std::io::ErrorKind::UnexpectedEof,
            _ => false
        }
    }
}

impl Debug for ByteIoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            ByteIoError::StdIoError(err) => {
                writeln!(f, "Underlying I/O error {}", err)
            }
            ByteIoError::TryFromIntError(err) => {
                writeln!(f, "Cannot convert to int {}", err)
            }
            ByteIoError::NotEnoughBytes(expected, found) => {
                writeln!(f, "Not enough bytes, expected {expected} but found {found}")
            }
            ByteIoError::Generic(err) => {
                writeln!(f, "Generic I/O error: {err}")
            }
            ByteIoError::SeekError(err) => {
                writeln!(f, "Seek error: {err}")
            }
        }
    }
}

impl Display for ByteIoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for ByteIoError {}

impl From<std::io::Error> for ByteIoError {
    fn from(value: std::io::Error) -> Self {
        ByteIoError::StdIoError(value)
    }
}

impl From<core::num::TryFromIntError> for ByteIoError {
    fn from(value: core::num::TryFromIntError) -> Self {
        ByteIoError::TryFromIntError(value)
    }
}

impl From<&'static str> for ByteIoError {
    fn from(value: &'static str) -> Self {
        ByteIoError::Generic(value)
    }
}

/// A big endian aware reader over any [`ByteSourceTrait`]
pub struct ByteReader<T: ByteSourceTrait> {
    inner:       T,
    temp_buffer: Vec<u8>
}

impl<T: ByteSourceTrait> ByteReader<T> {
    pub fn new(source: T) -> ByteReader<T> {
        ByteReader {
            inner:       source,
            temp_buffer: vec![]
        }
    }
    /// Destroy this reader returning
    /// the underlying source of the bytes
    /// from which we were decoding
    #[inline(always)]
    pub fn consume(self) -> T {
        self.inner
    }

    #[inline(always)]
    pub fn skip(&mut self, num: usize) -> Result<u64, ByteIoError> {
        self.inner.z_seek(ByteSeekFrom::Current(i64::try_from(num)?))
    }

    #[inline(always)]
    pub fn seek(&mut self, from: ByteSeekFrom) -> Result<u64, ByteIoError> {
        self.inner.z_seek(from)
    }

    #[inline]
    pub fn get_u32_be_err(&mut self) -> Result<u32, ByteIoError> {
        Ok(u32::from_be_bytes(self.read_fixed_bytes_or_error::<4>()?))
    }

    /// Look ahead position bytes and return a reference
    /// to num_bytes from that position, or an error if the
    /// peek would be out of bounds.
    ///
    /// This doesn't increment the position, even on failure.
    pub fn peek_at(&mut self, position: usize, num_bytes: usize) -> Result<&[u8], ByteIoError> {
        let start = self.position()?;

        // short circuit for zero
        // important since implementations like File will
        // cause a syscall on skip
        if position != 0 {
            self.skip(position)?;
        }
        self.temp_buffer.resize(num_bytes, 0);

        let result = self.inner.peek_exact_bytes(&mut self.temp_buffer[..]);

        if position != 0 {
            self.set_position(start)?;
        }
        result?;

        Ok(&self.temp_buffer)
    }

    #[inline(always)]
    pub fn read_fixed_bytes_or_error<const N: usize>(&mut self) -> Result<[u8; N], ByteIoError> {
        let mut byte_store: [u8; N] = [0; N];
        self.inner.read_exact_bytes(&mut byte_store)?;
        Ok(byte_store)
    }

    #[inline]
    pub fn set_position(&mut self, position: u64) -> Result<(), ByteIoError> {
        self.seek(ByteSeekFrom::Start(position))?;

        Ok(())
    }

    #[inline(always)]
    pub fn position(&mut self) -> Result<u64, ByteIoError> {
        self.inner.z_position()
    }

    /// Number of bytes between the current position and the end of the source
    pub fn remaining(&mut self) -> Result<u64, ByteIoError> {
        let size = self.inner.z_size()?;
        let position = self.inner.z_position()?;

        Ok(size.saturating_sub(position))
    }

    pub fn read_exact_bytes(&mut self, buf: &mut [u8]) -> Result<(), ByteIoError> {
        self.inner.read_exact_bytes(buf)
    }

    pub fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, ByteIoError> {
        self.inner.read_bytes(buf)
    }
}
