/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Traits for reading png byte streams
//!
//! This exposes the trait implemented for every input the decoder
//! can consume.

use crate::bytestream::reader::{ByteIoError, ByteSeekFrom};

/// The Input trait implemented for byte sources.
///
/// This is the minimal contract the chunk framer relies on: sequential
/// reads and the ability to go back to an earlier position.
///
/// # Considerations
///
/// If you have an in memory buffer, prefer [`ByteCursor`](crate::bytestream::ByteCursor) over
/// [`Cursor`](std::io::Cursor), the latter goes through `std::io` for every read.
pub trait ByteSourceTrait {
    /// Read exact bytes required to fill `buf` or return an error if that isn't possible
    ///
    /// ## Errors
    /// In case of an error, the implementation should not increment the internal position
    fn read_exact_bytes(&mut self, buf: &mut [u8]) -> Result<(), ByteIoError>;

    /// Read bytes into `buf` returning how many bytes were read
    ///
    /// This doesn't guarantee that buf will be filled with bytes, for such a guarantee see
    /// [`read_exact_bytes`](Self::read_exact_bytes)
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, ByteIoError>;

    /// Fill `buf` without advancing the read position.
    ///
    /// Fails if `buf` cannot be filled completely, in which case the position
    /// is also left untouched.
    fn peek_exact_bytes(&mut self, buf: &mut [u8]) -> Result<(), ByteIoError>;

    /// Seek into a new position from the buffer
    ///
    /// This is similar to the [seek](std::io::Seek::seek) function in the [Seek](std::io::Seek) trait
    fn z_seek(&mut self, from: ByteSeekFrom) -> Result<u64, ByteIoError>;

    /// Return the current position of the inner cursor.
    fn z_position(&mut self) -> Result<u64, ByteIoError>;

    /// Return the total size of the underlying source in bytes
    ///
    /// For files this may cost extra seeks, callers should cache it.
    fn z_size(&mut self) -> Result<u64, ByteIoError>;
}
