/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use crate::bytestream::{ByteIoError, ByteSeekFrom, ByteSourceTrait};

/// An in memory byte source
///
/// Wraps anything that can be viewed as a byte slice and keeps
/// a single position into it.
pub struct ByteCursor<T: AsRef<[u8]>> {
    stream:   T,
    position: usize
}

impl<T: AsRef<[u8]>> ByteCursor<T> {
    pub fn new(buffer: T) -> ByteCursor<T> {
        ByteCursor {
            stream:   buffer,
            position: 0
        }
    }

    /// Return the wrapped buffer
    pub fn into_inner(self) -> T {
        self.stream
    }

    #[inline]
    fn len(&self) -> usize {
        self.stream.as_ref().len()
    }
}

impl<T: AsRef<[u8]>> ByteSourceTrait for ByteCursor<T> {
    #[inline(always)]
    fn read_exact_bytes(&mut self, buf: &mut [u8]) -> Result<(), ByteIoError> {
        self.peek_exact_bytes(buf)?;
        self.position += buf.len();
        Ok(())
    }

    #[inline(always)]
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, ByteIoError> {
        let start = self.position.min(self.len());
        let end = self.position.saturating_add(buf.len()).min(self.len());

        let slice = &self.stream.as_ref()[start..end];
        buf[..slice.len()].copy_from_slice(slice);

        self.position = end;

        Ok(end - start)
    }

    #[inline(always)]
    fn peek_exact_bytes(&mut self, buf: &mut [u8]) -> Result<(), ByteIoError> {
        let start = self.position.min(self.len());
        let available = self.len() - start;

        if available < buf.len() {
            // position stays where it was
            return Err(ByteIoError::NotEnoughBytes(buf.len(), available));
        }
        buf.copy_from_slice(&self.stream.as_ref()[start..start + buf.len()]);

        Ok(())
    }

    #[inline(always)]
    fn z_seek(&mut self, from: ByteSeekFrom) -> Result<u64, ByteIoError> {
        let new_position = match from {
            ByteSeekFrom::Start(position) => i64::try_from(position)?,
            ByteSeekFrom::End(position) => i64::try_from(self.len())? + position,
            ByteSeekFrom::Current(position) => i64::try_from(self.position)? + position
        };
        if new_position < 0 {
            return Err(ByteIoError::SeekError("Cannot seek before the start of the stream"));
        }
        self.position = usize::try_from(new_position)?;

        Ok(self.position as u64)
    }

    #[inline(always)]
    fn z_position(&mut self) -> Result<u64, ByteIoError> {
        Ok(self.position as u64)
    }

    #[inline(always)]
    fn z_size(&mut self) -> Result<u64, ByteIoError> {
        Ok(self.len() as u64)
    }
}
