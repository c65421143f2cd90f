/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::io::{BufReader, Cursor, Read, Seek, SeekFrom};

use crate::bytestream::{ByteIoError, ByteSeekFrom, ByteSourceTrait};

/// Restore `position` if `result` failed, so a failed read never moves the cursor
fn restore_on_error<S: Seek, R>(
    source: &mut S, position: u64, result: std::io::Result<R>
) -> Result<R, ByteIoError> {
    match result {
        Ok(value) => Ok(value),
        Err(e) => {
            source.seek(SeekFrom::Start(position))?;
            Err(ByteIoError::from(e))
        }
    }
}

macro_rules! impl_std_source {
    ($ty:ty, [$($bounds:tt)*]) => {
        impl<$($bounds)*> ByteSourceTrait for $ty {
            fn read_exact_bytes(&mut self, buf: &mut [u8]) -> Result<(), ByteIoError> {
                let start = self.stream_position()?;
                let result = self.read_exact(buf);
                restore_on_error(self, start, result)
            }

            fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, ByteIoError> {
                self.read(buf).map_err(ByteIoError::from)
            }

            fn peek_exact_bytes(&mut self, buf: &mut [u8]) -> Result<(), ByteIoError> {
                let start = self.stream_position()?;
                let result = self.read_exact(buf);
                restore_on_error(self, start, result)?;
                self.seek(SeekFrom::Start(start))?;
                Ok(())
            }

            fn z_seek(&mut self, from: ByteSeekFrom) -> Result<u64, ByteIoError> {
                self.seek(from.to_std_seek()).map_err(ByteIoError::from)
            }

            fn z_position(&mut self) -> Result<u64, ByteIoError> {
                self.stream_position().map_err(ByteIoError::from)
            }

            fn z_size(&mut self) -> Result<u64, ByteIoError> {
                let old_pos = self.stream_position()?;
                let len = self.seek(SeekFrom::End(0))?;

                // Avoid seeking a third time when we were already at the end of the
                // stream. The branch is usually way cheaper than a seek operation.
                if old_pos != len {
                    self.seek(SeekFrom::Start(old_pos))?;
                }
                Ok(len)
            }
        }
    };
}

impl_std_source!(Cursor<T>, [T: AsRef<[u8]>]);
impl_std_source!(BufReader<T>, [T: Read + Seek]);
