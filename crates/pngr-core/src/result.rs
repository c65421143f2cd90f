/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Decoding results for images
//!
//! The decoder stores samples of depth 8 and below in `u8` and
//! 16 bit samples in `u16`, this enum lets a caller handle both.

/// A simple enum that can hold decode
/// results of most images
#[non_exhaustive]
pub enum DecodingResult {
    U8(Vec<u8>),
    U16(Vec<u16>)
}

impl DecodingResult {
    /// Return the contents if the enum stores `Vec<u8>` or otherwise
    /// return `None`.
    pub fn u8(self) -> Option<Vec<u8>> {
        match self {
            DecodingResult::U8(data) => Some(data),
            _ => None
        }
    }

    /// Return the contents if the enum stores `Vec<u16>` or otherwise
    /// return `None`.
    pub fn u16(self) -> Option<Vec<u16>> {
        match self {
            DecodingResult::U16(data) => Some(data),
            _ => None
        }
    }

    /// Number of samples held
    pub fn len(&self) -> usize {
        match self {
            DecodingResult::U8(data) => data.len(),
            DecodingResult::U16(data) => data.len()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
