/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Decoder options
//!
//! This module exposes a struct through which every stage of the png
//! decoding pipeline gets its configuration.

/// Decoder options
///
/// Options are set through builder style `set_*` methods and read
/// back with the matching `get_*` methods.
#[derive(Debug, Copy, Clone)]
pub struct DecoderOptions {
    /// Maximum width for which decoders will
    /// not try to decode images larger than
    /// the specified width.
    ///
    /// - Default value: 16384
    max_width:     usize,
    /// Maximum height for which decoders will not
    /// try to decode images larger than the
    /// specified height
    ///
    /// - Default value: 16384
    max_height:    usize,
    /// Whether the chunk framer should compare the stored
    /// crc against the computed one
    ///
    /// - Default value: true
    confirm_crc:   bool,
    /// Reject irregular but recoverable streams instead of
    /// logging a warning
    ///
    /// - Default value: false
    strict_mode:   bool,
    /// Maximum number of bytes the inflate stage may produce
    ///
    /// - Default value: 1 GiB
    deflate_limit: usize
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            max_width:     1 << 14,
            max_height:    1 << 14,
            confirm_crc:   true,
            strict_mode:   false,
            deflate_limit: 1 << 30
        }
    }
}

/// Initializers
impl DecoderOptions {
    /// Create options where every check is enabled
    ///
    /// This is the same as `default` with strict mode turned on
    pub fn new_strict() -> DecoderOptions {
        DecoderOptions::default().set_strict_mode(true)
    }

    /// Create the decoder options used by the command line tool
    ///
    /// - Dimension limits are lifted, a file on disk is trusted to the
    ///   extent the user asked for it to be decoded.
    pub fn new_cmd() -> DecoderOptions {
        DecoderOptions::default()
            .set_max_width(usize::MAX)
            .set_max_height(usize::MAX)
            .set_deflate_limit(usize::MAX)
    }
}

impl DecoderOptions {
    /// Get maximum width configured for which the decoder
    /// should not try to decode images greater than this width
    pub const fn get_max_width(&self) -> usize {
        self.max_width
    }

    /// Get maximum height configured for which the decoder should
    /// not try to decode images greater than this height
    pub const fn get_max_height(&self) -> usize {
        self.max_height
    }

    /// Return true if chunk checksums should be verified
    pub const fn get_confirm_crc(&self) -> bool {
        self.confirm_crc
    }

    /// Return true whether the decoder should be in strict mode
    pub const fn get_strict_mode(&self) -> bool {
        self.strict_mode
    }

    /// Maximum number of decompressed bytes
    pub const fn get_deflate_limit(&self) -> usize {
        self.deflate_limit
    }

    /// Set maximum width for which the decoder should not try
    /// decoding images greater than that width
    pub fn set_max_width(mut self, width: usize) -> Self {
        self.max_width = width;
        self
    }

    /// Set maximum height for which the decoder should not try
    /// decoding images greater than that height
    pub fn set_max_height(mut self, height: usize) -> Self {
        self.max_height = height;
        self
    }

    /// Set whether chunk crcs are verified.
    ///
    /// Turning this off lets a damaged file be inspected, the framing
    /// itself is still validated.
    pub fn set_confirm_crc(mut self, yes: bool) -> Self {
        self.confirm_crc = yes;
        self
    }

    /// Set whether the decoder should be in standards conforming/
    /// strict mode
    pub fn set_strict_mode(mut self, yes: bool) -> Self {
        self.strict_mode = yes;
        self
    }

    /// Set the maximum size the decompressed image data may reach
    pub fn set_deflate_limit(mut self, limit: usize) -> Self {
        self.deflate_limit = limit;
        self
    }
}
