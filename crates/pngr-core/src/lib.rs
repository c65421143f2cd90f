/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Core routines shared by the pngr decoder and its tools
//!
//! This crate provides
//!
//! - A seekable byte source abstraction with big endian aware reads
//! - Decoder options shared by every stage of the decoding pipeline
//! - Colorspace information of decoded images
//! - A simple enum type to hold image decoding results.
//!
//! # Features
//!  - `serde`: Enables serializing of some of the data structures
//!     present in the crate
//!
pub mod bytestream;
pub mod colorspace;
pub mod options;
pub mod result;
#[cfg(feature = "serde")]
mod serde;
