/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A streaming png decoder
//!
//! This crate reads the structure of ISO/IEC 15948:2003 (E) png images,
//! from the chunk framing down to reconstructed pixels.
//!
//! # Features
//! - Crc checked chunk framing over any seekable byte source
//! - Strict chunk ordering rules, with unknown ancillary chunks kept aside
//! - Streaming decompression, the image data is never buffered whole
//! - Non interlaced and Adam7 interlaced images, every bit depth and color type
//!
//! # Usage
//!
//! #### Decode to raw bytes.
//!
//! This returns a [`PixelBuffer`] holding one byte per sample for bit depths
//! up to 8 and a big endian byte pair per sample for 16 bit images.
//!
//!```no_run
//! use pngr::PngDecoder;
//! use pngr_core::bytestream::ByteCursor;
//!
//! let data = std::fs::read("image.png").unwrap();
//! let mut decoder = PngDecoder::new(ByteCursor::new(data));
//!
//! let pixels = decoder.decode_raw().unwrap();
//! ```
//!
//! # Decode to u8 or u16 depending on depth
//!
//!```no_run
//! use pngr::PngDecoder;
//! use pngr_core::bytestream::ByteCursor;
//! use pngr_core::result::DecodingResult;
//!
//! let mut decoder = PngDecoder::new(ByteCursor::new(std::fs::read("image.png").unwrap()));
//!
//! match decoder.decode().unwrap() {
//!    DecodingResult::U8(px) => {
//!        // images with depths of 1 to 8 bits
//!    }
//!    DecodingResult::U16(px) => {
//!        // 16 bit images
//!    }
//!    _ => unreachable!(),
//! }
//!```
//!
//! # Streaming scanlines
//!
//! [`PngDecoder::scanlines`] yields unfiltered scanlines one at a time,
//! keeping only the previous scanline in memory.
//!
//!```no_run
//! use pngr::PngDecoder;
//! use pngr_core::bytestream::ByteCursor;
//!
//! let mut decoder = PngDecoder::new(ByteCursor::new(std::fs::read("image.png").unwrap()));
//! let mut scanlines = decoder.scanlines().unwrap();
//!
//! for scanline in scanlines.by_ref() {
//!     let scanline = scanline.unwrap();
//!     println!("row {} filter {:?}", scanline.row, scanline.filter);
//! }
//! scanlines.finish().unwrap();
//!```
//!
//! # Inspecting chunks
//!
//! [`ChunkReader`] frames chunks without interpreting them, and a decoder
//! records every chunk it framed in [`PngDecoder::chunk_infos`].
//!
//! # Alternatives
//! - [png](https://crates.io/crates/png) crate
//!
#![allow(clippy::upper_case_acronyms)]

pub use chunk::{ChunkInfo, ChunkReader, ChunkType, RawChunk};
pub use decoder::{PixelBuffer, PngDecoder, Scanlines};
pub use enums::{FilterMethod, InterlaceMethod, PaletteRule, PngColor};
pub use headers::{ImageDescriptor, PaletteTable, SampleGeometry};
pub use pngr_core;
pub use registry::{Chunk, ChunkSequence, ChunkView, IdatView, IhdrView, PlteView};
pub use scanline::{Adam7Pass, Scanline};

pub mod chunk;
mod constants;
mod decoder;
mod depack;
mod enums;
pub mod error;
mod filters;
mod headers;
pub mod inflate;
mod registry;
pub mod scanline;
