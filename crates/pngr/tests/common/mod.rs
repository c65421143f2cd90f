/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Helpers to assemble png files by hand, including broken ones
#![allow(dead_code)]

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;

pub const SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Frame one chunk with a correct crc
pub fn chunk(tag: &[u8; 4], data: &[u8]) -> Vec<u8> {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(tag);
    hasher.update(data);

    let mut out = Vec::with_capacity(data.len() + 12);
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(tag);
    out.extend_from_slice(data);
    out.extend_from_slice(&hasher.finalize().to_be_bytes());
    out
}

pub fn ihdr_data(width: u32, height: u32, depth: u8, color: u8, interlace: u8) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(&width.to_be_bytes());
    data.extend_from_slice(&height.to_be_bytes());
    data.extend_from_slice(&[depth, color, 0, 0, interlace]);
    data
}

pub fn zlib(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

pub fn paeth(a: u8, b: u8, c: u8) -> u8 {
    let p = i16::from(a) + i16::from(b) - i16::from(c);
    let pa = (p - i16::from(a)).abs();
    let pb = (p - i16::from(b)).abs();
    let pc = (p - i16::from(c)).abs();

    if pa <= pb && pa <= pc {
        a
    } else if pb <= pc {
        b
    } else {
        c
    }
}

/// Apply `filter` to a row, returning the filter byte followed by the filtered bytes
pub fn filter_row(filter: u8, prev: Option<&[u8]>, row: &[u8], bpp: usize) -> Vec<u8> {
    let zeros = vec![0; row.len()];
    let prev = prev.unwrap_or(&zeros);
    let mut out = vec![filter];

    for i in 0..row.len() {
        let a = if i >= bpp { row[i - bpp] } else { 0 };
        let b = prev[i];
        let c = if i >= bpp { prev[i - bpp] } else { 0 };
        let predicted = match filter {
            0 => 0,
            1 => a,
            2 => b,
            3 => ((u16::from(a) + u16::from(b)) / 2) as u8,
            4 => paeth(a, b, c),
            _ => panic!("no such filter {filter}")
        };
        out.push(row[i].wrapping_sub(predicted));
    }
    out
}

/// Filter packed rows of `stride` bytes, row `y` uses filter `filters(y)`
pub fn filter_image(packed: &[u8], stride: usize, bpp: usize, filters: impl Fn(usize) -> u8) -> Vec<u8> {
    let mut out = Vec::new();
    let mut prev: Option<&[u8]> = None;

    for (y, row) in packed.chunks_exact(stride).enumerate() {
        out.extend(filter_row(filters(y), prev, row, bpp));
        prev = Some(row);
    }
    out
}

const ADAM7: [(usize, usize, usize, usize); 7] = [
    (0, 0, 8, 8),
    (4, 0, 8, 8),
    (0, 4, 4, 8),
    (2, 0, 4, 4),
    (0, 2, 2, 4),
    (1, 0, 2, 2),
    (0, 1, 1, 2)
];

/// Interlace whole byte pixels and filter every pass with `filter`
pub fn adam7_stream(pixels: &[u8], width: usize, height: usize, pixel_bytes: usize, filter: u8) -> Vec<u8> {
    let mut out = Vec::new();

    for (x0, y0, dx, dy) in ADAM7 {
        let mut pass = Vec::new();
        let mut pass_width = 0;

        for y in (y0..height).step_by(dy) {
            pass_width = 0;
            for x in (x0..width).step_by(dx) {
                let start = (y * width + x) * pixel_bytes;
                pass.extend_from_slice(&pixels[start..start + pixel_bytes]);
                pass_width += 1;
            }
        }
        if pass_width == 0 || pass.is_empty() {
            continue;
        }
        let stride = pass_width * pixel_bytes;
        out.extend(filter_image(&pass, stride, pixel_bytes, |_| filter));
    }
    out
}

/// Assemble a png file chunk by chunk
#[derive(Default)]
pub struct TestPng {
    chunks: Vec<Vec<u8>>
}

impl TestPng {
    pub fn new() -> TestPng {
        TestPng::default()
    }

    pub fn chunk(mut self, tag: &[u8; 4], data: &[u8]) -> TestPng {
        self.chunks.push(chunk(tag, data));
        self
    }

    /// Append already framed bytes, possibly broken
    pub fn raw(mut self, bytes: Vec<u8>) -> TestPng {
        self.chunks.push(bytes);
        self
    }

    pub fn ihdr(self, width: u32, height: u32, depth: u8, color: u8, interlace: u8) -> TestPng {
        self.chunk(b"IHDR", &ihdr_data(width, height, depth, color, interlace))
    }

    /// Compress `image_data` and spread it over `pieces` IDAT chunks
    pub fn idat(mut self, image_data: &[u8], pieces: usize) -> TestPng {
        let compressed = zlib(image_data);
        let piece_len = (compressed.len() + pieces - 1) / pieces;

        for piece in compressed.chunks(piece_len.max(1)) {
            self.chunks.push(chunk(b"IDAT", piece));
        }
        self
    }

    pub fn iend(self) -> TestPng {
        self.chunk(b"IEND", &[])
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = SIGNATURE.to_vec();
        for chunk in &self.chunks {
            out.extend_from_slice(chunk);
        }
        out
    }
}

/// Non interlaced file from packed rows, filters cycling through all five
pub fn simple_png(width: u32, height: u32, depth: u8, color: u8, packed: &[u8]) -> Vec<u8> {
    let channels = match color {
        0 | 3 => 1,
        4 => 2,
        2 => 3,
        6 => 4,
        _ => panic!("bad color {color}")
    };
    let bits = channels * usize::from(depth);
    let stride = (bits * width as usize + 7) / 8;
    let bpp = (bits + 7) / 8;

    let stream = filter_image(packed, stride, bpp, |y| (y % 5) as u8);

    TestPng::new()
        .ihdr(width, height, depth, color, 0)
        .idat(&stream, 1)
        .iend()
        .build()
}

/// Encode with the png crate, so these tests do not only check against themselves
pub fn reference_encode(
    width: u32, height: u32, color: png::ColorType, depth: png::BitDepth, palette: Option<Vec<u8>>,
    data: &[u8]
) -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(color);
        encoder.set_depth(depth);
        encoder.set_adaptive_filter(png::AdaptiveFilterType::Adaptive);

        if let Some(palette) = palette {
            encoder.set_palette(palette);
        }
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(data).unwrap();
        writer.finish().unwrap();
    }
    out
}

/// Decode with the png crate, without any transformation
pub fn reference_decode(data: &[u8]) -> Vec<u8> {
    let mut decoder = png::Decoder::new(data);
    decoder.set_transformations(png::Transformations::IDENTITY);

    let mut reader = decoder.read_info().unwrap();

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).unwrap();
    buf.truncate(info.buffer_size());

    buf
}
