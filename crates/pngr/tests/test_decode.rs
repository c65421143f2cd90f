/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use nanorand::Rng;
use pngr::error::FormatError;
use pngr::{FilterMethod, PngColor, PngDecoder};
use pngr_core::bytestream::ByteCursor;
use pngr_core::colorspace::ColorSpace;
use pngr_core::options::DecoderOptions;
use pngr_core::result::DecodingResult;

use crate::common::{adam7_stream, reference_decode, reference_encode, simple_png, TestPng};

mod common;

fn decode_pngr(data: Vec<u8>) -> Vec<u8> {
    PngDecoder::new(ByteCursor::new(data))
        .decode_raw()
        .unwrap()
        .into_data()
}

fn random_bytes(seed: u64, len: usize) -> Vec<u8> {
    let mut bytes = vec![0_u8; len];
    nanorand::WyRand::new_seed(seed).fill(&mut bytes);
    bytes
}

#[test]
fn test_rgb_single_row() {
    let row = [
        255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255, 0, 0, 0, 128, 128, 128, 10, 20, 30, 1, 2,
        3
    ];
    let mut stream = vec![0];
    stream.extend_from_slice(&row);

    let data = TestPng::new()
        .ihdr(8, 1, 8, 2, 0)
        .idat(&stream, 1)
        .iend()
        .build();

    let mut decoder = PngDecoder::new(ByteCursor::new(data));
    decoder.decode_headers().unwrap();

    assert_eq!(decoder.get_dimensions(), Some((8, 1)));
    assert_eq!(decoder.get_colorspace(), Some(ColorSpace::RGB));
    assert_eq!(decoder.get_depth(), Some(8));

    let pixels = decoder.decode_raw().unwrap();
    assert_eq!(pixels.channels(), 3);
    assert_eq!(pixels.row(0), Some(&row[..]));
    assert_eq!(pixels.row(1), None);
}

#[test]
fn test_metadata_needs_headers() {
    let data = simple_png(2, 2, 8, 0, &[1, 2, 3, 4]);
    let decoder = PngDecoder::new(ByteCursor::new(data));

    assert_eq!(decoder.get_dimensions(), None);
    assert!(decoder.get_info().is_none());
    assert!(decoder.chunk_infos().is_empty());
}

#[test]
fn test_decode_returns_bytes_for_8_bit() {
    let data = simple_png(3, 2, 8, 4, &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]);

    let mut decoder = PngDecoder::new(ByteCursor::new(data));
    let result = decoder.decode().unwrap();

    assert_eq!(result.len(), 12);
    assert_eq!(decoder.get_colorspace().map(|c| c.has_alpha()), Some(true));
    assert_eq!(result.u8().unwrap(), [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]);
}

#[test]
fn test_split_idat_matches_single_idat() {
    let (width, height) = (19, 7);
    let pixels = random_bytes(7, width * height * 4);
    let stream = common::filter_image(&pixels, width * 4, 4, |y| (y % 5) as u8);

    let single = TestPng::new()
        .ihdr(width as u32, height as u32, 8, 6, 0)
        .idat(&stream, 1)
        .iend()
        .build();
    let split = TestPng::new()
        .ihdr(width as u32, height as u32, 8, 6, 0)
        .idat(&stream, 9)
        .iend()
        .build();

    assert_eq!(decode_pngr(single), pixels);
    assert_eq!(decode_pngr(split), pixels);
}

#[test]
fn test_against_reference_8_bit() {
    let (width, height) = (33, 17);

    for (color, channels) in [
        (png::ColorType::Grayscale, 1),
        (png::ColorType::GrayscaleAlpha, 2),
        (png::ColorType::Rgb, 3),
        (png::ColorType::Rgba, 4)
    ] {
        let pixels = random_bytes(channels as u64, width * height * channels);
        let file = reference_encode(
            width as u32,
            height as u32,
            color,
            png::BitDepth::Eight,
            None,
            &pixels
        );

        assert_eq!(reference_decode(&file), pixels);
        assert_eq!(decode_pngr(file), pixels, "{color:?}");
    }
}

#[test]
fn test_against_reference_16_bit() {
    let (width, height) = (9, 5);
    let pixels = random_bytes(16, width * height * 3 * 2);

    let file = reference_encode(
        width as u32,
        height as u32,
        png::ColorType::Rgb,
        png::BitDepth::Sixteen,
        None,
        &pixels
    );
    assert_eq!(decode_pngr(file.clone()), reference_decode(&file));

    let result = PngDecoder::new(ByteCursor::new(file)).decode().unwrap();
    match result {
        DecodingResult::U16(samples) => {
            assert_eq!(samples.len(), width * height * 3);
            assert_eq!(samples[0], u16::from_be_bytes([pixels[0], pixels[1]]));
            assert_eq!(samples[4], u16::from_be_bytes([pixels[8], pixels[9]]));
        }
        _ => panic!("expected 16 bit samples")
    }
}

#[test]
fn test_sub_byte_grayscale() {
    // width 5 leaves unused bits at the end of every row
    let (width, height) = (5_usize, 3_usize);

    for depth in [1_u8, 2, 4] {
        let mask = (1_u8 << depth) - 1;
        let samples: Vec<u8> = random_bytes(u64::from(depth), width * height)
            .into_iter()
            .map(|v| v & mask)
            .collect();

        let stride = (width * usize::from(depth) + 7) / 8;
        let mut packed = vec![0_u8; stride * height];

        for y in 0..height {
            for x in 0..width {
                let bit = x * usize::from(depth);
                let shift = 8 - usize::from(depth) - bit % 8;
                packed[y * stride + bit / 8] |= samples[y * width + x] << shift;
            }
        }
        let file = reference_encode(
            width as u32,
            height as u32,
            png::ColorType::Grayscale,
            png::BitDepth::from_u8(depth).unwrap(),
            None,
            &packed
        );
        assert_eq!(reference_decode(&file), packed);
        assert_eq!(decode_pngr(file), samples, "depth {depth}");

        let own = simple_png(width as u32, height as u32, depth, 0, &packed);
        assert_eq!(decode_pngr(own), samples, "depth {depth}");
    }
}

#[test]
fn test_indexed_image_and_palette_expansion() {
    let palette = vec![255, 0, 0, 0, 255, 0, 0, 0, 255, 10, 20, 30];
    // 4x2 image, 2 bits per index
    let packed = [0b00_01_10_11, 0b11_10_01_00];

    let file = reference_encode(
        4,
        2,
        png::ColorType::Indexed,
        png::BitDepth::Two,
        Some(palette.clone()),
        &packed
    );

    let mut decoder = PngDecoder::new(ByteCursor::new(file));
    let pixels = decoder.decode_raw().unwrap();

    assert_eq!(pixels.color(), PngColor::Palette);
    assert_eq!(pixels.data(), &[0, 1, 2, 3, 3, 2, 1, 0]);
    assert_eq!(decoder.palette().map(|p| p.len()), Some(4));

    let rgb = pixels.expand_palette().unwrap();
    assert_eq!(rgb.channels(), 3);
    assert_eq!(rgb.row(0).unwrap(), &[255, 0, 0, 0, 255, 0, 0, 0, 255, 10, 20, 30]);
    assert_eq!(rgb.row(1).unwrap()[..3], [10, 20, 30]);
}

#[test]
fn test_palette_index_out_of_range() {
    let data = TestPng::new()
        .ihdr(2, 1, 8, 3, 0)
        .chunk(b"PLTE", &[1, 2, 3, 4, 5, 6])
        .idat(&[0, 1, 5], 1)
        .iend()
        .build();

    let pixels = PngDecoder::new(ByteCursor::new(data)).decode_raw().unwrap();
    assert_eq!(pixels.data(), &[1, 5]);
    assert!(matches!(
        pixels.expand_palette(),
        Err(FormatError::InvalidPalette(_))
    ));
}

#[test]
fn test_expand_palette_needs_indexed_image() {
    let pixels = PngDecoder::new(ByteCursor::new(simple_png(2, 2, 8, 0, &[1, 2, 3, 4])))
        .decode_raw()
        .unwrap();

    assert!(matches!(
        pixels.expand_palette(),
        Err(FormatError::UnsupportedFeature(_))
    ));
}

#[test]
fn test_adam7_matches_non_interlaced() {
    for (width, height) in [(8, 8), (1, 1), (3, 2), (13, 11), (33, 5)] {
        let pixels = random_bytes((width * 100 + height) as u64, width * height * 3);

        for filter in 0..=4 {
            let interlaced = TestPng::new()
                .ihdr(width as u32, height as u32, 8, 2, 1)
                .idat(&adam7_stream(&pixels, width, height, 3, filter), 2)
                .iend()
                .build();

            assert_eq!(
                decode_pngr(interlaced),
                pixels,
                "{width}x{height} filter {filter}"
            );
        }
        let plain = simple_png(width as u32, height as u32, 8, 2, &pixels);
        assert_eq!(decode_pngr(plain), pixels);
    }
}

#[test]
fn test_adam7_16_bit_gray_alpha() {
    let (width, height) = (10, 9);
    let pixels = random_bytes(99, width * height * 4);

    let file = TestPng::new()
        .ihdr(width as u32, height as u32, 16, 4, 1)
        .idat(&adam7_stream(&pixels, width, height, 4, 4), 1)
        .iend()
        .build();

    assert_eq!(decode_pngr(file), pixels);
}

#[test]
fn test_streaming_scanlines() {
    let pixels = random_bytes(3, 4 * 6);
    let file = simple_png(4, 6, 8, 0, &pixels);

    let mut decoder = PngDecoder::new(ByteCursor::new(file));
    let mut scanlines = decoder.scanlines().unwrap();
    assert_eq!(scanlines.expected_bytes(), 6 * 5);

    let rows: Vec<_> = scanlines.by_ref().map(|row| row.unwrap()).collect();
    scanlines.finish().unwrap();

    assert_eq!(rows.len(), 6);
    for (y, row) in rows.iter().enumerate() {
        assert_eq!(row.row, y);
        assert_eq!(row.pass, None);
        assert_eq!(row.width, 4);
        assert_eq!(row.data, pixels[y * 4..(y + 1) * 4]);
    }
    assert_eq!(rows[1].filter, FilterMethod::Sub);
    assert_eq!(rows[4].filter, FilterMethod::Paeth);

    // the image data can only be walked once
    assert!(matches!(
        decoder.scanlines(),
        Err(FormatError::UnsupportedFeature(_))
    ));
    assert_eq!(decoder.chunk_infos().len(), 3);
}

#[test]
fn test_invalid_filter_type() {
    let data = TestPng::new()
        .ihdr(2, 2, 8, 0, 0)
        .idat(&[0, 1, 2, 5, 3, 4], 1)
        .iend()
        .build();

    let err = PngDecoder::new(ByteCursor::new(data))
        .decode_raw()
        .unwrap_err();
    assert!(matches!(
        err,
        FormatError::InvalidFilterType {
            filter: 5,
            pass: None,
            row: 1
        }
    ));
}

#[test]
fn test_corrupt_zlib_stream() {
    // final block with the reserved block type
    let data = TestPng::new()
        .ihdr(2, 2, 8, 0, 0)
        .chunk(b"IDAT", &[0x78, 0x9c, 0xff, 0xff, 0xff, 0xff])
        .iend()
        .build();

    let err = PngDecoder::new(ByteCursor::new(data))
        .decode_raw()
        .unwrap_err();
    assert!(matches!(err, FormatError::DecompressionFailed(_)));
}

#[test]
fn test_bad_adler_checksum() {
    let mut compressed = common::zlib(&[0, 1, 2, 0, 3, 4]);
    let last = compressed.len() - 1;
    compressed[last] ^= 0x55;

    let data = TestPng::new()
        .ihdr(2, 2, 8, 0, 0)
        .chunk(b"IDAT", &compressed)
        .iend()
        .build();

    let err = PngDecoder::new(ByteCursor::new(data))
        .decode_raw()
        .unwrap_err();
    assert!(matches!(err, FormatError::DecompressionFailed(_)));
}

#[test]
fn test_short_image_data() {
    // three scanlines expected, two present
    let data = TestPng::new()
        .ihdr(2, 3, 8, 0, 0)
        .idat(&[0, 1, 2, 0, 3, 4], 1)
        .iend()
        .build();

    let err = PngDecoder::new(ByteCursor::new(data))
        .decode_raw()
        .unwrap_err();
    assert!(matches!(
        err,
        FormatError::Truncated {
            what: "scanline",
            offset: 6,
            expected: 3,
            found: 0
        }
    ));
}

#[test]
fn test_limits() {
    let data = simple_png(40, 2, 8, 0, &[7; 80]);

    let options = DecoderOptions::default().set_max_width(32);
    let err = PngDecoder::new_with_options(ByteCursor::new(data.clone()), options)
        .decode_headers()
        .unwrap_err();
    assert!(matches!(
        err,
        FormatError::LimitExceeded {
            what: "width",
            limit: 32,
            found: 40
        }
    ));

    let options = DecoderOptions::default().set_deflate_limit(50);
    let err = PngDecoder::new_with_options(ByteCursor::new(data), options)
        .decode_raw()
        .unwrap_err();
    assert!(matches!(err, FormatError::LimitExceeded { what: "decompressed bytes", .. }));
}
