/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Sample unpacking
//!
//! Sub byte samples are packed most significant bit first and a row
//! ends on a byte boundary. Values are kept as they are, a 2 bit sample
//! of 3 becomes a byte of 3, not 255.
use crate::headers::SampleGeometry;

/// Unpack `num_samples` samples of `bit_depth` bits from `packed` into `out`
///
/// For bit depths of 8 and 16 this is a copy, 16 bit samples stay as
/// big endian byte pairs. `out` must hold one byte per sample for depths
/// below 16 and two for 16.
pub(crate) fn unpack_samples(packed: &[u8], bit_depth: usize, num_samples: usize, out: &mut [u8]) {
    match bit_depth {
        8 | 16 => {
            let len = num_samples * (bit_depth / 8);
            out[..len].copy_from_slice(&packed[..len]);
        }
        1 | 2 | 4 => {
            let per_byte = 8 / bit_depth;
            let mask = (1_u8 << bit_depth) - 1;

            for (in_byte, out_chunk) in packed.iter().zip(out[..num_samples].chunks_mut(per_byte))
            {
                for (p, sample) in out_chunk.iter_mut().enumerate() {
                    let shift = 8 - bit_depth * (p + 1);
                    *sample = (in_byte >> shift) & mask;
                }
            }
        }
        _ => unreachable!("bit depth validated by the header")
    }
}

/// Unpack a scanline of `width` pixels
pub(crate) fn unpack_row(packed: &[u8], geometry: &SampleGeometry, width: usize, out: &mut [u8]) {
    unpack_samples(packed, geometry.bit_depth, width * geometry.channels, out);
}

/// Place the pixels of an unpacked pass row into the full image
///
/// `pixel_bytes` is the unpacked size of one pixel, `x_start` and `x_step`
/// locate the pass row's pixels within `image_row`.
pub(crate) fn scatter_pixels(
    pass_row: &[u8], image_row: &mut [u8], pixel_bytes: usize, x_start: usize, x_step: usize
) {
    for (i, pixel) in pass_row.chunks_exact(pixel_bytes).enumerate() {
        let start = (x_start + i * x_step) * pixel_bytes;

        if let Some(target) = image_row.get_mut(start..start + pixel_bytes) {
            target.copy_from_slice(pixel);
        }
    }
}
