/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Scalar scanline reconstruction
//!
//! Every function reads the filtered bytes from `raw` and writes the
//! reconstructed bytes to `current`, `components` is the filter lookback
//! distance in bytes.

pub fn handle_none(raw: &[u8], current: &mut [u8]) {
    let end = current.len().min(raw.len());
    current[..end].copy_from_slice(&raw[..end]);
}

#[allow(clippy::manual_memcpy)]
pub fn handle_sub(raw: &[u8], current: &mut [u8], components: usize) {
    if current.len() < components || raw.len() < components {
        handle_none(raw, current);
        return;
    }
    // handle leftmost byte explicitly
    for i in 0..components {
        current[i] = raw[i];
    }
    // raw length is one row,so always keep it in check
    let end = current.len().min(raw.len());

    for i in components..end {
        let a = current[i - components];
        current[i] = raw[i].wrapping_add(a);
    }
}

pub fn handle_up(prev_row: &[u8], raw: &[u8], current: &mut [u8]) {
    for ((filt, recon), up) in raw.iter().zip(current).zip(prev_row) {
        *recon = (*filt).wrapping_add(*up)
    }
}

pub fn handle_avg(prev_row: &[u8], raw: &[u8], current: &mut [u8], components: usize) {
    let end = current.len().min(raw.len()).min(prev_row.len());
    let lead = components.min(end);

    // handle leftmost bytes explicitly, they have no left neighbour
    for i in 0..lead {
        current[i] = raw[i].wrapping_add(prev_row[i] >> 1);
    }

    for i in lead..end {
        let a = current[i - components];
        let b = prev_row[i];

        // floor((a + b) / 2) without widening
        let c = (a & b) + ((a ^ b) >> 1);

        current[i] = raw[i].wrapping_add(c);
    }
}

/// Average filter on a scanline with no row above
///
/// The above row is treated as zero
pub fn handle_avg_first(raw: &[u8], current: &mut [u8], components: usize) {
    let end = current.len().min(raw.len());
    let lead = components.min(end);

    current[..lead].copy_from_slice(&raw[..lead]);

    for i in lead..end {
        let avg = current[i - components] >> 1;
        current[i] = raw[i].wrapping_add(avg)
    }
}

pub fn handle_paeth(prev_row: &[u8], raw: &[u8], current: &mut [u8], components: usize) {
    let end = current.len().min(raw.len()).min(prev_row.len());
    let lead = components.min(end);

    for i in 0..lead {
        current[i] = raw[i].wrapping_add(paeth(0, prev_row[i], 0));
    }

    for i in lead..end {
        let paeth_res = paeth(
            current[i - components],
            prev_row[i],
            prev_row[i - components]
        );
        current[i] = raw[i].wrapping_add(paeth_res)
    }
}

/// Paeth predictor
///
/// Ties go to `a`, then `b`, then `c`.
#[inline(always)]
pub fn paeth(a: u8, b: u8, c: u8) -> u8 {
    let a = i16::from(a);
    let b = i16::from(b);
    let c = i16::from(c);
    let p = a + b - c;
    let pa = (p - a).abs();
    let pb = (p - b).abs();
    let pc = (p - c).abs();

    if pa <= pb && pa <= pc {
        return a as u8;
    }
    if pb <= pc {
        return b as u8;
    }
    c as u8
}
