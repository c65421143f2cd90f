/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Reversing png scanline filters
//!
//! Filtering works on bytes, not pixels, so sub byte images are
//! reconstructed while still packed and `components` is at least one.
use crate::enums::FilterMethod;

mod de_filter;

pub(crate) use de_filter::{
    handle_avg, handle_avg_first, handle_none, handle_paeth, handle_sub, handle_up
};

/// Reconstruct one scanline
///
/// `prev_row` is the reconstructed scanline above in the same pass, or
/// `None` for the first scanline of a pass, in which case the row above
/// is taken to be all zeros.
pub(crate) fn unfilter_scanline(
    filter: FilterMethod, prev_row: Option<&[u8]>, raw: &[u8], current: &mut [u8],
    components: usize
) {
    let components = components.max(1);

    match prev_row {
        Some(prev_row) => match filter {
            FilterMethod::None => handle_none(raw, current),
            FilterMethod::Sub => handle_sub(raw, current, components),
            FilterMethod::Up => handle_up(prev_row, raw, current),
            FilterMethod::Average => handle_avg(prev_row, raw, current, components),
            FilterMethod::Paeth => handle_paeth(prev_row, raw, current, components),
            FilterMethod::AvgFirst => handle_avg_first(raw, current, components)
        },
        // match our filters to special filters for first row
        None => match filter.first_row() {
            FilterMethod::Sub => handle_sub(raw, current, components),
            FilterMethod::AvgFirst => handle_avg_first(raw, current, components),
            _ => handle_none(raw, current)
        }
    }
}

#[cfg(test)]
mod tests {
    use nanorand::Rng;

    use crate::enums::FilterMethod;
    use crate::filters::de_filter::paeth;
    use crate::filters::unfilter_scanline;

    /// Forward filter, the way an encoder applies it
    fn filter_row(filter: u8, prev: Option<&[u8]>, row: &[u8], bpp: usize) -> Vec<u8> {
        let zeros = vec![0; row.len()];
        let prev = prev.unwrap_or(&zeros);

        (0..row.len())
            .map(|i| {
                let a = if i >= bpp { row[i - bpp] } else { 0 };
                let b = prev[i];
                let c = if i >= bpp { prev[i - bpp] } else { 0 };
                let predicted = match filter {
                    0 => 0,
                    1 => a,
                    2 => b,
                    3 => ((u16::from(a) + u16::from(b)) / 2) as u8,
                    4 => paeth(a, b, c),
                    _ => unreachable!()
                };
                row[i].wrapping_sub(predicted)
            })
            .collect()
    }

    #[test]
    fn paeth_tie_breaks() {
        // all distances equal, a wins
        assert_eq!(paeth(10, 10, 10), 10);
        // p = 20, pa = 10, pb = 10, pc = 20 -> a
        assert_eq!(paeth(10, 10, 0), 10);
        // p = 5 + 9 - 7 = 7, pa = 2, pb = 2, pc = 0 -> c
        assert_eq!(paeth(5, 9, 7), 7);
        // p = 3 + 8 - 3 = 8, pa = 5, pb = 0 -> b
        assert_eq!(paeth(3, 8, 3), 8);
    }

    #[test]
    fn first_row_uses_zero_row_above() {
        let row = [10, 20, 30, 40, 50, 60];
        for filter in 0..=4 {
            let filtered = filter_row(filter, None, &row, 3);
            let mut out = [0; 6];
            let method = FilterMethod::from_int(filter).unwrap();

            unfilter_scanline(method, None, &filtered, &mut out, 3);
            assert_eq!(out, row, "filter {filter}");
        }
    }

    #[test]
    fn sub_example() {
        // filter 1 on rgb, each byte is relative to the one three bytes before
        let raw = [1, 2, 3, 1, 1, 1];
        let mut out = [0; 6];
        unfilter_scanline(FilterMethod::Sub, None, &raw, &mut out, 3);
        assert_eq!(out, [1, 2, 3, 2, 3, 4]);
    }

    #[test]
    fn reverses_every_filter_for_every_pixel_width() {
        let mut rand = nanorand::WyRand::new_seed(0x5eed);

        for bpp in [1, 2, 3, 4, 6, 8] {
            let width = 17;
            let stride = width * bpp;
            let mut rows = vec![vec![0_u8; stride]; 6];

            for row in rows.iter_mut() {
                rand.fill(row);
            }
            let mut prev: Option<Vec<u8>> = None;

            for (y, row) in rows.iter().enumerate() {
                let filter = (y % 5) as u8;
                let filtered = filter_row(filter, prev.as_deref(), row, bpp);
                let mut out = vec![0; stride];

                unfilter_scanline(
                    FilterMethod::from_int(filter).unwrap(),
                    prev.as_deref(),
                    &filtered,
                    &mut out,
                    bpp
                );
                assert_eq!(&out, row, "bpp {bpp}, filter {filter}");
                prev = Some(out);
            }
        }
    }

    #[test]
    fn short_rows_do_not_panic() {
        let raw = [7];
        let prev = [3];
        let mut out = [0];

        for filter in 0..=4 {
            let method = FilterMethod::from_int(filter).unwrap();
            unfilter_scanline(method, Some(&prev), &raw, &mut out, 8);
            unfilter_scanline(method, None, &raw, &mut out, 8);
        }
    }
}
