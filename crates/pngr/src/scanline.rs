/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Scanline framing and reconstruction
//!
//! The decompressed stream is a sequence of `filter byte + stride`
//! records, one per row of the image or, for interlaced images, one per
//! row of each non empty Adam7 pass.
use log::debug;

use crate::constants::{ADAM7_XORIG, ADAM7_XSPC, ADAM7_YORIG, ADAM7_YSPC};
use crate::enums::{FilterMethod, InterlaceMethod};
use crate::error::FormatError;
use crate::filters::unfilter_scanline;
use crate::headers::{ImageDescriptor, SampleGeometry};
use crate::inflate::DecompressedSource;

/// One of the seven passes of Adam7 interlacing
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Adam7Pass {
    index: u8
}

impl Adam7Pass {
    /// Pass number `index`, counted from 1 to 7
    pub const fn new(index: u8) -> Option<Adam7Pass> {
        if index >= 1 && index <= 7 {
            Some(Adam7Pass { index })
        } else {
            None
        }
    }

    /// All passes in transmission order
    pub fn all() -> impl Iterator<Item = Adam7Pass> {
        (1..=7).map(|index| Adam7Pass { index })
    }

    pub const fn index(self) -> u8 {
        self.index
    }

    pub const fn x_start(self) -> usize {
        ADAM7_XORIG[self.index as usize - 1]
    }

    pub const fn y_start(self) -> usize {
        ADAM7_YORIG[self.index as usize - 1]
    }

    pub const fn x_step(self) -> usize {
        ADAM7_XSPC[self.index as usize - 1]
    }

    pub const fn y_step(self) -> usize {
        ADAM7_YSPC[self.index as usize - 1]
    }

    /// Size of the reduced image this pass covers in a `width` x `height` image
    pub const fn dimensions(self, width: usize, height: usize) -> (usize, usize) {
        (
            pass_extent(width, self.x_start(), self.x_step()),
            pass_extent(height, self.y_start(), self.y_step())
        )
    }

    /// Position in the full image of pixel `(x, y)` of this pass
    pub const fn to_image(self, x: usize, y: usize) -> (usize, usize) {
        (
            self.x_start() + x * self.x_step(),
            self.y_start() + y * self.y_step()
        )
    }
}

const fn pass_extent(size: usize, start: usize, step: usize) -> usize {
    if size <= start {
        0
    } else {
        (size - start + step - 1) / step
    }
}

/// Layout of one group of scanlines sharing a width
#[derive(Copy, Clone, Debug)]
struct RowGroup {
    pass:   Option<Adam7Pass>,
    width:  usize,
    height: usize,
    stride: usize
}

/// Where a framed record belongs in the image
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct RecordPosition {
    /// `None` for non interlaced images
    pub pass:   Option<Adam7Pass>,
    /// Row within the pass (or the image)
    pub row:    usize,
    /// Pixels in this row
    pub width:  usize,
    /// Bytes in this row, excluding the filter byte
    pub stride: usize
}

/// Splits decompressed bytes into scanline records
pub struct ScanlineFramer<S: DecompressedSource> {
    source: S,
    groups: Vec<RowGroup>,
    group:  usize,
    row:    usize,
    offset: u64
}

impl<S: DecompressedSource> ScanlineFramer<S> {
    pub fn new(descriptor: &ImageDescriptor, source: S) -> ScanlineFramer<S> {
        let geometry = descriptor.geometry();
        let width = descriptor.width as usize;
        let height = descriptor.height as usize;

        let groups = match descriptor.interlace_method {
            InterlaceMethod::Standard => vec![RowGroup {
                pass: None,
                width,
                height,
                stride: geometry.stride(width)
            }],
            InterlaceMethod::Adam7 => Adam7Pass::all()
                .filter_map(|pass| {
                    let (pass_width, pass_height) = pass.dimensions(width, height);

                    debug!(
                        "Adam7 pass {}: {}x{} pixels, stride {}",
                        pass.index(),
                        pass_width,
                        pass_height,
                        geometry.stride(pass_width)
                    );
                    // empty passes carry no scanlines at all, not even filter bytes
                    if pass_width == 0 || pass_height == 0 {
                        return None;
                    }
                    Some(RowGroup {
                        pass:   Some(pass),
                        width:  pass_width,
                        height: pass_height,
                        stride: geometry.stride(pass_width)
                    })
                })
                .collect()
        };

        ScanlineFramer {
            source,
            groups,
            group: 0,
            row: 0,
            offset: 0
        }
    }

    /// Total number of decompressed bytes the image occupies
    pub fn expected_bytes(&self) -> u64 {
        self.groups
            .iter()
            .map(|group| (group.stride as u64 + 1) * group.height as u64)
            .sum()
    }

    /// Read the next `1 + stride` byte record into `record`
    ///
    /// Returns `None` after the last scanline of the image.
    pub fn next_record(
        &mut self, record: &mut Vec<u8>
    ) -> Result<Option<RecordPosition>, FormatError> {
        while let Some(group) = self.groups.get(self.group) {
            if self.row == group.height {
                self.group += 1;
                self.row = 0;
                continue;
            }
            let group = *group;

            record.resize(group.stride + 1, 0);
            self.fill(record)?;

            let position = RecordPosition {
                pass:   group.pass,
                row:    self.row,
                width:  group.width,
                stride: group.stride
            };
            self.row += 1;

            return Ok(Some(position));
        }
        Ok(None)
    }

    fn fill(&mut self, record: &mut [u8]) -> Result<(), FormatError> {
        let mut filled = 0;

        while filled < record.len() {
            let read = self.source.read_decompressed(&mut record[filled..])?;

            if read == 0 {
                return Err(FormatError::Truncated {
                    what:     "scanline",
                    offset:   self.offset,
                    expected: record.len() as u64,
                    found:    filled as u64
                });
            }
            filled += read;
        }
        self.offset += filled as u64;

        Ok(())
    }

    pub fn into_source(self) -> S {
        self.source
    }
}

/// A reconstructed scanline
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Scanline {
    pub pass:   Option<Adam7Pass>,
    pub row:    usize,
    /// Pixels in this scanline
    pub width:  usize,
    /// Filter the encoder used for this scanline
    pub filter: FilterMethod,
    /// Unfiltered bytes, samples still packed as in the file
    pub data:   Vec<u8>
}

/// Frames and unfilters scanlines
///
/// Only the previous scanline of the current pass is kept around.
pub struct ScanlineDecoder<S: DecompressedSource> {
    framer:     ScanlineFramer<S>,
    components: usize,
    record:     Vec<u8>,
    previous:   Vec<u8>,
    current:    Vec<u8>,
    failed:     bool
}

impl<S: DecompressedSource> ScanlineDecoder<S> {
    pub fn new(descriptor: &ImageDescriptor, source: S) -> ScanlineDecoder<S> {
        let geometry: SampleGeometry = descriptor.geometry();

        ScanlineDecoder {
            framer:     ScanlineFramer::new(descriptor, source),
            components: geometry.filter_bpp(),
            record:     Vec::new(),
            previous:   Vec::new(),
            current:    Vec::new(),
            failed:     false
        }
    }

    /// Decode the next scanline, `None` once the image is complete
    pub fn next_scanline(&mut self) -> Result<Option<Scanline>, FormatError> {
        let position = match self.framer.next_record(&mut self.record)? {
            Some(position) => position,
            None => return Ok(None)
        };
        let filter_byte = self.record[0];

        let filter =
            FilterMethod::from_int(filter_byte).ok_or(FormatError::InvalidFilterType {
                filter: filter_byte,
                pass:   position.pass.map(Adam7Pass::index),
                row:    position.row
            })?;

        self.current.resize(position.stride, 0);

        let prev_row = if position.row == 0 {
            None
        } else {
            Some(&self.previous[..position.stride])
        };
        unfilter_scanline(
            filter,
            prev_row,
            &self.record[1..],
            &mut self.current,
            self.components
        );
        core::mem::swap(&mut self.previous, &mut self.current);

        Ok(Some(Scanline {
            pass: position.pass,
            row: position.row,
            width: position.width,
            filter,
            data: self.previous.clone()
        }))
    }

    pub fn expected_bytes(&self) -> u64 {
        self.framer.expected_bytes()
    }

    pub fn into_source(self) -> S {
        self.framer.into_source()
    }
}

impl<S: DecompressedSource> Iterator for ScanlineDecoder<S> {
    type Item = Result<Scanline, FormatError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let result = self.next_scanline();
        self.failed = result.is_err();

        result.transpose()
    }
}
