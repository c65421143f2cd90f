/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use log::info;
use pngr_core::colorspace::ColorSpace;

use crate::enums::{InterlaceMethod, PngColor};
use crate::error::FormatError;
use crate::registry::{IhdrView, PlteView};

/// Image properties stored in the IHDR chunk
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ImageDescriptor {
    pub width:              u32,
    pub height:             u32,
    pub bit_depth:          u8,
    pub color:              PngColor,
    pub compression_method: u8,
    pub filter_method:      u8,
    pub interlace_method:   InterlaceMethod
}

impl ImageDescriptor {
    pub fn from_ihdr(view: IhdrView) -> Result<ImageDescriptor, FormatError> {
        let width = view.width();
        let height = view.height();

        if width == 0 || height == 0 {
            return Err(FormatError::InvalidHeader(format!(
                "Width or height cannot be zero, found {width}x{height}"
            )));
        }
        if width > i32::MAX as u32 || height > i32::MAX as u32 {
            return Err(FormatError::InvalidHeader(format!(
                "Dimensions {width}x{height} exceed 2^31-1"
            )));
        }
        let color_type = view.color_type();
        let color = PngColor::from_int(color_type).ok_or_else(|| {
            FormatError::InvalidHeader(format!("Unknown color value {color_type}"))
        })?;

        let bit_depth = view.bit_depth();

        if !color.allowed_depths().contains(&bit_depth) {
            return Err(FormatError::InvalidHeader(format!(
                "Bit depth of {bit_depth} not allowed for color type {color:?}, allowed are {:?}",
                color.allowed_depths()
            )));
        }
        if view.compression_method() != 0 {
            return Err(FormatError::InvalidHeader(format!(
                "Unknown compression method {}",
                view.compression_method()
            )));
        }
        if view.filter_method() != 0 {
            return Err(FormatError::InvalidHeader(format!(
                "Unknown filter method {}",
                view.filter_method()
            )));
        }
        let interlace = view.interlace_method();
        let interlace_method = InterlaceMethod::from_int(interlace).ok_or_else(|| {
            FormatError::InvalidHeader(format!("Unknown interlace method {interlace}"))
        })?;

        info!("Width: {}", width);
        info!("Height: {}", height);
        info!("Color type: {:?}", color);
        info!("Depth: {:?}", bit_depth);
        info!("Interlace :{:?}", interlace_method);

        Ok(ImageDescriptor {
            width,
            height,
            bit_depth,
            color,
            compression_method: 0,
            filter_method: 0,
            interlace_method
        })
    }

    pub fn geometry(&self) -> SampleGeometry {
        SampleGeometry::new(self.color, self.bit_depth)
    }

    /// Bytes of pixel data in a full width scanline, without the filter byte
    pub fn stride(&self) -> usize {
        self.geometry().stride(self.width as usize)
    }

    pub const fn colorspace(&self) -> ColorSpace {
        self.color.colorspace()
    }
}

/// Sample layout derived from color type and bit depth
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SampleGeometry {
    pub channels:       usize,
    pub bit_depth:      usize,
    pub bits_per_pixel: usize
}

impl SampleGeometry {
    pub const fn new(color: PngColor, bit_depth: u8) -> SampleGeometry {
        let channels = color.num_components();
        SampleGeometry {
            channels,
            bit_depth: bit_depth as usize,
            bits_per_pixel: channels * bit_depth as usize
        }
    }

    /// Bytes in a scanline of `width` pixels, excluding the filter byte
    ///
    /// Sub byte pixels are packed and the last byte is padded.
    pub const fn stride(&self, width: usize) -> usize {
        (self.bits_per_pixel * width + 7) / 8
    }

    /// Lookback distance used by the filters, whole bytes per pixel rounded up
    pub const fn filter_bpp(&self) -> usize {
        (self.bits_per_pixel + 7) / 8
    }

    /// Bytes a single unpacked sample occupies in the output
    pub const fn bytes_per_sample(&self) -> usize {
        if self.bit_depth == 16 {
            2
        } else {
            1
        }
    }
}

/// Entries of a PLTE chunk
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PaletteTable {
    entries: Vec<[u8; 3]>
}

impl PaletteTable {
    pub fn from_plte(view: PlteView) -> PaletteTable {
        PaletteTable {
            entries: view.entries().collect()
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<[u8; 3]> {
        self.entries.get(index).copied()
    }

    pub fn entries(&self) -> &[[u8; 3]] {
        &self.entries
    }

    /// Check this palette against the image it will be used for
    pub(crate) fn validate_for(&self, descriptor: &ImageDescriptor) -> Result<(), FormatError> {
        if descriptor.color == PngColor::Palette {
            let max_entries = 1_usize << descriptor.bit_depth;

            if self.len() > max_entries {
                return Err(FormatError::InvalidPalette(format!(
                    "{} palette entries but bit depth {} can only index {max_entries}",
                    self.len(),
                    descriptor.bit_depth
                )));
            }
        }
        Ok(())
    }
}
