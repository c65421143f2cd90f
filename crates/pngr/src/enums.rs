/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

#![allow(clippy::upper_case_acronyms)]

use pngr_core::colorspace::ColorSpace;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FilterMethod {
    None,
    Sub,
    Up,
    Average,
    Paeth,
    // First scanline of a pass, special
    AvgFirst
}

impl FilterMethod {
    pub fn from_int(int: u8) -> Option<FilterMethod> {
        match int {
            0 => Some(FilterMethod::None),
            1 => Some(FilterMethod::Sub),
            2 => Some(FilterMethod::Up),
            3 => Some(FilterMethod::Average),
            4 => Some(FilterMethod::Paeth),
            _ => None
        }
    }

    /// The filter to run when there is no previous scanline
    ///
    /// With the row above treated as zero, Up degenerates to a copy
    /// and Paeth always picks the left byte, i.e. Sub.
    pub(crate) const fn first_row(self) -> FilterMethod {
        match self {
            FilterMethod::Up => FilterMethod::None,
            FilterMethod::Paeth => FilterMethod::Sub,
            FilterMethod::Average => FilterMethod::AvgFirst,
            other => other
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum InterlaceMethod {
    Standard,
    Adam7
}

impl InterlaceMethod {
    pub fn from_int(int: u8) -> Option<InterlaceMethod> {
        match int {
            0 => Some(Self::Standard),
            1 => Some(Self::Adam7),
            _ => None
        }
    }
}

/// Whether a PLTE chunk may appear for a color type
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PaletteRule {
    Required,
    Forbidden,
    Optional
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PngColor {
    Luma,
    Palette,
    LumaA,
    RGB,
    RGBA
}

impl PngColor {
    pub const fn num_components(self) -> usize {
        match self {
            PngColor::Luma => 1,
            PngColor::Palette => 1,
            PngColor::LumaA => 2,
            PngColor::RGB => 3,
            PngColor::RGBA => 4
        }
    }

    pub const fn palette_rule(self) -> PaletteRule {
        match self {
            PngColor::Palette => PaletteRule::Required,
            PngColor::Luma | PngColor::LumaA => PaletteRule::Forbidden,
            PngColor::RGB | PngColor::RGBA => PaletteRule::Optional
        }
    }

    /// Bit depths the format allows for this color type
    pub const fn allowed_depths(self) -> &'static [u8] {
        match self {
            PngColor::Luma => &[1, 2, 4, 8, 16],
            PngColor::Palette => &[1, 2, 4, 8],
            PngColor::LumaA | PngColor::RGB | PngColor::RGBA => &[8, 16]
        }
    }

    pub const fn to_int(self) -> u8 {
        match self {
            PngColor::Luma => 0,
            PngColor::RGB => 2,
            PngColor::Palette => 3,
            PngColor::LumaA => 4,
            PngColor::RGBA => 6
        }
    }

    pub const fn from_int(int: u8) -> Option<PngColor> {
        match int {
            0 => Some(Self::Luma),
            2 => Some(Self::RGB),
            3 => Some(Self::Palette),
            4 => Some(Self::LumaA),
            6 => Some(Self::RGBA),
            _ => None
        }
    }

    pub const fn colorspace(self) -> ColorSpace {
        match self {
            PngColor::Luma => ColorSpace::Luma,
            PngColor::Palette => ColorSpace::Indexed,
            PngColor::LumaA => ColorSpace::LumaA,
            PngColor::RGB => ColorSpace::RGB,
            PngColor::RGBA => ColorSpace::RGBA
        }
    }
}
