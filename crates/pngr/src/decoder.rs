/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use log::info;
use pngr_core::bytestream::ByteSourceTrait;
use pngr_core::colorspace::ColorSpace;
use pngr_core::options::DecoderOptions;
use pngr_core::result::DecodingResult;

use crate::chunk::{ChunkInfo, RawChunk};
use crate::constants::MIN_CHUNK_SIZE;
use crate::depack::{scatter_pixels, unpack_row};
use crate::enums::{PaletteRule, PngColor};
use crate::error::FormatError;
use crate::headers::{ImageDescriptor, PaletteTable};
use crate::inflate::{IdatReader, InflateStage};
use crate::registry::{Chunk, ChunkStream};
use crate::scanline::{Scanline, ScanlineDecoder};

/// A fully decoded image
///
/// Samples are stored row major with `width * channels` samples per row,
/// one byte each for bit depths up to 8 and a big endian byte pair for 16.
/// Sub byte samples keep their raw value and palette images keep their
/// indices, see [`PixelBuffer::expand_palette`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PixelBuffer {
    width:     usize,
    height:    usize,
    color:     PngColor,
    bit_depth: u8,
    data:      Vec<u8>,
    palette:   Option<PaletteTable>
}

impl PixelBuffer {
    pub const fn width(&self) -> usize {
        self.width
    }

    pub const fn height(&self) -> usize {
        self.height
    }

    pub const fn channels(&self) -> usize {
        self.color.num_components()
    }

    pub const fn bit_depth(&self) -> u8 {
        self.bit_depth
    }

    pub const fn color(&self) -> PngColor {
        self.color
    }

    pub const fn colorspace(&self) -> ColorSpace {
        self.color.colorspace()
    }

    pub const fn bytes_per_sample(&self) -> usize {
        if self.bit_depth == 16 {
            2
        } else {
            1
        }
    }

    /// Bytes in one row of `data`
    pub const fn row_bytes(&self) -> usize {
        self.width * self.channels() * self.bytes_per_sample()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Samples of row `y`, or `None` past the last row
    pub fn row(&self, y: usize) -> Option<&[u8]> {
        let row_bytes = self.row_bytes();
        self.data.get(y * row_bytes..(y + 1) * row_bytes)
    }

    pub fn palette(&self) -> Option<&PaletteTable> {
        self.palette.as_ref()
    }

    /// Resolve palette indices to 8 bit RGB samples
    ///
    /// Fails with `UnsupportedFeature` for images that are not indexed and
    /// with `InvalidPalette` for an index past the end of the palette.
    pub fn expand_palette(&self) -> Result<PixelBuffer, FormatError> {
        if self.color != PngColor::Palette {
            return Err(FormatError::UnsupportedFeature(
                "palette expansion of an image that is not indexed"
            ));
        }
        let palette = self
            .palette
            .as_ref()
            .ok_or_else(|| FormatError::InvalidPalette("indexed image without PLTE".to_string()))?;

        let mut out = vec![0; self.data.len() * 3];

        for (px, index) in out.chunks_exact_mut(3).zip(&self.data) {
            let entry = palette.get(usize::from(*index)).ok_or_else(|| {
                FormatError::InvalidPalette(format!(
                    "index {index} is outside a palette of {} entries",
                    palette.len()
                ))
            })?;
            px.copy_from_slice(&entry);
        }
        Ok(PixelBuffer {
            width:     self.width,
            height:    self.height,
            color:     PngColor::RGB,
            bit_depth: 8,
            data:      out,
            palette:   None
        })
    }
}

/// Streaming access to the scanlines of an image
///
/// Yields unfiltered scanlines in file order, pass by pass for interlaced
/// images. Call [`Scanlines::finish`] after the last one to check the rest
/// of the file.
pub struct Scanlines<'a, T: ByteSourceTrait> {
    decoder: ScanlineDecoder<InflateStage<'a, T>>,
    strict:  bool
}

impl<'a, T: ByteSourceTrait> Scanlines<'a, T> {
    /// Number of decompressed bytes the image data should have
    pub fn expected_bytes(&self) -> u64 {
        self.decoder.expected_bytes()
    }

    /// Consume the rest of the stream, up to and including IEND
    pub fn finish(self) -> Result<(), FormatError> {
        self.decoder.into_source().finish(self.strict)
    }
}

impl<'a, T: ByteSourceTrait> Iterator for Scanlines<'a, T> {
    type Item = Result<Scanline, FormatError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.decoder.next()
    }
}

/// A png decoder
///
/// Headers are read lazily, the first call needing them (or an explicit
/// [`PngDecoder::decode_headers`]) reads chunks up to the first IDAT.
///
/// # Example
/// ```no_run
/// use pngr::PngDecoder;
/// use pngr_core::bytestream::ByteCursor;
///
/// let data = std::fs::read("image.png").unwrap();
/// let mut decoder = PngDecoder::new(ByteCursor::new(data));
/// let pixels = decoder.decode_raw().unwrap();
/// println!("{}x{}", pixels.width(), pixels.height());
/// ```
pub struct PngDecoder<T: ByteSourceTrait> {
    source:          Option<T>,
    stream:          Option<ChunkStream<T>>,
    options:         DecoderOptions,
    info:            Option<ImageDescriptor>,
    palette:         Option<PaletteTable>,
    first_idat:      Option<Vec<u8>>,
    decoded_headers: bool,
    consumed:        bool
}

impl<T: ByteSourceTrait> PngDecoder<T> {
    pub fn new(source: T) -> PngDecoder<T> {
        PngDecoder::new_with_options(source, DecoderOptions::default())
    }

    pub fn new_with_options(source: T, options: DecoderOptions) -> PngDecoder<T> {
        PngDecoder {
            source: Some(source),
            stream: None,
            options,
            info: None,
            palette: None,
            first_idat: None,
            decoded_headers: false,
            consumed: false
        }
    }

    pub const fn options(&self) -> &DecoderOptions {
        &self.options
    }

    /// Read chunks up to the first IDAT, validating IHDR and PLTE
    pub fn decode_headers(&mut self) -> Result<(), FormatError> {
        if self.decoded_headers {
            return Ok(());
        }
        let source = self.source.take().ok_or(FormatError::UnsupportedFeature(
            "headers can only be decoded once, an earlier attempt failed"
        ))?;
        let stream = self
            .stream
            .insert(ChunkStream::new(source, self.options)?);

        loop {
            match stream.next_chunk()? {
                Some(Chunk::Ihdr(descriptor)) => {
                    check_limits(&descriptor, &self.options)?;
                    self.info = Some(descriptor);
                }
                Some(Chunk::Plte(palette)) => {
                    self.palette = Some(palette);
                }
                Some(Chunk::Idat(data)) => {
                    self.first_idat = Some(data);
                    break;
                }
                // ordering rules reject IEND before IDAT, unknowns are kept by the stream
                Some(Chunk::Iend) | Some(Chunk::Unknown(_)) => continue,
                None => {
                    return Err(FormatError::Truncated {
                        what:     "image data",
                        offset:   stream.position(),
                        expected: MIN_CHUNK_SIZE as u64,
                        found:    0
                    });
                }
            }
        }
        let info = self.info.ok_or_else(|| {
            FormatError::InvalidHeader("no IHDR chunk before image data".to_string())
        })?;

        match (info.color.palette_rule(), &self.palette) {
            (PaletteRule::Required, None) => {
                return Err(FormatError::InvalidPalette(
                    "indexed image without a PLTE chunk".to_string()
                ));
            }
            (PaletteRule::Forbidden, Some(_)) => {
                return Err(FormatError::InvalidPalette(format!(
                    "PLTE chunk is not allowed for color type {:?}",
                    info.color
                )));
            }
            (_, Some(palette)) => palette.validate_for(&info)?,
            _ => ()
        }
        self.decoded_headers = true;

        Ok(())
    }

    /// Width and height, `None` before the headers are decoded
    pub const fn get_dimensions(&self) -> Option<(usize, usize)> {
        match &self.info {
            Some(info) if self.decoded_headers => Some((info.width as usize, info.height as usize)),
            _ => None
        }
    }

    /// Bit depth as stored in IHDR
    pub const fn get_depth(&self) -> Option<u8> {
        match &self.info {
            Some(info) if self.decoded_headers => Some(info.bit_depth),
            _ => None
        }
    }

    pub const fn get_colorspace(&self) -> Option<ColorSpace> {
        match &self.info {
            Some(info) if self.decoded_headers => Some(info.colorspace()),
            _ => None
        }
    }

    pub const fn get_info(&self) -> Option<&ImageDescriptor> {
        match &self.info {
            Some(info) if self.decoded_headers => Some(info),
            _ => None
        }
    }

    pub const fn palette(&self) -> Option<&PaletteTable> {
        self.palette.as_ref()
    }

    /// Every chunk framed so far, in file order
    pub fn chunk_infos(&self) -> &[ChunkInfo] {
        match &self.stream {
            Some(stream) => stream.infos(),
            None => &[]
        }
    }

    /// Ancillary chunks this decoder does not interpret, in file order
    pub fn ancillary_chunks(&self) -> &[RawChunk] {
        match &self.stream {
            Some(stream) => stream.ancillary(),
            None => &[]
        }
    }

    /// Start streaming scanlines
    ///
    /// The image data can be walked once, a second call fails.
    pub fn scanlines(&mut self) -> Result<Scanlines<'_, T>, FormatError> {
        self.decode_headers()?;

        if self.consumed {
            return Err(FormatError::UnsupportedFeature(
                "image data can only be decoded once"
            ));
        }
        let info = self.info.ok_or_else(|| {
            FormatError::InvalidHeader("no IHDR chunk before image data".to_string())
        })?;
        let first = self.first_idat.take().unwrap_or_default();
        let strict = self.options.get_strict_mode();
        let limit = self.options.get_deflate_limit();

        let stream = self.stream.as_mut().ok_or(FormatError::UnsupportedFeature(
            "headers were not decoded"
        ))?;
        self.consumed = true;

        let stage = InflateStage::new(IdatReader::new(stream, first), limit);

        Ok(Scanlines {
            decoder: ScanlineDecoder::new(&info, stage),
            strict
        })
    }

    /// Decode the image into a [`PixelBuffer`]
    pub fn decode_raw(&mut self) -> Result<PixelBuffer, FormatError> {
        self.decode_headers()?;

        let info = self.info.ok_or_else(|| {
            FormatError::InvalidHeader("no IHDR chunk before image data".to_string())
        })?;
        let geometry = info.geometry();
        let width = info.width as usize;
        let height = info.height as usize;
        let pixel_bytes = geometry.channels * geometry.bytes_per_sample();

        let row_bytes = width
            .checked_mul(pixel_bytes)
            .ok_or(FormatError::LimitExceeded {
                what:  "row size",
                limit: usize::MAX,
                found: width
            })?;
        let image_bytes = row_bytes
            .checked_mul(height)
            .ok_or(FormatError::LimitExceeded {
                what:  "image size",
                limit: usize::MAX,
                found: height
            })?;

        let mut data = vec![0_u8; image_bytes];
        let mut pass_row = Vec::new();

        let mut scanlines = self.scanlines()?;

        for scanline in scanlines.by_ref() {
            let scanline = scanline?;

            match scanline.pass {
                None => {
                    let out = &mut data[scanline.row * row_bytes..][..row_bytes];
                    unpack_row(&scanline.data, &geometry, width, out);
                }
                Some(pass) => {
                    pass_row.resize(scanline.width * pixel_bytes, 0);
                    unpack_row(&scanline.data, &geometry, scanline.width, &mut pass_row);

                    let (_, y) = pass.to_image(0, scanline.row);
                    let image_row = &mut data[y * row_bytes..][..row_bytes];

                    scatter_pixels(
                        &pass_row,
                        image_row,
                        pixel_bytes,
                        pass.x_start(),
                        pass.x_step()
                    );
                }
            }
        }
        scanlines.finish()?;

        info!("Decoded {} bytes of samples", data.len());

        Ok(PixelBuffer {
            width,
            height,
            color: info.color,
            bit_depth: info.bit_depth,
            data,
            palette: self.palette.clone()
        })
    }

    /// Decode the image, combining 16 bit samples into `u16`s
    pub fn decode(&mut self) -> Result<DecodingResult, FormatError> {
        let pixels = self.decode_raw()?;

        if pixels.bit_depth() == 16 {
            let samples = pixels
                .data()
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();

            return Ok(DecodingResult::U16(samples));
        }
        Ok(DecodingResult::U8(pixels.into_data()))
    }

    /// Return the byte source, `None` if it was lost to a failed signature check
    pub fn into_inner(self) -> Option<T> {
        match self.stream {
            Some(stream) => Some(stream.into_inner()),
            None => self.source
        }
    }
}

fn check_limits(descriptor: &ImageDescriptor, options: &DecoderOptions) -> Result<(), FormatError> {
    let width = descriptor.width as usize;
    let height = descriptor.height as usize;

    if width > options.get_max_width() {
        return Err(FormatError::LimitExceeded {
            what:  "width",
            limit: options.get_max_width(),
            found: width
        });
    }
    if height > options.get_max_height() {
        return Err(FormatError::LimitExceeded {
            what:  "height",
            limit: options.get_max_height(),
            found: height
        });
    }
    Ok(())
}
