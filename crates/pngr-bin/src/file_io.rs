/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::ffi::OsStr;
use std::fs::File;
use std::io::BufReader;

use pngr::error::FormatError;
use pngr::PngDecoder;
use pngr_core::bytestream::ByteIoError;
use pngr_core::options::DecoderOptions;

pub type FileDecoder = PngDecoder<BufReader<File>>;

/// Open `file_path` and wrap it in a decoder
pub fn open_decoder(file_path: &OsStr, options: DecoderOptions) -> Result<FileDecoder, FormatError> {
    let file = File::open(file_path).map_err(ByteIoError::from)?;

    Ok(PngDecoder::new_with_options(BufReader::new(file), options))
}

/// Size of the file at `file_path` in bytes
pub fn file_size(file_path: &OsStr) -> Result<u64, FormatError> {
    let metadata = std::fs::metadata(file_path).map_err(ByteIoError::from)?;
    Ok(metadata.len())
}
