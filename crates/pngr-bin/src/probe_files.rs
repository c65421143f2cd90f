/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::ffi::OsStr;

use log::warn;
use pngr::error::FormatError;

use crate::file_io::{file_size, FileDecoder};
use crate::serde::Metadata;

/// Print the metadata of a file whose headers were decoded, as json
pub fn probe_file(in_file: &OsStr, decoder: &FileDecoder) -> Result<(), FormatError> {
    let size = file_size(in_file)?;

    let info = match decoder.get_info() {
        Some(info) => info,
        None => {
            warn!("Headers of {:?} were not decoded, nothing to probe", in_file);
            return Ok(());
        }
    };
    let metadata = Metadata::new(
        in_file.to_os_string(),
        size,
        info,
        decoder.palette(),
        decoder.chunk_infos()
    );

    match serde_json::to_string_pretty(&metadata) {
        Ok(json) => println!("{json}"),
        Err(err) => warn!("Could not serialize metadata of {:?}: {}", in_file, err)
    }
    Ok(())
}

/// Print one line per chunk framed so far
pub fn list_chunks(in_file: &OsStr, decoder: &FileDecoder) {
    println!("{}:", in_file.to_string_lossy());

    for info in decoder.chunk_infos() {
        let kind = if info.chunk_type.is_critical() {
            "critical"
        } else {
            "ancillary"
        };
        println!(
            "  {:>10}  {}  {:>10}  {:08x}  {}",
            info.offset, info.chunk_type, info.length, info.crc, kind
        );
    }
}
