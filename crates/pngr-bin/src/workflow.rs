/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::ffi::OsStr;
use std::time::Instant;

use clap::ArgMatches;
use log::{debug, info};
use pngr::error::FormatError;

use crate::cmd_parsers::global_options::CmdOptions;
use crate::file_io::{open_decoder, FileDecoder};
use crate::probe_files::{list_chunks, probe_file};

/// Run the requested actions on every input file, in command line order
pub fn run_on_inputs(args: &ArgMatches, options: &CmdOptions) -> Result<(), FormatError> {
    let inputs = match args.get_raw("in") {
        Some(inputs) => inputs,
        None => return Ok(())
    };
    for in_file in inputs {
        info!("Processing {:?}", in_file);
        run_on_file(in_file, options)?;
    }
    Ok(())
}

fn run_on_file(in_file: &OsStr, options: &CmdOptions) -> Result<(), FormatError> {
    let mut decoder = open_decoder(in_file, options.decoder_options)?;

    decoder.decode_headers()?;

    if options.decode {
        decode_file(in_file, &mut decoder)?;
    }
    if options.list_chunks {
        list_chunks(in_file, &decoder);
    }
    if options.probe {
        probe_file(in_file, &decoder)?;
    }
    if options.no_action() {
        if let Some(info) = decoder.get_info() {
            println!(
                "{}: {}x{}, {:?}, {} bit, {:?}",
                in_file.to_string_lossy(),
                info.width,
                info.height,
                info.color,
                info.bit_depth,
                info.interlace_method
            );
        }
    }
    Ok(())
}

fn decode_file(in_file: &OsStr, decoder: &mut FileDecoder) -> Result<(), FormatError> {
    let start = Instant::now();
    let pixels = decoder.decode_raw()?;

    debug!("Decoding took {} ms", start.elapsed().as_millis());

    println!(
        "{}: decoded {}x{} pixels, {} channels, {} bit, {} bytes of samples",
        in_file.to_string_lossy(),
        pixels.width(),
        pixels.height(),
        pixels.channels(),
        pixels.bit_depth(),
        pixels.data().len()
    );
    Ok(())
}
