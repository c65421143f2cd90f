/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use clap::ArgMatches;
use pngr_core::options::DecoderOptions;

pub mod global_options;

pub fn get_decoder_options(options: &ArgMatches) -> DecoderOptions {
    let confirm_crc = !options.get_flag("no-crc");
    let strict_mode = options.get_flag("strict");

    let mut decoder_options = DecoderOptions::new_cmd()
        .set_confirm_crc(confirm_crc)
        .set_strict_mode(strict_mode);

    if let Some(width) = options.get_one::<usize>("max-width") {
        decoder_options = decoder_options.set_max_width(*width);
    }
    if let Some(height) = options.get_one::<usize>("max-height") {
        decoder_options = decoder_options.set_max_height(*height);
    }
    decoder_options
}
