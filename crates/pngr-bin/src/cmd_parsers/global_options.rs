/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use clap::ArgMatches;
use log::{info, Level};
use pngr_core::options::DecoderOptions;

use crate::cmd_parsers::get_decoder_options;

#[derive(Debug, Copy, Clone)]
pub struct CmdOptions {
    pub list_chunks:     bool,
    pub probe:           bool,
    pub decode:          bool,
    pub decoder_options: DecoderOptions
}

impl CmdOptions {
    pub fn new() -> CmdOptions {
        CmdOptions {
            list_chunks:     false,
            probe:           false,
            decode:          false,
            decoder_options: DecoderOptions::new_cmd()
        }
    }

    /// True if no action was requested on the command line
    pub const fn no_action(&self) -> bool {
        !(self.list_chunks || self.probe || self.decode)
    }
}

pub fn parse_options(options: &ArgMatches) -> CmdOptions {
    let mut cmd_options = CmdOptions::new();

    cmd_options.list_chunks = options.get_flag("chunks");
    cmd_options.probe = options.get_flag("probe");
    cmd_options.decode = options.get_flag("decode");
    cmd_options.decoder_options = get_decoder_options(options);

    if !cmd_options.decoder_options.get_confirm_crc() {
        info!("Chunk crc verification disabled");
    }
    if cmd_options.decoder_options.get_strict_mode() {
        info!("Strict mode enabled");
    }
    cmd_options
}

/// Set up logging options
pub fn setup_logger(options: &ArgMatches) {
    let log_level;

    if options.get_flag("debug") {
        log_level = Level::Debug;
    } else if options.get_flag("trace") {
        log_level = Level::Trace;
    } else if options.get_flag("warn") {
        log_level = Level::Warn
    } else if options.get_flag("info") {
        log_level = Level::Info;
    } else {
        log_level = Level::Warn;
    }

    if let Err(err) = simple_logger::init_with_level(log_level) {
        eprintln!("Could not set up logging: {err}");
    }

    info!("Initialized logger");
    info!("Log level :{}", log_level);
}
