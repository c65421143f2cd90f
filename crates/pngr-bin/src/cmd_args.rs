/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use clap::{value_parser, Arg, ArgAction, Command};

#[rustfmt::skip]
pub fn create_cmd_args() -> Command {
    Command::new("pngr")
        .about("Inspect and decode png files")
        .arg(Arg::new("in")
            .short('i')
            .help("Input file to read data from")
            .long("input")
            .action(ArgAction::Append)
            .required(true))
        .arg(Arg::new("chunks")
            .long("chunks")
            .action(ArgAction::SetTrue)
            .help_heading("ACTIONS")
            .help("List every chunk with its offset, length and crc"))
        .arg(Arg::new("probe")
            .long("probe")
            .action(ArgAction::SetTrue)
            .help_heading("ACTIONS")
            .help("Print image metadata as json"))
        .arg(Arg::new("decode")
            .long("decode")
            .action(ArgAction::SetTrue)
            .help_heading("ACTIONS")
            .help("Decode the image data and report what was decoded")
            .long_help("Decode the whole image, reconstructing every scanline.\nThis checks the zlib stream, the filters and the chunks after the image data."))
        .arg(Arg::new("no-crc")
            .long("no-crc")
            .action(ArgAction::SetTrue)
            .help_heading("ADVANCED")
            .help("Do not verify chunk crcs"))
        .arg(Arg::new("strict")
            .long("strict")
            .action(ArgAction::SetTrue)
            .help_heading("ADVANCED")
            .help("Treat recoverable irregularities as errors")
            .long_help("Treat recoverable irregularities as errors.\nThis rejects ancillary chunks between IDAT chunks and files without IEND."))
        .arg(Arg::new("max-width")
            .long("max-width")
            .help_heading("ADVANCED")
            .help("Maximum width of images to decode")
            .value_parser(value_parser!(usize)))
        .arg(Arg::new("max-height")
            .long("max-height")
            .help_heading("ADVANCED")
            .help("Maximum height of images to decode")
            .value_parser(value_parser!(usize)))
        .arg(Arg::new("debug")
            .long("debug")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display debug information and higher"))
        .arg(Arg::new("trace")
            .long("trace")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display very verbose information"))
        .arg(Arg::new("warn")
            .long("warn")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display warnings and errors"))
        .arg(Arg::new("info")
            .long("info")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display information about the decoding options"))
}

#[test]
fn verify_cmd() {
    create_cmd_args().debug_assert();
}
