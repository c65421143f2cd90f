/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::ffi::OsString;

use pngr::{ChunkInfo, ImageDescriptor, InterlaceMethod, PaletteTable};
use serde::ser::{SerializeSeq, SerializeStruct};
use serde::{Serialize, Serializer};

pub struct Metadata<'a> {
    file:    OsString,
    size:    u64,
    info:    &'a ImageDescriptor,
    palette: Option<&'a PaletteTable>,
    chunks:  &'a [ChunkInfo]
}

impl<'a> Metadata<'a> {
    pub fn new(
        file: OsString, size: u64, info: &'a ImageDescriptor, palette: Option<&'a PaletteTable>,
        chunks: &'a [ChunkInfo]
    ) -> Metadata<'a> {
        Metadata {
            file,
            size,
            info,
            palette,
            chunks
        }
    }
}

impl<'a> Serialize for Metadata<'a> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        let mut state = serializer.serialize_struct("Metadata", 11)?;

        state.serialize_field("file", &self.file.to_string_lossy())?;
        state.serialize_field("file_size", &self.size)?;
        state.serialize_field("width", &self.info.width)?;
        state.serialize_field("height", &self.info.height)?;
        state.serialize_field("bit_depth", &self.info.bit_depth)?;
        state.serialize_field("color_type", &self.info.color.to_int())?;
        state.serialize_field("colorspace", &self.info.colorspace())?;
        state.serialize_field("channels", &self.info.colorspace().num_components())?;
        state.serialize_field("alpha", &self.info.colorspace().has_alpha())?;
        state.serialize_field(
            "interlaced",
            &(self.info.interlace_method == InterlaceMethod::Adam7)
        )?;
        state.serialize_field("palette_entries", &self.palette.map(|p| p.len()))?;
        state.serialize_field("chunks", &Chunks(self.chunks))?;

        state.end()
    }
}

struct Chunks<'a>(&'a [ChunkInfo]);

impl<'a> Serialize for Chunks<'a> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;

        for info in self.0 {
            seq.serialize_element(&Chunk(info))?;
        }
        seq.end()
    }
}

struct Chunk<'a>(&'a ChunkInfo);

impl<'a> Serialize for Chunk<'a> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        let mut state = serializer.serialize_struct("Chunk", 4)?;

        state.serialize_field("type", &self.0.chunk_type.to_string())?;
        state.serialize_field("offset", &self.0.offset)?;
        state.serialize_field("length", &self.0.length)?;
        state.serialize_field("crc", &format!("{:08x}", self.0.crc))?;

        state.end()
    }
}
