/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Chunk classification and ordering
//!
//! Turns framed chunks into typed values and enforces the order in which
//! the critical chunks may appear.
use log::{trace, warn};
use pngr_core::bytestream::ByteSourceTrait;
use pngr_core::options::DecoderOptions;

use crate::chunk::{ChunkInfo, ChunkReader, ChunkType, RawChunk};
use crate::constants::IHDR_LENGTH;
use crate::error::FormatError;
use crate::headers::{ImageDescriptor, PaletteTable};

/// Borrowed view of an IHDR payload
#[derive(Copy, Clone, Debug)]
pub struct IhdrView<'a> {
    data: &'a [u8; IHDR_LENGTH]
}

impl<'a> IhdrView<'a> {
    pub fn new(data: &'a [u8]) -> Result<IhdrView<'a>, FormatError> {
        let data = data.try_into().map_err(|_| {
            FormatError::InvalidHeader(format!(
                "IHDR length is {} but should be {IHDR_LENGTH}",
                data.len()
            ))
        })?;
        Ok(IhdrView { data })
    }

    pub fn width(&self) -> u32 {
        u32::from_be_bytes([self.data[0], self.data[1], self.data[2], self.data[3]])
    }

    pub fn height(&self) -> u32 {
        u32::from_be_bytes([self.data[4], self.data[5], self.data[6], self.data[7]])
    }

    pub fn bit_depth(&self) -> u8 {
        self.data[8]
    }

    pub fn color_type(&self) -> u8 {
        self.data[9]
    }

    pub fn compression_method(&self) -> u8 {
        self.data[10]
    }

    pub fn filter_method(&self) -> u8 {
        self.data[11]
    }

    pub fn interlace_method(&self) -> u8 {
        self.data[12]
    }
}

/// Borrowed view of a PLTE payload
#[derive(Copy, Clone, Debug)]
pub struct PlteView<'a> {
    data: &'a [u8]
}

impl<'a> PlteView<'a> {
    pub fn new(data: &'a [u8]) -> Result<PlteView<'a>, FormatError> {
        if data.is_empty() || data.len() % 3 != 0 {
            return Err(FormatError::InvalidPalette(format!(
                "PLTE length {} is not a non zero multiple of 3",
                data.len()
            )));
        }
        if data.len() / 3 > 256 {
            return Err(FormatError::InvalidPalette(format!(
                "PLTE has {} entries, at most 256 are allowed",
                data.len() / 3
            )));
        }
        Ok(PlteView { data })
    }

    pub fn num_entries(&self) -> usize {
        self.data.len() / 3
    }

    pub fn entries(&self) -> impl Iterator<Item = [u8; 3]> + 'a {
        self.data
            .chunks_exact(3)
            .map(|entry| [entry[0], entry[1], entry[2]])
    }
}

/// Borrowed view of an IDAT payload
#[derive(Copy, Clone, Debug)]
pub struct IdatView<'a> {
    data: &'a [u8]
}

impl<'a> IdatView<'a> {
    pub fn data(&self) -> &'a [u8] {
        self.data
    }
}

/// A chunk seen through the typed view for its tag
#[derive(Copy, Clone, Debug)]
pub enum ChunkView<'a> {
    Ihdr(IhdrView<'a>),
    Plte(PlteView<'a>),
    Idat(IdatView<'a>),
    Iend,
    /// An ancillary chunk this decoder does not interpret
    Unknown(&'a RawChunk)
}

impl RawChunk {
    /// Classify this chunk by its tag without copying its data
    ///
    /// Unknown critical chunks are rejected, unknown ancillary chunks
    /// are passed through.
    pub fn view(&self) -> Result<ChunkView<'_>, FormatError> {
        match self.chunk_type() {
            ChunkType::IHDR => Ok(ChunkView::Ihdr(IhdrView::new(self.data())?)),
            ChunkType::PLTE => Ok(ChunkView::Plte(PlteView::new(self.data())?)),
            ChunkType::IDAT => Ok(ChunkView::Idat(IdatView { data: self.data() })),
            ChunkType::IEND => Ok(ChunkView::Iend),
            chunk if chunk.is_critical() => Err(FormatError::UnsupportedCriticalChunk {
                chunk,
                offset: self.offset()
            }),
            _ => Ok(ChunkView::Unknown(self))
        }
    }
}

/// A chunk after classification, owning whatever it needs
#[derive(Clone, Debug)]
pub enum Chunk {
    Ihdr(ImageDescriptor),
    Plte(PaletteTable),
    Idat(Vec<u8>),
    Iend,
    Unknown(RawChunk)
}

impl Chunk {
    pub fn from_raw(raw: RawChunk) -> Result<Chunk, FormatError> {
        let parsed = match raw.view()? {
            ChunkView::Ihdr(view) => Some(Chunk::Ihdr(ImageDescriptor::from_ihdr(view)?)),
            ChunkView::Plte(view) => Some(Chunk::Plte(PaletteTable::from_plte(view))),
            ChunkView::Iend => Some(Chunk::Iend),
            ChunkView::Idat(_) | ChunkView::Unknown(_) => None
        };
        // IDAT and unknown chunks take over the framed data as is
        match parsed {
            Some(chunk) => Ok(chunk),
            None if raw.chunk_type() == ChunkType::IDAT => Ok(Chunk::Idat(raw.into_data())),
            None => Ok(Chunk::Unknown(raw))
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum IdatState {
    NotSeen,
    InProgress,
    /// An ancillary chunk followed an IDAT, another IDAT would be out of order
    Interrupted,
    Finished
}

/// Tracks which chunks have been seen so far and rejects illegal orders
#[derive(Copy, Clone, Debug)]
pub struct ChunkSequence {
    seen_ihdr: bool,
    seen_plte: bool,
    seen_iend: bool,
    idat:      IdatState,
    strict:    bool
}

impl ChunkSequence {
    pub fn new(strict: bool) -> ChunkSequence {
        ChunkSequence {
            seen_ihdr: false,
            seen_plte: false,
            seen_iend: false,
            idat: IdatState::NotSeen,
            strict
        }
    }

    pub const fn seen_iend(&self) -> bool {
        self.seen_iend
    }

    /// Record that `info` is the next chunk of the stream
    pub fn observe(&mut self, info: &ChunkInfo) -> Result<(), FormatError> {
        let violation = |reason| FormatError::ChunkOrderViolation {
            chunk: info.chunk_type,
            offset: info.offset,
            reason
        };

        if self.seen_iend {
            return Err(violation("chunk after IEND"));
        }
        if !self.seen_ihdr && info.chunk_type != ChunkType::IHDR {
            return Err(violation("IHDR must be the first chunk"));
        }
        match info.chunk_type {
            ChunkType::IHDR => {
                if self.seen_ihdr {
                    return Err(violation("multiple IHDR chunks"));
                }
                self.seen_ihdr = true;
            }
            ChunkType::PLTE => {
                if self.idat != IdatState::NotSeen {
                    return Err(violation("PLTE after IDAT"));
                }
                if self.seen_plte {
                    return Err(violation("multiple PLTE chunks"));
                }
                self.seen_plte = true;
            }
            ChunkType::IDAT => {
                if self.idat == IdatState::Interrupted {
                    if self.strict {
                        return Err(violation("IDAT chunks are not contiguous"));
                    }
                    warn!(
                        "IDAT at offset {} follows an ancillary chunk, IDAT chunks should be contiguous",
                        info.offset
                    );
                }
                self.idat = IdatState::InProgress;
            }
            ChunkType::IEND => {
                if self.idat == IdatState::NotSeen {
                    return Err(violation("IEND before any IDAT"));
                }
                self.idat = IdatState::Finished;
                self.seen_iend = true;
            }
            _ => {
                if self.idat == IdatState::InProgress {
                    self.idat = IdatState::Interrupted;
                }
            }
        }
        Ok(())
    }
}

/// Chunk framer, classifier and order tracker stacked together
///
/// Every chunk pulled through here is recorded in `infos`, unknown
/// ancillary chunks are retained for the caller.
pub(crate) struct ChunkStream<T: ByteSourceTrait> {
    reader:    ChunkReader<T>,
    sequence:  ChunkSequence,
    infos:     Vec<ChunkInfo>,
    ancillary: Vec<RawChunk>
}

impl<T: ByteSourceTrait> ChunkStream<T> {
    pub fn new(source: T, options: DecoderOptions) -> Result<ChunkStream<T>, FormatError> {
        Ok(ChunkStream {
            reader:    ChunkReader::new_with_options(source, options)?,
            sequence:  ChunkSequence::new(options.get_strict_mode()),
            infos:     Vec::new(),
            ancillary: Vec::new()
        })
    }

    pub fn infos(&self) -> &[ChunkInfo] {
        &self.infos
    }

    pub fn ancillary(&self) -> &[RawChunk] {
        &self.ancillary
    }

    pub fn seen_iend(&self) -> bool {
        self.sequence.seen_iend()
    }

    /// Offset of the next chunk in the file
    pub fn position(&self) -> u64 {
        self.reader.position()
    }

    pub fn into_inner(self) -> T {
        self.reader.into_inner()
    }

    /// Pull the next chunk, returning `None` once the source is exhausted
    ///
    /// Unknown ancillary chunks are stored and not returned.
    pub fn next_chunk(&mut self) -> Result<Option<Chunk>, FormatError> {
        loop {
            if self.reader.is_exhausted() {
                return Ok(None);
            }
            let raw = self.reader.next_chunk()?;
            let info = raw.info();
            let chunk = Chunk::from_raw(raw)?;

            self.sequence.observe(&info)?;
            self.infos.push(info);

            match chunk {
                Chunk::Unknown(raw) => {
                    trace!("Keeping ancillary chunk {}", raw.chunk_type());
                    self.ancillary.push(raw);
                }
                chunk => return Ok(Some(chunk))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::chunk::{ChunkInfo, ChunkType, RawChunk};
    use crate::error::FormatError;
    use crate::registry::{ChunkSequence, ChunkView};

    fn info(tag: &[u8; 4]) -> ChunkInfo {
        ChunkInfo {
            offset:     0,
            chunk_type: ChunkType(*tag),
            length:     0,
            crc:        0
        }
    }

    fn run(tags: &[&[u8; 4]], strict: bool) -> Result<(), FormatError> {
        let mut sequence = ChunkSequence::new(strict);
        for tag in tags {
            sequence.observe(&info(tag))?;
        }
        Ok(())
    }

    #[test]
    fn accepts_regular_order() {
        run(&[b"IHDR", b"gAMA", b"PLTE", b"IDAT", b"IDAT", b"tEXt", b"IEND"], true).unwrap();
    }

    #[test]
    fn rejects_bad_orders() {
        for tags in [
            &[b"IDAT", b"IHDR"][..],
            &[b"IHDR", b"IHDR"][..],
            &[b"IHDR", b"IDAT", b"PLTE"][..],
            &[b"IHDR", b"PLTE", b"PLTE"][..],
            &[b"IHDR", b"IEND"][..],
            &[b"IHDR", b"IDAT", b"IEND", b"tEXt"][..]
        ] {
            assert!(matches!(
                run(tags, false),
                Err(FormatError::ChunkOrderViolation { .. })
            ));
        }
    }

    #[test]
    fn ancillary_between_idat_only_rejected_when_strict() {
        let tags = [b"IHDR", b"IDAT", b"tEXt", b"IDAT", b"IEND"];
        assert!(run(&tags, false).is_ok());
        assert!(matches!(
            run(&tags, true),
            Err(FormatError::ChunkOrderViolation { .. })
        ));
    }

    #[test]
    fn unknown_critical_chunk_is_rejected() {
        let raw = RawChunk::new(33, ChunkType(*b"ABCD"), vec![], 0);
        assert!(matches!(
            raw.view(),
            Err(FormatError::UnsupportedCriticalChunk { offset: 33, .. })
        ));

        let raw = RawChunk::new(33, ChunkType(*b"abCD"), vec![1], 0);
        assert!(matches!(raw.view(), Ok(ChunkView::Unknown(_))));
    }
}
