/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A simple implementation of a seekable bytestream reader
//!
//! The decoder only ever needs two things from its input, reading `n` bytes
//! and seeking back to a saved position, so that is all this module asks for.
//! In memory buffers should use [`ByteCursor`], files can be wrapped in a
//! [`BufReader`](std::io::BufReader).
pub use reader::cursor::ByteCursor;
pub use reader::{ByteIoError, ByteReader, ByteSeekFrom};
pub use traits::ByteSourceTrait;

mod reader;
mod traits;
