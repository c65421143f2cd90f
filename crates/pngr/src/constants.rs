/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

/// The first eight bytes of every png file
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Length + type + crc, the size of a chunk without data
pub const MIN_CHUNK_SIZE: usize = 12;

/// Largest length a chunk may declare
pub const MAX_CHUNK_LENGTH: u32 = (1 << 31) - 1;

/// Size of the IHDR payload
pub const IHDR_LENGTH: usize = 13;

// Adam7 pass geometry, x-start, y-start, x-step, y-step for each pass
pub const ADAM7_XORIG: [usize; 7] = [0, 4, 0, 2, 0, 1, 0];
pub const ADAM7_YORIG: [usize; 7] = [0, 0, 4, 0, 2, 0, 1];
pub const ADAM7_XSPC: [usize; 7] = [8, 8, 4, 4, 2, 2, 1];
pub const ADAM7_YSPC: [usize; 7] = [8, 8, 8, 4, 4, 2, 2];
