// Distributed under The MIT License (MIT)
//
// Copyright (c) 2019, 2020 The `image-rs` developers
//! # Formats
//!
//! Classification and sizing of client pixel data for a software OpenGL ES image path.
//!
//! A client hands over pixels as a `(format, type)` pair of tags and a handful of unpack
//! parameters. Before any byte is touched, a number of questions have to be answered:
//!
//! - How large is a single client pixel, and how far apart are the rows?
//! - At which byte does the addressed sub-region start?
//! - Which format will the renderer store the data in, and which format reproduces the client's
//!   bytes exactly when the data has to take a detour through a generic blit?
//! - For compressed data, how many bytes does a block row take?
//!
//! This crate answers them with pure functions over closed enumerations, and is strictly
//! `no_std`. The actual transcoding of bytes happens elsewhere.
//!
//! ## Usage
//!
//! ```
//! use gles_format::{compute_packing_offset, compute_pitch, resolve_storage_format};
//! use gles_format::{ClientFormat, ClientType, InternalFormat, UnpackParameters};
//!
//! let unpack = UnpackParameters { skip_rows: 1, ..UnpackParameters::default() };
//! let (format, ty) = (ClientFormat::Rgb, ClientType::UnsignedByte);
//!
//! // Three bytes per pixel, rows aligned to four bytes.
//! assert_eq!(compute_pitch(3, format, ty, unpack.alignment), 12);
//! assert_eq!(compute_packing_offset(format, ty, 3, 3, &unpack), 12);
//! // Stored with a fourth, opaque lane.
//! assert_eq!(resolve_storage_format(format, ty), InternalFormat::X8B8G8R8);
//! ```
#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

mod client;
mod internal;
mod packing;
mod resolve;

pub use self::client::{AstcBlock, BlockSize, ClientFormat, ClientType, CompressedFormat};
pub use self::internal::InternalFormat;
pub use self::packing::{
    align_up, compute_packing_offset, compute_pitch, BadAlignmentError, UnpackParameters,
};
pub use self::resolve::{
    compressed_block_bytes, compressed_row_bytes, pixel_byte_size, resolve_storage_format,
    resolve_transfer_format, try_pixel_byte_size, try_resolve_storage_format,
    try_resolve_transfer_format,
};
