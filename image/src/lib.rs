// Distributed under The MIT License (MIT)
//
// Copyright (c) 2019, 2020 The `image-rs` developers
//! Shared image storage for a software OpenGL ES renderer, and the uploads into it.
//!
//! An [`Image`] is a reference counted block of storage in one of the renderer's internal
//! formats. Client pixel data is written into it by transcoding each row from the client's
//! encoding, as located by the unpack parameters, into the storage encoding. Descriptions for
//! which no direct transcoding exists are handed to a [`Blitter`] instead.
//!
//! # Usage
//!
//! ```
//! use gles_format::{ClientFormat, ClientType, UnpackParameters};
//! use gles_image::{Blitter, Extent, Image, Rect, Region, SourceSurface, Upload};
//!
//! struct NoBlit;
//!
//! impl Blitter for NoBlit {
//!     fn blit(&self, _: &SourceSurface<'_>, _: Rect, _: &Image, _: Rect) {}
//! }
//!
//! let (format, ty) = (ClientFormat::Rgb, ClientType::UnsignedByte);
//! let image = Image::with_client_storage(2, 2, format, ty, 2)?;
//!
//! // Rows of 6 bytes, padded to 8 by the default alignment.
//! let pixels = [1, 2, 3, 4, 5, 6, 0, 0, 7, 8, 9, 10, 11, 12];
//! let region = Region::with_extent(Extent::new(2, 2, 1));
//! let unpack = UnpackParameters::default();
//!
//! let upload = image.upload_region(&NoBlit, region, format, ty, &unpack, &pixels);
//! assert_eq!(upload, Upload::Direct);
//!
//! // Stored with an opaque fourth channel.
//! let lock = image.lock(Default::default(), gles_image::Access::ReadOnly).unwrap();
//! assert_eq!(&lock.bytes()[..8], &[1, 2, 3, 0xff, 4, 5, 6, 0xff]);
//! # Ok::<(), gles_image::LayoutError>(())
//! ```
#![deny(unsafe_code)]

mod bits;
mod blit;
mod image;
mod layout;
mod region;
mod texture;
mod transcode;


pub use self::bits::{expand_4444, expand_5551, r11g11b10f_to_half, rgb9e5_to_half};
pub use self::blit::{Blitter, SourceSurface};
pub use self::image::{Access, Image, ImageLock, Release, Upload};
pub use self::layout::{ImageKind, LayoutError, StorageLayout};
pub use self::region::{Extent, Offset, Rect, Region};
pub use self::texture::Texture;
pub use self::transcode::{copy_blocks, transcode, Dispatch, PixelLayout, Strides};
