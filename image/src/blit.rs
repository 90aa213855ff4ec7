//! The generic blit, used for uploads that have no direct transcoding.
use gles_format::InternalFormat;

use crate::image::Image;
use crate::region::{Extent, Rect};
use crate::transcode::Strides;

/// A read-only view of client pixels, described in the format that reproduces them exactly.
#[derive(Clone, Copy, Debug)]
pub struct SourceSurface<'data> {
    bytes: &'data [u8],
    extent: Extent,
    format: InternalFormat,
    strides: Strides,
}

/// Converts and copies a rectangle of pixels into an image.
///
/// Implementations lock the destination for writing themselves, so the image is never locked
/// when `blit` is called.
pub trait Blitter {
    fn blit(&self, source: &SourceSurface<'_>, source_rect: Rect, dest: &Image, dest_rect: Rect);
}

impl<'data> SourceSurface<'data> {
    /// Describe client bytes, starting at the first pixel of the region.
    pub fn new(
        bytes: &'data [u8],
        extent: Extent,
        format: InternalFormat,
        strides: Strides,
    ) -> Self {
        SourceSurface {
            bytes,
            extent,
            format,
            strides,
        }
    }

    pub fn bytes(&self) -> &'data [u8] {
        self.bytes
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn format(&self) -> InternalFormat {
        self.format
    }

    pub fn strides(&self) -> Strides {
        self.strides
    }

    /// The bytes of row `y` in slice `z`, or `None` if the client buffer ends before it.
    pub fn row(&self, y: u32, z: u32) -> Option<&'data [u8]> {
        let start = z as usize * self.strides.slice + y as usize * self.strides.pitch;
        let len = self.extent.width as usize * self.format.bytes()?;
        self.bytes.get(start..start.checked_add(len)?)
    }
}
