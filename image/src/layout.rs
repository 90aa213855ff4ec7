//! The byte layout of image storage.
use gles_format::{ClientFormat, ClientType, InternalFormat};

use crate::region::Offset;
use crate::transcode::Strides;

/// How an image came to be, deciding where its dimensions and format come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageKind {
    /// Storage of a texture level, described by the client format and type.
    Texture,
    /// Storage shaped after a client supplied pitch.
    ClientStorage,
    /// Renderer internal storage, such as a render target, described by its internal format.
    RenderTarget,
}

/// Error that occurs when computing the layout of an image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum LayoutError {
    #[error("image of {width}x{height}x{depth} pixels is empty")]
    Empty { width: u32, height: u32, depth: u32 },
    #[error("image of {width}x{height}x{depth} pixels does not fit into memory")]
    TooLarge { width: u32, height: u32, depth: u32 },
    #[error("pitch of {pitch} pixels is narrower than the width of {width} pixels")]
    NarrowPitch { pitch: u32, width: u32 },
    #[error("no storage format for {format:?}/{ty:?}")]
    Unsupported { format: ClientFormat, ty: ClientType },
}

/// The byte layout of the planes of one image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StorageLayout {
    pub(crate) internal: InternalFormat,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) depth: u32,
    /// Strides of the primary plane.
    pub(crate) strides: Strides,
    /// Strides of the stencil plane, one byte per pixel.
    pub(crate) stencil: Option<Strides>,
}

impl StorageLayout {
    /// A layout with the natural pitch of the format.
    ///
    /// Rows are padded to an even number of pixels. Compressed formats store rows of blocks
    /// instead, with partial blocks padded to full blocks.
    pub fn new(
        internal: InternalFormat,
        width: u32,
        height: u32,
        depth: u32,
    ) -> Result<Self, LayoutError> {
        let padded = width.checked_next_multiple_of(2);
        Self::with_pitch(internal, width, height, depth, padded)
    }

    /// A layout with rows `pitch` pixels apart.
    pub fn with_client_pitch(
        internal: InternalFormat,
        width: u32,
        height: u32,
        pitch: u32,
    ) -> Result<Self, LayoutError> {
        if pitch < width {
            return Err(LayoutError::NarrowPitch { pitch, width });
        }

        Self::with_pitch(internal, width, height, 1, Some(pitch))
    }

    fn with_pitch(
        internal: InternalFormat,
        width: u32,
        height: u32,
        depth: u32,
        pitch: Option<u32>,
    ) -> Result<Self, LayoutError> {
        let too_large = LayoutError::TooLarge {
            width,
            height,
            depth,
        };

        if width == 0 || height == 0 || depth == 0 {
            return Err(LayoutError::Empty {
                width,
                height,
                depth,
            });
        }

        let pitch = pitch.ok_or(too_large)? as usize;

        let (pitch_bytes, rows) = match internal {
            InternalFormat::Compressed(format) => {
                // Blocks already pad the rows.
                let block = format.block();
                let blocks = width.div_ceil(block.width) as usize;
                let row = blocks.checked_mul(block.bytes as usize).ok_or(too_large)?;
                (row, height.div_ceil(block.height) as usize)
            }
            _ => {
                let bytes = internal.bytes().ok_or(too_large)?;
                (pitch.checked_mul(bytes).ok_or(too_large)?, height as usize)
            }
        };

        let strides = plane_strides(pitch_bytes, rows, depth).ok_or(too_large)?;
        let stencil = if internal.has_stencil() {
            Some(plane_strides(pitch, height as usize, depth).ok_or(too_large)?)
        } else {
            None
        };

        Ok(StorageLayout {
            internal,
            width,
            height,
            depth,
            strides,
            stencil,
        })
    }

    pub fn internal_format(&self) -> InternalFormat {
        self.internal
    }

    pub fn strides(&self) -> Strides {
        self.strides
    }

    pub fn stencil_strides(&self) -> Option<Strides> {
        self.stencil
    }

    /// Bytes of the primary plane.
    pub fn byte_len(&self) -> usize {
        self.strides.slice * self.depth as usize
    }

    /// Bytes of the stencil plane, if any.
    pub fn stencil_len(&self) -> Option<usize> {
        Some(self.stencil?.slice * self.depth as usize)
    }

    /// The byte offset of a pixel in the primary plane, or `None` outside of the image.
    pub(crate) fn offset_of(&self, at: Offset) -> Option<usize> {
        if !self.contains(at) {
            return None;
        }

        let (column, row) = match self.internal {
            InternalFormat::Compressed(format) => {
                let block = format.block();
                let column = (at.x / block.width) as usize * block.bytes as usize;
                (column, (at.y / block.height) as usize)
            }
            _ => {
                let bytes = self.internal.bytes()?;
                (at.x as usize * bytes, at.y as usize)
            }
        };

        Some(at.z as usize * self.strides.slice + row * self.strides.pitch + column)
    }

    /// The byte offset of a pixel in the stencil plane.
    pub(crate) fn stencil_offset_of(&self, at: Offset) -> Option<usize> {
        let strides = self.stencil?;
        if !self.contains(at) {
            return None;
        }

        Some(at.z as usize * strides.slice + at.y as usize * strides.pitch + at.x as usize)
    }

    fn contains(&self, at: Offset) -> bool {
        at.x < self.width && at.y < self.height && at.z < self.depth
    }
}

/// Strides of a plane, where all slices together must stay addressable.
fn plane_strides(pitch: usize, rows: usize, depth: u32) -> Option<Strides> {
    let slice = pitch.checked_mul(rows)?;
    slice.checked_mul(depth as usize)?;
    Some(Strides { pitch, slice })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gles_format::{AstcBlock, CompressedFormat};

    #[test]
    fn padded_rows() {
        let layout = StorageLayout::new(InternalFormat::A8B8G8R8, 3, 2, 1).unwrap();
        assert_eq!(layout.strides(), Strides { pitch: 16, slice: 32 });
        assert_eq!(layout.byte_len(), 32);
        assert_eq!(layout.stencil_strides(), None);

        let layout = StorageLayout::new(InternalFormat::R8, 4, 4, 3).unwrap();
        assert_eq!(layout.strides(), Strides::with_rows(4, 4));
        assert_eq!(layout.byte_len(), 48);
    }

    #[test]
    fn stencil_plane() {
        let layout = StorageLayout::new(InternalFormat::D32FS8Texture, 5, 3, 2).unwrap();
        assert_eq!(layout.strides(), Strides::with_rows(24, 3));
        assert_eq!(layout.stencil_strides(), Some(Strides::with_rows(6, 3)));
        assert_eq!(layout.stencil_len(), Some(36));
        assert_eq!(layout.stencil_offset_of(Offset::new(1, 2, 1)), Some(18 + 12 + 1));
    }

    #[test]
    fn compressed_rows_of_blocks() {
        let format = CompressedFormat::RgbaAstc(AstcBlock::B6x5);
        let layout = StorageLayout::new(InternalFormat::Compressed(format), 13, 11, 1).unwrap();
        // 13 pixels are three blocks wide, 11 rows are three blocks high.
        assert_eq!(layout.strides(), Strides::with_rows(48, 3));
        assert_eq!(layout.offset_of(Offset::new(6, 5, 0)), Some(48 + 16));
    }

    #[test]
    fn pixel_offsets() {
        let layout = StorageLayout::new(InternalFormat::A8B8G8R8, 4, 4, 2).unwrap();
        assert_eq!(layout.offset_of(Offset::new(1, 1, 1)), Some(64 + 16 + 4));
        assert_eq!(layout.offset_of(Offset::new(4, 0, 0)), None);
        assert_eq!(layout.offset_of(Offset::new(0, 0, 2)), None);
    }

    #[test]
    fn client_pitch() {
        let layout = StorageLayout::with_client_pitch(InternalFormat::A8B8G8R8, 3, 2, 7).unwrap();
        assert_eq!(layout.strides(), Strides::with_rows(28, 2));

        assert_eq!(
            StorageLayout::with_client_pitch(InternalFormat::A8B8G8R8, 8, 2, 7),
            Err(LayoutError::NarrowPitch { pitch: 7, width: 8 })
        );
    }

    #[test]
    fn rejects_empty_and_huge() {
        assert!(matches!(
            StorageLayout::new(InternalFormat::R8, 0, 1, 1),
            Err(LayoutError::Empty { .. })
        ));
        assert!(matches!(
            StorageLayout::new(InternalFormat::A32B32G32R32F, u32::MAX, u32::MAX, u32::MAX),
            Err(LayoutError::TooLarge { .. })
        ));
    }
}
