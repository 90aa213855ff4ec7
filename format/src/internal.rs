//! Formats in which the renderer physically stores pixels.
use crate::client::{BlockSize, CompressedFormat};

/// A storage format of the renderer.
///
/// Channel names are listed from the most significant to the least significant position of a
/// little-endian pixel word, so `A8B8G8R8` stores red in its first byte in memory. An `X` names a
/// channel that is present in memory but carries no meaning; it is filled with the opaque value on
/// upload. The suffixes follow the usual convention: `F` for floating point, `I`/`UI` for signed
/// and unsigned integer lanes that are not normalized, `Snorm` for signed normalized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
#[allow(non_camel_case_types)]
pub enum InternalFormat {
    A8,
    A16F,
    A32F,
    L8,
    L16F,
    L32F,
    A8L8,
    A16L16F,
    A32L32F,

    R8,
    R8Snorm,
    R8I,
    R8UI,
    G8R8,
    G8R8Snorm,
    G8R8I,
    G8R8UI,
    B8G8R8,
    X8B8G8R8,
    X8B8G8R8Snorm,
    X8B8G8R8I,
    X8B8G8R8UI,
    Srgb8X8,
    A8B8G8R8,
    A8B8G8R8Snorm,
    A8B8G8R8I,
    A8B8G8R8UI,
    Srgb8A8,
    A8R8G8B8,

    R4G4B4A4,
    A4R4G4B4,
    R5G5B5A1,
    A1R5G5B5,
    R5G6B5,
    A2B10G10R10,
    A2B10G10R10UI,

    R16I,
    R16UI,
    G16R16I,
    G16R16UI,
    X16B16G16R16I,
    X16B16G16R16UI,
    A16B16G16R16I,
    A16B16G16R16UI,

    R32I,
    R32UI,
    G32R32I,
    G32R32UI,
    X32B32G32R32I,
    X32B32G32R32UI,
    A32B32G32R32I,
    A32B32G32R32UI,

    R16F,
    G16R16F,
    B16G16R16F,
    X16B16G16R16F,
    /// Half-float lanes holding only non-negative values, storage for packed float inputs.
    X16B16G16R16FUnsigned,
    A16B16G16R16F,
    R32F,
    G32R32F,
    B32G32R32F,
    X32B32G32R32F,
    A32B32G32R32F,

    D16,
    D24S8,
    D32,
    D32F,
    /// Float depth which the client may lock and read back.
    D32FLockable,
    /// Float depth with a separate 8-bit stencil plane.
    D32FS8Texture,

    Compressed(CompressedFormat),
}

impl InternalFormat {
    /// Bytes occupied by a single pixel of the primary plane.
    ///
    /// Compressed formats have no per-pixel size; this returns `None` for them. Depth and stencil
    /// formats report only their depth plane, see [`InternalFormat::has_stencil`].
    pub const fn bytes(self) -> Option<usize> {
        use InternalFormat::*;
        Some(match self {
            A8 | L8 | R8 | R8Snorm | R8I | R8UI => 1,
            A16F | L16F | A8L8 | G8R8 | G8R8Snorm | G8R8I | G8R8UI | R4G4B4A4 | A4R4G4B4
            | R5G5B5A1 | A1R5G5B5 | R5G6B5 | R16I | R16UI | R16F | D16 => 2,
            B8G8R8 => 3,
            A32F | L32F | A16L16F | X8B8G8R8 | X8B8G8R8Snorm | X8B8G8R8I | X8B8G8R8UI
            | Srgb8X8 | A8B8G8R8 | A8B8G8R8Snorm | A8B8G8R8I | A8B8G8R8UI | Srgb8A8 | A8R8G8B8
            | A2B10G10R10 | A2B10G10R10UI | G16R16I | G16R16UI | R32I | R32UI | G16R16F | R32F
            | D24S8 | D32 | D32F | D32FLockable | D32FS8Texture => 4,
            B16G16R16F => 6,
            A32L32F | X16B16G16R16I | X16B16G16R16UI | A16B16G16R16I | A16B16G16R16UI | G32R32I
            | G32R32UI | X16B16G16R16F | X16B16G16R16FUnsigned | A16B16G16R16F | G32R32F => 8,
            B32G32R32F => 12,
            X32B32G32R32I | X32B32G32R32UI | A32B32G32R32I | A32B32G32R32UI | X32B32G32R32F
            | A32B32G32R32F => 16,
            Compressed(_) => return None,
        })
    }

    /// The block geometry of a compressed format.
    pub const fn block(self) -> Option<BlockSize> {
        match self {
            InternalFormat::Compressed(format) => Some(format.block()),
            _ => None,
        }
    }

    /// Whether the data is stored as compressed blocks.
    pub const fn is_compressed(self) -> bool {
        matches!(self, InternalFormat::Compressed(_))
    }

    /// Whether this format has a stencil plane next to its primary depth plane.
    pub const fn has_stencil(self) -> bool {
        matches!(self, InternalFormat::D24S8 | InternalFormat::D32FS8Texture)
    }

    /// Whether the primary plane stores depth.
    pub const fn is_depth(self) -> bool {
        use InternalFormat::*;
        matches!(self, D16 | D24S8 | D32 | D32F | D32FLockable | D32FS8Texture)
    }

    /// Whether data resolved to `self` may be written directly into storage of `storage`.
    ///
    /// Besides equality exactly three reinterpretations keep the bit layout intact: plain 8-bit
    /// color written into its sRGB-tagged twin (with and without alpha), and normalized 10-10-10-2
    /// written into the unsigned integer variant.
    pub fn is_direct_compatible(self, storage: InternalFormat) -> bool {
        use InternalFormat::*;
        self == storage
            || matches!(
                (self, storage),
                (A8B8G8R8, Srgb8A8) | (X8B8G8R8, Srgb8X8) | (A2B10G10R10, A2B10G10R10UI)
            )
    }
}

#[cfg(test)]
mod tests {
    use super::InternalFormat;
    use crate::client::{AstcBlock, CompressedFormat};

    #[test]
    fn tolerated_reinterpretations() {
        use InternalFormat::*;
        assert!(A8B8G8R8.is_direct_compatible(A8B8G8R8));
        assert!(A8B8G8R8.is_direct_compatible(Srgb8A8));
        assert!(X8B8G8R8.is_direct_compatible(Srgb8X8));
        assert!(A2B10G10R10.is_direct_compatible(A2B10G10R10UI));

        // Only in the one direction.
        assert!(!Srgb8A8.is_direct_compatible(A8B8G8R8));
        assert!(!A2B10G10R10UI.is_direct_compatible(A2B10G10R10));
        // And nothing else is tolerated.
        assert!(!A8B8G8R8.is_direct_compatible(A8R8G8B8));
        assert!(!X8B8G8R8.is_direct_compatible(Srgb8A8));
        assert!(!X16B16G16R16F.is_direct_compatible(X16B16G16R16FUnsigned));
    }

    #[test]
    fn stencil_planes() {
        assert!(InternalFormat::D32FS8Texture.has_stencil());
        assert!(InternalFormat::D24S8.has_stencil());
        assert!(!InternalFormat::D32FLockable.has_stencil());
        assert!(InternalFormat::D32FLockable.is_depth());
        assert!(!InternalFormat::A8B8G8R8.is_depth());
    }

    #[test]
    fn compressed_has_no_pixel_size() {
        let format = InternalFormat::Compressed(CompressedFormat::RgbaAstc(AstcBlock::B8x5));
        assert_eq!(format.bytes(), None);
        assert!(format.is_compressed());
        let block = format.block().unwrap();
        assert_eq!((block.width, block.height, block.bytes), (8, 5, 16));
    }
}
