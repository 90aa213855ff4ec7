//! The vocabulary of pixel data as supplied by a client.
//!
//! A client describes its buffer with two tags: a format naming the set of channels (and, for
//! texture allocation, possibly their size), and a type naming the scalar or packed encoding of
//! those channels. The tags mirror the pixel transfer enumerations of OpenGL ES 3.0 with the
//! common extensions.

/// The channel set of client pixels.
///
/// Unsized base formats are what a client passes along with pixel data. The sized variants are
/// accepted when allocating storage for a texture, where they pin down the precise storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ClientFormat {
    /// A single red channel.
    Red,
    /// A single red channel, not normalized.
    RedInteger,
    /// Red and green.
    Rg,
    /// Red and green, not normalized.
    RgInteger,
    /// Red, green and blue.
    Rgb,
    /// Red, green and blue, not normalized.
    RgbInteger,
    /// Red, green, blue and alpha.
    Rgba,
    /// Red, green, blue and alpha, not normalized.
    RgbaInteger,
    /// Blue, green, red and alpha, from `EXT_texture_format_BGRA8888`.
    Bgra,
    /// A luminance channel replicated to red, green and blue.
    Luminance,
    /// Luminance and alpha.
    LuminanceAlpha,
    /// A single alpha channel.
    Alpha,
    /// A single depth value.
    DepthComponent,
    /// Interleaved depth and stencil.
    DepthStencil,

    R8,
    R8Snorm,
    R8I,
    R8UI,
    R16I,
    R16UI,
    R16F,
    R32I,
    R32UI,
    R32F,
    Rg8,
    Rg8Snorm,
    Rg8I,
    Rg8UI,
    Rg16I,
    Rg16UI,
    Rg16F,
    Rg32I,
    Rg32UI,
    Rg32F,
    Rgb8,
    Rgb8Snorm,
    Rgb8I,
    Rgb8UI,
    Srgb8,
    Rgb16I,
    Rgb16UI,
    Rgb16F,
    Rgb32I,
    Rgb32UI,
    Rgb32F,
    R11FG11FB10F,
    Rgb9E5,
    Rgba8,
    Rgba8Snorm,
    Rgba8I,
    Rgba8UI,
    Srgb8Alpha8,
    Rgb10A2UI,
    Rgba16I,
    Rgba16UI,
    Rgba16F,
    Rgba32I,
    Rgba32UI,
    Rgba32F,
    Bgra8,
    Luminance8,
    Luminance16F,
    Luminance32F,
    Luminance8Alpha8,
    LuminanceAlpha16F,
    LuminanceAlpha32F,
    Alpha8,
    Alpha16F,
    Alpha32F,
    DepthComponent16,
    DepthComponent24,
    DepthComponent32,
    DepthComponent32F,
    Depth24Stencil8,
    Depth32FStencil8,

    /// Block-compressed data, which is never transcoded.
    Compressed(CompressedFormat),
}

/// The scalar or packed encoding of client pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ClientType {
    Byte,
    UnsignedByte,
    Short,
    UnsignedShort,
    Int,
    UnsignedInt,
    /// Half-precision floats, including the `OES_texture_half_float` spelling.
    HalfFloat,
    Float,
    /// Four 4-bit fields in a `u16`, red in the most significant bits.
    UnsignedShort4444,
    /// Three 5-bit fields and a 1-bit alpha in a `u16`, red in the most significant bits.
    UnsignedShort5551,
    /// Red 5, green 6, blue 5 bits in a `u16`, red in the most significant bits.
    UnsignedShort565,
    /// Four 4-bit fields in a `u16`, alpha in the most significant bits.
    UnsignedShort4444Rev,
    /// A 1-bit alpha and three 5-bit fields in a `u16`, alpha in the most significant bit.
    UnsignedShort1555Rev,
    /// Red 10, green 10, blue 10 and alpha 2 bits, red in the least significant bits.
    UnsignedInt2101010Rev,
    /// Unsigned 11-bit red and green, 10-bit blue floats, red in the least significant bits.
    UnsignedInt10F11F11FRev,
    /// Three 9-bit mantissas sharing a 5-bit exponent in the most significant bits.
    UnsignedInt5999Rev,
    /// 24-bit depth in the high bits, 8-bit stencil in the low byte.
    UnsignedInt248,
    /// A 32-bit float depth followed by a word holding 8-bit stencil in its low byte.
    Float32UnsignedInt248Rev,
}

/// Block-compressed client formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum CompressedFormat {
    Dxt1Rgb,
    Dxt1Rgba,
    Dxt3,
    Dxt5,
    Etc1Rgb8,
    R11Eac,
    SignedR11Eac,
    Rg11Eac,
    SignedRg11Eac,
    Rgb8Etc2,
    Srgb8Etc2,
    Rgb8PunchthroughAlpha1Etc2,
    Srgb8PunchthroughAlpha1Etc2,
    Rgba8Etc2Eac,
    Srgb8Alpha8Etc2Eac,
    RgbaAstc(AstcBlock),
    Srgb8Alpha8Astc(AstcBlock),
}

/// The block footprints of ASTC, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AstcBlock {
    B4x4,
    B5x4,
    B5x5,
    B6x5,
    B6x6,
    B8x5,
    B8x6,
    B8x8,
    B10x5,
    B10x6,
    B10x8,
    B10x10,
    B12x10,
    B12x12,
}

/// The geometry of one compressed block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockSize {
    /// Pixels covered along the width.
    pub width: u32,
    /// Pixels covered along the height.
    pub height: u32,
    /// Bytes encoding the block.
    pub bytes: u32,
}

impl AstcBlock {
    /// All footprints, smallest first.
    pub const ALL: [AstcBlock; 14] = [
        AstcBlock::B4x4,
        AstcBlock::B5x4,
        AstcBlock::B5x5,
        AstcBlock::B6x5,
        AstcBlock::B6x6,
        AstcBlock::B8x5,
        AstcBlock::B8x6,
        AstcBlock::B8x8,
        AstcBlock::B10x5,
        AstcBlock::B10x6,
        AstcBlock::B10x8,
        AstcBlock::B10x10,
        AstcBlock::B12x10,
        AstcBlock::B12x12,
    ];

    /// The footprint as `(width, height)` in pixels.
    pub const fn dimensions(self) -> (u32, u32) {
        use AstcBlock::*;
        match self {
            B4x4 => (4, 4),
            B5x4 => (5, 4),
            B5x5 => (5, 5),
            B6x5 => (6, 5),
            B6x6 => (6, 6),
            B8x5 => (8, 5),
            B8x6 => (8, 6),
            B8x8 => (8, 8),
            B10x5 => (10, 5),
            B10x6 => (10, 6),
            B10x8 => (10, 8),
            B10x10 => (10, 10),
            B12x10 => (12, 10),
            B12x12 => (12, 12),
        }
    }
}

impl CompressedFormat {
    /// The size of a block and the bytes it occupies.
    ///
    /// Every ASTC footprint encodes into 128 bits, everything else is a 4×4 block of either 64 or
    /// 128 bits.
    pub const fn block(self) -> BlockSize {
        use CompressedFormat::*;
        let (width, height, bytes) = match self {
            Dxt1Rgb
            | Dxt1Rgba
            | Etc1Rgb8
            | R11Eac
            | SignedR11Eac
            | Rgb8Etc2
            | Srgb8Etc2
            | Rgb8PunchthroughAlpha1Etc2
            | Srgb8PunchthroughAlpha1Etc2 => (4, 4, 8),
            Dxt3 | Dxt5 | Rg11Eac | SignedRg11Eac | Rgba8Etc2Eac | Srgb8Alpha8Etc2Eac => {
                (4, 4, 16)
            }
            RgbaAstc(block) | Srgb8Alpha8Astc(block) => {
                let (w, h) = block.dimensions();
                (w, h, 16)
            }
        };

        BlockSize {
            width,
            height,
            bytes,
        }
    }

    /// Whether the decoded colors are sRGB encoded.
    pub const fn is_srgb(self) -> bool {
        matches!(
            self,
            CompressedFormat::Srgb8Etc2
                | CompressedFormat::Srgb8PunchthroughAlpha1Etc2
                | CompressedFormat::Srgb8Alpha8Etc2Eac
                | CompressedFormat::Srgb8Alpha8Astc(_)
        )
    }
}

impl ClientFormat {
    /// Whether this is one of the unsized base formats that may accompany pixel data.
    pub const fn is_base(self) -> bool {
        use ClientFormat::*;
        matches!(
            self,
            Red | RedInteger
                | Rg
                | RgInteger
                | Rgb
                | RgbInteger
                | Rgba
                | RgbaInteger
                | Bgra
                | Luminance
                | LuminanceAlpha
                | Alpha
                | DepthComponent
                | DepthStencil
        )
    }

    /// The compressed format, if this names one.
    pub const fn compressed(self) -> Option<CompressedFormat> {
        match self {
            ClientFormat::Compressed(format) => Some(format),
            _ => None,
        }
    }
}

impl BlockSize {
    /// Number of blocks to cover `width` × `height` pixels, partial blocks rounded up.
    pub const fn count(self, width: u32, height: u32) -> usize {
        let across = width.div_ceil(self.width) as usize;
        let down = height.div_ceil(self.height) as usize;
        across * down
    }
}
