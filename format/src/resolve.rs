//! Mapping client pixel descriptions onto storage formats and byte sizes.
//!
//! The tables follow OpenGL ES 3.0.5, table 3.2 for client pixel sizes. The set of supported
//! combinations is closed: a pair outside of it is a contract violation of the caller, who is
//! expected to validate client enumerations before ever reaching this module. The panicking
//! functions treat it as such, the `try_` variants report `None` instead.
use crate::client::{ClientFormat, ClientType, CompressedFormat};
use crate::internal::InternalFormat;

/// The format which represents client data with full fidelity.
///
/// This is the format of a source surface constructed directly over client bytes, as used when
/// the data is handed to a generic blit. Three-channel data keeps its three channels here.
///
/// # Panics
///
/// When the combination is outside the supported table.
#[track_caller]
pub fn resolve_transfer_format(format: ClientFormat, ty: ClientType) -> InternalFormat {
    match try_resolve_transfer_format(format, ty) {
        Some(internal) => internal,
        None => unsupported(format, ty),
    }
}

/// The format which represents client data with full fidelity, if any.
///
/// See [`resolve_transfer_format`].
pub fn try_resolve_transfer_format(format: ClientFormat, ty: ClientType) -> Option<InternalFormat> {
    use ClientFormat as F;
    use ClientType as T;
    use InternalFormat::*;

    Some(match (format, ty) {
        (F::Luminance, T::UnsignedByte) | (F::Luminance8, _) => L8,
        (F::Luminance, T::HalfFloat) | (F::Luminance16F, _) => L16F,
        (F::Luminance, T::Float) | (F::Luminance32F, _) => L32F,
        (F::LuminanceAlpha, T::UnsignedByte) | (F::Luminance8Alpha8, _) => A8L8,
        (F::LuminanceAlpha, T::HalfFloat) | (F::LuminanceAlpha16F, _) => A16L16F,
        (F::LuminanceAlpha, T::Float) | (F::LuminanceAlpha32F, _) => A32L32F,
        (F::Rgba, T::UnsignedByte) => A8B8G8R8,
        (F::Rgba, T::UnsignedShort4444) => R4G4B4A4,
        (F::Rgba, T::UnsignedShort5551) => R5G5B5A1,
        (F::Rgba, T::HalfFloat) => A16B16G16R16F,
        (F::Rgba, T::Float) => A32B32G32R32F,
        (F::Bgra | F::Bgra8, T::UnsignedByte) => A8R8G8B8,
        (F::Bgra | F::Bgra8, T::UnsignedShort4444Rev) => A4R4G4B4,
        (F::Bgra | F::Bgra8, T::UnsignedShort1555Rev) => A1R5G5B5,
        (F::Rgb, T::UnsignedByte) => B8G8R8,
        (F::Rgb, T::UnsignedShort565) => R5G6B5,
        (F::Rgb, T::HalfFloat) => B16G16R16F,
        (F::Rgb, T::Float) => B32G32R32F,
        (F::Rg, T::UnsignedByte) => G8R8,
        (F::Rg, T::HalfFloat) => G16R16F,
        (F::Rg, T::Float) => G32R32F,
        (F::Red, T::UnsignedByte) => R8,
        (F::Red, T::HalfFloat) => R16F,
        (F::Red, T::Float) => R32F,
        (F::Alpha, T::UnsignedByte) | (F::Alpha8, _) => A8,
        (F::Alpha, T::HalfFloat) | (F::Alpha16F, _) => A16F,
        (F::Alpha, T::Float) | (F::Alpha32F, _) => A32F,
        (F::RedInteger, T::Int) => R32I,
        (F::RedInteger, T::UnsignedInt) => R32UI,
        (F::RgInteger, T::Int) => G32R32I,
        (F::RgInteger, T::UnsignedInt) => G32R32UI,
        (F::RgbaInteger, T::Int) => A32B32G32R32I,
        (F::RgbaInteger, T::UnsignedInt) => A32B32G32R32UI,
        (F::RgbaInteger, T::UnsignedInt2101010Rev) => A2B10G10R10UI,
        (F::DepthComponent, T::UnsignedShort) => D16,
        (F::DepthComponent, T::UnsignedInt248) => D24S8,
        (F::DepthComponent, T::UnsignedInt) => D32,
        (F::DepthComponent, T::Float) => D32FLockable,
        _ => return None,
    })
}

/// The format in which the renderer stores texture data of this description.
///
/// Compressed formats are stored as they are. Everything else chooses the storage the renderer
/// samples from, which is not necessarily the transfer format: three-channel data is widened to
/// four lanes, depth is always stored as float, and both packed float encodings land in the same
/// unsigned half-float storage.
///
/// # Panics
///
/// When the combination is outside the supported table.
#[track_caller]
pub fn resolve_storage_format(format: ClientFormat, ty: ClientType) -> InternalFormat {
    match try_resolve_storage_format(format, ty) {
        Some(internal) => internal,
        None => unsupported(format, ty),
    }
}

/// The storage format for this description, if there is one.
///
/// See [`resolve_storage_format`].
pub fn try_resolve_storage_format(format: ClientFormat, ty: ClientType) -> Option<InternalFormat> {
    use ClientFormat as F;
    use InternalFormat::*;

    if let F::Compressed(compressed) = format {
        return Some(Compressed(compressed));
    }

    Some(match ty {
        ClientType::Float => match format {
            F::Alpha | F::Alpha32F => A32F,
            F::Luminance | F::Luminance32F => L32F,
            F::LuminanceAlpha | F::LuminanceAlpha32F => A32L32F,
            F::Red | F::R32F => R32F,
            F::Rg | F::Rg32F => G32R32F,
            F::Rgb | F::Rgb32F => X32B32G32R32F,
            F::R11FG11FB10F | F::Rgb9E5 => X16B16G16R16FUnsigned,
            F::Rgba | F::Rgba32F => A32B32G32R32F,
            F::R16F => R16F,
            F::Rg16F => G16R16F,
            F::Rgb16F => X16B16G16R16F,
            F::Rgba16F => A16B16G16R16F,
            F::DepthComponent | F::DepthComponent32F => D32F,
            _ => return None,
        },
        ClientType::HalfFloat => match format {
            F::Alpha | F::Alpha16F => A16F,
            F::Luminance | F::Luminance16F => L16F,
            F::LuminanceAlpha | F::LuminanceAlpha16F => A16L16F,
            F::Red | F::R16F => R16F,
            F::Rg | F::Rg16F => G16R16F,
            F::Rgba | F::Rgba16F => A16B16G16R16F,
            F::Rgb | F::Rgb16F => X16B16G16R16F,
            F::R11FG11FB10F | F::Rgb9E5 => X16B16G16R16FUnsigned,
            _ => return None,
        },
        ClientType::Byte => match format {
            F::R8Snorm | F::R8 | F::Red => R8Snorm,
            F::R8I | F::RedInteger => R8I,
            F::Rg8Snorm | F::Rg8 | F::Rg => G8R8Snorm,
            F::Rg8I | F::RgInteger => G8R8I,
            F::Rgb8Snorm | F::Rgb8 | F::Rgb => X8B8G8R8Snorm,
            F::Rgb8I | F::RgbInteger => X8B8G8R8I,
            F::Rgba8Snorm | F::Rgba8 | F::Rgba => A8B8G8R8Snorm,
            F::Rgba8I | F::RgbaInteger => A8B8G8R8I,
            _ => return None,
        },
        ClientType::UnsignedByte => match format {
            F::Luminance | F::Luminance8 => L8,
            F::LuminanceAlpha | F::Luminance8Alpha8 => A8L8,
            F::R8Snorm => R8Snorm,
            F::R8 | F::Red => R8,
            F::R8UI | F::RedInteger => R8UI,
            F::Rg8Snorm | F::Rg8 | F::Rg => G8R8,
            F::Rg8UI | F::RgInteger => G8R8UI,
            F::Rgb8Snorm | F::Rgb8 | F::Rgb => X8B8G8R8,
            F::Srgb8 => Srgb8X8,
            F::Rgb8UI | F::RgbInteger => X8B8G8R8UI,
            F::Rgba8Snorm | F::Rgba8 | F::Rgba => A8B8G8R8,
            F::Srgb8Alpha8 => Srgb8A8,
            F::Rgba8UI | F::RgbaInteger => A8B8G8R8UI,
            F::Bgra | F::Bgra8 => A8R8G8B8,
            F::Alpha | F::Alpha8 => A8,
            _ => return None,
        },
        ClientType::Short => match format {
            F::R16I | F::RedInteger => R16I,
            F::Rg16I | F::RgInteger => G16R16I,
            F::Rgb16I | F::RgbInteger => X16B16G16R16I,
            F::Rgba16I | F::RgbaInteger => A16B16G16R16I,
            _ => return None,
        },
        ClientType::UnsignedShort => match format {
            F::R16UI | F::RedInteger => R16UI,
            F::Rg16UI | F::RgInteger => G16R16UI,
            F::Rgb16UI | F::RgbInteger => X16B16G16R16UI,
            F::Rgba16UI | F::RgbaInteger => A16B16G16R16UI,
            F::DepthComponent | F::DepthComponent16 => D32FLockable,
            _ => return None,
        },
        ClientType::Int => match format {
            F::RedInteger | F::R32I => R32I,
            F::RgInteger | F::Rg32I => G32R32I,
            F::RgbInteger | F::Rgb32I => X32B32G32R32I,
            F::RgbaInteger | F::Rgba32I => A32B32G32R32I,
            _ => return None,
        },
        ClientType::UnsignedInt => match format {
            F::RedInteger | F::R32UI => R32UI,
            F::RgInteger | F::Rg32UI => G32R32UI,
            F::RgbInteger | F::Rgb32UI => X32B32G32R32UI,
            F::RgbaInteger | F::Rgba32UI => A32B32G32R32UI,
            F::DepthComponent
            | F::DepthComponent16
            | F::DepthComponent24
            | F::DepthComponent32 => D32FLockable,
            _ => return None,
        },
        ClientType::UnsignedInt248 => match format {
            F::DepthStencil | F::Depth24Stencil8 => D32FS8Texture,
            _ => return None,
        },
        ClientType::Float32UnsignedInt248Rev => match format {
            F::DepthStencil | F::Depth32FStencil8 => D32FS8Texture,
            _ => return None,
        },
        // The packed 16-bit color types are expanded to 8-bit lanes, regardless of format.
        ClientType::UnsignedShort4444 | ClientType::UnsignedShort5551 => A8R8G8B8,
        ClientType::UnsignedShort565 => R5G6B5,
        ClientType::UnsignedInt2101010Rev => match format {
            F::Rgb10A2UI => A2B10G10R10UI,
            _ => A2B10G10R10,
        },
        // The 5 bits of the shared exponent are not alpha.
        ClientType::UnsignedInt10F11F11FRev | ClientType::UnsignedInt5999Rev => {
            X16B16G16R16FUnsigned
        }
        ClientType::UnsignedShort4444Rev | ClientType::UnsignedShort1555Rev => return None,
    })
}

/// The size in bytes of one client pixel.
///
/// This is the number of channels times the size of the scalar type, except for packed types
/// where all channels share the one packed word.
///
/// # Panics
///
/// When the combination is outside OpenGL ES 3.0.5 table 3.2.
#[track_caller]
pub fn pixel_byte_size(format: ClientFormat, ty: ClientType) -> usize {
    match try_pixel_byte_size(format, ty) {
        Some(bytes) => bytes,
        None => unsupported(format, ty),
    }
}

/// The size in bytes of one client pixel, if the combination is valid.
pub fn try_pixel_byte_size(format: ClientFormat, ty: ClientType) -> Option<usize> {
    use ClientType as T;

    #[derive(Clone, Copy)]
    enum Channels {
        Color(usize),
        Depth,
        DepthStencil,
    }

    let channels = match format {
        ClientFormat::Red | ClientFormat::RedInteger | ClientFormat::Alpha | ClientFormat::Luminance => {
            Channels::Color(1)
        }
        ClientFormat::Rg | ClientFormat::RgInteger | ClientFormat::LuminanceAlpha => {
            Channels::Color(2)
        }
        ClientFormat::Rgb | ClientFormat::RgbInteger => Channels::Color(3),
        ClientFormat::Rgba | ClientFormat::RgbaInteger | ClientFormat::Bgra => Channels::Color(4),
        ClientFormat::DepthComponent => Channels::Depth,
        ClientFormat::DepthStencil => Channels::DepthStencil,
        _ => return None,
    };

    Some(match (channels, ty) {
        (Channels::Depth, T::UnsignedShort) => 2,
        (Channels::Depth, T::UnsignedInt | T::Float) => 4,
        (Channels::DepthStencil, T::UnsignedInt248) => 4,
        (Channels::DepthStencil, T::Float32UnsignedInt248Rev) => 8,
        (Channels::Color(3), T::UnsignedShort565) => 2,
        (Channels::Color(3), T::UnsignedInt10F11F11FRev | T::UnsignedInt5999Rev) => 4,
        (
            Channels::Color(4),
            T::UnsignedShort4444
            | T::UnsignedShort4444Rev
            | T::UnsignedShort5551
            | T::UnsignedShort1555Rev,
        ) => 2,
        (Channels::Color(4), T::UnsignedInt2101010Rev) => 4,
        (Channels::Color(n), scalar) => n * scalar_bytes(scalar)?,
        _ => return None,
    })
}

/// Bytes of a block-compressed image of `width` × `height` pixels.
///
/// Partial blocks along either axis occupy a full block.
pub fn compressed_block_bytes(width: u32, height: u32, format: CompressedFormat) -> usize {
    let block = format.block();
    block.count(width, height) * block.bytes as usize
}

/// Bytes of a single row of blocks covering `width` pixels.
pub fn compressed_row_bytes(width: u32, format: CompressedFormat) -> usize {
    compressed_block_bytes(width, 1, format)
}

fn scalar_bytes(ty: ClientType) -> Option<usize> {
    use ClientType as T;
    Some(match ty {
        T::Byte | T::UnsignedByte => 1,
        T::Short | T::UnsignedShort | T::HalfFloat => 2,
        T::Int | T::UnsignedInt | T::Float => 4,
        _ => return None,
    })
}

#[cold]
#[track_caller]
pub(crate) fn unsupported(format: ClientFormat, ty: ClientType) -> ! {
    panic!("unsupported format/type combination: {format:?}/{ty:?}")
}
