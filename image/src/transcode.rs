//! The transcoding engine, rewriting client rows into storage rows.
//!
//! A [`PixelLayout`] names one of a closed set of row routines. Each routine reads a row of
//! client pixels of a fixed size and writes the same number of storage pixels of a fixed size.
//! The engine walks the slices and rows of a region and hands each pair of rows to the routine.
//!
//! Buffers are plain bytes. Client data is read without any alignment requirement and storage
//! is written in native byte order.
use bytemuck::{Pod, Zeroable};
use gles_format::{ClientFormat, ClientType};
use half::f16;

use crate::bits;
use crate::region::Extent;

/// The strategy used to transcode one row of pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum PixelLayout {
    /// Copy one byte per pixel.
    Bytes1,
    /// Copy two bytes per pixel.
    Bytes2,
    /// Copy four bytes per pixel.
    Bytes4,
    /// Copy eight bytes per pixel.
    Bytes8,
    /// Copy sixteen bytes per pixel.
    Bytes16,
    /// Signed bytes, three channels widened to four with `0x7f` in the last.
    ByteRgb,
    /// Unsigned bytes, three channels widened to four with `0xff` in the last.
    UByteRgb,
    /// Signed shorts, widened with `0x7fff`.
    ShortRgb,
    /// Unsigned shorts, widened with `0xffff`.
    UShortRgb,
    /// Signed integers, widened with `0x7fff_ffff`.
    IntRgb,
    /// Unsigned integers, widened with `0xffff_ffff`.
    UIntRgb,
    /// Floats, widened with `1.0`.
    FloatRgb,
    /// Half floats, widened with `1.0` (`0x3c00`).
    HalfFloatRgb,
    /// Packed 4-4-4-4 into four bytes.
    Rgba4444,
    /// Packed 5-5-5-1 into four bytes.
    Rgba5551,
    /// Packed 11-11-10 unsigned floats into four half floats.
    R11G11B10F,
    /// Shared exponent 9-9-9-5 into four half floats.
    Rgb9E5,
    /// 16-bit normalized depth into a float.
    D16,
    /// The 24 depth bits of a 24-8 word into a float.
    D24,
    /// 32-bit normalized depth into a float.
    D32,
    /// Float depth, clamped to the unit interval.
    D32F,
    /// The float depth of a float-and-stencil pair, clamped to the unit interval.
    D32FS8,
    /// The stencil byte in the low bits of a 24-8 word.
    S8,
    /// The stencil byte in the low bits of the second word of a float-and-stencil pair.
    S24_8,
}

/// How a client description is transcoded into storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dispatch {
    /// All data goes to the single storage plane.
    Single(PixelLayout),
    /// Interleaved data is split into the depth plane and the stencil plane.
    DepthStencil {
        depth: PixelLayout,
        stencil: PixelLayout,
    },
}

/// Byte distances between consecutive rows and consecutive slices of a plane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Strides {
    pub pitch: usize,
    pub slice: usize,
}

pub(crate) struct RowOps {
    /// Bytes of one client pixel.
    pub(crate) source: usize,
    /// Bytes of one storage pixel.
    pub(crate) dest: usize,
    pub(crate) load: fn(&[u8], &mut [u8]),
}

/// The client layout of a float depth with a trailing stencil word.
#[derive(Clone, Copy, Pod, Zeroable)]
#[repr(C)]
struct DepthStencil32F {
    depth: f32,
    stencil: u32,
}

impl PixelLayout {
    /// Bytes of one client pixel read by this strategy.
    pub fn source_bytes(self) -> usize {
        self.ops().source
    }

    /// Bytes of one storage pixel written by this strategy.
    pub fn dest_bytes(self) -> usize {
        self.ops().dest
    }

    pub(crate) fn ops(self) -> RowOps {
        use PixelLayout::*;

        macro_rules! ops {
            ($source:expr, $dest:expr, $load:expr) => {
                RowOps {
                    source: $source,
                    dest: $dest,
                    load: $load,
                }
            };
        }

        match self {
            Bytes1 => ops!(1, 1, copy_row),
            Bytes2 => ops!(2, 2, copy_row),
            Bytes4 => ops!(4, 4, copy_row),
            Bytes8 => ops!(8, 8, copy_row),
            Bytes16 => ops!(16, 16, copy_row),
            ByteRgb => ops!(3, 4, |s, d| widen_row(s, d, &0x7fu8.to_ne_bytes())),
            UByteRgb => ops!(3, 4, |s, d| widen_row(s, d, &0xffu8.to_ne_bytes())),
            ShortRgb => ops!(6, 8, |s, d| widen_row(s, d, &0x7fffu16.to_ne_bytes())),
            UShortRgb => ops!(6, 8, |s, d| widen_row(s, d, &0xffffu16.to_ne_bytes())),
            IntRgb => ops!(12, 16, |s, d| widen_row(s, d, &0x7fff_ffffu32.to_ne_bytes())),
            UIntRgb => ops!(12, 16, |s, d| widen_row(s, d, &0xffff_ffffu32.to_ne_bytes())),
            FloatRgb => ops!(12, 16, |s, d| widen_row(s, d, &1.0f32.to_ne_bytes())),
            HalfFloatRgb => ops!(6, 8, |s, d| widen_row(s, d, &f16::ONE.to_ne_bytes())),
            Rgba4444 => ops!(2, 4, |s, d| {
                each_pixel::<2, 4>(s, d, |pixel, out| {
                    out.copy_from_slice(&bits::expand_4444(read(pixel)))
                })
            }),
            Rgba5551 => ops!(2, 4, |s, d| {
                each_pixel::<2, 4>(s, d, |pixel, out| {
                    out.copy_from_slice(&bits::expand_5551(read(pixel)))
                })
            }),
            R11G11B10F => ops!(4, 8, |s, d| {
                each_pixel::<4, 8>(s, d, |pixel, out| {
                    let [r, g, b] = bits::r11g11b10f_to_half(read(pixel));
                    write_halves(out, [r, g, b, f16::ONE])
                })
            }),
            Rgb9E5 => ops!(4, 8, |s, d| {
                each_pixel::<4, 8>(s, d, |pixel, out| {
                    let [r, g, b] = bits::rgb9e5_to_half(read(pixel));
                    write_halves(out, [r, g, b, f16::ONE])
                })
            }),
            D16 => ops!(2, 4, |s, d| {
                each_pixel::<2, 4>(s, d, |pixel, out| {
                    let depth: u16 = read(pixel);
                    write(out, f32::from(depth) / f32::from(u16::MAX))
                })
            }),
            D24 => ops!(4, 4, |s, d| {
                each_pixel::<4, 4>(s, d, |pixel, out| {
                    const MASK: u32 = 0xffff_ff00;
                    let depth: u32 = read(pixel);
                    write(out, (depth & MASK) as f32 / MASK as f32)
                })
            }),
            D32 => ops!(4, 4, |s, d| {
                each_pixel::<4, 4>(s, d, |pixel, out| {
                    let depth: u32 = read(pixel);
                    write(out, depth as f32 / u32::MAX as f32)
                })
            }),
            D32F => ops!(4, 4, |s, d| {
                each_pixel::<4, 4>(s, d, |pixel, out| {
                    let depth: f32 = read(pixel);
                    write(out, clamp_unit(depth))
                })
            }),
            D32FS8 => ops!(8, 4, |s, d| {
                each_pixel::<8, 4>(s, d, |pixel, out| {
                    let pair: DepthStencil32F = read(pixel);
                    write(out, clamp_unit(pair.depth))
                })
            }),
            S8 => ops!(4, 1, |s, d| {
                each_pixel::<4, 1>(s, d, |pixel, out| {
                    let word: u32 = read(pixel);
                    out[0] = word as u8;
                })
            }),
            S24_8 => ops!(8, 1, |s, d| {
                each_pixel::<8, 1>(s, d, |pixel, out| {
                    let pair: DepthStencil32F = read(pixel);
                    out[0] = pair.stencil as u8;
                })
            }),
        }
    }
}

impl Dispatch {
    /// Choose the transcoding of client data with the given base format and type.
    ///
    /// Follows OpenGL ES 3.0.5 table 3.2, the only inputs for which client data is defined.
    ///
    /// # Panics
    ///
    /// When the combination is not in that table. Callers are expected to have validated the
    /// combination before, as part of resolving the storage format.
    #[track_caller]
    pub fn select(format: ClientFormat, ty: ClientType) -> Self {
        use ClientFormat as F;
        use ClientType as T;
        use PixelLayout::*;

        let layout = match (format, ty) {
            (F::Red | F::RedInteger | F::Alpha | F::Luminance, T::Byte | T::UnsignedByte) => Bytes1,
            (F::Red | F::Alpha | F::Luminance, T::Float) => Bytes4,
            (F::Red | F::Alpha | F::Luminance, T::HalfFloat) => Bytes2,
            (F::Red | F::RedInteger | F::Alpha | F::Luminance, T::Short | T::UnsignedShort) => {
                Bytes2
            }
            (F::Red | F::RedInteger | F::Alpha | F::Luminance, T::Int | T::UnsignedInt) => Bytes4,

            (F::Rg | F::RgInteger | F::LuminanceAlpha, T::Byte | T::UnsignedByte) => Bytes2,
            (F::Rg | F::LuminanceAlpha, T::Float) => Bytes8,
            (F::Rg | F::LuminanceAlpha, T::HalfFloat) => Bytes4,
            (F::Rg | F::RgInteger | F::LuminanceAlpha, T::Short | T::UnsignedShort) => Bytes4,
            (F::Rg | F::RgInteger | F::LuminanceAlpha, T::Int | T::UnsignedInt) => Bytes8,

            (F::Rgb | F::RgbInteger, T::Byte) => ByteRgb,
            (F::Rgb | F::RgbInteger, T::UnsignedByte) => UByteRgb,
            (F::Rgb | F::RgbInteger, T::Short) => ShortRgb,
            (F::Rgb | F::RgbInteger, T::UnsignedShort) => UShortRgb,
            (F::Rgb | F::RgbInteger, T::Int) => IntRgb,
            (F::Rgb | F::RgbInteger, T::UnsignedInt) => UIntRgb,
            (F::Rgb, T::UnsignedShort565) => Bytes2,
            (F::Rgb, T::UnsignedInt10F11F11FRev) => R11G11B10F,
            (F::Rgb, T::UnsignedInt5999Rev) => Rgb9E5,
            (F::Rgb, T::Float) => FloatRgb,
            (F::Rgb, T::HalfFloat) => HalfFloatRgb,

            (F::Rgba | F::RgbaInteger | F::Bgra, T::Byte | T::UnsignedByte) => Bytes4,
            (F::Rgba, T::UnsignedShort4444) => Rgba4444,
            (F::Rgba, T::UnsignedShort5551) => Rgba5551,
            (F::Rgba | F::RgbaInteger, T::UnsignedInt2101010Rev) => Bytes4,
            (F::Rgba, T::Float) => Bytes16,
            (F::Rgba, T::HalfFloat) => Bytes8,
            (F::Rgba | F::RgbaInteger, T::Short | T::UnsignedShort) => Bytes8,
            (F::Rgba | F::RgbaInteger, T::Int | T::UnsignedInt) => Bytes16,

            (F::DepthComponent, T::Float) => D32F,
            (F::DepthComponent, T::UnsignedShort) => D16,
            (F::DepthComponent, T::UnsignedInt) => D32,

            (F::DepthStencil, T::UnsignedInt248) => {
                return Dispatch::DepthStencil {
                    depth: D24,
                    stencil: S8,
                }
            }
            (F::DepthStencil, T::Float32UnsignedInt248Rev) => {
                return Dispatch::DepthStencil {
                    depth: D32FS8,
                    stencil: S24_8,
                }
            }

            _ => unsupported(format, ty),
        };

        Dispatch::Single(layout)
    }
}

impl Strides {
    /// Strides of rows of `pitch` bytes, with `rows` rows in each slice.
    pub const fn with_rows(pitch: usize, rows: usize) -> Self {
        Strides {
            pitch,
            slice: pitch * rows,
        }
    }
}

/// Transcode a region of client pixels into storage.
///
/// Row `y` of slice `z` is read at `z·slice + y·pitch` of the `source` strides, and written at
/// the same position computed from the `dest` strides. Exactly `extent.width` pixels of each row
/// are touched in both buffers.
///
/// # Panics
///
/// If either buffer is too short for the region under its strides.
#[track_caller]
pub fn transcode(
    layout: PixelLayout,
    extent: Extent,
    source: &[u8],
    source_strides: Strides,
    dest: &mut [u8],
    dest_strides: Strides,
) {
    if extent.is_empty() {
        return;
    }

    let ops = layout.ops();
    let source_row = extent.width as usize * ops.source;
    let dest_row = extent.width as usize * ops.dest;

    for z in 0..extent.depth as usize {
        let source_slice = z * source_strides.slice;
        let dest_slice = z * dest_strides.slice;

        for y in 0..extent.height as usize {
            let from = source_slice + y * source_strides.pitch;
            let into = dest_slice + y * dest_strides.pitch;
            (ops.load)(
                &source[from..from + source_row],
                &mut dest[into..into + dest_row],
            );
        }
    }
}

/// Relocate rows of compressed blocks.
///
/// Each slice of the source consists of `rows` tightly packed rows of `row_bytes` and slices
/// are `source_slice` bytes apart. The blocks are copied verbatim.
///
/// # Panics
///
/// If either buffer is too short.
#[track_caller]
pub fn copy_blocks(
    rows: usize,
    depth: usize,
    row_bytes: usize,
    source: &[u8],
    source_slice: usize,
    dest: &mut [u8],
    dest_strides: Strides,
) {
    for z in 0..depth {
        for y in 0..rows {
            let from = z * source_slice + y * row_bytes;
            let into = z * dest_strides.slice + y * dest_strides.pitch;
            dest[into..into + row_bytes].copy_from_slice(&source[from..from + row_bytes]);
        }
    }
}

fn copy_row(source: &[u8], dest: &mut [u8]) {
    dest.copy_from_slice(source);
}

/// Copy three lanes and append the opaque lane, for lanes of `one.len()` bytes.
#[inline]
fn widen_row(source: &[u8], dest: &mut [u8], one: &[u8]) {
    let lane = one.len();
    for (pixel, out) in source.chunks_exact(3 * lane).zip(dest.chunks_exact_mut(4 * lane)) {
        let (color, alpha) = out.split_at_mut(3 * lane);
        color.copy_from_slice(pixel);
        alpha.copy_from_slice(one);
    }
}

/// Apply `op` to each client pixel of `S` bytes and its storage pixel of `D` bytes.
#[inline]
fn each_pixel<const S: usize, const D: usize>(
    source: &[u8],
    dest: &mut [u8],
    mut op: impl FnMut(&[u8], &mut [u8]),
) {
    for (pixel, into) in source.chunks_exact(S).zip(dest.chunks_exact_mut(D)) {
        op(pixel, into)
    }
}

#[inline]
fn read<T: Pod>(bytes: &[u8]) -> T {
    bytemuck::pod_read_unaligned(bytes)
}

#[inline]
fn write<T: Pod>(bytes: &mut [u8], value: T) {
    bytes.copy_from_slice(bytemuck::bytes_of(&value));
}

#[inline]
fn write_halves(bytes: &mut [u8], lanes: [f16; 4]) {
    for (lane, into) in lanes.iter().zip(bytes.chunks_exact_mut(2)) {
        into.copy_from_slice(&lane.to_ne_bytes());
    }
}

fn clamp_unit(depth: f32) -> f32 {
    depth.clamp(0.0, 1.0)
}

#[cold]
#[track_caller]
fn unsupported(format: ClientFormat, ty: ClientType) -> ! {
    panic!("unsupported format/type combination: {format:?}/{ty:?}")
}
