//! Locating client pixels in a buffer, given the client's unpack parameters.
//!
//! All arithmetic here is exact integer arithmetic on byte counts. A single rounding mistake
//! would shift every subsequent row that is read, so there is nothing approximate in here.
use crate::client::{ClientFormat, ClientType};
use crate::resolve::pixel_byte_size;

/// How the client addresses a sub-region of its buffer.
///
/// Rows are `alignment`-aligned. The row length and image height overrides describe the larger
/// image that the region is cut from, with `0` meaning the region itself is that image. The skip
/// counts then locate the first pixel of the region within it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UnpackParameters {
    /// Byte alignment of each row start, a power of two.
    pub alignment: u32,
    /// Pixels in a full client row, or `0` for the width of the region.
    pub row_length: u32,
    /// Rows in a full client image, or `0` for the height of the region.
    pub image_height: u32,
    /// Pixels skipped at the start of each row.
    pub skip_pixels: u32,
    /// Rows skipped at the start of each image.
    pub skip_rows: u32,
    /// Images skipped at the start of the buffer.
    pub skip_images: u32,
}

/// Error returned when the unpack alignment is not a power of two.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unpack alignment {alignment} is not a power of two")]
pub struct BadAlignmentError {
    alignment: u32,
}

impl UnpackParameters {
    /// Tightly packed rows with the default alignment of 4.
    pub const DEFAULT: Self = UnpackParameters {
        alignment: 4,
        row_length: 0,
        image_height: 0,
        skip_pixels: 0,
        skip_rows: 0,
        skip_images: 0,
    };

    /// Change the row alignment, validating it.
    pub fn with_alignment(self, alignment: u32) -> Result<Self, BadAlignmentError> {
        if !alignment.is_power_of_two() {
            return Err(BadAlignmentError { alignment });
        }

        Ok(UnpackParameters { alignment, ..self })
    }

    /// The width and height of the client image that a region of this size is cut from.
    pub fn input_extent(&self, width: u32, height: u32) -> (u32, u32) {
        let width = match self.row_length {
            0 => width,
            row_length => row_length,
        };

        let height = match self.image_height {
            0 => height,
            image_height => image_height,
        };

        (width, height)
    }
}

impl Default for UnpackParameters {
    fn default() -> Self {
        UnpackParameters::DEFAULT
    }
}

impl BadAlignmentError {
    /// The rejected alignment.
    pub fn alignment(&self) -> u32 {
        self.alignment
    }
}

/// Round `bytes` up to a multiple of `alignment`.
///
/// # Panics
///
/// If `alignment` is not a power of two.
pub const fn align_up(bytes: usize, alignment: usize) -> usize {
    assert!(alignment.is_power_of_two(), "alignment must be a power of two");
    (bytes + alignment - 1) & !(alignment - 1)
}

/// The byte distance between client rows of `width` pixels.
///
/// # Panics
///
/// If `alignment` is not a power of two, or the format and type do not form a client pixel.
#[track_caller]
pub fn compute_pitch(width: u32, format: ClientFormat, ty: ClientType, alignment: u32) -> usize {
    let raw = pixel_byte_size(format, ty) * width as usize;
    align_up(raw, alignment as usize)
}

/// The byte offset of the first pixel of the addressed region.
///
/// `width` and `height` describe the client image containing the region, that is after applying
/// the row length and image height overrides (see [`UnpackParameters::input_extent`]). Rows are
/// `compute_pitch` apart and images are `height` rows apart.
///
/// # Panics
///
/// Same as [`compute_pitch`].
#[track_caller]
pub fn compute_packing_offset(
    format: ClientFormat,
    ty: ClientType,
    width: u32,
    height: u32,
    unpack: &UnpackParameters,
) -> usize {
    let pitch = compute_pitch(width, format, ty, unpack.alignment);
    let rows = unpack.skip_images as usize * height as usize + unpack.skip_rows as usize;
    rows * pitch + unpack.skip_pixels as usize * pixel_byte_size(format, ty)
}
