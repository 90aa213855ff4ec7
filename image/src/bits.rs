//! Decoding of packed client pixel words.
//!
//! Every field is addressed by its least significant bit and its length within a little-endian
//! pixel word. Fields narrower than a byte are widened by replicating their high bits into the
//! vacated low bits, which maps the all-zero field to `0x00` and the all-ones field to `0xff`.
use half::f16;

/// Specifies which bits a channel comes from, within a packed pixel word.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Field {
    pub(crate) begin: u32,
    pub(crate) len: u32,
}

impl Field {
    const fn new(begin: u32, len: u32) -> Self {
        Field { begin, len }
    }

    pub(crate) const fn mask(self) -> u32 {
        ((1u64 << self.len) - 1) as u32
    }

    #[inline]
    pub(crate) const fn extract(self, word: u32) -> u32 {
        (word >> self.begin) & self.mask()
    }

    /// Widen the field to a full byte, filling the low bits with copies of the high bits.
    #[inline]
    pub(crate) const fn replicate(self, word: u32) -> u8 {
        let value = self.extract(word);
        let mut out = 0u32;
        let mut filled = 0;

        while filled < 8 {
            let shift = 8 - filled as i32 - self.len as i32;
            out |= if shift >= 0 {
                value << shift
            } else {
                value >> -shift
            };
            filled += self.len;
        }

        out as u8
    }
}

/// `R4G4B4A4`, red in the most significant nibble.
const RGBA4444: [Field; 4] = [
    Field::new(12, 4),
    Field::new(8, 4),
    Field::new(4, 4),
    Field::new(0, 4),
];

/// `R5G5B5A1`, red in the most significant bits and alpha in the lowest bit.
const RGBA5551: [Field; 4] = [
    Field::new(11, 5),
    Field::new(6, 5),
    Field::new(1, 5),
    Field::new(0, 1),
];

/// Expand a 4-4-4-4 pixel into the bytes of an `A8R8G8B8` storage pixel.
///
/// The result is in memory order, that is blue, green, red, alpha.
#[inline]
pub fn expand_4444(pixel: u16) -> [u8; 4] {
    let word = u32::from(pixel);
    let [r, g, b, a] = RGBA4444.map(|field| field.replicate(word));
    [b, g, r, a]
}

/// Expand a 5-5-5-1 pixel into the bytes of an `A8R8G8B8` storage pixel.
///
/// The single alpha bit is either fully transparent or fully opaque.
#[inline]
pub fn expand_5551(pixel: u16) -> [u8; 4] {
    let word = u32::from(pixel);
    let [r, g, b, a] = RGBA5551.map(|field| field.replicate(word));
    [b, g, r, a]
}

/// Convert the three unsigned floats of an 11-11-10 word to half floats.
///
/// Red and green have a five bit exponent and six bits of mantissa, blue has five bits of
/// mantissa. The exponent bias is that of a half float, so widening is exact: shift each channel
/// into the half float position, leaving the sign clear. Infinity and NaN are preserved.
#[inline]
pub fn r11g11b10f_to_half(word: u32) -> [f16; 3] {
    const R: Field = Field::new(0, 11);
    const G: Field = Field::new(11, 11);
    const B: Field = Field::new(22, 10);

    [
        f16::from_bits((R.extract(word) << 4) as u16),
        f16::from_bits((G.extract(word) << 4) as u16),
        f16::from_bits((B.extract(word) << 5) as u16),
    ]
}

/// Convert a 9-9-9-5 shared exponent word to half floats.
///
/// Each channel is `mantissa × 2^(exponent - 15 - 9)`, without implicit leading one.
#[inline]
pub fn rgb9e5_to_half(word: u32) -> [f16; 3] {
    const MANTISSA_BITS: i32 = 9;
    const BIAS: i32 = 15;

    let exponent = Field::new(27, 5).extract(word) as i32 - BIAS - MANTISSA_BITS;
    [0, 9, 18].map(|begin| {
        let mantissa = Field::new(begin, 9).extract(word);
        f16::from_f32(libm::ldexpf(mantissa as f32, exponent))
    })
}
