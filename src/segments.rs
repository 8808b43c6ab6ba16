//! 7-segment glyph encoding.
//!
//! Each cell of the display is one byte: bits 0..=6 are segments `a`..`g`,
//! bit 7 is the decimal point.
//!
//! ```text
//!    a
//!   ---
//! f| g |b
//!   ---
//! e|   |c
//!   ---  .dp
//!    d
//! ```
//!
//! [`encode_number`] turns a signed value into a [`SegmentBuffer`] with the
//! ones digit in the rightmost cell.
//!
//! # Example
//!
//! ```rust
//! use adc_meter::segments::{encode_number, digit_to_segments, BLANK, MINUS};
//!
//! let cells = encode_number(-42, false);
//! assert_eq!(cells, [BLANK, MINUS, digit_to_segments(4), digit_to_segments(2)]);
//! ```

/// Four segment bitmaps, index 0 is the leftmost cell.
pub type SegmentBuffer = [u8; CELL_COUNT];

/// Number of digit cells on the module.
pub const CELL_COUNT: usize = 4;

/// Bitmaps for the digits 0 through 9.
pub const DIGITS: [u8; 10] = [0x3F, 0x06, 0x5B, 0x4F, 0x66, 0x6D, 0x7D, 0x07, 0x7F, 0x6F];

/// All segments off.
pub const BLANK: u8 = 0x00;

/// Middle segment only.
pub const MINUS: u8 = 0x40;

/// Decimal point bit.
pub const DOT: u8 = 0x80;

/// "Over" glyphs shown for values that do not fit, packed as `0x50791C3F`
/// with cell 0 in the low byte.
pub const OVERFLOW: SegmentBuffer = 0x5079_1C3F_u32.to_le_bytes();

/// Smallest value [`encode_number`] renders as digits.
pub const MIN_VALUE: i32 = -999;

/// Largest value [`encode_number`] renders as digits.
pub const MAX_VALUE: i32 = 9999;

/// Digit value that selects the minus glyph.
pub const MINUS_DIGIT: i8 = -1;

/// Maps a decimal digit to its bitmap.
///
/// `0..=9` map through [`DIGITS`], [`MINUS_DIGIT`] maps to [`MINUS`], and
/// anything else is [`BLANK`].
///
/// # Examples
///
/// ```
/// use adc_meter::segments::{digit_to_segments, BLANK, MINUS};
///
/// assert_eq!(digit_to_segments(8), 0x7F);
/// assert_eq!(digit_to_segments(-1), MINUS);
/// assert_eq!(digit_to_segments(10), BLANK);
/// ```
pub const fn digit_to_segments(digit: i8) -> u8 {
    match digit {
        0..=9 => DIGITS[digit as usize],
        MINUS_DIGIT => MINUS,
        _ => BLANK,
    }
}

/// Encodes a signed value into four cells.
///
/// The ones digit always lands in cell 3. Higher digits fill leftward only
/// while non-zero digits remain, unless `leading_zero` is set, in which case
/// every available cell shows a digit. A negative value places [`MINUS`]
/// directly left of its most significant digit; since that takes a cell,
/// negative values keep at most three digits. Values outside
/// [`MIN_VALUE`]`..=`[`MAX_VALUE`] encode as [`OVERFLOW`].
pub fn encode_number(value: i32, leading_zero: bool) -> SegmentBuffer {
    if !(MIN_VALUE..=MAX_VALUE).contains(&value) {
        return OVERFLOW;
    }

    let negative = value < 0;
    let first_digit_cell = usize::from(negative);
    let mut rest = value.unsigned_abs();
    let mut cells = [BLANK; CELL_COUNT];
    let mut cell = CELL_COUNT - 1;

    loop {
        cells[cell] = DIGITS[(rest % 10) as usize];
        rest /= 10;
        if cell == first_digit_cell || (rest == 0 && !leading_zero) {
            break;
        }
        cell -= 1;
    }

    if negative {
        cells[cell - 1] = MINUS;
    }
    cells
}

/// Returns `cells` with the decimal point lit in cell `pos`.
///
/// Positions past the last cell leave the buffer unchanged.
pub fn with_decimal_point(mut cells: SegmentBuffer, pos: usize) -> SegmentBuffer {
    if let Some(cell) = cells.get_mut(pos) {
        *cell |= DOT;
    }
    cells
}
