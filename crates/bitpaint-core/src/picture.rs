#![forbid(unsafe_code)]

//! Bit-grid codec.
//!
//! A [`Picture`] packs the whole 8×8 grid into one `u64`. Cell `(row, col)`
//! lives at bit `row * COLS + col`, least significant bit first, so the top
//! left cell is bit 0 and the bottom right cell is bit 63. Renderers and the
//! pointer mapping use the same addressing through [`CellPos::index`].
//!
//! Text parsing is the only fallible operation. Out-of-range cell positions
//! are a programming error and are rejected when the [`CellPos`] is built,
//! never at decode time.
//!
//! # Accepted text
//!
//! | Input          | Result                       |
//! |----------------|------------------------------|
//! | `"5"`, `" 5 "` | `Ok(5)`                      |
//! | `"+5"`, `"-0"` | `Ok(5)`, `Ok(0)`             |
//! | `"0x1f"`       | `Ok(31)` (also `0o`, `0b`)   |
//! | `""`, `"  "`   | `Err(ParseError::Empty)`     |
//! | `"abc"`, `"+"` | `Err(ParseError::InvalidDigit)` |
//! | `"-3"`         | `Err(ParseError::Negative)`  |
//! | `"18446744073709551616"` | `Err(ParseError::OutOfRange)` |

use core::fmt;
use core::num::IntErrorKind;
use core::str::FromStr;

/// Number of grid rows.
pub const ROWS: u8 = 8;

/// Number of grid columns.
pub const COLS: u8 = 8;

/// Number of addressable cells (`ROWS * COLS`).
pub const CELL_COUNT: u32 = ROWS as u32 * COLS as u32;

/// A cell position that is always inside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellPos {
    row: u8,
    col: u8,
}

impl CellPos {
    /// Create a position.
    ///
    /// # Panics
    ///
    /// Panics if `row >= ROWS` or `col >= COLS`.
    #[must_use]
    pub const fn new(row: u8, col: u8) -> Self {
        assert!(row < ROWS && col < COLS, "cell position outside the grid");
        Self { row, col }
    }

    /// Create a position, returning `None` outside the grid.
    #[must_use]
    pub const fn try_new(row: u8, col: u8) -> Option<Self> {
        if row < ROWS && col < COLS {
            Some(Self { row, col })
        } else {
            None
        }
    }

    /// Position of bit `index`, or `None` if `index >= CELL_COUNT`.
    #[must_use]
    pub const fn from_index(index: u32) -> Option<Self> {
        if index >= CELL_COUNT {
            return None;
        }
        Some(Self {
            row: (index / COLS as u32) as u8,
            col: (index % COLS as u32) as u8,
        })
    }

    #[inline]
    #[must_use]
    pub const fn row(self) -> u8 {
        self.row
    }

    #[inline]
    #[must_use]
    pub const fn col(self) -> u8 {
        self.col
    }

    /// Bit index of this cell inside a [`Picture`].
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.row as u32 * COLS as u32 + self.col as u32
    }

    /// Every cell in row-major order.
    pub fn all() -> impl Iterator<Item = CellPos> {
        (0..CELL_COUNT).filter_map(Self::from_index)
    }
}

/// The whole grid encoded as one integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Picture(u64);

impl Picture {
    /// All cells clear.
    pub const EMPTY: Self = Self(0);

    #[must_use]
    pub const fn new(bits: u64) -> Self {
        Self(bits)
    }

    /// Raw bit pattern.
    #[must_use]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Whether the cell at `pos` is set.
    #[inline]
    #[must_use]
    pub const fn cell(self, pos: CellPos) -> bool {
        (self.0 >> pos.index()) & 1 == 1
    }

    /// Flip the cell at `pos`.
    #[inline]
    #[must_use]
    pub const fn toggled(self, pos: CellPos) -> Self {
        Self(self.0 ^ (1u64 << pos.index()))
    }

    /// Force the cell at `pos` to `value`.
    #[inline]
    #[must_use]
    pub const fn with_cell(self, pos: CellPos, value: bool) -> Self {
        let mask = 1u64 << pos.index();
        if value {
            Self(self.0 | mask)
        } else {
            Self(self.0 & !mask)
        }
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of set cells.
    #[must_use]
    pub const fn count_set(self) -> u32 {
        self.0.count_ones()
    }

    /// Positions of the set cells in row-major order.
    pub fn set_cells(self) -> impl Iterator<Item = CellPos> {
        CellPos::all().filter(move |&pos| self.cell(pos))
    }
}

impl From<u64> for Picture {
    fn from(bits: u64) -> Self {
        Self(bits)
    }
}

impl From<Picture> for u64 {
    fn from(picture: Picture) -> Self {
        picture.0
    }
}

impl fmt::Display for Picture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Picture {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_text(s)
    }
}

/// Why a piece of text is not a valid [`Picture`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseError {
    /// Nothing but whitespace.
    Empty,
    /// A character that is not a digit of the selected radix, a dangling
    /// sign or radix prefix, or a sign combined with a radix prefix.
    InvalidDigit,
    /// A non-zero negative value.
    Negative,
    /// Larger than the 64 cells can hold.
    OutOfRange,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty picture value"),
            Self::InvalidDigit => write!(f, "picture value is not an integer"),
            Self::Negative => write!(f, "picture value is negative"),
            Self::OutOfRange => write!(f, "picture value exceeds {CELL_COUNT} bits"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse user-edited text into a [`Picture`].
pub fn parse_text(text: &str) -> Result<Picture, ParseError> {
    let trimmed = text.trim_ascii();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        None => return Err(ParseError::Empty),
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        Some(_) => (false, trimmed),
    };
    let signed = unsigned.len() != trimmed.len();

    let (radix, digits) = split_radix(unsigned);
    if radix != 10 && signed {
        return Err(ParseError::InvalidDigit);
    }
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(ParseError::InvalidDigit);
    }

    let magnitude = u64::from_str_radix(digits, radix).map_err(|err| match err.kind() {
        IntErrorKind::PosOverflow => ParseError::OutOfRange,
        _ => ParseError::InvalidDigit,
    })?;
    if negative && magnitude != 0 {
        return Err(ParseError::Negative);
    }
    Ok(Picture(magnitude))
}

fn split_radix(s: &str) -> (u32, &str) {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 && bytes[0] == b'0' {
        let radix = match bytes[1] {
            b'x' | b'X' => 16,
            b'o' | b'O' => 8,
            b'b' | b'B' => 2,
            _ => return (10, s),
        };
        return (radix, &s[2..]);
    }
    (10, s)
}

/// Canonical base-10 text for `picture`.
#[must_use]
pub fn format_text(picture: Picture) -> String {
    picture.0.to_string()
}

/// Outcome of reading a picture from a link parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlPicture {
    /// The parameter is not in the link.
    Absent,
    /// The parameter is present but does not parse.
    Malformed(ParseError),
    /// The parameter decoded cleanly.
    Present(Picture),
}

impl UrlPicture {
    /// The decoded picture, if any.
    #[must_use]
    pub const fn picture(self) -> Option<Picture> {
        match self {
            Self::Present(picture) => Some(picture),
            Self::Absent | Self::Malformed(_) => None,
        }
    }
}

/// Encode `picture` for a link parameter.
#[must_use]
pub fn encode_for_url(picture: Picture) -> String {
    format_text(picture)
}

/// Decode an already percent-decoded link parameter value.
#[must_use]
pub fn decode_from_url(value: Option<&str>) -> UrlPicture {
    match value {
        None => UrlPicture::Absent,
        Some(raw) => match parse_text(raw) {
            Ok(picture) => UrlPicture::Present(picture),
            Err(err) => UrlPicture::Malformed(err),
        },
    }
}
