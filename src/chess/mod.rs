//! The `chess` module holds the board model: colors, pieces, squares and positions.
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fmt;
use std::mem;
use std::str::FromStr;
use std::convert::TryFrom;
use error::*;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Which side a piece or player is on, based on the color of the pieces for that side.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// The number of colors
    pub const COUNT: usize = 2;
}

impl std::ops::Not for Color {
    type Output = Color;

    /// Returns the opposite color
    ///
    /// # Example
    /// ```
    /// use woodpusher::chess::Color;
    /// assert_eq!(!Color::White, Color::Black);
    /// assert_eq!(!Color::Black, Color::White);
    /// ```
    fn not(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => "white",
            Color::Black => "black",
        }.fmt(f)
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::White
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// The type of a chess piece
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum Piece {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl Piece {
    /// The number of piece types
    pub const COUNT: usize = Piece::King as usize + 1;

    /// Returns the material value of the piece in centipawns.
    ///
    /// The king's value is the maximum representable value. It acts as an
    /// "infinite" sentinel and takes no part in alpha-beta bound arithmetic.
    pub fn value(self) -> i16 {
        match self {
            Piece::Pawn => 100,
            Piece::Knight => 300,
            Piece::Bishop => 310,
            Piece::Rook => 500,
            Piece::Queen => 1000,
            Piece::King => i16::max_value(),
        }
    }

    /// Returns the base index into the Zobrist key table for this (piece, color)
    /// pair. Adding a square index gives the key for one occupied square.
    ///
    /// Black keys for a piece type come first, then white: 128 keys per type,
    /// 768 in total, with index 768 reserved for the side-to-move key.
    pub fn key_offset(self, color: Color) -> usize {
        self as usize * 2 * Square::COUNT + match color {
            Color::Black => 0,
            Color::White => Square::COUNT,
        }
    }

    /// Returns the ASCII letter for the piece: uppercase for White, lowercase
    /// for Black.
    pub fn letter(self, color: Color) -> char {
        let c = match self {
            Piece::Pawn => 'P',
            Piece::Knight => 'N',
            Piece::Bishop => 'B',
            Piece::Rook => 'R',
            Piece::Queen => 'Q',
            Piece::King => 'K',
        };

        match color {
            Color::White => c,
            Color::Black => c.to_ascii_lowercase(),
        }
    }

    /// Returns the Unicode chess symbol for the piece.
    pub fn symbol(self, color: Color) -> char {
        match (color, self) {
            (Color::White, Piece::Pawn) => '\u{2659}',
            (Color::White, Piece::Knight) => '\u{2658}',
            (Color::White, Piece::Bishop) => '\u{2657}',
            (Color::White, Piece::Rook) => '\u{2656}',
            (Color::White, Piece::Queen) => '\u{2655}',
            (Color::White, Piece::King) => '\u{2654}',
            (Color::Black, Piece::Pawn) => '\u{265f}',
            (Color::Black, Piece::Knight) => '\u{265e}',
            (Color::Black, Piece::Bishop) => '\u{265d}',
            (Color::Black, Piece::Rook) => '\u{265c}',
            (Color::Black, Piece::Queen) => '\u{265b}',
            (Color::Black, Piece::King) => '\u{265a}',
        }
    }

    /// Parses a single board-string character, accepting both the ASCII letter
    /// sets and the Unicode symbol sets.
    pub fn from_glyph(c: char) -> Option<(Color, Piece)> {
        use Color::*;
        use Piece::*;

        match c {
            'P' | '\u{2659}' => Some((White, Pawn)),
            'N' | '\u{2658}' => Some((White, Knight)),
            'B' | '\u{2657}' => Some((White, Bishop)),
            'R' | '\u{2656}' => Some((White, Rook)),
            'Q' | '\u{2655}' => Some((White, Queen)),
            'K' | '\u{2654}' => Some((White, King)),
            'p' | '\u{265f}' => Some((Black, Pawn)),
            'n' | '\u{265e}' => Some((Black, Knight)),
            'b' | '\u{265d}' => Some((Black, Bishop)),
            'r' | '\u{265c}' => Some((Black, Rook)),
            'q' | '\u{265b}' => Some((Black, Queen)),
            'k' | '\u{265a}' => Some((Black, King)),
            _ => None,
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.letter(Color::White).fmt(f)
    }
}

impl TryFrom<usize> for Piece {
    type Error = Error;

    fn try_from(value: usize) -> Result<Self> {
        if value < Self::COUNT {
            unsafe { Ok(mem::transmute::<u8, Piece>(value as u8)) }
        } else {
            Err(Error::TryFromIntError)
        }
    }
}

impl From<Piece> for usize {
    fn from(value: Piece) -> Self {
        value as Self
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A specific square on the board.
///
/// Discriminants run row-major from Black's back rank, so `A8 = 0` up to
/// `H1 = 63`. The 1-based `row` counts from Black's side of the board and the
/// 1-based `col` from the queenside, matching `row = index/8 + 1` and
/// `col = index%8 + 1`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum Square {
    // discriminants are spelled out so nothing can go wrong when we use transmute later
    A8 =  0, B8 =  1, C8 =  2, D8 =  3, E8 =  4, F8 =  5, G8 =  6, H8 =  7,
    A7 =  8, B7 =  9, C7 = 10, D7 = 11, E7 = 12, F7 = 13, G7 = 14, H7 = 15,
    A6 = 16, B6 = 17, C6 = 18, D6 = 19, E6 = 20, F6 = 21, G6 = 22, H6 = 23,
    A5 = 24, B5 = 25, C5 = 26, D5 = 27, E5 = 28, F5 = 29, G5 = 30, H5 = 31,
    A4 = 32, B4 = 33, C4 = 34, D4 = 35, E4 = 36, F4 = 37, G4 = 38, H4 = 39,
    A3 = 40, B3 = 41, C3 = 42, D3 = 43, E3 = 44, F3 = 45, G3 = 46, H3 = 47,
    A2 = 48, B2 = 49, C2 = 50, D2 = 51, E2 = 52, F2 = 53, G2 = 54, H2 = 55,
    A1 = 56, B1 = 57, C1 = 58, D1 = 59, E1 = 60, F1 = 61, G1 = 62, H1 = 63,
}

impl Square {
    /// The number of squares
    pub const COUNT: usize = Square::H1 as usize + 1;

    /// Returns a square from its 1-based row (from Black's back rank) and
    /// 1-based column, or `None` if either coordinate is off the board.
    pub fn from_row_col(row: i8, col: i8) -> Option<Square> {
        if (1..=8).contains(&row) && (1..=8).contains(&col) {
            Square::try_from((row as usize - 1) * 8 + col as usize - 1).ok()
        } else {
            None
        }
    }

    /// Returns the square's 1-based row, counted from Black's back rank.
    pub fn row(self) -> i8 {
        (self as i8) / 8 + 1
    }

    /// Returns the square's 1-based column, counted from the queenside.
    pub fn col(self) -> i8 {
        (self as i8) % 8 + 1
    }

    /// Returns the square `dr` rows and `dc` columns away, or `None` if that
    /// square is off the board.
    pub fn offset(self, dr: i8, dc: i8) -> Option<Square> {
        Square::from_row_col(self.row() + dr, self.col() + dc)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.col() as u8 - 1) as char;
        let rank = (b'0' + 9 - self.row() as u8) as char;
        write!(f, "{}{}", file, rank)
    }
}

impl FromStr for Square {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let c: Vec<_> = s.chars().collect();
        if c.len() != 2 {
            return Err(Error::ParseError);
        }

        let col = match c[0] {
            'a'..='h' => c[0] as i8 - 'a' as i8 + 1,
            'A'..='H' => c[0] as i8 - 'A' as i8 + 1,
            _ => return Err(Error::ParseError),
        };
        let row = match c[1] {
            '1'..='8' => 9 - (c[1] as i8 - '0' as i8),
            _ => return Err(Error::ParseError),
        };

        Square::from_row_col(row, col).ok_or(Error::ParseError)
    }
}

impl TryFrom<usize> for Square {
    type Error = Error;

    fn try_from(value: usize) -> Result<Self> {
        if value < Self::COUNT {
            unsafe { Ok(mem::transmute::<u8, Square>(value as u8)) }
        } else {
            Err(Error::TryFromIntError)
        }
    }
}

impl From<Square> for usize {
    fn from(value: Square) -> Self {
        value as Self
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
pub mod bitboard;
pub use bitboard::Bitboard;
mod position;
pub use position::Position;
pub use position::zobrist::Zobrist;

pub mod error;



#[cfg(test)]
mod square_tests {
    use std::convert::TryFrom;
    use super::Square;

    #[test]
    fn index_row_col_are_consistent() {
        for i in 0..Square::COUNT {
            let sq = Square::try_from(i).unwrap();
            assert_eq!(sq as usize, i);
            assert_eq!(sq.row() as usize, i / 8 + 1);
            assert_eq!(sq.col() as usize, i % 8 + 1);
            assert_eq!(Square::from_row_col(sq.row(), sq.col()), Some(sq));
        }
    }

    #[test]
    fn corners_have_expected_names() {
        assert_eq!(Square::A8 as usize, 0);
        assert_eq!(Square::H8 as usize, 7);
        assert_eq!(Square::A1 as usize, 56);
        assert_eq!(Square::H1 as usize, 63);
        assert_eq!(format!("{}", Square::A8), "a8");
        assert_eq!(format!("{}", Square::H1), "h1");
        assert_eq!(format!("{}", Square::E4), "e4");
    }

    #[test]
    fn display_and_fromstr_round_trip() {
        for i in 0..Square::COUNT {
            let sq = Square::try_from(i).unwrap();
            assert_eq!(format!("{}", sq).parse::<Square>().unwrap(), sq);
        }
        assert!("e9".parse::<Square>().is_err());
        assert!("i4".parse::<Square>().is_err());
        assert!("e44".parse::<Square>().is_err());
    }

    #[test]
    fn offsets_are_bounds_checked() {
        assert_eq!(Square::A8.offset(0, -1), None);
        assert_eq!(Square::A8.offset(-1, 0), None);
        assert_eq!(Square::H1.offset(0, 1), None);
        assert_eq!(Square::H1.offset(1, 0), None);
        assert_eq!(Square::E4.offset(-1, 1), Some(Square::F5));
    }

    #[test]
    fn out_of_bound_usize_conversion_is_an_error() {
        assert!(Square::try_from(Square::COUNT).is_err());
    }
}
