//! Contains the `Position` structure, which holds the authoritative board state
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fmt;
use std::str::FromStr;
use std::convert::TryFrom;
use super::{Bitboard, Color, Piece, Square};
use super::error::{Error, Result};

pub mod zobrist;
pub mod moves;
use zobrist::Zobrist;

/// A position is in the end-game phase once fewer than this many pieces remain.
const ENDGAME_PIECE_LIMIT: usize = 10;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// The arrangement of pieces on the board, whose turn it is, and the derived
/// state the engine keeps alongside.
///
/// The board is stored twice: a piece-per-square array and one bit mask per
/// piece type plus a white-occupancy mask. The two representations denote
/// identical occupancy at all times; every mutation goes through
/// [`make_move`](Position::make_move) or the internal placement routine, both
/// of which update the array, the masks and the incremental hash together.
///
/// A `Position` is cheap to clone. The search clones a position for every
/// branch it explores and never mutates a position it does not own.
#[derive(Debug, Clone)]
pub struct Position {
    squares: [Option<(Color, Piece)>; Square::COUNT],
    masks: [Bitboard; Piece::COUNT],
    white: Bitboard,

    turn: Color,
    white_king_moved: bool,
    black_king_moved: bool,
    white_in_check: bool,
    black_in_check: bool,
    end_game: bool,

    zobrist: Zobrist,
}

impl Position {
    /// Creates an empty board with White to move
    pub fn new() -> Position {
        Position {
            squares: [None; Square::COUNT],
            masks: [Bitboard::new(); Piece::COUNT],
            white: Bitboard::new(),
            turn: Color::White,
            white_king_moved: false,
            black_king_moved: false,
            white_in_check: false,
            black_in_check: false,
            end_game: false,
            zobrist: Zobrist::new(),
        }
    }

    /// Creates the standard starting position, with the hash freshly computed
    pub fn standard() -> Position {
        use Color::*;
        use Piece::*;

        let mut pos = Position::new();

        let back_rank = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];
        for col in 1..=8 {
            let piece = back_rank[col as usize - 1];
            pos.place(Black, piece, Square::from_row_col(1, col).expect("INFALLIBLE"));
            pos.place(Black, Pawn, Square::from_row_col(2, col).expect("INFALLIBLE"));
            pos.place(White, Pawn, Square::from_row_col(7, col).expect("INFALLIBLE"));
            pos.place(White, piece, Square::from_row_col(8, col).expect("INFALLIBLE"));
        }

        pos
    }

    /// Puts a piece on an empty square, updating the square array, the bit
    /// masks and the hash together.
    fn place(&mut self, color: Color, piece: Piece, sq: Square) {
        self.squares[sq as usize] = Some((color, piece));
        self.masks[piece as usize].insert(sq);
        if color == Color::White {
            self.white.insert(sq);
        }
        self.zobrist.toggle_piece(color, piece, sq);
    }

    /// Executes a move unconditionally, capturing whatever occupies the
    /// destination. Returns `false`, without touching the position, if the
    /// origin square is empty.
    ///
    /// No legality check happens here; filtering out moves that leave the
    /// mover's own king in check is the move generator's responsibility
    /// ([`legal_moves`](Position::legal_moves)).
    ///
    /// A pawn arriving on either back rank is retyped to a queen, with the
    /// hash corrected for the type change. The side to move and the hash's
    /// side-to-move key flip together, so the hash invariant holds at every
    /// reachable position.
    pub fn make_move(&mut self, origin: Square, destination: Square) -> bool {
        let (color, piece) = match self.squares[origin as usize] {
            Some(occupant) => occupant,
            None => return false,
        };

        // lift the mover off its origin square
        self.squares[origin as usize] = None;
        self.masks[piece as usize].remove(origin);
        if color == Color::White {
            self.white.remove(origin);
        }
        self.zobrist.toggle_piece(color, piece, origin);

        // capture whatever sat on the destination
        if let Some((captured_color, captured)) = self.squares[destination as usize] {
            self.masks[captured as usize].remove(destination);
            if captured_color == Color::White {
                self.white.remove(destination);
            }
            self.zobrist.toggle_piece(captured_color, captured, destination);
        }

        // promotion: a pawn reaching either back rank becomes a queen
        let piece = if piece == Piece::Pawn
            && (destination.row() == 1 || destination.row() == 8) {
            Piece::Queen
        } else {
            piece
        };

        self.squares[destination as usize] = Some((color, piece));
        self.masks[piece as usize].insert(destination);
        if color == Color::White {
            self.white.insert(destination);
        }
        self.zobrist.toggle_piece(color, piece, destination);

        if piece == Piece::King {
            match color {
                Color::White => self.white_king_moved = true,
                Color::Black => self.black_king_moved = true,
            }
        }

        self.zobrist.toggle_turn();
        self.turn = !self.turn;

        true
    }

    /// Returns the occupant of a square, if any
    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        self.squares[sq as usize]
    }

    /// Returns the side to move
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// Sets the side to move, keeping the hash's side-to-move key in step
    pub fn set_turn(&mut self, color: Color) {
        if self.turn != color {
            self.turn = color;
            self.zobrist.toggle_turn();
        }
    }

    /// Returns the mask of squares occupied by pieces of the given type
    pub fn pieces(&self, piece: Piece) -> Bitboard {
        self.masks[piece as usize]
    }

    /// Returns the mask of squares occupied by the given color
    pub fn by_color(&self, color: Color) -> Bitboard {
        match color {
            Color::White => self.white,
            Color::Black => self.occupied() & !self.white,
        }
    }

    /// Returns the mask of all occupied squares
    pub fn occupied(&self) -> Bitboard {
        let mut occupied = Bitboard::new();
        for mask in &self.masks {
            occupied |= *mask;
        }
        occupied
    }

    /// Returns the square of the given color's king
    ///
    /// Exactly one king per color exists at all times during search; losing a
    /// king is a modeling error, not a legal game outcome.
    pub fn king_square(&self, color: Color) -> Square {
        (self.pieces(Piece::King) & self.by_color(color)).peek().expect("INFALLIBLE")
    }

    /// Returns `true` if the given color's king has moved at some point
    ///
    /// Only used as a small score nudge; castling legality is out of scope.
    pub fn king_has_moved(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_king_moved,
            Color::Black => self.black_king_moved,
        }
    }

    /// Re-derives the end-game flag from the piece count
    pub fn update_phase(&mut self) {
        self.end_game = self.occupied().len() < ENDGAME_PIECE_LIMIT;
    }

    /// Returns `true` if the position was last judged to be in the end game
    pub fn end_game(&self) -> bool {
        self.end_game
    }

    /// Returns the incrementally maintained hash key
    pub fn zobrist_key(&self) -> Zobrist {
        self.zobrist
    }

    /// Computes the hash key from scratch by scanning every occupied square
    ///
    /// Equal to [`zobrist_key`](Position::zobrist_key) at every reachable
    /// position; used when loading a board and to cross-check the incremental
    /// updates in tests.
    pub fn recompute_key(&self) -> Zobrist {
        let mut key = Zobrist::new();

        for i in 0..Square::COUNT {
            if let Some((color, piece)) = self.squares[i] {
                key.toggle_piece(color, piece, Square::try_from(i).expect("INFALLIBLE"));
            }
        }
        if self.turn == Color::Black {
            key.toggle_turn();
        }

        key
    }

    /// Returns the display token for a square: the occupant's Unicode symbol,
    /// or `'-'` for an empty square
    pub fn glyph(&self, sq: Square) -> char {
        match self.squares[sq as usize] {
            Some((color, piece)) => piece.symbol(color),
            None => '-',
        }
    }

    #[cfg(test)]
    pub(crate) fn masks_match_squares(&self) -> bool {
        for i in 0..Square::COUNT {
            let sq = Square::try_from(i).expect("INFALLIBLE");
            match self.squares[i] {
                Some((color, piece)) => {
                    if !self.masks[piece as usize].contains(sq) {
                        return false;
                    }
                    if self.white.contains(sq) != (color == Color::White) {
                        return false;
                    }
                    // no other piece mask may claim the square
                    for other in 0..Piece::COUNT {
                        if other != piece as usize && self.masks[other].contains(sq) {
                            return false;
                        }
                    }
                },
                None => {
                    for mask in &self.masks {
                        if mask.contains(sq) {
                            return false;
                        }
                    }
                    if self.white.contains(sq) {
                        return false;
                    }
                },
            }
        }

        true
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::standard()
    }
}

impl fmt::Display for Position {
    /// Formats the board as the compact rank-by-rank string accepted by
    /// `FromStr`: a digit skips that many empty squares, any other character
    /// is a piece letter, and rows are separated by newlines.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 1..=8 {
            if row > 1 {
                writeln!(f)?;
            }

            let mut empty = 0;
            for col in 1..=8 {
                let sq = Square::from_row_col(row, col).expect("INFALLIBLE");
                match self.squares[sq as usize] {
                    Some((color, piece)) => {
                        if empty > 0 {
                            write!(f, "{}", empty)?;
                            empty = 0;
                        }
                        write!(f, "{}", piece.letter(color))?;
                    },
                    None => empty += 1,
                }
            }
            if empty > 0 {
                write!(f, "{}", empty)?;
            }
        }

        Ok(())
    }
}

impl FromStr for Position {
    type Err = Error;

    /// Loads a board from its compact string form.
    ///
    /// A decimal digit skips that many squares, newlines are ignored, and any
    /// other character must be a piece letter or Unicode chess symbol. Squares
    /// fill row-major from Black's back rank. The side to move defaults to
    /// White; use [`Position::set_turn`] afterwards if Black is to move.
    fn from_str(s: &str) -> Result<Self> {
        let mut pos = Position::new();
        let mut next = 0usize;

        for c in s.chars() {
            if let Some(skip) = c.to_digit(10) {
                next += skip as usize;
            } else if c == '\r' || c == '\n' {
                continue;
            } else if let Some((color, piece)) = Piece::from_glyph(c) {
                let sq = Square::try_from(next).map_err(|_| Error::BoardOverflow)?;
                pos.place(color, piece, sq);
                next += 1;
            } else {
                return Err(Error::ParseError);
            }
        }

        debug_assert_eq!(pos.zobrist, pos.recompute_key());
        Ok(pos)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_setup_is_consistent() {
        let pos = Position::standard();

        assert!(pos.masks_match_squares());
        assert_eq!(pos.occupied().len(), 32);
        assert_eq!(pos.by_color(Color::White).len(), 16);
        assert_eq!(pos.by_color(Color::Black).len(), 16);
        assert_eq!(pos.turn(), Color::White);
        assert_eq!(pos.piece_at(Square::E1), Some((Color::White, Piece::King)));
        assert_eq!(pos.piece_at(Square::D8), Some((Color::Black, Piece::Queen)));
        assert_eq!(pos.zobrist_key(), pos.recompute_key());
    }

    #[test]
    fn empty_origin_fails_without_mutation() {
        let mut pos = Position::standard();
        let before = pos.clone();

        assert!(!pos.make_move(Square::E4, Square::E5));
        assert_eq!(pos.zobrist_key(), before.zobrist_key());
        assert_eq!(pos.turn(), before.turn());
    }

    #[test]
    fn incremental_hash_matches_recomputation() {
        let mut pos = Position::standard();

        // a short sequence including a capture
        assert!(pos.make_move(Square::E2, Square::E4));
        assert!(pos.make_move(Square::D7, Square::D5));
        assert!(pos.make_move(Square::E4, Square::D5));

        assert_eq!(pos.zobrist_key(), pos.recompute_key());
        assert!(pos.masks_match_squares());
        assert_eq!(pos.occupied().len(), 31);
    }

    #[test]
    fn clone_is_indistinguishable_from_original() {
        let mut pos = Position::standard();
        pos.make_move(Square::G1, Square::F3);

        let copy = pos.clone();
        assert_eq!(copy.zobrist_key(), pos.zobrist_key());
        assert_eq!(copy.turn(), pos.turn());
        for i in 0..Square::COUNT {
            let sq = Square::try_from(i).unwrap();
            assert_eq!(copy.piece_at(sq), pos.piece_at(sq));
        }
    }

    #[test]
    fn turn_flips_with_the_hash_key() {
        let mut pos = Position::standard();
        pos.make_move(Square::E2, Square::E4);

        assert_eq!(pos.turn(), Color::Black);
        assert_eq!(pos.zobrist_key(), pos.recompute_key());

        pos.set_turn(Color::White);
        assert_eq!(pos.zobrist_key(), pos.recompute_key());
        pos.set_turn(Color::White);
        assert_eq!(pos.zobrist_key(), pos.recompute_key());
    }

    #[test]
    fn pawns_promote_to_queens_on_the_back_ranks() {
        let mut pos: Position = "8\n8\n4P3\n8\n8\n3p4\n8\n8".parse().unwrap();

        // white pawn at e6 walks to e8
        assert!(pos.make_move(Square::E6, Square::E7));
        assert!(pos.make_move(Square::E7, Square::E8));
        assert_eq!(pos.piece_at(Square::E8), Some((Color::White, Piece::Queen)));

        // black pawn at d3 walks to d1
        assert!(pos.make_move(Square::D3, Square::D2));
        assert!(pos.make_move(Square::D2, Square::D1));
        assert_eq!(pos.piece_at(Square::D1), Some((Color::Black, Piece::Queen)));

        assert_eq!(pos.zobrist_key(), pos.recompute_key());
        assert!(pos.masks_match_squares());
    }

    #[test]
    fn king_moves_are_remembered() {
        let mut pos = Position::standard();
        assert!(!pos.king_has_moved(Color::White));
        assert!(!pos.king_has_moved(Color::Black));

        pos.make_move(Square::E2, Square::E4);
        pos.make_move(Square::E7, Square::E5);
        pos.make_move(Square::E1, Square::E2);
        assert!(pos.king_has_moved(Color::White));
        assert!(!pos.king_has_moved(Color::Black));
    }

    #[test]
    fn phase_flips_when_few_pieces_remain() {
        let mut pos = Position::standard();
        pos.update_phase();
        assert!(!pos.end_game());

        let mut sparse: Position = "k7\n8\n8\n8\n8\n8\n8\nKQ6".parse().unwrap();
        sparse.update_phase();
        assert!(sparse.end_game());
    }

    #[test]
    fn display_round_trips_through_fromstr() {
        let mut pos = Position::standard();
        pos.make_move(Square::B1, Square::C3);
        pos.make_move(Square::E7, Square::E5);

        let text = pos.to_string();
        let reloaded: Position = text.parse().unwrap();

        for i in 0..Square::COUNT {
            let sq = Square::try_from(i).unwrap();
            assert_eq!(reloaded.piece_at(sq), pos.piece_at(sq));
        }
    }

    #[test]
    fn standard_display_is_the_familiar_string() {
        assert_eq!(
            Position::standard().to_string(),
            "rnbqkbnr\npppppppp\n8\n8\n8\n8\nPPPPPPPP\nRNBQKBNR"
        );
    }

    #[test]
    fn unicode_symbols_load_like_letters() {
        let from_letters: Position = "k7\n8\n8\n8\n8\n8\n8\nKQ6".parse().unwrap();
        let from_symbols: Position = "\u{265a}7\n8\n8\n8\n8\n8\n8\n\u{2654}\u{2655}6".parse().unwrap();
        assert_eq!(from_letters.zobrist_key(), from_symbols.zobrist_key());
    }

    #[test]
    fn bad_board_strings_are_rejected() {
        assert!("x7".parse::<Position>().is_err());
        assert!("8\n8\n8\n8\n8\n8\n8\n8\nK".parse::<Position>().is_err());
    }

    #[test]
    fn glyph_tokens_are_symbols_or_dashes() {
        let pos = Position::standard();
        assert_eq!(pos.glyph(Square::E1), '\u{2654}');
        assert_eq!(pos.glyph(Square::E8), '\u{265a}');
        assert_eq!(pos.glyph(Square::E4), '-');
    }
}
