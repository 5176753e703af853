//! Provides the engine's evaluation function and the score type it returns
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fmt;
use std::ops;
use crate::chess::{Color, Piece, Square, Position};

/// Squares whose occupation earns a positional bonus
const CENTER: [Square; 4] = [Square::D5, Square::E5, Square::D4, Square::E4];

/// Bonus for a pawn on a center square
const CENTER_PAWN_BONUS: i32 = 10;

/// Bonus for a knight on a center square
const CENTER_KNIGHT_BONUS: i32 = 25;

/// Bonus for a king which has not yet moved
const UNMOVED_KING_BONUS: i32 = 15;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// The engine's evaluation of a position, in White's favor when positive
///
/// Scores are centipawn-scaled except near the ends of the range, which are
/// reserved for forced mates. A mate found closer to the root scores higher
/// than one found deeper, so the engine prefers the shortest mate it can see.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Score(i32);

impl Score {
    /// A score which exceeds every score a search can return
    pub fn infinity() -> Score {
        Score(1_000_000)
    }

    /// The score of a drawn position
    pub fn draw() -> Score {
        Score(0)
    }

    /// The score of a position where `winner` has mated, found with
    /// `depth_remaining` plies of search left
    ///
    /// Larger remaining depth means the mate is nearer the root, so it
    /// dominates mates found further down the tree.
    pub fn mate(winner: Color, depth_remaining: usize) -> Score {
        let magnitude = 900_000 + depth_remaining as i32;
        match winner {
            Color::White => Score(magnitude),
            Color::Black => Score(-magnitude),
        }
    }

    /// Returns `true` if the score indicates a forced mate for either side
    pub fn is_mate(self) -> bool {
        self.0.abs() >= 900_000
    }
}

impl ops::Neg for Score {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Score(-self.0)
    }
}

impl From<i32> for Score {
    fn from(val: i32) -> Score {
        Score(val)
    }
}

impl From<Score> for i32 {
    fn from(score: Score) -> i32 {
        score.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Statically evaluates `pos` from White's point of view.
///
/// The score sums the material of both sides (White positive, Black
/// negative), adds a bonus for each king still on its original square, and
/// rewards pawns and knights occupying the four center squares. The king's
/// material value is a sentinel large enough that no combination of other
/// pieces outweighs it.
pub fn evaluate(pos: &Position) -> Score {
    let mut total: i32 = 0;

    for sq in pos.occupied() {
        let (color, piece) = pos.piece_at(sq).expect("INFALLIBLE");
        let value = i32::from(piece.value());

        match color {
            Color::White => total += value,
            Color::Black => total -= value,
        }
    }

    for &color in &[Color::White, Color::Black] {
        let sign = match color {
            Color::White => 1,
            Color::Black => -1,
        };

        if !pos.king_has_moved(color) {
            total += sign * UNMOVED_KING_BONUS;
        }

        for &sq in &CENTER {
            match pos.piece_at(sq) {
                Some((occupant, Piece::Pawn)) if occupant == color => {
                    total += sign * CENTER_PAWN_BONUS;
                },
                Some((occupant, Piece::Knight)) if occupant == color => {
                    total += sign * CENTER_KNIGHT_BONUS;
                },
                _ => { },
            }
        }
    }

    Score(total)
}

////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_setup_is_balanced() {
        assert_eq!(evaluate(&Position::standard()), Score::draw());
    }

    #[test]
    fn material_advantage_shows_in_the_sign() {
        // white queen against a bare black king
        let pos: Position = "k7\n8\n8\n8\n8\n8\n8\nKQ6".parse().unwrap();
        assert!(evaluate(&pos) > Score::from(900));

        // mirrored
        let pos: Position = "kq6\n8\n8\n8\n8\n8\n8\nK7".parse().unwrap();
        assert!(evaluate(&pos) < Score::from(-900));
    }

    #[test]
    fn center_pawns_and_knights_earn_bonuses() {
        let base: Position = "k7\n8\n8\n8\n8\n8\n8\nK7".parse().unwrap();
        let pawn: Position = "k7\n8\n8\n8\n4P3\n8\n8\nK7".parse().unwrap();
        let knight: Position = "k7\n8\n8\n8\n4N3\n8\n8\nK7".parse().unwrap();
        let off_center: Position = "k7\n8\n8\n8\n8\n8\n4P3\nK7".parse().unwrap();

        let base_score = i32::from(evaluate(&base));
        assert_eq!(i32::from(evaluate(&pawn)), base_score + 100 + 10);
        assert_eq!(i32::from(evaluate(&knight)), base_score + 300 + 25);
        assert_eq!(i32::from(evaluate(&off_center)), base_score + 100);
    }

    #[test]
    fn an_unmoved_king_is_worth_keeping_home() {
        let mut pos = Position::standard();
        let before = i32::from(evaluate(&pos));

        pos.make_move(Square::E2, Square::E4);
        pos.make_move(Square::E7, Square::E5);
        pos.make_move(Square::E1, Square::E2);
        let after = i32::from(evaluate(&pos));

        // white forfeits the bonus, black keeps it; the pawn bonuses cancel
        assert_eq!(before - after, 15);
    }

    #[test]
    fn mate_scores_dominate_material_and_prefer_the_root() {
        assert!(Score::mate(Color::White, 0) > evaluate(&Position::standard()));
        assert!(Score::mate(Color::White, 3) > Score::mate(Color::White, 1));
        assert!(Score::mate(Color::Black, 3) < Score::mate(Color::Black, 1));
        assert!(Score::mate(Color::White, 0) < Score::infinity());
        assert!(Score::mate(Color::White, 0).is_mate());
        assert!(!Score::draw().is_mate());
    }
}
