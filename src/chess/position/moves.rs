//! Move generation and attack queries
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use crate::chess::{Color, Piece, Square};
use super::Position;

const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (-2, -1), (-2, 1), (-1, -2), (-1, 2), (1, -2), (1, 2), (2, -1), (2, 1),
];

const KING_STEPS: [(i8, i8); 8] = [
    (-1, -1), (-1, 0), (-1, 1), (0, -1), (0, 1), (1, -1), (1, 0), (1, 1),
];

const BISHOP_RAYS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

const ROOK_RAYS: [(i8, i8); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];

impl Position {
    /// Enumerates the pseudo-legal destinations for the piece on `origin`.
    ///
    /// Pseudo-legal means the move obeys the piece's movement geometry and
    /// blocking/capture rules but may still leave the mover's own king in
    /// check; [`legal_moves`](Position::legal_moves) applies that filter.
    /// Castling and en-passant are not generated. An empty origin yields an
    /// empty set.
    pub fn moves_from(&self, origin: Square) -> Vec<Square> {
        let (color, piece) = match self.piece_at(origin) {
            Some(occupant) => occupant,
            None => return Vec::new(),
        };

        let mut moves = Vec::new();
        match piece {
            Piece::Pawn => self.pawn_moves(origin, color, &mut moves),
            Piece::Knight => self.step_moves(origin, color, &KNIGHT_JUMPS, &mut moves),
            Piece::Bishop => self.ray_moves(origin, color, &BISHOP_RAYS, &mut moves),
            Piece::Rook => self.ray_moves(origin, color, &ROOK_RAYS, &mut moves),
            Piece::Queen => {
                self.ray_moves(origin, color, &ROOK_RAYS, &mut moves);
                self.ray_moves(origin, color, &BISHOP_RAYS, &mut moves);
            },
            Piece::King => self.step_moves(origin, color, &KING_STEPS, &mut moves),
        }

        moves
    }

    /// Pawns advance one row (two from their initial rank if both squares are
    /// free) and capture diagonally onto occupied enemy squares only.
    fn pawn_moves(&self, origin: Square, color: Color, moves: &mut Vec<Square>) {
        // rows count from Black's back rank, so White pawns move toward row 1
        let (dir, initial_row) = match color {
            Color::White => (-1, 7),
            Color::Black => (1, 2),
        };

        if let Some(one) = origin.offset(dir, 0) {
            if self.piece_at(one).is_none() {
                moves.push(one);

                if origin.row() == initial_row {
                    if let Some(two) = origin.offset(2 * dir, 0) {
                        if self.piece_at(two).is_none() {
                            moves.push(two);
                        }
                    }
                }
            }
        }

        for &dc in &[-1, 1] {
            if let Some(diag) = origin.offset(dir, dc) {
                if let Some((occupant, _)) = self.piece_at(diag) {
                    if occupant != color {
                        moves.push(diag);
                    }
                }
            }
        }
    }

    /// Fixed-offset movers (knight, king): each offset is bounds-checked
    /// independently and admissible if the destination is empty or holds an
    /// enemy piece.
    fn step_moves(&self, origin: Square, color: Color, steps: &[(i8, i8)],
                  moves: &mut Vec<Square>) {
        for &(dr, dc) in steps {
            if let Some(dest) = origin.offset(dr, dc) {
                match self.piece_at(dest) {
                    Some((occupant, _)) if occupant == color => { },
                    _ => moves.push(dest),
                }
            }
        }
    }

    /// Sliding movers: each ray extends square by square until blocked. The
    /// blocking square is included if it holds an enemy piece and excluded if
    /// it holds a friendly one.
    fn ray_moves(&self, origin: Square, color: Color, rays: &[(i8, i8)],
                 moves: &mut Vec<Square>) {
        for &(dr, dc) in rays {
            let mut sq = origin;
            while let Some(next) = sq.offset(dr, dc) {
                match self.piece_at(next) {
                    None => {
                        moves.push(next);
                        sq = next;
                    },
                    Some((occupant, _)) => {
                        if occupant != color {
                            moves.push(next);
                        }
                        break;
                    },
                }
            }
        }
    }

    /// Returns `true` if any piece of `by` has `target` in its pseudo-legal
    /// destination set.
    ///
    /// This deliberately uses pseudo-legal moves: recursing into legality
    /// filtering from here would never terminate, since the filter itself
    /// asks this question.
    pub fn square_attacked(&self, target: Square, by: Color) -> bool {
        for origin in self.by_color(by) {
            if self.moves_from(origin).contains(&target) {
                return true;
            }
        }

        false
    }

    /// Returns `true` if the given color's king is attacked by the opponent
    pub fn in_check(&self, color: Color) -> bool {
        self.square_attacked(self.king_square(color), !color)
    }

    /// Recomputes the stored check flags for both kings.
    ///
    /// This answers "is the king attacked right now", nothing more; checkmate
    /// and stalemate classification is up to the caller (an empty
    /// [`legal_moves`](Position::legal_moves) result plus these flags).
    pub fn refresh_check_flags(&mut self) {
        self.white_in_check = self.in_check(Color::White);
        self.black_in_check = self.in_check(Color::Black);
    }

    /// Returns the check flag as of the last [`refresh_check_flags`] call
    ///
    /// [`refresh_check_flags`]: Position::refresh_check_flags
    pub fn check_flag(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_in_check,
            Color::Black => self.black_in_check,
        }
    }

    /// Enumerates every legal move for the given color as (origin,
    /// destination) pairs, in increasing origin-square order.
    ///
    /// Each pseudo-legal candidate is tried on a clone of the position and
    /// discarded if it leaves the mover's own king in check. Both colors get
    /// the same filter.
    pub fn legal_moves(&self, color: Color) -> Vec<(Square, Square)> {
        let mut legal = Vec::new();

        for origin in self.by_color(color) {
            for dest in self.moves_from(origin) {
                let mut child = self.clone();
                child.make_move(origin, dest);
                if !child.in_check(color) {
                    legal.push((origin, dest));
                }
            }
        }

        legal
    }
}
