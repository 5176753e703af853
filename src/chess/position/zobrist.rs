//! Contains the incremental hash key type and the fixed key table
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fmt;
use lazy_static::lazy_static;
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use crate::chess::{Color, Piece, Square};

/// Keys for every (piece, color, square) combination plus one for the side to
/// move: 6 * 2 * 64 + 1.
const KEY_COUNT: usize = Piece::COUNT * Color::COUNT * Square::COUNT + 1;

/// Index of the key toggled whenever it is Black's turn.
const TURN_KEY: usize = KEY_COUNT - 1;

// The same seed is used every run so that hashes are reproducible.
const KEY_SEED: u64 = 123_456;

lazy_static! {
    static ref KEYS: [u64; KEY_COUNT] = {
        let mut rng = StdRng::seed_from_u64(KEY_SEED);
        let mut keys = [0u64; KEY_COUNT];
        for key in keys.iter_mut() {
            *key = rng.gen();
        }
        keys
    };
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A 64-bit hash key generated from a position
///
/// The key of a position equals the XOR of the keys for every occupied
/// (piece, color, square), XORed with the side-to-move key if it is Black's
/// turn. `Position` maintains it incrementally; see
/// [`Position::recompute_key`](super::Position::recompute_key) for the
/// from-scratch equivalent.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Zobrist(u64);

impl Zobrist {
    /// Creates a new zero key, matching an empty board with White to move
    pub fn new() -> Zobrist {
        Zobrist(0)
    }

    /// Toggles the placement of a piece of the given color on `sq`
    pub fn toggle_piece(&mut self, color: Color, piece: Piece, sq: Square) {
        self.0 ^= KEYS[piece.key_offset(color) + sq as usize];
    }

    /// Toggles whose turn it is
    pub fn toggle_turn(&mut self) {
        self.0 ^= KEYS[TURN_KEY];
    }
}

impl fmt::Display for Zobrist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl From<Zobrist> for u64 {
    /// Allows using the key to derive a hash table index
    fn from(key: Zobrist) -> Self {
        key.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_deterministic() {
        let mut a = Zobrist::new();
        let mut b = Zobrist::new();
        a.toggle_piece(Color::White, Piece::Knight, Square::B1);
        b.toggle_piece(Color::White, Piece::Knight, Square::B1);
        assert_eq!(a, b);
    }

    #[test]
    fn toggles_are_involutions() {
        let mut key = Zobrist::new();
        key.toggle_piece(Color::Black, Piece::Queen, Square::D8);
        key.toggle_turn();
        assert_ne!(key, Zobrist::new());

        key.toggle_turn();
        key.toggle_piece(Color::Black, Piece::Queen, Square::D8);
        assert_eq!(key, Zobrist::new());
    }

    #[test]
    fn distinct_placements_have_distinct_keys() {
        let mut a = Zobrist::new();
        let mut b = Zobrist::new();
        a.toggle_piece(Color::White, Piece::Rook, Square::A1);
        b.toggle_piece(Color::Black, Piece::Rook, Square::A1);
        assert_ne!(a, b);
    }
}
