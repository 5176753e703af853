//! Provides a set-of-squares representation with one bit per square
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::convert::TryInto;
use std::iter::FusedIterator;
use std::ops;
use std::fmt;
use super::Square;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A set of squares with each bit representing one square
///
/// Bit `n` corresponds to the square with index `n` (`A8 = 0` through
/// `H1 = 63`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Bitboard(u64);

impl Bitboard {
    /// Creates a new, empty bitboard
    pub fn new() -> Bitboard {
        Default::default()
    }

    /// Returns the number of squares in the bitboard
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Returns `true` if the bitboard is empty
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the bitboard contains `sq`
    pub fn contains(self, sq: Square) -> bool {
        !(self & sq.into()).is_empty()
    }

    /// Adds a square to the bitboard if it is not already present
    pub fn insert(&mut self, sq: Square) {
        *self |= sq.into();
    }

    /// Removes a square from the bitboard if it is present
    pub fn remove(&mut self, sq: Square) {
        *self &= !Bitboard::from(sq);
    }

    /// Removes the lowest-index square from the bitboard and returns it
    pub fn pop(&mut self) -> Option<Square> {
        if self.0 > 0 {
            // get the least significant bit
            let sq: Square = (self.0.trailing_zeros() as usize).try_into().expect("INFALLIBLE");
            // clear the least significant bit
            self.0 &= self.0 - 1;

            Some(sq)
        } else {
            None
        }
    }

    /// Returns the square that would be removed by a pop command
    pub fn peek(self) -> Option<Square> {
        if self.0 > 0 {
            Some((self.0.trailing_zeros() as usize).try_into().expect("INFALLIBLE"))
        } else {
            None
        }
    }
}

impl ops::Not for Bitboard {
    type Output = Self;

    fn not(self) -> Self::Output {
        Bitboard(!self.0)
    }
}

impl ops::BitAnd for Bitboard {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 & rhs.0)
    }
}

impl ops::BitAndAssign for Bitboard {
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0
    }
}

impl ops::BitOr for Bitboard {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 | rhs.0)
    }
}

impl ops::BitOrAssign for Bitboard {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0
    }
}

impl ops::BitXor for Bitboard {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 ^ rhs.0)
    }
}

impl ops::BitXorAssign for Bitboard {
    fn bitxor_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0
    }
}

impl fmt::Display for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl From<u64> for Bitboard {
    fn from(val: u64) -> Bitboard {
        Bitboard(val)
    }
}

impl From<Bitboard> for u64 {
    fn from(bd: Bitboard) -> u64 {
        bd.0
    }
}

impl From<Square> for Bitboard {
    fn from(sq: Square) -> Bitboard {
        Bitboard(1 << sq as u64)
    }
}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter(self)
    }
}

/// Iterator over the squares of a `Bitboard`, in increasing index order
#[derive(Debug, Copy, Clone)]
pub struct IntoIter(Bitboard);

impl Iterator for IntoIter {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.pop()
    }
}

impl ExactSizeIterator for IntoIter {
    fn len(&self) -> usize {
        self.0.len()
    }
}

impl FusedIterator for IntoIter { }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_remove_contains() {
        let mut bd = Bitboard::new();
        assert!(bd.is_empty());

        bd.insert(Square::A8);
        bd.insert(Square::H1);
        assert_eq!(bd.len(), 2);
        assert!(bd.contains(Square::A8));
        assert!(bd.contains(Square::H1));
        assert!(!bd.contains(Square::E4));

        bd.remove(Square::A8);
        assert!(!bd.contains(Square::A8));
        assert_eq!(bd.len(), 1);
    }

    #[test]
    fn iteration_is_in_increasing_square_order() {
        let mut bd = Bitboard::new();
        bd.insert(Square::H1);
        bd.insert(Square::E4);
        bd.insert(Square::A8);

        let squares: Vec<_> = bd.into_iter().collect();
        assert_eq!(squares, vec![Square::A8, Square::E4, Square::H1]);
    }

    #[test]
    fn square_bits_match_indices() {
        assert_eq!(u64::from(Bitboard::from(Square::A8)), 1);
        assert_eq!(u64::from(Bitboard::from(Square::H1)), 1 << 63);
    }
}
