//! Provides a hash table to store the results of previously searched positions
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use crate::chess::{Square, Zobrist};
use super::eval::Score;

/// Number of entries in a table created with [`HashTable::new`]
const DEFAULT_ENTRIES: usize = 0x10_0000;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Data about a position stored in the table
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TableEntry {
    zobrist: Zobrist,
    depth: usize,
    score: Score,
    origin: Square,
    destination: Square,
}

impl TableEntry {
    /// The score the stored search returned
    pub fn score(&self) -> Score {
        self.score
    }

    /// The best move the stored search found
    pub fn best_move(&self) -> (Square, Square) {
        (self.origin, self.destination)
    }

    /// The depth to which the stored position was searched
    pub fn depth(&self) -> usize {
        self.depth
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A fixed-size table of search results indexed by position hash
///
/// Entries are stored at `hash % len`, always replacing whatever was there
/// before. A lookup only returns an entry whose full hash matches and whose
/// stored depth is at least the depth the caller needs, so a stale or
/// colliding slot is treated as a miss.
#[derive(Debug)]
pub struct HashTable {
    table: Vec<Option<TableEntry>>,
}

impl HashTable {
    /// Creates a new table with the default number of entries
    pub fn new() -> HashTable {
        HashTable::with_entries(DEFAULT_ENTRIES)
    }

    /// Creates a new table with `entries` slots
    pub fn with_entries(entries: usize) -> HashTable {
        assert!(entries > 0);

        HashTable {
            table: vec![None; entries],
        }
    }

    /// Returns the stored entry for `zobrist`, if one exists which was
    /// searched to at least `depth`
    pub fn probe(&self, zobrist: Zobrist, depth: usize) -> Option<&TableEntry> {
        let index = u64::from(zobrist) as usize % self.table.len();

        match &self.table[index] {
            Some(entry) if entry.zobrist == zobrist && entry.depth >= depth => Some(entry),
            _ => None,
        }
    }

    /// Stores a search result, replacing any previous occupant of the slot
    pub fn record(&mut self, zobrist: Zobrist, depth: usize, score: Score,
                  origin: Square, destination: Square) {
        let index = u64::from(zobrist) as usize % self.table.len();

        self.table[index] = Some(TableEntry {
            zobrist,
            depth,
            score,
            origin,
            destination,
        });
    }
}

impl Default for HashTable {
    fn default() -> Self {
        HashTable::new()
    }
}
