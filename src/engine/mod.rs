//! Contains the engine which searches for and chooses moves
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use log::{debug, info};
use crate::chess::{Color, Square, Position};

pub mod eval;
pub use eval::{Score, evaluate};

pub mod hash;
pub use hash::HashTable;

/// Search depth used for most of the game
const BASE_DEPTH: usize = 4;

/// Search depth used once few pieces remain
const ENDGAME_DEPTH: usize = 6;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// The outcome of searching a single position
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// The value of the position, in White's favor when positive
    pub score: Score,
    /// The move which achieves `score`, or `None` if the side to move has no
    /// legal moves
    pub best: Option<(Square, Square)>,
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A chess engine which picks moves with a fixed-depth alpha-beta search
///
/// White maximizes and Black minimizes over the same score scale, so a single
/// `(alpha, beta)` window is threaded through the whole tree without
/// negation. Results of searched subtrees are kept in a hash table and reused
/// whenever the same position turns up again at sufficient depth.
#[derive(Debug)]
pub struct Engine {
    table: HashTable,
    base_depth: usize,
    endgame_depth: usize,
    stop: Arc<AtomicBool>,
    nodes: u64,
}

impl Engine {
    /// Creates a new engine with the standard search depths
    pub fn new() -> Engine {
        Engine::with_depths(BASE_DEPTH, ENDGAME_DEPTH)
    }

    /// Creates a new engine searching `base_depth` plies, or `endgame_depth`
    /// plies once the board has thinned out
    pub fn with_depths(base_depth: usize, endgame_depth: usize) -> Engine {
        assert!(base_depth > 0 && endgame_depth > 0);

        Engine {
            table: HashTable::new(),
            base_depth,
            endgame_depth,
            stop: Arc::new(AtomicBool::new(false)),
            nodes: 0,
        }
    }

    /// Returns a handle which aborts the current search when set
    ///
    /// An aborted search returns `None` rather than a partial result.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.stop.clone()
    }

    /// Returns the number of nodes visited by the last search
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Searches for the best move for `color` from `pos` and returns it, or
    /// `None` if the search was aborted or `color` has no legal moves
    pub fn choose_move(&mut self, pos: &Position, color: Color) -> Option<(Square, Square)> {
        self.stop.store(false, Ordering::Relaxed);
        self.nodes = 0;

        let mut pos = pos.clone();
        pos.set_turn(color);
        pos.update_phase();

        let depth = if pos.end_game() {
            self.endgame_depth
        } else {
            self.base_depth
        };
        debug!("searching to depth {} for {}", depth, color);

        let start = Instant::now();
        let result = self.search(&pos, depth, color, -Score::infinity(), Score::infinity())?;
        let elapsed = start.elapsed();

        match result.best {
            Some((origin, dest)) => {
                info!("{} plays {}{} scoring {} ({} nodes in {:?})",
                    color, origin, dest, result.score, self.nodes, elapsed);
            },
            None => {
                info!("{} has no legal moves (score {})", color, result.score);
            },
        }

        result.best
    }

    /// Searches `pos` to `depth` plies and returns its value along with the
    /// move that achieves it.
    ///
    /// `to_move` chooses for this node: White raises `alpha`, Black lowers
    /// `beta`, and a score landing outside the window cuts the node off at
    /// the violated bound. Hash table entries of sufficient depth take part
    /// exactly as if a child had returned their stored score. A position with
    /// no legal moves scores as a mate when the king is attacked and as a
    /// draw otherwise; mates closer to the root score higher. Returns `None`
    /// if the stop handle was set.
    pub fn search(&mut self, pos: &Position, depth: usize, to_move: Color,
                  alpha: Score, beta: Score) -> Option<SearchResult> {
        if self.stop.load(Ordering::Relaxed) {
            return None;
        }
        self.nodes += 1;

        if depth == 0 {
            return Some(SearchResult { score: evaluate(pos), best: None });
        }

        let mut alpha = alpha;
        let mut beta = beta;
        let mut best = None;

        if depth > 1 {
            if let Some(entry) = self.table.probe(pos.zobrist_key(), depth) {
                let val = entry.score();
                let mv = entry.best_move();

                match to_move {
                    Color::White => {
                        if val >= beta {
                            return Some(SearchResult { score: beta, best: Some(mv) });
                        }
                        if val > alpha {
                            alpha = val;
                            best = Some(mv);
                        }
                    },
                    Color::Black => {
                        if val <= alpha {
                            return Some(SearchResult { score: alpha, best: Some(mv) });
                        }
                        if val < beta {
                            beta = val;
                            best = Some(mv);
                        }
                    },
                }
            }
        }

        let moves = pos.legal_moves(to_move);
        if moves.is_empty() {
            let score = if pos.in_check(to_move) {
                Score::mate(!to_move, depth)
            } else {
                Score::draw()
            };

            return Some(SearchResult { score, best: None });
        }

        for (origin, dest) in moves {
            let mut child = pos.clone();
            child.make_move(origin, dest);

            let val = self.search(&child, depth - 1, !to_move, alpha, beta)?.score;

            match to_move {
                Color::White => {
                    if val >= beta {
                        if depth > 1 {
                            self.table.record(pos.zobrist_key(), depth, beta, origin, dest);
                        }
                        return Some(SearchResult { score: beta, best: Some((origin, dest)) });
                    }
                    if val > alpha {
                        alpha = val;
                        best = Some((origin, dest));
                    }
                },
                Color::Black => {
                    if val <= alpha {
                        if depth > 1 {
                            self.table.record(pos.zobrist_key(), depth, alpha, origin, dest);
                        }
                        return Some(SearchResult { score: alpha, best: Some((origin, dest)) });
                    }
                    if val < beta {
                        beta = val;
                        best = Some((origin, dest));
                    }
                },
            }
        }

        let score = match to_move {
            Color::White => alpha,
            Color::Black => beta,
        };

        if depth > 1 {
            if let Some((origin, dest)) = best {
                self.table.record(pos.zobrist_key(), depth, score, origin, dest);
            }
        }

        Some(SearchResult { score, best })
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}
