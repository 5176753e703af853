//! Tests the engine end to end, from board strings to chosen moves
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use woodpusher::chess::{Color, Piece, Position};
use woodpusher::engine::{Engine, Score};

#[test]
fn the_engine_opens_for_black_with_a_legal_move() {
    let mut pos = Position::standard();
    let mut engine = Engine::with_depths(2, 2);

    let best = engine.choose_move(&pos, Color::Black).expect("black can move");
    assert!(pos.legal_moves(Color::Black).contains(&best));

    pos.set_turn(Color::Black);
    let (origin, dest) = best;
    assert!(pos.make_move(origin, dest));

    // an opening move captures nothing and both kings survive
    assert_eq!(pos.occupied().len(), 32);
    assert_eq!(pos.pieces(Piece::King).len(), 2);
    assert!(!pos.in_check(Color::Black));
}

#[test]
fn a_lone_queen_up_endgame_scores_heavily_for_white() {
    let pos: Position = "k7\n8\n8\n8\n8\n8\n8\nKQ6".parse().unwrap();
    let mut engine = Engine::with_depths(2, 2);

    let result = engine
        .search(&pos, 2, Color::White, -Score::infinity(), Score::infinity())
        .expect("search was not aborted");
    assert!(result.score > Score::from(500));

    let (origin, dest) = result.best.expect("white has moves");
    assert!(pos.legal_moves(Color::White).contains(&(origin, dest)));
}

#[test]
fn sparse_boards_trigger_the_deeper_endgame_search() {
    let mut engine = Engine::with_depths(1, 2);

    // a full board searches at the base depth: the root plus one leaf per move
    let full = Position::standard();
    engine.choose_move(&full, Color::White).expect("white can move");
    assert_eq!(engine.nodes(), 1 + full.legal_moves(Color::White).len() as u64);

    // a sparse board searches a ply deeper, expanding beyond one leaf per move
    let sparse: Position = "k7\n8\n8\n8\n8\n8\n8\nKQ6".parse().unwrap();
    engine.choose_move(&sparse, Color::White).expect("white can move");
    assert!(engine.nodes() > 1 + sparse.legal_moves(Color::White).len() as u64);
}

#[test]
fn consecutive_engine_moves_play_out_a_legal_game_prefix() {
    let mut pos = Position::standard();
    let mut engine = Engine::with_depths(2, 2);

    for ply in 0..4 {
        let color = if ply % 2 == 0 { Color::White } else { Color::Black };
        let (origin, dest) = engine.choose_move(&pos, color).expect("a move exists");

        assert!(pos.legal_moves(color).contains(&(origin, dest)), "ply {}", ply);
        pos.set_turn(color);
        assert!(pos.make_move(origin, dest));
        assert_eq!(pos.pieces(Piece::King).len(), 2);
    }
}

#[test]
fn board_strings_round_trip_through_the_engine_boundary() {
    let text = "rnbqkbnr\npppppppp\n8\n8\n8\n8\nPPPPPPPP\nRNBQKBNR";
    let pos: Position = text.parse().unwrap();

    assert_eq!(pos.to_string(), text);
    assert_eq!(pos.zobrist_key(), Position::standard().zobrist_key());
}
