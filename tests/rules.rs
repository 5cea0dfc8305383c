// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use caissa::opponent::{MovePolicy, RandomPolicy};
use caissa::{Color, GameStatus, Move, MoveError, Position};

fn mv(text: &str) -> Move {
    text.parse().unwrap()
}

fn play(pos: &Position, moves: &[&str]) -> Position {
    moves.iter().fold(pos.clone(), |pos, text| {
        caissa::apply_move(&pos, mv(text)).unwrap_or_else(|err| panic!("{}: {}", text, err))
    })
}

#[test]
fn free_functions_drive_a_game() {
    let start = caissa::new_game();
    assert_eq!(20, caissa::legal_moves(&start).len());

    let next = caissa::apply_move(&start, mv("e2e4")).unwrap();
    assert_eq!(Color::Black, next.side_to_move());
    assert_eq!(GameStatus::InProgress, caissa::status(&[start, next]));
}

#[test]
fn checkmate_reached_by_legal_play() {
    let pos = Position::from_fen("8/8/8/8/8/5kq1/8/7K b - - 0 1").unwrap();
    let mated = caissa::apply_move(&pos, mv("g3g2")).unwrap();

    assert!(caissa::legal_moves(&mated).is_empty());
    assert!(mated.in_check());
    let history = [pos, mated.clone()];
    assert_eq!(GameStatus::Checkmate(Color::Black), caissa::status(&history));
    assert_eq!(
        Err(MoveError::GameOver(GameStatus::Checkmate(Color::Black))),
        caissa::apply_move(&mated, mv("h1g1"))
    );
}

#[test]
fn unsupported_queen_next_to_the_king_is_not_mate() {
    let pos = Position::from_fen("7k/8/8/8/8/8/6q1/7K w - - 0 1").unwrap();
    assert!(pos.in_check());
    assert_eq!(vec![mv("h1g2")], caissa::legal_moves(&pos).to_vec());
    assert_eq!(GameStatus::InProgress, pos.status());
}

#[test]
fn stalemate() {
    let pos = Position::from_fen("8/8/8/8/8/1q6/2k5/K7 w - - 0 1").unwrap();
    assert!(!pos.in_check());
    assert!(caissa::legal_moves(&pos).is_empty());
    assert_eq!(GameStatus::Stalemate, caissa::status(&[pos.clone()]));
    assert_eq!(
        Err(MoveError::GameOver(GameStatus::Stalemate)),
        caissa::apply_move(&pos, mv("a1b1"))
    );
}

#[test]
fn game_over_is_reported_before_illegality() {
    let pos = Position::from_fen("8/8/8/8/8/1q6/2k5/K7 w - - 0 1").unwrap();
    assert_eq!(
        Err(MoveError::GameOver(GameStatus::Stalemate)),
        caissa::apply_move(&pos, mv("h8h1"))
    );
}

#[test]
fn capture_into_insufficient_material() {
    let pos = Position::from_fen("4k3/8/8/8/8/8/3r4/2N1K3 w - - 0 1").unwrap();
    let next = caissa::apply_move(&pos, mv("e1d2")).unwrap();
    assert_eq!(GameStatus::DrawInsufficientMaterial, next.status());
}

#[test]
fn halfmove_clock_resets_and_increments() {
    let pos = Position::from_fen("4k3/3p4/8/8/8/8/8/R3K3 w - - 10 20").unwrap();

    let quiet = play(&pos, &["a1a2"]);
    assert_eq!(11, quiet.halfmove_clock());

    let pawn = play(&pos, &["a1a2", "d7d6"]);
    assert_eq!(0, pawn.halfmove_clock());

    let capture = play(&pos, &["a1a2", "d7d6", "a2a6", "e8d7", "a6d6"]);
    assert_eq!(0, capture.halfmove_clock());
    assert_eq!(22, capture.fullmove_number());
}

#[test]
fn seventy_five_move_rule_fires_exactly_at_150() {
    let pos = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 148 100").unwrap();

    let at_149 = play(&pos, &["a1a2"]);
    assert_eq!(149, at_149.halfmove_clock());
    assert_eq!(GameStatus::InProgress, at_149.status());

    let at_150 = play(&at_149, &["e8d8"]);
    assert_eq!(150, at_150.halfmove_clock());
    assert_eq!(GameStatus::DrawSeventyFiveMove, at_150.status());
    assert_eq!(
        Err(MoveError::GameOver(GameStatus::DrawSeventyFiveMove)),
        caissa::apply_move(&at_150, mv("a2a3"))
    );
}

#[test]
fn seventy_five_move_rule_yields_to_checkmate() {
    let pos = Position::from_fen("8/8/8/8/8/5kq1/8/7K b - - 149 120").unwrap();
    let mated = play(&pos, &["g3g2"]);
    assert_eq!(150, mated.halfmove_clock());
    assert_eq!(GameStatus::Checkmate(Color::Black), mated.status());
}

#[test]
fn en_passant_only_immediately_after_double_push() {
    let start = caissa::new_game();
    let ready = play(&start, &["e2e4", "a7a6", "e4e5", "d7d5"]);
    assert!(caissa::legal_moves(&ready).contains(&mv("e5d6")));

    let taken = play(&ready, &["e5d6"]);
    assert_eq!(None, taken.piece_at(caissa::Square::D5));

    let late = play(&ready, &["h2h3", "h7h6"]);
    assert!(!caissa::legal_moves(&late).contains(&mv("e5d6")));
    assert_eq!(
        Err(MoveError::IllegalMove(mv("e5d6"))),
        caissa::apply_move(&late, mv("e5d6"))
    );
}

#[test]
fn castling_lost_after_king_returns_home() {
    let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    let back = play(&pos, &["e1f1", "e8f8", "f1e1", "f8e8"]);
    let moves = caissa::legal_moves(&back);
    assert!(!moves.contains(&mv("e1g1")));
    assert!(!moves.contains(&mv("e1c1")));
}

#[test]
fn castling_lost_on_one_side_after_rook_returns_home() {
    let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    let back = play(&pos, &["h1h2", "h8h7", "h2h1", "h7h8"]);
    let moves = caissa::legal_moves(&back);
    assert!(!moves.contains(&mv("e1g1")));
    assert!(moves.contains(&mv("e1c1")));
}

#[test]
fn repetition_requires_identical_en_passant_square() {
    let start = caissa::new_game();
    let pushed = play(&start, &["e2e4"]);
    let same_board = Position::from_fen(&pushed.as_fen().replace(" e3 ", " - ")).unwrap();
    assert_ne!(pushed.repetition_key(), same_board.repetition_key());
    assert_ne!(pushed.zobrist_hash(), same_board.zobrist_hash());
}

#[test]
fn fivefold_repetition_by_knight_shuffle() {
    let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];
    let mut history = vec![caissa::new_game()];
    for round in 1..=4 {
        for text in &shuffle {
            let next = caissa::apply_move(history.last().unwrap(), mv(text)).unwrap();
            history.push(next);
        }

        assert_eq!(round + 1, caissa::repetitions(&history));
        if round == 2 {
            assert!(caissa::can_claim_draw(&history));
            assert_eq!(GameStatus::InProgress, caissa::status(&history));
        }
    }

    assert_eq!(GameStatus::DrawFivefoldRepetition, caissa::status(&history));
    assert_eq!(GameStatus::InProgress, caissa::status(&history[..history.len() - 1]));
}

#[test]
fn random_playouts_never_leave_the_mover_in_check() {
    for seed in 0..4 {
        let mut policy = RandomPolicy::seeded(seed);
        let mut pos = caissa::new_game();
        for _ in 0..200 {
            let moves = caissa::legal_moves(&pos);
            let mov = match policy.choose(&moves) {
                Some(mov) => mov,
                None => break,
            };

            if pos.status().is_terminal() {
                break;
            }

            let mover = pos.side_to_move();
            let next = caissa::apply_move(&pos, mov).unwrap();
            assert!(!next.is_check(mover), "{} after {}", pos.as_fen(), mov);
            assert_eq!(next, caissa::apply_move(&pos, mov).unwrap());
            assert_eq!(next.as_fen(), Position::from_fen(next.as_fen()).unwrap().as_fen());
            pos = next;
        }
    }
}
