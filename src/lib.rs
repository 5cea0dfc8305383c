// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A chess rules engine: positions, legal move generation, move application
//! and game-end detection, plus a small session layer and console front end.
//!
//! The four entry points below are all a client needs to run a game:
//!
//! ```
//! let start = caissa::new_game();
//! let mov = "e2e4".parse().unwrap();
//! assert!(caissa::legal_moves(&start).contains(&mov));
//!
//! let next = caissa::apply_move(&start, mov).unwrap();
//! let history = [start, next];
//! assert_eq!(caissa::GameStatus::InProgress, caissa::status(&history));
//! ```

#[macro_use]
extern crate num_derive;
#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

pub mod attacks;
mod bitboard;
pub mod console;
mod move_generator;
mod moves;
pub mod opponent;
mod perft;
mod position;
pub mod session;
mod status;
mod types;
pub mod view;
mod zobrist;

pub use bitboard::{Bitboard, BitboardIterator};
pub use move_generator::{MoveGenerator, MoveVec};
pub use moves::{Move, MoveParseError};
pub use perft::{divide, perft};
pub use position::{FenParseError, MoveError, Position, RepetitionKey, START_FEN};
pub use status::{can_claim_draw, insufficient_material, repetitions, GameStatus};
pub use types::{CastlingRights, Color, File, Piece, PieceKind, Rank, Square};

/// The standard starting position.
pub fn new_game() -> Position {
    Position::from_start_position()
}

/// Every legal move of `pos`.
pub fn legal_moves(pos: &Position) -> MoveVec {
    move_generator::legal_moves(pos)
}

/// Plays `mov` in `pos`, returning the resulting position.
pub fn apply_move(pos: &Position, mov: Move) -> Result<Position, MoveError> {
    pos.apply_move(mov)
}

/// Classifies the game whose positions, oldest first, are `history`.
pub fn status(history: &[Position]) -> GameStatus {
    status::status(history)
}
