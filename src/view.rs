// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A serializable snapshot of a game for front ends that draw their own
//! board.
use crate::moves::Move;
use crate::session::Game;
use crate::status::GameStatus;
use crate::types::{Color, Piece, Square};

#[derive(Clone, Debug, Serialize)]
pub struct PlacedPiece {
    pub square: Square,
    pub piece: Piece,
}

#[derive(Clone, Debug, Serialize)]
pub struct BoardView {
    pub fen: String,
    pub side_to_move: Color,
    pub in_check: bool,
    pub status: GameStatus,
    pub can_claim_draw: bool,
    pub pieces: Vec<PlacedPiece>,
    /// Empty once the game is over.
    pub legal_moves: Vec<Move>,
}

impl BoardView {
    pub fn new(game: &Game) -> BoardView {
        let pos = game.position();
        let status = game.status();
        let legal_moves = if status.is_terminal() {
            Vec::new()
        } else {
            game.legal_moves().iter().copied().collect()
        };

        BoardView {
            fen: pos.as_fen(),
            side_to_move: pos.side_to_move(),
            in_check: pos.in_check(),
            status,
            can_claim_draw: game.can_claim_draw(),
            pieces: pos
                .board()
                .map(|(square, piece)| PlacedPiece { square, piece })
                .collect(),
            legal_moves,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
