// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Deciding whether a game is over.
//!
//! `status` classifies the last position of a game history. The rules are
//! tried in a fixed order and the first one that matches wins: checkmate,
//! stalemate, insufficient material, the seventy-five-move rule and fivefold
//! repetition. Only the last of these needs the history; `Position::status`
//! applies the others to a lone position.
use std::fmt;

use crate::bitboard::{BB_DARK_SQUARES, BB_LIGHT_SQUARES};
use crate::position::Position;
use crate::types::{Color, COLORS};

/// Halfmove clock value at which the game is drawn automatically.
pub const SEVENTY_FIVE_MOVE_LIMIT: u32 = 150;

/// Halfmove clock value from which either player may claim a draw.
pub const FIFTY_MOVE_LIMIT: u32 = 100;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum GameStatus {
    InProgress,
    /// The game ended in checkmate; the color is the winner.
    Checkmate(Color),
    Stalemate,
    DrawInsufficientMaterial,
    DrawSeventyFiveMove,
    DrawFivefoldRepetition,
}

impl GameStatus {
    /// Whether no further moves may be played.
    pub fn is_terminal(self) -> bool {
        self != GameStatus::InProgress
    }

    pub fn is_draw(self) -> bool {
        match self {
            GameStatus::InProgress | GameStatus::Checkmate(_) => false,
            _ => true,
        }
    }

    pub fn winner(self) -> Option<Color> {
        match self {
            GameStatus::Checkmate(winner) => Some(winner),
            _ => None,
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GameStatus::InProgress => write!(f, "in progress"),
            GameStatus::Checkmate(winner) => write!(f, "checkmate, {} wins", winner.name()),
            GameStatus::Stalemate => write!(f, "stalemate"),
            GameStatus::DrawInsufficientMaterial => write!(f, "draw by insufficient material"),
            GameStatus::DrawSeventyFiveMove => write!(f, "draw by the seventy-five-move rule"),
            GameStatus::DrawFivefoldRepetition => write!(f, "draw by fivefold repetition"),
        }
    }
}

/// Classifies the last position of `history`. An empty history is a game
/// that has not started, which is in progress.
pub fn status(history: &[Position]) -> GameStatus {
    let current = match history.last() {
        Some(pos) => pos,
        None => return GameStatus::InProgress,
    };

    let status = current.status();
    if status.is_terminal() {
        return status;
    }

    if repetitions(history) >= 5 {
        GameStatus::DrawFivefoldRepetition
    } else {
        GameStatus::InProgress
    }
}

/// The history-free rules, given whether the position has any legal move.
pub(crate) fn classify(pos: &Position, has_legal_moves: bool) -> GameStatus {
    if !has_legal_moves {
        return if pos.in_check() {
            GameStatus::Checkmate(pos.side_to_move().toggle())
        } else {
            GameStatus::Stalemate
        };
    }

    if insufficient_material(pos) {
        return GameStatus::DrawInsufficientMaterial;
    }

    if pos.halfmove_clock() >= SEVENTY_FIVE_MOVE_LIMIT {
        return GameStatus::DrawSeventyFiveMove;
    }

    GameStatus::InProgress
}

/// Whether neither side can possibly deliver mate: no pawns, rooks or queens,
/// and either at most one minor piece on the board or only bishops that all
/// stand on squares of one color.
pub fn insufficient_material(pos: &Position) -> bool {
    let has_mating_material = COLORS
        .iter()
        .any(|&color| !(pos.pawns(color) | pos.rooks(color) | pos.queens(color)).is_empty());
    if has_mating_material {
        return false;
    }

    let knights = pos.knights(Color::White) | pos.knights(Color::Black);
    let bishops = pos.bishops(Color::White) | pos.bishops(Color::Black);
    if (knights | bishops).count() <= 1 {
        return true;
    }

    knights.is_empty()
        && ((bishops & BB_LIGHT_SQUARES).is_empty() || (bishops & BB_DARK_SQUARES).is_empty())
}

/// How many times the last position of `history` occurs in it, itself
/// included.
pub fn repetitions(history: &[Position]) -> usize {
    let current = match history.last() {
        Some(pos) => pos,
        None => return 0,
    };

    // The hash rules out nearly every non-repetition; the key comparison makes
    // the count exact.
    let hash = current.zobrist_hash();
    let key = current.repetition_key();
    history
        .iter()
        .filter(|pos| pos.zobrist_hash() == hash && pos.repetition_key() == key)
        .count()
}

/// Whether the player to move may claim a draw: threefold repetition or the
/// fifty-move rule. A claimable draw does not end the game by itself.
pub fn can_claim_draw(history: &[Position]) -> bool {
    match history.last() {
        Some(pos) => pos.halfmove_clock() >= FIFTY_MOVE_LIMIT || repetitions(history) >= 3,
        None => false,
    }
}
