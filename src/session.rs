// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A game in progress: the position history plus the rules that need it.
//!
//! `Game` owns every position reached so far, which is what repetition
//! detection needs. It is the only thing that changes when a move is played;
//! the positions themselves are values and are never modified.
use std::error::Error;
use std::fmt;

use crate::move_generator::MoveVec;
use crate::moves::{Move, MoveParseError};
use crate::opponent::MovePolicy;
use crate::position::{FenParseError, MoveError, Position};
use crate::status::{self, GameStatus};

/// Why a move was refused. The game is unchanged whenever one of these is
/// returned.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlayError {
    /// The move text could not be parsed.
    InvalidFormat(MoveParseError),
    /// The move is well formed but not legal in the current position.
    IllegalMove(Move),
    /// The game has already ended.
    GameOver(GameStatus),
    /// The move policy declined to pick from a non-empty move list.
    NoMoveChosen,
}

impl fmt::Display for PlayError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PlayError::InvalidFormat(err) => write!(f, "invalid move format: {}", err),
            PlayError::IllegalMove(mov) => write!(f, "illegal move {}", mov),
            PlayError::GameOver(status) => write!(f, "game is over: {}", status),
            PlayError::NoMoveChosen => write!(f, "no move was chosen"),
        }
    }
}

impl Error for PlayError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PlayError::InvalidFormat(err) => Some(err),
            _ => None,
        }
    }
}

impl From<MoveParseError> for PlayError {
    fn from(err: MoveParseError) -> PlayError {
        PlayError::InvalidFormat(err)
    }
}

impl From<MoveError> for PlayError {
    fn from(err: MoveError) -> PlayError {
        match err {
            MoveError::IllegalMove(mov) => PlayError::IllegalMove(mov),
            MoveError::GameOver(status) => PlayError::GameOver(status),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Game {
    // Never empty; the last entry is the current position.
    positions: Vec<Position>,
}

impl Game {
    /// A game from the standard starting position.
    pub fn new() -> Game {
        Game::from_position(Position::from_start_position())
    }

    pub fn from_position(pos: Position) -> Game {
        Game {
            positions: vec![pos],
        }
    }

    pub fn from_fen(fen: &str) -> Result<Game, FenParseError> {
        Position::from_fen(fen).map(Game::from_position)
    }

    pub fn position(&self) -> &Position {
        self.positions
            .last()
            .expect("game history is never empty")
    }

    /// Every position of the game, oldest first, ending with the current one.
    pub fn history(&self) -> &[Position] {
        &self.positions
    }

    pub fn legal_moves(&self) -> MoveVec {
        self.position().legal_moves()
    }

    pub fn status(&self) -> GameStatus {
        status::status(&self.positions)
    }

    pub fn is_over(&self) -> bool {
        self.status().is_terminal()
    }

    /// How many times the current position has occurred in this game.
    pub fn repetitions(&self) -> usize {
        status::repetitions(&self.positions)
    }

    pub fn can_claim_draw(&self) -> bool {
        status::can_claim_draw(&self.positions)
    }

    /// Plays `mov` for the side to move and returns the new current position.
    pub fn make_move(&mut self, mov: Move) -> Result<&Position, PlayError> {
        let status = self.status();
        if status.is_terminal() {
            warn!("refusing {}: game is over ({})", mov, status);
            return Err(PlayError::GameOver(status));
        }

        let mover = self.position().side_to_move();
        let next = self.position().apply_move(mov).map_err(|err| {
            warn!("refusing {}: {}", mov, err);
            err
        })?;

        debug!("{} played {}", mover.name(), mov);
        self.positions.push(next);
        let status = self.status();
        if status.is_terminal() {
            info!("game over after {}: {}", mov, status);
        }

        Ok(self.position())
    }

    /// Parses `text` as a move and plays it.
    pub fn play_text(&mut self, text: &str) -> Result<Move, PlayError> {
        let mov = text.trim().parse::<Move>().map_err(|err| {
            warn!("refusing '{}': {}", text, err);
            err
        })?;

        self.make_move(mov)?;
        Ok(mov)
    }

    /// Lets `policy` pick and play a move for the side to move.
    pub fn respond<P: MovePolicy + ?Sized>(&mut self, policy: &mut P) -> Result<Move, PlayError> {
        let status = self.status();
        if status.is_terminal() {
            return Err(PlayError::GameOver(status));
        }

        let moves = self.legal_moves();
        let mov = match policy.choose(&moves) {
            Some(mov) => mov,
            None => {
                warn!("policy chose nothing from {} legal moves", moves.len());
                return Err(PlayError::NoMoveChosen);
            }
        };
        self.make_move(mov)?;
        Ok(mov)
    }

    /// Returns to the position the game started from.
    pub fn reset(&mut self) {
        self.positions.truncate(1);
        debug!("game reset to {}", self.position().as_fen());
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{Game, PlayError};
    use crate::moves::{Move, MoveParseError};
    use crate::opponent::{FirstMovePolicy, MovePolicy};
    use crate::status::GameStatus;
    use crate::types::Color;

    #[test]
    fn new_game_is_in_progress() {
        let game = Game::new();
        assert_eq!(1, game.history().len());
        assert_eq!(GameStatus::InProgress, game.status());
        assert_eq!(20, game.legal_moves().len());
        assert!(!game.is_over());
    }

    #[test]
    fn play_text_appends_to_history() {
        let mut game = Game::new();
        let mov = game.play_text("e2e4").unwrap();
        assert_eq!("e2e4", mov.to_string());
        assert_eq!(2, game.history().len());
        assert_eq!(Color::Black, game.position().side_to_move());
    }

    #[test]
    fn malformed_text_is_invalid_format() {
        let mut game = Game::new();
        assert_eq!(
            Err(PlayError::InvalidFormat(MoveParseError::WrongLength(6))),
            game.play_text("hello!")
        );
        assert_eq!(
            Err(PlayError::InvalidFormat(MoveParseError::InvalidSquare)),
            game.play_text("hello")
        );
        assert_eq!(1, game.history().len());
    }

    #[test]
    fn respond_plays_for_side_to_move() {
        let mut game = Game::new();
        game.play_text("e2e4").unwrap();
        let reply = game.respond(&mut FirstMovePolicy).unwrap();
        assert_eq!(3, game.history().len());
        assert_eq!(Color::White, game.position().side_to_move());
        assert!(game.history()[1].legal_moves().contains(&reply));
    }

    struct Abstain;

    impl MovePolicy for Abstain {
        fn choose(&mut self, _moves: &[Move]) -> Option<Move> {
            None
        }
    }

    #[test]
    fn policy_that_abstains_is_refused() {
        let mut game = Game::new();
        assert_eq!(Err(PlayError::NoMoveChosen), game.respond(&mut Abstain));
        assert_eq!(1, game.history().len());
    }

    #[test]
    fn reset_returns_to_start() {
        let mut game = Game::from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1").unwrap();
        game.play_text("e2e4").unwrap();
        game.reset();
        assert_eq!(1, game.history().len());
        assert_eq!("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1", game.position().as_fen());
    }
}
