// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::io::{self, BufRead, Write};

use crate::opponent::{MovePolicy, RandomPolicy};
use crate::position::FenParseError;
use crate::session::{Game, PlayError};
use crate::status::GameStatus;
use crate::types::Color;
use crate::view::BoardView;

const INVALID_FORMAT: &str = "Invalid move format! Please use UCI format (e.g., e2e4).";

/// Settings for an interactive game, filled in from the command line.
#[derive(Clone, Debug)]
pub struct Config {
    /// The color the person at the console plays.
    pub human: Color,
    /// Seed for the opponent; a fresh one is drawn from the OS if absent.
    pub seed: Option<u64>,
    /// Starting position; the standard one if absent.
    pub fen: Option<String>,
    /// Print the board as JSON instead of ASCII.
    pub json: bool,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            human: Color::White,
            seed: None,
            fen: None,
            json: false,
        }
    }
}

/// A line-oriented game between the person at the console and a move policy.
pub struct Console<P: MovePolicy> {
    game: Game,
    policy: P,
    human: Color,
    json: bool,
}

impl Console<RandomPolicy> {
    /// A console against the random opponent.
    pub fn from_config(config: &Config) -> Result<Console<RandomPolicy>, FenParseError> {
        let policy = match config.seed {
            Some(seed) => RandomPolicy::seeded(seed),
            None => RandomPolicy::new(),
        };

        Console::new(config, policy)
    }
}

impl<P: MovePolicy> Console<P> {
    pub fn new(config: &Config, policy: P) -> Result<Console<P>, FenParseError> {
        let game = match config.fen {
            Some(ref fen) => Game::from_fen(fen)?,
            None => Game::new(),
        };

        Ok(Console {
            game,
            policy,
            human: config.human,
            json: config.json,
        })
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn run<R, W>(mut self, reader: R, mut writer: W) -> io::Result<()>
    where
        R: BufRead,
        W: Write,
    {
        writeln!(
            &mut writer,
            "{} {}: you play {}. Type 'help' for commands.",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            self.human.name()
        )?;
        self.opponent_turn(&mut writer)?;
        self.render(&mut writer)?;

        for maybe_line in reader.lines() {
            let line = maybe_line?;
            let components: Vec<_> = line.split_whitespace().collect();
            match components.as_slice() {
                [] => {}
                ["quit"] | ["exit"] => break,
                ["help"] => self.handle_help(&mut writer)?,
                ["moves"] => self.handle_moves(&mut writer)?,
                ["fen"] => writeln!(&mut writer, "{}", self.game.position().as_fen())?,
                ["reset"] => {
                    self.game.reset();
                    writeln!(&mut writer, "Game has been reset!")?;
                    self.opponent_turn(&mut writer)?;
                    self.render(&mut writer)?;
                }
                [text] => self.handle_move(&mut writer, text)?,
                _ => writeln!(&mut writer, "{}", INVALID_FORMAT)?,
            }
        }

        Ok(())
    }

    fn handle_move<W: Write>(&mut self, w: &mut W, text: &str) -> io::Result<()> {
        match self.game.play_text(text) {
            Ok(mov) => {
                writeln!(w, "Move '{}' was successful.", mov)?;
                self.opponent_turn(w)?;
                self.render(w)
            }
            Err(PlayError::InvalidFormat(_)) => writeln!(w, "{}", INVALID_FORMAT),
            Err(PlayError::IllegalMove(_)) | Err(PlayError::NoMoveChosen) => {
                writeln!(w, "Illegal move!")
            }
            Err(PlayError::GameOver(status)) => write_status(w, status),
        }
    }

    // The opponent moves only when it is its turn and the game is still on.
    fn opponent_turn<W: Write>(&mut self, w: &mut W) -> io::Result<()> {
        let side = self.game.position().side_to_move();
        if side == self.human || self.game.is_over() {
            return Ok(());
        }

        match self.game.respond(&mut self.policy) {
            Ok(mov) => writeln!(w, "{} played: {}", side.name(), mov),
            Err(err) => writeln!(w, "{}", err),
        }
    }

    fn handle_moves<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let mut moves: Vec<_> = self
            .game
            .legal_moves()
            .iter()
            .map(|mov| mov.to_string())
            .collect();
        moves.sort();
        writeln!(w, "{}", moves.join(" "))
    }

    fn handle_help<W: Write>(&self, w: &mut W) -> io::Result<()> {
        writeln!(w, "Enter a move as <from><to>[promotion], e.g. e2e4 or e7e8q.")?;
        writeln!(w, "  moves   list the legal moves")?;
        writeln!(w, "  fen     print the position as FEN")?;
        writeln!(w, "  reset   start over")?;
        writeln!(w, "  quit    leave")
    }

    fn render<W: Write>(&self, w: &mut W) -> io::Result<()> {
        if self.json {
            let json = BoardView::new(&self.game)
                .to_json()
                .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
            writeln!(w, "{}", json)?;
        } else {
            write!(w, "{}", self.game.position())?;
        }

        let status = self.game.status();
        if status.is_terminal() {
            return write_status(w, status);
        }

        if self.game.position().in_check() {
            writeln!(w, "Check!")?;
        }
        if self.game.can_claim_draw() {
            writeln!(w, "A draw may be claimed.")?;
        }

        Ok(())
    }
}

fn write_status<W: Write>(w: &mut W, status: GameStatus) -> io::Result<()> {
    match status {
        GameStatus::InProgress => Ok(()),
        GameStatus::Checkmate(_) => writeln!(w, "Checkmate! Game over."),
        GameStatus::Stalemate => writeln!(w, "Stalemate! Game over."),
        GameStatus::DrawInsufficientMaterial => writeln!(w, "Insufficient material! Game over."),
        GameStatus::DrawSeventyFiveMove => writeln!(w, "Draw by seventy-five-move rule!"),
        GameStatus::DrawFivefoldRepetition => writeln!(w, "Draw by fivefold repetition!"),
    }
}
