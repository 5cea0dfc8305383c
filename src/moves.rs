// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The `Move` type and its text form.
//!
//! A move is only a source square, a destination square and, for pawns
//! reaching the last rank, the piece to promote to. Everything else (whether
//! it captures, castles or takes en passant) is a property of the position the
//! move is played in, and is worked out by the position when the move is
//! applied. Because of that, two moves compare equal exactly when their text
//! forms do, which is what lets legality checks be plain membership tests
//! against the generated move list.
//!
//! ## Text form
//! `<from><to>[promotion]`, for example `e2e4`, `e1g1` (castling) or `e7e8q`.
//! Promotion letters are lower case `q`, `r`, `b` or `n`.
use serde::de::{self, Deserialize, Deserializer};
use serde::{Serialize, Serializer};
use std::convert::TryFrom;
use std::error::Error;
use std::fmt;
use std::str::FromStr;

use crate::types::{File, PieceKind, Rank, Square};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    source: Square,
    destination: Square,
    promotion: Option<PieceKind>,
}

impl Move {
    /// A move that does not promote.
    pub fn new(source: Square, destination: Square) -> Move {
        Move {
            source,
            destination,
            promotion: None,
        }
    }

    /// A pawn move onto the last rank, promoting to `kind`.
    pub fn promotion(source: Square, destination: Square, kind: PieceKind) -> Move {
        Move {
            source,
            destination,
            promotion: Some(kind),
        }
    }

    pub fn source(self) -> Square {
        self.source
    }

    pub fn destination(self) -> Square {
        self.destination
    }

    pub fn promotion_piece(self) -> Option<PieceKind> {
        self.promotion
    }

    pub fn is_promotion(self) -> bool {
        self.promotion.is_some()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.source, self.destination)?;
        if let Some(kind) = self.promotion {
            write!(f, "{}", kind)?;
        }

        Ok(())
    }
}

/// Reasons a piece of text is not a well-formed move. This says nothing about
/// legality; `e2e5` parses fine and is rejected later.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveParseError {
    WrongLength(usize),
    InvalidSquare,
    InvalidPromotion(char),
}

impl fmt::Display for MoveParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MoveParseError::WrongLength(len) => {
                write!(f, "expected 4 or 5 characters, found {}", len)
            }
            MoveParseError::InvalidSquare => write!(f, "invalid square"),
            MoveParseError::InvalidPromotion(c) => write!(f, "invalid promotion piece '{}'", c),
        }
    }
}

impl Error for MoveParseError {}

impl FromStr for Move {
    type Err = MoveParseError;

    fn from_str(text: &str) -> Result<Move, MoveParseError> {
        let chars: Vec<char> = text.chars().collect();
        if chars.len() != 4 && chars.len() != 5 {
            return Err(MoveParseError::WrongLength(chars.len()));
        }

        let square = |file: char, rank: char| -> Result<Square, MoveParseError> {
            let file = File::try_from(file).map_err(|_| MoveParseError::InvalidSquare)?;
            let rank = Rank::try_from(rank).map_err(|_| MoveParseError::InvalidSquare)?;
            Ok(Square::of(rank, file))
        };

        let source = square(chars[0], chars[1])?;
        let destination = square(chars[2], chars[3])?;
        match chars.get(4) {
            None => Ok(Move::new(source, destination)),
            Some(&c) => match PieceKind::from_promotion_char(c) {
                Some(kind) => Ok(Move::promotion(source, destination, kind)),
                None => Err(MoveParseError::InvalidPromotion(c)),
            },
        }
    }
}

impl Serialize for Move {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Move {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Move, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}
