// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Zobrist hashing of positions. The hash covers exactly the features that
//! decide whether two positions repeat: piece placement, side to move,
//! castling rights and the en passant square. `Position` keeps its hash up to
//! date incrementally through the `modify_*` functions.
use crate::position::Position;
use crate::types::{CastlingRights, Color, Piece, Square, TableIndex, COLORS, PIECE_KINDS};

struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    const fn new(seed: u64) -> Xorshift64 {
        Xorshift64 { state: seed }
    }

    fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

const CASTLING_FLAGS: [CastlingRights; 4] = [
    CastlingRights::WHITE_KINGSIDE,
    CastlingRights::WHITE_QUEENSIDE,
    CastlingRights::BLACK_KINGSIDE,
    CastlingRights::BLACK_QUEENSIDE,
];

struct ZobristKeys {
    pieces: [[[u64; 64]; 6]; 2],
    black_to_move: u64,
    castling: [u64; 4],
    en_passant_file: [u64; 8],
}

impl ZobristKeys {
    fn new(seed: u64) -> ZobristKeys {
        let mut rng = Xorshift64::new(seed);
        let mut keys = ZobristKeys {
            pieces: [[[0; 64]; 6]; 2],
            black_to_move: 0,
            castling: [0; 4],
            en_passant_file: [0; 8],
        };

        for color in keys.pieces.iter_mut() {
            for kind in color.iter_mut() {
                for entry in kind.iter_mut() {
                    *entry = rng.next();
                }
            }
        }

        keys.black_to_move = rng.next();
        for entry in keys.castling.iter_mut() {
            *entry = rng.next();
        }
        for entry in keys.en_passant_file.iter_mut() {
            *entry = rng.next();
        }

        keys
    }

    fn piece(&self, piece: Piece, square: Square) -> u64 {
        self.pieces[piece.color.as_index()][piece.kind.as_index()][square.as_index()]
    }

    fn castling(&self, rights: CastlingRights) -> u64 {
        CASTLING_FLAGS
            .iter()
            .zip(self.castling.iter())
            .filter(|(flag, _)| rights.contains(**flag))
            .fold(0, |acc, (_, key)| acc ^ key)
    }

    fn en_passant(&self, square: Square) -> u64 {
        self.en_passant_file[square.file().as_index()]
    }
}

const ZOBRIST_SEED: u64 = 0xf68e_34a4_e8cc_f09a;

lazy_static! {
    static ref ZOBRIST_KEYS: ZobristKeys = ZobristKeys::new(ZOBRIST_SEED);
}

/// Computes the hash of a position from scratch.
pub fn hash(pos: &Position) -> u64 {
    let mut running_hash = 0u64;
    for &color in &COLORS {
        for &kind in &PIECE_KINDS {
            for square in pos.pieces_of_kind(color, kind) {
                running_hash ^= ZOBRIST_KEYS.piece(Piece::new(kind, color), square);
            }
        }
    }

    if pos.side_to_move() == Color::Black {
        running_hash ^= ZOBRIST_KEYS.black_to_move;
    }

    running_hash ^= ZOBRIST_KEYS.castling(pos.castling_rights());
    if let Some(ep_square) = pos.en_passant_square() {
        running_hash ^= ZOBRIST_KEYS.en_passant(ep_square);
    }

    running_hash
}

pub fn modify_piece(hash: &mut u64, square: Square, piece: Piece) {
    *hash ^= ZOBRIST_KEYS.piece(piece, square);
}

pub fn modify_side_to_move(hash: &mut u64) {
    *hash ^= ZOBRIST_KEYS.black_to_move;
}

pub fn modify_castling(hash: &mut u64, old: CastlingRights, new: CastlingRights) {
    *hash ^= ZOBRIST_KEYS.castling(old ^ new);
}

pub fn modify_en_passant(hash: &mut u64, old: Option<Square>, new: Option<Square>) {
    if let Some(sq) = old {
        *hash ^= ZOBRIST_KEYS.en_passant(sq);
    }
    if let Some(sq) = new {
        *hash ^= ZOBRIST_KEYS.en_passant(sq);
    }
}
