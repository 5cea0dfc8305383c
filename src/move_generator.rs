// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Move generation.
//!
//! Moves are generated in two stages. `generate_pseudolegal` produces every
//! move that obeys the movement rules of the pieces, ignoring whether the
//! mover's king is left attacked. `generate_moves` then plays each candidate
//! on a copy of the position and keeps only those after which the mover is not
//! in check. Castling is the exception: its extra conditions (king not in
//! check, transit square not attacked) are checked up front because the
//! simulation only sees the final square.
use arrayvec::ArrayVec;

use crate::attacks;
use crate::moves::Move;
use crate::position::{self, Position};
use crate::types::{Color, Direction, Piece, PieceKind, Rank, Square, PROMOTION_KINDS};

/// A stack-allocated list of moves. No chess position has anywhere near 256
/// pseudo-legal moves.
pub type MoveVec = ArrayVec<[Move; 256]>;

pub struct MoveGenerator;

impl MoveGenerator {
    pub fn new() -> MoveGenerator {
        MoveGenerator
    }

    /// Appends every legal move of `pos` to `moves`.
    pub fn generate_moves(&self, pos: &Position, moves: &mut MoveVec) {
        let mut pseudolegal = MoveVec::new();
        self.generate_pseudolegal(pos, &mut pseudolegal);

        let us = pos.side_to_move();
        for mov in pseudolegal {
            if !pos.successor(mov).is_check(us) {
                moves.push(mov);
            }
        }
    }

    /// Appends every pseudo-legal move of `pos` to `moves`.
    pub fn generate_pseudolegal(&self, pos: &Position, moves: &mut MoveVec) {
        self.generate_pawn_moves(pos, moves);
        self.generate_piece_moves(pos, moves);
        self.generate_castling_moves(pos, moves);
    }

    fn generate_pawn_moves(&self, pos: &Position, moves: &mut MoveVec) {
        let us = pos.side_to_move();
        let forward = position::pawn_direction(us);
        let (start_rank, promotion_rank) = match us {
            Color::White => (Rank::Two, Rank::Eight),
            Color::Black => (Rank::Seven, Rank::One),
        };

        let occupancy = pos.occupancy();
        let enemies = pos.pieces(us.toggle());
        for source in pos.pawns(us) {
            // Pawns never stand on the back ranks, so one step forward is
            // always on the board.
            let target = source.towards(forward);
            if !occupancy.contains(target) {
                push_pawn_move(moves, source, target, promotion_rank);
                if source.rank() == start_rank {
                    let double_target = target.towards(forward);
                    if !occupancy.contains(double_target) {
                        moves.push(Move::new(source, double_target));
                    }
                }
            }

            let captures = attacks::pawn_attacks(source, us);
            for target in captures & enemies {
                push_pawn_move(moves, source, target, promotion_rank);
            }

            if let Some(ep_square) = pos.en_passant_square() {
                if captures.contains(ep_square) {
                    moves.push(Move::new(source, ep_square));
                }
            }
        }
    }

    fn generate_piece_moves(&self, pos: &Position, moves: &mut MoveVec) {
        let us = pos.side_to_move();
        let occupancy = pos.occupancy();
        let not_friendly = !pos.pieces(us);
        for &kind in &[
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Rook,
            PieceKind::Queen,
            PieceKind::King,
        ] {
            let piece = Piece::new(kind, us);
            for source in pos.pieces_of_kind(us, kind) {
                for target in piece.attacks(source, occupancy) & not_friendly {
                    moves.push(Move::new(source, target));
                }
            }
        }
    }

    fn generate_castling_moves(&self, pos: &Position, moves: &mut MoveVec) {
        let us = pos.side_to_move();
        let them = us.toggle();
        let king = position::king_home(us);
        if pos.king_square(us) != Some(king) || pos.in_check() {
            return;
        }

        let occupancy = pos.occupancy();
        let rook = Some(Piece::new(PieceKind::Rook, us));
        let open = |sq: Square| !occupancy.contains(sq);
        let safe = |sq: Square| !attacks::is_attacked(pos, sq, them);

        if pos.can_castle_kingside(us) && pos.piece_at(position::kingside_rook_home(us)) == rook {
            let transit = king.towards(Direction::East);
            let target = transit.towards(Direction::East);
            if open(transit) && open(target) && safe(transit) && safe(target) {
                moves.push(Move::new(king, target));
            }
        }

        if pos.can_castle_queenside(us) && pos.piece_at(position::queenside_rook_home(us)) == rook
        {
            // The rook passes the b-file square, the king does not; it only
            // needs to be empty.
            let transit = king.towards(Direction::West);
            let target = transit.towards(Direction::West);
            let rook_transit = target.towards(Direction::West);
            if open(transit) && open(target) && open(rook_transit) && safe(transit) && safe(target)
            {
                moves.push(Move::new(king, target));
            }
        }
    }
}

impl Default for MoveGenerator {
    fn default() -> Self {
        MoveGenerator::new()
    }
}

fn push_pawn_move(moves: &mut MoveVec, source: Square, target: Square, promotion_rank: Rank) {
    if target.rank() == promotion_rank {
        for &kind in &PROMOTION_KINDS {
            moves.push(Move::promotion(source, target, kind));
        }
    } else {
        moves.push(Move::new(source, target));
    }
}

/// Every legal move of `pos`, in no particular order.
pub fn legal_moves(pos: &Position) -> MoveVec {
    let mut moves = MoveVec::new();
    MoveGenerator::new().generate_moves(pos, &mut moves);
    moves
}
