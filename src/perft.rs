// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use rayon::prelude::*;

use crate::move_generator::legal_moves;
use crate::moves::Move;
use crate::position::Position;

/// Counts the leaves of the legal move tree of `pos` at `depth` plies.
pub fn perft(pos: &Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = legal_moves(pos);
    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .par_iter()
        .map(|&mov| perft(&pos.successor(mov), depth - 1))
        .sum()
}

/// The perft count below each legal move of `pos`, sorted by move text.
pub fn divide(pos: &Position, depth: u32) -> Vec<(Move, u64)> {
    let mut counts: Vec<_> = legal_moves(pos)
        .par_iter()
        .map(|&mov| (mov, perft(&pos.successor(mov), depth.saturating_sub(1))))
        .collect();
    counts.sort_by_key(|&(mov, _)| mov.to_string());
    counts
}
