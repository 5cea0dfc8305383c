// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Move policies for the computer side of a game. A policy is only asked to
//! pick one move out of the legal moves; it never sees anything it could get
//! wrong.
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::moves::Move;

pub trait MovePolicy {
    /// Picks one of `moves`. Returns `None` only when `moves` is empty.
    fn choose(&mut self, moves: &[Move]) -> Option<Move>;
}

/// Picks uniformly at random.
pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new() -> RandomPolicy {
        RandomPolicy {
            rng: StdRng::from_entropy(),
        }
    }

    /// A policy whose choices are reproducible for a given seed.
    pub fn seeded(seed: u64) -> RandomPolicy {
        RandomPolicy {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPolicy {
    fn default() -> Self {
        RandomPolicy::new()
    }
}

impl MovePolicy for RandomPolicy {
    fn choose(&mut self, moves: &[Move]) -> Option<Move> {
        moves.choose(&mut self.rng).copied()
    }
}

/// Always picks the first move offered.
#[derive(Default)]
pub struct FirstMovePolicy;

impl MovePolicy for FirstMovePolicy {
    fn choose(&mut self, moves: &[Move]) -> Option<Move> {
        moves.first().copied()
    }
}
