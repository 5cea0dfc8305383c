// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The `Bitboard` type, a set of squares packed into one 64-bit integer.
//!
//! Bit `n` stands for the square with index `n` (a1 = 0, h8 = 63). Union,
//! intersection and complement are single bitwise instructions, which is why
//! the board itself, attack sets and move targets are all bitboards.
use std::fmt;
use std::ops;

use crate::types::{self, File, Rank, Square, TableIndex};

const RANK_1: u64 = 0x0000_0000_0000_00FF;
const FILE_A: u64 = 0x0101_0101_0101_0101;
const LIGHT_SQUARES: u64 = 0x55AA_55AA_55AA_55AA;

#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Bitboard {
    bits: u64,
}

impl Bitboard {
    pub const fn from_bits(bits: u64) -> Bitboard {
        Bitboard { bits }
    }

    /// The set of every square.
    pub const fn all() -> Bitboard {
        Bitboard::from_bits(!0)
    }

    /// The empty set.
    pub const fn none() -> Bitboard {
        Bitboard::from_bits(0)
    }

    /// The set holding exactly one square.
    pub const fn from_square(square: Square) -> Bitboard {
        Bitboard::from_bits(1u64 << (square as u8))
    }

    pub const fn contains(self, square: Square) -> bool {
        (self.bits & (1u64 << (square as u8))) != 0
    }

    pub fn insert(&mut self, square: Square) {
        self.bits |= 1u64 << (square as u8);
    }

    pub fn remove(&mut self, square: Square) {
        self.bits &= !(1u64 << (square as u8));
    }

    pub const fn and(self, other: Bitboard) -> Bitboard {
        Bitboard::from_bits(self.bits & other.bits)
    }

    pub const fn or(self, other: Bitboard) -> Bitboard {
        Bitboard::from_bits(self.bits | other.bits)
    }

    pub const fn xor(self, other: Bitboard) -> Bitboard {
        Bitboard::from_bits(self.bits ^ other.bits)
    }

    pub fn iter(self) -> BitboardIterator {
        BitboardIterator { bits: self.bits }
    }

    /// The members of this set that lie on `rank`.
    pub fn rank(self, rank: Rank) -> Bitboard {
        self.and(Bitboard::from_bits(RANK_1 << (8 * rank.as_index())))
    }

    /// The members of this set that lie on `file`.
    pub fn file(self, file: File) -> Bitboard {
        self.and(Bitboard::from_bits(FILE_A << file.as_index()))
    }

    pub const fn bits(self) -> u64 {
        self.bits
    }

    pub const fn count(self) -> u32 {
        self.bits.count_ones()
    }

    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// The member with the lowest square index, if any.
    pub fn first(self) -> Option<Square> {
        self.iter().next()
    }

    /// The member with the highest square index, if any.
    pub fn last(self) -> Option<Square> {
        if self.is_empty() {
            None
        } else {
            Some(Square::from_index(63 - self.bits.leading_zeros() as usize))
        }
    }
}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Bitboard({:#018x})", self.bits)
    }
}

impl fmt::Display for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for &rank in types::RANKS.iter().rev() {
            for &file in &types::FILES {
                let mark = if self.contains(Square::of(rank, file)) {
                    '1'
                } else {
                    '.'
                };
                write!(f, " {} ", mark)?;
            }

            writeln!(f, "| {}", rank)?;
        }

        writeln!(f, "{}", "---".repeat(8))?;
        for file in &types::FILES {
            write!(f, " {} ", file)?;
        }

        writeln!(f)
    }
}

impl ops::BitAnd for Bitboard {
    type Output = Bitboard;

    fn bitand(self, rhs: Bitboard) -> Bitboard {
        self.and(rhs)
    }
}

impl ops::BitAndAssign for Bitboard {
    fn bitand_assign(&mut self, rhs: Bitboard) {
        *self = self.and(rhs);
    }
}

impl ops::BitOr for Bitboard {
    type Output = Bitboard;

    fn bitor(self, rhs: Bitboard) -> Bitboard {
        self.or(rhs)
    }
}

impl ops::BitOrAssign for Bitboard {
    fn bitor_assign(&mut self, rhs: Bitboard) {
        *self = self.or(rhs);
    }
}

impl ops::BitXor for Bitboard {
    type Output = Bitboard;

    fn bitxor(self, rhs: Bitboard) -> Bitboard {
        self.xor(rhs)
    }
}

impl ops::Not for Bitboard {
    type Output = Bitboard;

    fn not(self) -> Bitboard {
        Bitboard::from_bits(!self.bits)
    }
}

/// Iterates the squares of a bitboard in ascending index order.
pub struct BitboardIterator {
    bits: u64,
}

impl Iterator for BitboardIterator {
    type Item = Square;

    fn next(&mut self) -> Option<Square> {
        if self.bits == 0 {
            return None;
        }

        let next = self.bits.trailing_zeros() as usize;
        self.bits &= self.bits - 1;
        Some(Square::from_index(next))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.bits.count_ones() as usize;
        (remaining, Some(remaining))
    }
}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = BitboardIterator;

    fn into_iter(self) -> BitboardIterator {
        self.iter()
    }
}

pub const BB_RANK_1: Bitboard = Bitboard::from_bits(RANK_1);
pub const BB_RANK_8: Bitboard = Bitboard::from_bits(RANK_1 << 56);
pub const BB_BACK_RANKS: Bitboard = BB_RANK_1.or(BB_RANK_8);

pub const BB_LIGHT_SQUARES: Bitboard = Bitboard::from_bits(LIGHT_SQUARES);
pub const BB_DARK_SQUARES: Bitboard = Bitboard::from_bits(!LIGHT_SQUARES);
