// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Attack generation. The per-piece functions answer "which squares does a
//! piece on this square threaten", using precomputed tables for the leapers
//! and ray tables for the sliders. The position-level functions at the bottom
//! of the file answer the same question for a whole side.
//!
//! All attack sets are pseudo-legal: they ignore whether the attacking side's
//! own king would be exposed. That is exactly what check detection and
//! castling validation need.
use crate::bitboard::Bitboard;
use crate::position::Position;
use crate::types::{Color, Direction, PieceKind, Square, TableIndex, COLORS, DIRECTIONS};

const KING_STEPS: [(i32, i32); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

const KNIGHT_STEPS: [(i32, i32); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

fn leaper_targets(sq: Square, steps: &[(i32, i32)]) -> Bitboard {
    let file = sq.file().as_index() as i32;
    let rank = sq.rank().as_index() as i32;
    let mut board = Bitboard::none();
    for &(df, dr) in steps {
        if let Some(target) = Square::from_coords(file + df, rank + dr) {
            board.insert(target);
        }
    }

    board
}

struct LeaperTable {
    table: [Bitboard; 64],
}

impl LeaperTable {
    fn new(steps: &[(i32, i32)]) -> LeaperTable {
        let mut table = [Bitboard::none(); 64];
        for sq in Square::all() {
            table[sq.as_index()] = leaper_targets(sq, steps);
        }

        LeaperTable { table }
    }

    fn attacks(&self, sq: Square) -> Bitboard {
        self.table[sq.as_index()]
    }
}

struct PawnTable {
    table: [[Bitboard; 2]; 64],
}

impl PawnTable {
    fn new() -> PawnTable {
        let mut table = [[Bitboard::none(); 2]; 64];
        for sq in Square::all() {
            for &color in &COLORS {
                // Pawns capture one rank "forward" on either adjacent file.
                let forward = match color {
                    Color::White => 1,
                    Color::Black => -1,
                };

                table[sq.as_index()][color.as_index()] =
                    leaper_targets(sq, &[(-1, forward), (1, forward)]);
            }
        }

        PawnTable { table }
    }

    fn attacks(&self, sq: Square, color: Color) -> Bitboard {
        self.table[sq.as_index()][color.as_index()]
    }
}

/// For every square and direction, the full ray of squares leaving that square
/// up to the edge of the board (the square itself excluded).
struct RayTable {
    table: [[Bitboard; 8]; 64],
}

impl RayTable {
    fn new() -> RayTable {
        let mut table = [[Bitboard::none(); 8]; 64];
        for sq in Square::all() {
            for &dir in &DIRECTIONS {
                let (df, dr) = dir.offsets();
                let mut file = sq.file().as_index() as i32;
                let mut rank = sq.rank().as_index() as i32;
                let mut ray = Bitboard::none();
                while let Some(next) = Square::from_coords(file + df, rank + dr) {
                    ray.insert(next);
                    file += df;
                    rank += dr;
                }

                table[sq.as_index()][dir.as_index()] = ray;
            }
        }

        RayTable { table }
    }

    fn ray(&self, sq: Square, dir: Direction) -> Bitboard {
        self.table[sq.as_index()][dir.as_index()]
    }
}

lazy_static! {
    static ref KING_TABLE: LeaperTable = LeaperTable::new(&KING_STEPS);
    static ref KNIGHT_TABLE: LeaperTable = LeaperTable::new(&KNIGHT_STEPS);
    static ref PAWN_TABLE: PawnTable = PawnTable::new();
    static ref RAY_TABLE: RayTable = RayTable::new();
}

/// Squares reachable along one ray, stopping at (and including) the first
/// occupied square.
fn ray_attacks(sq: Square, occupancy: Bitboard, dir: Direction) -> Bitboard {
    let ray = RAY_TABLE.ray(sq, dir);
    let blockers = ray & occupancy;
    let nearest = if dir.is_positive() {
        blockers.first()
    } else {
        blockers.last()
    };

    match nearest {
        Some(blocker) => ray ^ RAY_TABLE.ray(blocker, dir),
        None => ray,
    }
}

fn slide(sq: Square, occupancy: Bitboard, dirs: &[Direction]) -> Bitboard {
    dirs.iter()
        .fold(Bitboard::none(), |acc, &dir| acc | ray_attacks(sq, occupancy, dir))
}

pub fn pawn_attacks(sq: Square, color: Color) -> Bitboard {
    PAWN_TABLE.attacks(sq, color)
}

pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_TABLE.attacks(sq)
}

pub fn king_attacks(sq: Square) -> Bitboard {
    KING_TABLE.attacks(sq)
}

pub fn bishop_attacks(sq: Square, occupancy: Bitboard) -> Bitboard {
    slide(
        sq,
        occupancy,
        &[
            Direction::NorthEast,
            Direction::SouthEast,
            Direction::SouthWest,
            Direction::NorthWest,
        ],
    )
}

pub fn rook_attacks(sq: Square, occupancy: Bitboard) -> Bitboard {
    slide(
        sq,
        occupancy,
        &[
            Direction::North,
            Direction::East,
            Direction::South,
            Direction::West,
        ],
    )
}

pub fn queen_attacks(sq: Square, occupancy: Bitboard) -> Bitboard {
    bishop_attacks(sq, occupancy) | rook_attacks(sq, occupancy)
}

//
// Position-level queries
//

/// The set of `by` pieces that attack `target`.
///
/// Every attack relation is symmetric except the pawn's, so this places each
/// kind of piece on the target square and intersects its attacks with the
/// attacker's pieces of that kind. For pawns the table of the *other* color
/// gives the squares a `by` pawn would have to stand on.
pub fn attackers(pos: &Position, target: Square, by: Color) -> Bitboard {
    let occupancy = pos.occupancy();
    let diagonal = pos.pieces_of_kind(by, PieceKind::Bishop) | pos.queens(by);
    let straight = pos.pieces_of_kind(by, PieceKind::Rook) | pos.queens(by);

    (pawn_attacks(target, by.toggle()) & pos.pawns(by))
        | (knight_attacks(target) & pos.knights(by))
        | (king_attacks(target) & pos.kings(by))
        | (bishop_attacks(target, occupancy) & diagonal)
        | (rook_attacks(target, occupancy) & straight)
}

/// Whether any piece of color `by` attacks `square`.
pub fn is_attacked(pos: &Position, square: Square, by: Color) -> bool {
    !attackers(pos, square, by).is_empty()
}

/// Every square attacked by at least one piece of color `by`.
pub fn attacked_squares(pos: &Position, by: Color) -> Bitboard {
    let occupancy = pos.occupancy();
    pos.pieces(by)
        .iter()
        .filter_map(|sq| pos.piece_at(sq).map(|piece| piece.attacks(sq, occupancy)))
        .fold(Bitboard::none(), |acc, attacks| acc | attacks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn squares(list: &[Square]) -> Bitboard {
        list.iter()
            .fold(Bitboard::none(), |acc, &sq| acc | Bitboard::from_square(sq))
    }

    #[test]
    fn king_in_corner() {
        assert_eq!(
            squares(&[Square::A2, Square::B2, Square::B1]),
            king_attacks(Square::A1)
        );
        assert_eq!(8, king_attacks(Square::E4).count());
    }

    #[test]
    fn knight_on_edge() {
        assert_eq!(
            squares(&[Square::B3, Square::C2]),
            knight_attacks(Square::A1)
        );
        assert_eq!(8, knight_attacks(Square::D5).count());
        assert_eq!(4, knight_attacks(Square::H5).count());
    }

    #[test]
    fn pawns_attack_diagonally_forward() {
        assert_eq!(
            squares(&[Square::D5, Square::F5]),
            pawn_attacks(Square::E4, Color::White)
        );
        assert_eq!(
            squares(&[Square::D3, Square::F3]),
            pawn_attacks(Square::E4, Color::Black)
        );
        assert_eq!(squares(&[Square::B3]), pawn_attacks(Square::A2, Color::White));
        assert!(pawn_attacks(Square::C8, Color::White).is_empty());
    }

    #[test]
    fn sliders_stop_at_first_blocker_inclusive() {
        let occupancy = squares(&[Square::D6, Square::F4]);
        let rook = rook_attacks(Square::D4, occupancy);
        assert!(rook.contains(Square::D5));
        assert!(rook.contains(Square::D6));
        assert!(!rook.contains(Square::D7));
        assert!(rook.contains(Square::F4));
        assert!(!rook.contains(Square::G4));
        assert!(rook.contains(Square::A4));
        assert!(rook.contains(Square::D1));
        assert_eq!(10, rook.count());
    }

    #[test]
    fn bishop_on_empty_board() {
        assert_eq!(13, bishop_attacks(Square::D4, Bitboard::none()).count());
        assert_eq!(7, bishop_attacks(Square::A1, Bitboard::none()).count());
    }

    #[test]
    fn negative_rays_stop_at_nearest_blocker() {
        let occupancy = squares(&[Square::B2, Square::C3]);
        let bishop = bishop_attacks(Square::E5, occupancy);
        assert!(bishop.contains(Square::D4));
        assert!(bishop.contains(Square::C3));
        assert!(!bishop.contains(Square::B2));
    }

    #[test]
    fn queen_is_rook_plus_bishop() {
        assert_eq!(27, queen_attacks(Square::D4, Bitboard::none()).count());
    }

    #[test]
    fn attackers_of_square() {
        let pos = Position::from_fen("4k3/8/8/3p4/8/2N5/8/R3K3 w - - 0 1").unwrap();
        assert_eq!(squares(&[Square::C3]), attackers(&pos, Square::D5, Color::White));
        assert_eq!(
            squares(&[Square::A1, Square::E1, Square::C3]),
            attackers(&pos, Square::D1, Color::White)
        );
        assert!(is_attacked(&pos, Square::E4, Color::Black));
        assert!(!is_attacked(&pos, Square::D4, Color::Black));
    }

    #[test]
    fn pawns_do_not_attack_straight_ahead() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1").unwrap();
        let attacked = attacked_squares(&pos, Color::White);
        assert!(!attacked.contains(Square::E3));
        assert!(attacked.contains(Square::D3));
        assert!(attacked.contains(Square::F3));
    }

    #[test]
    fn attacked_squares_of_start_position() {
        let pos = Position::from_start_position();
        let attacked = attacked_squares(&pos, Color::White);

        // Every square of the third rank, plus every piece on ranks one and
        // two except the rooks in the corners.
        assert_eq!(8, attacked.rank(crate::types::Rank::Three).count());
        assert!(!attacked.contains(Square::A1));
        assert!(!attacked.contains(Square::H1));
        assert!(attacked.contains(Square::B1));
        assert!(!attacked.contains(Square::E4));
        assert_eq!(22, attacked.count());
    }
}
