// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::convert::TryFrom;
use std::error::Error;
use std::fmt::{self, Write};
use std::str::FromStr;

use crate::attacks;
use crate::bitboard::{Bitboard, BB_BACK_RANKS};
use crate::move_generator::{self, MoveVec};
use crate::moves::Move;
use crate::status::{self, GameStatus};
use crate::types::TableIndex;
use crate::types::{CastlingRights, Color, Direction, File, Piece, PieceKind, Rank, Square};
use crate::types::{COLORS, FILES, PIECE_KINDS, RANKS};
use crate::zobrist;

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Possible errors that can arise when parsing a FEN string into a `Position`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FenParseError {
    UnexpectedEnd,
    TrailingInput,
    WrongRankCount,
    InvalidDigit,
    RankDoesNotSumToEight,
    UnknownPiece(char),
    InvalidSideToMove,
    InvalidCastle,
    InvalidEnPassant,
    InvalidHalfmove,
    InvalidFullmove,
    InvalidKingCount,
    PawnOnBackRank,
    OpponentInCheck,
}

impl fmt::Display for FenParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FenParseError::UnexpectedEnd => write!(f, "unexpected end of FEN"),
            FenParseError::TrailingInput => write!(f, "unexpected trailing input"),
            FenParseError::WrongRankCount => write!(f, "board must have eight ranks"),
            FenParseError::InvalidDigit => write!(f, "empty-square counts must be 1-8"),
            FenParseError::RankDoesNotSumToEight => write!(f, "rank does not sum to eight squares"),
            FenParseError::UnknownPiece(c) => write!(f, "unknown piece '{}'", c),
            FenParseError::InvalidSideToMove => write!(f, "invalid side to move"),
            FenParseError::InvalidCastle => write!(f, "invalid castling rights"),
            FenParseError::InvalidEnPassant => write!(f, "invalid en passant square"),
            FenParseError::InvalidHalfmove => write!(f, "invalid halfmove clock"),
            FenParseError::InvalidFullmove => write!(f, "invalid fullmove number"),
            FenParseError::InvalidKingCount => write!(f, "each side needs exactly one king"),
            FenParseError::PawnOnBackRank => write!(f, "pawn on the first or last rank"),
            FenParseError::OpponentInCheck => write!(f, "the side not to move is in check"),
        }
    }
}

impl Error for FenParseError {}

/// Reasons `Position::apply_move` refuses a move. The position it was called
/// on is never modified.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveError {
    /// The move is not among the legal moves of the position.
    IllegalMove(Move),
    /// The game has already ended.
    GameOver(GameStatus),
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MoveError::IllegalMove(mov) => write!(f, "illegal move {}", mov),
            MoveError::GameOver(status) => write!(f, "game is over: {}", status),
        }
    }
}

impl Error for MoveError {}

/// A chess position: piece placement plus everything needed to continue the
/// game from it.
///
/// Positions are values. `apply_move` returns a new position and leaves the
/// receiver untouched, so callers can keep every position of a game around
/// for repetition detection.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    boards_by_piece: [Bitboard; 12],
    boards_by_color: [Bitboard; 2],
    en_passant_square: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
    side_to_move: Color,
    castling: CastlingRights,
    zobrist_hash: u64,
}

/// The parts of a position that decide whether it repeats an earlier one:
/// placement, side to move, castling rights and en passant square. The move
/// counters are deliberately left out.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RepetitionKey {
    boards_by_piece: [Bitboard; 12],
    side_to_move: Color,
    castling: CastlingRights,
    en_passant_square: Option<Square>,
}

fn board_index(color: Color, kind: PieceKind) -> usize {
    color.as_index() * 6 + kind.as_index()
}

//
// Board state getters
//

impl Position {
    /// An empty board with White to move. Not a playable position on its own;
    /// use `from_fen` or `from_start_position`.
    fn new() -> Position {
        Position {
            boards_by_piece: [Bitboard::none(); 12],
            boards_by_color: [Bitboard::none(); 2],
            en_passant_square: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            side_to_move: Color::White,
            castling: CastlingRights::NONE,
            zobrist_hash: 0,
        }
    }

    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_square
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn zobrist_hash(&self) -> u64 {
        self.zobrist_hash
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.castling
    }

    pub fn can_castle_kingside(&self, color: Color) -> bool {
        self.castling.contains(CastlingRights::kingside(color))
    }

    pub fn can_castle_queenside(&self, color: Color) -> bool {
        self.castling.contains(CastlingRights::queenside(color))
    }

    pub fn pieces(&self, color: Color) -> Bitboard {
        self.boards_by_color[color.as_index()]
    }

    pub fn occupancy(&self) -> Bitboard {
        self.pieces(Color::White) | self.pieces(Color::Black)
    }

    pub fn pieces_of_kind(&self, color: Color, kind: PieceKind) -> Bitboard {
        self.boards_by_piece[board_index(color, kind)]
    }

    pub fn pawns(&self, color: Color) -> Bitboard {
        self.pieces_of_kind(color, PieceKind::Pawn)
    }

    pub fn knights(&self, color: Color) -> Bitboard {
        self.pieces_of_kind(color, PieceKind::Knight)
    }

    pub fn bishops(&self, color: Color) -> Bitboard {
        self.pieces_of_kind(color, PieceKind::Bishop)
    }

    pub fn rooks(&self, color: Color) -> Bitboard {
        self.pieces_of_kind(color, PieceKind::Rook)
    }

    pub fn queens(&self, color: Color) -> Bitboard {
        self.pieces_of_kind(color, PieceKind::Queen)
    }

    pub fn kings(&self, color: Color) -> Bitboard {
        self.pieces_of_kind(color, PieceKind::King)
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.kings(color).first()
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        let color = COLORS
            .iter()
            .copied()
            .find(|&color| self.pieces(color).contains(square))?;
        PIECE_KINDS
            .iter()
            .copied()
            .find(|&kind| self.pieces_of_kind(color, kind).contains(square))
            .map(|kind| Piece::new(kind, color))
    }

    /// Every occupied square with its piece, from a1 to h8. This is what a
    /// renderer walks to draw the board.
    pub fn board(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.occupancy()
            .iter()
            .filter_map(move |sq| self.piece_at(sq).map(|piece| (sq, piece)))
    }

    pub fn repetition_key(&self) -> RepetitionKey {
        RepetitionKey {
            boards_by_piece: self.boards_by_piece,
            side_to_move: self.side_to_move,
            castling: self.castling,
            en_passant_square: self.en_passant_square,
        }
    }
}

//
// Check detection, legality and game status
//

impl Position {
    /// Whether the king of `color` is attacked.
    pub fn is_check(&self, color: Color) -> bool {
        match self.king_square(color) {
            Some(king) => attacks::is_attacked(self, king, color.toggle()),
            None => false,
        }
    }

    /// Whether the side to move is in check.
    pub fn in_check(&self) -> bool {
        self.is_check(self.side_to_move)
    }

    pub fn legal_moves(&self) -> MoveVec {
        move_generator::legal_moves(self)
    }

    pub fn is_legal(&self, mov: Move) -> bool {
        self.legal_moves().contains(&mov)
    }

    /// The status of this position by every rule that does not need the game's
    /// history; repetition is judged by `status::status`.
    pub fn status(&self) -> GameStatus {
        status::classify(self, !self.legal_moves().is_empty())
    }
}

//
// Move application
//

impl Position {
    /// Plays `mov` and returns the resulting position.
    ///
    /// Refuses with `MoveError::GameOver` if this position is already decided
    /// and with `MoveError::IllegalMove` if `mov` is not one of its legal
    /// moves. `self` is never modified.
    pub fn apply_move(&self, mov: Move) -> Result<Position, MoveError> {
        let legal = self.legal_moves();
        let status = status::classify(self, !legal.is_empty());
        if status.is_terminal() {
            return Err(MoveError::GameOver(status));
        }

        if !legal.contains(&mov) {
            return Err(MoveError::IllegalMove(mov));
        }

        Ok(self.successor(mov))
    }

    /// Plays a move already known to be pseudo-legal, without checking it.
    pub(crate) fn successor(&self, mov: Move) -> Position {
        let mut next = self.clone();
        next.play(mov);
        next
    }

    fn put_piece(&mut self, square: Square, piece: Piece) {
        debug_assert!(self.piece_at(square).is_none(), "{} is occupied", square);
        self.boards_by_color[piece.color.as_index()].insert(square);
        self.boards_by_piece[board_index(piece.color, piece.kind)].insert(square);
        zobrist::modify_piece(&mut self.zobrist_hash, square, piece);
    }

    fn take_piece(&mut self, square: Square) -> Option<Piece> {
        let piece = self.piece_at(square)?;
        self.boards_by_color[piece.color.as_index()].remove(square);
        self.boards_by_piece[board_index(piece.color, piece.kind)].remove(square);
        zobrist::modify_piece(&mut self.zobrist_hash, square, piece);
        Some(piece)
    }

    // The only code that changes a position after construction. Everything
    // that a move implies besides relocating the piece is derived here from
    // the board: captures, en passant, castling, promotion, rights and clocks.
    fn play(&mut self, mov: Move) {
        let us = self.side_to_move;
        let source = mov.source();
        let dest = mov.destination();
        let moving_piece = self
            .take_piece(source)
            .expect("invalid move: no piece at source square");
        let is_pawn = moving_piece.kind == PieceKind::Pawn;

        // En passant is the one capture where the captured piece is not on the
        // destination square; it sits directly behind it.
        let is_en_passant =
            is_pawn && Some(dest) == self.en_passant_square && source.file() != dest.file();
        let capture_square = if is_en_passant {
            dest.towards(pawn_direction(us.toggle()))
        } else {
            dest
        };
        let captured = self.take_piece(capture_square);

        // Castles are encoded as the king's two-square move. The rook jumps to
        // the square the king passed over.
        let file_distance = (source.file() as i32 - dest.file() as i32).abs();
        if moving_piece.kind == PieceKind::King && file_distance == 2 {
            let (rook_source, rook_dest) = if dest.file() == File::G {
                (dest.towards(Direction::East), dest.towards(Direction::West))
            } else {
                (
                    dest.towards(Direction::West).towards(Direction::West),
                    dest.towards(Direction::East),
                )
            };

            let rook = self
                .take_piece(rook_source)
                .expect("invalid move: castle without rook");
            self.put_piece(rook_dest, rook);
        }

        let placed = match mov.promotion_piece() {
            Some(kind) => Piece::new(kind, us),
            None => moving_piece,
        };
        self.put_piece(dest, placed);

        // Anything leaving or landing on a king or rook home square ends the
        // corresponding castling rights: a king or rook moved, or a rook was
        // captured at home.
        let old_castling = self.castling;
        self.castling
            .remove(CastlingRights::revoked_by(source) | CastlingRights::revoked_by(dest));
        zobrist::modify_castling(&mut self.zobrist_hash, old_castling, self.castling);

        let rank_distance = (source.rank() as i32 - dest.rank() as i32).abs();
        let en_passant_square = if is_pawn && rank_distance == 2 {
            Some(source.towards(pawn_direction(us)))
        } else {
            None
        };
        zobrist::modify_en_passant(
            &mut self.zobrist_hash,
            self.en_passant_square,
            en_passant_square,
        );
        self.en_passant_square = en_passant_square;

        if is_pawn || captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        if us == Color::Black {
            self.fullmove_number += 1;
        }

        self.side_to_move = us.toggle();
        zobrist::modify_side_to_move(&mut self.zobrist_hash);
    }
}

//
// FEN parsing and generation.
//
// FEN has six space-separated fields: placement, side to move, castling
// rights, en passant square, halfmove clock and fullmove number. The two
// clocks are optional and default to 0 and 1.
//

impl Position {
    pub fn from_start_position() -> Position {
        Position::from_fen(START_FEN).expect("starting FEN is valid")
    }

    /// Constructs a new position from a FEN representation of a board position.
    /// Castling rights whose king or rook is not on its home square are
    /// dropped.
    pub fn from_fen<S: AsRef<str>>(fen: S) -> Result<Position, FenParseError> {
        let mut fields = fen.as_ref().split_whitespace();
        let mut next_field = || fields.next().ok_or(FenParseError::UnexpectedEnd);
        let placement = next_field()?;
        let side = next_field()?;
        let castling = next_field()?;
        let en_passant = next_field()?;
        let halfmove = next_field().ok();
        let fullmove = next_field().ok();
        if next_field().is_ok() {
            return Err(FenParseError::TrailingInput);
        }

        let mut pos = Position::new();
        pos.parse_placement(placement)?;
        pos.side_to_move = side
            .parse::<Color>()
            .ok()
            .filter(|_| side.len() == 1)
            .ok_or(FenParseError::InvalidSideToMove)?;
        pos.castling = parse_castling(castling)?;
        pos.en_passant_square = pos.parse_en_passant(en_passant)?;
        if let Some(text) = halfmove {
            pos.halfmove_clock = text.parse().map_err(|_| FenParseError::InvalidHalfmove)?;
        }
        if let Some(text) = fullmove {
            pos.fullmove_number = text
                .parse()
                .ok()
                .filter(|&n: &u32| n > 0)
                .ok_or(FenParseError::InvalidFullmove)?;
        }

        pos.validate()?;
        pos.castling &= pos.plausible_castling_rights();
        pos.zobrist_hash = zobrist::hash(&pos);
        Ok(pos)
    }

    fn parse_placement(&mut self, placement: &str) -> Result<(), FenParseError> {
        let rows: Vec<&str> = placement.split('/').collect();
        if rows.len() != 8 {
            return Err(FenParseError::WrongRankCount);
        }

        for (row, &rank) in rows.iter().zip(RANKS.iter().rev()) {
            let mut file = 0;
            for c in row.chars() {
                if let Some(empty) = c.to_digit(10) {
                    if empty == 0 || empty > 8 {
                        return Err(FenParseError::InvalidDigit);
                    }

                    file += empty as usize;
                } else {
                    let piece = Piece::try_from(c).map_err(|_| FenParseError::UnknownPiece(c))?;
                    if file >= 8 {
                        return Err(FenParseError::RankDoesNotSumToEight);
                    }

                    self.put_piece(Square::of(rank, File::from_index(file)), piece);
                    file += 1;
                }

                if file > 8 {
                    return Err(FenParseError::RankDoesNotSumToEight);
                }
            }

            if file != 8 {
                return Err(FenParseError::RankDoesNotSumToEight);
            }
        }

        Ok(())
    }

    // The en passant square must be the square a pawn of the side not to move
    // just skipped: empty, with that pawn in front of it and its starting
    // square empty.
    fn parse_en_passant(&self, text: &str) -> Result<Option<Square>, FenParseError> {
        if text == "-" {
            return Ok(None);
        }

        let square = Square::from_str(text).map_err(|_| FenParseError::InvalidEnPassant)?;
        let pusher = self.side_to_move.toggle();
        let expected_rank = match pusher {
            Color::White => Rank::Three,
            Color::Black => Rank::Six,
        };
        if square.rank() != expected_rank {
            return Err(FenParseError::InvalidEnPassant);
        }

        let pawn_square = square.towards(pawn_direction(pusher));
        let start_square = square.towards(pawn_direction(self.side_to_move));
        let plausible = self.piece_at(square).is_none()
            && self.piece_at(start_square).is_none()
            && self.piece_at(pawn_square) == Some(Piece::new(PieceKind::Pawn, pusher));
        if plausible {
            Ok(Some(square))
        } else {
            Err(FenParseError::InvalidEnPassant)
        }
    }

    fn validate(&self) -> Result<(), FenParseError> {
        if COLORS.iter().any(|&color| self.kings(color).count() != 1) {
            return Err(FenParseError::InvalidKingCount);
        }

        let pawns = self.pawns(Color::White) | self.pawns(Color::Black);
        if !(pawns & BB_BACK_RANKS).is_empty() {
            return Err(FenParseError::PawnOnBackRank);
        }

        if self.is_check(self.side_to_move.toggle()) {
            return Err(FenParseError::OpponentInCheck);
        }

        Ok(())
    }

    fn plausible_castling_rights(&self) -> CastlingRights {
        let mut rights = CastlingRights::NONE;
        for &color in &COLORS {
            let has = |square: Square, kind: PieceKind| {
                self.piece_at(square) == Some(Piece::new(kind, color))
            };

            if !has(king_home(color), PieceKind::King) {
                continue;
            }
            if has(kingside_rook_home(color), PieceKind::Rook) {
                rights |= CastlingRights::kingside(color);
            }
            if has(queenside_rook_home(color), PieceKind::Rook) {
                rights |= CastlingRights::queenside(color);
            }
        }

        rights
    }

    pub fn as_fen(&self) -> String {
        let mut buf = String::new();
        for &rank in RANKS.iter().rev() {
            let mut empty_squares = 0;
            for &file in &FILES {
                match self.piece_at(Square::of(rank, file)) {
                    Some(piece) => {
                        if empty_squares != 0 {
                            write!(&mut buf, "{}", empty_squares).unwrap();
                            empty_squares = 0;
                        }
                        write!(&mut buf, "{}", piece).unwrap();
                    }
                    None => empty_squares += 1,
                }
            }

            if empty_squares != 0 {
                write!(&mut buf, "{}", empty_squares).unwrap();
            }
            if rank != Rank::One {
                buf.push('/');
            }
        }

        write!(&mut buf, " {} ", self.side_to_move).unwrap();
        let flags = [
            (CastlingRights::WHITE_KINGSIDE, 'K'),
            (CastlingRights::WHITE_QUEENSIDE, 'Q'),
            (CastlingRights::BLACK_KINGSIDE, 'k'),
            (CastlingRights::BLACK_QUEENSIDE, 'q'),
        ];
        if self.castling.is_empty() {
            buf.push('-');
        }
        for &(flag, c) in &flags {
            if self.castling.contains(flag) {
                buf.push(c);
            }
        }

        match self.en_passant_square {
            Some(square) => write!(&mut buf, " {}", square).unwrap(),
            None => buf.push_str(" -"),
        }
        write!(
            &mut buf,
            " {} {}",
            self.halfmove_clock, self.fullmove_number
        )
        .unwrap();
        buf
    }
}

//
// Trait implementations
//

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for &rank in RANKS.iter().rev() {
            for &file in &FILES {
                match self.piece_at(Square::of(rank, file)) {
                    Some(piece) => write!(f, " {} ", piece)?,
                    None => write!(f, " . ")?,
                }
            }

            writeln!(f, "| {}", rank)?;
        }

        writeln!(f, "{}", "---".repeat(8))?;
        for &file in &FILES {
            write!(f, " {} ", file)?;
        }

        writeln!(f)
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::from_start_position()
    }
}

impl FromStr for Position {
    type Err = FenParseError;

    fn from_str(s: &str) -> Result<Position, FenParseError> {
        Position::from_fen(s)
    }
}

//
// Helper functions
//

fn parse_castling(text: &str) -> Result<CastlingRights, FenParseError> {
    if text == "-" {
        return Ok(CastlingRights::NONE);
    }

    let mut rights = CastlingRights::NONE;
    for c in text.chars() {
        let flag = match c {
            'K' => CastlingRights::WHITE_KINGSIDE,
            'Q' => CastlingRights::WHITE_QUEENSIDE,
            'k' => CastlingRights::BLACK_KINGSIDE,
            'q' => CastlingRights::BLACK_QUEENSIDE,
            _ => return Err(FenParseError::InvalidCastle),
        };

        if rights.contains(flag) {
            return Err(FenParseError::InvalidCastle);
        }
        rights |= flag;
    }

    Ok(rights)
}

/// The direction in which pawns of `color` advance.
pub(crate) fn pawn_direction(color: Color) -> Direction {
    match color {
        Color::White => Direction::North,
        Color::Black => Direction::South,
    }
}

pub(crate) fn king_home(color: Color) -> Square {
    match color {
        Color::White => Square::E1,
        Color::Black => Square::E8,
    }
}

pub(crate) fn kingside_rook_home(color: Color) -> Square {
    match color {
        Color::White => Square::H1,
        Color::Black => Square::H8,
    }
}

pub(crate) fn queenside_rook_home(color: Color) -> Square {
    match color {
        Color::White => Square::A1,
        Color::Black => Square::A8,
    }
}

#[cfg(test)]
mod tests {
    use crate::moves::Move;
    use crate::position::Position;
    use crate::types::{Color, Square};

    fn mv(text: &str) -> Move {
        text.parse().unwrap()
    }

    #[test]
    fn check_smoke() {
        let pos =
            Position::from_fen("r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1")
                .unwrap();
        assert!(pos.is_check(Color::Black));
        assert!(pos.in_check());
        assert!(!pos.is_check(Color::White));
    }

    #[test]
    fn pinned_piece_cannot_leave_the_pin() {
        let pos = Position::from_fen("4k3/8/3q4/8/8/3B4/3K4/8 w - - 0 1").unwrap();
        assert!(!pos.is_legal(mv("d3e4")));
        assert!(!pos.is_legal(mv("d3c4")));
        assert!(pos.is_legal(mv("d2e3")));
    }

    #[test]
    fn pinned_piece_may_move_along_the_pin() {
        let pos = Position::from_fen("4k3/8/8/q7/8/2B5/3K4/8 w - - 0 1").unwrap();
        assert!(pos.is_legal(mv("c3b4")));
        assert!(pos.is_legal(mv("c3a5")));
        assert!(!pos.is_legal(mv("c3d4")));
    }

    #[test]
    fn board_enumeration() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        let pieces: Vec<_> = pos.board().map(|(sq, piece)| (sq, piece.to_string())).collect();
        assert_eq!(
            vec![
                (Square::E1, "K".to_owned()),
                (Square::H1, "R".to_owned()),
                (Square::E8, "k".to_owned()),
            ],
            pieces
        );
    }

    mod fen {
        use crate::position::{FenParseError, Position, START_FEN};
        use crate::types::{Color, Piece, PieceKind, Square};

        #[test]
        fn starting_position() {
            let pos = Position::from_start_position();
            assert_eq!(Color::White, pos.side_to_move());
            assert_eq!(0, pos.halfmove_clock());
            assert_eq!(1, pos.fullmove_number());
            assert_eq!(None, pos.en_passant_square());
            for &color in &[Color::White, Color::Black] {
                assert!(pos.can_castle_kingside(color));
                assert!(pos.can_castle_queenside(color));
            }

            assert_eq!(
                Some(Piece::new(PieceKind::Queen, Color::White)),
                pos.piece_at(Square::D1)
            );
            assert_eq!(
                Some(Piece::new(PieceKind::Knight, Color::Black)),
                pos.piece_at(Square::G8)
            );
            assert_eq!(None, pos.piece_at(Square::E4));
            assert_eq!(32, pos.occupancy().count());
            assert_eq!(START_FEN, pos.as_fen());
        }

        #[test]
        fn round_trips() {
            for fen in &[
                "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
                "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
                "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3",
                "4k3/8/8/8/8/8/8/4K3 b - - 99 120",
            ] {
                assert_eq!(*fen, Position::from_fen(fen).unwrap().as_fen());
            }
        }

        #[test]
        fn clocks_are_optional() {
            let pos = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - -").unwrap();
            assert_eq!(0, pos.halfmove_clock());
            assert_eq!(1, pos.fullmove_number());
        }

        #[test]
        fn implausible_castling_rights_are_dropped() {
            let pos = Position::from_fen("4k3/8/8/8/8/8/8/4K2R w KQkq - 0 1").unwrap();
            assert!(pos.can_castle_kingside(Color::White));
            assert!(!pos.can_castle_queenside(Color::White));
            assert!(!pos.can_castle_kingside(Color::Black));
            assert_eq!("4k3/8/8/8/8/8/8/4K2R w K - 0 1", pos.as_fen());
        }

        fn err(fen: &str) -> FenParseError {
            Position::from_fen(fen).unwrap_err()
        }

        #[test]
        fn errors() {
            assert_eq!(FenParseError::UnexpectedEnd, err(""));
            assert_eq!(FenParseError::UnexpectedEnd, err("4k3/8/8/8/8/8/8/4K3 w -"));
            assert_eq!(FenParseError::TrailingInput, err("4k3/8/8/8/8/8/8/4K3 w - - 0 1 x"));
            assert_eq!(FenParseError::WrongRankCount, err("4k3/8/8/8/8/8/4K3 w - - 0 1"));
            assert_eq!(FenParseError::InvalidDigit, err("9/4k3/8/8/8/8/8/4K3 w - - 0 1"));
            assert_eq!(
                FenParseError::RankDoesNotSumToEight,
                err("4k4/8/8/8/8/8/8/4K3 w - - 0 1")
            );
            assert_eq!(
                FenParseError::RankDoesNotSumToEight,
                err("4k2/8/8/8/8/8/8/4K3 w - - 0 1")
            );
            assert_eq!(
                FenParseError::UnknownPiece('z'),
                err("4k2z/8/8/8/8/8/8/4K3 w - - 0 1")
            );
            assert_eq!(FenParseError::InvalidSideToMove, err("4k3/8/8/8/8/8/8/4K3 c - - 0 1"));
            assert_eq!(FenParseError::InvalidSideToMove, err("4k3/8/8/8/8/8/8/4K3 white - - 0 1"));
            assert_eq!(FenParseError::InvalidCastle, err("4k3/8/8/8/8/8/8/4K3 w a - 0 1"));
            assert_eq!(FenParseError::InvalidEnPassant, err("4k3/8/8/8/8/8/8/4K3 w - e3 0 1"));
            assert_eq!(FenParseError::InvalidEnPassant, err("4k3/8/8/8/8/8/8/4K3 w - e6 0 1"));
            assert_eq!(FenParseError::InvalidEnPassant, err("4k3/8/8/8/8/8/8/4K3 w - e8 0 1"));
            assert_eq!(FenParseError::InvalidEnPassant, err("4k3/8/8/8/8/8/8/4K3 b - e1 0 1"));
            assert_eq!(FenParseError::InvalidHalfmove, err("4k3/8/8/8/8/8/8/4K3 w - - x 1"));
            assert_eq!(FenParseError::InvalidFullmove, err("4k3/8/8/8/8/8/8/4K3 w - - 0 0"));
            assert_eq!(FenParseError::InvalidKingCount, err("8/8/8/8/8/8/8/4K3 w - - 0 1"));
            assert_eq!(FenParseError::InvalidKingCount, err("4k3/8/8/8/8/8/8/3KK3 w - - 0 1"));
            assert_eq!(FenParseError::PawnOnBackRank, err("4k2P/8/8/8/8/8/8/4K3 w - - 0 1"));
            assert_eq!(FenParseError::OpponentInCheck, err("4k2R/8/8/8/8/8/8/4K3 w - - 0 1"));
        }
    }

    mod apply {
        use crate::moves::Move;
        use crate::position::{MoveError, Position};
        use crate::types::{CastlingRights, Color, Piece, PieceKind, Square};

        fn mv(text: &str) -> Move {
            text.parse().unwrap()
        }

        #[test]
        fn receiver_is_untouched() {
            let pos = Position::from_start_position();
            let copy = pos.clone();
            let next = pos.apply_move(mv("e2e4")).unwrap();
            assert_eq!(copy, pos);
            assert_ne!(pos, next);
        }

        #[test]
        fn pawn_push_state() {
            let pos = Position::from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 7 12").unwrap();
            let next = pos.apply_move(mv("e2e3")).unwrap();
            assert_eq!(Color::Black, next.side_to_move());
            assert_eq!(12, next.fullmove_number());
            assert_eq!(0, next.halfmove_clock());
            assert_eq!(None, next.en_passant_square());
            assert_eq!(
                Some(Piece::new(PieceKind::Pawn, Color::White)),
                next.piece_at(Square::E3)
            );
            assert_eq!(None, next.piece_at(Square::E2));
        }

        #[test]
        fn double_push_sets_en_passant_square() {
            let pos = Position::from_start_position();
            let next = pos.apply_move(mv("e2e4")).unwrap();
            assert_eq!(Some(Square::E3), next.en_passant_square());

            let after = next.apply_move(mv("g8f6")).unwrap();
            assert_eq!(None, after.en_passant_square());
        }

        #[test]
        fn en_passant_removes_the_passed_pawn() {
            let pos = Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2").unwrap();
            let next = pos.apply_move(mv("e5d6")).unwrap();
            assert_eq!(
                Some(Piece::new(PieceKind::Pawn, Color::White)),
                next.piece_at(Square::D6)
            );
            assert_eq!(None, next.piece_at(Square::D5));
            assert_eq!(None, next.piece_at(Square::E5));
            assert_eq!(0, next.halfmove_clock());
        }

        #[test]
        fn kingside_castle_moves_rook() {
            let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 3 1").unwrap();
            let next = pos.apply_move(mv("e1g1")).unwrap();
            assert_eq!(
                Some(Piece::new(PieceKind::King, Color::White)),
                next.piece_at(Square::G1)
            );
            assert_eq!(
                Some(Piece::new(PieceKind::Rook, Color::White)),
                next.piece_at(Square::F1)
            );
            assert_eq!(None, next.piece_at(Square::H1));
            assert_eq!(None, next.piece_at(Square::E1));
            assert_eq!(CastlingRights::BLACK, next.castling_rights());
            assert_eq!(4, next.halfmove_clock());
        }

        #[test]
        fn queenside_castle_moves_rook() {
            let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1").unwrap();
            let next = pos.apply_move(mv("e8c8")).unwrap();
            assert_eq!(
                Some(Piece::new(PieceKind::King, Color::Black)),
                next.piece_at(Square::C8)
            );
            assert_eq!(
                Some(Piece::new(PieceKind::Rook, Color::Black)),
                next.piece_at(Square::D8)
            );
            assert_eq!(None, next.piece_at(Square::A8));
            assert_eq!(CastlingRights::WHITE, next.castling_rights());
            assert_eq!(2, next.fullmove_number());
        }

        #[test]
        fn capturing_a_rook_at_home_revokes_its_castle() {
            let pos = Position::from_fen("r3k2r/8/8/8/8/8/6b1/R3K2R b KQkq - 0 1").unwrap();
            let next = pos.apply_move(mv("g2h1")).unwrap();
            assert!(!next.can_castle_kingside(Color::White));
            assert!(next.can_castle_queenside(Color::White));
            assert!(next.can_castle_kingside(Color::Black));
        }

        #[test]
        fn rook_move_revokes_one_side() {
            let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
            let next = pos.apply_move(mv("a1b1")).unwrap();
            assert!(!next.can_castle_queenside(Color::White));
            assert!(next.can_castle_kingside(Color::White));
        }

        #[test]
        fn promotion_substitutes_piece() {
            let pos = Position::from_fen("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
            let next = pos
                .apply_move(Move::promotion(Square::A7, Square::B8, PieceKind::Knight))
                .unwrap();
            assert_eq!(
                Some(Piece::new(PieceKind::Knight, Color::White)),
                next.piece_at(Square::B8)
            );
            assert_eq!(None, next.piece_at(Square::A7));
            assert_eq!(1, next.pieces(Color::Black).count());
        }

        #[test]
        fn promotion_requires_a_piece() {
            let pos = Position::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
            let bare = mv("a7a8");
            assert_eq!(Err(MoveError::IllegalMove(bare)), pos.apply_move(bare));
        }

        #[test]
        fn illegal_move_is_refused() {
            let pos = Position::from_start_position();
            let mov = mv("e2e5");
            assert_eq!(Err(MoveError::IllegalMove(mov)), pos.apply_move(mov));
        }

        #[test]
        fn deterministic() {
            let pos = Position::from_fen(
                "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            )
            .unwrap();
            for &mov in pos.legal_moves().iter() {
                let one = pos.apply_move(mov).unwrap();
                let two = pos.apply_move(mov).unwrap();
                assert_eq!(one, two);
                assert_eq!(one.zobrist_hash(), two.zobrist_hash());
            }
        }
    }
}
