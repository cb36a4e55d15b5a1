//! Core value types for the bitboard position model.
//!
//! Squares are indexed `rank * 8 + file` with `0 == a1` and `63 == h8`.
//! Light starts on ranks 0 and 1 and moves toward rank 7.

pub use crate::game_state::game_state::GameState;
pub use crate::game_state::undo_state::MoveRecord;

/// Side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Light,
    Dark,
}

impl Color {
    pub const BOTH: [Color; 2] = [Color::Light, Color::Dark];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::Light => 0,
            Color::Dark => 1,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::Light => Color::Dark,
            Color::Dark => Color::Light,
        }
    }

    /// Rank step that points toward the opponent's home side.
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Color::Light => 1,
            Color::Dark => -1,
        }
    }

    /// Rank on which this color's king and rooks start.
    #[inline]
    pub const fn home_rank(self) -> u8 {
        match self {
            Color::Light => 0,
            Color::Dark => 7,
        }
    }

    /// Rank on which this color's pawns promote.
    #[inline]
    pub const fn promotion_rank(self) -> u8 {
        match self {
            Color::Light => 7,
            Color::Dark => 0,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Color::Light => "light",
            Color::Dark => "dark",
        }
    }
}

/// Board square index (`0..=63`).
pub type Square = u8;

/// Index of a piece kind inside its [`crate::game_state::piece_dictionary::PieceDictionary`].
pub type KindId = usize;

/// A `(file, rank)` pair on the 8x8 board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub file: u8,
    pub rank: u8,
}

impl Coordinate {
    /// Build a coordinate, returning `None` when either axis is off the board.
    #[inline]
    pub fn new(file: u8, rank: u8) -> Option<Self> {
        if file < 8 && rank < 8 {
            Some(Self { file, rank })
        } else {
            None
        }
    }

    /// Signed variant used by offset arithmetic in the generators.
    #[inline]
    pub fn from_signed(file: i8, rank: i8) -> Option<Self> {
        if (0..8).contains(&file) && (0..8).contains(&rank) {
            Some(Self {
                file: file as u8,
                rank: rank as u8,
            })
        } else {
            None
        }
    }

    #[inline]
    pub const fn from_square(square: Square) -> Self {
        Self {
            file: square % 8,
            rank: square / 8,
        }
    }

    #[inline]
    pub const fn square(self) -> Square {
        self.rank * 8 + self.file
    }

    #[inline]
    pub const fn bit(self) -> u64 {
        1u64 << self.square()
    }

    #[inline]
    pub fn offset(self, file_step: i8, rank_step: i8) -> Option<Self> {
        Self::from_signed(self.file as i8 + file_step, self.rank as i8 + rank_step)
    }
}

#[inline]
pub const fn square_bit(square: Square) -> u64 {
    1u64 << square
}

/// Iterate the set squares of a bitboard from low to high.
#[inline]
pub fn squares_of(mut bitboard: u64) -> impl Iterator<Item = Square> {
    std::iter::from_fn(move || {
        if bitboard == 0 {
            return None;
        }
        let square = bitboard.trailing_zeros() as Square;
        bitboard &= bitboard - 1;
        Some(square)
    })
}

/// Compact castling rights bitmask.
pub type CastlingRights = u8;

pub const CASTLE_LIGHT_KINGSIDE: CastlingRights = 1 << 0;
pub const CASTLE_LIGHT_QUEENSIDE: CastlingRights = 1 << 1;
pub const CASTLE_DARK_KINGSIDE: CastlingRights = 1 << 2;
pub const CASTLE_DARK_QUEENSIDE: CastlingRights = 1 << 3;

pub const KING_START_FILE: u8 = 4;
pub const KINGSIDE_ROOK_FILE: u8 = 7;
pub const QUEENSIDE_ROOK_FILE: u8 = 0;

/// Which wing a castling move goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastlingSide {
    Kingside,
    Queenside,
}

impl CastlingSide {
    pub const BOTH: [CastlingSide; 2] = [CastlingSide::Kingside, CastlingSide::Queenside];

    #[inline]
    pub const fn right(self, color: Color) -> CastlingRights {
        match (color, self) {
            (Color::Light, CastlingSide::Kingside) => CASTLE_LIGHT_KINGSIDE,
            (Color::Light, CastlingSide::Queenside) => CASTLE_LIGHT_QUEENSIDE,
            (Color::Dark, CastlingSide::Kingside) => CASTLE_DARK_KINGSIDE,
            (Color::Dark, CastlingSide::Queenside) => CASTLE_DARK_QUEENSIDE,
        }
    }

    #[inline]
    pub const fn rook_file(self) -> u8 {
        match self {
            CastlingSide::Kingside => KINGSIDE_ROOK_FILE,
            CastlingSide::Queenside => QUEENSIDE_ROOK_FILE,
        }
    }

    #[inline]
    pub const fn king_target_file(self) -> u8 {
        match self {
            CastlingSide::Kingside => 6,
            CastlingSide::Queenside => 2,
        }
    }

    #[inline]
    pub const fn rook_target_file(self) -> u8 {
        match self {
            CastlingSide::Kingside => 5,
            CastlingSide::Queenside => 3,
        }
    }
}
