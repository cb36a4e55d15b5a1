//! Candidate and played move descriptions.
//!
//! A [`Movement`] is a small `Copy` value: source, target, the rule that
//! produced it and an optional promotion kind. Castling and en passant carry
//! sentinel licenses so the executor knows to move a second piece.

use crate::game_state::chess_types::{CastlingSide, Coordinate, KindId};

/// The rule that makes a movement legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveLicense {
    /// Index into the moving kind's compiled notation list.
    Pattern(u16),
    Castling(CastlingSide),
    EnPassant,
    /// Decoded from text and not yet matched against generated moves.
    Unverified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Movement {
    pub from: Coordinate,
    pub to: Coordinate,
    pub license: MoveLicense,
    pub promotion: Option<KindId>,
}

impl Movement {
    #[inline]
    pub const fn new(from: Coordinate, to: Coordinate, license: MoveLicense) -> Self {
        Self {
            from,
            to,
            license,
            promotion: None,
        }
    }

    /// Unlicensed movement, as produced by decoding a move string.
    #[inline]
    pub const fn unverified(from: Coordinate, to: Coordinate) -> Self {
        Self::new(from, to, MoveLicense::Unverified)
    }

    #[inline]
    pub const fn with_promotion(mut self, kind: KindId) -> Self {
        self.promotion = Some(kind);
        self
    }

    /// Same source and target, regardless of license or promotion.
    #[inline]
    pub fn same_path(&self, other: &Movement) -> bool {
        self.from == other.from && self.to == other.to
    }

    #[inline]
    pub fn castling_side(&self) -> Option<CastlingSide> {
        match self.license {
            MoveLicense::Castling(side) => Some(side),
            _ => None,
        }
    }

    #[inline]
    pub fn is_en_passant(&self) -> bool {
        self.license == MoveLicense::EnPassant
    }
}
