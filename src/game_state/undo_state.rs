use crate::game_state::chess_types::*;
use crate::moves::move_descriptions::Movement;

/// Piece removed from the board by a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapturedPiece {
    pub kind: KindId,
    pub color: Color,
    /// Differs from the move target for en passant.
    pub square: Square,
}

/// Kind swap performed on a pawn that reached its last rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromotionRecord {
    pub square: Square,
    pub replaced: KindId,
    pub promoted: KindId,
}

/// Single undo record for `apply_move` / `undo_move`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRecord {
    pub movement: Movement,
    pub moved_kind: KindId,
    pub captured: Option<CapturedPiece>,
    pub promotion: Option<PromotionRecord>,

    pub prev_side_to_move: Color,
    pub prev_castling_rights: CastlingRights,
    pub prev_en_passant_square: Option<Square>,
    pub prev_pending_promotion: Option<Square>,
    pub prev_unmoved: u64,
    pub prev_halfmove_clock: u16,
    pub prev_fullmove_number: u16,

    pub prev_zobrist_key: u64,
}
