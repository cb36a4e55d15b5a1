//! In-place move execution with exact undo.
//!
//! `apply_move` mutates the position and returns a [`MoveRecord`]; the same
//! record is pushed on the position's undo stack. `undo_move` consumes the
//! top of that stack and restores every field bit-for-bit, so search can walk
//! a tree on one position without cloning per node.

use crate::errors::MoveError;
use crate::game_state::chess_types::*;
use crate::game_state::undo_state::{CapturedPiece, PromotionRecord};
use crate::moves::move_descriptions::Movement;
use crate::search::zobrist::compute_zobrist_key;

pub fn apply_move(game_state: &mut GameState, movement: Movement) -> Result<MoveRecord, MoveError> {
    let from = movement.from.square();
    let to = movement.to.square();

    let (moved_kind, color) = game_state
        .piece_at(from)
        .ok_or(MoveError::EmptySource(from))?;

    let dictionary = game_state.dictionary();
    let is_pawn = Some(moved_kind) == dictionary.pawn();
    if let Some(promoted) = movement.promotion {
        // Only a pawn arriving on its last rank may change kind.
        if !is_pawn
            || movement.to.rank != color.promotion_rank()
            || promoted >= dictionary.len()
            || Some(promoted) == dictionary.king()
            || Some(promoted) == dictionary.pawn()
        {
            return Err(MoveError::InvalidPromotion(format!("kind #{promoted}")));
        }
    }

    let mut record = MoveRecord {
        movement,
        moved_kind,
        captured: None,
        promotion: None,
        prev_side_to_move: game_state.side_to_move,
        prev_castling_rights: game_state.castling_rights,
        prev_en_passant_square: game_state.en_passant_square,
        prev_pending_promotion: game_state.pending_promotion,
        prev_unmoved: game_state.unmoved,
        prev_halfmove_clock: game_state.halfmove_clock,
        prev_fullmove_number: game_state.fullmove_number,
        prev_zobrist_key: game_state.zobrist_key,
    };

    // Lift the mover, then clear whatever it captures.
    game_state.take(from);

    let capture_square = if movement.is_en_passant() {
        Coordinate {
            file: movement.to.file,
            rank: movement.from.rank,
        }
        .square()
    } else {
        to
    };
    if let Some((kind, captured_color)) = game_state.take(capture_square) {
        record.captured = Some(CapturedPiece {
            kind,
            color: captured_color,
            square: capture_square,
        });
    }

    let placed_kind = match movement.promotion {
        Some(promoted) => {
            record.promotion = Some(PromotionRecord {
                square: to,
                replaced: moved_kind,
                promoted,
            });
            promoted
        }
        None => moved_kind,
    };
    game_state.put(placed_kind, color, to);

    if let Some(side) = movement.castling_side() {
        let (rook_from, rook_to) = castling_rook_squares(color, side);
        if let Some((rook_kind, rook_color)) = game_state.take(rook_from) {
            game_state.put(rook_kind, rook_color, rook_to);
        }
        game_state.unmoved &= !(square_bit(rook_from) | square_bit(rook_to));
    }

    game_state.unmoved &= !(square_bit(from) | square_bit(to) | square_bit(capture_square));
    update_castling_rights(game_state, color, moved_kind, from, to);

    game_state.en_passant_square = if is_pawn
        && movement.from.file == movement.to.file
        && movement.from.rank.abs_diff(movement.to.rank) == 2
    {
        Some((from + to) / 2)
    } else {
        None
    };

    game_state.pending_promotion =
        if is_pawn && movement.promotion.is_none() && movement.to.rank == color.promotion_rank() {
            Some(to)
        } else {
            None
        };

    if is_pawn || record.captured.is_some() {
        game_state.halfmove_clock = 0;
    } else {
        game_state.halfmove_clock = game_state.halfmove_clock.saturating_add(1);
    }
    if color == Color::Dark {
        game_state.fullmove_number = game_state.fullmove_number.saturating_add(1);
    }
    game_state.side_to_move = color.opposite();

    game_state.zobrist_key = compute_zobrist_key(game_state);
    game_state.repetition_history.push(game_state.zobrist_key);
    game_state.undo_stack.push(record);

    Ok(record)
}

/// Revert the most recent move. `record` must describe that move.
///
/// The stack entry is authoritative, so a promotion made after the move
/// was applied is reverted too.
pub fn undo_move(game_state: &mut GameState, record: &MoveRecord) -> Result<(), MoveError> {
    let top = match game_state.undo_stack.last() {
        Some(top)
            if top.movement == record.movement && top.prev_zobrist_key == record.prev_zobrist_key =>
        {
            *top
        }
        _ => return Err(MoveError::UndoMismatch),
    };

    let from = top.movement.from.square();
    let to = top.movement.to.square();
    if game_state.piece_at(to).is_none() {
        return Err(MoveError::UndoMismatch);
    }

    game_state.undo_stack.pop();
    game_state.repetition_history.pop();

    if let Some((_, color)) = game_state.take(to) {
        game_state.put(top.moved_kind, color, from);

        if let Some(side) = top.movement.castling_side() {
            let (rook_from, rook_to) = castling_rook_squares(color, side);
            if let Some((rook_kind, rook_color)) = game_state.take(rook_to) {
                game_state.put(rook_kind, rook_color, rook_from);
            }
        }
    }

    if let Some(captured) = top.captured {
        game_state.put(captured.kind, captured.color, captured.square);
    }

    game_state.side_to_move = top.prev_side_to_move;
    game_state.castling_rights = top.prev_castling_rights;
    game_state.en_passant_square = top.prev_en_passant_square;
    game_state.pending_promotion = top.prev_pending_promotion;
    game_state.unmoved = top.prev_unmoved;
    game_state.halfmove_clock = top.prev_halfmove_clock;
    game_state.fullmove_number = top.prev_fullmove_number;
    game_state.zobrist_key = top.prev_zobrist_key;

    Ok(())
}

/// Pop and revert the most recent move, if any.
pub fn undo_last_move(game_state: &mut GameState) -> Option<MoveRecord> {
    let record = *game_state.undo_stack.last()?;
    undo_move(game_state, &record).ok()?;
    Some(record)
}

/// Resolve a pending promotion by replacing the pawn with `kind_name`.
///
/// The swap is attached to the most recent move record, so undoing that
/// move also undoes the promotion.
pub fn promote(
    game_state: &mut GameState,
    coordinate: Coordinate,
    kind_name: &str,
) -> Result<(), MoveError> {
    let square = coordinate.square();
    if game_state.pending_promotion != Some(square) {
        return Err(MoveError::NoPendingPromotion(square));
    }

    let dictionary = game_state.dictionary();
    let promoted = dictionary
        .id_of(kind_name)
        .filter(|kind| Some(*kind) != dictionary.king() && Some(*kind) != dictionary.pawn())
        .ok_or_else(|| MoveError::InvalidPromotion(kind_name.to_owned()))?;

    let (replaced, color) = game_state
        .take(square)
        .ok_or(MoveError::NoPendingPromotion(square))?;
    game_state.put(promoted, color, square);
    game_state.pending_promotion = None;

    if let Some(last) = game_state.undo_stack.last_mut() {
        last.promotion = Some(PromotionRecord {
            square,
            replaced,
            promoted,
        });
    }
    refresh_hash(game_state);

    Ok(())
}

/// Revert only the promotion of the most recent move, leaving the pawn on
/// its last rank with the promotion pending again.
pub fn undo_promotion(game_state: &mut GameState) -> Result<(), MoveError> {
    let Some(promotion) = game_state.undo_stack.last().and_then(|last| last.promotion) else {
        return Err(MoveError::NoPendingPromotion(0));
    };

    let (_, color) = game_state
        .take(promotion.square)
        .ok_or(MoveError::UndoMismatch)?;
    game_state.put(promotion.replaced, color, promotion.square);
    game_state.pending_promotion = Some(promotion.square);

    if let Some(last) = game_state.undo_stack.last_mut() {
        last.promotion = None;
    }
    refresh_hash(game_state);

    Ok(())
}

fn refresh_hash(game_state: &mut GameState) {
    game_state.zobrist_key = compute_zobrist_key(game_state);
    if let Some(last) = game_state.repetition_history.last_mut() {
        *last = game_state.zobrist_key;
    }
}

fn castling_rook_squares(color: Color, side: CastlingSide) -> (Square, Square) {
    let home = color.home_rank() * 8;
    (home + side.rook_file(), home + side.rook_target_file())
}

fn update_castling_rights(
    game_state: &mut GameState,
    moving_color: Color,
    moved_kind: KindId,
    from: Square,
    to: Square,
) {
    if game_state.dictionary().king() == Some(moved_kind) {
        for side in CastlingSide::BOTH {
            game_state.castling_rights &= !side.right(moving_color);
        }
    }

    for color in Color::BOTH {
        for side in CastlingSide::BOTH {
            let corner = color.home_rank() * 8 + side.rook_file();
            if from == corner || to == corner {
                game_state.castling_rights &= !side.right(color);
            }
        }
    }
}
