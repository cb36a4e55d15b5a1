//! Pluggable per-figure generation.
//!
//! Bulk generation, perft and search all go through [`MoveGenerator`] so the
//! memoizing generator can be swapped in without touching callers.

use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_generator::{generate_all_movements, pattern_movements};
use crate::moves::move_descriptions::Movement;
use crate::search::movement_cache::{CacheStats, FigureKey, FigureMoveCache};

pub trait MoveGenerator {
    /// Pattern-licensed movements of one figure. Special moves are added by
    /// the caller.
    fn pattern_movements(
        &mut self,
        game_state: &GameState,
        kind: KindId,
        color: Color,
        from: Coordinate,
    ) -> Vec<Movement>;

    /// All movements for the side to move, special moves included.
    fn generate_legal_moves(&mut self, game_state: &GameState) -> Vec<Movement> {
        generate_all_movements(self, game_state, game_state.side_to_move())
    }
}

/// Generator that recomputes every figure on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegalMoveGenerator;

impl MoveGenerator for LegalMoveGenerator {
    fn pattern_movements(
        &mut self,
        game_state: &GameState,
        kind: KindId,
        color: Color,
        from: Coordinate,
    ) -> Vec<Movement> {
        pattern_movements(game_state, kind, color, from)
    }
}

/// Generator backed by a [`FigureMoveCache`].
#[derive(Debug, Clone, Default)]
pub struct CachedMoveGenerator {
    cache: FigureMoveCache,
}

impl CachedMoveGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cache(&self) -> &FigureMoveCache {
        &self.cache
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

impl MoveGenerator for CachedMoveGenerator {
    fn pattern_movements(
        &mut self,
        game_state: &GameState,
        kind: KindId,
        color: Color,
        from: Coordinate,
    ) -> Vec<Movement> {
        let key = FigureKey::new(game_state, kind, color, from);
        if let Some(hit) = self.cache.probe(&key) {
            return hit.to_vec();
        }

        let movements = pattern_movements(game_state, kind, color, from);
        self.cache.store(key, movements.clone());
        movements
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::move_generation::legal_move_apply::{apply_move, undo_move};

    #[test]
    fn cached_generator_matches_uncached() {
        let mut game = GameState::new_game();
        let mut cached = CachedMoveGenerator::new();
        let mut plain = LegalMoveGenerator;

        for _ in 0..6 {
            let expected = plain.generate_legal_moves(&game);
            assert_eq!(cached.generate_legal_moves(&game), expected);
            assert_eq!(cached.generate_legal_moves(&game), expected);

            let movement = expected[expected.len() / 2];
            apply_move(&mut game, movement).expect("generated move should apply");
        }

        assert!(cached.stats().hits > 0);
    }

    #[test]
    fn cache_hits_after_undo() {
        let mut game = GameState::new_game();
        let mut cached = CachedMoveGenerator::new();

        let first = cached.generate_legal_moves(&game);
        let stored = cached.stats().stores;

        let record = apply_move(&mut game, first[0]).expect("move should apply");
        undo_move(&mut game, &record).expect("undo should succeed");

        let again = cached.generate_legal_moves(&game);
        assert_eq!(again, first);
        assert_eq!(cached.stats().stores, stored, "nothing new to store");
        assert_eq!(cached.cache().len() as u64, stored);
    }
}
