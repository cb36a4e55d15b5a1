//! Session-scoped memoization of generated movements and root search results.
//!
//! Neither table invalidates single entries. The owning engine decides when a
//! table is cleared (new game, or a figure table that outgrew its capacity).

use std::collections::HashMap;

use crate::game_state::chess_types::*;
use crate::moves::move_descriptions::Movement;

/// Probe counters shared by both tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub accesses: u64,
    pub hits: u64,
    pub stores: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        if self.accesses == 0 {
            0.0
        } else {
            self.hits as f64 / self.accesses as f64
        }
    }
}

/// Everything the pattern targets of one figure depend on.
///
/// Kind and color fix the compiled patterns and the forward direction; the
/// unmoved flag decides initial-only patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FigureKey {
    pub kind: KindId,
    pub color: Color,
    pub figure: u64,
    pub own: u64,
    pub enemy: u64,
    pub unmoved: bool,
}

impl FigureKey {
    pub fn new(game_state: &GameState, kind: KindId, color: Color, from: Coordinate) -> Self {
        let figure = from.bit();
        Self {
            kind,
            color,
            figure,
            own: game_state.occupancy(color),
            enemy: game_state.occupancy(color.opposite()),
            unmoved: game_state.unmoved_mask() & figure != 0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FigureMoveCache {
    entries: HashMap<FigureKey, Vec<Movement>>,
    stats: CacheStats,
}

impl FigureMoveCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn probe(&mut self, key: &FigureKey) -> Option<&[Movement]> {
        self.stats.accesses += 1;
        let hit = self.entries.get(key);
        if hit.is_some() {
            self.stats.hits += 1;
        }
        hit.map(Vec::as_slice)
    }

    pub fn store(&mut self, key: FigureKey, movements: Vec<Movement>) {
        self.stats.stores += 1;
        self.entries.insert(key, movements);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats = CacheStats::default();
    }
}

/// Structural key of a whole position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PositionKey {
    pieces: Vec<[u64; 2]>,
    composites: [u64; 2],
    side_to_move: Color,
    castling_rights: CastlingRights,
    en_passant_square: Option<Square>,
    unmoved: u64,
}

impl PositionKey {
    pub fn from_state(game_state: &GameState) -> Self {
        let pieces = (0..game_state.dictionary().len())
            .map(|kind| {
                [
                    game_state.pieces(kind, Color::Light),
                    game_state.pieces(kind, Color::Dark),
                ]
            })
            .collect();

        Self {
            pieces,
            composites: [
                game_state.occupancy(Color::Light),
                game_state.occupancy(Color::Dark),
            ],
            side_to_move: game_state.side_to_move(),
            castling_rights: game_state.castling_rights(),
            en_passant_square: game_state.en_passant_square(),
            unmoved: game_state.unmoved_mask(),
        }
    }
}

/// Stored outcome of one root search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachedSearch {
    pub best_move: Option<Movement>,
    pub score: i32,
    pub depth: u8,
}

#[derive(Debug, Clone, Default)]
pub struct PositionMoveCache {
    entries: HashMap<PositionKey, CachedSearch>,
    stats: CacheStats,
}

impl PositionMoveCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored result for `key`, only when it was searched to exactly `depth`.
    pub fn probe(&mut self, key: &PositionKey, depth: u8) -> Option<CachedSearch> {
        self.stats.accesses += 1;
        let hit = self.entries.get(key).copied().filter(|entry| entry.depth == depth);
        if hit.is_some() {
            self.stats.hits += 1;
        }
        hit
    }

    pub fn store(&mut self, key: PositionKey, entry: CachedSearch) {
        self.stats.stores += 1;
        self.entries.insert(key, entry);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats = CacheStats::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::move_generation::legal_move_apply::apply_move;
    use crate::move_generation::legal_move_generator::generate_legal_movements;

    #[test]
    fn figure_cache_counts_hits() {
        let game = GameState::new_game();
        let from = Coordinate::new(6, 0).expect("g1 is on the board");
        let (kind, color) = game.piece_at(from.square()).expect("knight on g1");
        let key = FigureKey::new(&game, kind, color, from);

        let mut cache = FigureMoveCache::new();
        assert!(cache.probe(&key).is_none());
        cache.store(key, Vec::new());
        assert!(cache.probe(&key).is_some());

        let stats = cache.stats();
        assert_eq!(stats.accesses, 2);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.stores, 1);
        assert!((stats.hit_rate() - 0.5).abs() < f64::EPSILON);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats(), CacheStats::default());
    }

    #[test]
    fn figure_key_separates_unmoved_state() {
        let mut game = GameState::new_game();
        let pawn_square = Coordinate::new(0, 1).expect("a2 is on the board");
        let (kind, color) = game.piece_at(pawn_square.square()).expect("pawn on a2");
        let fresh = FigureKey::new(&game, kind, color, pawn_square);

        game.unmoved &= !pawn_square.bit();
        let moved = FigureKey::new(&game, kind, color, pawn_square);
        assert_ne!(fresh, moved);
    }

    #[test]
    fn position_cache_requires_matching_depth() {
        let mut game = GameState::new_game();
        let key = PositionKey::from_state(&game);

        let mut cache = PositionMoveCache::new();
        cache.store(
            key.clone(),
            CachedSearch {
                best_move: None,
                score: 0,
                depth: 2,
            },
        );
        assert!(cache.probe(&key, 3).is_none());
        assert_eq!(cache.probe(&key, 2).map(|entry| entry.depth), Some(2));

        let movement = generate_legal_movements(&game)[0];
        apply_move(&mut game, movement).expect("move should apply");
        assert_ne!(PositionKey::from_state(&game), key);
    }
}
