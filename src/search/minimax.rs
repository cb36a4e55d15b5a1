//! Depth-bounded minimax and alpha-beta over a single mutable position.
//!
//! Children are visited with `apply_move`/`undo_move`, so one `GameState`
//! serves the whole tree. Scores are always from the perspective of the
//! color to move at the root.

use tracing::debug;

use crate::errors::MoveError;
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_apply::{apply_move, undo_move};
use crate::move_generation::move_generator::{LegalMoveGenerator, MoveGenerator};
use crate::moves::move_descriptions::Movement;
use crate::search::board_scoring::{BoardScorer, MaterialScorer};
use crate::search::movement_cache::{CachedSearch, PositionKey, PositionMoveCache};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchAlgorithm {
    Minimax,
    #[default]
    AlphaBeta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    pub max_depth: u8,
    pub algorithm: SearchAlgorithm,
    pub use_figure_cache: bool,
    pub use_position_cache: bool,
    /// Figure cache entries kept before the table is cleared.
    pub figure_cache_capacity: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: 2,
            algorithm: SearchAlgorithm::AlphaBeta,
            use_figure_cache: true,
            use_position_cache: true,
            figure_cache_capacity: 1 << 18,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchResult {
    /// `None` when the side to move has no move or the game is decided.
    pub best_move: Option<Movement>,
    pub score: i32,
    pub depth: u8,
    pub nodes: u64,
}

/// Search `game_state` to `config.max_depth` plies.
///
/// The position is restored before returning. Among equally scored root
/// moves the first in generation order is kept, which makes both algorithms
/// select the same move.
pub fn search_best_move<G, S>(
    game_state: &mut GameState,
    config: &SearchConfig,
    generator: &mut G,
    scorer: &S,
    position_cache: Option<&mut PositionMoveCache>,
) -> Result<SearchResult, MoveError>
where
    G: MoveGenerator + ?Sized,
    S: BoardScorer + ?Sized,
{
    let depth = config.max_depth;
    let maximizing = game_state.side_to_move();

    let mut position_cache = position_cache.filter(|_| config.use_position_cache);
    let key = position_cache
        .as_ref()
        .map(|_| PositionKey::from_state(game_state));
    if let (Some(cache), Some(key)) = (position_cache.as_deref_mut(), key.as_ref()) {
        if let Some(hit) = cache.probe(key, depth) {
            debug!(depth, score = hit.score, "position cache hit");
            return Ok(SearchResult {
                best_move: hit.best_move,
                score: hit.score,
                depth,
                nodes: 0,
            });
        }
    }

    let mut nodes = 1u64;
    let mut best_move = None;
    let mut best_score = scorer.score(game_state, maximizing);

    let moves = if depth == 0 || game_state.winner().is_some() {
        Vec::new()
    } else {
        generator.generate_legal_moves(game_state)
    };

    if !moves.is_empty() {
        best_score = i32::MIN;
        for movement in moves {
            let record = apply_move(game_state, movement)?;
            let score = match config.algorithm {
                SearchAlgorithm::Minimax => {
                    minimax(game_state, depth - 1, maximizing, generator, scorer, &mut nodes)
                }
                SearchAlgorithm::AlphaBeta => alpha_beta(
                    game_state,
                    depth - 1,
                    best_score,
                    i32::MAX,
                    maximizing,
                    generator,
                    scorer,
                    &mut nodes,
                ),
            };
            undo_move(game_state, &record)?;
            let score = score?;

            if best_move.is_none() || score > best_score {
                best_score = score;
                best_move = Some(movement);
            }
        }
    }

    if let (Some(cache), Some(key)) = (position_cache, key) {
        cache.store(
            key,
            CachedSearch {
                best_move,
                score: best_score,
                depth,
            },
        );
    }

    debug!(
        depth,
        nodes,
        score = best_score,
        algorithm = ?config.algorithm,
        "search complete"
    );

    Ok(SearchResult {
        best_move,
        score: best_score,
        depth,
        nodes,
    })
}

/// Uncached material search on a scratch copy of `game_state`.
pub fn best_move(game_state: &GameState, config: &SearchConfig) -> Result<SearchResult, MoveError> {
    let mut scratch = game_state.clone();
    search_best_move(&mut scratch, config, &mut LegalMoveGenerator, &MaterialScorer, None)
}

/// Plain minimax value of `game_state` for `maximizing`.
pub fn minimax<G, S>(
    game_state: &mut GameState,
    depth: u8,
    maximizing: Color,
    generator: &mut G,
    scorer: &S,
    nodes: &mut u64,
) -> Result<i32, MoveError>
where
    G: MoveGenerator + ?Sized,
    S: BoardScorer + ?Sized,
{
    *nodes += 1;

    if depth == 0 || game_state.winner().is_some() {
        return Ok(scorer.score(game_state, maximizing));
    }
    let moves = generator.generate_legal_moves(game_state);
    if moves.is_empty() {
        return Ok(scorer.score(game_state, maximizing));
    }

    let maximize = game_state.side_to_move() == maximizing;
    let mut best = if maximize { i32::MIN } else { i32::MAX };

    for movement in moves {
        let record = apply_move(game_state, movement)?;
        let score = minimax(game_state, depth - 1, maximizing, generator, scorer, nodes);
        undo_move(game_state, &record)?;
        let score = score?;

        best = if maximize { best.max(score) } else { best.min(score) };
    }

    Ok(best)
}

/// Minimax value with an `[alpha, beta]` window.
///
/// A child at or beyond the window edge cuts off its remaining siblings.
#[allow(clippy::too_many_arguments)]
pub fn alpha_beta<G, S>(
    game_state: &mut GameState,
    depth: u8,
    mut alpha: i32,
    mut beta: i32,
    maximizing: Color,
    generator: &mut G,
    scorer: &S,
    nodes: &mut u64,
) -> Result<i32, MoveError>
where
    G: MoveGenerator + ?Sized,
    S: BoardScorer + ?Sized,
{
    *nodes += 1;

    if depth == 0 || game_state.winner().is_some() {
        return Ok(scorer.score(game_state, maximizing));
    }
    let moves = generator.generate_legal_moves(game_state);
    if moves.is_empty() {
        return Ok(scorer.score(game_state, maximizing));
    }

    let maximize = game_state.side_to_move() == maximizing;
    let mut best = if maximize { i32::MIN } else { i32::MAX };

    for movement in moves {
        let record = apply_move(game_state, movement)?;
        let score = alpha_beta(
            game_state,
            depth - 1,
            alpha,
            beta,
            maximizing,
            generator,
            scorer,
            nodes,
        );
        undo_move(game_state, &record)?;
        let score = score?;

        if maximize {
            best = best.max(score);
            alpha = alpha.max(best);
            if best >= beta {
                break;
            }
        } else {
            best = best.min(score);
            beta = beta.min(best);
            if best <= alpha {
                break;
            }
        }
    }

    Ok(best)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::game_state::chess_rules::{standard_dictionary, KING, KNIGHT, PAWN, QUEEN, ROOK};
    use crate::game_state::formation::Formation;
    use crate::move_generation::move_generator::CachedMoveGenerator;

    fn coord(file: u8, rank: u8) -> Coordinate {
        Coordinate::new(file, rank).expect("test coordinate is on the board")
    }

    fn build(formation: Formation) -> GameState {
        GameState::from_formation(&formation, Arc::new(standard_dictionary()))
            .expect("test formation should build")
    }

    fn config(depth: u8, algorithm: SearchAlgorithm) -> SearchConfig {
        SearchConfig {
            max_depth: depth,
            algorithm,
            use_figure_cache: false,
            use_position_cache: false,
            ..SearchConfig::default()
        }
    }

    fn skirmish() -> GameState {
        build(
            Formation::empty()
                .with_piece(coord(6, 0), KING)
                .with_piece(coord(0, 0), ROOK)
                .with_piece(coord(2, 2), KNIGHT)
                .with_piece(coord(5, 1), PAWN)
                .with_piece(coord(6, 7), KING)
                .with_piece(coord(3, 6), KNIGHT)
                .with_piece(coord(0, 5), ROOK)
                .with_piece(coord(4, 4), PAWN),
        )
    }

    #[test]
    fn depth_zero_returns_static_evaluation() {
        let game = GameState::new_game();
        let result = best_move(&game, &config(0, SearchAlgorithm::AlphaBeta)).expect("search runs");
        assert_eq!(result.best_move, None);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn takes_hanging_queen() {
        let game = build(
            Formation::empty()
                .with_piece(coord(7, 0), KING)
                .with_piece(coord(0, 0), ROOK)
                .with_piece(coord(7, 7), KING)
                .with_piece(coord(0, 7), QUEEN),
        );

        for depth in [1, 2] {
            let result =
                best_move(&game, &config(depth, SearchAlgorithm::AlphaBeta)).expect("search runs");
            let chosen = result.best_move.expect("a move should be chosen");
            assert_eq!((chosen.from, chosen.to), (coord(0, 0), coord(0, 7)));
            assert_eq!(result.score, 5);
        }
    }

    #[test]
    fn captures_king_when_possible() {
        let game = build(
            Formation::empty()
                .with_piece(coord(4, 0), KING)
                .with_piece(coord(4, 1), QUEEN)
                .with_piece(coord(4, 7), KING),
        );
        let result = best_move(&game, &config(2, SearchAlgorithm::Minimax)).expect("search runs");
        let chosen = result.best_move.expect("a move should be chosen");
        assert_eq!(chosen.to, coord(4, 7));
        assert!(result.score >= 1000);
    }

    #[test]
    fn alpha_beta_matches_minimax() {
        for game in [skirmish(), GameState::new_game()] {
            for depth in 1..=3 {
                let plain = best_move(&game, &config(depth, SearchAlgorithm::Minimax))
                    .expect("minimax runs");
                let pruned = best_move(&game, &config(depth, SearchAlgorithm::AlphaBeta))
                    .expect("alpha-beta runs");

                assert_eq!(pruned.best_move, plain.best_move, "depth {depth}");
                assert_eq!(pruned.score, plain.score, "depth {depth}");
                assert!(pruned.nodes <= plain.nodes);
            }
        }
    }

    #[test]
    fn search_restores_position() {
        let mut game = skirmish();
        let before = game.clone();
        search_best_move(
            &mut game,
            &config(3, SearchAlgorithm::AlphaBeta),
            &mut CachedMoveGenerator::new(),
            &MaterialScorer,
            None,
        )
        .expect("search runs");
        assert_eq!(game, before);
    }

    #[test]
    fn cached_generator_does_not_change_result() {
        let game = skirmish();
        let plain = best_move(&game, &config(3, SearchAlgorithm::AlphaBeta)).expect("search runs");

        let mut scratch = game.clone();
        let mut generator = CachedMoveGenerator::new();
        let cached = search_best_move(
            &mut scratch,
            &config(3, SearchAlgorithm::AlphaBeta),
            &mut generator,
            &MaterialScorer,
            None,
        )
        .expect("search runs");

        assert_eq!(cached.best_move, plain.best_move);
        assert_eq!(cached.score, plain.score);

        // A second walk of the same tree is served from the cache.
        let hits_before = generator.stats().hits;
        let repeated = search_best_move(
            &mut scratch,
            &config(3, SearchAlgorithm::AlphaBeta),
            &mut generator,
            &MaterialScorer,
            None,
        )
        .expect("search runs");
        assert_eq!(repeated.best_move, plain.best_move);
        assert_eq!(repeated.score, plain.score);
        assert!(generator.stats().hits > hits_before);
    }

    #[test]
    fn position_cache_answers_repeat_search() {
        let mut game = skirmish();
        let mut cache = PositionMoveCache::new();
        let settings = SearchConfig {
            use_position_cache: true,
            ..config(2, SearchAlgorithm::AlphaBeta)
        };

        let first = search_best_move(
            &mut game,
            &settings,
            &mut LegalMoveGenerator,
            &MaterialScorer,
            Some(&mut cache),
        )
        .expect("search runs");
        let second = search_best_move(
            &mut game,
            &settings,
            &mut LegalMoveGenerator,
            &MaterialScorer,
            Some(&mut cache),
        )
        .expect("search runs");

        assert_eq!(first.best_move, second.best_move);
        assert_eq!(first.score, second.score);
        assert_eq!(second.nodes, 0);
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn decided_game_has_no_move() {
        let game = build(Formation::empty().with_piece(coord(4, 0), KING));
        let result = best_move(&game, &config(2, SearchAlgorithm::AlphaBeta)).expect("search runs");
        assert_eq!(result.best_move, None);
    }
}
