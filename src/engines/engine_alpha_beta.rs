//! Material search engine owning its session caches.

use tracing::debug;

use crate::engines::engine_trait::{parse_bool_option, Engine, EngineOutput, GoParams};
use crate::errors::EngineError;
use crate::game_state::game_state::GameState;
use crate::move_generation::move_generator::{CachedMoveGenerator, LegalMoveGenerator};
use crate::search::board_scoring::MaterialScorer;
use crate::search::minimax::{search_best_move, SearchAlgorithm, SearchConfig};
use crate::search::movement_cache::{CacheStats, PositionMoveCache};
use crate::utils::coordinate_notation::movement_to_string;

/// Engine built on [`search_best_move`].
///
/// The caches live as long as the engine and are only cleared by
/// [`Engine::new_game`], or, for the figure table, when it outgrows
/// `figure_cache_capacity` before a search.
#[derive(Debug, Clone, Default)]
pub struct AlphaBetaEngine {
    config: SearchConfig,
    figure_generator: CachedMoveGenerator,
    position_cache: PositionMoveCache,
}

impl AlphaBetaEngine {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn figure_cache_stats(&self) -> CacheStats {
        self.figure_generator.stats()
    }

    pub fn position_cache_stats(&self) -> CacheStats {
        self.position_cache.stats()
    }
}

impl Engine for AlphaBetaEngine {
    fn name(&self) -> &str {
        "FairyChess AlphaBeta"
    }

    fn new_game(&mut self) {
        self.figure_generator.clear();
        self.position_cache.clear();
    }

    fn set_option(&mut self, name: &str, value: &str) -> Result<(), EngineError> {
        let invalid = || EngineError::InvalidOptionValue {
            name: name.to_owned(),
            value: value.to_owned(),
        };

        match name.trim().to_ascii_lowercase().as_str() {
            "depth" => {
                self.config.max_depth = value.trim().parse::<u8>().map_err(|_| invalid())?;
            }
            "algorithm" => {
                self.config.algorithm = match value.trim().to_ascii_lowercase().as_str() {
                    "minimax" => SearchAlgorithm::Minimax,
                    "alphabeta" | "alpha-beta" => SearchAlgorithm::AlphaBeta,
                    _ => return Err(invalid()),
                };
            }
            "figurecache" => self.config.use_figure_cache = parse_bool_option(name, value)?,
            "positioncache" => self.config.use_position_cache = parse_bool_option(name, value)?,
            _ => return Err(EngineError::UnknownOption(name.to_owned())),
        }
        Ok(())
    }

    fn choose_move(
        &mut self,
        game_state: &GameState,
        params: &GoParams,
    ) -> Result<EngineOutput, EngineError> {
        let mut config = self.config;
        if let Some(depth) = params.depth {
            config.max_depth = depth;
        }

        if self.figure_generator.cache().len() > config.figure_cache_capacity {
            debug!(
                entries = self.figure_generator.cache().len(),
                "clearing figure cache"
            );
            self.figure_generator.clear();
        }

        let mut scratch = game_state.clone();
        let result = if config.use_figure_cache {
            search_best_move(
                &mut scratch,
                &config,
                &mut self.figure_generator,
                &MaterialScorer,
                Some(&mut self.position_cache),
            )?
        } else {
            search_best_move(
                &mut scratch,
                &config,
                &mut LegalMoveGenerator,
                &MaterialScorer,
                Some(&mut self.position_cache),
            )?
        };

        let mut out = EngineOutput {
            best_move: result.best_move,
            score: Some(result.score),
            info_lines: Vec::new(),
        };
        out.info_lines.push(format!(
            "info depth {} nodes {} score {}",
            result.depth, result.nodes, result.score
        ));
        if let Some(movement) = result.best_move {
            out.info_lines.push(format!(
                "info string alpha_beta best {}",
                movement_to_string(&movement, game_state.dictionary())
            ));
        }

        let figure = self.figure_generator.stats();
        let position = self.position_cache.stats();
        out.info_lines.push(format!(
            "info string figure_cache accesses {} hits {} rate {:.3}",
            figure.accesses,
            figure.hits,
            figure.hit_rate()
        ));
        out.info_lines.push(format!(
            "info string position_cache accesses {} hits {} rate {:.3}",
            position.accesses,
            position.hits,
            position.hit_rate()
        ));

        Ok(out)
    }
}
