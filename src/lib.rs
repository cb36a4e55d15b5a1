//! Crate root module declarations for the fairy chess engine.
//!
//! This file exposes all top-level subsystems (game state, movement grammar,
//! move generation, search, engines and utility helpers) so the binary,
//! benches and external tooling can import stable module paths.

pub mod errors;

pub mod game_state {
    pub mod chess_game;
    pub mod chess_rules;
    pub mod chess_types;
    pub mod formation;
    pub mod game_state;
    pub mod piece_dictionary;
    pub mod undo_state;
}

pub mod moves {
    pub mod leaper_moves;
    pub mod move_descriptions;
    pub mod movement_notation;
    pub mod rider_moves;
}

pub mod move_generation {
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod legal_move_special;
    pub mod move_generator;
    pub mod perft;
}

pub mod search {
    pub mod board_scoring;
    pub mod minimax;
    pub mod movement_cache;
    pub mod zobrist;
}

pub mod engines {
    pub mod engine_alpha_beta;
    pub mod engine_random;
    pub mod engine_trait;
}

pub mod utils {
    pub mod coordinate_notation;
    pub mod render_game_state;
}
