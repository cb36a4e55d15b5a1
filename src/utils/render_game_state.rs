//! Plain-text board dump.
//!
//! One character per square, row 7 first: the kind's symbol, uppercase for
//! Light and lowercase for Dark, `.` for an empty square.

use crate::game_state::chess_types::*;

/// Eight lines of eight characters, row 7 at the top.
pub fn render_game_state(game_state: &GameState) -> String {
    let mut out = String::with_capacity(72);

    for rank in (0..8u8).rev() {
        for file in 0..8u8 {
            out.push(square_char(game_state, rank * 8 + file));
        }
        out.push('\n');
    }

    out
}

/// Board dump followed by a FEN-like summary line:
/// side, castling flags, en passant square, halfmove clock, fullmove number.
pub fn state_string(game_state: &GameState) -> String {
    let mut out = render_game_state(game_state);

    let side = match game_state.side_to_move() {
        Color::Light => 'w',
        Color::Dark => 'b',
    };

    let rights = game_state.castling_rights();
    let mut castling = String::new();
    for (flag, ch) in [
        (CASTLE_LIGHT_KINGSIDE, 'K'),
        (CASTLE_LIGHT_QUEENSIDE, 'Q'),
        (CASTLE_DARK_KINGSIDE, 'k'),
        (CASTLE_DARK_QUEENSIDE, 'q'),
    ] {
        if rights & flag != 0 {
            castling.push(ch);
        }
    }
    if castling.is_empty() {
        castling.push('-');
    }

    let en_passant = game_state
        .en_passant_square()
        .map(|square| square_name(Coordinate::from_square(square)))
        .unwrap_or_else(|| "-".to_owned());

    out.push_str(&format!(
        "{side} {castling} {en_passant} {} {}",
        game_state.halfmove_clock(),
        game_state.fullmove_number()
    ));
    out
}

fn square_char(game_state: &GameState, square: Square) -> char {
    match game_state.piece_at(square) {
        Some((kind, color)) => {
            let symbol = game_state.dictionary().kind(kind).symbol;
            match color {
                Color::Light => symbol.to_ascii_uppercase(),
                Color::Dark => symbol.to_ascii_lowercase(),
            }
        }
        None => '.',
    }
}

fn square_name(coordinate: Coordinate) -> String {
    let file = char::from(b'a' + coordinate.file);
    let rank = char::from(b'1' + coordinate.rank);
    format!("{file}{rank}")
}
