//! Numeric move strings: `F1_R1_F2_R2[_piece]`.
//!
//! Each pair is column then row, both `0..=7`, so `4_1_4_3` is e2 to e4. The
//! optional fifth token names the promotion kind. `-` is accepted as a
//! delimiter; output always uses `_`.

use crate::errors::MoveParseError;
use crate::game_state::chess_types::Coordinate;
use crate::game_state::piece_dictionary::PieceDictionary;
use crate::moves::move_descriptions::Movement;

/// Decode a move string into an unverified [`Movement`].
pub fn parse_movement(text: &str, dictionary: &PieceDictionary) -> Result<Movement, MoveParseError> {
    let tokens: Vec<&str> = text.trim().split(['_', '-']).collect();
    if tokens.len() != 4 && tokens.len() != 5 {
        return Err(MoveParseError::WrongTokenCount(text.to_owned()));
    }

    let mut values = [0u8; 4];
    for (slot, token) in values.iter_mut().zip(&tokens) {
        *slot = parse_axis(token)?;
    }

    let from = coordinate(values[0], values[1])?;
    let to = coordinate(values[2], values[3])?;
    let movement = Movement::unverified(from, to);

    match tokens.get(4) {
        Some(name) => {
            let kind = dictionary
                .id_of(name)
                .ok_or_else(|| MoveParseError::UnknownPromotion((*name).to_owned()))?;
            Ok(movement.with_promotion(kind))
        }
        None => Ok(movement),
    }
}

/// Encode a movement; the promotion kind, if any, is written by name.
pub fn movement_to_string(movement: &Movement, dictionary: &PieceDictionary) -> String {
    let mut out = format!(
        "{}_{}_{}_{}",
        movement.from.file, movement.from.rank, movement.to.file, movement.to.rank
    );
    if let Some(kind) = movement.promotion.filter(|kind| *kind < dictionary.len()) {
        out.push('_');
        out.push_str(&dictionary.kind(kind).name);
    }
    out
}

fn parse_axis(token: &str) -> Result<u8, MoveParseError> {
    let value = token
        .trim()
        .parse::<u32>()
        .map_err(|_| MoveParseError::NotANumber(token.to_owned()))?;
    u8::try_from(value)
        .ok()
        .filter(|value| *value < 8)
        .ok_or(MoveParseError::OutOfRange(value))
}

fn coordinate(file: u8, rank: u8) -> Result<Coordinate, MoveParseError> {
    Coordinate::new(file, rank).ok_or(MoveParseError::OutOfRange(u32::from(file.max(rank))))
}
