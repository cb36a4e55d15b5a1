//! Variant piece definitions.
//!
//! A `PieceDictionary` is built once per variant and shared read-only by
//! every position of that variant through an `Arc`. It owns the compiled
//! movement patterns, point values and the Zobrist tables sized for the
//! variant's kind count.

use std::collections::HashMap;

use tracing::warn;

use crate::errors::FormationError;
use crate::game_state::chess_rules::{KING, KNIGHT, PAWN, QUEEN, ROOK};
use crate::game_state::chess_types::KindId;
use crate::moves::movement_notation::{compile, MovementNotation};
use crate::search::zobrist::{variant_seed, ZobristKeys};

/// Raw dictionary entry as supplied by a variant loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceDefinition {
    pub name: String,
    pub value: i32,
    pub notation: String,
}

impl PieceDefinition {
    pub fn new(name: impl Into<String>, value: i32, notation: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value,
            notation: notation.into(),
        }
    }
}

/// A compiled piece kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceKind {
    pub name: String,
    pub value: i32,
    pub notation: String,
    pub movements: Vec<MovementNotation>,
    pub symbol: char,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceDictionary {
    kinds: Vec<PieceKind>,
    by_name: HashMap<String, KindId>,
    zobrist: ZobristKeys,
}

impl PieceDictionary {
    /// Compile every definition. The first definition of a name wins.
    ///
    /// A definition whose movement string does not compile is kept with no
    /// movement patterns so the rest of the variant stays playable.
    pub fn new<I>(definitions: I) -> Self
    where
        I: IntoIterator<Item = PieceDefinition>,
    {
        let mut kinds: Vec<PieceKind> = Vec::new();
        let mut by_name = HashMap::new();

        for definition in definitions {
            if by_name.contains_key(&definition.name) {
                warn!(piece = %definition.name, "duplicate piece definition ignored");
                continue;
            }

            let movements = match compile(&definition.notation) {
                Ok(movements) => movements,
                Err(err) => {
                    warn!(piece = %definition.name, error = %err, "piece has no usable movement");
                    Vec::new()
                }
            };

            by_name.insert(definition.name.clone(), kinds.len());
            kinds.push(PieceKind {
                symbol: symbol_for(&definition.name),
                name: definition.name,
                value: definition.value,
                notation: definition.notation,
                movements,
            });
        }

        let zobrist = ZobristKeys::new(
            kinds.len(),
            variant_seed(kinds.iter().map(|kind| kind.name.as_str())),
        );

        Self {
            kinds,
            by_name,
            zobrist,
        }
    }

    /// Check that the kinds the rules depend on are present.
    pub fn validate_roles(&self) -> Result<(), FormationError> {
        for required in [KING, PAWN, QUEEN] {
            if !self.by_name.contains_key(required) {
                return Err(FormationError::MissingRequiredKind(required.to_owned()));
            }
        }
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    #[inline]
    pub fn kind(&self, id: KindId) -> &PieceKind {
        &self.kinds[id]
    }

    #[inline]
    pub fn kinds(&self) -> &[PieceKind] {
        &self.kinds
    }

    #[inline]
    pub fn id_of(&self, name: &str) -> Option<KindId> {
        self.by_name.get(name).copied()
    }

    #[inline]
    pub fn king(&self) -> Option<KindId> {
        self.id_of(KING)
    }

    #[inline]
    pub fn pawn(&self) -> Option<KindId> {
        self.id_of(PAWN)
    }

    #[inline]
    pub fn rook(&self) -> Option<KindId> {
        self.id_of(ROOK)
    }

    #[inline]
    pub fn queen(&self) -> Option<KindId> {
        self.id_of(QUEEN)
    }

    #[inline]
    pub fn zobrist(&self) -> &ZobristKeys {
        &self.zobrist
    }
}

fn symbol_for(name: &str) -> char {
    if name == KNIGHT {
        return 'n';
    }
    name.chars()
        .next()
        .map(|ch| ch.to_ascii_lowercase())
        .unwrap_or('?')
}
