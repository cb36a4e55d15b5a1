//! Parlett-style movement grammar.
//!
//! A piece's movement string is a comma separated list of sub-patterns, each
//! of which compiles to one [`MovementNotation`]. Tokens are stripped from a
//! sub-pattern in a fixed order: move kind, grouping, conditions, direction
//! (longest token first), and whatever remains is the distance.
//!
//! Examples: `~1/2` (knight), `n+` (rook), `o1>,c1X>,oi2>` (pawn).

use crate::errors::NotationError;

/// How a pattern moves across the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    /// Jumps straight to a fixed offset.
    Leaper,
    /// Repeats a leap along its line until blocked.
    RepeatingLeaper,
    /// Jumping piece marked with `g`; generated with leaper offsets.
    Hopper,
    /// Slides along rays and is blocked by the first occupied square.
    Rider,
}

/// How multiple distance tokens combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grouping {
    None,
    /// `/`: the two magnitudes form one leap, e.g. `1/2`.
    Pair,
    /// `&`: repeated application.
    Repeat,
    /// `.`: one step followed by the next.
    Then,
}

/// A magnitude token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Distance {
    Exact(u8),
    /// `n`: any distance up to the board edge.
    Any,
    /// `x`: both leap components equal, any magnitude.
    EqualPair,
}

impl Distance {
    /// Furthest number of steps this token allows on an 8x8 board.
    #[inline]
    pub const fn max_steps(self) -> u8 {
        match self {
            Distance::Exact(steps) => steps,
            Distance::Any | Distance::EqualPair => 7,
        }
    }
}

/// Ray selection, resolved against the moving color at generation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    None,
    /// `>`
    Forward,
    /// `<`
    Backward,
    /// `<>`
    ForwardBackward,
    /// `=`
    Sideways,
    /// `>=`
    ForwardSideways,
    /// `<=`
    BackwardSideways,
    /// `+`
    Orthogonal,
    /// `X>`
    DiagonalForward,
    /// `X<`
    DiagonalBackward,
    /// `X`
    Diagonal,
    /// `*`
    All,
}

/// Direction tokens ordered so that two-character tokens are matched before
/// their one-character prefixes.
const DIRECTION_TOKENS: [(&str, Direction); 11] = [
    (">=", Direction::ForwardSideways),
    ("<=", Direction::BackwardSideways),
    ("<>", Direction::ForwardBackward),
    ("=", Direction::Sideways),
    ("X>", Direction::DiagonalForward),
    ("X<", Direction::DiagonalBackward),
    ("X", Direction::Diagonal),
    (">", Direction::Forward),
    ("<", Direction::Backward),
    ("+", Direction::Orthogonal),
    ("*", Direction::All),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Conditions {
    /// `i`: only while the piece has never moved.
    pub initial_only: bool,
    /// `c`: only onto an enemy piece.
    pub capture_only: bool,
    /// `o`: only onto an empty square.
    pub non_capture_only: bool,
}

/// One compiled movement sub-pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MovementNotation {
    pub grouping: Grouping,
    pub conditions: Conditions,
    pub kind: MoveKind,
    pub distances: Vec<Distance>,
    pub direction: Direction,
}

impl MovementNotation {
    /// Leap components for a `d1/d2` pairing, if this pattern has one.
    pub fn leap_pair(&self) -> Option<(Distance, Distance)> {
        match (self.grouping, self.distances.as_slice()) {
            (Grouping::Pair, [first, second]) => Some((*first, *second)),
            _ => None,
        }
    }

    /// Maximum ray length for a rider; `None` when no distance was given.
    pub fn ride_limit(&self) -> Option<u8> {
        self.distances
            .iter()
            .map(|distance| distance.max_steps())
            .max()
    }
}

/// Compile a full movement string into its ordered sub-patterns.
///
/// Empty sub-patterns are skipped. Characters that are not part of the
/// grammar are reported as [`NotationError::UnexpectedToken`].
pub fn compile(notation: &str) -> Result<Vec<MovementNotation>, NotationError> {
    notation
        .split(',')
        .map(|pattern| {
            pattern
                .chars()
                .filter(|ch| !ch.is_whitespace())
                .collect::<String>()
        })
        .filter(|pattern| !pattern.is_empty())
        .map(|pattern| compile_pattern(notation, pattern))
        .collect()
}

fn compile_pattern(notation: &str, mut rest: String) -> Result<MovementNotation, NotationError> {
    let kind = if strip_marker(&mut rest, '~') {
        MoveKind::Leaper
    } else if strip_marker(&mut rest, '^') {
        MoveKind::RepeatingLeaper
    } else if strip_marker(&mut rest, 'g') {
        MoveKind::Hopper
    } else {
        MoveKind::Rider
    };

    let grouping = if strip_marker(&mut rest, '/') {
        Grouping::Pair
    } else if strip_marker(&mut rest, '&') {
        Grouping::Repeat
    } else if strip_marker(&mut rest, '.') {
        Grouping::Then
    } else {
        Grouping::None
    };

    let conditions = Conditions {
        initial_only: strip_marker(&mut rest, 'i'),
        capture_only: strip_marker(&mut rest, 'c'),
        non_capture_only: strip_marker(&mut rest, 'o'),
    };

    let mut direction = Direction::None;
    for (token, candidate) in DIRECTION_TOKENS {
        if let Some(at) = rest.find(token) {
            rest.replace_range(at..at + token.len(), "");
            direction = candidate;
            break;
        }
    }

    let distances = if grouping == Grouping::None {
        parse_single_distance(notation, &rest)?
    } else {
        rest.chars()
            .map(|ch| parse_distance_char(notation, ch))
            .collect::<Result<Vec<_>, _>>()?
    };

    Ok(MovementNotation {
        grouping,
        conditions,
        kind,
        distances,
        direction,
    })
}

/// Remove every occurrence of `marker`, reporting whether one was present.
fn strip_marker(rest: &mut String, marker: char) -> bool {
    if !rest.contains(marker) {
        return false;
    }
    rest.retain(|ch| ch != marker);
    true
}

fn parse_single_distance(notation: &str, rest: &str) -> Result<Vec<Distance>, NotationError> {
    match rest {
        "" => Ok(Vec::new()),
        "n" => Ok(vec![Distance::Any]),
        "x" => Ok(vec![Distance::EqualPair]),
        digits if digits.chars().all(|ch| ch.is_ascii_digit()) => {
            let value: u32 = digits.parse().map_err(|_| NotationError::DistanceOutOfRange {
                notation: notation.to_owned(),
                value: u32::MAX,
            })?;
            exact_distance(notation, value).map(|distance| vec![distance])
        }
        other => {
            let token = other
                .chars()
                .find(|ch| !ch.is_ascii_digit())
                .unwrap_or('?');
            Err(NotationError::UnexpectedToken {
                notation: notation.to_owned(),
                token,
            })
        }
    }
}

fn parse_distance_char(notation: &str, ch: char) -> Result<Distance, NotationError> {
    match ch {
        'n' => Ok(Distance::Any),
        'x' => Ok(Distance::EqualPair),
        _ => match ch.to_digit(10) {
            Some(value) => exact_distance(notation, value),
            None => Err(NotationError::UnexpectedToken {
                notation: notation.to_owned(),
                token: ch,
            }),
        },
    }
}

fn exact_distance(notation: &str, value: u32) -> Result<Distance, NotationError> {
    if value > 7 {
        return Err(NotationError::DistanceOutOfRange {
            notation: notation.to_owned(),
            value,
        });
    }
    Ok(Distance::Exact(value as u8))
}
