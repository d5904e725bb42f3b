//! Game record and the small value types around it.

use std::fmt::{Display, Formatter, Result as FmtResult};

use rand::Rng;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::ids::{Guid, PlayerId};

/// Which of the two seats moves first. For chess, `First` is white.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    First,
    Second,
}

impl Side {
    pub const fn opposite(self) -> Self {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }
}

/// Persisted lifecycle of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    InProgress,
    FirstWon,
    SecondWon,
    Draw,
}

impl Lifecycle {
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Lifecycle::InProgress)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Lifecycle::InProgress => "in_progress",
            Lifecycle::FirstWon => "first_won",
            Lifecycle::SecondWon => "second_won",
            Lifecycle::Draw => "draw",
        }
    }
}

impl Display for Lifecycle {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Final result of a finished game, expressed in seats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    FirstWon,
    SecondWon,
    Draw,
}

impl Outcome {
    pub const fn winner(self) -> Option<Side> {
        match self {
            Outcome::FirstWon => Some(Side::First),
            Outcome::SecondWon => Some(Side::Second),
            Outcome::Draw => None,
        }
    }
}

impl From<Outcome> for Lifecycle {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::FirstWon => Lifecycle::FirstWon,
            Outcome::SecondWon => Lifecycle::SecondWon,
            Outcome::Draw => Lifecycle::Draw,
        }
    }
}

/// Opaque board blob. Only the rules engine looks inside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardState(String);

impl BoardState {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// A game between two players as the core sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct Game {
    pub id: i64,
    pub guid: Guid,
    pub first_player: PlayerId,
    pub second_player: PlayerId,
    pub board: BoardState,
    pub lifecycle: Lifecycle,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Game {
    pub const fn player_on(&self, side: Side) -> PlayerId {
        match side {
            Side::First => self.first_player,
            Side::Second => self.second_player,
        }
    }

    /// Seat of `player`, if they take part. Self-play games report `First`.
    pub fn side_of(&self, player: PlayerId) -> Option<Side> {
        if self.first_player == player {
            Some(Side::First)
        } else if self.second_player == player {
            Some(Side::Second)
        } else {
            None
        }
    }

    pub fn opponent_of(&self, player: PlayerId) -> Option<PlayerId> {
        self.side_of(player)
            .map(|side| self.player_on(side.opposite()))
    }

    pub fn involves(&self, player: PlayerId) -> bool {
        self.side_of(player).is_some()
    }
}

/// Unbiased coin flip deciding who moves first.
///
/// Returns `(first_moving, second_moving)`.
pub fn assign_sides<R: Rng + ?Sized>(
    rng: &mut R,
    a: PlayerId,
    b: PlayerId,
) -> (PlayerId, PlayerId) {
    if rng.random_bool(0.5) {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn game(first: i64, second: i64) -> Game {
        let now = OffsetDateTime::now_utc();
        Game {
            id: 1,
            guid: Guid::new(),
            first_player: PlayerId(first),
            second_player: PlayerId(second),
            board: BoardState::new("{}"),
            lifecycle: Lifecycle::InProgress,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn seats_resolve_both_ways() {
        let g = game(1, 2);
        assert_eq!(g.player_on(Side::First), PlayerId(1));
        assert_eq!(g.player_on(Side::Second), PlayerId(2));
        assert_eq!(g.side_of(PlayerId(2)), Some(Side::Second));
        assert_eq!(g.opponent_of(PlayerId(1)), Some(PlayerId(2)));
        assert_eq!(g.side_of(PlayerId(3)), None);
        assert!(!g.involves(PlayerId(3)));
    }

    #[test]
    fn self_play_is_its_own_opponent() {
        let g = game(5, 5);
        assert_eq!(g.side_of(PlayerId(5)), Some(Side::First));
        assert_eq!(g.opponent_of(PlayerId(5)), Some(PlayerId(5)));
    }

    #[test]
    fn lifecycle_display_and_terminality() {
        assert_eq!(Lifecycle::InProgress.to_string(), "in_progress");
        assert_eq!(Lifecycle::SecondWon.to_string(), "second_won");
        assert!(!Lifecycle::InProgress.is_terminal());
        assert!(Lifecycle::Draw.is_terminal());
    }

    #[test]
    fn coin_flip_is_roughly_even() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let trials = 10_000;
        let a_first = (0..trials)
            .filter(|_| assign_sides(&mut rng, PlayerId(1), PlayerId(2)).0 == PlayerId(1))
            .count();
        // 10k fair flips stay well inside ±5%
        assert!((4_500..=5_500).contains(&a_first), "a_first = {a_first}");
    }
}
