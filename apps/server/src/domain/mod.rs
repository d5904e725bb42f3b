//! Domain layer: identifiers, game records and snapshot types.

pub mod game;
pub mod ids;
pub mod player;
pub mod snapshot;

// Re-exports for ergonomics
pub use game::{assign_sides, BoardState, Game, Lifecycle, Outcome, Side};
pub use ids::{Guid, PlayerId};
pub use player::{NewPlayer, Player, PlayerCredentials, PlayerSummary};
pub use snapshot::{GameSnapshot, SeatView};
