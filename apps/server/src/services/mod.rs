//! Session and matchmaking core.

pub mod arbiter;
pub mod auth;
pub mod coordinator;
pub mod matchmaking;
pub mod registry;
pub mod scheduler;

pub use arbiter::TurnArbiter;
pub use auth::AuthService;
pub use coordinator::GameCoordinator;
pub use matchmaking::{DequeueOutcome, EnqueueOutcome, HandoffPoll, MatchmakingQueue, QueueState};
pub use registry::GameRegistry;
pub use scheduler::{PairingScheduler, SchedulerConfig};
