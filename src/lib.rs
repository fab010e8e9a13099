pub mod board;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod game;
#[cfg(feature = "cli")]
pub mod logger;
pub mod moves;
pub mod random;
pub mod record;
pub mod square;
pub mod status;

pub use config::GameConfig;
pub use coordinator::TurnCoordinator;
pub use error::ChessError;
pub use game::{GameState, Player, TurnOutcome};
pub use status::{GameResult, Outcome, Reason};
