//! Input and persisted data shapes shared by the engine and its host.

pub mod config;
pub mod player;
pub mod snapshot;
pub mod state;

/// Seats are numbered `1..=MAX_PLAYERS`.
pub const MAX_PLAYERS: usize = 15;
/// Roles expose at most this many target slots.
pub const MAX_TARGET_SLOTS: usize = 2;

pub use config::{GameConfig, RoleSettings, RoleTable, STANDARD_TAGS};
pub use player::{is_valid_seat, AllySummary, PlayerInput, Seat};
pub use snapshot::{ActorState, WinnerSummary};
pub use state::{GameState, GraveyardRecord, StatePlayer};
