//! # mafia_core - Deterministic Round Resolution Engine
//!
//! Resolves rounds of a social-deduction elimination game (Town vs Mafia).
//! A hosting service persists state between rounds and calls one of three
//! entry points per transition:
//!
//! - [`new_game`]: draft roles, seat the table, day 1
//! - [`load_game`]: rehydrate a persisted game without advancing it
//! - [`resolve_game`]: rehydrate and resolve one night
//!
//! Every call returns the public state, per-actor dumps, the round's event
//! tree, the winners (if any) and a trace log. Given the same seed the output
//! is byte-identical.

pub mod api;
pub mod assignment;
pub mod error;
pub mod events;
pub mod game;
pub mod logger;
pub mod models;
pub mod rng;
pub mod roles;

pub use api::{
    engine_input_schema, load_game, load_game_json, new_game, new_game_json, resolve_game,
    resolve_game_json, ApiError, EngineInput, EngineOptions, EngineResult,
};
pub use error::{EngineError, Result, RngError};
pub use events::{EventEntry, GameEvent, GameEventGroup};
pub use game::Game;
pub use models::{ActorState, GameConfig, GameState, PlayerInput, RoleSettings, WinnerSummary};
pub use roles::{Alignment, Role};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = 1;
