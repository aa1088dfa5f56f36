//! Engine entry points.
//!
//! Each call validates its input, builds a fresh [`Game`], optionally resolves
//! one round, runs the win check and serializes the result. Nothing survives
//! between calls.

use schemars::schema::RootSchema;
use serde_json::json;
use tracing::{debug, warn};

use super::types::{ApiError, EngineInput, EngineResult};
use crate::error::{EngineError, Result};
use crate::game::Game;
use crate::logger::EngineLogger;
use crate::models::{GameState, MAX_PLAYERS};
use crate::rng::EngineRng;

/// Schema checks that do not need a game: table size, seat ranges, weights.
pub fn validate_input(input: &EngineInput) -> Result<()> {
    let mut errors = Vec::new();

    if input.players.len() > MAX_PLAYERS {
        errors.push(format!(
            "players: at most {} players, got {}",
            MAX_PLAYERS,
            input.players.len()
        ));
    }
    errors.extend(input.players.iter().filter_map(|p| p.validate().err()));
    if let Err(e) = input.config.validate() {
        errors.push(e);
    }
    if let Some(Err(e)) = input.state.as_ref().map(|s| s.validate()) {
        errors.push(e);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(EngineError::validation("Invalid engine input", errors))
    }
}

fn context(input: &EngineInput) -> (EngineLogger, EngineRng) {
    let mut logger = EngineLogger::new();
    let rng = match input.seed() {
        Some(seed) => EngineRng::from_seed(seed),
        None => {
            let rng = EngineRng::from_entropy();
            logger.info(format!("No seed supplied, using {}", rng.seed()));
            rng
        }
    };
    (logger, rng)
}

fn require_state<'a>(input: &'a EngineInput, action: &'static str) -> Result<&'a GameState> {
    input.state.as_ref().ok_or(EngineError::MissingState { action })
}

fn finish(mut game: Game) -> EngineResult {
    let winners = game.check_for_win();
    let winners = game.summarize_winners(&winners);
    let state = game.state();
    let actors = game.dump_actors();
    let events = game.events().clone();
    EngineResult { state, actors, events, winners, log: game.into_log() }
}

/// Starts a game: drafts roles, seats players, checks for an immediate win.
pub fn new_game(input: &EngineInput) -> Result<EngineResult> {
    validate_input(input)?;
    let (logger, rng) = context(input);
    let game = Game::new(&input.players, &input.config, logger, rng)?;
    debug!(target: "mafia_core", seed = game.seed(), players = input.players.len(), "new game");
    Ok(finish(game))
}

/// Rehydrates a game and reports its current state without advancing it.
pub fn load_game(input: &EngineInput) -> Result<EngineResult> {
    validate_input(input)?;
    let state = require_state(input, "load")?;
    let (logger, rng) = context(input);
    let game = Game::load(&input.players, &input.config, state, logger, rng)?;
    debug!(target: "mafia_core", day = game.day(), "game loaded");
    Ok(finish(game))
}

/// Rehydrates a game and resolves one round.
pub fn resolve_game(input: &EngineInput) -> Result<EngineResult> {
    validate_input(input)?;
    let state = require_state(input, "resolve")?;
    let (logger, rng) = context(input);
    let mut game = Game::load(&input.players, &input.config, state, logger, rng)?;
    game.resolve()?;
    debug!(target: "mafia_core", day = game.day(), "round resolved");
    Ok(finish(game))
}

/// JSON Schema of [`EngineInput`].
pub fn engine_input_schema() -> RootSchema {
    schemars::schema_for!(EngineInput)
}

impl EngineError {
    pub fn to_api_error(&self) -> ApiError {
        let base = ApiError::new(self.code(), &self.to_string());
        match self {
            EngineError::Validation { details, .. } => base.with_detail("errors", json!(details)),
            EngineError::MissingRole { player_id } | EngineError::MissingSeat { player_id } => {
                base.with_detail("playerId", json!(player_id))
            }
            EngineError::UnknownRole(role) => base.with_detail("role", json!(role)),
            EngineError::ActorNotFound { number } => base.with_detail("number", json!(number)),
            EngineError::MissingState { .. } | EngineError::Rng(_) => base,
        }
    }
}

fn to_json_error(err: EngineError) -> String {
    warn!(target: "mafia_core", code = err.code(), "{}", err);
    let api = err.to_api_error();
    serde_json::to_string(&api).unwrap_or(api.message)
}

fn run_json(
    input_json: &str,
    entry: fn(&EngineInput) -> Result<EngineResult>,
) -> std::result::Result<String, String> {
    let input: EngineInput =
        serde_json::from_str(input_json).map_err(|e| to_json_error(e.into()))?;
    let result = entry(&input).map_err(to_json_error)?;
    serde_json::to_string(&result).map_err(|e| to_json_error(e.into()))
}

/// [`new_game`] over JSON strings. Errors are serialized [`ApiError`]s.
pub fn new_game_json(input_json: &str) -> std::result::Result<String, String> {
    run_json(input_json, new_game)
}

pub fn load_game_json(input_json: &str) -> std::result::Result<String, String> {
    run_json(input_json, load_game)
}

pub fn resolve_game_json(input_json: &str) -> std::result::Result<String, String> {
    run_json(input_json, resolve_game)
}
