use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::events::GameEventGroup;
use crate::models::{ActorState, GameConfig, GameState, PlayerInput, WinnerSummary};

/// Input shared by all three entry points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EngineInput {
    pub players: Vec<PlayerInput>,
    pub config: GameConfig,
    /// Required by `loadGame` and `resolveGame`; ignored by `newGame`.
    #[serde(default)]
    pub state: Option<GameState>,
    #[serde(default)]
    pub options: Option<EngineOptions>,
}

impl EngineInput {
    pub fn new(players: Vec<PlayerInput>, config: GameConfig) -> Self {
        Self { players, config, state: None, options: None }
    }

    pub fn with_state(mut self, state: GameState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn with_seed(mut self, seed: i64) -> Self {
        self.options = Some(EngineOptions { seed: Some(seed) });
        self
    }

    pub fn seed(&self) -> Option<i64> {
        self.options.as_ref().and_then(|o| o.seed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct EngineOptions {
    /// Truncated to 32 bits. Omit for a random seed (recorded in the log).
    #[serde(default)]
    pub seed: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EngineResult {
    pub state: GameState,
    pub actors: Vec<ActorState>,
    pub events: GameEventGroup,
    /// `None` while the game goes on.
    pub winners: Option<Vec<WinnerSummary>>,
    pub log: Vec<String>,
}

/// Structured API error with codes and details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    pub details: Option<BTreeMap<String, serde_json::Value>>,
}

impl ApiError {
    pub fn new(code: &str, message: &str) -> Self {
        Self { code: code.to_string(), message: message.to_string(), details: None }
    }

    pub fn with_detail(mut self, key: &str, value: serde_json::Value) -> Self {
        self.details.get_or_insert_with(BTreeMap::new).insert(key.to_string(), value);
        self
    }
}
