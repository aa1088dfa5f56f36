use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::player::{is_valid_seat, Seat};

/// Public roster entry: no role information leaks through here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StatePlayer {
    pub number: Seat,
    pub alias: String,
    pub alive: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GraveyardRecord {
    pub number: Seat,
    pub alias: String,
    /// Cause of death.
    pub cod: String,
    /// Day of death.
    pub dod: u32,
    pub role: String,
    pub will: String,
}

/// Persisted snapshot the host stores between rounds.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct GameState {
    #[serde(default)]
    pub day: u32,
    #[serde(default)]
    pub players: Vec<StatePlayer>,
    #[serde(default)]
    pub graveyard: Vec<GraveyardRecord>,
}

impl GameState {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(p) = self.players.iter().find(|p| !is_valid_seat(p.number)) {
            return Err(format!("state player '{}': invalid number {}", p.alias, p.number));
        }
        if let Some(r) = self.graveyard.iter().find(|r| !is_valid_seat(r.number)) {
            return Err(format!("graveyard record '{}': invalid number {}", r.alias, r.number));
        }
        Ok(())
    }
}
