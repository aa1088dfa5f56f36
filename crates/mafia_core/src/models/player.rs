use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{MAX_PLAYERS, MAX_TARGET_SLOTS};

/// Seat number, `1..=MAX_PLAYERS`.
pub type Seat = u8;

pub fn is_valid_seat(seat: Seat) -> bool {
    (1..=MAX_PLAYERS as Seat).contains(&seat)
}

/// Ally summary as exposed to the ally itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AllySummary {
    pub alias: String,
    pub number: Seat,
    pub role: String,
    pub alive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlayerInput {
    pub id: String,
    pub name: String,
    pub alias: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub number: Option<Seat>,
    #[serde(default = "default_alive")]
    pub alive: bool,
    /// Snapshot of the last computed target slots; informational on input.
    #[serde(default)]
    pub possible_targets: Vec<Vec<Seat>>,
    /// Seat numbers submitted for the coming resolution, one per slot.
    #[serde(default)]
    pub targets: Vec<Seat>,
    #[serde(default)]
    pub allies: Vec<AllySummary>,
    /// Opaque per-role state carried between rounds (e.g. `remainingVests`).
    #[serde(default)]
    pub role_actions: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub will: String,
    /// Cause of death carried over from a previous round.
    #[serde(default)]
    pub cod: Option<String>,
}

fn default_alive() -> bool {
    true
}

impl PlayerInput {
    pub fn new(id: &str, name: &str, alias: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            alias: alias.to_string(),
            role: None,
            number: None,
            alive: true,
            possible_targets: Vec::new(),
            targets: Vec::new(),
            allies: Vec::new(),
            role_actions: BTreeMap::new(),
            will: String::new(),
            cod: None,
        }
    }

    pub fn with_role(mut self, role: &str, number: Seat) -> Self {
        self.role = Some(role.to_string());
        self.number = Some(number);
        self
    }

    pub fn with_targets(mut self, targets: Vec<Seat>) -> Self {
        self.targets = targets;
        self
    }

    /// Schema checks: seat ranges and slot/target list bounds.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(number) = self.number {
            if !is_valid_seat(number) {
                return Err(format!(
                    "player '{}': number must be 1..={}, got {}",
                    self.id, MAX_PLAYERS, number
                ));
            }
        }
        if self.possible_targets.len() > MAX_TARGET_SLOTS {
            return Err(format!(
                "player '{}': at most {} possibleTargets slots, got {}",
                self.id,
                MAX_TARGET_SLOTS,
                self.possible_targets.len()
            ));
        }
        for slot in &self.possible_targets {
            check_seat_list(&self.id, "possibleTargets", slot)?;
        }
        check_seat_list(&self.id, "targets", &self.targets)?;
        for ally in &self.allies {
            if !is_valid_seat(ally.number) {
                return Err(format!(
                    "player '{}': ally number must be 1..={}, got {}",
                    self.id, MAX_PLAYERS, ally.number
                ));
            }
        }
        Ok(())
    }
}

fn check_seat_list(player_id: &str, field: &str, seats: &[Seat]) -> Result<(), String> {
    if seats.len() > MAX_PLAYERS {
        return Err(format!(
            "player '{}': {} holds at most {} entries, got {}",
            player_id,
            field,
            MAX_PLAYERS,
            seats.len()
        ));
    }
    if let Some(bad) = seats.iter().find(|s| !is_valid_seat(**s)) {
        return Err(format!(
            "player '{}': {} entries must be 1..={}, got {}",
            player_id, field, MAX_PLAYERS, bad
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_player_defaults() {
        let player: PlayerInput =
            serde_json::from_value(json!({"id": "u1", "name": "N", "alias": "A"})).unwrap();

        assert!(player.alive);
        assert!(player.role.is_none());
        assert!(player.targets.is_empty());
        assert!(player.role_actions.is_empty());
        assert!(player.validate().is_ok());
    }

    #[test]
    fn test_seat_out_of_range_rejected() {
        let mut player = PlayerInput::new("u1", "N", "A");
        player.number = Some(16);
        assert!(player.validate().is_err());

        player.number = Some(0);
        assert!(player.validate().is_err());

        player.number = Some(15);
        assert!(player.validate().is_ok());
    }

    #[test]
    fn test_target_bounds() {
        let player = PlayerInput::new("u1", "N", "A").with_targets(vec![0]);
        assert!(player.validate().is_err());

        let mut player = PlayerInput::new("u1", "N", "A");
        player.possible_targets = vec![vec![1], vec![2], vec![3]];
        assert!(player.validate().is_err());
    }

    #[test]
    fn test_camel_case_fields() {
        let player: PlayerInput = serde_json::from_value(json!({
            "id": "u1", "name": "N", "alias": "A",
            "possibleTargets": [[2, 3]],
            "roleActions": {"remainingVests": 1}
        }))
        .unwrap();
        assert_eq!(player.possible_targets, vec![vec![2, 3]]);
        assert_eq!(player.role_actions["remainingVests"], json!(1));
    }
}
