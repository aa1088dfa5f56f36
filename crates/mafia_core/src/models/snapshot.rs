use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::player::{AllySummary, Seat};
use crate::roles::Alignment;

/// Per-actor dump: public fields plus the private view (role, allies,
/// target slots) only the owning player should see.
///
/// The shape is a superset of [`super::PlayerInput`], so a host can feed the
/// dump straight back into the next `loadGame`/`resolveGame` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActorState {
    pub id: String,
    pub name: String,
    pub alias: String,
    pub role: String,
    pub alignment: Alignment,
    pub number: Seat,
    pub alive: bool,
    pub cod: Option<String>,
    pub will: String,
    pub possible_targets: Vec<Vec<Seat>>,
    pub targets: Vec<Seat>,
    pub allies: Vec<AllySummary>,
    pub role_actions: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct WinnerSummary {
    pub id: String,
    pub name: String,
    pub alias: String,
    pub number: Seat,
    pub role: String,
    pub alignment: Alignment,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PlayerInput;
    use serde_json::json;

    #[test]
    fn test_dump_feeds_back_as_player() {
        let dump = ActorState {
            id: "user-1".to_string(),
            name: "UserName1".to_string(),
            alias: "UserAlias1".to_string(),
            role: "Citizen".to_string(),
            alignment: Alignment::Town,
            number: 2,
            alive: false,
            cod: Some("They were lynched".to_string()),
            will: "Trust nobody".to_string(),
            possible_targets: vec![vec![2]],
            targets: vec![],
            allies: vec![],
            role_actions: BTreeMap::from([("remainingVests".to_string(), json!(1))]),
        };

        let value = serde_json::to_value(&dump).unwrap();
        assert_eq!(value["alignment"], "Town");
        assert_eq!(value["possibleTargets"], json!([[2]]));

        let player: PlayerInput = serde_json::from_value(value).unwrap();
        assert_eq!(player.role.as_deref(), Some("Citizen"));
        assert_eq!(player.number, Some(2));
        assert!(!player.alive);
        assert_eq!(player.cod.as_deref(), Some("They were lynched"));
        assert_eq!(player.role_actions["remainingVests"], json!(1));
    }
}
