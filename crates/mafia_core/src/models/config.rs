use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::de::{DeserializeOwned, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::fmt;

use super::MAX_PLAYERS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RoleSettings {
    /// Upper bound on how many seats the draft may give this role.
    pub max: u32,
    /// Relative selection weight in the draft.
    pub weight: f64,
    /// Role-specific knobs, parsed by the role itself.
    #[serde(default)]
    pub settings: BTreeMap<String, Value>,
}

impl RoleSettings {
    pub fn new(max: u32, weight: f64) -> Self {
        Self { max, weight, settings: BTreeMap::new() }
    }

    pub fn with_setting(mut self, key: &str, value: Value) -> Self {
        self.settings.insert(key.to_string(), value);
        self
    }

    /// Typed view of `settings`; unknown keys are ignored, missing keys take
    /// the target's serde defaults.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        parse_settings(&self.settings)
    }
}

/// Deserializes a role's opaque settings map into its typed form.
pub fn parse_settings<T: DeserializeOwned>(
    settings: &BTreeMap<String, Value>,
) -> Result<T, serde_json::Error> {
    let map: serde_json::Map<String, Value> =
        settings.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
    serde_json::from_value(Value::Object(map))
}

/// Role identifier -> settings, in the order the host wrote them.
///
/// Order matters: it is the candidate order the draft feeds into the
/// weighted choice, so two hosts sending the same JSON get the same roles.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RoleTable(Vec<(String, RoleSettings)>);

impl RoleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserting an existing role replaces its settings in place.
    pub fn insert(&mut self, role: &str, settings: RoleSettings) {
        match self.0.iter_mut().find(|(name, _)| name == role) {
            Some(entry) => entry.1 = settings,
            None => self.0.push((role.to_string(), settings)),
        }
    }

    pub fn with(mut self, role: &str, settings: RoleSettings) -> Self {
        self.insert(role, settings);
        self
    }

    pub fn get(&self, role: &str) -> Option<&RoleSettings> {
        self.0.iter().find(|(name, _)| name == role).map(|(_, s)| s)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RoleSettings)> {
        self.0.iter().map(|(name, s)| (name.as_str(), s))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for RoleTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k, v)))
    }
}

struct RoleTableVisitor;

impl<'de> Visitor<'de> for RoleTableVisitor {
    type Value = RoleTable;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of role name to role settings")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<RoleTable, A::Error> {
        let mut table = RoleTable::new();
        while let Some((role, settings)) = access.next_entry::<String, RoleSettings>()? {
            table.insert(&role, settings);
        }
        Ok(table)
    }
}

impl<'de> Deserialize<'de> for RoleTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RoleTableVisitor)
    }
}

impl JsonSchema for RoleTable {
    fn schema_name() -> String {
        "RoleTable".to_string()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        <BTreeMap<String, RoleSettings>>::json_schema(gen)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GameConfig {
    /// One eligibility tag per seat to fill, in seat-draft order.
    pub tags: Vec<String>,
    #[serde(default)]
    pub settings: BTreeMap<String, Value>,
    pub roles: RoleTable,
}

pub const STANDARD_TAGS: [&str; MAX_PLAYERS] = [
    // Town
    "town_protective",
    "town_killing",
    "town_random",
    "town_random",
    "town_random",
    "town_random",
    "town_random",
    "town_random",
    // Mafia
    "mafia_killing",
    "mafia_random",
    "mafia_random",
    // Neutral (no neutral roles yet; these fall back to the filler role)
    "neutral_random",
    "neutral_random",
    "neutral_random",
    // Any
    "any_random",
];

impl GameConfig {
    pub fn new(tags: Vec<String>, roles: RoleTable) -> Self {
        Self { tags, settings: BTreeMap::new(), roles }
    }

    /// The full 15-seat setup: 8 Town, 3 Mafia, 3 Neutral, 1 Any.
    pub fn standard() -> Self {
        let roles = RoleTable::new()
            .with("Citizen", RoleSettings::new(15, 1.0).with_setting("maxVests", json!(2)))
            .with("Doctor", RoleSettings::new(2, 2.0))
            .with("Bodyguard", RoleSettings::new(2, 1.0))
            .with("Godfather", RoleSettings::new(1, 2.0).with_setting("nightImmune", json!(2)))
            .with("Mafioso", RoleSettings::new(3, 1.0));

        Self::new(STANDARD_TAGS.iter().map(|t| t.to_string()).collect(), roles)
    }

    /// The standard setup truncated to the first `players` tags.
    pub fn for_players(players: usize) -> Self {
        let mut config = Self::standard();
        config.tags.truncate(players);
        config
    }

    pub fn role_settings(&self, role: &str) -> Option<&RoleSettings> {
        self.roles.get(role)
    }

    pub fn validate(&self) -> Result<(), String> {
        for (role, settings) in self.roles.iter() {
            if !settings.weight.is_finite() || settings.weight < 0.0 {
                return Err(format!(
                    "role '{}': weight must be a finite number >= 0, got {}",
                    role, settings.weight
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_table_preserves_json_order() {
        let config: GameConfig = serde_json::from_str(
            r#"{"tags": [], "roles": {
                "Mafioso": {"max": 1, "weight": 1},
                "Citizen": {"max": 2, "weight": 1},
                "Doctor": {"max": 1, "weight": 2}
            }}"#,
        )
        .unwrap();

        let names: Vec<_> = config.roles.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Mafioso", "Citizen", "Doctor"]);

        let out = serde_json::to_string(&config.roles).unwrap();
        assert!(out.find("Mafioso").unwrap() < out.find("Citizen").unwrap());
        assert!(out.find("Citizen").unwrap() < out.find("Doctor").unwrap());
    }

    #[test]
    fn test_duplicate_role_keeps_first_position() {
        let table: RoleTable = serde_json::from_str(
            r#"{"Doctor": {"max": 1, "weight": 1}, "Citizen": {"max": 1, "weight": 1},
                "Doctor": {"max": 5, "weight": 3}}"#,
        )
        .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.iter().next().map(|(n, s)| (n, s.max)), Some(("Doctor", 5)));
    }

    #[test]
    fn test_standard_config() {
        let config = GameConfig::standard();
        assert_eq!(config.tags.len(), 15);
        assert_eq!(config.roles.len(), 5);
        assert_eq!(config.role_settings("Godfather").map(|s| s.max), Some(1));
        assert!(config.validate().is_ok());

        let small = GameConfig::for_players(5);
        assert_eq!(small.tags, vec![
            "town_protective",
            "town_killing",
            "town_random",
            "town_random",
            "town_random"
        ]);
    }

    #[test]
    fn test_negative_weight_rejected() {
        let config = GameConfig::new(vec![], RoleTable::new().with("Doctor", RoleSettings::new(1, -1.0)));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_typed_settings_ignore_unknown_keys() {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Vests {
            #[serde(default)]
            max_vests: u32,
        }

        let settings = RoleSettings::new(1, 1.0)
            .with_setting("maxVests", json!(4))
            .with_setting("promotes", json!(false));
        let parsed: Vests = settings.parse().unwrap();
        assert_eq!(parsed.max_vests, 4);
    }
}
