//! Narrative event tree.
//!
//! A round produces one `root` group. Each acting actor contributes a nested
//! group named after its role action, which may itself nest sub-groups
//! (shootouts, revivals, kill results). The host routes every event to its
//! addressed player ids, or to everyone when addressed with [`BROADCAST`].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Addressee marker for events everyone receives.
pub const BROADCAST: &str = "*";

/// Client-side pacing hints, in seconds.
pub mod duration {
    pub const ZERO: u32 = 0;
    pub const MAFIA_KILL: u32 = 3;
    pub const SHOOTOUT: u32 = 3;
}

pub mod common_events {
    pub const INVALID_TARGET: &str = "invalid_target";
    pub const NIGHT_IMMUNE: &str = "night_immune";
    pub const KILLED_BY_MAFIA: &str = "killed_by_mafia";
    pub const VISITED_BY: &str = "visited_by";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GameEvent {
    pub event_id: String,
    pub targets: Vec<String>,
    pub message: String,
}

impl GameEvent {
    pub fn new(event_id: &str, targets: Vec<String>, message: &str) -> Self {
        Self { event_id: event_id.to_string(), targets, message: message.to_string() }
    }

    pub fn broadcast(event_id: &str, message: &str) -> Self {
        Self::new(event_id, vec![BROADCAST.to_string()], message)
    }

    pub fn private(event_id: &str, player_id: &str, message: &str) -> Self {
        Self::new(event_id, vec![player_id.to_string()], message)
    }

    pub fn is_broadcast(&self) -> bool {
        self.targets.iter().any(|t| t == BROADCAST)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum EventEntry {
    Group(GameEventGroup),
    Event(GameEvent),
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GameEventGroup {
    pub group_id: Option<String>,
    pub duration: u32,
    pub events: Vec<EventEntry>,
}

impl GameEventGroup {
    pub fn new(group_id: &str) -> Self {
        Self { group_id: Some(group_id.to_string()), duration: duration::ZERO, events: Vec::new() }
    }

    pub fn with_duration(mut self, duration: u32) -> Self {
        self.duration = duration;
        self
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(EventEntry::Event(event));
    }

    /// Nested groups add their pacing to the parent.
    pub fn push_group(&mut self, group: GameEventGroup) {
        self.duration += group.duration;
        self.events.push(EventEntry::Group(group));
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Empties the group for reuse, optionally renaming it.
    pub fn reset(&mut self, new_id: Option<&str>) -> &mut Self {
        self.events.clear();
        self.duration = duration::ZERO;
        if let Some(id) = new_id {
            self.group_id = Some(id.to_string());
        }
        self
    }

    /// Direct child lookup by group id or event id.
    pub fn get_by_id(&self, id: &str) -> Option<&EventEntry> {
        self.events.iter().find(|entry| match entry {
            EventEntry::Group(g) => g.group_id.as_deref() == Some(id),
            EventEntry::Event(e) => e.event_id == id,
        })
    }

    /// Depth-first iterator over every leaf event in the tree.
    pub fn flatten(&self) -> Vec<&GameEvent> {
        let mut out = Vec::new();
        self.collect_into(&mut out);
        out
    }

    fn collect_into<'a>(&'a self, out: &mut Vec<&'a GameEvent>) {
        for entry in &self.events {
            match entry {
                EventEntry::Group(g) => g.collect_into(out),
                EventEntry::Event(e) => out.push(e),
            }
        }
    }

    /// Events a given player receives, including broadcasts.
    pub fn events_for(&self, player_id: &str) -> Vec<&GameEvent> {
        self.flatten()
            .into_iter()
            .filter(|e| e.is_broadcast() || e.targets.iter().any(|t| t == player_id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_durations_accumulate() {
        let mut root = GameEventGroup::new("root");
        let mut action = GameEventGroup::new("mafioso_action");
        action.push_group(GameEventGroup::new("shootout").with_duration(duration::SHOOTOUT));
        action.push_group(
            GameEventGroup::new("mafioso_action_success").with_duration(duration::MAFIA_KILL),
        );
        root.push_group(action);

        assert_eq!(root.duration, 6);
        assert!(root.get_by_id("mafioso_action").is_some());
        assert!(root.get_by_id("shootout").is_none());
    }

    #[test]
    fn test_reset_clears_and_renames() {
        let mut group = GameEventGroup::new("action");
        group.push_event(GameEvent::broadcast("x", "y"));
        group.duration = 3;
        group.reset(Some("doctor_action"));

        assert!(group.is_empty());
        assert_eq!(group.duration, 0);
        assert_eq!(group.group_id.as_deref(), Some("doctor_action"));
    }

    #[test]
    fn test_events_for_includes_broadcasts() {
        let mut group = GameEventGroup::new("root");
        group.push_event(GameEvent::broadcast("noise", "You hear something"));
        group.push_event(GameEvent::private("note", "user-1", "Only for you"));
        group.push_event(GameEvent::private("other", "user-2", "Not for you"));

        let ids: Vec<_> = group.events_for("user-1").iter().map(|e| e.event_id.as_str()).collect();
        assert_eq!(ids, vec!["noise", "note"]);
    }

    #[test]
    fn test_dump_shape() {
        let mut group = GameEventGroup::new("root");
        group.push_event(GameEvent::broadcast("e", "m"));
        let value = serde_json::to_value(&group).unwrap();

        assert_eq!(value["groupId"], "root");
        assert_eq!(value["duration"], 0);
        assert_eq!(value["events"][0]["eventId"], "e");
        assert_eq!(value["events"][0]["targets"][0], "*");

        let back: GameEventGroup = serde_json::from_value(value).unwrap();
        assert_eq!(back, group);
    }
}
