//! Role catalog.
//!
//! Roles form a closed set. Each one is described by a static
//! [`RoleBehavior`] record (alignment, draft tags, target discovery, action,
//! win check) and the engine dispatches through that record instead of
//! through per-role types. [`ROLE_LIST`] is also the canonical resolution
//! order: support roles register before killing roles act.

pub mod actor;
pub mod bodyguard;
pub mod citizen;
pub mod doctor;
pub mod godfather;
pub mod mafioso;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{EngineError, Result};
use crate::models::Seat;

pub use actor::{Actor, Roster, Round};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Alignment {
    Town,
    Mafia,
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Alignment::Town => write!(f, "Town"),
            Alignment::Mafia => write!(f, "Mafia"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    Citizen,
    Doctor,
    Bodyguard,
    Godfather,
    Mafioso,
}

/// Per-role mutable state that does not fit the common actor fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleState {
    Plain,
    Citizen { remaining_vests: u32 },
    Bodyguard { guarding: Option<Seat> },
}

/// Behavior record for one role.
pub struct RoleBehavior {
    pub role: Role,
    pub alignment: Alignment,
    /// Draft eligibility labels. A role is also eligible for a tag equal to
    /// its own name.
    pub tags: &'static [&'static str],
    /// Cause-of-death text given to this role's victims.
    pub kill_reason: &'static str,
    /// Applies role settings and carried-over `roleActions` to a fresh actor.
    pub init: fn(&mut Actor, &BTreeMap<String, Value>) -> Result<()>,
    pub find_allies: fn(&Roster, Seat) -> Vec<Seat>,
    pub find_possible_targets: fn(&Roster, Seat) -> Vec<Vec<Seat>>,
    pub action: fn(&mut Round<'_>, Seat) -> Result<()>,
    pub check_for_win: fn(&Roster, Seat, &[Seat]) -> bool,
}

pub const UNKNOWN_KILL_REASON: &str = "How they died is unknown";
pub const MAFIA_KILL_REASON: &str = "They were found riddled with bullets";

/// Canonical order; also the priority order used during resolution.
pub static ROLE_LIST: [RoleBehavior; 5] = [
    citizen::BEHAVIOR,
    doctor::BEHAVIOR,
    bodyguard::BEHAVIOR,
    godfather::BEHAVIOR,
    mafioso::BEHAVIOR,
];

/// Role given to any draft slot no eligible role can fill.
pub const FILLER_ROLE: Role = Role::Citizen;

impl Role {
    pub const ALL: [Role; 5] =
        [Role::Citizen, Role::Doctor, Role::Bodyguard, Role::Godfather, Role::Mafioso];

    pub fn name(&self) -> &'static str {
        match self {
            Role::Citizen => "Citizen",
            Role::Doctor => "Doctor",
            Role::Bodyguard => "Bodyguard",
            Role::Godfather => "Godfather",
            Role::Mafioso => "Mafioso",
        }
    }

    pub fn from_name(name: &str) -> Result<Role> {
        Role::ALL
            .iter()
            .copied()
            .find(|role| role.name() == name)
            .ok_or_else(|| EngineError::UnknownRole(name.to_string()))
    }

    /// Position in [`ROLE_LIST`].
    pub fn priority(&self) -> usize {
        match self {
            Role::Citizen => 0,
            Role::Doctor => 1,
            Role::Bodyguard => 2,
            Role::Godfather => 3,
            Role::Mafioso => 4,
        }
    }

    pub fn behavior(&self) -> &'static RoleBehavior {
        &ROLE_LIST[self.priority()]
    }

    pub fn alignment(&self) -> Alignment {
        self.behavior().alignment
    }

    pub fn tags(&self) -> &'static [&'static str] {
        self.behavior().tags
    }

    /// Id of the event group an action of this role is collected under.
    pub fn action_group_id(&self) -> String {
        format!("{}_action", self.name().to_lowercase())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Draft tags declared by `role_name`; unknown roles only match themselves.
pub fn tags_for(role_name: &str) -> &'static [&'static str] {
    Role::from_name(role_name).map(|role| role.tags()).unwrap_or(&[])
}

/// Whether the role named `role_name` may fill a draft slot labelled `tag`.
pub fn matches_tag(role_name: &str, tag: &str) -> bool {
    tags_for(role_name).contains(&tag) || role_name == tag
}
