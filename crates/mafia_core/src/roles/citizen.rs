use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

use super::actor::{no_allies, town_wins, Actor, Roster, Round};
use super::{Alignment, Role, RoleBehavior, RoleState, UNKNOWN_KILL_REASON};
use crate::error::{EngineError, Result};
use crate::models::config::parse_settings;
use crate::models::Seat;

pub const BEHAVIOR: RoleBehavior = RoleBehavior {
    role: Role::Citizen,
    alignment: Alignment::Town,
    tags: &["any_random", "town_random", "town_government"],
    kill_reason: UNKNOWN_KILL_REASON,
    init,
    find_allies: no_allies,
    find_possible_targets,
    action,
    check_for_win,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CitizenSettings {
    #[serde(default = "default_max_vests")]
    max_vests: u32,
}

fn default_max_vests() -> u32 {
    2
}

fn init(actor: &mut Actor, settings: &BTreeMap<String, Value>) -> Result<()> {
    let parsed: CitizenSettings = parse_settings(settings)
        .map_err(|e| EngineError::validation("Invalid Citizen settings", vec![e.to_string()]))?;

    let remaining_vests = actor
        .role_actions
        .get("remainingVests")
        .and_then(Value::as_f64)
        .map(|v| v.clamp(0.0, u32::MAX as f64) as u32)
        .unwrap_or(parsed.max_vests);
    actor.state = RoleState::Citizen { remaining_vests };
    Ok(())
}

pub fn remaining_vests(actor: &Actor) -> u32 {
    match actor.state {
        RoleState::Citizen { remaining_vests } => remaining_vests,
        _ => 0,
    }
}

/// A self-only slot while vests remain, otherwise nothing.
fn find_possible_targets(roster: &Roster, seat: Seat) -> Vec<Vec<Seat>> {
    if remaining_vests(&roster[seat]) > 0 {
        vec![vec![seat]]
    } else {
        Vec::new()
    }
}

fn action(round: &mut Round<'_>, seat: Seat) -> Result<()> {
    let left = remaining_vests(&round.roster[seat]);
    if left == 0 {
        round.logger.critical(format!("{} tried to use vest but has 0 remaining", round.label(seat)));
        return Ok(());
    }
    let left = left - 1;
    round.roster[seat].state = RoleState::Citizen { remaining_vests: left };

    let Some(target) = round.roster[seat].first_target() else {
        return Ok(());
    };
    round.roster[target].night_immune = true;

    let on = if target == seat { "self".to_string() } else { round.label(target) };
    round.logger.info(format!("{} used vest on {}. {} remaining", round.label(seat), on, left));
    Ok(())
}

/// Town win, or a head-to-head between two survivors where one is a Citizen.
fn check_for_win(roster: &Roster, seat: Seat, alive: &[Seat]) -> bool {
    if town_wins(roster, seat, alive) {
        return true;
    }
    alive.len() == 2 && alive.iter().any(|s| roster[*s].role == Role::Citizen)
}
