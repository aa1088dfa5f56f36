use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

use super::actor::{mafia_wins, same_alignment_allies, single_living_enemy, Actor, Round};
use super::mafioso::KillNarration;
use super::{Alignment, Role, RoleBehavior, MAFIA_KILL_REASON};
use crate::error::{EngineError, Result};
use crate::events::{GameEvent, GameEventGroup};
use crate::models::config::parse_settings;
use crate::models::Seat;

pub const BEHAVIOR: RoleBehavior = RoleBehavior {
    role: Role::Godfather,
    alignment: Alignment::Mafia,
    tags: &["any_random"],
    kill_reason: MAFIA_KILL_REASON,
    init,
    find_allies: same_alignment_allies,
    find_possible_targets: single_living_enemy,
    action,
    check_for_win: mafia_wins,
};

const NARRATION: KillNarration = KillNarration { group_prefix: "godfather", event_prefix: "godfather" };

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GodfatherSettings {
    #[serde(default = "default_night_immune")]
    night_immune: u32,
}

fn default_night_immune() -> u32 {
    2
}

fn init(actor: &mut Actor, settings: &BTreeMap<String, Value>) -> Result<()> {
    let parsed: GodfatherSettings = parse_settings(settings)
        .map_err(|e| EngineError::validation("Invalid Godfather settings", vec![e.to_string()]))?;
    actor.night_immune = parsed.night_immune > 0;
    Ok(())
}

/// Hands the hit to a living Mafioso when the family has one, otherwise
/// pulls the trigger personally.
fn action(round: &mut Round<'_>, seat: Seat) -> Result<()> {
    let Some(target) = round.roster[seat].first_target() else {
        return Ok(());
    };

    let proxies: Vec<Seat> = round.roster[seat]
        .allies
        .iter()
        .copied()
        .filter(|s| round.roster[*s].role == Role::Mafioso && round.roster[*s].alive)
        .collect();

    if proxies.is_empty() {
        round.kill(
            seat,
            target,
            |round: &mut Round<'_>| NARRATION.success(round, target),
            |round: &mut Round<'_>| NARRATION.fail(round),
            false,
        );
        return Ok(());
    }

    let proxy = *round.rng.choice(&proxies)?;
    round.roster[proxy].targets = round.roster[seat].targets.clone();

    let family: Vec<String> =
        round.roster[seat].allies.iter().map(|s| round.roster[*s].id.clone()).collect();
    let mut group = GameEventGroup::new("godfather_proxy");
    group.push_event(GameEvent::new(
        "godfather_proxy_choice",
        family,
        &format!("The Godfather has chosen {} to carry out the hit", round.roster[proxy].alias),
    ));
    round.logger.info(format!("{} has chosen {} to act as a proxy", round.label(seat), round.label(proxy)));
    round.events.push_group(group);
    Ok(())
}
