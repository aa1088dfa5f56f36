use serde_json::Value;
use std::collections::BTreeMap;

use super::actor::{no_allies, single_living_other, town_wins, Actor, Round};
use super::{Alignment, Role, RoleBehavior, RoleState, UNKNOWN_KILL_REASON};
use crate::error::Result;
use crate::events::{duration, GameEvent, GameEventGroup};
use crate::models::Seat;

pub const BEHAVIOR: RoleBehavior = RoleBehavior {
    role: Role::Bodyguard,
    alignment: Alignment::Town,
    tags: &["any_random", "town_random", "town_protective", "town_killing"],
    kill_reason: UNKNOWN_KILL_REASON,
    init,
    find_allies: no_allies,
    find_possible_targets: single_living_other,
    action,
    check_for_win: town_wins,
};

pub const SHOOTOUT_DEATH: &str = "Died in a shootout";

fn init(actor: &mut Actor, _settings: &BTreeMap<String, Value>) -> Result<()> {
    actor.state = RoleState::Bodyguard { guarding: None };
    Ok(())
}

fn action(round: &mut Round<'_>, seat: Seat) -> Result<()> {
    let Some(target) = round.roster[seat].first_target() else {
        return Ok(());
    };
    round.logger.info(format!("{} will protect {}", round.label(seat), round.label(target)));
    round.visit(seat, target);
    round.roster[target].bodyguards.push_back(seat);
    round.roster[seat].state = RoleState::Bodyguard { guarding: Some(target) };
    Ok(())
}

fn guarding(round: &Round<'_>, guard: Seat) -> Option<Seat> {
    match round.roster[guard].state {
        RoleState::Bodyguard { guarding } => guarding,
        _ => None,
    }
}

/// `guard` intercepts `attacker`. Both die for good.
pub fn shootout(round: &mut Round<'_>, guard: Seat, attacker: Seat) {
    round.logger.info(format!("{} defends their target from {}", round.label(guard), round.label(attacker)));

    let mut group = GameEventGroup::new("shootout").with_duration(duration::SHOOTOUT);
    group.push_event(GameEvent::broadcast("bodyguard_shootout", "You hear sounds of a shootout"));
    if let Some(protected) = guarding(round, guard) {
        group.push_event(GameEvent::private(
            "bodyguard_protected",
            &round.roster[protected].id,
            "You were protected by a bodyguard",
        ));
    }
    group.push_event(GameEvent::private(
        "bodyguard_protected",
        &round.roster[attacker].id,
        "You were killed by the Bodyguard defending your target",
    ));
    group.push_event(GameEvent::private(
        "bodyguard_protected",
        &round.roster[guard].id,
        "You died defending your target",
    ));
    round.events.push_group(group);

    round.die(guard, SHOOTOUT_DEATH, true);
    round.die(attacker, SHOOTOUT_DEATH, true);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::BROADCAST;
    use crate::roles::actor::test_support::*;

    #[test]
    fn test_interception() {
        let mut table = Table::new(&[Role::Citizen, Role::Bodyguard, Role::Mafioso]);
        table.act(2, vec![1]);
        table.act(3, vec![1]);

        assert!(table.roster[1].alive);
        assert!(!table.roster[2].alive);
        assert!(!table.roster[3].alive);
        assert_eq!(table.roster[2].cod.as_deref(), Some(SHOOTOUT_DEATH));
        assert_eq!(table.roster[3].cod.as_deref(), Some(SHOOTOUT_DEATH));

        let events = table.events.flatten();
        assert_eq!(events.len(), 4);
        assert_eq!(events[0].targets, vec![BROADCAST.to_string()]);
        assert_eq!(events[1].targets, vec!["user-1".to_string()]);
        assert_eq!(events[2].targets, vec!["user-3".to_string()]);
        assert_eq!(events[3].targets, vec!["user-2".to_string()]);
        assert_eq!(table.events.duration, duration::SHOOTOUT);
    }

    #[test]
    fn test_shootout_ignores_doctors() {
        let mut table = Table::new(&[Role::Citizen, Role::Bodyguard, Role::Mafioso, Role::Doctor]);
        table.act(4, vec![2]);
        table.act(2, vec![1]);
        table.act(3, vec![1]);

        assert!(!table.roster[2].alive);
        assert!(table.events.flatten().iter().all(|e| e.event_id != "revive_by_doctor"));
    }

    #[test]
    fn test_one_guard_consumed_per_attack() {
        let mut table = Table::new(&[
            Role::Citizen,
            Role::Bodyguard,
            Role::Bodyguard,
            Role::Mafioso,
        ]);
        table.act(2, vec![1]);
        table.act(3, vec![1]);
        table.act(4, vec![1]);

        assert!(!table.roster[2].alive);
        assert!(table.roster[3].alive);
        assert_eq!(table.roster[1].bodyguards.iter().copied().collect::<Vec<_>>(), vec![3]);
    }
}
