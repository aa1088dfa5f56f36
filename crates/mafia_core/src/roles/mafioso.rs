use super::actor::{mafia_wins, plain_init, same_alignment_allies, single_living_enemy, Round};
use super::{Alignment, Role, RoleBehavior, MAFIA_KILL_REASON};
use crate::error::Result;
use crate::events::{common_events, duration, GameEvent, GameEventGroup};
use crate::models::Seat;

pub const BEHAVIOR: RoleBehavior = RoleBehavior {
    role: Role::Mafioso,
    alignment: Alignment::Mafia,
    tags: &["any_random", "mafia_random", "mafia_killing"],
    kill_reason: MAFIA_KILL_REASON,
    init: plain_init,
    find_allies: same_alignment_allies,
    find_possible_targets: single_living_enemy,
    action,
    check_for_win: mafia_wins,
};

/// Narration for a Mafia hit, keyed by the acting role (`mafioso`,
/// `godfather`) and the prefix of its broadcast event ids (`mafia`,
/// `godfather`).
pub(crate) struct KillNarration {
    pub group_prefix: &'static str,
    pub event_prefix: &'static str,
}

impl KillNarration {
    pub fn success(&self, round: &mut Round<'_>, target: Seat) {
        let mut group = GameEventGroup::new(&format!("{}_action_success", self.group_prefix))
            .with_duration(duration::MAFIA_KILL);
        group.push_event(GameEvent::broadcast(
            &format!("{}_kill_success", self.event_prefix),
            "There are sounds of shots in the streets",
        ));
        group.push_event(GameEvent::private(
            common_events::KILLED_BY_MAFIA,
            &round.roster[target].id,
            "You were killed by a member of the Mafia",
        ));
        round.events.push_group(group);
    }

    pub fn fail(&self, round: &mut Round<'_>) {
        let mut group = GameEventGroup::new(&format!("{}_action_fail", self.group_prefix))
            .with_duration(duration::MAFIA_KILL);
        group.push_event(GameEvent::broadcast(&format!("{}_kill_fail", self.event_prefix), ""));
        round.events.push_group(group);
    }
}

const NARRATION: KillNarration = KillNarration { group_prefix: "mafioso", event_prefix: "mafia" };

fn action(round: &mut Round<'_>, seat: Seat) -> Result<()> {
    let Some(target) = round.roster[seat].first_target() else {
        return Ok(());
    };

    // One hit per night: every Mafioso in the family stands down.
    let brothers: Vec<Seat> = round.roster[seat]
        .allies
        .iter()
        .copied()
        .filter(|s| round.roster[*s].role == Role::Mafioso)
        .collect();
    for brother in brothers {
        round.roster[brother].clear_targets();
    }

    round.kill(
        seat,
        target,
        |round: &mut Round<'_>| NARRATION.success(round, target),
        |round: &mut Round<'_>| NARRATION.fail(round),
        false,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::actor::test_support::*;

    #[test]
    fn test_targets_exclude_family() {
        let table = Table::new(&[Role::Citizen, Role::Godfather, Role::Mafioso, Role::Doctor]);
        assert_eq!(table.roster[3].possible_targets, vec![vec![1, 4]]);
    }

    #[test]
    fn test_successful_kill() {
        let mut table = Table::new(&[Role::Citizen, Role::Mafioso]);
        table.act(2, vec![1]);

        assert!(!table.roster[1].alive);
        assert_eq!(table.roster[1].cod.as_deref(), Some(MAFIA_KILL_REASON));
        assert!(table.events.get_by_id("mafioso_action_success").is_some());
        assert_eq!(table.events.duration, duration::MAFIA_KILL);

        let ids: Vec<_> = table.events.events_for("user-1").iter().map(|e| e.event_id.clone()).collect();
        assert_eq!(ids, vec!["mafia_kill_success", common_events::KILLED_BY_MAFIA]);
    }

    #[test]
    fn test_failed_kill_on_immune_target() {
        let mut table = Table::new(&[Role::Citizen, Role::Mafioso]);
        table.roster[1].night_immune = true;
        table.act(2, vec![1]);

        assert!(table.roster[1].alive);
        assert!(table.events.get_by_id("mafioso_action_fail").is_some());
        assert!(table.events.get_by_id("mafioso_action_success").is_none());
    }

    #[test]
    fn test_brothers_stand_down() {
        let mut table = Table::new(&[Role::Citizen, Role::Mafioso, Role::Mafioso, Role::Doctor]);
        table.roster[3].targets = vec![4];
        table.act(2, vec![1]);

        assert!(table.roster[3].targets.is_empty());
        assert!(table.roster[2].targets.is_empty());
        assert!(table.roster[4].alive);
        assert!(!table.roster[1].alive);
    }
}
