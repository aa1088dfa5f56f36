use super::actor::{no_allies, plain_init, single_living_other, town_wins, Round};
use super::{Alignment, Role, RoleBehavior, UNKNOWN_KILL_REASON};
use crate::error::Result;
use crate::events::{GameEvent, GameEventGroup};
use crate::models::Seat;

pub const BEHAVIOR: RoleBehavior = RoleBehavior {
    role: Role::Doctor,
    alignment: Alignment::Town,
    tags: &["any_random", "town_random", "town_protective"],
    kill_reason: UNKNOWN_KILL_REASON,
    init: plain_init,
    find_allies: no_allies,
    find_possible_targets: single_living_other,
    action,
    check_for_win: town_wins,
};

fn action(round: &mut Round<'_>, seat: Seat) -> Result<()> {
    let Some(target) = round.roster[seat].first_target() else {
        return Ok(());
    };
    round.logger.info(format!("{} will attempt to heal {}", round.label(seat), round.label(target)));
    round.visit(seat, target);
    round.roster[target].doctors.push_back(seat);
    Ok(())
}

/// Called from the death protocol when `doctor` saves `target`.
pub fn revive(round: &mut Round<'_>, doctor: Seat, target: Seat) {
    round.logger.info(format!("{} revives {}", round.label(doctor), round.label(target)));

    let mut group = GameEventGroup::new("doctor_revive");
    group.push_event(GameEvent::private(
        "doctor_revive_success",
        &round.roster[doctor].id,
        "Your target was attacked last night, but you successfully revived them",
    ));
    group.push_event(GameEvent::private(
        "revive_by_doctor",
        &round.roster[target].id,
        "You were revived by a doctor. Rock on",
    ));
    round.events.push_group(group);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::actor::test_support::*;
    use crate::roles::MAFIA_KILL_REASON;

    #[test]
    fn test_heal_registers_doctor() {
        let mut table = Table::new(&[Role::Citizen, Role::Doctor]);
        assert_eq!(table.roster[2].possible_targets, vec![vec![1]]);

        table.act(2, vec![1]);
        assert_eq!(table.roster[1].doctors.iter().copied().collect::<Vec<_>>(), vec![2]);
        assert_eq!(table.roster[1].visitors, vec![2]);
        assert!(table.events.is_empty());
    }

    #[test]
    fn test_revival_restores_target() {
        let mut table = Table::new(&[Role::Citizen, Role::Doctor]);
        table.act(2, vec![1]);
        table.round().die(1, MAFIA_KILL_REASON, false);

        assert!(table.roster[1].alive);
        assert!(table.roster[1].cod.is_none());
        assert!(table.roster[1].doctors.is_empty());

        let events = table.events.flatten();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_id, "doctor_revive_success");
        assert_eq!(events[0].targets, vec!["user-2".to_string()]);
        assert_eq!(events[1].event_id, "revive_by_doctor");
        assert_eq!(events[1].targets, vec!["user-1".to_string()]);
    }

    #[test]
    fn test_one_doctor_per_death() {
        let mut table = Table::new(&[Role::Citizen, Role::Doctor]);
        table.act(2, vec![1]);
        table.round().die(1, MAFIA_KILL_REASON, false);
        table.round().die(1, MAFIA_KILL_REASON, false);

        assert!(!table.roster[1].alive);
        assert_eq!(table.roster[1].cod.as_deref(), Some(MAFIA_KILL_REASON));
    }
}
