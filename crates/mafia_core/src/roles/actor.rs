//! Actors, the seat-indexed arena that owns them, and the shared
//! visit / kill / die protocol every role goes through.
//!
//! Actors never hold references to each other. Allies, visitors, guards and
//! healers are stored as seat numbers and resolved through [`Roster`].

use serde_json::Value;
use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::ops::{Index, IndexMut};

use super::{bodyguard, doctor, Alignment, Role, RoleState, UNKNOWN_KILL_REASON};
use crate::error::{EngineError, Result};
use crate::events::{common_events, GameEvent, GameEventGroup};
use crate::logger::EngineLogger;
use crate::models::{PlayerInput, Seat};
use crate::rng::EngineRng;

#[derive(Debug, Clone)]
pub struct Actor {
    pub id: String,
    pub name: String,
    pub alias: String,
    pub role: Role,
    pub alignment: Alignment,
    pub seat: Seat,
    pub alive: bool,
    pub allies: Vec<Seat>,
    /// One candidate list per target slot the role exposes.
    pub possible_targets: Vec<Vec<Seat>>,
    pub targets: Vec<Seat>,
    pub visitors: Vec<Seat>,
    pub visiting: Option<Seat>,
    /// Bodyguards protecting this actor tonight, in registration order.
    pub bodyguards: VecDeque<Seat>,
    /// Doctors healing this actor tonight, in registration order.
    pub doctors: VecDeque<Seat>,
    pub night_immune: bool,
    /// Cause of death; always set while `alive` is false.
    pub cod: Option<String>,
    pub will: String,
    pub role_actions: BTreeMap<String, Value>,
    pub state: RoleState,
}

impl Actor {
    /// Builds the runtime actor for `player` seated at `seat`, then lets the
    /// role apply its settings.
    pub fn from_player(
        player: &PlayerInput,
        seat: Seat,
        role: Role,
        settings: &BTreeMap<String, Value>,
    ) -> Result<Self> {
        let mut actor = Self {
            id: player.id.clone(),
            name: player.name.clone(),
            alias: player.alias.clone(),
            role,
            alignment: role.alignment(),
            seat,
            alive: player.alive,
            allies: Vec::new(),
            possible_targets: Vec::new(),
            targets: Vec::new(),
            visitors: Vec::new(),
            visiting: None,
            bodyguards: VecDeque::new(),
            doctors: VecDeque::new(),
            night_immune: false,
            cod: player.cod.clone().filter(|c| !c.is_empty()),
            will: player.will.clone(),
            role_actions: player.role_actions.clone(),
            state: RoleState::Plain,
        };
        (role.behavior().init)(&mut actor, settings)?;
        Ok(actor)
    }

    pub fn is_ally(&self, seat: Seat) -> bool {
        self.allies.contains(&seat)
    }

    pub fn clear_targets(&mut self) {
        self.targets.clear();
    }

    pub fn first_target(&self) -> Option<Seat> {
        self.targets.first().copied()
    }

    /// `roleActions` as persisted for the next round.
    pub fn dump_role_actions(&self) -> BTreeMap<String, Value> {
        match self.state {
            RoleState::Citizen { remaining_vests } => {
                let mut out = BTreeMap::new();
                out.insert("remainingVests".to_string(), Value::from(remaining_vests));
                out
            }
            _ => self.role_actions.clone(),
        }
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "|{}| {}({})", self.role, self.alias, self.seat)
    }
}

/// Arena of actors, indexed by seat number.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    actors: Vec<Actor>,
}

impl Roster {
    /// Seats must form the permutation `1..=N`.
    pub fn new(mut actors: Vec<Actor>) -> Result<Self> {
        actors.sort_by_key(|a| a.seat);
        for (idx, actor) in actors.iter().enumerate() {
            if actor.seat as usize != idx + 1 {
                return Err(EngineError::validation(
                    "Seat numbers must be a permutation of 1..N",
                    actors.iter().map(|a| format!("{} -> {}", a.id, a.seat)).collect(),
                ));
            }
        }
        Ok(Self { actors })
    }

    pub fn get(&self, seat: Seat) -> Option<&Actor> {
        (seat as usize).checked_sub(1).and_then(|idx| self.actors.get(idx))
    }

    pub fn get_mut(&mut self, seat: Seat) -> Option<&mut Actor> {
        (seat as usize).checked_sub(1).and_then(move |idx| self.actors.get_mut(idx))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Actor> {
        self.actors.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Actor> {
        self.actors.iter_mut()
    }

    pub fn seats(&self) -> Vec<Seat> {
        self.actors.iter().map(|a| a.seat).collect()
    }

    pub fn alive_seats(&self) -> Vec<Seat> {
        self.actors.iter().filter(|a| a.alive).map(|a| a.seat).collect()
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Recomputes allies and target slots for one actor.
    pub fn refresh(&mut self, seat: Seat) {
        let behavior = self[seat].role.behavior();
        let allies = (behavior.find_allies)(self, seat);
        let possible = (behavior.find_possible_targets)(self, seat);
        let actor = &mut self[seat];
        actor.allies = allies;
        actor.possible_targets = possible;
    }

    pub fn check_for_win(&self, seat: Seat, alive: &[Seat]) -> bool {
        (self[seat].role.behavior().check_for_win)(self, seat, alive)
    }
}

impl Index<Seat> for Roster {
    type Output = Actor;

    fn index(&self, seat: Seat) -> &Actor {
        &self.actors[seat as usize - 1]
    }
}

impl IndexMut<Seat> for Roster {
    fn index_mut(&mut self, seat: Seat) -> &mut Actor {
        &mut self.actors[seat as usize - 1]
    }
}

// ---------------------------------------------------------------------------
// Shared behaviors
// ---------------------------------------------------------------------------

pub fn plain_init(_actor: &mut Actor, _settings: &BTreeMap<String, Value>) -> Result<()> {
    Ok(())
}

pub fn no_allies(_roster: &Roster, _seat: Seat) -> Vec<Seat> {
    Vec::new()
}

/// Everyone sharing the actor's alignment, itself and the dead included.
pub fn same_alignment_allies(roster: &Roster, seat: Seat) -> Vec<Seat> {
    let alignment = roster[seat].alignment;
    roster.iter().filter(|a| a.alignment == alignment).map(|a| a.seat).collect()
}

/// A single slot holding every living actor except `seat`.
pub fn single_living_other(roster: &Roster, seat: Seat) -> Vec<Vec<Seat>> {
    vec![roster.iter().filter(|a| a.alive && a.seat != seat).map(|a| a.seat).collect()]
}

/// A single slot holding every living actor of another alignment.
pub fn single_living_enemy(roster: &Roster, seat: Seat) -> Vec<Vec<Seat>> {
    let me = &roster[seat];
    vec![roster
        .iter()
        .filter(|a| a.alive && a.alignment != me.alignment && a.seat != seat)
        .map(|a| a.seat)
        .collect()]
}

/// Town wins once no Mafia actor is left alive.
pub fn town_wins(roster: &Roster, _seat: Seat, alive: &[Seat]) -> bool {
    alive.iter().all(|s| roster[*s].alignment != Alignment::Mafia)
}

/// Mafia wins once every living actor belongs to its alliance.
pub fn mafia_wins(roster: &Roster, seat: Seat, alive: &[Seat]) -> bool {
    let me = &roster[seat];
    alive.iter().all(|s| me.is_ally(*s))
}

// ---------------------------------------------------------------------------
// Round protocol
// ---------------------------------------------------------------------------

/// Mutable view handed to role actions while a round resolves.
pub struct Round<'a> {
    pub roster: &'a mut Roster,
    /// Group collecting the events of the action currently executing.
    pub events: &'a mut GameEventGroup,
    pub logger: &'a mut EngineLogger,
    pub rng: &'a mut EngineRng,
}

impl<'a> Round<'a> {
    pub fn new(
        roster: &'a mut Roster,
        events: &'a mut GameEventGroup,
        logger: &'a mut EngineLogger,
        rng: &'a mut EngineRng,
    ) -> Self {
        Self { roster, events, logger, rng }
    }

    pub fn label(&self, seat: Seat) -> String {
        self.roster[seat].to_string()
    }

    pub fn visit(&mut self, visitor: Seat, target: Seat) {
        self.logger.info(format!("{} is visiting {}'s house", self.label(visitor), self.label(target)));
        self.roster[visitor].visiting = Some(target);
        self.roster[target].visitors.push(visitor);
    }

    /// Kill protocol.
    ///
    /// The killer visits the target. A living bodyguard on the target turns
    /// the attempt into a shootout (one bodyguard consumed per attempt). A
    /// night-immune target survives and is told so privately. Otherwise
    /// `on_success` runs and the target dies with the killer's kill reason.
    pub fn kill<S, F>(
        &mut self,
        killer: Seat,
        target: Seat,
        on_success: S,
        on_fail: F,
        true_death: bool,
    ) where
        S: FnOnce(&mut Round<'_>),
        F: FnOnce(&mut Round<'_>),
    {
        self.logger.info(format!("{} is attempting to kill {}", self.label(killer), self.label(target)));
        self.visit(killer, target);

        if let Some(guard) = self.next_living_bodyguard(target) {
            bodyguard::shootout(self, guard, killer);
            return;
        }

        if self.roster[target].night_immune {
            self.logger.info(format!(
                "{} failed to kill {} because they are night-immune",
                self.label(killer),
                self.label(target)
            ));
            on_fail(self);

            let mut survived = GameEventGroup::new(common_events::NIGHT_IMMUNE);
            survived.push_event(GameEvent::private(
                common_events::NIGHT_IMMUNE,
                &self.roster[target].id,
                "You were attacked tonight but survived due to Night Immunity",
            ));
            self.events.push_group(survived);
            return;
        }

        on_success(self);
        let reason = self.roster[killer].role.behavior().kill_reason;
        self.die(target, reason, true_death);
    }

    fn next_living_bodyguard(&mut self, target: Seat) -> Option<Seat> {
        while let Some(guard) = self.roster[target].bodyguards.pop_front() {
            if self.roster[guard].alive {
                return Some(guard);
            }
        }
        None
    }

    /// Death protocol. Unless `true_death`, the first living doctor healing
    /// the actor revives them and no cause of death is recorded.
    pub fn die(&mut self, seat: Seat, reason: &str, true_death: bool) {
        let living_doctors: VecDeque<Seat> = self.roster[seat]
            .doctors
            .iter()
            .copied()
            .filter(|d| self.roster[*d].alive)
            .collect();
        self.roster[seat].doctors = living_doctors;
        self.roster[seat].alive = false;

        if !true_death {
            if let Some(doc) = self.roster[seat].doctors.pop_front() {
                doctor::revive(self, doc, seat);
                self.roster[seat].alive = true;
                return;
            }
        }

        let reason = if reason.is_empty() { UNKNOWN_KILL_REASON } else { reason };
        self.roster[seat].cod = Some(reason.to_string());
        self.logger.info(format!("{} died. Cause of death: {}", self.label(seat), reason));
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::roles::MAFIA_KILL_REASON;

    #[test]
    fn test_roster_rejects_gaps() {
        let actors = vec![actor(Role::Citizen, 1), actor(Role::Doctor, 3)];
        assert!(Roster::new(actors).is_err());
    }

    #[test]
    fn test_roster_sorts_by_seat() {
        let actors = vec![actor(Role::Doctor, 2), actor(Role::Citizen, 1)];
        let roster = Roster::new(actors).unwrap();
        assert_eq!(roster[1].role, Role::Citizen);
        assert_eq!(roster[2].role, Role::Doctor);
        assert!(roster.get(0).is_none());
        assert!(roster.get(3).is_none());
    }

    #[test]
    fn test_display() {
        let a = actor(Role::Mafioso, 3);
        assert_eq!(a.to_string(), "|Mafioso| test_mafioso_3(3)");
    }

    #[test]
    fn test_mafia_allies_include_self() {
        let r = roster(&[Role::Citizen, Role::Godfather, Role::Mafioso]);
        assert_eq!(r[2].allies, vec![2, 3]);
        assert_eq!(r[3].allies, vec![2, 3]);
        assert!(r[1].allies.is_empty());
    }

    #[test]
    fn test_visit_records_both_sides() {
        let mut table = Table::new(&[Role::Citizen, Role::Doctor]);
        table.round().visit(2, 1);
        assert_eq!(table.roster[2].visiting, Some(1));
        assert_eq!(table.roster[1].visitors, vec![2]);
    }

    #[test]
    fn test_die_sets_cause() {
        let mut table = Table::new(&[Role::Citizen, Role::Mafioso]);
        table.round().die(1, "They were lynched", true);
        assert!(!table.roster[1].alive);
        assert_eq!(table.roster[1].cod.as_deref(), Some("They were lynched"));
    }

    #[test]
    fn test_true_death_ignores_doctor() {
        let mut table = Table::new(&[Role::Citizen, Role::Doctor]);
        table.roster[1].doctors.push_back(2);
        table.round().die(1, "They were lynched", true);
        assert!(!table.roster[1].alive);
        assert!(table.events.is_empty());
    }

    #[test]
    fn test_dead_doctor_cannot_revive() {
        let mut table = Table::new(&[Role::Citizen, Role::Doctor]);
        table.roster[1].doctors.push_back(2);
        table.roster[2].alive = false;
        table.roster[2].cod = Some("x".to_string());
        table.round().die(1, MAFIA_KILL_REASON, false);
        assert!(!table.roster[1].alive);
        assert_eq!(table.roster[1].cod.as_deref(), Some(MAFIA_KILL_REASON));
    }

    #[test]
    fn test_night_immune_target_survives() {
        let mut table = Table::new(&[Role::Citizen, Role::Mafioso]);
        table.roster[1].night_immune = true;
        table.act(2, vec![1]);

        assert!(table.roster[1].alive);
        let immune: Vec<_> = table
            .events
            .flatten()
            .into_iter()
            .filter(|e| e.event_id == common_events::NIGHT_IMMUNE)
            .collect();
        assert_eq!(immune.len(), 1);
        assert_eq!(immune[0].targets, vec!["user-1".to_string()]);
    }

    #[test]
    fn test_win_helpers() {
        let r = roster(&[Role::Citizen, Role::Doctor, Role::Mafioso]);
        assert!(!town_wins(&r, 1, &[1, 2, 3]));
        assert!(town_wins(&r, 1, &[1, 2]));
        assert!(mafia_wins(&r, 3, &[3]));
        assert!(!mafia_wins(&r, 3, &[2, 3]));
    }
}
