use super::Game;
use crate::error::{EngineError, Result};
use crate::events::GameEventGroup;
use crate::models::Seat;
use crate::roles::Round;

pub const LYNCH_REASON: &str = "They were lynched";

impl Game {
    /// Resolves one night.
    ///
    /// Advances the day, recomputes allies and target slots for the living,
    /// drops stale submissions, then runs every action in role priority
    /// order. Each action's events land in their own group under the root.
    pub fn resolve(&mut self) -> Result<()> {
        self.logger.info("--- Resolving all player actions ---");
        self.day = self.day.checked_add(1).ok_or_else(|| {
            EngineError::validation("Day counter exhausted", vec![format!("day {} cannot advance", self.day)])
        })?;
        self.refresh_alive();

        let mut order = self.roster.seats();
        order.sort_by_key(|s| self.roster[*s].role.priority());

        for &seat in &order {
            self.validate_targets(seat);
        }

        let mut action_events = GameEventGroup::new("action");
        for &seat in &order {
            let actor = &self.roster[seat];
            if actor.targets.is_empty() || !actor.alive {
                continue;
            }
            let role = actor.role;
            let targets = self.target_labels(seat);
            self.logger.info(format!("{} is targetting {}", self.roster[seat], targets));

            action_events.reset(Some(&role.action_group_id()));
            let mut round =
                Round::new(&mut self.roster, &mut action_events, &mut self.logger, &mut self.rng);
            (role.behavior().action)(&mut round, seat)?;

            if !action_events.is_empty() {
                self.events.push_group(action_events.clone());
            }
        }

        for actor in self.roster.iter_mut() {
            actor.clear_targets();
        }
        Ok(())
    }

    fn target_labels(&self, seat: Seat) -> String {
        self.roster[seat]
            .targets
            .iter()
            .map(|t| self.roster[*t].to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Clears `seat`'s targets if any of them left its slot.
    fn validate_targets(&mut self, seat: Seat) {
        let actor = &self.roster[seat];
        if actor.targets.is_empty() {
            return;
        }

        let stale = if actor.possible_targets.is_empty() {
            Some(format!("{:?}", actor.targets))
        } else {
            actor
                .targets
                .iter()
                .enumerate()
                .find(|(slot, target)| {
                    !actor.possible_targets.get(*slot).is_some_and(|options| options.contains(*target))
                })
                .map(|(_, target)| target.to_string())
        };

        if let Some(stale) = stale {
            self.logger.critical(format!("{} invalid targets ({})", self.roster[seat], stale));
            self.logger.info("Clearing targets");
            self.roster[seat].clear_targets();
        }
    }

    /// Seats of every actor whose win condition holds against the living.
    /// Several factions may win at once.
    pub fn check_for_win(&mut self) -> Vec<Seat> {
        self.logger.info("--- Checking for win conditions ---");
        let alive = self.roster.alive_seats();
        let winners: Vec<Seat> = self
            .roster
            .seats()
            .into_iter()
            .filter(|s| self.roster.check_for_win(*s, &alive))
            .collect();

        if winners.is_empty() {
            self.logger.info("No winners found");
        } else {
            let names: Vec<&str> = winners.iter().map(|s| self.roster[*s].alias.as_str()).collect();
            self.logger.info(format!("Winners: {}", names.join(", ")));
        }
        winners
    }

    /// Day elimination. Lynched players cannot be revived.
    pub fn lynch(&mut self, seat: Seat) -> Result<()> {
        if self.roster.get(seat).is_none() {
            return Err(EngineError::ActorNotFound { number: seat });
        }
        self.logger.info(format!("{} was lynched", self.roster[seat]));

        let mut lynch_events = GameEventGroup::new("lynch");
        let mut round =
            Round::new(&mut self.roster, &mut lynch_events, &mut self.logger, &mut self.rng);
        round.die(seat, LYNCH_REASON, true);
        if !lynch_events.is_empty() {
            self.events.push_group(lynch_events);
        }
        Ok(())
    }
}
