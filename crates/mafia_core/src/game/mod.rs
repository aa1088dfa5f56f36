//! Game session: one roster of actors living for a single engine call.
//!
//! A session is built either from a fresh draft ([`Game::new`]) or from a
//! persisted snapshot with known roles ([`Game::load`]). Resolution, lynching
//! and the win check live in [`resolution`].

mod resolution;

pub use resolution::LYNCH_REASON;

use crate::assignment::allocate_roles;
use crate::error::{EngineError, Result};
use crate::events::GameEventGroup;
use crate::logger::EngineLogger;
use crate::models::{
    ActorState, AllySummary, GameConfig, GameState, GraveyardRecord, PlayerInput, Seat,
    StatePlayer, WinnerSummary,
};
use crate::rng::EngineRng;
use crate::roles::{Actor, Role, Roster};

pub const UNKNOWN_CAUSE: &str = "Unknown";

pub struct Game {
    day: u32,
    roster: Roster,
    /// Root of this call's event tree.
    events: GameEventGroup,
    /// Graveyard as persisted before this call.
    graveyard: Vec<GraveyardRecord>,
    logger: EngineLogger,
    rng: EngineRng,
}

impl Game {
    fn build(
        day: u32,
        players: &[PlayerInput],
        config: &GameConfig,
        graveyard: Vec<GraveyardRecord>,
        mut logger: EngineLogger,
        rng: EngineRng,
    ) -> Result<Self> {
        logger.info("Importing required roles and instantiating actors");

        let mut actors = Vec::with_capacity(players.len());
        for player in players {
            let role_name = player
                .role
                .as_deref()
                .ok_or_else(|| EngineError::MissingRole { player_id: player.id.clone() })?;
            let seat = player
                .number
                .ok_or_else(|| EngineError::MissingSeat { player_id: player.id.clone() })?;
            let role = Role::from_name(role_name)?;
            let settings =
                config.role_settings(role_name).map(|s| s.settings.clone()).unwrap_or_default();

            let mut actor = Actor::from_player(player, seat, role, &settings)?;
            if !actor.alive && actor.cod.is_none() {
                let cod = graveyard
                    .iter()
                    .find(|r| r.number == seat)
                    .map(|r| r.cod.clone())
                    .unwrap_or_else(|| UNKNOWN_CAUSE.to_string());
                actor.cod = Some(cod);
            }
            actors.push(actor);
        }

        let mut game = Self {
            day,
            roster: Roster::new(actors)?,
            events: GameEventGroup::new("root"),
            graveyard,
            logger,
            rng,
        };
        game.refresh_alive();
        Ok(game)
    }

    /// Drafts roles, seats the table and starts on day 1.
    pub fn new(
        players: &[PlayerInput],
        config: &GameConfig,
        mut logger: EngineLogger,
        mut rng: EngineRng,
    ) -> Result<Self> {
        logger.info("--- Creating a new Game ---");
        logger.info(format!("Players: {}", serde_json::to_string(players)?));

        let seated = allocate_roles(players, config, &mut logger, &mut rng)?;
        Self::build(1, &seated, config, Vec::new(), logger, rng)
    }

    /// Rehydrates a game whose roles and seats are already known, and applies
    /// each player's submitted targets.
    pub fn load(
        players: &[PlayerInput],
        config: &GameConfig,
        state: &GameState,
        mut logger: EngineLogger,
        rng: EngineRng,
    ) -> Result<Self> {
        logger.info("--- Loading Game ---");
        logger.info(format!("Players: {}", serde_json::to_string(players)?));
        for player in players {
            let label = format!("  |-> {} ({}):", player.alias, player.name);
            let role = player.role.as_deref().unwrap_or("Unknown");
            let dead = if player.alive { "" } else { "(DEAD)" };
            logger.info(format!("{:<40} {} {}", label, role, dead));
        }

        let mut game = Self::build(state.day, players, config, state.graveyard.clone(), logger, rng)?;
        game.apply_targets(players);
        Ok(game)
    }

    /// A submission naming a seat nobody sits in is dropped whole.
    fn apply_targets(&mut self, players: &[PlayerInput]) {
        for player in players {
            let Some(seat) = player.number else { continue };
            if let Some(bad) = player.targets.iter().find(|t| self.roster.get(**t).is_none()) {
                self.logger.critical(format!(
                    "{} submitted unknown target seat {}",
                    self.roster[seat], bad
                ));
                self.roster[seat].clear_targets();
                continue;
            }
            self.roster[seat].targets = player.targets.clone();
        }
    }

    /// Allies and target slots are only recomputed for the living.
    pub(crate) fn refresh_alive(&mut self) {
        for seat in self.roster.alive_seats() {
            self.roster.refresh(seat);
        }
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn events(&self) -> &GameEventGroup {
        &self.events
    }

    pub fn logger(&self) -> &EngineLogger {
        &self.logger
    }

    pub fn seed(&self) -> u32 {
        self.rng.seed()
    }

    /// Persisted graveyard plus everyone who died and is not yet recorded.
    pub fn graveyard(&self) -> Vec<GraveyardRecord> {
        let mut records = self.graveyard.clone();
        for actor in self.roster.iter().filter(|a| !a.alive) {
            if records.iter().any(|r| r.number == actor.seat) {
                continue;
            }
            records.push(GraveyardRecord {
                number: actor.seat,
                alias: actor.alias.clone(),
                cod: actor.cod.clone().unwrap_or_else(|| UNKNOWN_CAUSE.to_string()),
                dod: self.day,
                role: actor.role.name().to_string(),
                will: actor.will.clone(),
            });
        }
        records
    }

    pub fn state(&self) -> GameState {
        GameState {
            day: self.day,
            players: self
                .roster
                .iter()
                .map(|a| StatePlayer { number: a.seat, alias: a.alias.clone(), alive: a.alive })
                .collect(),
            graveyard: self.graveyard(),
        }
    }

    pub fn dump_actors(&self) -> Vec<ActorState> {
        self.roster
            .iter()
            .map(|actor| ActorState {
                id: actor.id.clone(),
                name: actor.name.clone(),
                alias: actor.alias.clone(),
                role: actor.role.name().to_string(),
                alignment: actor.alignment,
                number: actor.seat,
                alive: actor.alive,
                cod: actor.cod.clone(),
                will: actor.will.clone(),
                possible_targets: actor.possible_targets.clone(),
                targets: actor.targets.clone(),
                allies: actor
                    .allies
                    .iter()
                    .map(|s| {
                        let ally = &self.roster[*s];
                        AllySummary {
                            alias: ally.alias.clone(),
                            number: ally.seat,
                            role: ally.role.name().to_string(),
                            alive: ally.alive,
                        }
                    })
                    .collect(),
                role_actions: actor.dump_role_actions(),
            })
            .collect()
    }

    pub fn summarize_winners(&self, winners: &[Seat]) -> Option<Vec<WinnerSummary>> {
        if winners.is_empty() {
            return None;
        }
        Some(
            winners
                .iter()
                .map(|s| {
                    let actor = &self.roster[*s];
                    WinnerSummary {
                        id: actor.id.clone(),
                        name: actor.name.clone(),
                        alias: actor.alias.clone(),
                        number: actor.seat,
                        role: actor.role.name().to_string(),
                        alignment: actor.alignment,
                    }
                })
                .collect(),
        )
    }

    pub fn into_log(self) -> Vec<String> {
        self.logger.into_lines()
    }
}
