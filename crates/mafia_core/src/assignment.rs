//! Role draft.
//!
//! Every config tag is one seat to fill. Tags are drafted most-constrained
//! first: the tag with the fewest eligible roles is filled next by a weighted
//! draw, and roles drop out of every candidate list once their `max` is hit.
//! Tags that end up with no candidate get [`FILLER_ROLE`].

use crate::error::Result;
use crate::logger::EngineLogger;
use crate::models::{GameConfig, PlayerInput, Seat};
use crate::rng::EngineRng;
use crate::roles::{matches_tag, FILLER_ROLE};

/// Roles picked by the draft, one per config tag.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    /// In draft order (most constrained tag first), not config order.
    pub roles: Vec<String>,
    pub failed_tags: Vec<String>,
}

struct Candidate<'a> {
    role: &'a str,
    weight: f64,
}

struct Slot<'a> {
    tag: &'a str,
    candidates: Vec<Candidate<'a>>,
}

fn candidates_for<'a>(config: &'a GameConfig, tag: &str) -> Vec<Candidate<'a>> {
    config
        .roles
        .iter()
        .filter(|(role, _)| matches_tag(role, tag))
        .map(|(role, settings)| Candidate { role, weight: settings.weight })
        .collect()
}

/// Fewest candidates first; slots nobody can fill go last.
fn sort_slots(slots: &mut [Slot<'_>]) {
    slots.sort_by_key(|slot| (slot.candidates.is_empty(), slot.candidates.len()));
}

pub fn generate_roles(
    config: &GameConfig,
    logger: &mut EngineLogger,
    rng: &mut EngineRng,
) -> Result<Draft> {
    logger.info("--- Generating roles ---");
    logger.info(format!("Tags: {}", serde_json::to_string(&config.tags)?));

    let mut slots: Vec<Slot<'_>> = config
        .tags
        .iter()
        .map(|tag| Slot { tag: tag.as_str(), candidates: candidates_for(config, tag) })
        .collect();
    sort_slots(&mut slots);

    let mut selected: Vec<String> = Vec::with_capacity(slots.len());
    let mut failed_tags = Vec::new();
    let mut blacklist: Vec<&str> = Vec::new();

    while !slots.is_empty() {
        for (role, settings) in config.roles.iter() {
            if blacklist.contains(&role) {
                continue;
            }
            let count = selected.iter().filter(|s| s.as_str() == role).count();
            if count as u64 >= settings.max as u64 {
                logger.info(format!("- Max reached for '{}' -> adding to blacklist", role));
                blacklist.push(role);
                for slot in slots.iter_mut() {
                    slot.candidates.retain(|c| c.role != role);
                }
            }
        }

        sort_slots(&mut slots);
        let slot = slots.remove(0);

        let choice = if slot.candidates.is_empty() {
            logger.warn(format!("Picking {}: {} <--- FAILED!!!", slot.tag, FILLER_ROLE));
            failed_tags.push(slot.tag.to_string());
            FILLER_ROLE.name().to_string()
        } else {
            let names: Vec<&str> = slot.candidates.iter().map(|c| c.role).collect();
            let weights: Vec<f64> = slot.candidates.iter().map(|c| c.weight).collect();
            let pick = rng.weighted_choice(&names, &weights)?.to_string();
            logger.info(format!("Picking {}: {}", slot.tag, pick));
            pick
        };
        selected.push(choice);
    }

    if !failed_tags.is_empty() {
        logger.warn(format!("Number of failures: {}", failed_tags.len()));
    }
    logger.info(format!("Roles: {}", serde_json::to_string(&selected)?));

    Ok(Draft { roles: selected, failed_tags })
}

/// Drafts roles, then deals them to a shuffled table and seats players
/// `1..=N` in shuffle order. Surplus players get the filler role; surplus
/// roles are discarded.
pub fn allocate_roles(
    players: &[PlayerInput],
    config: &GameConfig,
    logger: &mut EngineLogger,
    rng: &mut EngineRng,
) -> Result<Vec<PlayerInput>> {
    let draft = generate_roles(config, logger, rng)?;
    let mut seated = rng.shuffle(players);
    let mut roles = rng.shuffle(&draft.roles);
    if seated.len() > roles.len() {
        roles.resize(seated.len(), FILLER_ROLE.name().to_string());
    }

    logger.info("--- Allocating roles ---");
    for (idx, (player, role)) in seated.iter_mut().zip(roles).enumerate() {
        player.number = Some(idx as Seat + 1);
        let label = format!("  |-> {} ({}):", player.alias, player.name);
        logger.info(format!("{:<40} {}", label, role));
        player.role = Some(role);
    }
    Ok(seated)
}
