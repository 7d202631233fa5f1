//! Mission tracking.
//!
//! A played card's mission requirements become one [`Mission`] record.
//! After every action or resolved choice the engine re-checks the open
//! requirements against the owner's position. Fulfillment latches: the
//! score is awarded at the moment a requirement first holds and is never
//! taken back, even if the position later stops qualifying.

use smallvec::SmallVec;

use crate::cards::CardLibrary;
use crate::core::{CardId, PlayerId, SectorColor};
use crate::effects::CardEffect;
use crate::state::{Game, Mission};
use crate::systems::ExecutionContext;

/// Record a played card's requirement passives as a mission. Returns
/// false when the card has none.
pub fn register(game: &mut Game, owner: PlayerId, card: CardId, effects: &[CardEffect]) -> bool {
    let requirements: SmallVec<[CardEffect; 2]> = effects
        .iter()
        .filter(|e| e.is_mission_requirement())
        .cloned()
        .collect();
    if requirements.is_empty() {
        return false;
    }
    game.missions.push_back(Mission::new(owner, card, requirements));
    true
}

/// Re-check every open mission requirement, latching and scoring the
/// ones that now hold.
pub fn refresh(game: &mut Game, ctx: &mut ExecutionContext) {
    for index in 0..game.missions.len() {
        let mut mission = game.missions[index].clone();
        if mission.completed {
            continue;
        }
        let owner = mission.owner;
        let card_name = ctx.card_name(mission.card);
        let mut dirty = false;

        for i in 0..mission.requirements.len() {
            if mission.fulfilled[i] {
                continue;
            }
            if !requirement_met(game, ctx.library, owner, &mission.requirements[i]) {
                continue;
            }
            mission.fulfilled[i] = true;
            dirty = true;
            let pv = mission.requirements[i].requirement_pv();
            if pv > 0 {
                game.player_mut(owner).gain_score(i16::from(pv));
            }
            let name = game.player(owner).name.clone();
            let suffix = if pv > 0 { format!(" (+{pv} PV)") } else { String::new() };
            ctx.log(owner, format!("{name} remplit un objectif de «{card_name}»{suffix}"));
        }

        if dirty {
            if mission.fulfilled.iter().all(|f| *f) {
                mission.completed = true;
                ctx.log(owner, format!("«{card_name}» est accomplie"));
            }
            game.missions.set(index, mission);
        }
    }
}

/// Does `owner`'s position satisfy one mission requirement right now?
///
/// Unknown planet names never qualify; non-requirement effects report
/// false.
#[must_use]
pub fn requirement_met(
    game: &Game,
    library: &CardLibrary,
    owner: PlayerId,
    requirement: &CardEffect,
) -> bool {
    let player = game.player(owner);
    match requirement {
        CardEffect::VisitPlanet { planet, .. } => game
            .board
            .planet_by_name(planet)
            .is_some_and(|p| game.presence_at(owner, p.id, true)),
        CardEffect::OrbitPlanet { planet, .. } => game
            .board
            .planet_by_name(planet)
            .is_some_and(|p| game.presence_at(owner, p.id, false)),
        CardEffect::LandPlanet { planet, .. } => game
            .board
            .planet_by_name(planet)
            .is_some_and(|p| game.probes_of(owner).any(|probe| probe.landed_on() == Some(p.id))),
        CardEffect::SignalsMarked { color, count, .. } => {
            game.signals_of_color(owner, *color) >= *count as usize
        }
        CardEffect::SignalsAny { count, .. } => game.signals_of(owner) >= *count as usize,
        CardEffect::TechCount { category, count, .. } => {
            let held = player
                .technologies
                .iter()
                .filter(|id| game.board.tech(**id).map(|s| s.tech.category) == Some(*category))
                .count();
            held >= *count as usize
        }
        CardEffect::TechTotal { count, .. } => player.technologies.len() >= *count as usize,
        CardEffect::MediaLevel { level, .. } => player.media >= *level,
        CardEffect::DataAnalyzed { count, .. } => player.analyzed_data >= *count,
        CardEffect::TracesPlaced { color, count, .. } => {
            player.traces_of(*color) >= *count as usize
        }
        CardEffect::SpeciesContact { .. } => game
            .species
            .iter()
            .any(|s| s.discovered && player.traces_of(s.color) >= 1),
        CardEffect::ProbesLaunched { count, .. } => player.probes_launched >= *count,
        CardEffect::Orbiters { count, .. } => game.orbiters_of(owner) >= *count as usize,
        CardEffect::Landers { count, .. } => game.landers_of(owner) >= *count as usize,
        CardEffect::PlayedSector { color, count, .. } => {
            played_of_color(game, library, owner, *color) >= *count as usize
        }
        CardEffect::RevenueLevel { kind, level, .. } => player.revenue.get(*kind) >= *level,
        _ => false,
    }
}

fn played_of_color(game: &Game, library: &CardLibrary, owner: PlayerId, color: SectorColor) -> usize {
    game.player(owner)
        .played
        .iter()
        .filter(|id| library.get(**id).and_then(|c| c.scan_sector) == Some(color))
        .count()
}
