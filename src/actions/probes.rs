//! Probe action handlers: launch, move, orbit, land.

use crate::actions::{log_spend, ErrorCode, Validation};
use crate::core::{PlanetId, PlayerId, PositionId, ProbeId, ResourceKind};
use crate::oracle::GeometryOracle;
use crate::state::{Game, Probe, ProbeLocation};
use crate::systems::{probes, standing, ExecutionContext};

pub(crate) fn validate_launch(game: &Game, player: PlayerId, validation: &mut Validation) {
    let entry = game.player(player);
    if entry.probes_launched >= game.options.probe_stock {
        validation.error(ErrorCode::CannotLaunch, "Plus de sondes disponibles");
    }
    let limit = standing::probe_limit_of(game, player);
    if game.probes_in_play(player) >= usize::from(limit) {
        validation.error(
            ErrorCode::ProbeLimitReached,
            format!("Limite de sondes atteinte ({limit})"),
        );
    }
    let cost = launch_cost(game, player);
    if entry.credits < cost {
        validation.error(
            ErrorCode::InsufficientCredits,
            format!("Crédits insuffisants (Requis: {cost})"),
        );
    }
}

pub(crate) fn execute_launch(game: &mut Game, player: PlayerId, ctx: &mut ExecutionContext) {
    let cost = launch_cost(game, player);
    game.player_mut(player).spend_credits(cost);
    log_spend(game, ctx, player, ResourceKind::Credits, cost);
    probes::launch(game, player, ctx);
}

pub(crate) fn validate_move(
    game: &Game,
    oracle: &dyn GeometryOracle,
    player: PlayerId,
    probe: ProbeId,
    to: PositionId,
    validation: &mut Validation,
) {
    let Some(entry) = owned_probe(game, player, probe, validation) else {
        return;
    };
    let ProbeLocation::InTransit { position } = entry.location else {
        validation.error(ErrorCode::ProbeNotInTransit, "La sonde n'est pas en transit");
        return;
    };
    if !oracle.reachable(position, 1, &game.board.rotation).contains(&to) {
        validation.error(ErrorCode::UnreachablePosition, "Position inaccessible");
    }
    let cost = move_cost(game, player);
    if game.player(player).energy < cost {
        validation.error(
            ErrorCode::InsufficientEnergy,
            format!("Énergie insuffisante (Requis: {cost})"),
        );
    }
}

pub(crate) fn execute_move(
    game: &mut Game,
    player: PlayerId,
    probe: ProbeId,
    to: PositionId,
    ctx: &mut ExecutionContext,
) {
    let cost = move_cost(game, player);
    game.player_mut(player).spend_energy(cost);
    log_spend(game, ctx, player, ResourceKind::Energy, cost);
    probes::move_probe(game, player, probe, to, ctx);
}

pub(crate) fn validate_orbit(
    game: &Game,
    oracle: &dyn GeometryOracle,
    player: PlayerId,
    probe: ProbeId,
    planet: PlanetId,
    slot: usize,
    validation: &mut Validation,
) {
    let Some(entry) = owned_probe(game, player, probe, validation) else {
        return;
    };
    let ProbeLocation::InTransit { position } = entry.location else {
        validation.error(ErrorCode::ProbeNotInTransit, "La sonde n'est pas en transit");
        return;
    };
    if oracle.adjacent_planet(position, &game.board.rotation) != Some(planet) {
        validation.error(ErrorCode::PlanetNotAdjacent, "La planète n'est pas adjacente");
    }
    match game.board.planet(planet).and_then(|p| p.orbit_slots.get(slot)) {
        None => validation.error(ErrorCode::UnknownSlot, "Emplacement inconnu"),
        Some(spec) => {
            if game.orbit_slot_occupied(planet, slot) {
                validation.error(ErrorCode::SlotOccupied, "Emplacement occupé");
            }
            if game.player(player).energy < spec.cost {
                validation.error(
                    ErrorCode::InsufficientEnergy,
                    format!("Énergie insuffisante (Requis: {})", spec.cost),
                );
            }
        }
    }
}

pub(crate) fn execute_orbit(
    game: &mut Game,
    player: PlayerId,
    probe: ProbeId,
    planet: PlanetId,
    slot: usize,
    ctx: &mut ExecutionContext,
) {
    let cost = game
        .board
        .planet(planet)
        .and_then(|p| p.orbit_slots.get(slot))
        .map_or(0, |spec| spec.cost);
    game.player_mut(player).spend_energy(cost);
    log_spend(game, ctx, player, ResourceKind::Energy, cost);
    probes::orbit(game, player, probe, planet, slot, ctx);
}

pub(crate) fn validate_land(
    game: &Game,
    player: PlayerId,
    probe: ProbeId,
    planet: PlanetId,
    slot: usize,
    validation: &mut Validation,
) {
    let Some(entry) = owned_probe(game, player, probe, validation) else {
        return;
    };
    if entry.orbiting() != Some(planet) {
        validation.error(ErrorCode::ProbeNotOrbiting, "La sonde n'orbite pas cette planète");
        return;
    }
    match game.board.planet(planet).and_then(|p| p.landing_slots.get(slot)) {
        None => validation.error(ErrorCode::UnknownSlot, "Emplacement inconnu"),
        Some(spec) => {
            if game.landing_slot_occupied(planet, slot) {
                validation.error(ErrorCode::SlotOccupied, "Emplacement occupé");
            }
            if game.player(player).energy < spec.cost {
                validation.error(
                    ErrorCode::InsufficientEnergy,
                    format!("Énergie insuffisante (Requis: {})", spec.cost),
                );
            }
        }
    }
}

pub(crate) fn execute_land(
    game: &mut Game,
    player: PlayerId,
    probe: ProbeId,
    planet: PlanetId,
    slot: usize,
    ctx: &mut ExecutionContext,
) {
    let cost = game
        .board
        .planet(planet)
        .and_then(|p| p.landing_slots.get(slot))
        .map_or(0, |spec| spec.cost);
    game.player_mut(player).spend_energy(cost);
    log_spend(game, ctx, player, ResourceKind::Energy, cost);
    probes::land(game, player, probe, planet, slot, ctx);
}

fn launch_cost(game: &Game, player: PlayerId) -> u8 {
    game.options
        .launch_cost
        .saturating_sub(standing::discount(game, player, standing::CostKind::Launch))
}

fn move_cost(game: &Game, player: PlayerId) -> u8 {
    game.options
        .move_cost
        .saturating_sub(standing::discount(game, player, standing::CostKind::Move))
}

fn owned_probe<'a>(
    game: &'a Game,
    player: PlayerId,
    probe: ProbeId,
    validation: &mut Validation,
) -> Option<&'a Probe> {
    match game.probe(probe) {
        None => {
            validation.error(ErrorCode::UnknownProbe, "Sonde inconnue");
            None
        }
        Some(entry) if entry.owner != player => {
            validation.error(ErrorCode::NotProbeOwner, "Cette sonde ne vous appartient pas");
            None
        }
        Some(entry) => Some(entry),
    }
}
