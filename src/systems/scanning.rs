//! Sector scanning and signal marking.
//!
//! Marking a signal claims the sector's next bonus (richer for the first
//! marker). A full scan wraps the marking with the scan announcement and
//! the close-observation synergy: a probe of the scanning player flying
//! under the sector earns one extra data token.

use crate::core::{PlayerId, SectorId};
use crate::state::Game;
use crate::systems::standing::{self, GameEvent};
use crate::systems::ExecutionContext;

/// Mark one signal for `player` in `sector`, claiming the sector bonus.
pub fn mark_signal(game: &mut Game, player: PlayerId, sector: SectorId, ctx: &mut ExecutionContext) {
    let Some(entry) = game.board.sector(sector) else {
        return;
    };
    debug_assert!(entry.open_slots() > 0);
    let color = entry.color;
    let bonus = entry.claim_bonus().clone();

    if let Some(entry) = game.board.sector_mut(sector) {
        entry.marks.push_back(player);
    }

    let name = game.player(player).name.clone();
    ctx.log(
        player,
        format!("{name} marque un signal dans le secteur {} ({})", sector.raw(), color.french()),
    );
    ctx.resolve_bonus(game, player, &bonus);
    standing::fire_event(game, player, &GameEvent::SignalMarked { sector, color }, ctx);
}

/// Scan a sector: announce it, mark a signal there, and award the
/// close-observation data when one of the player's probes flies under
/// the sector.
pub fn scan_sector(game: &mut Game, player: PlayerId, sector: SectorId, ctx: &mut ExecutionContext) {
    let name = game.player(player).name.clone();
    ctx.log(player, format!("{name} scanne le secteur {}", sector.raw()));

    mark_signal(game, player, sector, ctx);

    let overflight = game.probes_of(player).any(|p| match p.location {
        crate::state::ProbeLocation::InTransit { position } => {
            ctx.oracle.sector_at(position, &game.board.rotation) == Some(sector)
        }
        _ => false,
    });
    if overflight {
        game.player_mut(player).gain_data(1);
        ctx.log(player, format!("Observation rapprochée: {name} gagne 1 donnée"));
    }

    standing::fire_event(game, player, &GameEvent::SectorScanned { sector }, ctx);
}
