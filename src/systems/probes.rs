//! Probe placement and movement.
//!
//! These functions assume a validated request: the action handlers and
//! interaction resolution check ownership, adjacency, slot occupancy and
//! affordability before calling in. Costs are paid by the caller so the
//! same placement path serves both paid actions and free grants.

use crate::core::{PlanetId, PlayerId, PositionId, ProbeId};
use crate::state::{Game, ProbeLocation};
use crate::systems::standing::{self, GameEvent};
use crate::systems::ExecutionContext;

/// Launch a probe at the standard launch position.
pub fn launch(game: &mut Game, player: PlayerId, ctx: &mut ExecutionContext) -> ProbeId {
    let position = ctx.oracle.launch_position(&game.board.rotation);
    let probe = game.alloc_probe(player, ProbeLocation::InTransit { position });
    game.player_mut(player).probes_launched += 1;

    let name = game.player(player).name.clone();
    ctx.log(player, format!("{name} lance une sonde"));
    standing::fire_event(game, player, &GameEvent::ProbeLaunched, ctx);
    probe
}

/// Move an in-transit probe to a new map position.
pub fn move_probe(
    game: &mut Game,
    player: PlayerId,
    probe: ProbeId,
    to: PositionId,
    ctx: &mut ExecutionContext,
) {
    let Some(entry) = game.probe_mut(probe) else {
        return;
    };
    entry.location = ProbeLocation::InTransit { position: to };
    let name = game.player(player).name.clone();
    ctx.log(player, format!("{name} déplace une sonde"));
}

/// Park an in-transit probe in a planet's orbit slot, granting the
/// slot's printed bonus.
pub fn orbit(
    game: &mut Game,
    player: PlayerId,
    probe: ProbeId,
    planet: PlanetId,
    slot: usize,
    ctx: &mut ExecutionContext,
) {
    let Some(entry) = game.probe_mut(probe) else {
        return;
    };
    entry.location = ProbeLocation::Orbiting { planet, slot };

    let name = game.player(player).name.clone();
    ctx.log(player, format!("{name} met une sonde en orbite autour de {}", planet_name(game, planet)));

    let bonus = game
        .board
        .planet(planet)
        .and_then(|p| p.orbit_slots.get(slot))
        .map(|s| s.bonus.clone());
    if let Some(bonus) = bonus {
        ctx.resolve_bonus(game, player, &bonus);
    }
    standing::fire_event(game, player, &GameEvent::ProbeOrbited { planet }, ctx);
}

/// Land an orbiting probe in a planet's landing slot. Terminal for the
/// probe; grants the slot's printed bonus.
pub fn land(
    game: &mut Game,
    player: PlayerId,
    probe: ProbeId,
    planet: PlanetId,
    slot: usize,
    ctx: &mut ExecutionContext,
) {
    let Some(entry) = game.probe_mut(probe) else {
        return;
    };
    entry.location = ProbeLocation::Landed { planet, slot };

    let name = game.player(player).name.clone();
    ctx.log(player, format!("{name} pose une sonde sur {}", planet_name(game, planet)));

    let bonus = game
        .board
        .planet(planet)
        .and_then(|p| p.landing_slots.get(slot))
        .map(|s| s.bonus.clone());
    if let Some(bonus) = bonus {
        ctx.resolve_bonus(game, player, &bonus);
    }
    standing::fire_event(game, player, &GameEvent::ProbeLanded { planet }, ctx);
}

fn planet_name(game: &Game, planet: PlanetId) -> String {
    match game.board.planet(planet) {
        Some(p) => p.name.clone(),
        None => planet.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, CardLibrary};
    use crate::core::{CardId, ResourceKind, SequenceId};
    use crate::effects::CardEffect;
    use crate::oracle::{GeometryOracle, RingOracle};
    use crate::state::GameOptions;

    fn fixture() -> (Game, CardLibrary) {
        let mut library = CardLibrary::new();
        for i in 0..12 {
            library.register(Card::new(CardId::new(i), format!("Carte {i}")));
        }
        let game = Game::new(&["Ada", "Grace"], &library, GameOptions::default());
        (game, library)
    }

    #[test]
    fn test_launch_places_probe_at_launch_position() {
        let (mut game, library) = fixture();
        let oracle = RingOracle::new();
        let mut ctx = ExecutionContext::new(&library, &oracle, SequenceId::new(1));
        let player = PlayerId::new(0);

        let probe = launch(&mut game, player, &mut ctx);

        let expected = oracle.launch_position(&game.board.rotation);
        assert_eq!(
            game.probe(probe).unwrap().location,
            ProbeLocation::InTransit { position: expected },
        );
        assert_eq!(game.player(player).probes_launched, 1);
        assert_eq!(ctx.history[0].message, "Ada lance une sonde");
    }

    #[test]
    fn test_orbit_grants_slot_bonus_and_fires_trigger() {
        let (mut game, library) = fixture();
        let oracle = RingOracle::new();
        let player = PlayerId::new(0);
        standing::register_permanents(
            &mut game,
            player,
            CardId::new(3),
            &[CardEffect::GainOnOrbit { resource: ResourceKind::Media, amount: 1 }],
        );
        let probe = game.alloc_probe(
            player,
            ProbeLocation::InTransit { position: PositionId::new(16) },
        );

        let mut ctx = ExecutionContext::new(&library, &oracle, SequenceId::new(2));
        let planet = PlanetId::new(0);
        orbit(&mut game, player, probe, planet, 1, &mut ctx);

        assert_eq!(game.probe(probe).unwrap().orbiting(), Some(planet));
        // Mars orbit slot 1 prints 1 PV; the trigger adds 1 media.
        assert_eq!(game.player(player).score, 1);
        assert_eq!(game.player(player).media, 1);
        let log: Vec<&str> = ctx.history.iter().map(|e| e.message.as_str()).collect();
        assert!(log.contains(&"Ada met une sonde en orbite autour de Mars"));
        assert!(log.contains(&"«Carte 3» se déclenche"));
    }

    #[test]
    fn test_landing_is_terminal_and_grants_data() {
        let (mut game, library) = fixture();
        let oracle = RingOracle::new();
        let player = PlayerId::new(1);
        let probe = game.alloc_probe(
            player,
            ProbeLocation::Orbiting { planet: PlanetId::new(0), slot: 0 },
        );

        let mut ctx = ExecutionContext::new(&library, &oracle, SequenceId::new(3));
        land(&mut game, player, probe, PlanetId::new(0), 0, &mut ctx);

        let entry = game.probe(probe).unwrap();
        assert!(!entry.in_transit());
        assert_eq!(entry.landed_on(), Some(PlanetId::new(0)));
        // Mars landing slot 0 prints 3 PV and 1 data.
        assert_eq!(game.player(player).score, 3);
        assert_eq!(game.player(player).data, 1);
        assert_eq!(game.landers_of(player), 1);
    }

    #[test]
    fn test_move_updates_position_only() {
        let (mut game, library) = fixture();
        let oracle = RingOracle::new();
        let player = PlayerId::new(0);
        let probe = game.alloc_probe(
            player,
            ProbeLocation::InTransit { position: PositionId::new(0) },
        );

        let mut ctx = ExecutionContext::new(&library, &oracle, SequenceId::new(4));
        move_probe(&mut game, player, probe, PositionId::new(1), &mut ctx);

        assert_eq!(
            game.probe(probe).unwrap().location,
            ProbeLocation::InTransit { position: PositionId::new(1) },
        );
        assert!(ctx.interactions.is_empty());
    }
}
