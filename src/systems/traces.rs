//! Life traces and species discovery.
//!
//! Placing the third trace of one color anywhere on the board discovers
//! the species of that color. Discovery resolves in seating order: every
//! player holding at least one trace of the color shares the discovery
//! bonus, contact tokens included, so the queue interleaves one token
//! placement per participant.

use crate::core::{PlanetId, PlayerId, TraceColor};
use crate::state::{Game, PlacedTrace, TRACES_TO_DISCOVER};
use crate::systems::standing::{self, GameEvent};
use crate::systems::ExecutionContext;

/// Place one life trace of `color` on `planet` for `player`. The caller
/// has checked the planet still has trace room.
pub fn place_trace(
    game: &mut Game,
    player: PlayerId,
    planet: PlanetId,
    color: TraceColor,
    ctx: &mut ExecutionContext,
) {
    let Some(entry) = game.board.planet_mut(planet) else {
        return;
    };
    debug_assert!(entry.trace_room());
    entry.traces.push_back(PlacedTrace { player, color });
    let planet_name = entry.name.clone();

    game.player_mut(player).traces.push_back(color);
    let name = game.player(player).name.clone();
    ctx.log(
        player,
        format!("{name} place une trace de vie {} sur {planet_name}", color.french()),
    );

    standing::fire_event(game, player, &GameEvent::TracePlaced { color }, ctx);
    maybe_discover(game, player, color, ctx);
}

/// Discover the species of `color` once its trace threshold is met.
/// `finder` only attributes the announcement; the rewards go to every
/// participant.
fn maybe_discover(game: &mut Game, finder: PlayerId, color: TraceColor, ctx: &mut ExecutionContext) {
    let Some(board) = game.species_of_color(color) else {
        return;
    };
    if board.discovered || game.traces_of_color(color) < TRACES_TO_DISCOVER {
        return;
    }
    let species = board.id;
    let species_name = board.name.clone();
    let bonus = board.discovery_bonus.clone();
    if let Some(board) = game.species_board_mut(species) {
        board.discovered = true;
    }
    ctx.log(finder, format!("Les {species_name} sont découverts !"));

    let participants: Vec<PlayerId> = PlayerId::all(game.player_count())
        .filter(|p| game.player(*p).traces_of(color) >= 1)
        .collect();
    for participant in participants {
        ctx.resolve_bonus(game, participant, &bonus);
        standing::fire_event(game, participant, &GameEvent::SpeciesDiscovered { species }, ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, CardLibrary};
    use crate::core::{CardId, SequenceId};
    use crate::interaction::InteractionState;
    use crate::oracle::RingOracle;
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
    fn test_trace_lands_on_planet_and_player() {
        let (mut game, library) = fixture();
        let oracle = RingOracle::new();
        let player = PlayerId::new(0);
        let mut ctx = ExecutionContext::new(&library, &oracle, SequenceId::new(1));

        place_trace(&mut game, player, PlanetId::new(0), TraceColor::Red, &mut ctx);

        assert_eq!(game.board.planet(PlanetId::new(0)).unwrap().traces.len(), 1);
        assert_eq!(game.player(player).traces_of(TraceColor::Red), 1);
        assert_eq!(game.traces_of_color(TraceColor::Red), 1);
        assert!(!game.species_of_color(TraceColor::Red).unwrap().discovered);
        assert_eq!(
            ctx.history[0].message,
            "Ada place une trace de vie rouge sur Mars",
        );
    }

    #[test]
    fn test_third_trace_discovers_the_species() {
        let (mut game, library) = fixture();
        let oracle = RingOracle::new();
        let ada = PlayerId::new(0);
        let grace = PlayerId::new(1);
        let mut ctx = ExecutionContext::new(&library, &oracle, SequenceId::new(2));

        place_trace(&mut game, ada, PlanetId::new(0), TraceColor::Blue, &mut ctx);
        place_trace(&mut game, grace, PlanetId::new(1), TraceColor::Blue, &mut ctx);
        assert!(!game.species_of_color(TraceColor::Blue).unwrap().discovered);

        place_trace(&mut game, ada, PlanetId::new(2), TraceColor::Blue, &mut ctx);

        let species = game.species_of_color(TraceColor::Blue).unwrap();
        assert!(species.discovered);
        // Both participants share the discovery bonus: 3 PV and 2 media.
        assert_eq!(game.player(ada).score, 3);
        assert_eq!(game.player(grace).score, 3);
        assert_eq!(game.player(ada).media, 2);
        // One contact-token placement queued per participant.
        let tokens = ctx
            .interactions
            .iter()
            .filter(|i| i.state == InteractionState::PlacingSpeciesToken { count: 1, placed: 0 })
            .count();
        assert_eq!(tokens, 2);
        assert!(ctx
            .history
            .iter()
            .any(|e| e.message == "Les Océaniques sont découverts !"));
    }

    #[test]
    fn test_discovery_fires_once() {
        let (mut game, library) = fixture();
        let oracle = RingOracle::new();
        let ada = PlayerId::new(0);
        let mut ctx = ExecutionContext::new(&library, &oracle, SequenceId::new(3));

        for planet in [0u8, 1, 2, 3] {
            place_trace(&mut game, ada, PlanetId::new(planet), TraceColor::Yellow, &mut ctx);
        }

        // The fourth trace must not re-trigger the discovery payout.
        assert_eq!(game.player(ada).score, 3);
        let announcements = ctx
            .history
            .iter()
            .filter(|e| e.message == "Les Anciens sont découverts !")
            .count();
        assert_eq!(announcements, 1);
    }

    #[test]
    fn test_non_participants_gain_nothing() {
        let (mut game, library) = fixture();
        let oracle = RingOracle::new();
        let ada = PlayerId::new(0);
        let grace = PlayerId::new(1);
        let mut ctx = ExecutionContext::new(&library, &oracle, SequenceId::new(4));

        for planet in [0u8, 1, 2] {
            place_trace(&mut game, ada, PlanetId::new(planet), TraceColor::Red, &mut ctx);
        }

        assert_eq!(game.player(ada).score, 3);
        assert_eq!(game.player(grace).score, 0);
        assert_eq!(game.player(grace).media, 0);
    }
}
