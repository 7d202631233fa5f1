//! Game state.
//!
//! [`Game`] is the root aggregate. Every collection inside it is a
//! persistent `im` structure (or a small flat struct), so cloning a game
//! is cheap structural sharing. Handlers take the current game, clone it,
//! mutate the clone and hand it back; the driver's undo ledger keeps the
//! old values alive at no extra cost.
//!
//! The interaction queue and the history ledger live beside the game in
//! the driver, not inside it, so a snapshot of `{game, queue}` never
//! contains snapshots of itself.

pub mod board;
pub mod player;
pub mod probe;
pub mod species;

pub use board::{
    AnalysisMilestone, Board, PlacedTrace, Planet, RotationState, Sector, SlotSpec, TechSlot,
    Technology,
};
pub use player::{PlayerRevenue, PlayerState};
pub use probe::{Probe, ProbeLocation};
pub use species::{SpeciesBoard, TRACES_TO_DISCOVER};

use im::{OrdMap, Vector};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::CardLibrary;
use crate::core::{
    CardId, GamePhase, GameRng, PlanetId, PlayerId, ProbeId, SectorColor, SpeciesId, TraceColor,
};
use crate::effects::CardEffect;
use crate::systems::standing::StandingEffect;

/// Numeric knobs of a game. Everything a variant or a test wants to bend
/// lives here instead of being hardcoded in handlers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOptions {
    pub seed: u64,
    pub rounds: u8,
    pub starting_credits: u8,
    pub starting_energy: u8,
    pub starting_hand: usize,
    /// Draft starting hands instead of dealing them: each player is
    /// offered `starting_hand + 2` cards and keeps `starting_hand`.
    pub draft_starting_hand: bool,
    pub row_size: usize,
    pub hand_limit: usize,
    pub probe_limit: u8,
    /// Physical probes per player; lifetime launches cannot exceed it.
    pub probe_stock: u8,
    /// Credits to launch a probe.
    pub launch_cost: u8,
    /// Energy per movement step.
    pub move_cost: u8,
    /// Energy to scan a sector.
    pub scan_cost: u8,
    /// Media to buy a card from the row.
    pub buy_media_cost: u8,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            seed: 0,
            rounds: 5,
            starting_credits: 5,
            starting_energy: 2,
            starting_hand: 3,
            draft_starting_hand: false,
            row_size: 4,
            hand_limit: 7,
            probe_limit: 2,
            probe_stock: 5,
            launch_cost: 2,
            move_cost: 1,
            scan_cost: 2,
            buy_media_cost: 3,
        }
    }
}

/// A played card's requirement passives, tracked until all are met.
///
/// Each requirement latches: once fulfilled it stays fulfilled and its
/// score is awarded at that moment. A mission with every flag latched is
/// completed, which is terminal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
    pub card: CardId,
    pub owner: PlayerId,
    pub requirements: SmallVec<[CardEffect; 2]>,
    pub fulfilled: SmallVec<[bool; 2]>,
    pub completed: bool,
}

impl Mission {
    #[must_use]
    pub fn new(owner: PlayerId, card: CardId, requirements: SmallVec<[CardEffect; 2]>) -> Self {
        let fulfilled = requirements.iter().map(|_| false).collect();
        Self { card, owner, requirements, fulfilled, completed: false }
    }
}

/// The root aggregate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub options: GameOptions,
    /// 1-based round counter.
    pub round: u8,
    pub phase: GamePhase,
    pub current_player: PlayerId,
    pub starting_player: PlayerId,
    pub players: Vec<PlayerState>,
    pub board: Board,
    pub species: Vec<SpeciesBoard>,
    pub deck: Vector<CardId>,
    pub discard: Vector<CardId>,
    /// The visible card row.
    pub row: Vector<CardId>,
    /// Entity arena: every probe in play, addressed by stable id.
    pub probes: OrdMap<ProbeId, Probe>,
    /// Registered permanent effects, in registration order.
    pub standing: Vector<StandingEffect>,
    pub missions: Vector<Mission>,
    pub rng: GameRng,
    next_probe: u32,
}

impl Game {
    /// Set up a fresh game: standard board, three species, shuffled
    /// decks, dealt row and starting hands.
    #[must_use]
    pub fn new(names: &[&str], library: &CardLibrary, options: GameOptions) -> Self {
        let mut rng = GameRng::new(options.seed);

        let mut deck_ids = library.standard_deck();
        rng.shuffle(&mut deck_ids);
        let mut deck: Vector<CardId> = deck_ids.into_iter().collect();

        let players: Vec<PlayerState> = names
            .iter()
            .map(|name| {
                let mut player = PlayerState::new(*name);
                player.credits = options.starting_credits;
                player.energy = options.starting_energy;
                player.probe_limit = options.probe_limit;
                if !options.draft_starting_hand {
                    for _ in 0..options.starting_hand {
                        if let Some(card) = deck.pop_front() {
                            player.hand.push_back(card);
                        }
                    }
                }
                player
            })
            .collect();

        let mut row = Vector::new();
        for _ in 0..options.row_size {
            if let Some(card) = deck.pop_front() {
                row.push_back(card);
            }
        }

        let species: Vec<SpeciesBoard> = [
            ("Centauriens", TraceColor::Red),
            ("Anciens", TraceColor::Yellow),
            ("Océaniques", TraceColor::Blue),
        ]
        .iter()
        .enumerate()
        .map(|(i, &(name, color))| {
            let id = SpeciesId::new(i as u8);
            let mut board = SpeciesBoard::new(id, name, color);
            let mut deck_ids = library.species_deck(id);
            rng.for_context(&format!("species:{i}")).shuffle(&mut deck_ids);
            board.deck = deck_ids.into_iter().collect();
            board
        })
        .collect();

        Self {
            options,
            round: 1,
            phase: GamePhase::Running,
            current_player: PlayerId::new(0),
            starting_player: PlayerId::new(0),
            players,
            board: Board::standard(),
            species,
            deck,
            discard: Vector::new(),
            row,
            probes: OrdMap::new(),
            standing: Vector::new(),
            missions: Vector::new(),
            rng,
            next_probe: 0,
        }
    }

    // === Players ===

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> &PlayerState {
        &self.players[id.index()]
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut PlayerState {
        &mut self.players[id.index()]
    }

    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.players.iter().all(|p| p.has_passed)
    }

    // === Probes ===

    /// Allocate a probe in the arena. Ids are never reused.
    pub fn alloc_probe(&mut self, owner: PlayerId, location: ProbeLocation) -> ProbeId {
        let id = ProbeId::new(self.next_probe);
        self.next_probe += 1;
        self.probes.insert(id, Probe::new(id, owner, location));
        id
    }

    #[must_use]
    pub fn probe(&self, id: ProbeId) -> Option<&Probe> {
        self.probes.get(&id)
    }

    pub fn probe_mut(&mut self, id: ProbeId) -> Option<&mut Probe> {
        self.probes.get_mut(&id)
    }

    pub fn probes_of(&self, player: PlayerId) -> impl Iterator<Item = &Probe> {
        self.probes.values().filter(move |p| p.owner == player)
    }

    /// Probes a player currently has in play, against the probe limit.
    #[must_use]
    pub fn probes_in_play(&self, player: PlayerId) -> usize {
        self.probes_of(player).count()
    }

    #[must_use]
    pub fn orbiters_of(&self, player: PlayerId) -> usize {
        self.probes_of(player).filter(|p| p.orbiting().is_some()).count()
    }

    #[must_use]
    pub fn landers_of(&self, player: PlayerId) -> usize {
        self.probes_of(player).filter(|p| p.landed_on().is_some()).count()
    }

    /// Does the player have a probe orbiting (or landed on, for
    /// `include_landed`) the planet?
    #[must_use]
    pub fn presence_at(&self, player: PlayerId, planet: PlanetId, include_landed: bool) -> bool {
        self.probes_of(player).any(|p| {
            p.orbiting() == Some(planet) || (include_landed && p.landed_on() == Some(planet))
        })
    }

    #[must_use]
    pub fn orbit_slot_occupied(&self, planet: PlanetId, slot: usize) -> bool {
        self.probes.values().any(|p| p.location == ProbeLocation::Orbiting { planet, slot })
    }

    #[must_use]
    pub fn landing_slot_occupied(&self, planet: PlanetId, slot: usize) -> bool {
        self.probes.values().any(|p| p.location == ProbeLocation::Landed { planet, slot })
    }

    // === Cards ===

    /// Pop the top of the deck, reshuffling the discard pile into it
    /// when the deck runs dry. `None` only when both are empty.
    pub fn draw_from_deck(&mut self) -> Option<CardId> {
        if self.deck.is_empty() && !self.discard.is_empty() {
            let mut pile: Vec<CardId> = self.discard.iter().copied().collect();
            self.discard.clear();
            self.rng.shuffle(&mut pile);
            self.deck = pile.into_iter().collect();
        }
        self.deck.pop_front()
    }

    /// Take a card out of the visible row.
    pub fn take_from_row(&mut self, slot: usize) -> Option<CardId> {
        if slot < self.row.len() {
            Some(self.row.remove(slot))
        } else {
            None
        }
    }

    /// Refill the row up to its configured size.
    pub fn refill_row(&mut self) {
        while self.row.len() < self.options.row_size {
            match self.draw_from_deck() {
                Some(card) => self.row.push_back(card),
                None => break,
            }
        }
    }

    // === Signals ===

    #[must_use]
    pub fn signals_of(&self, player: PlayerId) -> usize {
        self.board
            .sectors
            .iter()
            .map(|s| s.marks.iter().filter(|&&m| m == player).count())
            .sum()
    }

    #[must_use]
    pub fn signals_of_color(&self, player: PlayerId, color: SectorColor) -> usize {
        self.board
            .sectors
            .iter()
            .filter(|s| s.color == color)
            .map(|s| s.marks.iter().filter(|&&m| m == player).count())
            .sum()
    }

    // === Species ===

    #[must_use]
    pub fn species_board(&self, id: SpeciesId) -> Option<&SpeciesBoard> {
        self.species.get(id.index())
    }

    pub fn species_board_mut(&mut self, id: SpeciesId) -> Option<&mut SpeciesBoard> {
        self.species.get_mut(id.index())
    }

    #[must_use]
    pub fn species_of_color(&self, color: TraceColor) -> Option<&SpeciesBoard> {
        self.species.iter().find(|s| s.color == color)
    }

    /// Total life traces of one color on the whole board.
    #[must_use]
    pub fn traces_of_color(&self, color: TraceColor) -> usize {
        self.board
            .planets
            .iter()
            .map(|p| p.traces.iter().filter(|t| t.color == color).count())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Card;

    fn tiny_library(count: u16) -> CardLibrary {
        let mut library = CardLibrary::new();
        for i in 0..count {
            library.register(Card::new(CardId::new(i), format!("Carte {i}")));
        }
        library
    }

    #[test]
    fn test_setup_deals_hands_and_row() {
        let library = tiny_library(20);
        let game = Game::new(&["Ada", "Grace"], &library, GameOptions::default());

        assert_eq!(game.player_count(), 2);
        for player in &game.players {
            assert_eq!(player.hand.len(), 3);
            assert_eq!(player.credits, 5);
            assert_eq!(player.probe_limit, 2);
        }
        assert_eq!(game.row.len(), 4);
        assert_eq!(game.deck.len(), 20 - 2 * 3 - 4);
        assert_eq!(game.phase, GamePhase::Running);
        assert_eq!(game.round, 1);
    }

    #[test]
    fn test_setup_is_deterministic_per_seed() {
        let library = tiny_library(20);
        let a = Game::new(&["Ada", "Grace"], &library, GameOptions { seed: 9, ..GameOptions::default() });
        let b = Game::new(&["Ada", "Grace"], &library, GameOptions { seed: 9, ..GameOptions::default() });
        let c = Game::new(&["Ada", "Grace"], &library, GameOptions { seed: 10, ..GameOptions::default() });

        assert_eq!(a.deck, b.deck);
        assert_eq!(a.players[0].hand, b.players[0].hand);
        assert_ne!(a.deck, c.deck);
    }

    #[test]
    fn test_probe_arena_allocates_stable_ids() {
        let library = tiny_library(12);
        let mut game = Game::new(&["Ada"], &library, GameOptions::default());

        let p0 = game.alloc_probe(PlayerId::new(0), ProbeLocation::InTransit { position: crate::core::PositionId::new(0) });
        let p1 = game.alloc_probe(PlayerId::new(0), ProbeLocation::Orbiting { planet: PlanetId::new(1), slot: 0 });

        assert_ne!(p0, p1);
        assert_eq!(game.probes_in_play(PlayerId::new(0)), 2);
        assert_eq!(game.orbiters_of(PlayerId::new(0)), 1);
        assert!(game.orbit_slot_occupied(PlanetId::new(1), 0));
        assert!(!game.orbit_slot_occupied(PlanetId::new(1), 1));
    }

    #[test]
    fn test_draw_reshuffles_discard_when_deck_empty() {
        let library = tiny_library(12);
        let mut game = Game::new(&["Ada"], &library, GameOptions { starting_hand: 0, row_size: 0, ..GameOptions::default() });

        let mut drawn = 0;
        while game.draw_from_deck().is_some() {
            drawn += 1;
        }
        assert_eq!(drawn, 12);

        game.discard.push_back(CardId::new(3));
        game.discard.push_back(CardId::new(7));
        assert!(game.draw_from_deck().is_some());
        assert_eq!(game.discard.len(), 0);
        assert_eq!(game.deck.len(), 1);
    }

    #[test]
    fn test_clone_is_independent() {
        let library = tiny_library(12);
        let mut game = Game::new(&["Ada"], &library, GameOptions::default());
        let snapshot = game.clone();

        game.player_mut(PlayerId::new(0)).gain_media(4);
        game.alloc_probe(PlayerId::new(0), ProbeLocation::InTransit { position: crate::core::PositionId::new(2) });

        assert_eq!(snapshot.player(PlayerId::new(0)).media, 0);
        assert_eq!(snapshot.probes.len(), 0);
        assert_ne!(&game, &snapshot);
    }
}
