//! Discoverable species boards.
//!
//! Each species is tied to one trace color. When the third life trace of
//! that color lands anywhere on the board, the species is discovered:
//! every player holding at least one trace of the color shares the
//! discovery bonus, its private deck opens, and its bonus track accepts
//! contact tokens.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::bonus::Bonus;
use crate::core::{CardId, PlayerId, SpeciesId, TraceColor};

/// Traces of one color needed before the species is found.
pub const TRACES_TO_DISCOVER: usize = 3;

/// One species and everything attached to it.
///
/// The bonus track is a row of slots; a granted contact token claims one
/// free slot and resolves its bonus. Slots are first come, first served
/// across players.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesBoard {
    pub id: SpeciesId,
    pub name: String,
    pub color: TraceColor,
    pub discovered: bool,
    /// Granted to every participant at the moment of discovery.
    pub discovery_bonus: Bonus,
    /// Slot bonuses along the species track.
    pub track: Vec<Bonus>,
    /// Who claimed each track slot, aligned with `track`.
    pub tokens: Vector<Option<PlayerId>>,
    /// Private deck, opened by discovery.
    pub deck: Vector<CardId>,
}

impl SpeciesBoard {
    #[must_use]
    pub fn new(id: SpeciesId, name: impl Into<String>, color: TraceColor) -> Self {
        let track = vec![
            Bonus::new().with_data(1),
            Bonus::new().with_revenue_raises(1),
            Bonus::new().with_reservations(1),
            Bonus::new().with_species_cards(1),
            Bonus::new().with_pv(3),
        ];
        let tokens = track.iter().map(|_| None).collect();
        Self {
            id,
            name: name.into(),
            color,
            discovered: false,
            discovery_bonus: Bonus::new().with_pv(3).with_media(2).with_species_tokens(1),
            track,
            tokens,
            deck: Vector::new(),
        }
    }

    /// Is this track slot still claimable?
    #[must_use]
    pub fn slot_free(&self, slot: usize) -> bool {
        matches!(self.tokens.get(slot), Some(None))
    }

    /// Any slot left for another contact token?
    #[must_use]
    pub fn token_room(&self) -> bool {
        self.tokens.iter().any(Option::is_none)
    }

    /// Claim a free track slot for a player and return its bonus.
    pub fn claim_slot(&mut self, slot: usize, player: PlayerId) -> Option<Bonus> {
        if !self.slot_free(slot) {
            return None;
        }
        self.tokens.set(slot, Some(player));
        Some(self.track[slot].clone())
    }

    /// Track slots claimed by one player.
    #[must_use]
    pub fn tokens_of(&self, player: PlayerId) -> usize {
        self.tokens.iter().filter(|t| **t == Some(player)).count()
    }
}
