//! Card templates and the library that owns them.
//!
//! ## Key Types
//!
//! - `Card`: immutable template (name, costs, printed icons, normalized
//!   effects). Zones never hold `Card` values, only [`CardId`]s; the
//!   library is the single owner of templates.
//! - `CardLibrary`: id-indexed template lookup, insertion-ordered so deck
//!   construction is deterministic.
//! - [`import`]: line-delimited ingestion from the external card list.
//!
//! Every physical card is unique. Moving a card between zones means
//! relocating its id between zone lists, so "who owns this card" always
//! has exactly one answer.

pub mod import;

pub use import::{load_cards, ImportReport, ImportWarning};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{CardId, RevenueKind, SectorColor, SpeciesId};
use crate::effects::CardEffect;

/// Which deck a card belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardKind {
    /// Main deck card.
    Standard,
    /// Card of a discoverable species' private deck.
    Species(SpeciesId),
    /// Ingestion could not classify the card; excluded from every deck.
    Undefined,
}

/// The small action printed on a card, usable by discarding it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FreeActionKind {
    /// Gain 1 credit.
    Credit,
    /// Gain 1 energy.
    Energy,
    /// Gain 1 data token.
    Data,
    /// Move one probe one step.
    Movement,
    /// Gain 1 media coverage.
    Media,
}

/// Immutable card template.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub name: String,
    pub kind: CardKind,
    /// Printed rules text, kept verbatim for display.
    pub text: String,
    pub free_action: Option<FreeActionKind>,
    /// Color of the scan icon, if any. Playing the card counts toward
    /// sector-colored missions and `hand`-scoped signals use this.
    pub scan_sector: Option<SectorColor>,
    /// Income track raised when the card is played.
    pub revenue: Option<RevenueKind>,
    /// Credits required to play the card.
    pub cost: u8,
    pub immediate: SmallVec<[CardEffect; 2]>,
    pub passive: SmallVec<[CardEffect; 2]>,
    pub permanent: SmallVec<[CardEffect; 2]>,
}

impl Card {
    /// Create a bare standard card. Builder methods fill in the rest;
    /// fixtures in tests rely on this.
    #[must_use]
    pub fn new(id: CardId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: CardKind::Standard,
            text: String::new(),
            free_action: None,
            scan_sector: None,
            revenue: None,
            cost: 0,
            immediate: SmallVec::new(),
            passive: SmallVec::new(),
            permanent: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: CardKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn with_cost(mut self, cost: u8) -> Self {
        self.cost = cost;
        self
    }

    #[must_use]
    pub fn with_free_action(mut self, free_action: FreeActionKind) -> Self {
        self.free_action = Some(free_action);
        self
    }

    #[must_use]
    pub fn with_scan_sector(mut self, color: SectorColor) -> Self {
        self.scan_sector = Some(color);
        self
    }

    #[must_use]
    pub fn with_revenue(mut self, revenue: RevenueKind) -> Self {
        self.revenue = Some(revenue);
        self
    }

    #[must_use]
    pub fn with_immediate(mut self, effect: CardEffect) -> Self {
        self.immediate.push(effect);
        self
    }

    #[must_use]
    pub fn with_passive(mut self, effect: CardEffect) -> Self {
        self.passive.push(effect);
        self
    }

    #[must_use]
    pub fn with_permanent(mut self, effect: CardEffect) -> Self {
        self.permanent.push(effect);
        self
    }
}

/// Owns every card template, indexed by id.
///
/// Insertion order is remembered so the deck built from the library is
/// deterministic for a given card list.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CardLibrary {
    cards: FxHashMap<CardId, Card>,
    order: Vec<CardId>,
}

impl CardLibrary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template. Replacing an existing id keeps its original
    /// position in the ordering.
    pub fn register(&mut self, card: Card) {
        let id = card.id;
        if self.cards.insert(id, card).is_none() {
            self.order.push(id);
        }
    }

    /// Look up a template.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.get(&id)
    }

    /// All card ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = CardId> + '_ {
        self.order.iter().copied()
    }

    /// All templates in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.order.iter().filter_map(|id| self.cards.get(id))
    }

    /// Ids of the main deck, in registration order.
    #[must_use]
    pub fn standard_deck(&self) -> Vec<CardId> {
        self.iter()
            .filter(|card| card.kind == CardKind::Standard)
            .map(|card| card.id)
            .collect()
    }

    /// Ids of one species' private deck, in registration order.
    #[must_use]
    pub fn species_deck(&self, species: SpeciesId) -> Vec<CardId> {
        self.iter()
            .filter(|card| card.kind == CardKind::Species(species))
            .map(|card| card.id)
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_lookup() {
        let card = Card::new(CardId::new(4), "Radiotélescope")
            .with_cost(2)
            .with_scan_sector(SectorColor::Blue)
            .with_immediate(CardEffect::GainMedia { amount: 1 });

        let mut library = CardLibrary::new();
        library.register(card.clone());

        assert_eq!(library.len(), 1);
        assert_eq!(library.get(CardId::new(4)), Some(&card));
        assert_eq!(library.get(CardId::new(5)), None);
    }

    #[test]
    fn test_deck_building_is_insertion_ordered() {
        let mut library = CardLibrary::new();
        library.register(Card::new(CardId::new(2), "B"));
        library.register(
            Card::new(CardId::new(9), "S").with_kind(CardKind::Species(SpeciesId::new(0))),
        );
        library.register(Card::new(CardId::new(1), "A"));
        library.register(Card::new(CardId::new(7), "U").with_kind(CardKind::Undefined));

        assert_eq!(library.standard_deck(), vec![CardId::new(2), CardId::new(1)]);
        assert_eq!(library.species_deck(SpeciesId::new(0)), vec![CardId::new(9)]);
        assert_eq!(library.species_deck(SpeciesId::new(1)), Vec::new());
    }

    #[test]
    fn test_reregistering_keeps_position() {
        let mut library = CardLibrary::new();
        library.register(Card::new(CardId::new(1), "A"));
        library.register(Card::new(CardId::new(2), "B"));
        library.register(Card::new(CardId::new(1), "A'").with_cost(3));

        let names: Vec<_> = library.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["A'", "B"]);
    }
}
