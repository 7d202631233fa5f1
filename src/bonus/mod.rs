//! Compound grants.
//!
//! A [`Bonus`] is everything a single source (played card, board slot,
//! sector claim, track milestone, standing effect) grants at once. It is
//! a pure value: building one changes nothing. The [`resolver`] consumes
//! a bonus exactly once, applying the scalar parts directly and turning
//! the parts that need a decision into queued interactions.

pub mod resolver;

pub use resolver::{resolve, Resolution};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{TechCategory, TraceColor};
use crate::effects::{CardEffect, SignalScope};

/// One source's worth of grants.
///
/// Scalar fields apply without input. Every other field needs at least
/// one player decision and becomes an interaction when resolved. Field
/// declaration order is resolution order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bonus {
    // Scalars, applied in this order.
    pub credits: u8,
    pub energy: u8,
    /// Clamped at the media cap on application; excess is discarded.
    pub media: u8,
    pub data: u8,
    pub pv: u8,

    // Interactive grants, synthesized in this order.
    /// Cards taken one at a time from the deck top or the visible row.
    pub cards: u8,
    /// Row cards set aside into the owner's reserve.
    pub reservations: u8,
    /// Free probe launches.
    pub launches: u8,
    /// Free landings for orbiting probes.
    pub landings: u8,
    /// Free probe movement steps.
    pub movements: u8,
    /// Free ring rotations.
    pub rotations: u8,
    /// Free sector scans.
    pub scans: u8,
    /// Signal markers by qualifying scope. `Hand` scopes prompt for a
    /// hand card; the others group into one marking interaction.
    pub signals: SmallVec<[SignalScope; 2]>,
    /// Technology picks, one interaction per entry.
    pub technologies: SmallVec<[Option<TechCategory>; 2]>,
    /// Life trace placements, one interaction per entry.
    pub traces: SmallVec<[Option<TraceColor>; 2]>,
    /// Income-track raises of the owner's choice.
    pub revenue_raises: u8,
    /// Contact tokens to place on discovered species' bonus tracks.
    pub species_tokens: u8,
    /// Cards drawn from a discovered species' deck.
    pub species_cards: u8,
    /// "1 media or 1 movement" prompts.
    pub media_or_moves: u8,
    /// "1 data or 1 card" prompts.
    pub data_or_cards: u8,

    /// Granted launches ignore the probe limit.
    pub ignore_probe_limit: bool,
}

impl Bonus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a card's immediate effects into one bonus.
    ///
    /// Non-immediate and `Unknown` effects are skipped; the caller routes
    /// those elsewhere.
    #[must_use]
    pub fn from_effects(effects: &[CardEffect]) -> Self {
        let mut bonus = Bonus::new();
        for effect in effects {
            match effect {
                CardEffect::GainMedia { amount } => bonus.media += amount,
                CardEffect::GainCredits { amount } => bonus.credits += amount,
                CardEffect::GainEnergy { amount } => bonus.energy += amount,
                CardEffect::GainData { amount } => bonus.data += amount,
                CardEffect::DrawCard { amount } => bonus.cards += amount,
                CardEffect::FreeLaunch { amount } => bonus.launches += amount,
                CardEffect::Movement { amount } => bonus.movements += amount,
                CardEffect::Rotation { amount } => bonus.rotations += amount,
                CardEffect::FreeLanding { amount } => bonus.landings += amount,
                CardEffect::FreeScan { amount } => bonus.scans += amount,
                CardEffect::GainSignal { scope, amount } => {
                    for _ in 0..*amount {
                        bonus.signals.push(*scope);
                    }
                }
                CardEffect::GainTechnology { category, amount } => {
                    for _ in 0..*amount {
                        bonus.technologies.push(*category);
                    }
                }
                CardEffect::GainLifeTrace { color, amount } => {
                    for _ in 0..*amount {
                        bonus.traces.push(*color);
                    }
                }
                _ => {}
            }
        }
        bonus
    }

    /// True when resolving this bonus would do nothing at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Bonus::default()
    }

    // === Builders, used by board setup and tests ===

    #[must_use]
    pub fn with_credits(mut self, credits: u8) -> Self {
        self.credits = credits;
        self
    }

    #[must_use]
    pub fn with_energy(mut self, energy: u8) -> Self {
        self.energy = energy;
        self
    }

    #[must_use]
    pub fn with_media(mut self, media: u8) -> Self {
        self.media = media;
        self
    }

    #[must_use]
    pub fn with_data(mut self, data: u8) -> Self {
        self.data = data;
        self
    }

    #[must_use]
    pub fn with_pv(mut self, pv: u8) -> Self {
        self.pv = pv;
        self
    }

    #[must_use]
    pub fn with_cards(mut self, cards: u8) -> Self {
        self.cards = cards;
        self
    }

    #[must_use]
    pub fn with_reservations(mut self, reservations: u8) -> Self {
        self.reservations = reservations;
        self
    }

    #[must_use]
    pub fn with_launches(mut self, launches: u8) -> Self {
        self.launches = launches;
        self
    }

    #[must_use]
    pub fn with_landings(mut self, landings: u8) -> Self {
        self.landings = landings;
        self
    }

    #[must_use]
    pub fn with_movements(mut self, movements: u8) -> Self {
        self.movements = movements;
        self
    }

    #[must_use]
    pub fn with_rotations(mut self, rotations: u8) -> Self {
        self.rotations = rotations;
        self
    }

    #[must_use]
    pub fn with_scans(mut self, scans: u8) -> Self {
        self.scans = scans;
        self
    }

    #[must_use]
    pub fn with_signal(mut self, scope: SignalScope) -> Self {
        self.signals.push(scope);
        self
    }

    #[must_use]
    pub fn with_technology(mut self, category: Option<TechCategory>) -> Self {
        self.technologies.push(category);
        self
    }

    #[must_use]
    pub fn with_trace(mut self, color: Option<TraceColor>) -> Self {
        self.traces.push(color);
        self
    }

    #[must_use]
    pub fn with_revenue_raises(mut self, revenue_raises: u8) -> Self {
        self.revenue_raises = revenue_raises;
        self
    }

    #[must_use]
    pub fn with_species_tokens(mut self, species_tokens: u8) -> Self {
        self.species_tokens = species_tokens;
        self
    }

    #[must_use]
    pub fn with_species_cards(mut self, species_cards: u8) -> Self {
        self.species_cards = species_cards;
        self
    }

    #[must_use]
    pub fn with_media_or_moves(mut self, media_or_moves: u8) -> Self {
        self.media_or_moves = media_or_moves;
        self
    }

    #[must_use]
    pub fn with_data_or_cards(mut self, data_or_cards: u8) -> Self {
        self.data_or_cards = data_or_cards;
        self
    }

    #[must_use]
    pub fn ignoring_probe_limit(mut self) -> Self {
        self.ignore_probe_limit = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SectorColor;

    #[test]
    fn test_from_effects_folds_in_order() {
        let effects = vec![
            CardEffect::GainCredits { amount: 2 },
            CardEffect::GainMedia { amount: 1 },
            CardEffect::GainSignal { scope: SignalScope::Color(SectorColor::Red), amount: 2 },
            CardEffect::GainTechnology { category: None, amount: 1 },
            CardEffect::Unknown { code: "???".into() },
        ];

        let bonus = Bonus::from_effects(&effects);
        assert_eq!(bonus.credits, 2);
        assert_eq!(bonus.media, 1);
        assert_eq!(
            bonus.signals.as_slice(),
            &[SignalScope::Color(SectorColor::Red), SignalScope::Color(SectorColor::Red)],
        );
        assert_eq!(bonus.technologies.as_slice(), &[None]);
    }

    #[test]
    fn test_non_immediate_effects_are_skipped() {
        let effects = vec![
            CardEffect::ScorePerMedia { pv: 1 },
            CardEffect::LaunchDiscount { amount: 1 },
        ];
        assert!(Bonus::from_effects(&effects).is_empty());
    }

    #[test]
    fn test_is_empty() {
        assert!(Bonus::new().is_empty());
        assert!(!Bonus::new().with_media(1).is_empty());
        assert!(!Bonus::new().with_signal(SignalScope::Any).is_empty());
        assert!(!Bonus::new().ignoring_probe_limit().is_empty());
    }
}
