//! Per-player state.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::core::{CardId, RevenueKind, TechId, TraceColor, MEDIA_MAX};

/// Income rates paid out at round end.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRevenue {
    pub credits: u8,
    pub energy: u8,
    pub data: u8,
    pub card: u8,
}

impl PlayerRevenue {
    #[must_use]
    pub fn get(&self, kind: RevenueKind) -> u8 {
        match kind {
            RevenueKind::Credits => self.credits,
            RevenueKind::Energy => self.energy,
            RevenueKind::Data => self.data,
            RevenueKind::Card => self.card,
        }
    }

    pub fn raise(&mut self, kind: RevenueKind) {
        match kind {
            RevenueKind::Credits => self.credits += 1,
            RevenueKind::Energy => self.energy += 1,
            RevenueKind::Data => self.data += 1,
            RevenueKind::Card => self.card += 1,
        }
    }
}

/// Everything one player owns.
///
/// Card zones hold ids; the card vectors are `im` so cloning the whole
/// game for a snapshot shares structure instead of copying.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub name: String,
    pub credits: u8,
    pub energy: u8,
    /// Media coverage, always within `0..=MEDIA_MAX`.
    pub media: u8,
    /// Unanalyzed data tokens.
    pub data: u8,
    pub score: i16,
    pub revenue: PlayerRevenue,
    pub hand: Vector<CardId>,
    pub played: Vector<CardId>,
    pub reserved: Vector<CardId>,
    pub technologies: Vector<TechId>,
    /// Colors of the life traces this player has placed, in order.
    pub traces: Vector<TraceColor>,
    /// Lifetime total of analyzed data, the position on the data track.
    pub analyzed_data: u8,
    /// How many probes may be in play at once.
    pub probe_limit: u8,
    /// Lifetime launches, for missions.
    pub probes_launched: u8,
    pub has_passed: bool,
    pub has_performed_main_action: bool,
}

impl PlayerState {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            credits: 0,
            energy: 0,
            media: 0,
            data: 0,
            score: 0,
            revenue: PlayerRevenue::default(),
            hand: Vector::new(),
            played: Vector::new(),
            reserved: Vector::new(),
            technologies: Vector::new(),
            traces: Vector::new(),
            analyzed_data: 0,
            probe_limit: 0,
            probes_launched: 0,
            has_passed: false,
            has_performed_main_action: false,
        }
    }

    /// Gain media coverage, clamped at the cap. Returns what was actually
    /// gained; the excess is simply lost.
    pub fn gain_media(&mut self, amount: u8) -> u8 {
        let gained = amount.min(MEDIA_MAX - self.media);
        self.media += gained;
        gained
    }

    /// Spend media. Callers validate affordability first; spending more
    /// than owned is a bug upstream, so this saturates rather than wraps.
    pub fn spend_media(&mut self, amount: u8) {
        debug_assert!(self.media >= amount);
        self.media = self.media.saturating_sub(amount);
    }

    pub fn gain_credits(&mut self, amount: u8) {
        self.credits = self.credits.saturating_add(amount);
    }

    pub fn spend_credits(&mut self, amount: u8) {
        debug_assert!(self.credits >= amount);
        self.credits = self.credits.saturating_sub(amount);
    }

    pub fn gain_energy(&mut self, amount: u8) {
        self.energy = self.energy.saturating_add(amount);
    }

    pub fn spend_energy(&mut self, amount: u8) {
        debug_assert!(self.energy >= amount);
        self.energy = self.energy.saturating_sub(amount);
    }

    pub fn gain_data(&mut self, amount: u8) {
        self.data = self.data.saturating_add(amount);
    }

    pub fn spend_data(&mut self, amount: u8) {
        debug_assert!(self.data >= amount);
        self.data = self.data.saturating_sub(amount);
    }

    pub fn gain_score(&mut self, amount: i16) {
        self.score += amount;
    }

    /// Remove a card from the hand. Returns false when it was not there.
    pub fn remove_from_hand(&mut self, card: CardId) -> bool {
        match self.hand.index_of(&card) {
            Some(index) => {
                self.hand.remove(index);
                true
            }
            None => false,
        }
    }

    /// Number of traces of one color this player has placed.
    #[must_use]
    pub fn traces_of(&self, color: TraceColor) -> usize {
        self.traces.iter().filter(|&&c| c == color).count()
    }

    /// Reset the per-round flags at round start.
    pub fn start_round(&mut self) {
        self.has_passed = false;
        self.has_performed_main_action = false;
    }
}
