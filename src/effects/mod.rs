//! Card effect catalog.
//!
//! Every effect printed on a card normalizes to one [`CardEffect`] kind
//! with a typed payload. The catalog is closed: parsing can only ever
//! produce these variants, and a code it cannot understand becomes
//! [`CardEffect::Unknown`] rather than being dropped, so a bad card stays
//! inspectable in state dumps.
//!
//! Effects fall into four classes (see [`EffectClass`]):
//! - **Immediate**: one-shot grants resolved when the card is played.
//! - **Passive**: either a mission requirement checked against the
//!   owner's position, or an end-of-game scoring rule.
//! - **Permanent**: standing abilities that stay active once the card is
//!   in play (event-triggered gains, cost discounts).
//! - **Unknown**: the representable parse miss.

pub mod parser;

pub use parser::{parse_constraints, parse_immediate, ParseOutcome, ParseWarning};

use serde::{Deserialize, Serialize};

use crate::core::{ResourceKind, RevenueKind, SectorColor, TechCategory, TraceColor};

/// Which sectors qualify for a granted signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalScope {
    /// Any sector with an open signal slot.
    Any,
    /// Only sectors of the given color.
    Color(SectorColor),
    /// The sector printed on a card chosen from the owner's hand.
    Hand,
}

/// Broad classification of a [`CardEffect`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectClass {
    Immediate,
    Passive,
    Permanent,
    Unknown,
}

/// One normalized card effect.
///
/// Payload conventions: `amount` is a count of the granted thing,
/// `count`/`level` is a requirement threshold, `pv` is a score award.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardEffect {
    // === Immediate gains ===
    /// Gain media coverage, clamped at the cap.
    GainMedia { amount: u8 },
    GainCredits { amount: u8 },
    GainEnergy { amount: u8 },
    GainData { amount: u8 },
    /// Draw cards, one source choice (deck or row) per card.
    DrawCard { amount: u8 },
    /// Launch probes without paying the launch cost.
    FreeLaunch { amount: u8 },
    /// Probe movement steps that cost no energy.
    Movement { amount: u8 },
    /// Rotate a board ring one step per amount.
    Rotation { amount: u8 },
    /// Land an orbiting probe without paying the slot cost.
    FreeLanding { amount: u8 },
    /// Scan a sector without paying the scan cost.
    FreeScan { amount: u8 },
    /// Mark signals in qualifying sectors.
    GainSignal { scope: SignalScope, amount: u8 },
    /// Take technology tiles, optionally restricted to one category.
    GainTechnology { category: Option<TechCategory>, amount: u8 },
    /// Place life traces, optionally of a fixed color.
    GainLifeTrace { color: Option<TraceColor>, amount: u8 },

    // === Mission requirements ===
    /// A probe of the owner orbits or has landed on the named planet.
    VisitPlanet { planet: String, pv: u8 },
    OrbitPlanet { planet: String, pv: u8 },
    LandPlanet { planet: String, pv: u8 },
    SignalsMarked { color: SectorColor, count: u8, pv: u8 },
    SignalsAny { count: u8, pv: u8 },
    TechCount { category: TechCategory, count: u8, pv: u8 },
    TechTotal { count: u8, pv: u8 },
    MediaLevel { level: u8, pv: u8 },
    DataAnalyzed { count: u8, pv: u8 },
    TracesPlaced { color: TraceColor, count: u8, pv: u8 },
    /// At least one species discovered with the owner participating.
    SpeciesContact { pv: u8 },
    ProbesLaunched { count: u8, pv: u8 },
    Orbiters { count: u8, pv: u8 },
    Landers { count: u8, pv: u8 },
    PlayedSector { color: SectorColor, count: u8, pv: u8 },
    RevenueLevel { kind: RevenueKind, level: u8, pv: u8 },

    // === Scoring rules ===
    ScorePerMedia { pv: u8 },
    ScorePerTech { pv: u8 },
    ScorePerSignal { color: Option<SectorColor>, pv: u8 },
    ScorePerOrbiter { pv: u8 },
    ScorePerLander { pv: u8 },
    ScorePerTrace { pv: u8 },
    ScorePerPlayedSector { color: SectorColor, pv: u8 },
    ScorePerData { pv: u8 },

    // === Standing abilities ===
    GainOnLaunch { resource: ResourceKind, amount: u8 },
    GainOnOrbit { resource: ResourceKind, amount: u8 },
    GainOnLand { resource: ResourceKind, amount: u8 },
    GainOnScan { resource: ResourceKind, amount: u8 },
    GainOnAnalyze { resource: ResourceKind, amount: u8 },
    GainOnTech { resource: ResourceKind, amount: u8 },
    GainOnTrace { resource: ResourceKind, amount: u8 },
    GainOnDiscovery { resource: ResourceKind, amount: u8 },
    GainOnSignal { color: SectorColor, resource: ResourceKind, amount: u8 },
    GainOnPlay { color: SectorColor, resource: ResourceKind, amount: u8 },
    LaunchDiscount { amount: u8 },
    MoveDiscount { amount: u8 },
    ScanDiscount { amount: u8 },
    TechDiscount { amount: u8 },
    /// Raises the owner's probe limit.
    ExtraProbe { amount: u8 },

    // === Fallback ===
    /// A code the parser did not recognize. Kept verbatim for inspection;
    /// every consumer skips it.
    Unknown { code: String },
}

impl CardEffect {
    /// Classify this effect.
    #[must_use]
    pub fn class(&self) -> EffectClass {
        use CardEffect::*;
        match self {
            GainMedia { .. } | GainCredits { .. } | GainEnergy { .. } | GainData { .. }
            | DrawCard { .. } | FreeLaunch { .. } | Movement { .. } | Rotation { .. }
            | FreeLanding { .. } | FreeScan { .. } | GainSignal { .. }
            | GainTechnology { .. } | GainLifeTrace { .. } => EffectClass::Immediate,

            VisitPlanet { .. } | OrbitPlanet { .. } | LandPlanet { .. }
            | SignalsMarked { .. } | SignalsAny { .. } | TechCount { .. }
            | TechTotal { .. } | MediaLevel { .. } | DataAnalyzed { .. }
            | TracesPlaced { .. } | SpeciesContact { .. } | ProbesLaunched { .. }
            | Orbiters { .. } | Landers { .. } | PlayedSector { .. }
            | RevenueLevel { .. } | ScorePerMedia { .. } | ScorePerTech { .. }
            | ScorePerSignal { .. } | ScorePerOrbiter { .. } | ScorePerLander { .. }
            | ScorePerTrace { .. } | ScorePerPlayedSector { .. } | ScorePerData { .. } => {
                EffectClass::Passive
            }

            GainOnLaunch { .. } | GainOnOrbit { .. } | GainOnLand { .. }
            | GainOnScan { .. } | GainOnAnalyze { .. } | GainOnTech { .. }
            | GainOnTrace { .. } | GainOnDiscovery { .. } | GainOnSignal { .. }
            | GainOnPlay { .. } | LaunchDiscount { .. } | MoveDiscount { .. }
            | ScanDiscount { .. } | TechDiscount { .. } | ExtraProbe { .. } => {
                EffectClass::Permanent
            }

            Unknown { .. } => EffectClass::Unknown,
        }
    }

    /// Passive effects split into mission requirements and scoring rules;
    /// a played card's requirements become a [`Mission`](crate::state::Mission).
    #[must_use]
    pub fn is_mission_requirement(&self) -> bool {
        use CardEffect::*;
        matches!(
            self,
            VisitPlanet { .. }
                | OrbitPlanet { .. }
                | LandPlanet { .. }
                | SignalsMarked { .. }
                | SignalsAny { .. }
                | TechCount { .. }
                | TechTotal { .. }
                | MediaLevel { .. }
                | DataAnalyzed { .. }
                | TracesPlaced { .. }
                | SpeciesContact { .. }
                | ProbesLaunched { .. }
                | Orbiters { .. }
                | Landers { .. }
                | PlayedSector { .. }
                | RevenueLevel { .. }
        )
    }

    /// End-of-game scoring rules (the other half of the passive class).
    #[must_use]
    pub fn is_scoring_rule(&self) -> bool {
        self.class() == EffectClass::Passive && !self.is_mission_requirement()
    }

    /// Score award carried by a mission requirement.
    #[must_use]
    pub fn requirement_pv(&self) -> u8 {
        use CardEffect::*;
        match self {
            VisitPlanet { pv, .. } | OrbitPlanet { pv, .. } | LandPlanet { pv, .. }
            | SignalsMarked { pv, .. } | SignalsAny { pv, .. } | TechCount { pv, .. }
            | TechTotal { pv, .. } | MediaLevel { pv, .. } | DataAnalyzed { pv, .. }
            | TracesPlaced { pv, .. } | SpeciesContact { pv } | ProbesLaunched { pv, .. }
            | Orbiters { pv, .. } | Landers { pv, .. } | PlayedSector { pv, .. }
            | RevenueLevel { pv, .. } => *pv,
            _ => 0,
        }
    }

    /// Points per counted unit of a scoring rule.
    #[must_use]
    pub fn scoring_pv(&self) -> u8 {
        use CardEffect::*;
        match self {
            ScorePerMedia { pv, .. }
            | ScorePerTech { pv, .. }
            | ScorePerSignal { pv, .. }
            | ScorePerOrbiter { pv, .. }
            | ScorePerLander { pv, .. }
            | ScorePerTrace { pv, .. }
            | ScorePerPlayedSector { pv, .. }
            | ScorePerData { pv, .. } => *pv,
            _ => 0,
        }
    }
}
