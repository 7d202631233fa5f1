//! Closed vocabularies shared across the engine.
//!
//! Resources, sector and trace colors, technology categories and revenue
//! kinds are all small closed enums. The effect parser matches textual
//! card codes against these via their lowercase `strum` forms, and history
//! messages use the French labels.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Media coverage is capped at this level; every gain clamps and the
/// excess is discarded.
pub const MEDIA_MAX: u8 = 10;

/// A scalar resource a player can gain or spend.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize,
    Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum ResourceKind {
    /// Canonical code token is the singular form.
    #[strum(serialize = "credit")]
    Credits,
    Energy,
    Media,
    Data,
    Card,
    #[strum(serialize = "pv")]
    Score,
}

impl ResourceKind {
    /// French label with naive pluralization, for history messages.
    #[must_use]
    pub fn french(self, amount: i64) -> String {
        let plural = amount > 1 || amount < -1;
        match self {
            ResourceKind::Credits => {
                if plural { format!("{amount} crédits") } else { format!("{amount} crédit") }
            }
            ResourceKind::Energy => {
                if plural { format!("{amount} énergies") } else { format!("{amount} énergie") }
            }
            ResourceKind::Media => {
                if plural { format!("{amount} médias") } else { format!("{amount} média") }
            }
            ResourceKind::Data => {
                if plural { format!("{amount} données") } else { format!("{amount} donnée") }
            }
            ResourceKind::Card => {
                if plural { format!("{amount} cartes") } else { format!("{amount} carte") }
            }
            ResourceKind::Score => format!("{amount} PV"),
        }
    }
}

/// Color of a sky sector, and of the scan icon printed on cards.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize,
    Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum SectorColor {
    Red,
    Yellow,
    Blue,
}

impl SectorColor {
    /// French label for history messages.
    #[must_use]
    pub fn french(self) -> &'static str {
        match self {
            SectorColor::Red => "rouge",
            SectorColor::Yellow => "jaune",
            SectorColor::Blue => "bleu",
        }
    }
}

/// Color of a life trace. Three traces of one color discover the species
/// of that color.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize,
    Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum TraceColor {
    Red,
    Yellow,
    Blue,
}

impl TraceColor {
    /// French label for history messages.
    #[must_use]
    pub fn french(self) -> &'static str {
        match self {
            TraceColor::Red => "rouge",
            TraceColor::Yellow => "jaune",
            TraceColor::Blue => "bleue",
        }
    }
}

/// Technology tile category.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize,
    Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum TechCategory {
    Computing,
    Propulsion,
    Observation,
    Communication,
}

impl TechCategory {
    /// French label for history messages.
    #[must_use]
    pub fn french(self) -> &'static str {
        match self {
            TechCategory::Computing => "informatique",
            TechCategory::Propulsion => "propulsion",
            TechCategory::Observation => "observation",
            TechCategory::Communication => "communication",
        }
    }
}

/// An income track printed on cards; raised rates pay out at round end.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize,
    Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum RevenueKind {
    Credits,
    Energy,
    Data,
    Card,
}

impl RevenueKind {
    /// French label for history messages.
    #[must_use]
    pub fn french(self) -> &'static str {
        match self {
            RevenueKind::Credits => "crédits",
            RevenueKind::Energy => "énergie",
            RevenueKind::Data => "données",
            RevenueKind::Card => "cartes",
        }
    }
}

/// One of the three concentric, rotating board rings.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize,
    Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum Ring {
    Inner,
    Middle,
    Outer,
}

impl Ring {
    /// French label for history messages.
    #[must_use]
    pub fn french(self) -> &'static str {
        match self {
            Ring::Inner => "intérieur",
            Ring::Middle => "médian",
            Ring::Outer => "extérieur",
        }
    }
}

/// Lifecycle phase of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    Setup,
    Running,
    Ended,
}
