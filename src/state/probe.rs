//! Probes and where they are.

use serde::{Deserialize, Serialize};

use crate::core::{PlanetId, PlayerId, PositionId, ProbeId};

/// Where a probe currently sits.
///
/// Slot indices refer to the planet's orbit or landing slot lists; the
/// probe is the single source of truth for occupancy, so a slot is free
/// exactly when no probe points at it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProbeLocation {
    /// Flying through the sector map.
    InTransit { position: PositionId },
    /// Parked in a planet's orbit slot.
    Orbiting { planet: PlanetId, slot: usize },
    /// Landed in a planet's landing slot. Terminal.
    Landed { planet: PlanetId, slot: usize },
}

/// One probe in the entity arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Probe {
    pub id: ProbeId,
    pub owner: PlayerId,
    pub location: ProbeLocation,
}

impl Probe {
    #[must_use]
    pub fn new(id: ProbeId, owner: PlayerId, location: ProbeLocation) -> Self {
        Self { id, owner, location }
    }

    /// True while the probe can still be moved on the map.
    #[must_use]
    pub fn in_transit(&self) -> bool {
        matches!(self.location, ProbeLocation::InTransit { .. })
    }

    /// Planet this probe orbits, if any.
    #[must_use]
    pub fn orbiting(&self) -> Option<PlanetId> {
        match self.location {
            ProbeLocation::Orbiting { planet, .. } => Some(planet),
            _ => None,
        }
    }

    /// Planet this probe has landed on, if any.
    #[must_use]
    pub fn landed_on(&self) -> Option<PlanetId> {
        match self.location {
            ProbeLocation::Landed { planet, .. } => Some(planet),
            _ => None,
        }
    }
}
