//! Geometry queries.
//!
//! The real celestial-position module lives outside this crate. The
//! engine only ever asks it four questions, captured by
//! [`GeometryOracle`]: where do probes launch, where can a probe move,
//! which planet is a position adjacent to, and which sky sector does a
//! position fly under. All queries are pure functions of the position
//! and the current ring rotation.
//!
//! [`RingOracle`] is the reference implementation used by setup and
//! tests: three concentric rings of eight positions each, radial edges
//! where ring bearings align, planets anchored at fixed bearings beyond
//! the outer ring.

use crate::core::{PlanetId, PositionId, Ring, SectorId};
use crate::state::RotationState;

/// External geometry contract. Implementations must be pure: the same
/// inputs always produce the same answers.
pub trait GeometryOracle: std::fmt::Debug + Send + Sync {
    /// Where a freshly launched probe appears.
    fn launch_position(&self, rotation: &RotationState) -> PositionId;

    /// Every position reachable from `from` within `moves` steps.
    /// Excludes `from` itself; order is unspecified but deterministic.
    fn reachable(&self, from: PositionId, moves: u8, rotation: &RotationState) -> Vec<PositionId>;

    /// The planet a probe at `position` could orbit, if any.
    fn adjacent_planet(&self, position: PositionId, rotation: &RotationState)
        -> Option<PlanetId>;

    /// The sky sector a position currently flies under, if any.
    fn sector_at(&self, position: PositionId, rotation: &RotationState) -> Option<SectorId>;
}

const SLOTS_PER_RING: u16 = 8;

/// Bearings (absolute eighths of the sky) where the five planets sit,
/// paired with their board ids in orbit order from the sun.
const PLANET_ANCHORS: [(u16, u8); 5] = [(0, 0), (1, 1), (3, 2), (5, 3), (6, 4)];

/// Reference geometry: rings `Inner`/`Middle`/`Outer`, positions encoded
/// as `ring * 8 + slot`. Rotating a ring shifts its slots against
/// absolute space; radial movement needs aligned bearings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RingOracle;

impl RingOracle {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn ring_of(position: PositionId) -> Option<Ring> {
        match position.raw() / SLOTS_PER_RING {
            0 => Some(Ring::Inner),
            1 => Some(Ring::Middle),
            2 => Some(Ring::Outer),
            _ => None,
        }
    }

    fn rotation_of(ring: Ring, rotation: &RotationState) -> u16 {
        u16::from(rotation.get(ring)) % SLOTS_PER_RING
    }

    /// Absolute bearing of a position once its ring's rotation applies.
    fn bearing(position: PositionId, rotation: &RotationState) -> Option<u16> {
        let ring = Self::ring_of(position)?;
        let slot = position.raw() % SLOTS_PER_RING;
        Some((slot + Self::rotation_of(ring, rotation)) % SLOTS_PER_RING)
    }

    /// Slot on `ring` currently sitting at absolute bearing `bearing`.
    fn slot_at_bearing(ring: Ring, bearing: u16, rotation: &RotationState) -> PositionId {
        let offset = Self::rotation_of(ring, rotation);
        let slot = (bearing + SLOTS_PER_RING - offset) % SLOTS_PER_RING;
        let base = match ring {
            Ring::Inner => 0,
            Ring::Middle => SLOTS_PER_RING,
            Ring::Outer => 2 * SLOTS_PER_RING,
        };
        PositionId::new(base + slot)
    }

    fn neighbors(position: PositionId, rotation: &RotationState) -> Vec<PositionId> {
        let Some(ring) = Self::ring_of(position) else {
            return Vec::new();
        };
        let raw = position.raw();
        let base = raw - raw % SLOTS_PER_RING;
        let slot = raw % SLOTS_PER_RING;

        let mut out = vec![
            PositionId::new(base + (slot + 1) % SLOTS_PER_RING),
            PositionId::new(base + (slot + SLOTS_PER_RING - 1) % SLOTS_PER_RING),
        ];
        // Radial edges exist only where bearings line up.
        if let Some(bearing) = Self::bearing(position, rotation) {
            match ring {
                Ring::Inner => {
                    out.push(Self::slot_at_bearing(Ring::Middle, bearing, rotation));
                }
                Ring::Middle => {
                    out.push(Self::slot_at_bearing(Ring::Inner, bearing, rotation));
                    out.push(Self::slot_at_bearing(Ring::Outer, bearing, rotation));
                }
                Ring::Outer => {
                    out.push(Self::slot_at_bearing(Ring::Middle, bearing, rotation));
                }
            }
        }
        out
    }
}

impl GeometryOracle for RingOracle {
    fn launch_position(&self, rotation: &RotationState) -> PositionId {
        Self::slot_at_bearing(Ring::Inner, 0, rotation)
    }

    fn reachable(&self, from: PositionId, moves: u8, rotation: &RotationState) -> Vec<PositionId> {
        if Self::ring_of(from).is_none() {
            return Vec::new();
        }
        let mut seen = vec![from];
        let mut frontier = vec![from];
        for _ in 0..moves {
            let mut next = Vec::new();
            for position in frontier {
                for neighbor in Self::neighbors(position, rotation) {
                    if !seen.contains(&neighbor) {
                        seen.push(neighbor);
                        next.push(neighbor);
                    }
                }
            }
            frontier = next;
        }
        seen.retain(|p| *p != from);
        seen.sort_unstable();
        seen
    }

    fn adjacent_planet(
        &self,
        position: PositionId,
        rotation: &RotationState,
    ) -> Option<PlanetId> {
        if Self::ring_of(position)? != Ring::Outer {
            return None;
        }
        let bearing = Self::bearing(position, rotation)?;
        PLANET_ANCHORS
            .iter()
            .find(|(anchor, _)| *anchor == bearing)
            .map(|(_, planet)| PlanetId::new(*planet))
    }

    fn sector_at(&self, position: PositionId, rotation: &RotationState) -> Option<SectorId> {
        if Self::ring_of(position)? != Ring::Outer {
            return None;
        }
        let bearing = Self::bearing(position, rotation)?;
        // Twelve sectors over eight bearings.
        Some(SectorId::new((bearing * 12 / SLOTS_PER_RING) as u8))
    }
}
