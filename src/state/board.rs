//! The shared board: sky sectors, planets, ring rotation, data track.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::bonus::Bonus;
use crate::core::{PlanetId, PlayerId, Ring, SectorColor, SectorId, TechCategory, TechId, TraceColor};

/// Orientation of the three rings, as raw step counters.
///
/// The geometry oracle applies its own modulo; the board just counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationState {
    pub inner: u8,
    pub middle: u8,
    pub outer: u8,
}

impl RotationState {
    #[must_use]
    pub fn get(&self, ring: Ring) -> u8 {
        match ring {
            Ring::Inner => self.inner,
            Ring::Middle => self.middle,
            Ring::Outer => self.outer,
        }
    }

    pub fn step(&mut self, ring: Ring) {
        match ring {
            Ring::Inner => self.inner = self.inner.wrapping_add(1),
            Ring::Middle => self.middle = self.middle.wrapping_add(1),
            Ring::Outer => self.outer = self.outer.wrapping_add(1),
        }
    }
}

/// One orbit or landing slot printed on a planet.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSpec {
    /// Energy paid to take the slot.
    pub cost: u8,
    /// Granted to the probe's owner on placement.
    pub bonus: Bonus,
}

impl SlotSpec {
    #[must_use]
    pub fn new(cost: u8, bonus: Bonus) -> Self {
        Self { cost, bonus }
    }
}

/// A sky sector with a limited number of signal slots.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sector {
    pub id: SectorId,
    pub color: SectorColor,
    /// Total signal slots.
    pub slots: u8,
    /// Who has marked a signal here, in claim order.
    pub marks: Vector<PlayerId>,
    /// Granted to whoever marks first.
    pub first_bonus: Bonus,
    /// Granted to later markers.
    pub next_bonus: Bonus,
}

impl Sector {
    /// Signal slots still open.
    #[must_use]
    pub fn open_slots(&self) -> u8 {
        self.slots.saturating_sub(self.marks.len() as u8)
    }

    /// The bonus the next marker would claim.
    #[must_use]
    pub fn claim_bonus(&self) -> &Bonus {
        if self.marks.is_empty() {
            &self.first_bonus
        } else {
            &self.next_bonus
        }
    }
}

/// A life trace sitting on a planet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedTrace {
    pub player: PlayerId,
    pub color: TraceColor,
}

/// A planet with orbit and landing slots.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Planet {
    pub id: PlanetId,
    pub name: String,
    pub orbit_slots: Vec<SlotSpec>,
    pub landing_slots: Vec<SlotSpec>,
    /// How many life traces fit here.
    pub trace_capacity: u8,
    pub traces: Vector<PlacedTrace>,
}

impl Planet {
    /// Room left for another life trace.
    #[must_use]
    pub fn trace_room(&self) -> bool {
        (self.traces.len() as u8) < self.trace_capacity
    }
}

/// One milestone on the data-analysis track.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisMilestone {
    /// Lifetime analyzed-data total that triggers the milestone.
    pub at: u8,
    pub bonus: Bonus,
}

/// A technology tile definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technology {
    pub id: TechId,
    pub name: String,
    pub category: TechCategory,
    /// Media level required to research it; also its credit cost.
    pub tier: u8,
    pub bonus: Bonus,
}

/// A technology on the market with its remaining supply.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechSlot {
    pub tech: Technology,
    pub remaining: u8,
}

/// The shared board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub sectors: Vector<Sector>,
    pub planets: Vector<Planet>,
    pub rotation: RotationState,
    pub analysis_milestones: Vec<AnalysisMilestone>,
    pub techs: Vector<TechSlot>,
}

impl Board {
    /// The standard competitive layout: twelve sectors in three colors,
    /// five planets, five data milestones.
    #[must_use]
    pub fn standard() -> Self {
        let colors = [SectorColor::Red, SectorColor::Yellow, SectorColor::Blue];
        let sectors: Vector<Sector> = (0..12u8)
            .map(|i| Sector {
                id: SectorId::new(i),
                color: colors[(i % 3) as usize],
                slots: 2 + (i % 2),
                marks: Vector::new(),
                first_bonus: Bonus::new().with_data(1).with_media(1),
                next_bonus: Bonus::new().with_data(1),
            })
            .collect();

        let planets: Vector<Planet> = [
            planet(0, "Mars", &[(1, 2), (1, 1)], &[(1, 3), (1, 2)], 3),
            planet(1, "Jupiter", &[(1, 2), (2, 1), (2, 1)], &[(2, 4)], 2),
            planet(2, "Saturne", &[(1, 2), (2, 1), (2, 1)], &[(2, 4)], 2),
            planet(3, "Uranus", &[(2, 2), (2, 2)], &[(3, 5)], 1),
            planet(4, "Neptune", &[(2, 2), (2, 2)], &[(3, 5)], 1),
        ]
        .into_iter()
        .collect();

        let analysis_milestones = vec![
            AnalysisMilestone { at: 2, bonus: Bonus::new().with_media(1) },
            AnalysisMilestone { at: 4, bonus: Bonus::new().with_cards(1) },
            AnalysisMilestone { at: 6, bonus: Bonus::new().with_pv(2) },
            AnalysisMilestone { at: 8, bonus: Bonus::new().with_signal(crate::effects::SignalScope::Any) },
            AnalysisMilestone { at: 10, bonus: Bonus::new().with_pv(3) },
        ];

        let techs: Vector<TechSlot> = [
            tech(0, "Algorithmes", TechCategory::Computing, 1, Bonus::new().with_data(1)),
            tech(1, "Réseau neuronal", TechCategory::Computing, 2, Bonus::new().with_data_or_cards(1)),
            tech(2, "Voile solaire", TechCategory::Propulsion, 1, Bonus::new().with_movements(1)),
            tech(3, "Moteur ionique", TechCategory::Propulsion, 2, Bonus::new().with_launches(1)),
            tech(4, "Interféromètre", TechCategory::Observation, 1, Bonus::new().with_scans(1)),
            tech(5, "Spectrographe", TechCategory::Observation, 2, Bonus::new().with_media_or_moves(1)),
            tech(6, "Antenne relais", TechCategory::Communication, 1, Bonus::new().with_media(1)),
            tech(7, "Réseau d'écoute", TechCategory::Communication, 2, Bonus::new().with_signal(crate::effects::SignalScope::Any)),
        ]
        .into_iter()
        .collect();

        Self {
            sectors,
            planets,
            rotation: RotationState::default(),
            analysis_milestones,
            techs,
        }
    }

    #[must_use]
    pub fn sector(&self, id: SectorId) -> Option<&Sector> {
        self.sectors.get(id.raw() as usize)
    }

    pub fn sector_mut(&mut self, id: SectorId) -> Option<&mut Sector> {
        self.sectors.get_mut(id.raw() as usize)
    }

    #[must_use]
    pub fn planet(&self, id: PlanetId) -> Option<&Planet> {
        self.planets.get(id.raw() as usize)
    }

    pub fn planet_mut(&mut self, id: PlanetId) -> Option<&mut Planet> {
        self.planets.get_mut(id.raw() as usize)
    }

    /// Case-insensitive planet lookup, used by mission requirements that
    /// name planets textually.
    #[must_use]
    pub fn planet_by_name(&self, name: &str) -> Option<&Planet> {
        self.planets.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Milestones crossed when a lifetime total moves from `before`
    /// (exclusive) to `after` (inclusive).
    pub fn milestones_crossed(&self, before: u8, after: u8) -> impl Iterator<Item = &AnalysisMilestone> {
        self.analysis_milestones
            .iter()
            .filter(move |m| before < m.at && m.at <= after)
    }

    #[must_use]
    pub fn tech(&self, id: TechId) -> Option<&TechSlot> {
        self.techs.iter().find(|slot| slot.tech.id == id)
    }

    pub fn tech_mut(&mut self, id: TechId) -> Option<&mut TechSlot> {
        self.techs.iter_mut().find(|slot| slot.tech.id == id)
    }
}

fn tech(id: u8, name: &str, category: TechCategory, tier: u8, bonus: Bonus) -> TechSlot {
    TechSlot {
        tech: Technology { id: TechId::new(id), name: name.to_string(), category, tier, bonus },
        remaining: 2,
    }
}

fn planet(
    id: u8,
    name: &str,
    orbits: &[(u8, u8)],
    landings: &[(u8, u8)],
    trace_capacity: u8,
) -> Planet {
    Planet {
        id: PlanetId::new(id),
        name: name.to_string(),
        orbit_slots: orbits
            .iter()
            .map(|&(cost, pv)| SlotSpec::new(cost, Bonus::new().with_pv(pv)))
            .collect(),
        landing_slots: landings
            .iter()
            .map(|&(cost, pv)| SlotSpec::new(cost, Bonus::new().with_pv(pv).with_data(1)))
            .collect(),
        trace_capacity,
        traces: Vector::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_layout() {
        let board = Board::standard();
        assert_eq!(board.sectors.len(), 12);
        assert_eq!(board.planets.len(), 5);
        assert_eq!(board.techs.len(), 8);
        assert!(board.planet_by_name("mars").is_some());
        assert!(board.planet_by_name("SATURNE").is_some());
        assert!(board.planet_by_name("pluton").is_none());
    }

    #[test]
    fn test_tech_lookup_and_supply() {
        let mut board = Board::standard();
        let id = TechId::new(4);

        assert_eq!(board.tech(id).unwrap().tech.category, TechCategory::Observation);
        board.tech_mut(id).unwrap().remaining = 0;
        assert_eq!(board.tech(id).unwrap().remaining, 0);
        assert!(board.tech(TechId::new(99)).is_none());
    }

    #[test]
    fn test_sector_claim_bonus_switches_after_first_mark() {
        let mut board = Board::standard();
        let id = SectorId::new(0);

        let sector = board.sector(id).unwrap();
        assert_eq!(sector.claim_bonus(), &Bonus::new().with_data(1).with_media(1));
        assert_eq!(sector.open_slots(), 2);

        board.sector_mut(id).unwrap().marks.push_back(PlayerId::new(0));
        let sector = board.sector(id).unwrap();
        assert_eq!(sector.claim_bonus(), &Bonus::new().with_data(1));
        assert_eq!(sector.open_slots(), 1);
    }

    #[test]
    fn test_milestones_crossed_is_half_open() {
        let board = Board::standard();

        let crossed: Vec<u8> = board.milestones_crossed(0, 4).map(|m| m.at).collect();
        assert_eq!(crossed, vec![2, 4]);

        let crossed: Vec<u8> = board.milestones_crossed(4, 5).map(|m| m.at).collect();
        assert!(crossed.is_empty());

        let crossed: Vec<u8> = board.milestones_crossed(5, 6).map(|m| m.at).collect();
        assert_eq!(crossed, vec![6]);
    }

    #[test]
    fn test_rotation_steps_one_ring_at_a_time() {
        let mut rotation = RotationState::default();
        rotation.step(Ring::Middle);
        rotation.step(Ring::Middle);
        rotation.step(Ring::Outer);

        assert_eq!(rotation.get(Ring::Inner), 0);
        assert_eq!(rotation.get(Ring::Middle), 2);
        assert_eq!(rotation.get(Ring::Outer), 1);
    }
}
