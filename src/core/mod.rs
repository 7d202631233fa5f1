//! Core types: identifiers, shared vocabularies, deterministic RNG.
//!
//! Everything here is a small value type used throughout the engine.
//! Game structure lives in [`crate::state`], rules in [`crate::actions`].

pub mod ids;
pub mod resources;
pub mod rng;

pub use ids::{
    CardId, PlanetId, PlayerId, PositionId, ProbeId, SectorId, SequenceId, SpeciesId, TechId,
};
pub use resources::{
    GamePhase, MEDIA_MAX, ResourceKind, RevenueKind, Ring, SectorColor, TechCategory, TraceColor,
};
pub use rng::{GameRng, GameRngState};
