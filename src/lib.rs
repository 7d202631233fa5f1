//! # deepsky
//!
//! Rules engine for a competitive deep-space exploration board game.
//! Players launch probes onto a rotating ring map, scan sectors for
//! signals, analyze data, research technologies and follow life traces
//! until a species is discovered. The engine is the full referee: it
//! validates actions, executes them, narrates the game in French, and
//! can undo any of it.
//!
//! ## Design Principles
//!
//! 1. **The Engine Never Guesses**: any decision an effect leaves open
//!    (which card, which sector, which slot) becomes an explicit
//!    interaction the driver answers through [`Engine::resolve`].
//!
//! 2. **Persistent State**: game state uses `im` collections, so the
//!    snapshot taken before every action is an O(1) structural share,
//!    not a deep copy.
//!
//! 3. **Deterministic**: one seed drives every shuffle through named
//!    RNG streams. The same seed and the same actions replay the same
//!    game.
//!
//! ## Modules
//!
//! - `core`: identifiers, shared vocabularies, deterministic RNG
//! - `cards`: card model, library, card-list ingestion
//! - `effects`: effect catalog and the textual effect-code parser
//! - `state`: the `Game` aggregate (players, board, species, probes)
//! - `bonus`: turns effect bundles into resource gains and interactions
//! - `interaction`: mid-turn decision queue and choice resolution
//! - `actions`: validation and execution of player actions
//! - `systems`: board mutations, standing effects, missions
//! - `history`: the message log and the undo ledger
//! - `oracle`: ring geometry (launch position, reachability, adjacency)
//! - `engine`: the facade tying everything together

pub mod actions;
pub mod bonus;
pub mod cards;
pub mod core;
pub mod effects;
pub mod engine;
pub mod error;
pub mod history;
pub mod interaction;
pub mod oracle;
pub mod state;
pub mod systems;

// Re-export commonly used types
pub use crate::core::{
    CardId, GamePhase, GameRng, GameRngState, PlanetId, PlayerId, PositionId, ProbeId,
    ResourceKind, RevenueKind, Ring, SectorColor, SectorId, SequenceId, SpeciesId, TechCategory,
    TechId, TraceColor, MEDIA_MAX,
};

pub use crate::actions::{Action, ErrorCode, RuleViolation, Validation};

pub use crate::bonus::Bonus;

pub use crate::cards::{
    load_cards, Card, CardKind, CardLibrary, FreeActionKind, ImportReport, ImportWarning,
};

pub use crate::effects::{
    parse_constraints, parse_immediate, CardEffect, EffectClass, ParseOutcome, ParseWarning,
    SignalScope,
};

pub use crate::engine::Engine;

pub use crate::error::EngineError;

pub use crate::history::{HistoryEntry, Ledger, Snapshot};

pub use crate::interaction::{Choice, Interaction, InteractionQueue, InteractionState};

pub use crate::oracle::{GeometryOracle, RingOracle};

pub use crate::state::{Game, GameOptions, PlayerState};
