//! Mid-turn interactions.
//!
//! Whenever an action or a bonus needs a decision the player has not made
//! yet (which card, which sector, which slot), it pushes an
//! [`InteractionState`] instead of guessing. The driver reads the current
//! interaction, asks its player, and feeds the answer back through
//! [`crate::engine::Engine::resolve`] until the queue runs dry and the
//! turn returns to [`InteractionState::Idle`].
//!
//! ## Queue discipline
//!
//! Exactly one interaction is current. Pushing a new one demotes the
//! previous current to the front of the pending queue, so nested chains
//! unwind innermost-first. Resolving the last one yields `Idle`.

pub mod resolve;

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{CardId, PlanetId, PlayerId, PositionId, ProbeId, RevenueKind, Ring, SectorId, SequenceId, SpeciesId, TechCategory, TechId, TraceColor};
use crate::effects::SignalScope;

/// One entry of a [`ChoosingBonusAction`](InteractionState::ChoosingBonusAction)
/// wrapper: a pending sub-interaction and whether it has been played out.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BonusOption {
    pub state: InteractionState,
    pub done: bool,
}

impl BonusOption {
    #[must_use]
    pub fn new(state: InteractionState) -> Self {
        Self { state, done: false }
    }
}

/// What the current player must resolve next.
///
/// Closed set; every consumer matches exhaustively so a new variant
/// cannot silently fall through. Counter pairs (`count`/`taken` and
/// friends) track multi-step interactions that consume several choices.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum InteractionState {
    /// No pending decision; main actions are legal.
    Idle,
    /// Several grants of one bonus wait; the player picks their order.
    ChoosingBonusAction { options: Vec<BonusOption> },
    /// Take cards, one at a time, from the deck top or the visible row.
    AcquiringCard { count: u8, taken: u8 },
    /// Set row cards aside into the reserve.
    ReservingCard { count: u8, taken: u8 },
    /// Discard hand cards; also enforces the round-end hand limit.
    DiscardingCard { count: u8, selected: SmallVec<[CardId; 2]> },
    /// Setup draft: keep `keep` of the offered cards.
    SelectingStartingCard { keep: u8, offered: Vec<CardId>, kept: Vec<CardId> },
    /// Free movement steps for own probes in transit.
    MovingProbe { moves: u8, moved: u8 },
    /// Free probe launches.
    LaunchingProbe { count: u8, launched: u8, ignore_limit: bool },
    /// Free landings for orbiting probes.
    LandingProbe { count: u8, placed: u8 },
    /// Free sector scans (cost waived, full scan effect).
    SelectingScanSector { count: u8, done: u8 },
    /// Mark signals; entry `placed` must satisfy `scopes[placed]`.
    MarkingSignal { scopes: SmallVec<[SignalScope; 2]>, placed: u8 },
    /// Pick a hand card with a scan sector; it is discarded and a signal
    /// of its color gets marked.
    GainingSignalFromHand,
    /// Place life traces on planet sites, any color when `color` is open.
    PlacingLifeTrace { count: u8, placed: u8, color: Option<TraceColor> },
    /// Pick technologies, restricted to `category` when set.
    ChoosingTechnology { count: u8, taken: u8, category: Option<TechCategory> },
    /// Rotate rings of the player's choice.
    PerformingRotation { count: u8, rotated: u8 },
    /// Raise income tracks of the player's choice.
    RaisingRevenue { count: u8, raised: u8 },
    /// Place contact tokens on discovered species' track slots.
    PlacingSpeciesToken { count: u8, placed: u8 },
    /// Draw from a discovered species' private deck.
    AcquiringSpeciesCard { count: u8, taken: u8 },
    /// Declinable prompt: one media or one free movement step.
    ChoosingMediaOrMove,
    /// Declinable prompt: one data or one card from the deck.
    ChoosingDataOrCard,
}

impl InteractionState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionState::Idle)
    }

    /// Have this variant's counters been satisfied?
    ///
    /// Single-shot variants report `false`; their resolution pops them
    /// explicitly.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        match self {
            InteractionState::Idle => true,
            InteractionState::ChoosingBonusAction { options } => {
                options.iter().all(|o| o.done)
            }
            InteractionState::AcquiringCard { count, taken }
            | InteractionState::ReservingCard { count, taken }
            | InteractionState::AcquiringSpeciesCard { count, taken }
            | InteractionState::ChoosingTechnology { count, taken, .. } => taken >= count,
            InteractionState::DiscardingCard { count, selected } => {
                selected.len() >= *count as usize
            }
            InteractionState::SelectingStartingCard { keep, kept, .. } => {
                kept.len() >= *keep as usize
            }
            InteractionState::MovingProbe { moves, moved } => moved >= moves,
            InteractionState::LaunchingProbe { count, launched, .. } => launched >= count,
            InteractionState::LandingProbe { count, placed }
            | InteractionState::PlacingLifeTrace { count, placed, .. }
            | InteractionState::PlacingSpeciesToken { count, placed } => placed >= count,
            InteractionState::SelectingScanSector { count, done } => done >= count,
            InteractionState::MarkingSignal { scopes, placed } => {
                *placed as usize >= scopes.len()
            }
            InteractionState::PerformingRotation { count, rotated } => rotated >= count,
            InteractionState::RaisingRevenue { count, raised } => raised >= count,
            InteractionState::GainingSignalFromHand
            | InteractionState::ChoosingMediaOrMove
            | InteractionState::ChoosingDataOrCard => false,
        }
    }

    /// May the player walk away from this interaction?
    #[must_use]
    pub fn declinable(&self) -> bool {
        matches!(
            self,
            InteractionState::ChoosingMediaOrMove
                | InteractionState::ChoosingDataOrCard
                | InteractionState::ChoosingBonusAction { .. }
        )
    }

    /// Short French label for drivers and history.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            InteractionState::Idle => "En attente",
            InteractionState::ChoosingBonusAction { .. } => "Choisir l'ordre des gains",
            InteractionState::AcquiringCard { .. } => "Acquérir une carte",
            InteractionState::ReservingCard { .. } => "Réserver une carte",
            InteractionState::DiscardingCard { .. } => "Défausser des cartes",
            InteractionState::SelectingStartingCard { .. } => "Choisir ses cartes de départ",
            InteractionState::MovingProbe { .. } => "Déplacer une sonde",
            InteractionState::LaunchingProbe { .. } => "Lancer une sonde",
            InteractionState::LandingProbe { .. } => "Faire atterrir une sonde",
            InteractionState::SelectingScanSector { .. } => "Scanner un secteur",
            InteractionState::MarkingSignal { .. } => "Marquer un signal",
            InteractionState::GainingSignalFromHand => "Marquer un signal depuis la main",
            InteractionState::PlacingLifeTrace { .. } => "Placer une trace de vie",
            InteractionState::ChoosingTechnology { .. } => "Choisir une technologie",
            InteractionState::PerformingRotation { .. } => "Tourner un anneau",
            InteractionState::RaisingRevenue { .. } => "Augmenter un revenu",
            InteractionState::PlacingSpeciesToken { .. } => "Placer un jeton de contact",
            InteractionState::AcquiringSpeciesCard { .. } => "Prendre une carte espèce",
            InteractionState::ChoosingMediaOrMove => "Choisir: 1 média ou 1 déplacement",
            InteractionState::ChoosingDataOrCard => "Choisir: 1 donnée ou 1 carte",
        }
    }
}

/// A queued interaction: the state plus who answers it and which action
/// chain spawned it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub state: InteractionState,
    pub player: PlayerId,
    pub sequence: Option<SequenceId>,
}

impl Interaction {
    #[must_use]
    pub fn new(state: InteractionState, player: PlayerId, sequence: Option<SequenceId>) -> Self {
        Self { state, player, sequence }
    }
}

static IDLE: InteractionState = InteractionState::Idle;

/// The pending-decision queue. One current interaction, FIFO behind it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractionQueue {
    current: Option<Interaction>,
    pending: Vector<Interaction>,
}

impl InteractionQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.current.is_none()
    }

    #[must_use]
    pub fn current(&self) -> Option<&Interaction> {
        self.current.as_ref()
    }

    /// The current interaction's state, `Idle` when the queue is empty.
    #[must_use]
    pub fn current_state(&self) -> &InteractionState {
        self.current.as_ref().map_or(&IDLE, |i| &i.state)
    }

    /// Interactions still waiting, the current one included.
    #[must_use]
    pub fn depth(&self) -> usize {
        usize::from(self.current.is_some()) + self.pending.len()
    }

    /// Make `interaction` current, demoting the previous current to the
    /// front of the pending queue.
    pub fn push(&mut self, interaction: Interaction) {
        if let Some(demoted) = self.current.replace(interaction) {
            self.pending.push_front(demoted);
        }
    }

    /// Queue a batch in order: the first entry becomes current, the rest
    /// wait behind it (and in front of anything already pending).
    pub fn enqueue_all(&mut self, interactions: Vec<Interaction>) {
        for interaction in interactions.into_iter().rev() {
            self.push(interaction);
        }
    }

    /// Drop the current interaction and promote the next pending one.
    /// Returns the new current, `None` when the queue went idle.
    pub fn finish_current(&mut self) -> Option<&Interaction> {
        self.current = self.pending.pop_front();
        self.current.as_ref()
    }

    /// Swap the current interaction's state (counter advancement).
    pub fn set_current_state(&mut self, state: InteractionState) {
        if let Some(current) = self.current.as_mut() {
            current.state = state;
        }
    }
}

// === Choices ===

/// A driver's answer to the current interaction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Choice {
    /// Take the top card of the relevant deck.
    TakeFromDeck,
    /// Take the card in this row slot.
    TakeFromRow { slot: usize },
    /// Designate one card (hand or offer, depending on the interaction).
    Card { card: CardId },
    /// Designate several cards at once.
    Cards { cards: Vec<CardId> },
    /// Move this probe to an adjacent reachable position.
    MoveProbe { probe: ProbeId, to: PositionId },
    /// Launch one probe at the standard launch position.
    Launch,
    /// Land an orbiting probe on a planet surface slot.
    Land { probe: ProbeId, planet: PlanetId, slot: usize },
    /// Designate a sky sector.
    Sector { sector: SectorId },
    /// Place a life trace on this planet.
    TraceSite { planet: PlanetId, color: TraceColor },
    /// Pick a technology tile.
    Technology { tech: TechId },
    /// Rotate this ring one step.
    Ring { ring: Ring },
    /// Raise this income track.
    Revenue { kind: RevenueKind },
    /// Enter option `index` of a bonus-order wrapper.
    BonusOption { index: usize },
    /// Claim a species track slot.
    SpeciesToken { species: SpeciesId, slot: usize },
    /// Designate a discovered species.
    Species { species: SpeciesId },
    /// First branch of a two-way prompt.
    First,
    /// Second branch of a two-way prompt.
    Second,
    /// Walk away from a declinable interaction.
    Decline,
}
