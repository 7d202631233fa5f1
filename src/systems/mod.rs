//! Mutation systems.
//!
//! Action handlers and interaction resolution never poke the state
//! directly; they call the system functions in this tree, which perform
//! one well-defined mutation each, append their history lines and spawn
//! any follow-up interactions. Systems receive an [`ExecutionContext`]
//! carrying the read-only collaborators (card library, geometry oracle)
//! and the two output sinks (history, spawned interactions) plus the
//! sequence id of the causal chain being executed.

pub mod analysis;
pub mod cards;
pub mod missions;
pub mod probes;
pub mod scanning;
pub mod standing;
pub mod tech;
pub mod traces;

use crate::bonus::Bonus;
use crate::cards::CardLibrary;
use crate::core::{CardId, PlayerId, SequenceId};
use crate::history::HistoryEntry;
use crate::interaction::{Interaction, InteractionState};
use crate::oracle::GeometryOracle;
use crate::state::Game;

/// Collaborators and output sinks of one execution batch.
///
/// Everything a system emits lands here; the engine drains the sinks
/// into the match log and the interaction queue once the batch is done.
pub struct ExecutionContext<'a> {
    pub library: &'a CardLibrary,
    pub oracle: &'a dyn GeometryOracle,
    pub sequence: SequenceId,
    pub history: Vec<HistoryEntry>,
    pub interactions: Vec<Interaction>,
}

impl<'a> ExecutionContext<'a> {
    #[must_use]
    pub fn new(
        library: &'a CardLibrary,
        oracle: &'a dyn GeometryOracle,
        sequence: SequenceId,
    ) -> Self {
        Self { library, oracle, sequence, history: Vec::new(), interactions: Vec::new() }
    }

    /// Append one French log line for `player`.
    pub fn log(&mut self, player: PlayerId, message: impl Into<String>) {
        self.history.push(HistoryEntry::new(message, player, self.sequence));
    }

    /// Queue an interaction for `player`, stamped with this chain.
    pub fn spawn(&mut self, player: PlayerId, state: InteractionState) {
        self.interactions.push(Interaction::new(state, player, Some(self.sequence)));
    }

    /// Card name for history lines; falls back to the raw id for cards
    /// missing from the library.
    #[must_use]
    pub fn card_name(&self, card: CardId) -> String {
        match self.library.get(card) {
            Some(template) => template.name.clone(),
            None => card.to_string(),
        }
    }

    /// Apply a bonus to `game`, draining its log lines and follow-up
    /// interactions into this context's sinks.
    pub fn resolve_bonus(&mut self, game: &mut Game, player: PlayerId, bonus: &Bonus) {
        if bonus.is_empty() {
            return;
        }
        let outcome = crate::bonus::resolve(bonus, game, player, self.sequence);
        *game = outcome.game;
        self.history.extend(outcome.history);
        self.interactions.extend(outcome.interactions);
    }
}
