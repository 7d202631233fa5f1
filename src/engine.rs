//! The engine facade.
//!
//! [`Engine`] owns everything a running match needs: the [`Game`] state,
//! the interaction queue, the message history, the undo ledger, the card
//! library and the geometry oracle. Drivers talk to it through four
//! verbs:
//!
//! - [`validate`](Engine::validate) previews an action without touching
//!   state,
//! - [`perform`](Engine::perform) runs a validated action for the player
//!   whose turn it is,
//! - [`resolve`](Engine::resolve) answers the current interaction,
//! - [`undo`](Engine::undo) rolls back to the last action boundary.
//!
//! `perform` snapshots before executing, so one undo step always rewinds
//! a whole action together with every interaction it spawned.

use crate::actions::{self, Action, Validation};
use crate::cards::CardLibrary;
use crate::core::{GamePhase, PlayerId, SequenceId};
use crate::error::EngineError;
use crate::history::{HistoryEntry, Ledger, Snapshot};
use crate::interaction::resolve::resolve_choice;
use crate::interaction::{Choice, Interaction, InteractionQueue, InteractionState};
use crate::oracle::{GeometryOracle, RingOracle};
use crate::state::{Game, GameOptions};
use crate::systems::standing::{self, StandingKind};
use crate::systems::{missions, ExecutionContext};

/// Rules engine for one match.
#[derive(Debug)]
pub struct Engine {
    game: Game,
    queue: InteractionQueue,
    ledger: Ledger,
    history: Vec<HistoryEntry>,
    library: CardLibrary,
    oracle: Box<dyn GeometryOracle>,
    sequence: SequenceId,
}

impl Engine {
    /// Set up a match. With `draft_starting_hand` the game opens in
    /// [`GamePhase::Setup`] and every seat first picks its starting
    /// cards from an offer of `starting_hand + 2`; otherwise hands are
    /// dealt and play begins immediately.
    #[must_use]
    pub fn new(names: &[&str], library: CardLibrary, options: GameOptions) -> Self {
        let mut game = Game::new(names, &library, options);
        let mut queue = InteractionQueue::new();
        let mut sequence = SequenceId::new(0);

        if game.options.draft_starting_hand {
            game.phase = GamePhase::Setup;
            sequence = sequence.next();
            let keep = game.options.starting_hand as u8;
            let offer = game.options.starting_hand + 2;
            let mut drafts = Vec::with_capacity(game.player_count());
            for player in PlayerId::all(game.player_count()) {
                let mut offered = Vec::with_capacity(offer);
                for _ in 0..offer {
                    if let Some(card) = game.draw_from_deck() {
                        offered.push(card);
                    }
                }
                drafts.push(Interaction::new(
                    InteractionState::SelectingStartingCard { keep, offered, kept: Vec::new() },
                    player,
                    Some(sequence),
                ));
            }
            queue.enqueue_all(drafts);
        }

        Self {
            game,
            queue,
            ledger: Ledger::new(),
            history: Vec::new(),
            library,
            oracle: Box::new(RingOracle::new()),
            sequence,
        }
    }

    /// Resume a saved game at an action boundary (no interaction open).
    /// The undo ledger does not survive a save; undo becomes available
    /// again after the next action.
    #[must_use]
    pub fn resume(game: Game, library: CardLibrary) -> Self {
        Self {
            game,
            queue: InteractionQueue::new(),
            ledger: Ledger::new(),
            history: Vec::new(),
            library,
            oracle: Box::new(RingOracle::new()),
            sequence: SequenceId::new(0),
        }
    }

    /// Replace the geometry oracle before play starts.
    #[must_use]
    pub fn with_oracle(mut self, oracle: Box<dyn GeometryOracle>) -> Self {
        self.oracle = oracle;
        self
    }

    // === Read access ===

    #[must_use]
    pub fn game(&self) -> &Game {
        &self.game
    }

    #[must_use]
    pub fn library(&self) -> &CardLibrary {
        &self.library
    }

    /// Every message logged so far, oldest first.
    #[must_use]
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// The interaction waiting on an answer, or `Idle`.
    #[must_use]
    pub fn current_interaction(&self) -> &InteractionState {
        self.queue.current_state()
    }

    /// Who has to answer before play can continue.
    #[must_use]
    pub fn pending_player(&self) -> Option<PlayerId> {
        self.queue.current().map(|interaction| interaction.player)
    }

    /// Current plus queued interactions.
    #[must_use]
    pub fn pending_interactions(&self) -> usize {
        self.queue.depth()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.ledger.is_empty()
    }

    // === The four verbs ===

    /// Check `action` for `player` without changing anything.
    #[must_use]
    pub fn validate(&self, player: PlayerId, action: &Action) -> Validation {
        actions::validate(&self.game, &self.library, self.oracle.as_ref(), player, action)
    }

    /// Run one action for the player whose turn it is.
    ///
    /// Refused while the game is over, while an interaction is pending,
    /// out of turn, or when validation reports errors. On success the
    /// pre-action state is recorded for [`undo`](Engine::undo) and the
    /// turn advances as soon as no interaction is left open.
    pub fn perform(&mut self, player: PlayerId, action: &Action) -> Result<(), EngineError> {
        if self.game.phase == GamePhase::Ended {
            return Err(EngineError::GameOver);
        }
        if !self.queue.is_idle() {
            return Err(EngineError::InteractionPending);
        }
        if player != self.game.current_player {
            return Err(EngineError::NotYourTurn(player));
        }
        let validation = self.validate(player, action);
        if !validation.is_ok() {
            return Err(EngineError::Rejected(validation));
        }

        self.ledger.record(Snapshot {
            game: self.game.clone(),
            queue: self.queue.clone(),
            sequence: self.sequence,
            history_len: self.history.len(),
        });
        self.sequence = self.sequence.next();

        let mut ctx = ExecutionContext::new(&self.library, self.oracle.as_ref(), self.sequence);
        actions::execute(&mut self.game, player, action, &mut ctx);
        missions::refresh(&mut self.game, &mut ctx);

        let round_before = self.game.round;
        advance_if_ready(&mut self.game, &self.queue, &mut ctx);
        if self.game.round != round_before {
            // Round-end revenue may have satisfied a mission.
            missions::refresh(&mut self.game, &mut ctx);
        }

        self.history.append(&mut ctx.history);
        self.queue.enqueue_all(ctx.interactions);
        Ok(())
    }

    /// Answer the current interaction with `choice`.
    ///
    /// Runs under the sequence of the action that spawned the
    /// interaction, so a later undo removes both together. A rejected
    /// choice leaves the engine untouched.
    pub fn resolve(&mut self, choice: &Choice) -> Result<(), EngineError> {
        if self.game.phase == GamePhase::Ended {
            return Err(EngineError::GameOver);
        }
        let sequence = self
            .queue
            .current()
            .and_then(|interaction| interaction.sequence)
            .unwrap_or(self.sequence);

        let mut ctx = ExecutionContext::new(&self.library, self.oracle.as_ref(), sequence);
        resolve_choice(&mut self.game, &mut self.queue, choice, &mut ctx)?;
        missions::refresh(&mut self.game, &mut ctx);

        if self.game.phase == GamePhase::Setup
            && self.queue.is_idle()
            && ctx.interactions.is_empty()
        {
            self.game.phase = GamePhase::Running;
            let starter = self.game.starting_player;
            let name = self.game.player(starter).name.clone();
            ctx.log(starter, format!("La partie commence, {name} joue en premier"));
        }

        let round_before = self.game.round;
        advance_if_ready(&mut self.game, &self.queue, &mut ctx);
        if self.game.round != round_before {
            missions::refresh(&mut self.game, &mut ctx);
        }

        self.history.append(&mut ctx.history);
        self.queue.enqueue_all(ctx.interactions);
        Ok(())
    }

    /// Roll back to the state before the last performed action. Every
    /// interaction and history line that action produced disappears with
    /// it.
    pub fn undo(&mut self) -> Result<(), EngineError> {
        let Some(snapshot) = self.ledger.pop() else {
            return Err(EngineError::NothingToUndo);
        };
        self.game = snapshot.game;
        self.queue = snapshot.queue;
        self.sequence = snapshot.sequence;
        self.history.truncate(snapshot.history_len);
        Ok(())
    }

    // === Scoring ===

    /// Final score per seat: live score, every scoring rule the player
    /// has in play, and one point per three leftover credits, energy or
    /// data. Media and hand cards score nothing.
    #[must_use]
    pub fn final_scores(&self) -> Vec<i16> {
        PlayerId::all(self.game.player_count())
            .map(|player| {
                let entry = self.game.player(player);
                let mut total = entry.score;
                for effect in &self.game.standing {
                    if effect.owner != player {
                        continue;
                    }
                    if let StandingKind::Scoring { rule } = &effect.kind {
                        total += standing::scoring_value(&self.game, &self.library, player, rule);
                    }
                }
                let leftovers =
                    u16::from(entry.credits) + u16::from(entry.energy) + u16::from(entry.data);
                total + (leftovers / 3) as i16
            })
            .collect()
    }
}

/// Hand the turn to the next seat once the current player is done, or
/// close the round when everyone has passed. Waits until the queue and
/// the interactions still in flight have drained.
fn advance_if_ready(game: &mut Game, queue: &InteractionQueue, ctx: &mut ExecutionContext) {
    if game.phase != GamePhase::Running {
        return;
    }
    if !queue.is_idle() || !ctx.interactions.is_empty() {
        return;
    }
    let current = game.current_player;
    let entry = game.player(current);
    if !entry.has_passed && !entry.has_performed_main_action {
        return;
    }
    if game.all_passed() {
        actions::pass::round_end(game, ctx);
        return;
    }
    let count = game.player_count();
    let mut seat = (current.index() + 1) % count;
    while game.player(PlayerId::new(seat as u8)).has_passed {
        seat = (seat + 1) % count;
    }
    let next = PlayerId::new(seat as u8);
    game.current_player = next;
    game.player_mut(next).has_performed_main_action = false;
}
