//! Player-initiated actions.
//!
//! Every action splits into `validate`, a pure check that reports all
//! violated rules at once, and `execute`, which assumes a validated
//! request and performs the mutation through the systems layer. The
//! engine refuses to execute anything whose validation carries errors,
//! so handlers never need to re-check and never panic on bad input.
//!
//! Warnings are advisory: they ride along in the [`Validation`] but do
//! not block execution.

pub mod analyze;
pub mod cards;
pub mod pass;
pub mod probes;
pub mod scan;
pub mod tech;

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

use crate::cards::CardLibrary;
use crate::core::{CardId, PlanetId, PlayerId, PositionId, ProbeId, ResourceKind, SectorId, TechId};
use crate::oracle::GeometryOracle;
use crate::state::Game;
use crate::systems::ExecutionContext;

/// Everything a player can ask the engine to do on their turn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Pay the launch cost and put a new probe at the launch position.
    LaunchProbe,
    /// Move an in-transit probe one step, paying the move cost.
    MoveProbe { probe: ProbeId, to: PositionId },
    /// Park an in-transit probe in an adjacent planet's orbit slot.
    OrbitProbe { probe: ProbeId, planet: PlanetId, slot: usize },
    /// Land an orbiting probe in a landing slot of its planet.
    LandProbe { probe: ProbeId, planet: PlanetId, slot: usize },
    /// Pay the scan cost and mark a signal in a sector.
    ScanSector { sector: SectorId },
    /// Convert data tokens into analysis-track progress.
    AnalyzeData { count: u8 },
    /// Pay media to take a row card into hand.
    BuyCard { slot: usize },
    /// Take a technology tile, gated by media level, paid in credits.
    ResearchTechnology { tech: TechId },
    /// Play a card from hand or reserve, paying its credit cost.
    PlayCard { card: CardId },
    /// Discard a hand card for its printed small action. Does not
    /// consume the main action.
    FreeAction { card: CardId },
    /// Give up the rest of the round.
    Pass,
}

impl Action {
    /// Does this action consume the turn's single main action?
    #[must_use]
    pub fn is_main(&self) -> bool {
        !matches!(self, Action::FreeAction { .. } | Action::Pass)
    }
}

/// Machine-readable reason attached to a [`RuleViolation`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    CannotLaunch,
    InsufficientCredits,
    InsufficientEnergy,
    InsufficientMedias,
    InsufficientData,
    ProbeLimitReached,
    UnknownProbe,
    NotProbeOwner,
    ProbeNotInTransit,
    ProbeNotOrbiting,
    UnreachablePosition,
    PlanetNotAdjacent,
    SlotOccupied,
    UnknownSlot,
    UnknownSector,
    SectorFull,
    CardNotInHand,
    EmptyRowSlot,
    UnknownTechnology,
    TechExhausted,
    MediaLevelTooLow,
    NothingToAnalyze,
    NoFreeAction,
    AlreadyPassed,
    UnusedFreeActions,
}

/// One violated (or advisory) rule: a stable code plus the French
/// message shown to the player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleViolation {
    pub code: ErrorCode,
    pub message: String,
}

impl RuleViolation {
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }
}

/// Outcome of validating one action. Errors block execution; warnings
/// do not.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation {
    pub errors: Vec<RuleViolation>,
    pub warnings: Vec<RuleViolation>,
}

impl Validation {
    #[must_use]
    pub fn ok() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&mut self, code: ErrorCode, message: impl Into<String>) {
        self.errors.push(RuleViolation::new(code, message));
    }

    pub fn warn(&mut self, code: ErrorCode, message: impl Into<String>) {
        self.warnings.push(RuleViolation::new(code, message));
    }
}

/// Validate `action` for `player`. Pure and repeatable.
#[must_use]
pub fn validate(
    game: &Game,
    library: &CardLibrary,
    oracle: &dyn GeometryOracle,
    player: PlayerId,
    action: &Action,
) -> Validation {
    let mut validation = Validation::ok();
    if game.player(player).has_passed {
        validation.error(ErrorCode::AlreadyPassed, "Vous avez déjà passé");
        return validation;
    }
    match action {
        Action::LaunchProbe => probes::validate_launch(game, player, &mut validation),
        Action::MoveProbe { probe, to } => {
            probes::validate_move(game, oracle, player, *probe, *to, &mut validation);
        }
        Action::OrbitProbe { probe, planet, slot } => {
            probes::validate_orbit(game, oracle, player, *probe, *planet, *slot, &mut validation);
        }
        Action::LandProbe { probe, planet, slot } => {
            probes::validate_land(game, player, *probe, *planet, *slot, &mut validation);
        }
        Action::ScanSector { sector } => scan::validate(game, player, *sector, &mut validation),
        Action::AnalyzeData { count } => analyze::validate(game, player, *count, &mut validation),
        Action::BuyCard { slot } => cards::validate_buy(game, player, *slot, &mut validation),
        Action::ResearchTechnology { tech } => {
            tech::validate(game, player, *tech, &mut validation);
        }
        Action::PlayCard { card } => {
            cards::validate_play(game, library, player, *card, &mut validation);
        }
        Action::FreeAction { card } => {
            cards::validate_free_action(game, library, player, *card, &mut validation);
        }
        Action::Pass => pass::validate(game, library, player, &mut validation),
    }
    validation
}

/// Execute a validated action. Main actions mark the turn's main action
/// as spent.
pub fn execute(game: &mut Game, player: PlayerId, action: &Action, ctx: &mut ExecutionContext) {
    match action {
        Action::LaunchProbe => probes::execute_launch(game, player, ctx),
        Action::MoveProbe { probe, to } => probes::execute_move(game, player, *probe, *to, ctx),
        Action::OrbitProbe { probe, planet, slot } => {
            probes::execute_orbit(game, player, *probe, *planet, *slot, ctx);
        }
        Action::LandProbe { probe, planet, slot } => {
            probes::execute_land(game, player, *probe, *planet, *slot, ctx);
        }
        Action::ScanSector { sector } => scan::execute(game, player, *sector, ctx),
        Action::AnalyzeData { count } => analyze::execute(game, player, *count, ctx),
        Action::BuyCard { slot } => cards::execute_buy(game, player, *slot, ctx),
        Action::ResearchTechnology { tech } => tech::execute(game, player, *tech, ctx),
        Action::PlayCard { card } => cards::execute_play(game, player, *card, ctx),
        Action::FreeAction { card } => cards::execute_free_action(game, player, *card, ctx),
        Action::Pass => pass::execute(game, player, ctx),
    }
    if action.is_main() {
        game.player_mut(player).has_performed_main_action = true;
    }
}

/// Log a resource payment when anything was actually paid.
pub(crate) fn log_spend(
    game: &Game,
    ctx: &mut ExecutionContext,
    player: PlayerId,
    kind: ResourceKind,
    amount: u8,
) {
    if amount == 0 {
        return;
    }
    let name = &game.player(player).name;
    ctx.log(player, format!("{name} dépense {}", kind.french(i64::from(amount))));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_action_classification() {
        assert!(Action::LaunchProbe.is_main());
        assert!(Action::ScanSector { sector: SectorId::new(0) }.is_main());
        assert!(!Action::FreeAction { card: CardId::new(1) }.is_main());
        assert!(!Action::Pass.is_main());
    }

    #[test]
    fn test_error_codes_screaming_snake() {
        let code: &'static str = ErrorCode::InsufficientMedias.into();
        assert_eq!(code, "INSUFFICIENT_MEDIAS");
        let code: &'static str = ErrorCode::ProbeLimitReached.into();
        assert_eq!(code, "PROBE_LIMIT_REACHED");
    }

    #[test]
    fn test_validation_blocks_on_errors_only() {
        let mut validation = Validation::ok();
        assert!(validation.is_ok());
        validation.warn(ErrorCode::UnusedFreeActions, "Des actions gratuites restent disponibles");
        assert!(validation.is_ok());
        validation.error(ErrorCode::InsufficientCredits, "Crédits insuffisants (Requis: 2)");
        assert!(!validation.is_ok());
        assert_eq!(validation.errors.len(), 1);
        assert_eq!(validation.warnings.len(), 1);
    }
}
