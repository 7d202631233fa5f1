//! Engine error type.

use thiserror::Error;

use crate::actions::Validation;
use crate::core::PlayerId;

/// Why the engine refused a request.
///
/// Rule rejections carry the full [`Validation`] so drivers can show
/// every violated rule at once; everything else is a protocol misuse by
/// the driver.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum EngineError {
    #[error("ce n'est pas le tour de {0}")]
    NotYourTurn(PlayerId),

    #[error("une interaction est en attente")]
    InteractionPending,

    #[error("aucune interaction en attente")]
    NoPendingInteraction,

    #[error("action refusée")]
    Rejected(Validation),

    #[error("choix refusé: {reason}")]
    ChoiceRejected { reason: String },

    #[error("rien à annuler")]
    NothingToUndo,

    #[error("la partie est terminée")]
    GameOver,
}

impl EngineError {
    /// Convenience constructor for choice rejections.
    #[must_use]
    pub fn rejected_choice(reason: impl Into<String>) -> Self {
        EngineError::ChoiceRejected { reason: reason.into() }
    }
}
