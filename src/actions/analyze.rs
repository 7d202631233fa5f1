//! Data analysis action.

use crate::actions::{ErrorCode, Validation};
use crate::core::PlayerId;
use crate::state::Game;
use crate::systems::{analysis, ExecutionContext};

pub(crate) fn validate(game: &Game, player: PlayerId, count: u8, validation: &mut Validation) {
    if count == 0 {
        validation.error(ErrorCode::NothingToAnalyze, "Aucune donnée à analyser");
        return;
    }
    let have = game.player(player).data;
    if have < count {
        validation.error(
            ErrorCode::InsufficientData,
            format!("Données insuffisantes (Requis: {count})"),
        );
    }
}

pub(crate) fn execute(game: &mut Game, player: PlayerId, count: u8, ctx: &mut ExecutionContext) {
    analysis::analyze(game, player, count, ctx);
}
