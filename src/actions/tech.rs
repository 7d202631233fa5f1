//! Technology research action.
//!
//! The media track gates access to higher tiers but is never spent for
//! them; only credits leave the player's pool.

use crate::actions::{log_spend, ErrorCode, Validation};
use crate::core::{PlayerId, ResourceKind, TechId};
use crate::state::Game;
use crate::systems::{standing, tech, ExecutionContext};

pub(crate) fn validate(game: &Game, player: PlayerId, tech: TechId, validation: &mut Validation) {
    let Some(slot) = game.board.tech(tech) else {
        validation.error(ErrorCode::UnknownTechnology, "Technologie inconnue");
        return;
    };
    if slot.remaining == 0 {
        validation.error(ErrorCode::TechExhausted, "Cette technologie est épuisée");
    }
    let tier = slot.tech.tier;
    let entry = game.player(player);
    if entry.media < tier {
        validation.error(
            ErrorCode::MediaLevelTooLow,
            format!("Niveau de médias insuffisant (Requis: {tier})"),
        );
    }
    let cost = credit_cost(game, player, tier);
    if entry.credits < cost {
        validation.error(
            ErrorCode::InsufficientCredits,
            format!("Crédits insuffisants (Requis: {cost})"),
        );
    }
}

pub(crate) fn execute(game: &mut Game, player: PlayerId, id: TechId, ctx: &mut ExecutionContext) {
    let tier = game.board.tech(id).map_or(0, |slot| slot.tech.tier);
    let cost = credit_cost(game, player, tier);
    game.player_mut(player).spend_credits(cost);
    log_spend(game, ctx, player, ResourceKind::Credits, cost);
    tech::research(game, player, id, ctx);
}

fn credit_cost(game: &Game, player: PlayerId, tier: u8) -> u8 {
    tier.saturating_sub(standing::discount(game, player, standing::CostKind::Tech))
}
