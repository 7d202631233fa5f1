//! Data analysis and the milestone track.
//!
//! Analyzing converts data tokens into progress on the analysis track.
//! The lifetime total only ever grows; milestones reward the first
//! crossing and never pay twice.

use crate::bonus::Bonus;
use crate::core::{PlayerId, ResourceKind};
use crate::state::Game;
use crate::systems::standing::{self, GameEvent};
use crate::systems::ExecutionContext;

/// Analyze `count` data tokens. The caller has checked the player owns
/// that many.
pub fn analyze(game: &mut Game, player: PlayerId, count: u8, ctx: &mut ExecutionContext) {
    if count == 0 {
        return;
    }
    let before = game.player(player).analyzed_data;
    let after = before.saturating_add(count);
    {
        let entry = game.player_mut(player);
        entry.spend_data(count);
        entry.analyzed_data = after;
    }

    let name = game.player(player).name.clone();
    ctx.log(player, format!("{name} analyse {}", ResourceKind::Data.french(i64::from(count))));

    let crossed: Vec<(u8, Bonus)> = game
        .board
        .milestones_crossed(before, after)
        .map(|m| (m.at, m.bonus.clone()))
        .collect();
    for (at, bonus) in crossed {
        ctx.log(player, format!("{name} atteint le palier d'analyse {at}"));
        ctx.resolve_bonus(game, player, &bonus);
    }

    standing::fire_event(game, player, &GameEvent::DataAnalyzed { count }, ctx);
}
