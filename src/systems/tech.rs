//! Technology research.

use crate::core::{PlayerId, TechId};
use crate::state::Game;
use crate::systems::standing::{self, GameEvent};
use crate::systems::ExecutionContext;

/// Take one technology tile from the market supply. The caller has
/// checked supply, media level and cost; the tile's printed bonus
/// resolves here and the research event fires.
pub fn research(game: &mut Game, player: PlayerId, tech: TechId, ctx: &mut ExecutionContext) {
    let Some(slot) = game.board.tech_mut(tech) else {
        return;
    };
    debug_assert!(slot.remaining > 0);
    slot.remaining = slot.remaining.saturating_sub(1);
    let tech_name = slot.tech.name.clone();
    let category = slot.tech.category;
    let bonus = slot.tech.bonus.clone();

    game.player_mut(player).technologies.push_back(tech);
    let name = game.player(player).name.clone();
    ctx.log(player, format!("{name} développe «{tech_name}» ({})", category.french()));

    ctx.resolve_bonus(game, player, &bonus);
    standing::fire_event(game, player, &GameEvent::TechnologyResearched { category }, ctx);
}
