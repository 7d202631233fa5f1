//! Card action handlers: buy from the row, play, free actions.

use crate::actions::{log_spend, ErrorCode, Validation};
use crate::bonus::Bonus;
use crate::cards::{CardLibrary, FreeActionKind};
use crate::core::{CardId, PlayerId, ResourceKind};
use crate::state::Game;
use crate::systems::standing::GameEvent;
use crate::systems::{cards, missions, standing, ExecutionContext};

pub(crate) fn validate_buy(game: &Game, player: PlayerId, slot: usize, validation: &mut Validation) {
    if game.row.get(slot).is_none() {
        validation.error(ErrorCode::EmptyRowSlot, "Cet emplacement de la rivière est vide");
    }
    let cost = game.options.buy_media_cost;
    if game.player(player).media < cost {
        validation.error(
            ErrorCode::InsufficientMedias,
            format!("Médias insuffisants (Requis: {cost})"),
        );
    }
}

pub(crate) fn execute_buy(game: &mut Game, player: PlayerId, slot: usize, ctx: &mut ExecutionContext) {
    let cost = game.options.buy_media_cost;
    game.player_mut(player).spend_media(cost);
    log_spend(game, ctx, player, ResourceKind::Media, cost);
    cards::take_row_card(game, player, slot, ctx);
}

pub(crate) fn validate_play(
    game: &Game,
    library: &CardLibrary,
    player: PlayerId,
    card: CardId,
    validation: &mut Validation,
) {
    let entry = game.player(player);
    if !entry.hand.contains(&card) && !entry.reserved.contains(&card) {
        validation.error(ErrorCode::CardNotInHand, "Cette carte n'est pas dans votre main");
    }
    let cost = library.get(card).map_or(0, |c| c.cost);
    if entry.credits < cost {
        validation.error(
            ErrorCode::InsufficientCredits,
            format!("Crédits insuffisants (Requis: {cost})"),
        );
    }
}

pub(crate) fn execute_play(game: &mut Game, player: PlayerId, card: CardId, ctx: &mut ExecutionContext) {
    let Some(spec) = ctx.library.get(card) else {
        return;
    };
    {
        let entry = game.player_mut(player);
        if !entry.remove_from_hand(card) {
            match entry.reserved.index_of(&card) {
                Some(index) => {
                    entry.reserved.remove(index);
                }
                None => return,
            }
        }
    }
    game.player_mut(player).spend_credits(spec.cost);
    log_spend(game, ctx, player, ResourceKind::Credits, spec.cost);
    game.player_mut(player).played.push_back(card);
    let name = game.player(player).name.clone();
    ctx.log(player, format!("{name} joue «{}»", spec.name));

    if let Some(kind) = spec.revenue {
        game.player_mut(player).revenue.raise(kind);
        ctx.log(player, format!("{name} augmente son revenu ({})", kind.french()));
    }

    let bonus = Bonus::from_effects(&spec.immediate);
    ctx.resolve_bonus(game, player, &bonus);

    // Fire before registering this card's own permanents so a card
    // never triggers itself.
    standing::fire_event(game, player, &GameEvent::CardPlayed { sector: spec.scan_sector }, ctx);
    missions::register(game, player, card, &spec.passive);
    standing::register_scoring(game, player, card, &spec.passive);
    standing::register_permanents(game, player, card, &spec.permanent);
}

pub(crate) fn validate_free_action(
    game: &Game,
    library: &CardLibrary,
    player: PlayerId,
    card: CardId,
    validation: &mut Validation,
) {
    if !game.player(player).hand.contains(&card) {
        validation.error(ErrorCode::CardNotInHand, "Cette carte n'est pas dans votre main");
        return;
    }
    if library.get(card).and_then(|c| c.free_action).is_none() {
        validation.error(ErrorCode::NoFreeAction, "Cette carte n'a pas d'action gratuite");
    }
}

pub(crate) fn execute_free_action(
    game: &mut Game,
    player: PlayerId,
    card: CardId,
    ctx: &mut ExecutionContext,
) {
    let Some(kind) = ctx.library.get(card).and_then(|c| c.free_action) else {
        return;
    };
    let name = game.player(player).name.clone();
    ctx.log(player, format!("{name} utilise l'action gratuite de «{}»", ctx.card_name(card)));
    cards::discard_from_hand(game, player, card, ctx);
    let bonus = free_action_bonus(kind);
    ctx.resolve_bonus(game, player, &bonus);
}

fn free_action_bonus(kind: FreeActionKind) -> Bonus {
    match kind {
        FreeActionKind::Credit => Bonus::new().with_credits(1),
        FreeActionKind::Energy => Bonus::new().with_energy(1),
        FreeActionKind::Data => Bonus::new().with_data(1),
        FreeActionKind::Movement => Bonus::new().with_movements(1),
        FreeActionKind::Media => Bonus::new().with_media(1),
    }
}
