//! Passing, and the round rollover that fires once everyone has.

use smallvec::SmallVec;

use crate::actions::{ErrorCode, Validation};
use crate::cards::CardLibrary;
use crate::core::{GamePhase, PlayerId, ResourceKind, Ring};
use crate::interaction::InteractionState;
use crate::state::Game;
use crate::systems::{cards, ExecutionContext};

pub(crate) fn validate(game: &Game, library: &CardLibrary, player: PlayerId, validation: &mut Validation) {
    let unused = game
        .player(player)
        .hand
        .iter()
        .any(|card| library.get(*card).is_some_and(|c| c.free_action.is_some()));
    if unused {
        validation.warn(ErrorCode::UnusedFreeActions, "Des actions gratuites restent disponibles");
    }
}

pub(crate) fn execute(game: &mut Game, player: PlayerId, ctx: &mut ExecutionContext) {
    game.player_mut(player).has_passed = true;
    let name = game.player(player).name.clone();
    ctx.log(player, format!("{name} passe"));
}

/// Close the current round once every player has passed.
///
/// Pays revenue incomes, rotates the scheduled ring, queues hand-limit
/// discards, renews the card row and hands the first-player marker to
/// the next seat. On the last round the game ends instead.
pub(crate) fn round_end(game: &mut Game, ctx: &mut ExecutionContext) {
    let herald = game.starting_player;
    ctx.log(herald, format!("Fin de la manche {}", game.round));

    if game.round >= game.options.rounds {
        game.phase = GamePhase::Ended;
        ctx.log(herald, "La partie est terminée".to_string());
        return;
    }

    for player in PlayerId::all(game.player_count()) {
        pay_revenue(game, player, ctx);
    }

    let ring = ring_for_round(game.round);
    game.board.rotation.step(ring);
    ctx.log(herald, format!("L'anneau {} tourne d'un cran", ring.french()));

    let limit = game.options.hand_limit;
    for player in PlayerId::all(game.player_count()) {
        let excess = game.player(player).hand.len().saturating_sub(limit);
        if excess > 0 {
            ctx.spawn(
                player,
                InteractionState::DiscardingCard {
                    count: excess as u8,
                    selected: SmallVec::new(),
                },
            );
        }
    }

    while let Some(card) = game.row.pop_front() {
        game.discard.push_back(card);
    }
    game.refill_row();
    ctx.log(herald, "La rivière est renouvelée".to_string());

    for player in PlayerId::all(game.player_count()) {
        game.player_mut(player).start_round();
    }
    let next_seat = (game.starting_player.index() + 1) % game.player_count();
    game.starting_player = PlayerId::new(next_seat as u8);
    game.current_player = game.starting_player;
    game.round += 1;
    ctx.log(game.starting_player, format!("Début de la manche {}", game.round));
}

/// Which ring auto-rotates at the end of the given round.
fn ring_for_round(round: u8) -> Ring {
    match (round.saturating_sub(1)) % 3 {
        0 => Ring::Inner,
        1 => Ring::Middle,
        _ => Ring::Outer,
    }
}

fn pay_revenue(game: &mut Game, player: PlayerId, ctx: &mut ExecutionContext) {
    let revenue = game.player(player).revenue;
    let mut parts: Vec<String> = Vec::new();
    if revenue.credits > 0 {
        game.player_mut(player).gain_credits(revenue.credits);
        parts.push(ResourceKind::Credits.french(i64::from(revenue.credits)));
    }
    if revenue.energy > 0 {
        game.player_mut(player).gain_energy(revenue.energy);
        parts.push(ResourceKind::Energy.french(i64::from(revenue.energy)));
    }
    if revenue.data > 0 {
        game.player_mut(player).gain_data(revenue.data);
        parts.push(ResourceKind::Data.french(i64::from(revenue.data)));
    }
    if !parts.is_empty() {
        let name = game.player(player).name.clone();
        ctx.log(player, format!("Revenus: {name} gagne {}", parts.join(", ")));
    }
    for _ in 0..revenue.card {
        cards::draw_to_hand(game, player, ctx);
    }
}
