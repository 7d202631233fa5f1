//! Card zone movements.
//!
//! Cards only ever move as ids between zone lists. The row refills
//! immediately after a card leaves it, so the market is always full
//! while the deck lasts.

use crate::core::{CardId, PlayerId, SpeciesId};
use crate::state::Game;
use crate::systems::ExecutionContext;

/// Draw the top deck card into the player's hand.
pub fn draw_to_hand(game: &mut Game, player: PlayerId, ctx: &mut ExecutionContext) -> Option<CardId> {
    let card = game.draw_from_deck()?;
    game.player_mut(player).hand.push_back(card);
    let name = game.player(player).name.clone();
    ctx.log(player, format!("{name} pioche une carte"));
    Some(card)
}

/// Take a row card into the player's hand and refill the row.
pub fn take_row_card(
    game: &mut Game,
    player: PlayerId,
    slot: usize,
    ctx: &mut ExecutionContext,
) -> Option<CardId> {
    let card = game.take_from_row(slot)?;
    game.player_mut(player).hand.push_back(card);
    game.refill_row();
    let name = game.player(player).name.clone();
    ctx.log(player, format!("{name} prend «{}» de la rivière", ctx.card_name(card)));
    Some(card)
}

/// Set a row card aside into the player's reserve and refill the row.
pub fn reserve_row_card(
    game: &mut Game,
    player: PlayerId,
    slot: usize,
    ctx: &mut ExecutionContext,
) -> Option<CardId> {
    let card = game.take_from_row(slot)?;
    game.player_mut(player).reserved.push_back(card);
    game.refill_row();
    let name = game.player(player).name.clone();
    ctx.log(player, format!("{name} réserve «{}»", ctx.card_name(card)));
    Some(card)
}

/// Discard a card from the player's hand onto the shared discard pile.
pub fn discard_from_hand(
    game: &mut Game,
    player: PlayerId,
    card: CardId,
    ctx: &mut ExecutionContext,
) -> bool {
    if !game.player_mut(player).remove_from_hand(card) {
        return false;
    }
    game.discard.push_back(card);
    let name = game.player(player).name.clone();
    ctx.log(player, format!("{name} défausse «{}»", ctx.card_name(card)));
    true
}

/// Draw the top card of a discovered species' private deck into the
/// player's hand.
pub fn draw_species_card(
    game: &mut Game,
    player: PlayerId,
    species: SpeciesId,
    ctx: &mut ExecutionContext,
) -> Option<CardId> {
    let card = game.species_board_mut(species)?.deck.pop_front()?;
    game.player_mut(player).hand.push_back(card);
    let name = game.player(player).name.clone();
    let species_name = match game.species_board(species) {
        Some(board) => board.name.clone(),
        None => species.to_string(),
    };
    ctx.log(player, format!("{name} prend une carte des {species_name}"));
    Some(card)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, CardKind, CardLibrary};
    use crate::core::SequenceId;
    use crate::oracle::RingOracle;
    use crate::state::GameOptions;

    fn fixture() -> (Game, CardLibrary) {
        let mut library = CardLibrary::new();
        for i in 0..16 {
            library.register(Card::new(CardId::new(i), format!("Carte {i}")));
        }
        for i in 16..20 {
            library.register(
                Card::new(CardId::new(i), format!("Espèce {i}"))
                    .with_kind(CardKind::Species(SpeciesId::new(0))),
            );
        }
        let game = Game::new(&["Ada", "Grace"], &library, GameOptions::default());
        (game, library)
    }

    #[test]
    fn test_take_row_card_refills_the_row() {
        let (mut game, library) = fixture();
        let oracle = RingOracle::new();
        let mut ctx = ExecutionContext::new(&library, &oracle, SequenceId::new(1));
        let player = PlayerId::new(0);

        let before_hand = game.player(player).hand.len();
        let expected = game.row[1];
        let taken = take_row_card(&mut game, player, 1, &mut ctx);

        assert_eq!(taken, Some(expected));
        assert_eq!(game.player(player).hand.len(), before_hand + 1);
        assert_eq!(game.row.len(), game.options.row_size);
        assert!(!game.row.contains(&expected));
    }

    #[test]
    fn test_reserve_goes_to_reserve_not_hand() {
        let (mut game, library) = fixture();
        let oracle = RingOracle::new();
        let mut ctx = ExecutionContext::new(&library, &oracle, SequenceId::new(2));
        let player = PlayerId::new(1);

        let before_hand = game.player(player).hand.len();
        let taken = reserve_row_card(&mut game, player, 0, &mut ctx).unwrap();

        assert_eq!(game.player(player).hand.len(), before_hand);
        assert_eq!(game.player(player).reserved.len(), 1);
        assert_eq!(game.player(player).reserved[0], taken);
    }

    #[test]
    fn test_discard_moves_card_to_shared_pile() {
        let (mut game, library) = fixture();
        let oracle = RingOracle::new();
        let mut ctx = ExecutionContext::new(&library, &oracle, SequenceId::new(3));
        let player = PlayerId::new(0);
        let card = game.player(player).hand[0];

        assert!(discard_from_hand(&mut game, player, card, &mut ctx));
        assert!(!discard_from_hand(&mut game, player, card, &mut ctx));
        assert_eq!(game.discard.len(), 1);
        assert_eq!(game.discard[0], card);
    }

    #[test]
    fn test_species_deck_draw() {
        let (mut game, library) = fixture();
        let oracle = RingOracle::new();
        let mut ctx = ExecutionContext::new(&library, &oracle, SequenceId::new(4));
        let player = PlayerId::new(0);
        let species = SpeciesId::new(0);

        let deck_before = game.species_board(species).unwrap().deck.len();
        assert_eq!(deck_before, 4);
        let card = draw_species_card(&mut game, player, species, &mut ctx).unwrap();

        assert!(game.player(player).hand.contains(&card));
        assert_eq!(game.species_board(species).unwrap().deck.len(), 3);
        // Species 1 has no deck registered at all.
        assert_eq!(draw_species_card(&mut game, player, SpeciesId::new(1), &mut ctx), None);
    }
}
