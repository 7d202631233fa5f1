//! Undo ledger integration tests.
//!
//! Every performed action snapshots the engine first, so one undo step
//! rewinds the whole action together with the interactions it spawned,
//! the choices already played into them, and every history line of the
//! chain.

use deepsky::{
    Action, Card, CardEffect, CardId, CardLibrary, Choice, Engine, EngineError, Game, GameOptions,
    PlayerId, SectorId, TechId,
};

fn library() -> CardLibrary {
    let mut library = CardLibrary::new();
    for i in 0..30 {
        library.register(Card::new(CardId::new(i), format!("Carte {i}")));
    }
    library.register(
        Card::new(CardId::new(40), "Archives")
            .with_immediate(CardEffect::DrawCard { amount: 1 }),
    );
    library.register(
        Card::new(CardId::new(41), "Programme de recherche")
            .with_immediate(CardEffect::DrawCard { amount: 1 })
            .with_immediate(CardEffect::GainTechnology { category: None, amount: 1 }),
    );
    library
}

fn two_player() -> Engine {
    Engine::new(&["Ada", "Grace"], library(), GameOptions::default())
}

fn engine_with_hand(card: CardId) -> Engine {
    let library = library();
    let mut game = Game::new(&["Ada", "Grace"], &library, GameOptions::default());
    game.players[0].hand.push_back(card);
    Engine::resume(game, library)
}

/// Test that undo restores the exact pre-action state and that an empty
/// ledger refuses.
#[test]
fn test_undo_restores_the_action_boundary() {
    let mut engine = two_player();
    let ada = PlayerId::new(0);

    assert!(!engine.can_undo());
    assert_eq!(engine.undo(), Err(EngineError::NothingToUndo));

    let before = engine.game().clone();
    engine.perform(ada, &Action::LaunchProbe).unwrap();
    assert_eq!(engine.game().probes_in_play(ada), 1);
    assert_eq!(engine.game().current_player, PlayerId::new(1));
    assert!(engine.can_undo());

    engine.undo().unwrap();

    assert_eq!(engine.game(), &before);
    assert!(engine.history().is_empty());
    assert!(!engine.can_undo());
}

/// Test that undo unwinds an action's interaction and the choice already
/// played into it.
#[test]
fn test_undo_unwinds_interactions_and_choices() {
    let mut engine = engine_with_hand(CardId::new(40));
    let ada = PlayerId::new(0);
    assert_eq!(engine.game().player(ada).hand.len(), 4);

    engine.perform(ada, &Action::PlayCard { card: CardId::new(40) }).unwrap();
    assert!(!engine.current_interaction().is_idle());
    engine.resolve(&Choice::TakeFromDeck).unwrap();
    assert_eq!(engine.game().player(ada).hand.len(), 4);
    assert!(!engine.game().player(ada).hand.contains(&CardId::new(40)));

    engine.undo().unwrap();

    let entry = engine.game().player(ada);
    assert_eq!(entry.hand.len(), 4);
    assert!(entry.hand.contains(&CardId::new(40)));
    assert!(entry.played.is_empty());
    assert!(engine.current_interaction().is_idle());
    assert!(engine.history().is_empty());
}

/// Test that undo steps back one action at a time, newest first.
#[test]
fn test_undo_steps_back_one_action_at_a_time() {
    let mut engine = two_player();
    let ada = PlayerId::new(0);
    let grace = PlayerId::new(1);

    engine.perform(ada, &Action::LaunchProbe).unwrap();
    engine.perform(grace, &Action::ScanSector { sector: SectorId::new(0) }).unwrap();
    assert_eq!(engine.game().signals_of(grace), 1);

    engine.undo().unwrap();
    let game = engine.game();
    assert_eq!(game.signals_of(grace), 0);
    assert_eq!(game.player(grace).energy, 2);
    assert_eq!(game.probes_in_play(ada), 1, "the earlier action survives");
    assert_eq!(game.current_player, grace);

    engine.undo().unwrap();
    assert_eq!(engine.game().probes_in_play(ada), 0);
    assert_eq!(engine.game().current_player, ada);
    assert!(!engine.can_undo());
}

/// Test that a mid-wrapper undo rewinds the whole action, half-played
/// options included.
#[test]
fn test_undo_mid_wrapper_rewinds_the_whole_action() {
    let mut engine = engine_with_hand(CardId::new(41));
    let ada = PlayerId::new(0);

    engine.perform(ada, &Action::PlayCard { card: CardId::new(41) }).unwrap();
    engine.resolve(&Choice::BonusOption { index: 1 }).unwrap();
    engine.resolve(&Choice::Technology { tech: TechId::new(0) }).unwrap();
    assert_eq!(engine.game().player(ada).technologies.len(), 1);
    assert!(!engine.current_interaction().is_idle());

    engine.undo().unwrap();

    let game = engine.game();
    let entry = game.player(ada);
    assert!(entry.technologies.is_empty());
    assert_eq!(entry.data, 0);
    assert!(entry.hand.contains(&CardId::new(41)));
    assert_eq!(game.board.tech(TechId::new(0)).map(|slot| slot.remaining), Some(2));
    assert!(engine.current_interaction().is_idle());
    assert!(engine.history().is_empty());
}

/// Test that a replay after undo draws the same card: the deck is part
/// of the snapshot.
#[test]
fn test_replay_after_undo_is_deterministic() {
    let mut engine = engine_with_hand(CardId::new(40));
    let ada = PlayerId::new(0);

    engine.perform(ada, &Action::PlayCard { card: CardId::new(40) }).unwrap();
    engine.resolve(&Choice::TakeFromDeck).unwrap();
    let first: Vec<CardId> = engine.game().player(ada).hand.iter().copied().collect();

    engine.undo().unwrap();
    engine.perform(ada, &Action::PlayCard { card: CardId::new(40) }).unwrap();
    engine.resolve(&Choice::TakeFromDeck).unwrap();

    let second: Vec<CardId> = engine.game().player(ada).hand.iter().copied().collect();
    assert_eq!(first, second);
}

/// Test that undo rewinds across a round rollover, reviving the old row
/// and the pass flags.
#[test]
fn test_undo_rewinds_a_round_rollover() {
    let mut engine = two_player();
    let ada = PlayerId::new(0);
    let grace = PlayerId::new(1);
    let row: Vec<CardId> = engine.game().row.iter().copied().collect();

    engine.perform(ada, &Action::Pass).unwrap();
    engine.perform(grace, &Action::Pass).unwrap();
    assert_eq!(engine.game().round, 2);

    engine.undo().unwrap();

    let game = engine.game();
    assert_eq!(game.round, 1);
    assert_eq!(game.current_player, grace);
    assert!(game.player(ada).has_passed);
    assert!(!game.player(grace).has_passed);
    let restored: Vec<CardId> = game.row.iter().copied().collect();
    assert_eq!(restored, row);
    assert!(game.discard.is_empty());
}
