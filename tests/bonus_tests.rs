//! Bonus resolution integration tests.
//!
//! Cards with compound immediate effects drive the resolver through the
//! public engine API: scalar grants land at once, a lone interactive
//! grant opens directly, and several fold into a bonus-action wrapper
//! the player unpacks in the order of their choosing.

use deepsky::interaction::BonusOption;
use deepsky::{
    Action, Card, CardEffect, CardId, CardLibrary, Choice, Engine, Game, GameOptions,
    InteractionState, PlayerId, PositionId, TechId,
};
use deepsky::state::ProbeLocation;

fn library() -> CardLibrary {
    let mut library = CardLibrary::new();
    for i in 0..30 {
        library.register(Card::new(CardId::new(i), format!("Carte {i}")));
    }
    library.register(
        Card::new(CardId::new(40), "Subvention")
            .with_immediate(CardEffect::GainCredits { amount: 2 })
            .with_immediate(CardEffect::GainEnergy { amount: 1 })
            .with_immediate(CardEffect::GainData { amount: 1 }),
    );
    library.register(
        Card::new(CardId::new(41), "Couverture presse")
            .with_immediate(CardEffect::GainMedia { amount: 3 }),
    );
    library.register(
        Card::new(CardId::new(42), "Correction de trajectoire")
            .with_immediate(CardEffect::Movement { amount: 1 }),
    );
    library.register(
        Card::new(CardId::new(43), "Programme de recherche")
            .with_immediate(CardEffect::DrawCard { amount: 1 })
            .with_immediate(CardEffect::GainTechnology { category: None, amount: 1 }),
    );
    library.register(
        Card::new(CardId::new(44), "Fusée d'appoint")
            .with_immediate(CardEffect::FreeLaunch { amount: 1 }),
    );
    library
}

fn engine_with_hand(card: CardId) -> Engine {
    let library = library();
    let mut game = Game::new(&["Ada", "Grace"], &library, GameOptions::default());
    game.players[0].hand.push_back(card);
    Engine::resume(game, library)
}

/// Test that purely scalar effects apply without opening an interaction.
#[test]
fn test_scalar_effects_apply_without_questions() {
    let mut engine = engine_with_hand(CardId::new(40));
    let ada = PlayerId::new(0);

    engine.perform(ada, &Action::PlayCard { card: CardId::new(40) }).unwrap();

    let entry = engine.game().player(ada);
    assert_eq!(entry.credits, 7);
    assert_eq!(entry.energy, 3);
    assert_eq!(entry.data, 1);
    assert!(engine.current_interaction().is_idle());
    assert_eq!(engine.game().current_player, PlayerId::new(1));

    let log: Vec<&str> = engine.history().iter().map(|e| e.message.as_str()).collect();
    assert!(log.contains(&"Ada joue «Subvention»"));
    assert!(log.contains(&"Ada gagne 2 crédits"));
    assert!(log.contains(&"Ada gagne 1 énergie"));
    assert!(log.contains(&"Ada gagne 1 donnée"));
}

/// Test that a media grant stops at the cap and the log says so.
#[test]
fn test_media_grant_clamps_at_the_cap() {
    let library = library();
    let mut game = Game::new(&["Ada", "Grace"], &library, GameOptions::default());
    game.players[0].hand.push_back(CardId::new(41));
    game.players[0].media = 9;
    let mut engine = Engine::resume(game, library);
    let ada = PlayerId::new(0);

    engine.perform(ada, &Action::PlayCard { card: CardId::new(41) }).unwrap();

    assert_eq!(engine.game().player(ada).media, 10);
    assert!(engine
        .history()
        .iter()
        .any(|e| e.message == "Ada gagne 3 médias (plafonné à 10)"));
}

/// Test that a single interactive grant queues directly, resolves for
/// free, and only then hands the turn over.
#[test]
fn test_lone_interactive_grant_opens_directly() {
    let library = library();
    let mut game = Game::new(&["Ada", "Grace"], &library, GameOptions::default());
    game.players[0].hand.push_back(CardId::new(42));
    let ada = PlayerId::new(0);
    let probe = game.alloc_probe(ada, ProbeLocation::InTransit { position: PositionId::new(0) });
    let mut engine = Engine::resume(game, library);
    let energy = engine.game().player(ada).energy;

    engine.perform(ada, &Action::PlayCard { card: CardId::new(42) }).unwrap();

    assert_eq!(
        engine.current_interaction(),
        &InteractionState::MovingProbe { moves: 1, moved: 0 },
    );
    assert_eq!(engine.pending_player(), Some(ada));
    assert_eq!(engine.game().current_player, ada, "no handover while a question is open");

    engine.resolve(&Choice::MoveProbe { probe, to: PositionId::new(1) }).unwrap();

    assert!(engine.current_interaction().is_idle());
    assert_eq!(engine.game().player(ada).energy, energy, "granted moves cost no energy");
    assert_eq!(engine.game().current_player, PlayerId::new(1));
}

/// Test that two interactive grants fold into one wrapper whose options
/// the player plays in any order, exactly once each.
#[test]
fn test_compound_grants_fold_into_a_wrapper() {
    let mut engine = engine_with_hand(CardId::new(43));
    let ada = PlayerId::new(0);

    engine.perform(ada, &Action::PlayCard { card: CardId::new(43) }).unwrap();

    match engine.current_interaction() {
        InteractionState::ChoosingBonusAction { options } => {
            assert_eq!(options.len(), 2);
            assert!(matches!(options[0].state, InteractionState::AcquiringCard { .. }));
            assert!(matches!(options[1].state, InteractionState::ChoosingTechnology { .. }));
        }
        other => panic!("expected a wrapper, got {other:?}"),
    }

    // Technology first, out of declaration order.
    engine.resolve(&Choice::BonusOption { index: 1 }).unwrap();
    assert!(matches!(
        engine.current_interaction(),
        InteractionState::ChoosingTechnology { .. },
    ));
    engine.resolve(&Choice::Technology { tech: TechId::new(0) }).unwrap();

    // Back on the wrapper; the spent option refuses a replay.
    assert!(engine.resolve(&Choice::BonusOption { index: 1 }).is_err());

    engine.resolve(&Choice::BonusOption { index: 0 }).unwrap();
    engine.resolve(&Choice::TakeFromDeck).unwrap();

    assert!(engine.current_interaction().is_idle());
    let entry = engine.game().player(ada);
    assert_eq!(entry.technologies.len(), 1);
    // Algorithmes prints 1 data; the granted research pays no credits.
    assert_eq!(entry.data, 1);
    assert_eq!(entry.credits, 5);
    assert_eq!(entry.hand.len(), 4);
    assert_eq!(engine.game().current_player, PlayerId::new(1));
}

/// Test that the wrapper may be declined whole, forfeiting every
/// remaining option.
#[test]
fn test_wrapper_may_be_declined_whole() {
    let mut engine = engine_with_hand(CardId::new(43));
    let ada = PlayerId::new(0);

    engine.perform(ada, &Action::PlayCard { card: CardId::new(43) }).unwrap();
    engine.resolve(&Choice::Decline).unwrap();

    assert!(engine.current_interaction().is_idle());
    let entry = engine.game().player(ada);
    assert_eq!(entry.hand.len(), 3);
    assert!(entry.technologies.is_empty());
    assert!(engine.history().iter().any(|e| e.message.contains("renonce")));
    assert_eq!(engine.game().current_player, PlayerId::new(1));
}

/// Test that a granted launch skips the launch fee but still consumes
/// the lifetime probe stock.
#[test]
fn test_granted_launch_skips_the_fee() {
    let mut engine = engine_with_hand(CardId::new(44));
    let ada = PlayerId::new(0);

    engine.perform(ada, &Action::PlayCard { card: CardId::new(44) }).unwrap();
    assert_eq!(
        engine.current_interaction(),
        &InteractionState::LaunchingProbe { count: 1, launched: 0, ignore_limit: false },
    );

    engine.resolve(&Choice::Launch).unwrap();

    let game = engine.game();
    assert_eq!(game.probes_in_play(ada), 1);
    assert_eq!(game.player(ada).probes_launched, 1);
    assert_eq!(game.player(ada).credits, 5, "no launch fee on a granted launch");
}

/// Test that analyzing data pays crossed milestones, scalar and
/// interactive alike.
#[test]
fn test_analysis_milestones_pay_on_crossing() {
    let library = library();
    let mut game = Game::new(&["Ada", "Grace"], &library, GameOptions::default());
    game.players[0].data = 4;
    let mut engine = Engine::resume(game, library);
    let ada = PlayerId::new(0);
    let hand = engine.game().player(ada).hand.len();

    engine.perform(ada, &Action::AnalyzeData { count: 4 }).unwrap();

    // Milestone 2 printed a media; milestone 4 opens a card acquisition.
    assert_eq!(engine.game().player(ada).analyzed_data, 4);
    assert_eq!(engine.game().player(ada).media, 1);
    assert_eq!(
        engine.current_interaction(),
        &InteractionState::AcquiringCard { count: 1, taken: 0 },
    );
    let log: Vec<&str> = engine.history().iter().map(|e| e.message.as_str()).collect();
    assert!(log.contains(&"Ada analyse 4 données"));
    assert!(log.contains(&"Ada atteint le palier d'analyse 2"));
    assert!(log.contains(&"Ada atteint le palier d'analyse 4"));

    engine.resolve(&Choice::TakeFromDeck).unwrap();
    assert_eq!(engine.game().player(ada).hand.len(), hand + 1);
    assert!(engine.current_interaction().is_idle());
}

/// Test the BonusOption constructor used by drivers building custom
/// wrappers.
#[test]
fn test_bonus_option_starts_unplayed() {
    let option = BonusOption::new(InteractionState::ChoosingDataOrCard);
    assert!(!option.done);
    assert_eq!(option.state, InteractionState::ChoosingDataOrCard);
}
