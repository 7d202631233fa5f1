//! Bonus resolution.
//!
//! [`resolve`] consumes a [`Bonus`] for one player: scalar grants apply
//! immediately (one history line each, media clamped at the cap), and
//! every grant that needs a decision becomes a queued interaction. When
//! two or more decision-bearing grants come out of one bonus, they are
//! folded into a single [`InteractionState::ChoosingBonusAction`] so the
//! player picks the order; a lone interactive grant queues directly.
//!
//! Resolution never asks questions itself: it returns the new game plus
//! the interactions the driver must play out.

use crate::core::{PlayerId, ResourceKind, SequenceId, MEDIA_MAX};
use crate::effects::SignalScope;
use crate::history::HistoryEntry;
use crate::interaction::{BonusOption, Interaction, InteractionState};
use crate::state::Game;

use super::Bonus;

/// Everything one bonus resolution produced.
#[derive(Clone, Debug)]
pub struct Resolution {
    pub game: Game,
    pub history: Vec<HistoryEntry>,
    pub interactions: Vec<Interaction>,
}

/// Apply `bonus` to `player`. Scalars land in field order; interactive
/// grants are synthesized in field order and wrapped when two or more
/// are present.
#[must_use]
pub fn resolve(bonus: &Bonus, game: &Game, player: PlayerId, sequence: SequenceId) -> Resolution {
    let mut game = game.clone();
    let mut history = Vec::new();
    let name = game.player(player).name.clone();
    let mut log = |message: String| history.push(HistoryEntry::new(message, player, sequence));

    // === Scalars ===

    if bonus.credits > 0 {
        game.player_mut(player).gain_credits(bonus.credits);
        log(format!("{name} gagne {}", ResourceKind::Credits.french(bonus.credits.into())));
    }
    if bonus.energy > 0 {
        game.player_mut(player).gain_energy(bonus.energy);
        log(format!("{name} gagne {}", ResourceKind::Energy.french(bonus.energy.into())));
    }
    if bonus.media > 0 {
        let gained = game.player_mut(player).gain_media(bonus.media);
        let mut message =
            format!("{name} gagne {}", ResourceKind::Media.french(bonus.media.into()));
        if gained < bonus.media {
            message.push_str(&format!(" (plafonné à {MEDIA_MAX})"));
        }
        log(message);
    }
    if bonus.data > 0 {
        game.player_mut(player).gain_data(bonus.data);
        log(format!("{name} gagne {}", ResourceKind::Data.french(bonus.data.into())));
    }
    if bonus.pv > 0 {
        game.player_mut(player).gain_score(bonus.pv.into());
        log(format!("{name} gagne {}", ResourceKind::Score.french(bonus.pv.into())));
    }

    // === Interactive grants ===

    let mut states: Vec<InteractionState> = Vec::new();
    if bonus.cards > 0 {
        states.push(InteractionState::AcquiringCard { count: bonus.cards, taken: 0 });
    }
    if bonus.reservations > 0 {
        states.push(InteractionState::ReservingCard { count: bonus.reservations, taken: 0 });
    }
    if bonus.launches > 0 {
        states.push(InteractionState::LaunchingProbe {
            count: bonus.launches,
            launched: 0,
            ignore_limit: bonus.ignore_probe_limit,
        });
    }
    if bonus.landings > 0 {
        states.push(InteractionState::LandingProbe { count: bonus.landings, placed: 0 });
    }
    if bonus.movements > 0 {
        states.push(InteractionState::MovingProbe { moves: bonus.movements, moved: 0 });
    }
    if bonus.rotations > 0 {
        states.push(InteractionState::PerformingRotation { count: bonus.rotations, rotated: 0 });
    }
    if bonus.scans > 0 {
        states.push(InteractionState::SelectingScanSector { count: bonus.scans, done: 0 });
    }

    let marked: smallvec::SmallVec<[SignalScope; 2]> = bonus
        .signals
        .iter()
        .copied()
        .filter(|scope| *scope != SignalScope::Hand)
        .collect();
    if !marked.is_empty() {
        states.push(InteractionState::MarkingSignal { scopes: marked, placed: 0 });
    }
    for scope in &bonus.signals {
        if *scope == SignalScope::Hand {
            states.push(InteractionState::GainingSignalFromHand);
        }
    }

    for category in &bonus.technologies {
        states.push(InteractionState::ChoosingTechnology {
            count: 1,
            taken: 0,
            category: *category,
        });
    }
    for color in &bonus.traces {
        states.push(InteractionState::PlacingLifeTrace { count: 1, placed: 0, color: *color });
    }
    if bonus.revenue_raises > 0 {
        states.push(InteractionState::RaisingRevenue { count: bonus.revenue_raises, raised: 0 });
    }
    if bonus.species_tokens > 0 {
        states.push(InteractionState::PlacingSpeciesToken {
            count: bonus.species_tokens,
            placed: 0,
        });
    }
    if bonus.species_cards > 0 {
        states.push(InteractionState::AcquiringSpeciesCard {
            count: bonus.species_cards,
            taken: 0,
        });
    }
    for _ in 0..bonus.media_or_moves {
        states.push(InteractionState::ChoosingMediaOrMove);
    }
    for _ in 0..bonus.data_or_cards {
        states.push(InteractionState::ChoosingDataOrCard);
    }

    let interactions = match states.len() {
        0 => Vec::new(),
        1 => {
            let state = states.into_iter().next().unwrap_or(InteractionState::Idle);
            vec![Interaction::new(state, player, Some(sequence))]
        }
        _ => {
            let options = states.into_iter().map(BonusOption::new).collect();
            vec![Interaction::new(
                InteractionState::ChoosingBonusAction { options },
                player,
                Some(sequence),
            )]
        }
    };

    Resolution { game, history, interactions }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, CardLibrary};
    use crate::core::{CardId, SectorColor, TraceColor};
    use crate::state::GameOptions;

    fn fixture() -> Game {
        let mut library = CardLibrary::new();
        for i in 0..12 {
            library.register(Card::new(CardId::new(i), format!("Carte {i}")));
        }
        Game::new(&["Ada", "Grace"], &library, GameOptions::default())
    }

    fn seq() -> SequenceId {
        SequenceId::new(1)
    }

    #[test]
    fn test_scalars_apply_in_order_with_history() {
        let game = fixture();
        let bonus = Bonus::new().with_credits(2).with_energy(1).with_data(3).with_pv(2);

        let resolution = resolve(&bonus, &game, PlayerId::new(0), seq());
        let player = resolution.game.player(PlayerId::new(0));
        assert_eq!(player.credits, game.player(PlayerId::new(0)).credits + 2);
        assert_eq!(player.energy, game.player(PlayerId::new(0)).energy + 1);
        assert_eq!(player.data, 3);
        assert_eq!(player.score, 2);

        let messages: Vec<&str> =
            resolution.history.iter().map(|h| h.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Ada gagne 2 crédits",
                "Ada gagne 1 énergie",
                "Ada gagne 3 données",
                "Ada gagne 2 PV",
            ],
        );
        assert!(resolution.interactions.is_empty());
    }

    #[test]
    fn test_media_is_clamped_at_the_cap() {
        let mut game = fixture();
        game.player_mut(PlayerId::new(0)).media = 9;

        let bonus = Bonus::new().with_media(1).with_cards(1);
        let resolution = resolve(&bonus, &game, PlayerId::new(0), seq());

        assert_eq!(resolution.game.player(PlayerId::new(0)).media, 10);
        assert_eq!(resolution.interactions.len(), 1);
        assert_eq!(
            resolution.interactions[0].state,
            InteractionState::AcquiringCard { count: 1, taken: 0 },
        );

        // Overshoot: 9 + 3 still stops at 10 and the line says so.
        let resolution = resolve(&Bonus::new().with_media(3), &game, PlayerId::new(0), seq());
        assert_eq!(resolution.game.player(PlayerId::new(0)).media, 10);
        assert_eq!(resolution.history.len(), 1);
        assert!(resolution.history[0].message.contains("plafonné à 10"));
    }

    #[test]
    fn test_two_interactive_grants_fold_into_one_wrapper() {
        let game = fixture();
        let bonus = Bonus::new().with_reservations(1).with_cards(1);

        let resolution = resolve(&bonus, &game, PlayerId::new(1), seq());
        assert_eq!(resolution.interactions.len(), 1);

        match &resolution.interactions[0].state {
            InteractionState::ChoosingBonusAction { options } => {
                assert_eq!(options.len(), 2);
                assert!(options.iter().all(|o| !o.done));
                // Declaration order: cards before reservations.
                assert_eq!(
                    options[0].state,
                    InteractionState::AcquiringCard { count: 1, taken: 0 },
                );
                assert_eq!(
                    options[1].state,
                    InteractionState::ReservingCard { count: 1, taken: 0 },
                );
            }
            other => panic!("expected wrapper, got {other:?}"),
        }
        assert_eq!(resolution.interactions[0].player, PlayerId::new(1));
        assert_eq!(resolution.interactions[0].sequence, Some(seq()));
    }

    #[test]
    fn test_hand_scoped_signals_split_from_marked_ones() {
        let game = fixture();
        let bonus = Bonus::new()
            .with_signal(SignalScope::Color(SectorColor::Yellow))
            .with_signal(SignalScope::Hand)
            .with_signal(SignalScope::Any);

        let resolution = resolve(&bonus, &game, PlayerId::new(0), seq());
        match &resolution.interactions[0].state {
            InteractionState::ChoosingBonusAction { options } => {
                assert_eq!(options.len(), 2);
                assert_eq!(
                    options[0].state,
                    InteractionState::MarkingSignal {
                        scopes: smallvec::smallvec![
                            SignalScope::Color(SectorColor::Yellow),
                            SignalScope::Any,
                        ],
                        placed: 0,
                    },
                );
                assert_eq!(options[1].state, InteractionState::GainingSignalFromHand);
            }
            other => panic!("expected wrapper, got {other:?}"),
        }
    }

    #[test]
    fn test_launch_grant_carries_the_limit_flag() {
        let game = fixture();
        let bonus = Bonus::new().with_launches(1).ignoring_probe_limit();

        let resolution = resolve(&bonus, &game, PlayerId::new(0), seq());
        assert_eq!(
            resolution.interactions[0].state,
            InteractionState::LaunchingProbe { count: 1, launched: 0, ignore_limit: true },
        );
    }

    #[test]
    fn test_per_entry_grants_stay_separate() {
        let game = fixture();
        let bonus = Bonus::new()
            .with_trace(Some(TraceColor::Red))
            .with_trace(None)
            .with_data_or_cards(1);

        let resolution = resolve(&bonus, &game, PlayerId::new(0), seq());
        match &resolution.interactions[0].state {
            InteractionState::ChoosingBonusAction { options } => {
                assert_eq!(options.len(), 3);
                assert_eq!(
                    options[0].state,
                    InteractionState::PlacingLifeTrace {
                        count: 1,
                        placed: 0,
                        color: Some(TraceColor::Red),
                    },
                );
                assert_eq!(
                    options[1].state,
                    InteractionState::PlacingLifeTrace { count: 1, placed: 0, color: None },
                );
                assert_eq!(options[2].state, InteractionState::ChoosingDataOrCard);
            }
            other => panic!("expected wrapper, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_bonus_is_a_no_op() {
        let game = fixture();
        let resolution = resolve(&Bonus::new(), &game, PlayerId::new(0), seq());
        assert_eq!(resolution.game, game);
        assert!(resolution.history.is_empty());
        assert!(resolution.interactions.is_empty());
    }
}
