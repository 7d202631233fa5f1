//! Applying a driver's [`Choice`] to the current interaction.
//!
//! Every arm validates the choice against the live game before touching
//! anything, so a rejected choice leaves game and queue exactly as they
//! were. Grants woken up here are free: the energy, credit and media
//! costs of the equivalent main actions do not apply.

use smallvec::smallvec;

use crate::bonus::Bonus;
use crate::core::{CardId, PlayerId};
use crate::effects::SignalScope;
use crate::error::EngineError;
use crate::interaction::{Choice, Interaction, InteractionQueue, InteractionState};
use crate::state::{Game, ProbeLocation};
use crate::systems::{cards, probes, scanning, standing, tech, traces, ExecutionContext};

/// Play `choice` against the queue's current interaction.
///
/// On success the interaction advances (or pops once satisfied) and any
/// follow-up interactions sit in `ctx` for the caller to enqueue.
pub fn resolve_choice(
    game: &mut Game,
    queue: &mut InteractionQueue,
    choice: &Choice,
    ctx: &mut ExecutionContext,
) -> Result<(), EngineError> {
    let Some(current) = queue.current() else {
        return Err(EngineError::NoPendingInteraction);
    };
    let player = current.player;
    let sequence = current.sequence;
    let state = current.state.clone();

    if matches!(choice, Choice::Decline) {
        return decline(game, queue, player, &state, ctx);
    }

    match state {
        InteractionState::Idle => return Err(EngineError::NoPendingInteraction),

        InteractionState::ChoosingBonusAction { options } => {
            let Choice::BonusOption { index } = choice else {
                return Err(mismatch());
            };
            let Some(option) = options.get(*index) else {
                return Err(EngineError::rejected_choice("Option inconnue"));
            };
            if option.done {
                return Err(EngineError::rejected_choice("Cette option a déjà été jouée"));
            }
            let chosen = option.state.clone();
            let mut options = options;
            options[*index].done = true;
            queue.set_current_state(InteractionState::ChoosingBonusAction { options });
            queue.push(Interaction::new(chosen, player, sequence));
        }

        InteractionState::AcquiringCard { count, taken } => {
            match choice {
                Choice::TakeFromDeck => {
                    if cards::draw_to_hand(game, player, ctx).is_none() {
                        return Err(EngineError::rejected_choice("La pioche est vide"));
                    }
                }
                Choice::TakeFromRow { slot } => {
                    if cards::take_row_card(game, player, *slot, ctx).is_none() {
                        return Err(EngineError::rejected_choice(
                            "Cet emplacement de la rivière est vide",
                        ));
                    }
                }
                _ => return Err(mismatch()),
            }
            queue.set_current_state(InteractionState::AcquiringCard { count, taken: taken + 1 });
        }

        InteractionState::ReservingCard { count, taken } => {
            let Choice::TakeFromRow { slot } = choice else {
                return Err(mismatch());
            };
            if cards::reserve_row_card(game, player, *slot, ctx).is_none() {
                return Err(EngineError::rejected_choice("Cet emplacement de la rivière est vide"));
            }
            queue.set_current_state(InteractionState::ReservingCard { count, taken: taken + 1 });
        }

        InteractionState::DiscardingCard { count, selected } => {
            let chosen: Vec<CardId> = match choice {
                Choice::Card { card } => vec![*card],
                Choice::Cards { cards } => cards.clone(),
                _ => return Err(mismatch()),
            };
            let remaining = usize::from(count).saturating_sub(selected.len());
            if chosen.is_empty() || chosen.len() > remaining {
                return Err(EngineError::rejected_choice("Nombre de cartes à défausser invalide"));
            }
            let mut rest = game.player(player).hand.clone();
            for card in &chosen {
                match rest.index_of(card) {
                    Some(index) => {
                        rest.remove(index);
                    }
                    None => {
                        return Err(EngineError::rejected_choice(
                            "Cette carte n'est pas dans votre main",
                        ));
                    }
                }
            }
            let mut selected = selected;
            for card in chosen {
                cards::discard_from_hand(game, player, card, ctx);
                selected.push(card);
            }
            queue.set_current_state(InteractionState::DiscardingCard { count, selected });
        }

        InteractionState::SelectingStartingCard { keep, offered, kept } => {
            let Choice::Card { card } = choice else {
                return Err(mismatch());
            };
            let Some(index) = offered.iter().position(|c| c == card) else {
                return Err(EngineError::rejected_choice("Cette carte ne fait pas partie de l'offre"));
            };
            let mut offered = offered;
            let mut kept = kept;
            offered.remove(index);
            kept.push(*card);
            if kept.len() >= usize::from(keep) {
                for card in &kept {
                    game.player_mut(player).hand.push_back(*card);
                }
                for card in offered {
                    game.discard.push_back(card);
                }
                let name = game.player(player).name.clone();
                ctx.log(player, format!("{name} garde ses cartes de départ"));
                queue.set_current_state(InteractionState::SelectingStartingCard {
                    keep,
                    offered: Vec::new(),
                    kept,
                });
            } else {
                queue.set_current_state(InteractionState::SelectingStartingCard {
                    keep,
                    offered,
                    kept,
                });
            }
        }

        InteractionState::MovingProbe { moves, moved } => {
            let Choice::MoveProbe { probe, to } = choice else {
                return Err(mismatch());
            };
            let entry = game
                .probe(*probe)
                .ok_or_else(|| EngineError::rejected_choice("Sonde inconnue"))?;
            if entry.owner != player {
                return Err(EngineError::rejected_choice("Cette sonde ne vous appartient pas"));
            }
            let ProbeLocation::InTransit { position } = entry.location else {
                return Err(EngineError::rejected_choice("La sonde n'est pas en transit"));
            };
            if !ctx.oracle.reachable(position, 1, &game.board.rotation).contains(to) {
                return Err(EngineError::rejected_choice("Position inaccessible"));
            }
            probes::move_probe(game, player, *probe, *to, ctx);
            queue.set_current_state(InteractionState::MovingProbe { moves, moved: moved + 1 });
        }

        InteractionState::LaunchingProbe { count, launched, ignore_limit } => {
            let Choice::Launch = choice else {
                return Err(mismatch());
            };
            if game.player(player).probes_launched >= game.options.probe_stock {
                return Err(EngineError::rejected_choice("Plus de sondes disponibles"));
            }
            if !ignore_limit {
                let limit = standing::probe_limit_of(game, player);
                if game.probes_in_play(player) >= usize::from(limit) {
                    return Err(EngineError::rejected_choice("Limite de sondes atteinte"));
                }
            }
            probes::launch(game, player, ctx);
            queue.set_current_state(InteractionState::LaunchingProbe {
                count,
                launched: launched + 1,
                ignore_limit,
            });
        }

        InteractionState::LandingProbe { count, placed } => {
            let Choice::Land { probe, planet, slot } = choice else {
                return Err(mismatch());
            };
            let entry = game
                .probe(*probe)
                .ok_or_else(|| EngineError::rejected_choice("Sonde inconnue"))?;
            if entry.owner != player {
                return Err(EngineError::rejected_choice("Cette sonde ne vous appartient pas"));
            }
            if entry.orbiting() != Some(*planet) {
                return Err(EngineError::rejected_choice("La sonde n'orbite pas cette planète"));
            }
            if game.board.planet(*planet).and_then(|p| p.landing_slots.get(*slot)).is_none() {
                return Err(EngineError::rejected_choice("Emplacement inconnu"));
            }
            if game.landing_slot_occupied(*planet, *slot) {
                return Err(EngineError::rejected_choice("Emplacement occupé"));
            }
            probes::land(game, player, *probe, *planet, *slot, ctx);
            queue.set_current_state(InteractionState::LandingProbe { count, placed: placed + 1 });
        }

        InteractionState::SelectingScanSector { count, done } => {
            let Choice::Sector { sector } = choice else {
                return Err(mismatch());
            };
            let entry = game
                .board
                .sector(*sector)
                .ok_or_else(|| EngineError::rejected_choice("Secteur inconnu"))?;
            if entry.open_slots() == 0 {
                return Err(EngineError::rejected_choice("Le secteur est complet"));
            }
            scanning::scan_sector(game, player, *sector, ctx);
            queue.set_current_state(InteractionState::SelectingScanSector {
                count,
                done: done + 1,
            });
        }

        InteractionState::MarkingSignal { scopes, placed } => {
            let Choice::Sector { sector } = choice else {
                return Err(mismatch());
            };
            let scope = scopes.get(usize::from(placed)).copied().unwrap_or(SignalScope::Any);
            let entry = game
                .board
                .sector(*sector)
                .ok_or_else(|| EngineError::rejected_choice("Secteur inconnu"))?;
            if entry.open_slots() == 0 {
                return Err(EngineError::rejected_choice("Le secteur est complet"));
            }
            if !scope_allows(scope, entry) {
                return Err(EngineError::rejected_choice(
                    "Ce secteur ne correspond pas au signal à marquer",
                ));
            }
            scanning::mark_signal(game, player, *sector, ctx);
            queue.set_current_state(InteractionState::MarkingSignal { scopes, placed: placed + 1 });
        }

        InteractionState::GainingSignalFromHand => {
            let Choice::Card { card } = choice else {
                return Err(mismatch());
            };
            if !game.player(player).hand.contains(card) {
                return Err(EngineError::rejected_choice("Cette carte n'est pas dans votre main"));
            }
            let Some(color) = ctx.library.get(*card).and_then(|c| c.scan_sector) else {
                return Err(EngineError::rejected_choice("Cette carte n'indique pas de secteur"));
            };
            cards::discard_from_hand(game, player, *card, ctx);
            ctx.spawn(
                player,
                InteractionState::MarkingSignal {
                    scopes: smallvec![SignalScope::Color(color)],
                    placed: 0,
                },
            );
            queue.finish_current();
        }

        InteractionState::PlacingLifeTrace { count, placed, color } => {
            let Choice::TraceSite { planet, color: chosen } = choice else {
                return Err(mismatch());
            };
            if let Some(required) = color {
                if *chosen != required {
                    return Err(EngineError::rejected_choice("La couleur de la trace est imposée"));
                }
            }
            let entry = game
                .board
                .planet(*planet)
                .ok_or_else(|| EngineError::rejected_choice("Planète inconnue"))?;
            if !entry.trace_room() {
                return Err(EngineError::rejected_choice(
                    "Plus de place pour une trace sur cette planète",
                ));
            }
            traces::place_trace(game, player, *planet, *chosen, ctx);
            queue.set_current_state(InteractionState::PlacingLifeTrace {
                count,
                placed: placed + 1,
                color,
            });
        }

        InteractionState::ChoosingTechnology { count, taken, category } => {
            let Choice::Technology { tech: id } = choice else {
                return Err(mismatch());
            };
            let slot = game
                .board
                .tech(*id)
                .ok_or_else(|| EngineError::rejected_choice("Technologie inconnue"))?;
            if slot.remaining == 0 {
                return Err(EngineError::rejected_choice("Cette technologie est épuisée"));
            }
            if let Some(required) = category {
                if slot.tech.category != required {
                    return Err(EngineError::rejected_choice(
                        "La catégorie de technologie est imposée",
                    ));
                }
            }
            tech::research(game, player, *id, ctx);
            queue.set_current_state(InteractionState::ChoosingTechnology {
                count,
                taken: taken + 1,
                category,
            });
        }

        InteractionState::PerformingRotation { count, rotated } => {
            let Choice::Ring { ring } = choice else {
                return Err(mismatch());
            };
            game.board.rotation.step(*ring);
            let name = game.player(player).name.clone();
            ctx.log(player, format!("{name} tourne l'anneau {}", ring.french()));
            queue.set_current_state(InteractionState::PerformingRotation {
                count,
                rotated: rotated + 1,
            });
        }

        InteractionState::RaisingRevenue { count, raised } => {
            let Choice::Revenue { kind } = choice else {
                return Err(mismatch());
            };
            game.player_mut(player).revenue.raise(*kind);
            let name = game.player(player).name.clone();
            ctx.log(player, format!("{name} augmente son revenu ({})", kind.french()));
            queue.set_current_state(InteractionState::RaisingRevenue { count, raised: raised + 1 });
        }

        InteractionState::PlacingSpeciesToken { count, placed } => {
            let Choice::SpeciesToken { species, slot } = choice else {
                return Err(mismatch());
            };
            {
                let board = game
                    .species_board(*species)
                    .ok_or_else(|| EngineError::rejected_choice("Espèce inconnue"))?;
                if !board.discovered {
                    return Err(EngineError::rejected_choice(
                        "Cette espèce n'a pas encore été découverte",
                    ));
                }
            }
            let Some(bonus) =
                game.species_board_mut(*species).and_then(|b| b.claim_slot(*slot, player))
            else {
                return Err(EngineError::rejected_choice("Cet emplacement est occupé"));
            };
            let name = game.player(player).name.clone();
            let species_name = game
                .species_board(*species)
                .map_or_else(|| species.to_string(), |b| b.name.clone());
            ctx.log(player, format!("{name} place un jeton de contact chez les {species_name}"));
            ctx.resolve_bonus(game, player, &bonus);
            queue.set_current_state(InteractionState::PlacingSpeciesToken {
                count,
                placed: placed + 1,
            });
        }

        InteractionState::AcquiringSpeciesCard { count, taken } => {
            let Choice::Species { species } = choice else {
                return Err(mismatch());
            };
            let board = game
                .species_board(*species)
                .ok_or_else(|| EngineError::rejected_choice("Espèce inconnue"))?;
            if !board.discovered {
                return Err(EngineError::rejected_choice(
                    "Cette espèce n'a pas encore été découverte",
                ));
            }
            if cards::draw_species_card(game, player, *species, ctx).is_none() {
                return Err(EngineError::rejected_choice("Le paquet de cette espèce est vide"));
            }
            queue.set_current_state(InteractionState::AcquiringSpeciesCard {
                count,
                taken: taken + 1,
            });
        }

        InteractionState::ChoosingMediaOrMove => {
            match choice {
                Choice::First => {
                    ctx.resolve_bonus(game, player, &Bonus::new().with_media(1));
                }
                Choice::Second => {
                    ctx.spawn(player, InteractionState::MovingProbe { moves: 1, moved: 0 });
                }
                _ => return Err(mismatch()),
            }
            queue.finish_current();
        }

        InteractionState::ChoosingDataOrCard => {
            match choice {
                Choice::First => {
                    ctx.resolve_bonus(game, player, &Bonus::new().with_data(1));
                }
                Choice::Second => {
                    if cards::draw_to_hand(game, player, ctx).is_none() {
                        return Err(EngineError::rejected_choice("La pioche est vide"));
                    }
                }
                _ => return Err(mismatch()),
            }
            queue.finish_current();
        }
    }

    pop_completed(queue);
    Ok(())
}

/// Walk away from the current interaction, forfeiting what remains.
/// Only optional either-or choices may be dropped; everything else is
/// an obligation.
fn decline(
    game: &mut Game,
    queue: &mut InteractionQueue,
    player: PlayerId,
    state: &InteractionState,
    ctx: &mut ExecutionContext,
) -> Result<(), EngineError> {
    if !state.declinable() {
        return Err(EngineError::rejected_choice("Cette interaction ne peut pas être abandonnée"));
    }
    let name = game.player(player).name.clone();
    ctx.log(player, format!("{name} renonce: {}", state.label()));
    queue.finish_current();
    pop_completed(queue);
    Ok(())
}

fn scope_allows(scope: SignalScope, sector: &crate::state::Sector) -> bool {
    match scope {
        SignalScope::Any => true,
        SignalScope::Color(color) => sector.color == color,
        SignalScope::Hand => false,
    }
}

fn mismatch() -> EngineError {
    EngineError::rejected_choice("Ce choix ne correspond pas à l'interaction en cours")
}

/// Pop every satisfied interaction so the queue never idles on a
/// completed one.
fn pop_completed(queue: &mut InteractionQueue) {
    while queue.current().is_some_and(|i| i.state.is_complete()) {
        queue.finish_current();
    }
}
