//! Standing effects.
//!
//! A played card's permanent effects stay in force as [`StandingEffect`]
//! records on the game: event triggers ("gain 1 media whenever you
//! orbit"), cost discounts, probe-limit raises and end-game scoring
//! rules. Systems announce what happened through [`fire_event`]; every
//! matching trigger of the acting player resolves its grant inside the
//! same causal chain, so a driver sees the cascade as one group.

use serde::{Deserialize, Serialize};

use crate::bonus::Bonus;
use crate::cards::CardLibrary;
use crate::core::{
    CardId, PlanetId, PlayerId, ResourceKind, SectorColor, SectorId, SpeciesId, TechCategory,
    TraceColor,
};
use crate::effects::CardEffect;
use crate::state::Game;
use crate::systems::ExecutionContext;

/// Something notable a system just did, announced to the trigger layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    ProbeLaunched,
    ProbeOrbited { planet: PlanetId },
    ProbeLanded { planet: PlanetId },
    SectorScanned { sector: SectorId },
    SignalMarked { sector: SectorId, color: SectorColor },
    DataAnalyzed { count: u8 },
    TechnologyResearched { category: TechCategory },
    CardPlayed { sector: Option<SectorColor> },
    TracePlaced { color: TraceColor },
    SpeciesDiscovered { species: SpeciesId },
}

/// Which events a trigger listens for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventFilter {
    Launch,
    Orbit,
    Land,
    Scan,
    Analyze,
    Tech,
    Trace,
    Discovery,
    /// Signal markings in sectors of one color.
    Signal { color: SectorColor },
    /// Plays of cards bearing this scan-sector color.
    Play { color: SectorColor },
}

impl EventFilter {
    #[must_use]
    pub fn matches(&self, event: &GameEvent) -> bool {
        match (self, event) {
            (EventFilter::Launch, GameEvent::ProbeLaunched)
            | (EventFilter::Orbit, GameEvent::ProbeOrbited { .. })
            | (EventFilter::Land, GameEvent::ProbeLanded { .. })
            | (EventFilter::Scan, GameEvent::SectorScanned { .. })
            | (EventFilter::Analyze, GameEvent::DataAnalyzed { .. })
            | (EventFilter::Tech, GameEvent::TechnologyResearched { .. })
            | (EventFilter::Trace, GameEvent::TracePlaced { .. })
            | (EventFilter::Discovery, GameEvent::SpeciesDiscovered { .. }) => true,
            (EventFilter::Signal { color: wanted }, GameEvent::SignalMarked { color, .. }) => {
                wanted == color
            }
            (EventFilter::Play { color: wanted }, GameEvent::CardPlayed { sector }) => {
                *sector == Some(*wanted)
            }
            _ => false,
        }
    }
}

/// Which action cost a discount shaves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CostKind {
    Launch,
    Move,
    Scan,
    Tech,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum StandingKind {
    Trigger { on: EventFilter, gain: ResourceKind, amount: u8 },
    Discount { cost: CostKind, amount: u8 },
    ExtraProbe { count: u8 },
    Scoring { rule: CardEffect },
}

/// One permanent effect in force, attributed to its source card.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StandingEffect {
    pub owner: PlayerId,
    pub source: CardId,
    pub kind: StandingKind,
}

/// Register a card's permanent effects. Returns how many were kept;
/// `Unknown` and non-permanent kinds are skipped.
pub fn register_permanents(
    game: &mut Game,
    owner: PlayerId,
    source: CardId,
    effects: &[CardEffect],
) -> usize {
    let mut registered = 0;
    for effect in effects {
        let kind = match effect {
            CardEffect::GainOnLaunch { resource, amount } => {
                trigger(EventFilter::Launch, *resource, *amount)
            }
            CardEffect::GainOnOrbit { resource, amount } => {
                trigger(EventFilter::Orbit, *resource, *amount)
            }
            CardEffect::GainOnLand { resource, amount } => {
                trigger(EventFilter::Land, *resource, *amount)
            }
            CardEffect::GainOnScan { resource, amount } => {
                trigger(EventFilter::Scan, *resource, *amount)
            }
            CardEffect::GainOnAnalyze { resource, amount } => {
                trigger(EventFilter::Analyze, *resource, *amount)
            }
            CardEffect::GainOnTech { resource, amount } => {
                trigger(EventFilter::Tech, *resource, *amount)
            }
            CardEffect::GainOnTrace { resource, amount } => {
                trigger(EventFilter::Trace, *resource, *amount)
            }
            CardEffect::GainOnDiscovery { resource, amount } => {
                trigger(EventFilter::Discovery, *resource, *amount)
            }
            CardEffect::GainOnSignal { color, resource, amount } => {
                trigger(EventFilter::Signal { color: *color }, *resource, *amount)
            }
            CardEffect::GainOnPlay { color, resource, amount } => {
                trigger(EventFilter::Play { color: *color }, *resource, *amount)
            }
            CardEffect::LaunchDiscount { amount } => {
                StandingKind::Discount { cost: CostKind::Launch, amount: *amount }
            }
            CardEffect::MoveDiscount { amount } => {
                StandingKind::Discount { cost: CostKind::Move, amount: *amount }
            }
            CardEffect::ScanDiscount { amount } => {
                StandingKind::Discount { cost: CostKind::Scan, amount: *amount }
            }
            CardEffect::TechDiscount { amount } => {
                StandingKind::Discount { cost: CostKind::Tech, amount: *amount }
            }
            CardEffect::ExtraProbe { amount } => StandingKind::ExtraProbe { count: *amount },
            _ => continue,
        };
        game.standing.push_back(StandingEffect { owner, source, kind });
        registered += 1;
    }
    registered
}

/// Register a card's scoring-rule passives for end-game counting.
pub fn register_scoring(
    game: &mut Game,
    owner: PlayerId,
    source: CardId,
    effects: &[CardEffect],
) -> usize {
    let mut registered = 0;
    for effect in effects {
        if effect.is_scoring_rule() {
            game.standing.push_back(StandingEffect {
                owner,
                source,
                kind: StandingKind::Scoring { rule: effect.clone() },
            });
            registered += 1;
        }
    }
    registered
}

fn trigger(on: EventFilter, gain: ResourceKind, amount: u8) -> StandingKind {
    StandingKind::Trigger { on, gain, amount }
}

/// Total discount a player holds on one cost kind.
#[must_use]
pub fn discount(game: &Game, player: PlayerId, cost: CostKind) -> u8 {
    game.standing
        .iter()
        .filter(|s| s.owner == player)
        .map(|s| match s.kind {
            StandingKind::Discount { cost: c, amount } if c == cost => amount,
            _ => 0,
        })
        .sum()
}

/// Effective probe limit: the base limit plus standing raises.
#[must_use]
pub fn probe_limit_of(game: &Game, player: PlayerId) -> u8 {
    let extra: u8 = game
        .standing
        .iter()
        .filter(|s| s.owner == player)
        .map(|s| match s.kind {
            StandingKind::ExtraProbe { count } => count,
            _ => 0,
        })
        .sum();
    game.player(player).probe_limit + extra
}

/// Announce an event. Every matching trigger of `player` resolves its
/// grant through the bonus resolver, inside the current chain.
pub fn fire_event(
    game: &mut Game,
    player: PlayerId,
    event: &GameEvent,
    ctx: &mut ExecutionContext,
) {
    let triggered: Vec<(CardId, ResourceKind, u8)> = game
        .standing
        .iter()
        .filter(|s| s.owner == player)
        .filter_map(|s| match &s.kind {
            StandingKind::Trigger { on, gain, amount } if on.matches(event) => {
                Some((s.source, *gain, *amount))
            }
            _ => None,
        })
        .collect();

    for (source, gain, amount) in triggered {
        let name = ctx.card_name(source);
        ctx.log(player, format!("«{name}» se déclenche"));
        ctx.resolve_bonus(game, player, &resource_bonus(gain, amount));
    }
}

fn resource_bonus(kind: ResourceKind, amount: u8) -> Bonus {
    match kind {
        ResourceKind::Credits => Bonus::new().with_credits(amount),
        ResourceKind::Energy => Bonus::new().with_energy(amount),
        ResourceKind::Media => Bonus::new().with_media(amount),
        ResourceKind::Data => Bonus::new().with_data(amount),
        ResourceKind::Card => Bonus::new().with_cards(amount),
        ResourceKind::Score => Bonus::new().with_pv(amount),
    }
}

/// Points one scoring rule is worth for `player` right now.
#[must_use]
pub fn scoring_value(
    game: &Game,
    library: &CardLibrary,
    player: PlayerId,
    rule: &CardEffect,
) -> i16 {
    let state = game.player(player);
    let count = match rule {
        CardEffect::ScorePerMedia { .. } => i16::from(state.media),
        CardEffect::ScorePerTech { .. } => state.technologies.len() as i16,
        CardEffect::ScorePerSignal { color: None, .. } => game.signals_of(player) as i16,
        CardEffect::ScorePerSignal { color: Some(color), .. } => {
            game.signals_of_color(player, *color) as i16
        }
        CardEffect::ScorePerOrbiter { .. } => game.orbiters_of(player) as i16,
        CardEffect::ScorePerLander { .. } => game.landers_of(player) as i16,
        CardEffect::ScorePerTrace { .. } => state.traces.len() as i16,
        CardEffect::ScorePerPlayedSector { color, .. } => state
            .played
            .iter()
            .filter(|card| {
                library
                    .get(**card)
                    .and_then(|template| template.scan_sector)
                    .map_or(false, |sector| sector == *color)
            })
            .count() as i16,
        CardEffect::ScorePerData { .. } => i16::from(state.analyzed_data),
        _ => return 0,
    };
    count * i16::from(rule.scoring_pv())
}
