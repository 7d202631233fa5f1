//! Textual effect-code parsing.
//!
//! Cards carry two code fields. The immediate field is free-form prose
//! shorthand (`"2 credits + 1 signal red"`): `+`-joined fragments, each an
//! optional quantity followed by a vocabulary keyword. The constraint
//! field is strict (`"GAIN_ON_ORBIT:media:2 + SCORE_PER_MEDIA:1"`):
//! `+`-joined prefix codes with `:`-joined fields of fixed arity.
//!
//! Both entry points are total: any input produces a [`ParseOutcome`],
//! never a panic. A fragment that does not match the vocabulary becomes
//! [`CardEffect::Unknown`] and a [`ParseWarning`], so bad card data is
//! visible instead of silently vanishing.

use std::str::FromStr;

use tracing::warn;

use crate::core::{ResourceKind, RevenueKind, SectorColor, TechCategory, TraceColor};
use crate::effects::{CardEffect, SignalScope};

/// Result of parsing one code field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    /// Normalized effects in input order, `Unknown` entries included.
    pub effects: Vec<CardEffect>,
    /// One warning per fragment that normalized to `Unknown`.
    pub warnings: Vec<ParseWarning>,
}

impl ParseOutcome {
    /// True when every fragment was recognized.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    fn miss(&mut self, fragment: &str, reason: &'static str) {
        warn!(fragment, reason, "unrecognized effect code");
        self.effects.push(CardEffect::Unknown { code: fragment.to_string() });
        self.warnings.push(ParseWarning { fragment: fragment.to_string(), reason });
    }
}

/// A fragment the parser could not normalize.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseWarning {
    /// The offending fragment, verbatim.
    pub fragment: String,
    /// Short machine-stable reason.
    pub reason: &'static str,
}

/// Parse a free-form immediate-effect code.
///
/// Grammar per `+`-separated fragment: an optional leading integer
/// quantity (default 1), then a keyword with an optional qualifier:
/// `media`, `credit`, `energy`, `data`, `card`, `probe`, `movement`,
/// `rotation`, `landing`, `scan`, `signal [<color>|hand]`,
/// `tech [<category>]`, `trace [<color>]`. Keywords tolerate the plural
/// `s` form. Matching is case-insensitive.
///
/// ```
/// use deepsky::effects::{parse_immediate, CardEffect};
///
/// let outcome = parse_immediate("2 credits + 1 media");
/// assert!(outcome.is_clean());
/// assert_eq!(outcome.effects[0], CardEffect::GainCredits { amount: 2 });
/// assert_eq!(outcome.effects[1], CardEffect::GainMedia { amount: 1 });
/// ```
#[must_use]
pub fn parse_immediate(text: &str) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();

    for fragment in text.split('+') {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            continue;
        }

        match immediate_fragment(fragment) {
            Some(effect) => outcome.effects.push(effect),
            None => outcome.miss(fragment, "unknown immediate keyword"),
        }
    }

    outcome
}

fn immediate_fragment(fragment: &str) -> Option<CardEffect> {
    let lower = fragment.to_lowercase();
    let mut tokens = lower.split_whitespace().peekable();

    let amount = match tokens.peek() {
        Some(first) if first.chars().all(|c| c.is_ascii_digit()) => {
            let value = first.parse::<u8>().ok()?;
            tokens.next();
            value
        }
        _ => 1,
    };

    let keyword = singular(tokens.next()?);
    let qualifier = tokens.next();
    // Anything after the qualifier is not part of the grammar.
    if tokens.next().is_some() {
        return None;
    }

    let effect = match (keyword.as_str(), qualifier) {
        ("media", None) => CardEffect::GainMedia { amount },
        ("credit", None) => CardEffect::GainCredits { amount },
        ("energy", None) | ("energie", None) => CardEffect::GainEnergy { amount },
        ("data", None) => CardEffect::GainData { amount },
        ("card", None) => CardEffect::DrawCard { amount },
        ("probe", None) => CardEffect::FreeLaunch { amount },
        ("movement", None) => CardEffect::Movement { amount },
        ("rotation", None) => CardEffect::Rotation { amount },
        ("landing", None) => CardEffect::FreeLanding { amount },
        ("scan", None) => CardEffect::FreeScan { amount },
        ("signal", None) => CardEffect::GainSignal { scope: SignalScope::Any, amount },
        ("signal", Some("hand")) => CardEffect::GainSignal { scope: SignalScope::Hand, amount },
        ("signal", Some(color)) => CardEffect::GainSignal {
            scope: SignalScope::Color(SectorColor::from_str(color).ok()?),
            amount,
        },
        ("tech", None) | ("technology", None) => {
            CardEffect::GainTechnology { category: None, amount }
        }
        ("tech", Some(category)) | ("technology", Some(category)) => CardEffect::GainTechnology {
            category: Some(TechCategory::from_str(category).ok()?),
            amount,
        },
        ("trace", None) => CardEffect::GainLifeTrace { color: None, amount },
        ("trace", Some(color)) => CardEffect::GainLifeTrace {
            color: Some(TraceColor::from_str(color).ok()?),
            amount,
        },
        _ => return None,
    };

    Some(effect)
}

fn singular(token: &str) -> String {
    // "energies" loses its stem under naive trimming, handled above.
    match token.strip_suffix('s') {
        Some(stem) if stem.len() > 2 => stem.to_string(),
        _ => token.to_string(),
    }
}

/// Parse a strict constraint code (passive and permanent effects).
///
/// Per `+`-separated fragment: `PREFIX:field:…` with an exact field count
/// per prefix. Unknown prefixes, wrong arity or unparsable fields
/// normalize to `Unknown` with a warning.
///
/// ```
/// use deepsky::core::ResourceKind;
/// use deepsky::effects::{parse_constraints, CardEffect};
///
/// let outcome = parse_constraints("GAIN_ON_ORBIT:media:2");
/// assert_eq!(outcome.effects.len(), 1);
/// assert_eq!(
///     outcome.effects[0],
///     CardEffect::GainOnOrbit { resource: ResourceKind::Media, amount: 2 },
/// );
/// ```
#[must_use]
pub fn parse_constraints(code: &str) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();

    for fragment in code.split('+') {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            continue;
        }

        match constraint_fragment(fragment) {
            Ok(effect) => outcome.effects.push(effect),
            Err(reason) => outcome.miss(fragment, reason),
        }
    }

    outcome
}

fn constraint_fragment(fragment: &str) -> Result<CardEffect, &'static str> {
    let fields: Vec<&str> = fragment.split(':').map(str::trim).collect();
    let prefix = fields[0];
    let args = &fields[1..];

    let arity_err: &'static str = "wrong field count";

    let effect = match prefix {
        "VISIT_PLANET" | "ORBIT_PLANET" | "LAND_PLANET" => {
            let [planet, pv] = take::<2>(args).ok_or(arity_err)?;
            let planet = planet.to_lowercase();
            let pv = number(pv)?;
            match prefix {
                "VISIT_PLANET" => CardEffect::VisitPlanet { planet, pv },
                "ORBIT_PLANET" => CardEffect::OrbitPlanet { planet, pv },
                _ => CardEffect::LandPlanet { planet, pv },
            }
        }
        "SIGNALS_MARKED" => {
            let [color, count, pv] = take::<3>(args).ok_or(arity_err)?;
            CardEffect::SignalsMarked {
                color: sector_color(color)?,
                count: number(count)?,
                pv: number(pv)?,
            }
        }
        "SIGNALS_ANY" => {
            let [count, pv] = take::<2>(args).ok_or(arity_err)?;
            CardEffect::SignalsAny { count: number(count)?, pv: number(pv)? }
        }
        "TECH_COUNT" => {
            let [category, count, pv] = take::<3>(args).ok_or(arity_err)?;
            CardEffect::TechCount {
                category: tech_category(category)?,
                count: number(count)?,
                pv: number(pv)?,
            }
        }
        "TECH_TOTAL" => {
            let [count, pv] = take::<2>(args).ok_or(arity_err)?;
            CardEffect::TechTotal { count: number(count)?, pv: number(pv)? }
        }
        "MEDIA_LEVEL" => {
            let [level, pv] = take::<2>(args).ok_or(arity_err)?;
            CardEffect::MediaLevel { level: number(level)?, pv: number(pv)? }
        }
        "DATA_ANALYZED" => {
            let [count, pv] = take::<2>(args).ok_or(arity_err)?;
            CardEffect::DataAnalyzed { count: number(count)?, pv: number(pv)? }
        }
        "TRACES_PLACED" => {
            let [color, count, pv] = take::<3>(args).ok_or(arity_err)?;
            CardEffect::TracesPlaced {
                color: trace_color(color)?,
                count: number(count)?,
                pv: number(pv)?,
            }
        }
        "SPECIES_CONTACT" => {
            let [pv] = take::<1>(args).ok_or(arity_err)?;
            CardEffect::SpeciesContact { pv: number(pv)? }
        }
        "PROBES_LAUNCHED" => {
            let [count, pv] = take::<2>(args).ok_or(arity_err)?;
            CardEffect::ProbesLaunched { count: number(count)?, pv: number(pv)? }
        }
        "ORBITERS" => {
            let [count, pv] = take::<2>(args).ok_or(arity_err)?;
            CardEffect::Orbiters { count: number(count)?, pv: number(pv)? }
        }
        "LANDERS" => {
            let [count, pv] = take::<2>(args).ok_or(arity_err)?;
            CardEffect::Landers { count: number(count)?, pv: number(pv)? }
        }
        "PLAYED_SECTOR" => {
            let [color, count, pv] = take::<3>(args).ok_or(arity_err)?;
            CardEffect::PlayedSector {
                color: sector_color(color)?,
                count: number(count)?,
                pv: number(pv)?,
            }
        }
        "REVENUE_LEVEL" => {
            let [kind, level, pv] = take::<3>(args).ok_or(arity_err)?;
            CardEffect::RevenueLevel {
                kind: RevenueKind::from_str(kind).map_err(|_| "unknown revenue kind")?,
                level: number(level)?,
                pv: number(pv)?,
            }
        }
        "SCORE_PER_MEDIA" => {
            let [pv] = take::<1>(args).ok_or(arity_err)?;
            CardEffect::ScorePerMedia { pv: number(pv)? }
        }
        "SCORE_PER_TECH" => {
            let [pv] = take::<1>(args).ok_or(arity_err)?;
            CardEffect::ScorePerTech { pv: number(pv)? }
        }
        "SCORE_PER_SIGNAL" => match args {
            [pv] => CardEffect::ScorePerSignal { color: None, pv: number(pv)? },
            [color, pv] => CardEffect::ScorePerSignal {
                color: Some(sector_color(color)?),
                pv: number(pv)?,
            },
            _ => return Err(arity_err),
        },
        "SCORE_PER_ORBITER" => {
            let [pv] = take::<1>(args).ok_or(arity_err)?;
            CardEffect::ScorePerOrbiter { pv: number(pv)? }
        }
        "SCORE_PER_LANDER" => {
            let [pv] = take::<1>(args).ok_or(arity_err)?;
            CardEffect::ScorePerLander { pv: number(pv)? }
        }
        "SCORE_PER_TRACE" => {
            let [pv] = take::<1>(args).ok_or(arity_err)?;
            CardEffect::ScorePerTrace { pv: number(pv)? }
        }
        "SCORE_PER_PLAYED_SECTOR" => {
            let [color, pv] = take::<2>(args).ok_or(arity_err)?;
            CardEffect::ScorePerPlayedSector { color: sector_color(color)?, pv: number(pv)? }
        }
        "SCORE_PER_DATA" => {
            let [pv] = take::<1>(args).ok_or(arity_err)?;
            CardEffect::ScorePerData { pv: number(pv)? }
        }
        "GAIN_ON_LAUNCH" | "GAIN_ON_ORBIT" | "GAIN_ON_LAND" | "GAIN_ON_SCAN"
        | "GAIN_ON_ANALYZE" | "GAIN_ON_TECH" | "GAIN_ON_TRACE" | "GAIN_ON_DISCOVERY" => {
            let [target, amount] = take::<2>(args).ok_or(arity_err)?;
            let resource = resource(target)?;
            let amount = number(amount)?;
            match prefix {
                "GAIN_ON_LAUNCH" => CardEffect::GainOnLaunch { resource, amount },
                "GAIN_ON_ORBIT" => CardEffect::GainOnOrbit { resource, amount },
                "GAIN_ON_LAND" => CardEffect::GainOnLand { resource, amount },
                "GAIN_ON_SCAN" => CardEffect::GainOnScan { resource, amount },
                "GAIN_ON_ANALYZE" => CardEffect::GainOnAnalyze { resource, amount },
                "GAIN_ON_TECH" => CardEffect::GainOnTech { resource, amount },
                "GAIN_ON_TRACE" => CardEffect::GainOnTrace { resource, amount },
                _ => CardEffect::GainOnDiscovery { resource, amount },
            }
        }
        "GAIN_ON_SIGNAL" => {
            let [color, target, amount] = take::<3>(args).ok_or(arity_err)?;
            CardEffect::GainOnSignal {
                color: sector_color(color)?,
                resource: resource(target)?,
                amount: number(amount)?,
            }
        }
        "GAIN_ON_PLAY" => {
            let [color, target, amount] = take::<3>(args).ok_or(arity_err)?;
            CardEffect::GainOnPlay {
                color: sector_color(color)?,
                resource: resource(target)?,
                amount: number(amount)?,
            }
        }
        "LAUNCH_DISCOUNT" => {
            let [amount] = take::<1>(args).ok_or(arity_err)?;
            CardEffect::LaunchDiscount { amount: number(amount)? }
        }
        "MOVE_DISCOUNT" => {
            let [amount] = take::<1>(args).ok_or(arity_err)?;
            CardEffect::MoveDiscount { amount: number(amount)? }
        }
        "SCAN_DISCOUNT" => {
            let [amount] = take::<1>(args).ok_or(arity_err)?;
            CardEffect::ScanDiscount { amount: number(amount)? }
        }
        "TECH_DISCOUNT" => {
            let [amount] = take::<1>(args).ok_or(arity_err)?;
            CardEffect::TechDiscount { amount: number(amount)? }
        }
        "EXTRA_PROBE" => {
            let [amount] = take::<1>(args).ok_or(arity_err)?;
            CardEffect::ExtraProbe { amount: number(amount)? }
        }
        _ => return Err("unknown constraint prefix"),
    };

    Ok(effect)
}

fn take<'a, const N: usize>(args: &[&'a str]) -> Option<[&'a str; N]> {
    args.try_into().ok()
}

fn number(field: &str) -> Result<u8, &'static str> {
    field.parse::<u8>().map_err(|_| "unparsable number")
}

fn resource(field: &str) -> Result<ResourceKind, &'static str> {
    ResourceKind::from_str(&field.to_lowercase()).map_err(|_| "unknown resource")
}

fn sector_color(field: &str) -> Result<SectorColor, &'static str> {
    SectorColor::from_str(&field.to_lowercase()).map_err(|_| "unknown color")
}

fn trace_color(field: &str) -> Result<TraceColor, &'static str> {
    TraceColor::from_str(&field.to_lowercase()).map_err(|_| "unknown color")
}

fn tech_category(field: &str) -> Result<TechCategory, &'static str> {
    TechCategory::from_str(&field.to_lowercase()).map_err(|_| "unknown category")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_immediate_compound() {
        let outcome = parse_immediate("2 credits + 1 media + tech computing");
        assert!(outcome.is_clean());
        assert_eq!(
            outcome.effects,
            vec![
                CardEffect::GainCredits { amount: 2 },
                CardEffect::GainMedia { amount: 1 },
                CardEffect::GainTechnology { category: Some(TechCategory::Computing), amount: 1 },
            ]
        );
    }

    #[test]
    fn test_immediate_default_quantity_and_plurals() {
        let outcome = parse_immediate("movement");
        assert_eq!(outcome.effects, vec![CardEffect::Movement { amount: 1 }]);

        let outcome = parse_immediate("3 movements + 2 probes + 2 energies");
        assert!(outcome.is_clean());
        assert_eq!(
            outcome.effects,
            vec![
                CardEffect::Movement { amount: 3 },
                CardEffect::FreeLaunch { amount: 2 },
                CardEffect::GainEnergy { amount: 2 },
            ]
        );
    }

    #[test]
    fn test_immediate_signal_scopes() {
        let outcome = parse_immediate("1 signal red + signal hand + 2 signals");
        assert!(outcome.is_clean());
        assert_eq!(
            outcome.effects,
            vec![
                CardEffect::GainSignal { scope: SignalScope::Color(SectorColor::Red), amount: 1 },
                CardEffect::GainSignal { scope: SignalScope::Hand, amount: 1 },
                CardEffect::GainSignal { scope: SignalScope::Any, amount: 2 },
            ]
        );
    }

    #[test]
    fn test_immediate_unknown_fragment_is_kept_and_warned() {
        let outcome = parse_immediate("2 credits + 1 tachyon beam");
        assert_eq!(outcome.effects.len(), 2);
        assert_eq!(outcome.effects[0], CardEffect::GainCredits { amount: 2 });
        assert_eq!(outcome.effects[1], CardEffect::Unknown { code: "1 tachyon beam".into() });
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].fragment, "1 tachyon beam");
    }

    #[test]
    fn test_immediate_empty_and_blank() {
        assert_eq!(parse_immediate(""), ParseOutcome::default());
        assert_eq!(parse_immediate("   "), ParseOutcome::default());
        assert!(parse_immediate(" + ").effects.is_empty());
    }

    #[test]
    fn test_constraint_single() {
        let outcome = parse_constraints("GAIN_ON_ORBIT:media:2");
        assert!(outcome.is_clean());
        assert_eq!(outcome.effects.len(), 1);
        assert_eq!(
            outcome.effects[0],
            CardEffect::GainOnOrbit { resource: ResourceKind::Media, amount: 2 },
        );
    }

    #[test]
    fn test_constraint_compound() {
        let outcome = parse_constraints("VISIT_PLANET:mars:4 + SCORE_PER_MEDIA:1");
        assert!(outcome.is_clean());
        assert_eq!(
            outcome.effects,
            vec![
                CardEffect::VisitPlanet { planet: "mars".into(), pv: 4 },
                CardEffect::ScorePerMedia { pv: 1 },
            ]
        );
    }

    #[test]
    fn test_constraint_optional_color() {
        let outcome = parse_constraints("SCORE_PER_SIGNAL:2 + SCORE_PER_SIGNAL:yellow:3");
        assert!(outcome.is_clean());
        assert_eq!(
            outcome.effects,
            vec![
                CardEffect::ScorePerSignal { color: None, pv: 2 },
                CardEffect::ScorePerSignal { color: Some(SectorColor::Yellow), pv: 3 },
            ]
        );
    }

    #[test]
    fn test_constraint_arity_and_number_misses() {
        let outcome = parse_constraints("GAIN_ON_ORBIT:media + MEDIA_LEVEL:nine:2 + WARP:1");
        assert_eq!(outcome.effects.len(), 3);
        assert!(outcome.effects.iter().all(|e| matches!(e, CardEffect::Unknown { .. })));
        let reasons: Vec<_> = outcome.warnings.iter().map(|w| w.reason).collect();
        assert_eq!(reasons, vec!["wrong field count", "unparsable number", "unknown constraint prefix"]);
    }

    proptest! {
        #[test]
        fn prop_parse_immediate_is_total(input in ".{0,80}") {
            let outcome = parse_immediate(&input);
            prop_assert!(outcome.effects.len() >= outcome.warnings.len());
        }

        #[test]
        fn prop_parse_constraints_is_total(input in ".{0,80}") {
            let outcome = parse_constraints(&input);
            for effect in &outcome.effects {
                let _ = effect.class();
            }
        }

        #[test]
        fn prop_parse_is_deterministic(input in ".{0,40}") {
            prop_assert_eq!(parse_immediate(&input), parse_immediate(&input));
            prop_assert_eq!(parse_constraints(&input), parse_constraints(&input));
        }
    }
}
