//! Card list ingestion.
//!
//! The external card list is line-delimited, one card per line:
//!
//! ```text
//! id;name;type;text;freeAction;scanSector;revenue;cost;immediateEffectCode;constraintCode
//! ```
//!
//! A bad record never fails the batch. A line that cannot yield a card at
//! all (wrong column count, unparsable id) is skipped with a warning; a
//! bad field inside an otherwise sound line degrades to its default with
//! a warning. Effect-code fields go through the normal parser, so their
//! misses surface here as warnings too.

use std::str::FromStr;

use tracing::warn;

use crate::cards::{Card, CardKind, CardLibrary, FreeActionKind};
use crate::core::{CardId, RevenueKind, SectorColor, SpeciesId};
use crate::effects::{parse_constraints, parse_immediate, EffectClass};

/// Outcome of one ingestion run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Cards registered in the library.
    pub loaded: usize,
    /// Lines that could not yield a card.
    pub skipped: usize,
    pub warnings: Vec<ImportWarning>,
}

/// One degraded or skipped piece of input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportWarning {
    /// 1-based line number in the input.
    pub line: usize,
    /// Which record field was affected.
    pub field: &'static str,
    pub detail: String,
}

impl ImportReport {
    fn degrade(&mut self, line: usize, field: &'static str, detail: impl Into<String>) {
        let detail = detail.into();
        warn!(line, field, detail = %detail, "degraded card field");
        self.warnings.push(ImportWarning { line, field, detail });
    }

    fn skip(&mut self, line: usize, field: &'static str, detail: impl Into<String>) {
        self.skipped += 1;
        self.degrade(line, field, detail);
    }
}

/// Parse a whole card list into a library.
#[must_use]
pub fn load_cards(input: &str) -> (CardLibrary, ImportReport) {
    let mut library = CardLibrary::new();
    let mut report = ImportReport::default();

    for (index, raw) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split(';').map(str::trim).collect();
        if fields[0] == "id" {
            // Header row.
            continue;
        }
        if fields.len() != 10 {
            report.skip(line_no, "record", format!("expected 10 fields, got {}", fields.len()));
            continue;
        }

        let id = match fields[0].parse::<u16>() {
            Ok(raw_id) => CardId::new(raw_id),
            Err(_) => {
                report.skip(line_no, "id", format!("unparsable id {:?}", fields[0]));
                continue;
            }
        };
        if library.get(id).is_some() {
            report.degrade(line_no, "id", format!("duplicate id {id}, later record wins"));
        }

        let mut card = Card::new(id, fields[1]);
        card.kind = parse_kind(fields[2], line_no, &mut report);
        card.text = fields[3].to_string();

        card.free_action = match fields[4] {
            "" => None,
            "credit" => Some(FreeActionKind::Credit),
            "energy" => Some(FreeActionKind::Energy),
            "data" => Some(FreeActionKind::Data),
            "movement" => Some(FreeActionKind::Movement),
            "media" => Some(FreeActionKind::Media),
            other => {
                report.degrade(line_no, "freeAction", format!("unknown value {other:?}"));
                None
            }
        };

        card.scan_sector = match fields[5] {
            "" => None,
            other => match SectorColor::from_str(other) {
                Ok(color) => Some(color),
                Err(_) => {
                    report.degrade(line_no, "scanSector", format!("unknown color {other:?}"));
                    None
                }
            },
        };

        card.revenue = match fields[6] {
            "" => None,
            other => match RevenueKind::from_str(other) {
                Ok(kind) => Some(kind),
                Err(_) => {
                    report.degrade(line_no, "revenue", format!("unknown kind {other:?}"));
                    None
                }
            },
        };

        card.cost = match fields[7] {
            "" => 0,
            other => match other.parse::<u8>() {
                Ok(cost) => cost,
                Err(_) => {
                    report.degrade(line_no, "cost", format!("unparsable cost {other:?}"));
                    0
                }
            },
        };

        let immediate = parse_immediate(fields[8]);
        for miss in &immediate.warnings {
            report.degrade(line_no, "immediateEffectCode", format!("{} ({})", miss.fragment, miss.reason));
        }
        card.immediate = immediate.effects.into_iter().collect();

        let constraints = parse_constraints(fields[9]);
        for miss in &constraints.warnings {
            report.degrade(line_no, "constraintCode", format!("{} ({})", miss.fragment, miss.reason));
        }
        for effect in constraints.effects {
            match effect.class() {
                EffectClass::Permanent => card.permanent.push(effect),
                // Unknown constraint codes stay visible on the passive list.
                _ => card.passive.push(effect),
            }
        }

        library.register(card);
        report.loaded += 1;
    }

    (library, report)
}

fn parse_kind(field: &str, line_no: usize, report: &mut ImportReport) -> CardKind {
    if field.is_empty() || field == "standard" {
        return CardKind::Standard;
    }
    if let Some(raw) = field.strip_prefix("species:") {
        if let Ok(species) = raw.parse::<u8>() {
            return CardKind::Species(SpeciesId::new(species));
        }
    }
    report.degrade(line_no, "type", format!("unknown type {field:?}"));
    CardKind::Undefined
}
