// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ParsedModel - result of one load

use crate::arguments::{ArgumentReader, UnresolvedReference};
use crate::entity::{EntityFactory, StepEntity};
use crate::graph::EntityGraph;
use crate::resolver::ReadContext;
use crate::scanner::EntityScanner;
use crate::tokenizer::parse_record;
use crate::{ErrorPolicy, StepReader};
use ifc_step_model::{EntityId, EntityKind, ProgressCallback, Result, StepError};
use rustc_hash::FxHashMap;

/// Non-fatal findings of a load
#[derive(Debug, Default)]
pub struct Diagnostics {
    /// Records left out under [`ErrorPolicy::SkipRecord`]
    pub skipped: Vec<StepError>,
    /// Tolerated problems, such as surplus arguments
    pub warnings: Vec<StepError>,
    /// References left empty under lenient reference handling
    pub unresolved: Vec<UnresolvedReference>,
}

impl Diagnostics {
    /// No skipped records, warnings or unresolved references
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.warnings.is_empty() && self.unresolved.is_empty()
    }
}

/// Linked entity graph plus the diagnostics gathered while loading
#[derive(Debug, Default)]
pub struct ParsedModel {
    pub graph: EntityGraph,
    pub diagnostics: Diagnostics,
}

/// Scanned record waiting to be populated
struct PendingRecord {
    id: EntityId,
    kind: EntityKind,
    start: usize,
    end: usize,
}

/// Populated entity with what its reader collected
struct DecodedRecord {
    entity: Box<dyn StepEntity>,
    unresolved: Vec<UnresolvedReference>,
    surplus: Option<StepError>,
}

impl ParsedModel {
    /// Load with progress reporting
    pub fn load(
        reader: &StepReader,
        content: &str,
        factory: &dyn EntityFactory,
        on_progress: Option<ProgressCallback>,
    ) -> Result<Self> {
        let progress = |phase: &str, percent: f32| {
            if let Some(callback) = &on_progress {
                callback(phase, percent);
            }
        };
        let mut model = ParsedModel::default();

        // Phase 1: id -> kind table, shared read-only by every record decoder
        progress("Scanning records", 0.0);
        let mut kinds: FxHashMap<EntityId, EntityKind> = FxHashMap::default();
        let mut pending = Vec::new();
        let mut scanner = EntityScanner::new(content);
        while let Some(record) = scanner.next_record() {
            let id = EntityId(record.id);
            let kind = match EntityKind::parse(record.type_name) {
                Some(kind) if !kind.is_abstract() => kind,
                _ => {
                    let err = StepError::UnknownEntity {
                        entity: id,
                        type_name: record.type_name.to_string(),
                    };
                    model.record_failure(reader.error_policy, err)?;
                    continue;
                }
            };
            if kinds.contains_key(&id) {
                model.record_failure(reader.error_policy, StepError::DuplicateEntity(id))?;
                continue;
            }
            kinds.insert(id, kind);
            pending.push(PendingRecord {
                id,
                kind,
                start: record.start,
                end: record.end,
            });
        }
        if scanner.is_truncated() {
            let err = StepError::format("data ends inside an unterminated record or comment");
            model.record_failure(reader.error_policy, err)?;
        }
        log::debug!("scanned {} records", pending.len());

        // Phase 2: decode arguments; references are checked against `kinds`
        progress("Decoding records", 30.0);
        let context = ReadContext::new(&kinds, reader.reference_policy);
        for record in &pending {
            let text = &content[record.start..record.end];
            match decode_record(text, record, factory, &context) {
                Ok(decoded) => {
                    if let Some(warning) = decoded.surplus {
                        log::warn!("{warning}");
                        model.diagnostics.warnings.push(warning);
                    }
                    model.diagnostics.unresolved.extend(decoded.unresolved);
                    model.graph.insert(decoded.entity)?;
                }
                Err(err) => model.record_failure(reader.error_policy, err)?,
            }
        }
        log::debug!("decoded {} entities", model.graph.len());

        // Phase 3: inverse slots
        if reader.resolve_inverses {
            progress("Linking inverse attributes", 80.0);
            model.graph.resolve_inverse_attributes()?;
        }

        progress("Complete", 100.0);
        Ok(model)
    }

    /// Abort or keep going, per policy; invariant violations always abort
    fn record_failure(&mut self, policy: ErrorPolicy, err: StepError) -> Result<()> {
        let fatal = matches!(err.root_cause(), StepError::InvariantViolation(_));
        if fatal || policy == ErrorPolicy::Abort {
            return Err(err);
        }
        log::warn!("skipping record: {err}");
        self.diagnostics.skipped.push(err);
        Ok(())
    }
}

fn decode_record(
    text: &str,
    pending: &PendingRecord,
    factory: &dyn EntityFactory,
    context: &ReadContext<'_>,
) -> Result<DecodedRecord> {
    let record = parse_record(text)?;
    let type_name = pending.kind.name();

    let expected = pending.kind.attribute_count();
    let actual = record.arguments.len();
    let count_mismatch = || StepError::ArgumentCountMismatch {
        entity: pending.id,
        type_name: type_name.to_string(),
        expected,
        actual,
    };
    if actual < expected {
        return Err(count_mismatch());
    }
    let surplus = (actual > expected).then(count_mismatch);

    let mut entity = factory
        .create(pending.kind, pending.id)
        .ok_or_else(|| StepError::UnknownEntity {
            entity: pending.id,
            type_name: type_name.to_string(),
        })?;

    let mut args = ArgumentReader::new(
        pending.id,
        pending.kind,
        &record.arguments[..expected],
        context,
    );
    entity.read_arguments(&mut args)?;
    if args.position() != expected {
        return Err(StepError::invariant(format!(
            "{}={type_name} read {} of {expected} arguments",
            pending.id,
            args.position()
        )));
    }

    Ok(DecodedRecord {
        entity,
        unresolved: args.into_unresolved(),
        surplus,
    })
}
