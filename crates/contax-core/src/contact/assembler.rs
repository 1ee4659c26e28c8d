//! Record assembly from per-type entity lists.
//!
//! The extraction service returns entities as a flat list with no grouping
//! key. Two strategies rebuild per-person records from it:
//!
//! - **positional**: the i-th entity of every type belongs to the i-th
//!   person. Correct only when the service lists each type in the same
//!   order as the people on the page.
//! - **layout**: entities are attached to the nearest name above them on
//!   the same page. Needs a page anchor on every entity and falls back to
//!   positional assembly otherwise.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::models::config::AssemblyStrategy;
use crate::models::record::{Anchor, Entity, EntityKind, RawRecord};

/// Slack, in normalized page units, when comparing vertical positions.
const TOP_TOLERANCE: f32 = 0.01;

/// Assemble records with the given strategy.
pub fn assemble(entities: &[Entity], strategy: AssemblyStrategy) -> Vec<RawRecord> {
    match strategy {
        AssemblyStrategy::Positional => assemble_positional(entities),
        AssemblyStrategy::Layout => assemble_by_layout(entities).unwrap_or_else(|| {
            info!("Layout assembly not possible, falling back to positional");
            assemble_positional(entities)
        }),
    }
}

/// Pair the i-th entity of every type into the i-th record.
///
/// Records without a non-blank name are dropped. No name entities yields an
/// empty list.
pub fn assemble_positional(entities: &[Entity]) -> Vec<RawRecord> {
    let mut sequences: BTreeMap<EntityKind, Vec<&str>> = BTreeMap::new();
    for entity in entities {
        if let Some(kind) = entity.kind() {
            sequences.entry(kind).or_default().push(&entity.value);
        }
    }

    let counts: Vec<String> = EntityKind::ALL
        .iter()
        .map(|kind| format!("{}={}", kind.tag(), sequences.get(kind).map_or(0, Vec::len)))
        .collect();
    debug!("Entity counts: {}", counts.join(", "));

    let n = sequences.values().map(Vec::len).max().unwrap_or(0);
    let names = sequences.get(&EntityKind::Name).map(Vec::as_slice).unwrap_or(&[]);

    let mut records = Vec::new();
    for i in 0..n {
        let Some(mut record) = names.get(i).and_then(|name| RawRecord::from_name(name)) else {
            continue;
        };

        for (kind, values) in &sequences {
            if let Some(value) = values.get(i) {
                record.set(*kind, value.to_string());
            }
        }
        records.push(record);
    }

    debug!("Assembled {} records positionally", records.len());
    records
}

/// Attach every entity to the closest name at or above it on the same page.
///
/// Returns `None` when some entity has no anchor, or a page carries fields
/// but no names.
pub fn assemble_by_layout(entities: &[Entity]) -> Option<Vec<RawRecord>> {
    let mut anchored: Vec<(EntityKind, Anchor, &Entity)> = Vec::new();
    for entity in entities {
        let Some(kind) = entity.kind() else {
            continue;
        };
        anchored.push((kind, entity.anchor?, entity));
    }
    anchored.sort_by(|a, b| {
        a.1.page
            .cmp(&b.1.page)
            .then_with(|| a.1.top.total_cmp(&b.1.top))
    });

    // Records in page order, alongside their anchors.
    let mut people: Vec<(Anchor, RawRecord)> = anchored
        .iter()
        .filter(|(kind, _, _)| *kind == EntityKind::Name)
        .filter_map(|(_, anchor, entity)| Some((*anchor, RawRecord::from_name(&entity.value)?)))
        .collect();

    for (kind, anchor, entity) in &anchored {
        if *kind == EntityKind::Name {
            continue;
        }

        let on_page: Vec<usize> = (0..people.len())
            .filter(|&idx| people[idx].0.page == anchor.page)
            .collect();
        let first = *on_page.first()?;
        let owner = on_page
            .iter()
            .copied()
            .rfind(|&idx| people[idx].0.top <= anchor.top + TOP_TOLERANCE)
            .unwrap_or(first);

        let record = &mut people[owner].1;
        if record.get(kind.field()).is_some() {
            debug!(
                "Ignoring extra {} for {}: {:?}",
                kind.tag(),
                record.full_name(),
                entity.value
            );
            continue;
        }
        record.set(*kind, entity.value.clone());
    }

    debug!("Assembled {} records by layout", people.len());
    Some(people.into_iter().map(|(_, record)| record).collect())
}
