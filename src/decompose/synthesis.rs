use super::Decomposition;
use crate::analysis::{Analysis, AnalysisError};
use crate::attribute::{Attribute, AttributeSet};
use crate::dependency::{project, split_all};
use crate::relation::Relation;

/// 3NF synthesis from the canonical cover; a no-op for relations already in
/// 3NF.
pub fn synthesize_third_normal_form(analysis: &Analysis) -> Result<Decomposition, AnalysisError> {
    synthesize(analysis, false)
}

/// 3NF synthesis even when the relation is already in 3NF.
pub fn force_third_normal_form(analysis: &Analysis) -> Result<Decomposition, AnalysisError> {
    synthesize(analysis, true)
}

fn synthesize(analysis: &Analysis, force: bool) -> Result<Decomposition, AnalysisError> {
    let original = analysis.relation();
    let cover = analysis.minimal_cover().fds();

    if cover.is_empty() {
        return Ok(Decomposition::not_needed(
            original,
            "No functional dependencies in minimal cover, so the relation is already in 3NF.",
        ));
    }
    if analysis.normal_forms().is_in_third() && !force {
        return Ok(Decomposition::not_needed(
            original,
            "Relation is already in 3NF. No decomposition necessary.",
        ));
    }

    let split_cover = split_all(cover);
    let mut notes = Vec::new();
    let mut relations: Vec<Relation> = Vec::new();
    let mut placed = AttributeSet::new();
    let mut next_name = {
        let base = original.name().to_string();
        let mut counter = 0usize;
        move || {
            let name = format!("{}{}", base, counter);
            counter += 1;
            name
        }
    };
    let build = |attributes: Vec<Attribute>, name: String| {
        let set: AttributeSet = attributes.iter().collect();
        Relation::from_parts(name, attributes, project(&split_cover, &set))
    };

    for f in cover {
        let mut attributes: Vec<Attribute> = f.left().iter().cloned().collect();
        attributes.extend(f.right().iter().filter(|a| !f.left().contains(a)).cloned());
        placed.extend(&f.attributes());
        relations.push(build(attributes, next_name()));
    }

    let unplaced: Vec<Attribute> = original
        .attributes()
        .iter()
        .filter(|a| !placed.contains(a))
        .cloned()
        .collect();
    if !unplaced.is_empty() {
        let relation = build(unplaced, next_name());
        notes.push(format!(
            "Attributes not covered by any dependency were placed in {}: {}.",
            relation.name(),
            relation.attribute_set().join(", ")
        ));
        relations.push(relation);
    }

    let keys = analysis.keys();
    let found = relations
        .iter()
        .find_map(|r| keys.minimum_key_within(&r.attribute_set()));
    match (found, keys.minimum_keys().first()) {
        (Some(key), _) => notes.push(format!(
            "Key {} is contained in a synthesized relation; no key relation added.",
            key.left()
        )),
        (None, Some(key)) => {
            let relation = build(key.left().iter().cloned().collect(), next_name());
            notes.push(format!(
                "No synthesized relation contains a key; added {} for key {}.",
                relation.name(),
                key.left()
            ));
            relations.push(relation);
        }
        (None, None) => {}
    }

    log::debug!(
        "3NF synthesis of {} produced {} relations{}",
        original.name(),
        relations.len(),
        if force { " (forced)" } else { "" }
    );
    Decomposition::decomposed(analysis, relations, notes)
}
