//! Lossless decomposition into 3NF and BCNF sub-relations.

mod bcnf;
mod synthesis;

pub use bcnf::{BcnfComparison, Strategy, compare_bcnf_strategies, decompose_bcnf};
pub use synthesis::{force_third_normal_form, synthesize_third_normal_form};

use crate::analysis::{Analysis, AnalysisError};
use crate::attribute::AttributeSet;
use crate::dependency::FunctionalDependency;
use crate::relation::Relation;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum Outcome {
    /// The relation already satisfies the target form.
    NotNeeded(String),
    Decomposed,
}

#[derive(Debug, Clone, Serialize)]
pub struct Decomposition {
    outcome: Outcome,
    initial: Vec<Relation>,
    relations: Vec<Relation>,
    lost: Vec<FunctionalDependency>,
    notes: Vec<String>,
}

impl Decomposition {
    /// No decomposition; the result is the relation itself.
    pub(crate) fn not_needed(relation: &Relation, reason: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::NotNeeded(reason.into()),
            initial: vec![relation.clone()],
            relations: vec![relation.clone()],
            lost: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Eliminates subsumed relations from `initial` and works out which cover
    /// dependencies of `source` did not survive.
    pub(crate) fn decomposed(
        source: &Analysis,
        initial: Vec<Relation>,
        mut notes: Vec<String>,
    ) -> Result<Self, AnalysisError> {
        let relations = eliminate_subsumed(&initial);
        let removed = initial.len() - relations.len();
        if removed > 0 {
            notes.push(format!(
                "Removed {} relation(s) whose attributes are all contained in another relation.",
                removed
            ));
        }
        let lost = lost_dependencies(source.minimal_cover().fds(), &relations)?;
        Ok(Self {
            outcome: Outcome::Decomposed,
            initial,
            relations,
            lost,
            notes,
        })
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn is_decomposed(&self) -> bool {
        self.outcome == Outcome::Decomposed
    }

    /// Relations before subsumption elimination.
    pub fn initial_relations(&self) -> &[Relation] {
        &self.initial
    }

    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    /// Cover dependencies of the source relation no output relation keeps.
    pub fn lost(&self) -> &[FunctionalDependency] {
        &self.lost
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    /// Subsumption elimination removed at least one relation.
    pub fn had_subsumed(&self) -> bool {
        self.initial.len() != self.relations.len()
    }
}

/// Drops every relation whose attribute set is contained in another
/// surviving relation's. Of two equal sets the earlier one survives.
pub fn eliminate_subsumed(relations: &[Relation]) -> Vec<Relation> {
    let sets: Vec<AttributeSet> = relations.iter().map(Relation::attribute_set).collect();
    let mut removed = vec![false; relations.len()];

    for i in 0..sets.len() {
        if removed[i] {
            continue;
        }
        for j in 0..sets.len() {
            if i != j && !removed[j] && sets[j].is_subset(&sets[i]) {
                removed[j] = true;
            }
        }
    }

    relations
        .iter()
        .zip(removed)
        .filter(|(_, gone)| !gone)
        .map(|(r, _)| r.clone())
        .collect()
}

/// Dependencies of `cover` whose name appears in no output relation's
/// re-derived canonical cover.
pub fn lost_dependencies(
    cover: &[FunctionalDependency],
    outputs: &[Relation],
) -> Result<Vec<FunctionalDependency>, AnalysisError> {
    let mut kept: Vec<FunctionalDependency> = Vec::new();
    for relation in outputs {
        kept.extend_from_slice(relation.analyze()?.minimal_cover().fds());
    }
    Ok(cover
        .iter()
        .filter(|f| !kept.iter().any(|k| k.name() == f.name()))
        .cloned()
        .collect())
}

impl Analysis {
    pub fn decompose_third_normal_form(&self) -> Result<Decomposition, AnalysisError> {
        synthesize_third_normal_form(self)
    }

    pub fn decompose_bcnf(&self) -> Result<Decomposition, AnalysisError> {
        decompose_bcnf(self)
    }

    pub fn compare_bcnf_strategies(&self) -> Result<BcnfComparison, AnalysisError> {
        compare_bcnf_strategies(self)
    }
}
