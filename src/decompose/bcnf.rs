use super::synthesis::{force_third_normal_form, synthesize_third_normal_form};
use super::Decomposition;
use crate::analysis::{Analysis, AnalysisError};
use crate::attribute::{Attribute, AttributeSet};
use crate::dependency::{project, split_all};
use crate::relation::Relation;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    FromRelation,
    FromThirdNormalForm,
}

/// Both BCNF decompositions and the one with the better trade-off.
#[derive(Debug, Clone, Serialize)]
pub struct BcnfComparison {
    from_relation: Decomposition,
    from_third_normal_form: Decomposition,
    chosen: Strategy,
}

impl BcnfComparison {
    pub fn from_relation(&self) -> &Decomposition {
        &self.from_relation
    }

    pub fn from_third_normal_form(&self) -> &Decomposition {
        &self.from_third_normal_form
    }

    pub fn strategy(&self) -> Strategy {
        self.chosen
    }

    pub fn chosen(&self) -> &Decomposition {
        match self.chosen {
            Strategy::FromRelation => &self.from_relation,
            Strategy::FromThirdNormalForm => &self.from_third_normal_form,
        }
    }
}

/// Splits the relation on its BCNF violations until every part is in BCNF.
pub fn decompose_bcnf(analysis: &Analysis) -> Result<Decomposition, AnalysisError> {
    let original = analysis.relation();
    if analysis.minimal_cover().is_empty() {
        return Ok(Decomposition::not_needed(
            original,
            "No functional dependencies in minimal cover, so the relation is already in BCNF.",
        ));
    }
    if analysis.normal_forms().is_in_bcnf() {
        return Ok(Decomposition::not_needed(
            original,
            "Relation is already in BCNF. No decomposition necessary.",
        ));
    }

    let parts = split_analyzed(analysis, 0)?;
    log::debug!("BCNF split of {} produced {} relations", original.name(), parts.len());
    Decomposition::decomposed(analysis, parts, Vec::new())
}

/// Runs BCNF splitting from the relation itself and from its 3NF synthesis,
/// then picks the result with fewer lost dependencies, then fewer
/// relations, preferring the 3NF-sourced one on a tie.
pub fn compare_bcnf_strategies(analysis: &Analysis) -> Result<BcnfComparison, AnalysisError> {
    let from_relation = decompose_bcnf(analysis)?;
    let from_third_normal_form = decompose_from_third_normal_form(analysis)?;

    let rank = |d: &Decomposition| (d.lost().len(), d.relations().len());
    let chosen = if rank(&from_relation) < rank(&from_third_normal_form) {
        Strategy::FromRelation
    } else {
        Strategy::FromThirdNormalForm
    };
    log::debug!("chose BCNF strategy {:?} for {}", chosen, analysis.name());

    Ok(BcnfComparison {
        from_relation,
        from_third_normal_form,
        chosen,
    })
}

fn decompose_from_third_normal_form(analysis: &Analysis) -> Result<Decomposition, AnalysisError> {
    let original = analysis.relation();
    let forms = analysis.normal_forms();
    if analysis.minimal_cover().is_empty() || forms.is_in_bcnf() {
        return decompose_bcnf(analysis);
    }

    let synthesis = if forms.is_in_third() {
        force_third_normal_form(analysis)?
    } else {
        synthesize_third_normal_form(analysis)?
    };
    let sources = if synthesis.is_decomposed() {
        synthesis.relations().to_vec()
    } else {
        vec![original.clone()]
    };

    let mut parts = Vec::new();
    for source in &sources {
        parts.extend(split(source.clone(), 0)?);
    }
    let notes = vec![format!(
        "Split {} synthesized 3NF relation(s) into BCNF.",
        sources.len()
    )];
    Decomposition::decomposed(analysis, parts, notes)
}

fn split(relation: Relation, depth: usize) -> Result<Vec<Relation>, AnalysisError> {
    let analysis = relation.analyze()?;
    split_analyzed(&analysis, depth)
}

/// Each violating `A -> B` yields `A+` and `A ∪ (R \ A+)`, both split
/// again; the parts of every violation are concatenated.
fn split_analyzed(analysis: &Analysis, depth: usize) -> Result<Vec<Relation>, AnalysisError> {
    let relation = analysis.relation();
    let violations = analysis.normal_forms().bcnf_violations();
    if analysis.normal_forms().is_in_bcnf() || violations.is_empty() {
        return Ok(vec![relation.clone()]);
    }

    let cover = split_all(analysis.minimal_cover().fds());
    let mut counter = 0usize;
    let mut result = Vec::new();

    for f in violations {
        let Some(closure) = analysis.closure_of(f.left()) else {
            continue;
        };
        let determined = closure.right();

        let first: Vec<Attribute> = determined.iter().cloned().collect();
        let mut second: Vec<Attribute> = f.left().iter().cloned().collect();
        second.extend(
            relation
                .attributes()
                .iter()
                .filter(|a| !determined.contains(a))
                .cloned(),
        );

        let mut halves = Vec::with_capacity(2);
        for attributes in [first, second] {
            let set: AttributeSet = attributes.iter().collect();
            let name = format!("{}_{}", relation.name(), counter);
            counter += 1;
            halves.push(Relation::from_parts(name, attributes, project(&cover, &set)));
        }
        log::trace!(
            "{:indent$}split {} on {}: {} | {}",
            "",
            relation.name(),
            f,
            halves[0].attribute_set(),
            halves[1].attribute_set(),
            indent = depth * 2
        );

        for half in halves {
            result.extend(split(half, depth + 1)?);
        }
    }

    Ok(result)
}
