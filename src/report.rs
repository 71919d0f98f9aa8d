//! Serializable summary of a full analysis run.

use crate::analysis::{Analysis, AnalysisError, Closure, Keys, MinimalCover, NormalForm, NormalFormResult};
use crate::attribute::Attribute;
use crate::config::ReportConfig;
use crate::decompose::{BcnfComparison, Decomposition};
use crate::dependency::{FunctionalDependency, MultivaluedDependency};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct RelationSummary {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub functional_dependencies: Vec<FunctionalDependency>,
    pub multivalued_dependencies: Vec<MultivaluedDependency>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CoverSummary {
    #[serde(flatten)]
    pub cover: MinimalCover,
    pub lost_partially_kept: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub relation: RelationSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closures: Option<Vec<Closure>>,
    pub keys: Keys,
    pub minimal_cover: CoverSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub derived_dependencies: Option<Vec<FunctionalDependency>>,
    pub normal_forms: NormalFormResult,
    pub highest_normal_form: Option<NormalForm>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub third_normal_form: Option<Decomposition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bcnf: Option<BcnfComparison>,
}

impl Report {
    /// Assembles the sections enabled in `config`; decompositions analyze
    /// every sub-relation and can fail the way analysis does.
    pub fn build(analysis: &Analysis, config: &ReportConfig) -> Result<Self, AnalysisError> {
        let relation = RelationSummary {
            name: analysis.name().to_string(),
            attributes: analysis.attributes().to_vec(),
            functional_dependencies: analysis.given_dependencies().to_vec(),
            multivalued_dependencies: analysis.multivalued_dependencies().to_vec(),
        };

        let (third_normal_form, bcnf) = if config.decompositions {
            (
                Some(analysis.decompose_third_normal_form()?),
                Some(analysis.compare_bcnf_strategies()?),
            )
        } else {
            (None, None)
        };

        let cover = analysis.minimal_cover().clone();
        Ok(Self {
            relation,
            closures: config
                .closures
                .then(|| analysis.closures().as_slice().to_vec()),
            keys: analysis.keys().clone(),
            minimal_cover: CoverSummary {
                lost_partially_kept: cover.lost_partially_kept(),
                cover,
            },
            derived_dependencies: config
                .derived
                .then(|| analysis.derived_dependencies().to_vec()),
            normal_forms: analysis.normal_forms().clone(),
            highest_normal_form: analysis.normal_forms().highest(),
            third_normal_form,
            bcnf,
        })
    }
}
