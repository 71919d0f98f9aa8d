//! Closure, key, cover and normal form analysis of a single relation.

pub mod closure;
pub mod cover;
pub mod derived;
pub mod keys;
pub mod normal_form;

use crate::attribute::{Attribute, AttributeSet};
use crate::dependency::{FunctionalDependency, MultivaluedDependency};
use crate::relation::{Relation, SchemaError};
pub use closure::{Closure, Closures, closure_of, compute_all_closures};
pub use cover::{MinimalCover, minimal_cover};
pub use keys::{Keys, find_keys};
pub use normal_form::{NormalForm, NormalFormResult, PartialDependency, Verdict};

/// Largest schema analyzed; closure enumeration is exponential in it.
pub const MAX_ATTRIBUTES: usize = 20;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    #[error("Relation failed integrity checks: {0}")]
    IntegrityCheckFailed(SchemaError),
    #[error("Relation {0} has no attributes")]
    NoAttributes(String),
    #[error("Relation has {count} attributes, at most {max} can be analyzed")]
    TooManyAttributes { count: usize, max: usize },
}

/// Immutable result of analyzing a relation.
#[derive(Debug, Clone)]
pub struct Analysis {
    relation: Relation,
    working: Vec<FunctionalDependency>,
    derived: Vec<FunctionalDependency>,
    cover: MinimalCover,
    closures: Closures,
    keys: Keys,
    normal_forms: NormalFormResult,
}

impl Analysis {
    pub fn relation(&self) -> &Relation {
        &self.relation
    }

    pub fn name(&self) -> &str {
        self.relation.name()
    }

    pub fn attributes(&self) -> &[Attribute] {
        self.relation.attributes()
    }

    pub fn attribute_set(&self) -> AttributeSet {
        self.relation.attribute_set()
    }

    pub fn given_dependencies(&self) -> &[FunctionalDependency] {
        self.relation.functional_dependencies()
    }

    pub fn multivalued_dependencies(&self) -> &[MultivaluedDependency] {
        self.relation.multivalued_dependencies()
    }

    /// Given dependencies split into single right-hand attributes.
    pub fn working_dependencies(&self) -> &[FunctionalDependency] {
        &self.working
    }

    pub fn derived_dependencies(&self) -> &[FunctionalDependency] {
        &self.derived
    }

    pub fn minimal_cover(&self) -> &MinimalCover {
        &self.cover
    }

    pub fn closures(&self) -> &Closures {
        &self.closures
    }

    pub fn keys(&self) -> &Keys {
        &self.keys
    }

    pub fn normal_forms(&self) -> &NormalFormResult {
        &self.normal_forms
    }

    /// Closure of `attributes` under the given dependencies.
    pub fn closure_of(&self, attributes: &AttributeSet) -> Option<Closure> {
        self.closures
            .get(attributes)
            .cloned()
            .or_else(|| closure_of(attributes, self.given_dependencies()))
    }
}

impl Relation {
    /// Runs the whole pipeline: closures, keys, cover, derived dependencies
    /// and normal forms.
    pub fn analyze(&self) -> Result<Analysis, AnalysisError> {
        if let Some(err) = self.integrity_error() {
            return Err(AnalysisError::IntegrityCheckFailed(err.clone()));
        }
        let count = self.attributes().len();
        if count == 0 {
            return Err(AnalysisError::NoAttributes(self.name().to_string()));
        }
        if count > MAX_ATTRIBUTES {
            return Err(AnalysisError::TooManyAttributes {
                count,
                max: MAX_ATTRIBUTES,
            });
        }

        log::debug!("analyzing {}", self.describe());
        let given = self.functional_dependencies();
        let closures = compute_all_closures(self.attributes(), given);
        let keys = find_keys(self.attributes(), &closures);
        let cover = minimal_cover(given, &closures);
        let (working, derived) = derived::derive_dependencies(given, &closures);
        let normal_forms = normal_form::determine_normal_forms(
            &self.attribute_set(),
            cover.fds(),
            self.multivalued_dependencies(),
            &closures,
            &keys,
        );

        Ok(Analysis {
            relation: self.clone(),
            working,
            derived,
            cover,
            closures,
            keys,
            normal_forms,
        })
    }
}
