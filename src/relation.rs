//! Raw relation schemas and dependency ingestion.

use crate::ast::{DependencyDecl, Document, SchemaDecl};
use crate::attribute::{Attribute, AttributeSet};
use crate::dependency::{Arrow, Dependency, FunctionalDependency, MultivaluedDependency};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("Duplicate attribute encountered: {0}")]
    DuplicateAttribute(String),
    #[error("Attribute {attribute} does not exist in schema of Relation {relation}")]
    UnknownAttribute { attribute: String, relation: String },
    #[error("Duplicate {kind} dependency encountered: {name}")]
    DuplicateDependency { kind: &'static str, name: String },
    #[error("Relation {0} has no attributes")]
    EmptySchema(String),
}

/// Outcome of an accepted ingestion batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IngestSummary {
    pub accepted: usize,
    /// Items with an empty side, skipped without failing the batch
    pub dropped: usize,
}

impl IngestSummary {
    /// Every item of a non-empty batch was dropped.
    pub fn all_dropped(&self) -> bool {
        self.accepted == 0 && self.dropped > 0
    }
}

/// What happened to each dependency list of a loaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadSummary {
    pub functional: IngestSummary,
    pub multivalued: IngestSummary,
    /// Items the parser dropped for lacking an arrow
    pub malformed: usize,
}

impl LoadSummary {
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.malformed > 0 {
            warnings.push(format!(
                "{} dependency item(s) without an arrow were ignored",
                self.malformed
            ));
        }
        if self.functional.all_dropped() {
            warnings.push("every functional dependency had an empty side and was ignored".to_string());
        }
        if self.multivalued.all_dropped() {
            warnings.push("every multivalued dependency had an empty side and was ignored".to_string());
        }
        warnings
    }
}

/// A relation schema with its given dependencies, before analysis.
#[derive(Debug, Clone, Serialize)]
pub struct Relation {
    name: String,
    attributes: Vec<Attribute>,
    #[serde(rename = "functional_dependencies")]
    fds: Vec<FunctionalDependency>,
    #[serde(rename = "multivalued_dependencies")]
    mvds: Vec<MultivaluedDependency>,
    #[serde(skip)]
    integrity_error: Option<SchemaError>,
}

impl Relation {
    /// Builds a relation from attribute names in declaration order.
    ///
    /// A repeated name fails the integrity check; attributes up to the
    /// duplicate are kept.
    pub fn new<I, S>(name: impl Into<String>, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let name = name.into();
        let mut relation = Self {
            name,
            attributes: Vec::new(),
            fds: Vec::new(),
            mvds: Vec::new(),
            integrity_error: None,
        };

        for raw in attributes {
            let attribute = Attribute::new(raw.as_ref().trim());
            if attribute.name().is_empty() {
                continue;
            }
            if relation.attributes.contains(&attribute) {
                relation.integrity_error =
                    Some(SchemaError::DuplicateAttribute(attribute.name().to_string()));
                break;
            }
            relation.attributes.push(attribute);
        }

        if relation.integrity_error.is_none() && relation.attributes.is_empty() {
            relation.integrity_error = Some(SchemaError::EmptySchema(relation.name.clone()));
        }

        relation
    }

    pub fn from_schema(schema: &SchemaDecl) -> Self {
        Self::new(schema.name.clone(), &schema.attributes)
    }

    /// Builds the relation and ingests the document's functional, then
    /// multivalued, dependencies.
    pub fn from_document(doc: &Document) -> Result<(Self, LoadSummary), SchemaError> {
        let mut relation = Self::from_schema(&doc.schema);
        relation.check_integrity()?;
        let functional = relation.add_functional_dependencies(&doc.fds)?;
        let multivalued = relation.add_multivalued_dependencies(&doc.mvds)?;
        let summary = LoadSummary {
            functional,
            multivalued,
            malformed: doc.malformed,
        };
        Ok((relation, summary))
    }

    /// Sub-relation built by the decomposition engine from attributes and
    /// dependencies that are already known to be consistent.
    pub(crate) fn from_parts(
        name: String,
        attributes: Vec<Attribute>,
        mut fds: Vec<FunctionalDependency>,
    ) -> Self {
        fds.sort();
        Self {
            name,
            attributes,
            fds,
            mvds: Vec::new(),
            integrity_error: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attributes in declaration order.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attribute_set(&self) -> AttributeSet {
        self.attributes.iter().collect()
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name() == name)
    }

    pub fn functional_dependencies(&self) -> &[FunctionalDependency] {
        &self.fds
    }

    pub fn multivalued_dependencies(&self) -> &[MultivaluedDependency] {
        &self.mvds
    }

    pub fn passed_integrity_checks(&self) -> bool {
        self.integrity_error.is_none()
    }

    pub fn integrity_error(&self) -> Option<&SchemaError> {
        self.integrity_error.as_ref()
    }

    /// Adds a batch of functional dependencies.
    ///
    /// The first unknown attribute or duplicate rejects the whole batch:
    /// nothing is added and the error is recorded on the relation.
    pub fn add_functional_dependencies(
        &mut self,
        decls: &[DependencyDecl],
    ) -> Result<IngestSummary, SchemaError> {
        self.check_integrity()?;
        let resolved = self.resolve(decls, &self.fds, "functional");
        let (accepted, summary) = self.record(resolved, "functional")?;
        self.fds.extend(accepted);
        self.fds.sort();
        Ok(summary)
    }

    /// Adds a batch of multivalued dependencies, with the same rejection rules.
    pub fn add_multivalued_dependencies(
        &mut self,
        decls: &[DependencyDecl],
    ) -> Result<IngestSummary, SchemaError> {
        self.check_integrity()?;
        let resolved = self.resolve(decls, &self.mvds, "multivalued");
        let (accepted, summary) = self.record(resolved, "multivalued")?;
        self.mvds.extend(accepted);
        self.mvds.sort();
        Ok(summary)
    }

    fn check_integrity(&self) -> Result<(), SchemaError> {
        match &self.integrity_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn record<T>(
        &mut self,
        resolved: Result<T, SchemaError>,
        kind: &'static str,
    ) -> Result<T, SchemaError> {
        resolved.inspect_err(|err| {
            log::warn!("rejecting {} dependency batch: {}", kind, err);
            self.integrity_error = Some(err.clone());
        })
    }

    fn resolve<K: Arrow>(
        &self,
        decls: &[DependencyDecl],
        existing: &[Dependency<K>],
        kind: &'static str,
    ) -> Result<(Vec<Dependency<K>>, IngestSummary), SchemaError> {
        let mut accepted: Vec<Dependency<K>> = Vec::new();
        let mut summary = IngestSummary::default();

        for decl in decls {
            if decl.left.is_empty() || decl.right.is_empty() {
                log::warn!(
                    "dropping improper {} dependency {:?} -> {:?}",
                    kind,
                    decl.left,
                    decl.right
                );
                summary.dropped += 1;
                continue;
            }

            let left = self.lookup_all(&decl.left)?;
            let right = self.lookup_all(&decl.right)?;
            let dependency = Dependency::<K>::new(left, right);

            let duplicate = existing
                .iter()
                .chain(accepted.iter())
                .any(|d| d.name() == dependency.name());
            if duplicate {
                return Err(SchemaError::DuplicateDependency {
                    kind,
                    name: dependency.name().to_string(),
                });
            }

            accepted.push(dependency);
            summary.accepted += 1;
        }

        Ok((accepted, summary))
    }

    fn lookup_all(&self, names: &[String]) -> Result<AttributeSet, SchemaError> {
        names
            .iter()
            .map(|n| {
                let n = n.trim();
                self.attribute(n)
                    .cloned()
                    .ok_or_else(|| SchemaError::UnknownAttribute {
                        attribute: n.to_string(),
                        relation: self.name.clone(),
                    })
            })
            .collect()
    }

    /// `R(A, B) having FD(s): A->B.`
    pub fn describe(&self) -> String {
        crate::serializer::describe(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dependency::join_names;
    use crate::parser::Parser;

    fn movies() -> Relation {
        Relation::new("R", ["TITLE", "YEAR", "STUDIONAME", "PRESIDENT", "PRESADDR"])
    }

    #[test]
    fn test_new_relation() {
        let r = movies();
        assert!(r.passed_integrity_checks());
        assert_eq!(r.attributes().len(), 5);
        assert_eq!(r.attribute("YEAR").map(|a| a.name()), Some("YEAR"));
    }

    #[test]
    fn test_duplicate_attribute() {
        let r = Relation::new("R", ["A", "B", "A"]);
        assert!(!r.passed_integrity_checks());
        assert_eq!(
            r.integrity_error().map(|e| e.to_string()),
            Some("Duplicate attribute encountered: A".to_string())
        );
    }

    #[test]
    fn test_empty_schema() {
        let r = Relation::new("R", Vec::<String>::new());
        assert!(matches!(r.integrity_error(), Some(SchemaError::EmptySchema(_))));
    }

    #[test]
    fn test_add_functional_dependencies() {
        let mut r = movies();
        let summary = r
            .add_functional_dependencies(&[
                DependencyDecl::new(["TITLE", "YEAR"], ["STUDIONAME"]),
                DependencyDecl::new(["STUDIONAME"], ["PRESIDENT"]),
            ])
            .unwrap();
        assert_eq!(summary.accepted, 2);
        assert_eq!(
            join_names(r.functional_dependencies()),
            "STUDIONAME->PRESIDENT; YEAR,TITLE->STUDIONAME"
        );
    }

    #[test]
    fn test_unknown_attribute_rejects_batch() {
        let mut r = movies();
        let err = r
            .add_functional_dependencies(&[
                DependencyDecl::new(["TITLE"], ["YEAR"]),
                DependencyDecl::new(["TITLE"], ["GENRE"]),
            ])
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Attribute GENRE does not exist in schema of Relation R"
        );
        assert!(r.functional_dependencies().is_empty());
        assert!(!r.passed_integrity_checks());
    }

    #[test]
    fn test_duplicate_dependency_by_canonical_name() {
        let mut r = Relation::new("R", ["A", "B", "C"]);
        let err = r
            .add_functional_dependencies(&[
                DependencyDecl::new(["A", "B"], ["C"]),
                DependencyDecl::new(["B", "A"], ["C"]),
            ])
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateDependency { .. }));
    }

    #[test]
    fn test_improper_dependency_dropped() {
        let mut r = Relation::new("R", ["A", "B"]);
        let summary = r
            .add_functional_dependencies(&[DependencyDecl::new(Vec::<String>::new(), ["A"])])
            .unwrap();
        assert!(summary.all_dropped());
        assert!(r.passed_integrity_checks());
    }

    #[test]
    fn test_multivalued_ingestion() {
        let mut r = Relation::new("R", ["NAME", "STREET", "CITY"]);
        r.add_multivalued_dependencies(&[DependencyDecl::new(["NAME"], ["STREET", "CITY"])])
            .unwrap();
        assert_eq!(r.multivalued_dependencies()[0].name(), "NAME->->CITY,STREET");
    }

    #[test]
    fn test_from_document() {
        let doc = Parser::new("relation R(A, B, C)\nfd A -> B; C\nmvd A ->-> C")
            .unwrap()
            .parse()
            .unwrap();
        let (r, summary) = Relation::from_document(&doc).unwrap();
        assert_eq!(r.functional_dependencies().len(), 1);
        assert_eq!(r.multivalued_dependencies().len(), 1);
        assert_eq!(summary.malformed, 1);
        assert_eq!(summary.warnings().len(), 1);
    }

    #[test]
    fn test_from_document_with_duplicate_attribute() {
        let doc = Parser::new("relation R(A, A)").unwrap().parse().unwrap();
        let err = Relation::from_document(&doc).unwrap_err();
        assert_eq!(err, SchemaError::DuplicateAttribute("A".to_string()));
    }

    #[test]
    fn test_describe() {
        let mut r = Relation::new("R", ["A", "B"]);
        assert_eq!(r.describe(), "R(A, B) having FD(s): (none).");
        r.add_functional_dependencies(&[DependencyDecl::new(["A"], ["B"])])
            .unwrap();
        assert_eq!(r.describe(), "R(A, B) having FD(s): A->B.");
    }
}
