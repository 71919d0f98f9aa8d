//! Output serializers: the one-line relation notation and JSON reports.

use crate::dependency::join_names;
use crate::relation::Relation;
use crate::report::Report;

/// `R(A, B) having FD(s): A->B.`
pub fn describe(relation: &Relation) -> String {
    let names: Vec<&str> = relation.attributes().iter().map(|a| a.name()).collect();
    format!(
        "{}({}) having FD(s): {}.",
        relation.name(),
        names.join(", "),
        join_names(relation.functional_dependencies())
    )
}

/// Pretty-printed JSON for a report.
pub fn to_json(report: &Report) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::DependencyDecl;
    use crate::config::ReportConfig;

    #[test]
    fn test_describe() {
        let relation = Relation::new("R0", ["A", "B"]);
        assert_eq!(describe(&relation), "R0(A, B) having FD(s): (none).");
    }

    #[test]
    fn test_describe_with_dependencies() {
        let mut relation = Relation::new("R", ["A", "B", "C"]);
        relation
            .add_functional_dependencies(&[
                DependencyDecl::new(["A"], ["B", "C"]),
                DependencyDecl::new(["B", "C"], ["A"]),
            ])
            .unwrap();
        assert_eq!(describe(&relation), "R(A, B, C) having FD(s): A->B,C; B,C->A.");
    }

    #[test]
    fn test_to_json_is_pretty() {
        let relation = Relation::new("R", ["A"]);
        let report = Report::build(&relation.analyze().unwrap(), &ReportConfig::default()).unwrap();
        let json = to_json(&report).unwrap();
        assert!(json.starts_with("{\n"));
        assert!(json.contains("\"name\": \"R\""));
    }
}
