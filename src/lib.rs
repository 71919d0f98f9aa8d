pub mod analysis;
pub mod ast;
pub mod attribute;
pub mod config;
pub mod decompose;
pub mod dependency;
pub mod lexer;
pub mod measure;
pub mod parser;
pub mod relation;
pub mod render;
pub mod report;
pub mod serializer;

use wasm_bindgen::prelude::*;

use analysis::AnalysisError;
use ast::{DependencyKind, Document};
use config::{OutputFormat, ReportConfig};
use parser::{ParseError, parse_dependencies, parse_schema};
use relation::{LoadSummary, Relation, SchemaError};
use render::TextRenderer;
use report::Report;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unknown output format: {0}")]
    UnknownFormat(String),
}

/// Assemble a document from a bare schema and bare dependency lists.
pub fn document_from_parts(schema: &str, fds: &str, mvds: &str) -> Result<Document, Error> {
    let schema = parse_schema(schema)?;
    let fds = parse_dependencies(fds, DependencyKind::Functional)?;
    let mvds = parse_dependencies(mvds, DependencyKind::Multivalued)?;
    Ok(Document {
        schema,
        malformed: fds.malformed + mvds.malformed,
        fds: fds.items,
        mvds: mvds.items,
    })
}

/// Load, analyze and render a document according to `config`.
pub fn analyze_document(doc: &Document, config: &ReportConfig) -> Result<(String, LoadSummary), Error> {
    let (relation, summary) = Relation::from_document(doc)?;
    let rendered = analyze_relation(&relation, config)?;
    Ok((rendered, summary))
}

pub fn analyze_relation(relation: &Relation, config: &ReportConfig) -> Result<String, Error> {
    let analysis = relation.analyze()?;
    let report = Report::build(&analysis, config)?;
    match config.format {
        OutputFormat::Text => Ok(TextRenderer::default().render(&report)),
        OutputFormat::Json => Ok(serializer::to_json(&report)?),
    }
}

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Analyze a relation given as a bare schema plus dependency lists
#[wasm_bindgen(js_name = "analyzeRelation")]
pub fn analyze_relation_js(
    schema: &str,
    fds: &str,
    mvds: Option<String>,
    format: Option<String>,
) -> Result<String, JsValue> {
    run_parts(schema, fds, mvds.as_deref().unwrap_or(""), format.as_deref())
        .map_err(|e| js_sys::Error::new(&e.to_string()).into())
}

fn run_parts(schema: &str, fds: &str, mvds: &str, format: Option<&str>) -> Result<String, Error> {
    let format = match format {
        Some(name) => {
            OutputFormat::from_name(name).ok_or_else(|| Error::UnknownFormat(name.to_string()))?
        }
        None => OutputFormat::default(),
    };
    let doc = document_from_parts(schema, fds, mvds)?;
    let config = ReportConfig::default().with_format(format);
    let (rendered, summary) = analyze_document(&doc, &config)?;
    for warning in summary.warnings() {
        log::warn!("{}", warning);
    }
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::attribute_set;
    use crate::decompose::Strategy;
    use crate::dependency::join_names;
    use crate::parser::Parser;

    const ADDRESSES: &str = r#"
        relation R(NAME, STREET, CITY, TITLE, YEAR)
        mvd NAME ->-> STREET, CITY
    "#;

    const STUDIOS: &str = r#"
        relation R(TITLE, YEAR, STUDIONAME, PRESIDENT, PRESADDR)
        fd TITLE, YEAR -> STUDIONAME; STUDIONAME -> PRESIDENT; PRESIDENT -> PRESADDR
    "#;

    fn load(source: &str) -> Relation {
        let doc = Parser::new(source).unwrap().parse().unwrap();
        Relation::from_document(&doc).unwrap().0
    }

    #[test]
    fn test_multivalued_scenario() {
        let analysis = load(ADDRESSES).analyze().unwrap();
        let forms = analysis.normal_forms();
        assert!(forms.is_in_second());
        assert!(forms.is_in_third());
        assert!(forms.is_in_bcnf());
        assert!(!forms.is_in_fourth());

        let third = analysis.decompose_third_normal_form().unwrap();
        assert!(!third.is_decomposed());
        assert_eq!(third.relations().len(), 1);
        let bcnf = analysis.compare_bcnf_strategies().unwrap();
        assert!(!bcnf.chosen().is_decomposed());
        assert!(bcnf.chosen().lost().is_empty());
    }

    #[test]
    fn test_studio_scenario() {
        let analysis = load(STUDIOS).analyze().unwrap();
        let keys = analysis.keys().minimum_keys();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].left(), &attribute_set(["TITLE", "YEAR"]));
        assert!(!analysis.normal_forms().is_in_third());

        let bcnf = analysis.decompose_bcnf().unwrap();
        let schemas: Vec<_> = bcnf.relations().iter().map(Relation::attribute_set).collect();
        assert!(schemas.contains(&attribute_set(["STUDIONAME", "PRESIDENT"])));
        assert!(schemas.contains(&attribute_set(["PRESIDENT", "PRESADDR"])));
        assert!(bcnf.lost().is_empty());

        let comparison = analysis.compare_bcnf_strategies().unwrap();
        assert_eq!(comparison.strategy(), Strategy::FromThirdNormalForm);
    }

    #[test]
    fn test_cover_soundness_textbook() {
        let source = "relation R(A, B, C, D, E, G)\n\
                      fd B->D; D,G->C; B,D->E; A,G->B; A,D,G->B; A,D,G->C";
        let analysis = load(source).analyze().unwrap();
        let cover = analysis.minimal_cover().fds();
        assert!(!cover.iter().any(|f| f.name() == "A,D,G->B"));

        let mut from_cover = Relation::new("R", ["A", "B", "C", "D", "E", "G"]);
        let decls: Vec<_> = cover
            .iter()
            .map(|f| {
                ast::DependencyDecl::new(
                    f.left().iter().map(|a| a.name()),
                    f.right().iter().map(|a| a.name()),
                )
            })
            .collect();
        from_cover.add_functional_dependencies(&decls).unwrap();
        let recomputed = from_cover.analyze().unwrap();
        assert_eq!(
            recomputed.keys().minimum_keys()[0].left(),
            analysis.keys().minimum_keys()[0].left()
        );
        assert_eq!(analysis.keys().minimum_keys()[0].left(), &attribute_set(["A", "G"]));
    }

    #[test]
    fn test_document_from_parts() {
        let doc = document_from_parts("R(A, B, C)", "A->B; B", "").unwrap();
        assert_eq!(doc.fds.len(), 1);
        assert_eq!(doc.malformed, 1);
        assert!(doc.mvds.is_empty());
    }

    #[test]
    fn test_run_parts_json() {
        let json = run_parts("R(A, B)", "A->B", "", Some("json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["highest_normal_form"], "4NF");
    }

    #[test]
    fn test_run_parts_errors() {
        let err = run_parts("R(A, B)", "A->C", "", None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Schema error: Attribute C does not exist in schema of Relation R"
        );
        assert!(matches!(
            run_parts("R(A)", "", "", Some("svg")),
            Err(Error::UnknownFormat(_))
        ));
        assert!(matches!(run_parts("R(A", "", "", None), Err(Error::Parse(_))));
    }

    #[test]
    fn test_analyze_document_text() {
        let doc = Parser::new(STUDIOS).unwrap().parse().unwrap();
        let (text, summary) = analyze_document(&doc, &ReportConfig::default()).unwrap();
        assert!(summary.warnings().is_empty());
        assert!(text.contains("Relation R(TITLE, YEAR, STUDIONAME, PRESIDENT, PRESADDR)"));
        assert!(text.contains(&format!(
            "F_min = {{ {} }}",
            join_names(load(STUDIOS).analyze().unwrap().minimal_cover().fds())
        )));
    }
}
