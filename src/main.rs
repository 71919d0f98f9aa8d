use anyhow::{Context, Result, bail};
use clap::Parser;
use relnorm::ast::Document;
use relnorm::config::{OutputFormat, ReportConfig};
use relnorm::parser::Parser as DocumentParser;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Relational schema normalization: keys, covers, normal forms and decompositions")]
struct Args {
    /// Input file with `relation`, `fd` and `mvd` statements
    input: Option<PathBuf>,

    /// Bare schema such as `R(A, B, C)`, used instead of an input file
    #[arg(long, conflicts_with = "input")]
    schema: Option<String>,

    /// Functional dependencies for --schema, e.g. `A->B; B,C->A`
    #[arg(long, requires = "schema", default_value = "")]
    fds: String,

    /// Multivalued dependencies for --schema, e.g. `A->->B`
    #[arg(long, requires = "schema", default_value = "")]
    mvds: String,

    /// Output format
    #[arg(short, long, value_enum, env = "RELNORM_FORMAT", default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Omit the closure table
    #[arg(long)]
    no_closures: bool,

    /// Omit derived functional dependencies
    #[arg(long)]
    no_derived: bool,

    /// Skip 3NF and BCNF decompositions
    #[arg(long)]
    no_decompose: bool,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl Args {
    fn report_config(&self) -> ReportConfig {
        ReportConfig {
            format: self.format,
            closures: !self.no_closures,
            derived: !self.no_derived,
            decompositions: !self.no_decompose,
        }
    }

    fn document(&self) -> Result<Document> {
        if let Some(schema) = &self.schema {
            return relnorm::document_from_parts(schema, &self.fds, &self.mvds)
                .context("Failed to parse relation");
        }
        let Some(path) = &self.input else {
            bail!("Either an input file or --schema is required");
        };
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut parser = DocumentParser::new(&source)
            .with_context(|| format!("Failed to tokenize {}", path.display()))?;
        parser
            .parse()
            .with_context(|| format!("Failed to parse {}", path.display()))
    }
}

fn main() -> Result<()> {
    env_logger::init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "warn"),
    );

    let args = Args::parse();
    let config = args.report_config();
    let doc = args.document()?;

    let (rendered, summary) = relnorm::analyze_document(&doc, &config)
        .with_context(|| format!("Failed to analyze relation {}", doc.schema.name))?;
    for warning in summary.warnings() {
        log::warn!("{}", warning);
    }

    match &args.output {
        Some(path) => fs::write(path, &rendered)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => print!("{}", rendered),
    }
    Ok(())
}
