use crate::analysis::NormalForm;
use crate::decompose::{Decomposition, Outcome, Strategy};
use crate::dependency::join_names;
use crate::measure::TextMetrics;
use crate::relation::Relation;
use crate::report::Report;
use std::fmt::{self, Write};

pub struct TextRenderer {
    metrics: TextMetrics,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            metrics: TextMetrics::default(),
        }
    }
}

struct TextReport<'a> {
    renderer: &'a TextRenderer,
    report: &'a Report,
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.renderer.write_report(f, self.report)
    }
}

fn list<'a>(items: impl IntoIterator<Item = &'a str>) -> String {
    let joined = items.into_iter().collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        "(none)".to_string()
    } else {
        joined
    }
}

impl TextRenderer {
    pub fn render(&self, report: &Report) -> String {
        TextReport {
            renderer: self,
            report,
        }
        .to_string()
    }

    fn write_report(&self, out: &mut dyn Write, report: &Report) -> fmt::Result {
        self.write_relation(out, report)?;
        if let Some(closures) = &report.closures {
            self.write_closures(out, closures)?;
        }
        self.write_keys(out, report)?;
        self.write_cover(out, report)?;
        if let Some(derived) = &report.derived_dependencies {
            writeln!(out)?;
            writeln!(out, "== Derived functional dependencies ==")?;
            if derived.is_empty() {
                writeln!(out, "There are no new functional dependencies aside from the given ones.")?;
            }
            for f in derived {
                writeln!(out, "{}{}", " ".repeat(self.metrics.indent), f)?;
            }
        }
        self.write_normal_forms(out, report)?;
        if let Some(third) = &report.third_normal_form {
            writeln!(out)?;
            writeln!(out, "== 3NF decomposition (lossless, dependency preserving) ==")?;
            self.write_decomposition(out, third)?;
        }
        if let Some(bcnf) = &report.bcnf {
            writeln!(out)?;
            writeln!(out, "== BCNF decomposition (lossless) ==")?;
            writeln!(out, "-- from the relation itself --")?;
            self.write_decomposition(out, bcnf.from_relation())?;
            writeln!(out, "-- from the synthesized 3NF relations --")?;
            self.write_decomposition(out, bcnf.from_third_normal_form())?;
            let chosen = match bcnf.strategy() {
                Strategy::FromRelation => "the relation itself",
                Strategy::FromThirdNormalForm => "the synthesized 3NF relations",
            };
            writeln!(out, "Chosen decomposition: started from {}.", chosen)?;
        }
        Ok(())
    }

    fn write_relation(&self, out: &mut dyn Write, report: &Report) -> fmt::Result {
        let relation = &report.relation;
        writeln!(
            out,
            "Relation {}({})",
            relation.name,
            list(relation.attributes.iter().map(|a| a.name()))
        )?;
        writeln!(
            out,
            "Functional dependencies: {}",
            join_names(&relation.functional_dependencies)
        )?;
        writeln!(
            out,
            "Multivalued dependencies: {}",
            join_names(&relation.multivalued_dependencies)
        )
    }

    fn write_closures(&self, out: &mut dyn Write, closures: &[crate::analysis::Closure]) -> fmt::Result {
        writeln!(out)?;
        writeln!(out, "== Closures ==")?;
        let lefts: Vec<String> = closures.iter().map(|c| format!("{}+", c.left())).collect();
        let width = self.metrics.column_width(lefts.iter().map(String::as_str));
        for (left, c) in lefts.iter().zip(closures) {
            writeln!(out, "{}", self.metrics.row(left, width, &c.right().to_string()))?;
        }
        Ok(())
    }

    fn write_keys(&self, out: &mut dyn Write, report: &Report) -> fmt::Result {
        let keys = &report.keys;
        let minimum = keys.minimum_keys();
        let composite = minimum.iter().filter(|k| k.left().len() > 1).count();

        writeln!(out)?;
        writeln!(out, "== Keys ==")?;
        match (minimum.len(), composite) {
            (1, 0) => writeln!(
                out,
                "Found 1 minimum candidate key. There are no composite minimum candidate keys."
            )?,
            (1, _) => writeln!(
                out,
                "Found 1 composite minimum candidate key. There are no non-composite minimum candidate keys."
            )?,
            (n, 1) => writeln!(
                out,
                "Found {} minimum candidate keys, of which 1 is a composite minimum candidate key.",
                n
            )?,
            (n, c) => writeln!(
                out,
                "Found {} minimum candidate keys, of which {} are composite minimum candidate keys.",
                n, c
            )?,
        }
        for key in minimum {
            writeln!(out, "{}{}", " ".repeat(self.metrics.indent), key.left())?;
        }
        let superkeys = keys.superkeys().len();
        if superkeys == 1 {
            writeln!(out, "Found 1 superkey (excluding minimum candidate keys).")?;
        } else {
            writeln!(
                out,
                "Found {} superkeys (excluding minimum candidate keys).",
                superkeys
            )?;
        }
        writeln!(
            out,
            "Prime attributes (part of a minimum candidate key): {}.",
            list(keys.prime_attributes().iter().map(|a| a.name()))
        )?;
        writeln!(
            out,
            "Non-prime attributes (not part of any minimum candidate key): {}.",
            list(keys.non_prime_attributes().iter().map(|a| a.name()))
        )
    }

    fn write_cover(&self, out: &mut dyn Write, report: &Report) -> fmt::Result {
        let summary = &report.minimal_cover;
        let cover = &summary.cover;

        writeln!(out)?;
        writeln!(
            out,
            "== Minimal cover (right-hand sides merged per left-hand side) =="
        )?;
        if cover.is_empty() {
            writeln!(out, "There are no functional dependencies in the minimal cover.")?;
        } else {
            writeln!(out, "F_min = {{ {} }}", join_names(cover.fds()))?;
        }

        if cover.lost().is_empty() {
            writeln!(
                out,
                "All given functional dependencies were included in the minimal cover."
            )?;
        } else {
            writeln!(
                out,
                "Not included in the minimal cover: {}.",
                join_names(cover.lost())
            )?;
        }
        if summary.lost_partially_kept {
            writeln!(
                out,
                "Note: an excluded dependency with more than one left-hand attribute may still have \
                 the part of its left-hand side that belongs to the minimal cover included."
            )?;
        }
        Ok(())
    }

    fn write_normal_forms(&self, out: &mut dyn Write, report: &Report) -> fmt::Result {
        writeln!(out)?;
        writeln!(out, "== Normal forms ==")?;
        for form in [
            NormalForm::First,
            NormalForm::Second,
            NormalForm::Third,
            NormalForm::BoyceCodd,
            NormalForm::Fourth,
        ] {
            let verdict = report.normal_forms.verdict(form);
            let mark = if verdict.holds { "yes" } else { "no" };
            writeln!(out, "{} [{}] {}", form, mark, verdict.rationale)?;
        }
        match report.highest_normal_form {
            Some(form) => writeln!(out, "Highest normal form: {}", form),
            None => writeln!(out, "Highest normal form: (none)"),
        }
    }

    fn write_decomposition(&self, out: &mut dyn Write, d: &Decomposition) -> fmt::Result {
        if let Outcome::NotNeeded(reason) = d.outcome() {
            return writeln!(out, "{}", reason);
        }
        if d.had_subsumed() {
            writeln!(out, "Initial relations:")?;
            self.write_relations(out, d.initial_relations())?;
            writeln!(out, "Final relations (duplicates and subsets removed):")?;
        } else {
            writeln!(out, "Final relations:")?;
        }
        self.write_relations(out, d.relations())?;
        for note in d.notes() {
            writeln!(out, "{}", note)?;
        }
        if d.lost().is_empty() {
            writeln!(out, "No functional dependencies from the minimal cover were lost.")
        } else {
            writeln!(
                out,
                "Lost functional dependencies from the minimal cover: {}.",
                join_names(d.lost())
            )
        }
    }

    fn write_relations(&self, out: &mut dyn Write, relations: &[Relation]) -> fmt::Result {
        for r in relations {
            writeln!(out, "{}{}", " ".repeat(self.metrics.indent), r.describe())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::DependencyDecl;
    use crate::config::ReportConfig;

    fn render(names: &[&str], fds: &[DependencyDecl], config: &ReportConfig) -> String {
        let mut r = Relation::new("R", names.iter().copied());
        r.add_functional_dependencies(fds).unwrap();
        let report = Report::build(&r.analyze().unwrap(), config).unwrap();
        TextRenderer::default().render(&report)
    }

    #[test]
    fn test_render_basic() {
        let text = render(
            &["A", "B", "C"],
            &[DependencyDecl::new(["A"], ["B", "C"])],
            &ReportConfig::default(),
        );
        assert!(text.starts_with("Relation R(A, B, C)\n"));
        assert!(text.contains("Found 1 minimum candidate key."));
        assert!(text.contains("F_min = { A->B,C }"));
        assert!(text.contains("Relation is already in BCNF."));
        assert!(text.contains("Highest normal form: 4NF"));
    }

    #[test]
    fn test_render_closures_aligned_by_display_width() {
        let text = render(&["名前", "B"], &[], &ReportConfig::default());
        assert!(text.contains("  {B}+        {B}\n"));
        assert!(text.contains("  {名前}+     {名前}\n"));
        assert!(text.contains("  {B, 名前}+  {B, 名前}\n"));
    }

    #[test]
    fn test_render_decomposition() {
        let text = render(
            &["TITLE", "YEAR", "STUDIONAME", "PRESIDENT", "PRESADDR"],
            &[
                DependencyDecl::new(["TITLE", "YEAR"], ["STUDIONAME"]),
                DependencyDecl::new(["STUDIONAME"], ["PRESIDENT"]),
                DependencyDecl::new(["PRESIDENT"], ["PRESADDR"]),
            ],
            &ReportConfig::default(),
        );
        assert!(text.contains("  R0(PRESIDENT, PRESADDR) having FD(s): PRESIDENT->PRESADDR.\n"));
        assert!(text.contains("Initial relations:"));
        assert!(text.contains("Chosen decomposition: started from the synthesized 3NF relations."));
    }

    #[test]
    fn test_render_without_optional_sections() {
        let config = ReportConfig {
            closures: false,
            derived: false,
            decompositions: false,
            ..ReportConfig::default()
        };
        let text = render(&["A", "B"], &[DependencyDecl::new(["A"], ["B"])], &config);
        assert!(!text.contains("== Closures =="));
        assert!(!text.contains("== BCNF decomposition"));
        assert!(text.contains("== Normal forms =="));
    }
}
