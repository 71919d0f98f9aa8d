//! Normal form checks from 1NF through 4NF.

use super::closure::Closures;
use super::keys::Keys;
use crate::attribute::{Attribute, AttributeSet};
use crate::dependency::{
    FunctionalDependency, MultivaluedDependency, join_names, push_unique,
};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum NormalForm {
    #[serde(rename = "1NF")]
    First,
    #[serde(rename = "2NF")]
    Second,
    #[serde(rename = "3NF")]
    Third,
    #[serde(rename = "BCNF")]
    BoyceCodd,
    #[serde(rename = "4NF")]
    Fourth,
}

impl fmt::Display for NormalForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NormalForm::First => "1NF",
            NormalForm::Second => "2NF",
            NormalForm::Third => "3NF",
            NormalForm::BoyceCodd => "BCNF",
            NormalForm::Fourth => "4NF",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub holds: bool,
    pub rationale: String,
}

impl Verdict {
    fn new(holds: bool, rationale: impl Into<String>) -> Self {
        Self {
            holds,
            rationale: rationale.into(),
        }
    }
}

/// A non-prime attribute determined by a proper subset of a composite key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartialDependency {
    pub attribute: Attribute,
    pub determinant: AttributeSet,
    pub key: AttributeSet,
}

#[derive(Debug, Clone, Serialize)]
pub struct NormalFormResult {
    first: Verdict,
    second: Verdict,
    third: Verdict,
    bcnf: Verdict,
    fourth: Verdict,
    partial_dependencies: Vec<PartialDependency>,
    third_violations: Vec<FunctionalDependency>,
    bcnf_violations: Vec<FunctionalDependency>,
    fourth_violations: Vec<MultivaluedDependency>,
}

impl NormalFormResult {
    pub fn verdict(&self, form: NormalForm) -> &Verdict {
        match form {
            NormalForm::First => &self.first,
            NormalForm::Second => &self.second,
            NormalForm::Third => &self.third,
            NormalForm::BoyceCodd => &self.bcnf,
            NormalForm::Fourth => &self.fourth,
        }
    }

    pub fn is_in_first(&self) -> bool {
        self.first.holds
    }

    pub fn is_in_second(&self) -> bool {
        self.second.holds
    }

    pub fn is_in_third(&self) -> bool {
        self.third.holds
    }

    pub fn is_in_bcnf(&self) -> bool {
        self.bcnf.holds
    }

    pub fn is_in_fourth(&self) -> bool {
        self.fourth.holds
    }

    /// Highest form reached without skipping a lower one.
    pub fn highest(&self) -> Option<NormalForm> {
        [
            NormalForm::First,
            NormalForm::Second,
            NormalForm::Third,
            NormalForm::BoyceCodd,
            NormalForm::Fourth,
        ]
        .into_iter()
        .take_while(|f| self.verdict(*f).holds)
        .last()
    }

    pub fn partial_dependencies(&self) -> &[PartialDependency] {
        &self.partial_dependencies
    }

    pub fn third_violations(&self) -> &[FunctionalDependency] {
        &self.third_violations
    }

    /// Non-trivial dependencies whose left side is not a key or superkey.
    /// Computed even when 3NF already fails.
    pub fn bcnf_violations(&self) -> &[FunctionalDependency] {
        &self.bcnf_violations
    }

    pub fn fourth_violations(&self) -> &[MultivaluedDependency] {
        &self.fourth_violations
    }
}

const THIRD_CONDITIONS: &str = "(1) the right-hand side is a subset of the left-hand side, \
     (2) the left-hand side is a superkey (or minimum key) of the relation, or \
     (3) every right-hand side attribute outside the left-hand side is part of some minimum key of the relation";

const BCNF_CONDITIONS: &str = "(1) the right-hand side is a subset of the left-hand side, or \
     (2) the left-hand side is a superkey (or minimum key) of the relation";

const TRIVIAL_MVD: &str = "A multivalued dependency is trivial if either (1) the right-hand side \
     is a subset of the left-hand side, or (2) it contains all attributes of the relation.";

fn failed_phrase(count: usize) -> &'static str {
    if count == 1 {
        "dependency that failed is"
    } else {
        "dependencies that failed are"
    }
}

/// Runs every check against `cover`, the relation's canonical cover.
pub fn determine_normal_forms(
    schema: &AttributeSet,
    cover: &[FunctionalDependency],
    mvds: &[MultivaluedDependency],
    closures: &Closures,
    keys: &Keys,
) -> NormalFormResult {
    let first = Verdict::new(
        true,
        "Relation is assumed to be in 1NF: each attribute holds a single value per row.",
    );

    let partial_dependencies = find_partial_dependencies(closures, keys);
    let second = second_verdict(first.holds, keys, &partial_dependencies);

    let third_violations: Vec<FunctionalDependency> = cover
        .iter()
        .filter(|f| !satisfies_third(f, keys))
        .cloned()
        .collect();
    let third = third_verdict(second.holds, &third_violations);

    let bcnf_violations: Vec<FunctionalDependency> = cover
        .iter()
        .filter(|f| !f.is_trivial() && !keys.is_key_or_superkey(f.left()))
        .cloned()
        .collect();
    let bcnf = bcnf_verdict(third.holds, &bcnf_violations);

    let mut combined: Vec<MultivaluedDependency> = mvds.to_vec();
    for f in cover {
        push_unique(&mut combined, f.to_multivalued());
    }
    let fourth_violations: Vec<MultivaluedDependency> = combined
        .into_iter()
        .filter(|m| !is_trivial_multivalued(m, schema) && !keys.is_key_or_superkey(m.left()))
        .collect();
    let fourth = fourth_verdict(bcnf.holds, &fourth_violations);

    log::debug!(
        "normal forms: 2NF={} 3NF={} BCNF={} 4NF={}",
        second.holds,
        third.holds,
        bcnf.holds,
        fourth.holds
    );

    NormalFormResult {
        first,
        second,
        third,
        bcnf,
        fourth,
        partial_dependencies,
        third_violations,
        bcnf_violations,
        fourth_violations,
    }
}

fn find_partial_dependencies(closures: &Closures, keys: &Keys) -> Vec<PartialDependency> {
    let mut found: Vec<PartialDependency> = Vec::new();

    for key in keys.minimum_keys().iter().filter(|k| k.left().len() > 1) {
        let candidates = key.right().iter().filter(|a| !keys.is_prime(a));
        for attribute in candidates {
            let determinant = closures
                .iter()
                .take_while(|c| c.left().len() < key.left().len())
                .find(|c| {
                    c.left().is_strict_subset(key.left())
                        && c.determines(attribute)
                        && !c.left().contains(attribute)
                });
            let Some(determinant) = determinant else {
                continue;
            };
            if found.iter().any(|p| &p.attribute == attribute) {
                continue;
            }
            found.push(PartialDependency {
                attribute: attribute.clone(),
                determinant: determinant.left().clone(),
                key: key.left().clone(),
            });
        }
    }

    found
}

fn satisfies_third(f: &FunctionalDependency, keys: &Keys) -> bool {
    f.is_trivial()
        || keys.is_key_or_superkey(f.left())
        || f.right()
            .difference(f.left())
            .iter()
            .all(|a| keys.in_some_minimum_key(a))
}

fn is_trivial_multivalued(m: &MultivaluedDependency, schema: &AttributeSet) -> bool {
    m.is_trivial() || schema.is_subset(&m.attributes())
}

fn second_verdict(first: bool, keys: &Keys, partial: &[PartialDependency]) -> Verdict {
    if !first {
        return Verdict::new(false, "Relation is not in 2NF because it is not in 1NF.");
    }
    if keys.minimum_keys().iter().all(|k| k.left().len() == 1) {
        return Verdict::new(
            true,
            "Relation is in 2NF: it is in 1NF and there are no composite minimum keys \
             (minimum keys of more than one attribute).",
        );
    }
    if partial.is_empty() {
        return Verdict::new(
            true,
            "Relation is in 2NF: it is in 1NF and no non-prime attribute depends on \
             only part of a composite minimum key.",
        );
    }

    let details: Vec<String> = partial
        .iter()
        .map(|p| {
            format!(
                "attribute {} is functionally determined by {} instead of only by the full \
                 composite minimum key {}",
                p.attribute, p.determinant, p.key
            )
        })
        .collect();
    Verdict::new(
        false,
        format!(
            "Relation is not in 2NF: there is at least one partial dependency on a composite \
             minimum key. No non-prime attribute may be functionally determined by a proper \
             subset of a composite minimum key, but {}.",
            details.join("; ")
        ),
    )
}

fn third_verdict(second: bool, violations: &[FunctionalDependency]) -> Verdict {
    if second && violations.is_empty() {
        return Verdict::new(
            true,
            format!(
                "Relation is in 3NF: it is in 2NF and every functional dependency satisfies \
                 one of: {}.",
                THIRD_CONDITIONS
            ),
        );
    }
    let status = if second {
        "it is in 2NF but"
    } else {
        "it is not in 2NF and"
    };
    let mut rationale = format!(
        "Relation is not in 3NF: {} not every functional dependency satisfies one of: {}.",
        status, THIRD_CONDITIONS
    );
    if !violations.is_empty() {
        rationale.push_str(&format!(
            " The functional {}: {}.",
            failed_phrase(violations.len()),
            join_names(violations)
        ));
    }
    Verdict::new(false, rationale)
}

fn bcnf_verdict(third: bool, violations: &[FunctionalDependency]) -> Verdict {
    if third && violations.is_empty() {
        return Verdict::new(
            true,
            format!(
                "Relation is in BCNF: it is in 3NF and every functional dependency satisfies \
                 one of: {}.",
                BCNF_CONDITIONS
            ),
        );
    }
    let status = if third {
        "it is in 3NF but"
    } else {
        "it is not in 3NF and"
    };
    let mut rationale = format!(
        "Relation is not in BCNF: {} not every functional dependency satisfies one of: {}.",
        status, BCNF_CONDITIONS
    );
    if !violations.is_empty() {
        rationale.push_str(&format!(
            " The functional {}: {}.",
            failed_phrase(violations.len()),
            join_names(violations)
        ));
    }
    Verdict::new(false, rationale)
}

fn fourth_verdict(bcnf: bool, violations: &[MultivaluedDependency]) -> Verdict {
    if violations.is_empty() {
        return Verdict::new(
            true,
            format!(
                "Relation is in 4NF: every nontrivial multivalued dependency has a superkey \
                 (or minimum key) on its left-hand side. {}",
                TRIVIAL_MVD
            ),
        );
    }
    let status = if bcnf {
        "it is in BCNF but"
    } else {
        "it is not in BCNF and"
    };
    Verdict::new(
        false,
        format!(
            "Relation is not in 4NF: {} not every nontrivial multivalued dependency has a \
             superkey (or minimum key) on its left-hand side. {} The multivalued {}: {}.",
            status,
            TRIVIAL_MVD,
            failed_phrase(violations.len()),
            join_names(violations)
        ),
    )
}
