//! Canonical (minimal) cover of a set of functional dependencies.

use super::closure::{Closures, closure_of};
use crate::attribute::{Attribute, AttributeSet};
use crate::dependency::{FunctionalDependency, push_unique, split_all};
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct MinimalCover {
    fds: Vec<FunctionalDependency>,
    lost: Vec<FunctionalDependency>,
}

impl MinimalCover {
    /// Cover dependencies, right sides merged per left side.
    pub fn fds(&self) -> &[FunctionalDependency] {
        &self.fds
    }

    /// Given or intermediate dependencies that did not make it into the cover.
    pub fn lost(&self) -> &[FunctionalDependency] {
        &self.lost
    }

    /// Some lost dependency had a composite left side, so part of it may
    /// still appear in the cover.
    pub fn lost_partially_kept(&self) -> bool {
        self.lost.iter().any(|f| f.left().len() > 1)
    }

    pub fn is_empty(&self) -> bool {
        self.fds.is_empty()
    }
}

struct ClosureLookup<'a> {
    closures: &'a Closures,
    fds: &'a [FunctionalDependency],
}

impl ClosureLookup<'_> {
    fn determines(&self, left: &AttributeSet, attribute: &Attribute) -> bool {
        match self.closures.get(left) {
            Some(c) => c.determines(attribute),
            None => closure_of(left, self.fds).is_some_and(|c| c.determines(attribute)),
        }
    }
}

/// Computes the canonical cover of `given`.
///
/// `closures` are the closures of the relation under `given`; a left side
/// missing from the table is computed on demand.
pub fn minimal_cover(given: &[FunctionalDependency], closures: &Closures) -> MinimalCover {
    let mut cover = MinimalCover::default();
    if given.is_empty() {
        return cover;
    }

    let lookup = ClosureLookup {
        closures,
        fds: given,
    };

    let split = split_all(given);
    let reduced = reduce_left_sides(split, &lookup, &mut cover.lost);
    let kept = drop_redundant(reduced, &mut cover.lost);
    cover.fds = merge_left_sides(kept);
    cover.fds.sort();

    log::debug!(
        "minimal cover has {} dependencies, {} lost",
        cover.fds.len(),
        cover.lost.len()
    );
    cover
}

fn reduce_left_sides(
    split: Vec<FunctionalDependency>,
    lookup: &ClosureLookup<'_>,
    lost: &mut Vec<FunctionalDependency>,
) -> Vec<FunctionalDependency> {
    let mut reduced = Vec::with_capacity(split.len());

    for f in split {
        let Some(target) = f.single_right() else {
            continue;
        };
        if f.left().len() < 2 {
            push_unique(&mut reduced, f);
            continue;
        }

        let necessary: AttributeSet = f
            .left()
            .iter()
            .filter(|a| !lookup.determines(&f.left().without(a), target))
            .collect();

        let replaceable = necessary.len() < f.left().len()
            && !necessary.is_empty()
            && lookup.determines(&necessary, target);

        if replaceable {
            let smaller = FunctionalDependency::new(necessary, f.right().clone());
            push_unique(&mut reduced, smaller);
            push_unique(lost, f);
        } else {
            push_unique(&mut reduced, f);
        }
    }

    reduced
}

/// One pass in input order; a dependency implied by the remaining unblocked
/// ones is blocked and recorded as lost.
fn drop_redundant(
    fds: Vec<FunctionalDependency>,
    lost: &mut Vec<FunctionalDependency>,
) -> Vec<FunctionalDependency> {
    let mut blocked = vec![false; fds.len()];

    for i in 0..fds.len() {
        let others: Vec<FunctionalDependency> = fds
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i && !blocked[*j])
            .map(|(_, f)| f.clone())
            .collect();
        let implied = closure_of(fds[i].left(), &others)
            .is_some_and(|c| c.determines_all(fds[i].right()));
        if implied {
            blocked[i] = true;
        }
    }

    let mut kept = Vec::new();
    for (f, is_blocked) in fds.into_iter().zip(blocked) {
        if is_blocked {
            push_unique(lost, f);
        } else {
            kept.push(f);
        }
    }
    kept
}

fn merge_left_sides(fds: Vec<FunctionalDependency>) -> Vec<FunctionalDependency> {
    let mut groups: Vec<(AttributeSet, AttributeSet)> = Vec::new();
    for f in &fds {
        match groups.iter_mut().find(|(left, _)| left == f.left()) {
            Some((_, right)) => right.extend(f.right()),
            None => groups.push((f.left().clone(), f.right().clone())),
        }
    }
    groups
        .into_iter()
        .map(|(left, right)| FunctionalDependency::new(left, right))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::closure::compute_all_closures;
    use crate::analysis::keys::find_keys;
    use crate::attribute::attribute_set;
    use crate::dependency::join_names;

    fn fd(left: &[&str], right: &[&str]) -> FunctionalDependency {
        FunctionalDependency::new(
            attribute_set(left.iter().copied()),
            attribute_set(right.iter().copied()),
        )
    }

    fn attrs(names: &[&str]) -> Vec<Attribute> {
        names.iter().map(|n| Attribute::new(*n)).collect()
    }

    fn cover_for(names: &[&str], fds: &[FunctionalDependency]) -> MinimalCover {
        let closures = compute_all_closures(&attrs(names), fds);
        minimal_cover(fds, &closures)
    }

    fn textbook_fds() -> Vec<FunctionalDependency> {
        vec![
            fd(&["B"], &["D"]),
            fd(&["D", "G"], &["C"]),
            fd(&["B", "D"], &["E"]),
            fd(&["A", "G"], &["B"]),
            fd(&["A", "D", "G"], &["B"]),
            fd(&["A", "D", "G"], &["C"]),
        ]
    }

    #[test]
    fn test_empty_input() {
        let cover = cover_for(&["A", "B"], &[]);
        assert!(cover.is_empty());
        assert!(cover.lost().is_empty());
    }

    #[test]
    fn test_textbook_cover() {
        let names = ["A", "B", "C", "D", "E", "G"];
        let cover = cover_for(&names, &textbook_fds());
        assert_eq!(join_names(cover.fds()), "B->D,E; A,G->B; D,G->C");
        assert!(!cover.fds().iter().any(|f| f.name() == "A,D,G->B"));
        assert!(cover.lost_partially_kept());
    }

    #[test]
    fn test_cover_preserves_keys() {
        for names in [
            &["A", "B", "C", "D", "E", "G"][..],
            &["A", "B", "C", "D", "E", "F", "G"][..],
        ] {
            let schema = attrs(names);
            let given = textbook_fds();
            let from_given = find_keys(&schema, &compute_all_closures(&schema, &given));
            let cover = minimal_cover(&given, &compute_all_closures(&schema, &given));
            let from_cover = find_keys(&schema, &compute_all_closures(&schema, cover.fds()));
            let lefts = |k: &super::super::keys::Keys| -> Vec<AttributeSet> {
                k.minimum_keys().iter().map(|c| c.left().clone()).collect()
            };
            assert_eq!(lefts(&from_given), lefts(&from_cover));
        }
    }

    #[test]
    fn test_textbook_keys() {
        let without_f = attrs(&["A", "B", "C", "D", "E", "G"]);
        let keys = find_keys(&without_f, &compute_all_closures(&without_f, &textbook_fds()));
        assert_eq!(keys.minimum_keys()[0].left(), &attribute_set(["A", "G"]));

        let with_f = attrs(&["A", "B", "C", "D", "E", "F", "G"]);
        let keys = find_keys(&with_f, &compute_all_closures(&with_f, &textbook_fds()));
        assert_eq!(keys.minimum_keys().len(), 1);
        assert_eq!(keys.minimum_keys()[0].left(), &attribute_set(["A", "F", "G"]));
    }

    #[test]
    fn test_no_duplicate_left_sides() {
        let cover = cover_for(
            &["A", "B", "C"],
            &[fd(&["A"], &["B"]), fd(&["A"], &["C"]), fd(&["A", "B"], &["C"])],
        );
        assert_eq!(join_names(cover.fds()), "A->B,C");
        assert_eq!(join_names(cover.lost()), "A,B->C");
    }

    #[test]
    fn test_redundant_transitive_dependency_blocked() {
        let cover = cover_for(
            &["A", "B", "C"],
            &[fd(&["A"], &["B"]), fd(&["B"], &["C"]), fd(&["A"], &["C"])],
        );
        assert_eq!(join_names(cover.fds()), "A->B; B->C");
        assert_eq!(join_names(cover.lost()), "A->C");
    }

    #[test]
    fn test_trivial_part_blocked_after_split() {
        let cover = cover_for(
            &["A", "B"],
            &[fd(&["A"], &["B"]), fd(&["B"], &["A"]), fd(&["A"], &["A", "B"])],
        );
        assert_eq!(join_names(cover.fds()), "A->B; B->A");
        assert_eq!(join_names(cover.lost()), "A->A");
    }

    #[test]
    fn test_input_order_decides_blocked_dependency() {
        // each of A->C and B->C is implied by the other plus A->B, B->A
        let cover = cover_for(
            &["A", "B", "C"],
            &[
                fd(&["A"], &["B"]),
                fd(&["B"], &["A"]),
                fd(&["A"], &["C"]),
                fd(&["B"], &["C"]),
            ],
        );
        assert_eq!(join_names(cover.lost()), "A->C");
        assert_eq!(join_names(cover.fds()), "A->B; B->A,C");
    }
}
