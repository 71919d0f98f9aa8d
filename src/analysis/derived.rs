use super::closure::Closures;
use crate::dependency::{FunctionalDependency, push_unique, split_all};

/// Split given dependencies, plus every non-trivial single-attribute
/// dependency `S -> a` implied by a closure and not already among them.
pub fn derive_dependencies(
    given: &[FunctionalDependency],
    closures: &Closures,
) -> (Vec<FunctionalDependency>, Vec<FunctionalDependency>) {
    let mut working = split_all(given);
    let mut derived = Vec::new();

    for closure in closures.iter() {
        for attribute in closure.right().difference(closure.left()).iter() {
            let candidate = FunctionalDependency::new(
                closure.left().clone(),
                std::iter::once(attribute).collect(),
            );
            if working.contains(&candidate) {
                continue;
            }
            push_unique(&mut derived, candidate);
        }
    }

    working.sort();
    derived.sort();
    log::debug!("derived {} additional dependencies", derived.len());
    (working, derived)
}
