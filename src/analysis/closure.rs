//! Attribute closures over the power set of a schema.

use crate::attribute::{Attribute, AttributeSet};
use crate::dependency::FunctionalDependency;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

/// `{S}+ = closure(S)`. The right side always contains the left side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Closure {
    of: AttributeSet,
    closure: AttributeSet,
}

impl Closure {
    /// The attribute set the closure was computed for.
    pub fn left(&self) -> &AttributeSet {
        &self.of
    }

    /// Everything derivable from the left side.
    pub fn right(&self) -> &AttributeSet {
        &self.closure
    }

    pub fn determines(&self, attribute: &Attribute) -> bool {
        self.closure.contains(attribute)
    }

    pub fn determines_all(&self, attributes: &AttributeSet) -> bool {
        attributes.is_subset(&self.closure)
    }
}

impl Ord for Closure {
    fn cmp(&self, other: &Self) -> Ordering {
        self.of
            .len()
            .cmp(&other.of.len())
            .then_with(|| self.of.cmp(&other.of))
    }
}

impl PartialOrd for Closure {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+ -> {}", self.of, self.closure)
    }
}

/// Computes `subset+` under `fds` by fixed-point iteration.
///
/// Each dependency is applied at most once; the loop stops after a full pass
/// that adds nothing. Returns `None` for an empty subset.
pub fn closure_of(subset: &AttributeSet, fds: &[FunctionalDependency]) -> Option<Closure> {
    if subset.is_empty() {
        return None;
    }

    let mut closure = subset.clone();
    let mut applied = vec![false; fds.len()];

    loop {
        let before = closure.len();
        for (i, f) in fds.iter().enumerate() {
            if !applied[i] && f.left().is_subset(&closure) {
                closure.extend(f.right());
                applied[i] = true;
            }
        }
        if closure.len() == before {
            break;
        }
    }

    Some(Closure {
        of: subset.clone(),
        closure,
    })
}

/// Every non-empty subset's closure, sorted by left-side size.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Closures {
    entries: Vec<Closure>,
    #[serde(skip)]
    index: HashMap<AttributeSet, usize>,
}

impl Closures {
    fn from_entries(mut entries: Vec<Closure>) -> Self {
        entries.sort();
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, c)| (c.of.clone(), i))
            .collect();
        Self { entries, index }
    }

    pub fn get(&self, left: &AttributeSet) -> Option<&Closure> {
        self.index.get(left).map(|&i| &self.entries[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Closure> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[Closure] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Enumerates the power set of `attributes` with a binary counter (bit `i`
/// selects `attributes[i]`), from 1 up to all ones.
///
/// Callers keep `attributes.len()` small; the work is `O(2^n * n * m)`.
pub fn compute_all_closures(attributes: &[Attribute], fds: &[FunctionalDependency]) -> Closures {
    let n = attributes.len();
    debug_assert!(n < u64::BITS as usize);

    let mut entries = Vec::with_capacity((1usize << n).saturating_sub(1));
    for counter in 1u64..(1u64 << n) {
        let subset: AttributeSet = attributes
            .iter()
            .enumerate()
            .filter(|(bit, _)| counter & (1u64 << *bit) != 0)
            .map(|(_, a)| a)
            .collect();
        if let Some(c) = closure_of(&subset, fds) {
            entries.push(c);
        }
    }

    log::debug!("computed {} closures over {} attributes", entries.len(), n);
    Closures::from_entries(entries)
}
