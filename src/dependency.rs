use crate::attribute::{Attribute, AttributeSet};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Marker for the arrow a dependency kind is written with.
pub trait Arrow {
    const TOKEN: &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Functional;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Multivalued;

impl Arrow for Functional {
    const TOKEN: &'static str = "->";
}

impl Arrow for Multivalued {
    const TOKEN: &'static str = "->->";
}

/// A dependency `left -> right` (or `left ->-> right`).
///
/// Identity is the canonical name: sorted left names joined by `,`, the
/// arrow, then sorted right names joined by `,`.
pub struct Dependency<K> {
    left: AttributeSet,
    right: AttributeSet,
    name: String,
    kind: PhantomData<K>,
}

pub type FunctionalDependency = Dependency<Functional>;
pub type MultivaluedDependency = Dependency<Multivalued>;

impl<K: Arrow> Dependency<K> {
    pub fn new(left: AttributeSet, right: AttributeSet) -> Self {
        let name = format!("{}{}{}", left.join(","), K::TOKEN, right.join(","));
        Self {
            left,
            right,
            name,
            kind: PhantomData,
        }
    }

    pub fn left(&self) -> &AttributeSet {
        &self.left
    }

    pub fn right(&self) -> &AttributeSet {
        &self.right
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Every attribute mentioned on either side.
    pub fn attributes(&self) -> AttributeSet {
        self.left.union(&self.right)
    }

    /// Both sides non-empty and every attribute part of `schema`.
    pub fn is_proper(&self, schema: &AttributeSet) -> bool {
        !self.left.is_empty() && !self.right.is_empty() && self.attributes().is_subset(schema)
    }

    pub fn is_trivial(&self) -> bool {
        self.right.is_subset(&self.left)
    }

    /// Whether the dependency survives projection onto `attributes`.
    pub fn fits_within(&self, attributes: &AttributeSet) -> bool {
        self.left.is_subset(attributes) && self.right.is_subset(attributes)
    }

    /// One dependency per right-hand attribute, same left side.
    pub fn split(&self) -> Vec<Self> {
        self.right
            .iter()
            .map(|a| Self::new(self.left.clone(), std::iter::once(a).collect()))
            .collect()
    }

    /// The single right-hand attribute of a split dependency.
    pub fn single_right(&self) -> Option<&Attribute> {
        if self.right.len() == 1 {
            self.right.iter().next()
        } else {
            None
        }
    }
}

impl FunctionalDependency {
    /// Every FD `A -> B` also holds as the MVD `A ->-> B`.
    pub fn to_multivalued(&self) -> MultivaluedDependency {
        MultivaluedDependency::new(self.left.clone(), self.right.clone())
    }
}

impl<K> Clone for Dependency<K> {
    fn clone(&self) -> Self {
        Self {
            left: self.left.clone(),
            right: self.right.clone(),
            name: self.name.clone(),
            kind: PhantomData,
        }
    }
}

impl<K> PartialEq for Dependency<K> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<K> Eq for Dependency<K> {}

impl<K> Hash for Dependency<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl<K> Ord for Dependency<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.left
            .len()
            .cmp(&other.left.len())
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl<K> PartialOrd for Dependency<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K> fmt::Debug for Dependency<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Dependency").field(&self.name).finish()
    }
}

impl<K> fmt::Display for Dependency<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl<K> Serialize for Dependency<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Dependency", 3)?;
        s.serialize_field("name", &self.name)?;
        s.serialize_field("left", &self.left)?;
        s.serialize_field("right", &self.right)?;
        s.end()
    }
}

/// Pushes `dependency` unless one with the same name is already present.
pub fn push_unique<K>(list: &mut Vec<Dependency<K>>, dependency: Dependency<K>) -> bool {
    if list.iter().any(|d| d.name == dependency.name) {
        false
    } else {
        list.push(dependency);
        true
    }
}

/// Dependencies of `fds` whose attributes all belong to `attributes`.
pub fn project<K: Arrow>(fds: &[Dependency<K>], attributes: &AttributeSet) -> Vec<Dependency<K>> {
    fds.iter()
        .filter(|f| f.fits_within(attributes))
        .cloned()
        .collect()
}

/// Splits every dependency into single right-hand ones, de-duplicated by name.
pub fn split_all<K: Arrow>(fds: &[Dependency<K>]) -> Vec<Dependency<K>> {
    let mut result = Vec::new();
    for f in fds {
        for single in f.split() {
            push_unique(&mut result, single);
        }
    }
    result
}

/// Joins dependency names with `"; "`, or `(none)` for an empty list.
pub fn join_names<K>(fds: &[Dependency<K>]) -> String {
    if fds.is_empty() {
        return "(none)".to_string();
    }
    fds.iter()
        .map(|f| f.name.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
