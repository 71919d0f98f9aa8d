use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

/// A named column of a relation schema.
///
/// Attributes order by name length first and then by name, so `B` sorts
/// before `AB` and `YEAR` before `TITLE`. Length counts `char`s, so a
/// name outside the Basic Multilingual Plane is as long as its scalar count.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Attribute(String);

impl Attribute {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Ord for Attribute {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .chars()
            .count()
            .cmp(&other.0.chars().count())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for Attribute {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Attribute {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Sorted, duplicate-free set of attributes.
///
/// Sets compare element-wise in attribute order, which gives closures of the
/// same size a stable sub-ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttributeSet(BTreeSet<Attribute>);

impl AttributeSet {
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, attribute: &Attribute) -> bool {
        self.0.contains(attribute)
    }

    /// Returns true if the attribute was not yet present.
    pub fn insert(&mut self, attribute: Attribute) -> bool {
        self.0.insert(attribute)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.0.iter()
    }

    pub fn is_subset(&self, other: &AttributeSet) -> bool {
        self.0.is_subset(&other.0)
    }

    /// Strict subset: every attribute of `self` is in `other` and `other` has more.
    pub fn is_strict_subset(&self, other: &AttributeSet) -> bool {
        self.len() < other.len() && self.is_subset(other)
    }

    pub fn union(&self, other: &AttributeSet) -> AttributeSet {
        Self(self.0.union(&other.0).cloned().collect())
    }

    pub fn difference(&self, other: &AttributeSet) -> AttributeSet {
        Self(self.0.difference(&other.0).cloned().collect())
    }

    pub fn without(&self, attribute: &Attribute) -> AttributeSet {
        Self(self.0.iter().filter(|a| *a != attribute).cloned().collect())
    }

    pub fn extend(&mut self, other: &AttributeSet) {
        self.0.extend(other.0.iter().cloned());
    }

    /// Attribute names joined by `sep`, in attribute order.
    pub fn join(&self, sep: &str) -> String {
        self.0
            .iter()
            .map(Attribute::name)
            .collect::<Vec<_>>()
            .join(sep)
    }
}

impl FromIterator<Attribute> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = Attribute>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a Attribute> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = &'a Attribute>>(iter: I) -> Self {
        Self(iter.into_iter().cloned().collect())
    }
}

impl<'a> IntoIterator for &'a AttributeSet {
    type Item = &'a Attribute;
    type IntoIter = std::collections::btree_set::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for AttributeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.join(", "))
    }
}

impl Serialize for AttributeSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter())
    }
}

/// Builds a set from attribute names, mostly for tests and adapters.
pub fn attribute_set<'a>(names: impl IntoIterator<Item = &'a str>) -> AttributeSet {
    names.into_iter().map(Attribute::new).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_first_ordering() {
        let mut attrs = vec![
            Attribute::new("TITLE"),
            Attribute::new("YEAR"),
            Attribute::new("AB"),
            Attribute::new("B"),
        ];
        attrs.sort();
        let names: Vec<&str> = attrs.iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["B", "AB", "YEAR", "TITLE"]);
    }

    #[test]
    fn test_length_counts_chars_not_bytes() {
        // one char each, four and three bytes in UTF-8
        let astral = Attribute::new("𝔸");
        let bmp = Attribute::new("名");
        assert!(astral < Attribute::new("AB"));
        assert!(bmp < Attribute::new("AB"));
        assert!(Attribute::new("Z") < bmp);
    }

    #[test]
    fn test_set_deduplicates_by_name() {
        let set = attribute_set(["A", "B", "A"]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.join(","), "A,B");
    }

    #[test]
    fn test_strict_subset() {
        let ab = attribute_set(["A", "B"]);
        let abc = attribute_set(["A", "B", "C"]);
        assert!(ab.is_strict_subset(&abc));
        assert!(!abc.is_strict_subset(&abc));
        assert!(abc.is_subset(&abc));
    }

    #[test]
    fn test_display_braces() {
        assert_eq!(attribute_set(["B", "A"]).to_string(), "{A, B}");
    }

    #[test]
    fn test_unicode_length_ordering() {
        // 名前 has two characters, ABC three
        let set = attribute_set(["ABC", "名前"]);
        assert_eq!(set.join(","), "名前,ABC");
    }
}
