//! Minimum keys, superkeys and prime attributes from a closure list.

use super::closure::{Closure, Closures};
use crate::attribute::{Attribute, AttributeSet};
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct Keys {
    minimum: Vec<Closure>,
    superkeys: Vec<Closure>,
    prime: Vec<Attribute>,
    non_prime: Vec<Attribute>,
}

impl Keys {
    pub fn minimum_keys(&self) -> &[Closure] {
        &self.minimum
    }

    pub fn superkeys(&self) -> &[Closure] {
        &self.superkeys
    }

    pub fn prime_attributes(&self) -> &[Attribute] {
        &self.prime
    }

    pub fn non_prime_attributes(&self) -> &[Attribute] {
        &self.non_prime
    }

    pub fn is_prime(&self, attribute: &Attribute) -> bool {
        self.prime.contains(attribute)
    }

    /// `attributes` is exactly the left side of a recorded key or superkey.
    pub fn is_key_or_superkey(&self, attributes: &AttributeSet) -> bool {
        self.minimum
            .iter()
            .chain(self.superkeys.iter())
            .any(|c| c.left() == attributes)
    }

    /// Left side of some minimum key contains `attribute`.
    pub fn in_some_minimum_key(&self, attribute: &Attribute) -> bool {
        self.minimum.iter().any(|c| c.left().contains(attribute))
    }

    /// First minimum key whose left side is contained in `attributes`.
    pub fn minimum_key_within(&self, attributes: &AttributeSet) -> Option<&Closure> {
        self.minimum.iter().find(|c| c.left().is_subset(attributes))
    }
}

/// Partitions full-determining closures into minimum keys and superkeys.
///
/// `closures` must be sorted by ascending left-side size. A larger
/// full-determining set counts as a superkey only when it contains a minimum
/// key recorded before it; otherwise it is recorded as a minimum key too, so
/// keys of different sizes can appear side by side.
pub fn find_keys(attributes: &[Attribute], closures: &Closures) -> Keys {
    let schema: AttributeSet = attributes.iter().collect();
    let mut keys = Keys::default();
    let mut minimum_key_size: Option<usize> = None;

    for closure in closures.iter() {
        if !closure.determines_all(&schema) {
            continue;
        }
        let size = *minimum_key_size.get_or_insert(closure.left().len());

        if closure.left().len() == size {
            keys.minimum.push(closure.clone());
        } else if keys
            .minimum
            .iter()
            .any(|k| k.left().is_strict_subset(closure.left()))
        {
            keys.superkeys.push(closure.clone());
        } else {
            keys.minimum.push(closure.clone());
        }
    }

    let (prime, non_prime): (Vec<Attribute>, Vec<Attribute>) = attributes
        .iter()
        .cloned()
        .partition(|a| keys.in_some_minimum_key(a));
    keys.prime = prime;
    keys.non_prime = non_prime;

    log::debug!(
        "found {} minimum keys and {} superkeys",
        keys.minimum.len(),
        keys.superkeys.len()
    );
    keys
}
