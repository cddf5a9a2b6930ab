//! Insertion-ordered set of CSS class names.

use std::collections::HashSet;

/// Unique class names in first-seen order. Names are compared exactly
/// (case-sensitive, no trimming) and never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassSet {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl ClassSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `name` if absent. Returns whether it was new.
    pub fn insert(&mut self, name: &str) -> bool {
        if self.seen.contains(name) {
            return false;
        }
        self.seen.insert(name.to_string());
        self.order.push(name.to_string());
        true
    }

    /// Append every name from `other` not already present, keeping this
    /// set's order. Returns how many were added.
    pub fn merge(&mut self, other: &ClassSet) -> usize {
        other.iter().filter(|name| self.insert(name)).count()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.seen.contains(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Names in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Names sorted lexicographically by byte value.
    pub fn into_sorted(self) -> Vec<String> {
        let mut names = self.order;
        // UTF-8 byte order, which equals code point order. A UTF-16 code unit
        // sort would place U+10000 and above before U+E000..=U+FFFF.
        names.sort_unstable();
        names
    }
}

impl<S: AsRef<str>> FromIterator<S> for ClassSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = ClassSet::new();
        for name in iter {
            set.insert(name.as_ref());
        }
        set
    }
}
