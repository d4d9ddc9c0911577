//! Active tag sets.
//!
//! The host build decides which tags are enabled for a documentation variant.
//! Roles only ever ask whether a tag is present, so anything that can answer
//! that question implements [`TagSet`].

use std::collections::{BTreeSet, HashSet};
use std::fmt;

/// Read-only membership test over the tags enabled for a build.
pub trait TagSet {
    fn contains(&self, tag: &str) -> bool;
}

impl TagSet for HashSet<String> {
    fn contains(&self, tag: &str) -> bool {
        HashSet::contains(self, tag)
    }
}

impl TagSet for BTreeSet<String> {
    fn contains(&self, tag: &str) -> bool {
        BTreeSet::contains(self, tag)
    }
}

impl TagSet for [&str] {
    fn contains(&self, tag: &str) -> bool {
        self.iter().any(|t| *t == tag)
    }
}

impl TagSet for [String] {
    fn contains(&self, tag: &str) -> bool {
        self.iter().any(|t| t == tag)
    }
}

impl TagSet for Vec<String> {
    fn contains(&self, tag: &str) -> bool {
        TagSet::contains(self.as_slice(), tag)
    }
}

/// Ordered tag collection, as assembled from `-t` flags and site configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags {
    tags: BTreeSet<String>,
}

impl Tags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tag. Surrounding whitespace is stripped and blank names are ignored.
    pub fn add(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() {
            return false;
        }
        self.tags.insert(tag.to_string())
    }

    pub fn remove(&mut self, tag: &str) -> bool {
        self.tags.remove(tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl TagSet for Tags {
    fn contains(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

impl<S: AsRef<str>> FromIterator<S> for Tags {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut tags = Tags::new();
        tags.extend(iter);
        tags
    }
}

impl<S: AsRef<str>> Extend<S> for Tags {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for tag in iter {
            self.add(tag.as_ref());
        }
    }
}

impl fmt::Display for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.iter().collect();
        write!(f, "{}", joined.join(", "))
    }
}
