//! Grouping of downstream references by repository.

use super::DownstreamReference;
use std::collections::HashMap;

/// All references that target one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownstreamGroup {
    /// Repository full name in "owner/name" format.
    pub repository: String,

    /// References in the order they were first seen.
    pub references: Vec<DownstreamReference>,
}

/// Downstream references grouped by repository.
///
/// Repositories keep the order in which they were first seen, and so do the
/// references inside each group. References for the same repository are
/// collected into one group even when they are interleaved with others.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownstreamGroups {
    groups: Vec<DownstreamGroup>,
    index: HashMap<String, usize>,
}

impl DownstreamGroups {
    /// Creates an empty grouping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a reference to the group for its repository.
    pub fn push(&mut self, reference: DownstreamReference) {
        match self.index.get(&reference.repository) {
            Some(&position) => self.groups[position].references.push(reference),
            None => {
                self.index
                    .insert(reference.repository.clone(), self.groups.len());
                self.groups.push(DownstreamGroup {
                    repository: reference.repository.clone(),
                    references: vec![reference],
                });
            }
        }
    }

    /// Returns the references for `repository`, if any were seen.
    #[must_use]
    pub fn get(&self, repository: &str) -> Option<&[DownstreamReference]> {
        self.index
            .get(repository)
            .map(|&position| self.groups[position].references.as_slice())
    }

    /// Iterates over the groups in first-seen order.
    pub fn iter(&self) -> std::slice::Iter<'_, DownstreamGroup> {
        self.groups.iter()
    }

    /// Iterates over every reference, group by group.
    pub fn references(&self) -> impl Iterator<Item = &DownstreamReference> {
        self.groups.iter().flat_map(|group| group.references.iter())
    }

    /// Repository names in first-seen order.
    #[must_use]
    pub fn repositories(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.repository.as_str()).collect()
    }

    /// Number of distinct repositories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether no references were collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl FromIterator<DownstreamReference> for DownstreamGroups {
    fn from_iter<I: IntoIterator<Item = DownstreamReference>>(iter: I) -> Self {
        let mut groups = Self::new();
        for reference in iter {
            groups.push(reference);
        }
        groups
    }
}

impl<'a> IntoIterator for &'a DownstreamGroups {
    type Item = &'a DownstreamGroup;
    type IntoIter = std::slice::Iter<'a, DownstreamGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(repository: &str, number: u64) -> DownstreamReference {
        DownstreamReference::new(repository, number)
    }

    #[test]
    fn groups_interleaved_references() {
        let groups: DownstreamGroups = [
            reference("o/r1", 1),
            reference("o/r2", 2),
            reference("o/r1", 3),
        ]
        .into_iter()
        .collect();

        assert_eq!(groups.repositories(), vec!["o/r1", "o/r2"]);
        assert_eq!(
            groups.get("o/r1"),
            Some([reference("o/r1", 1), reference("o/r1", 3)].as_slice())
        );
        assert_eq!(groups.get("o/r2"), Some([reference("o/r2", 2)].as_slice()));
        assert_eq!(groups.get("o/r3"), None);
    }

    #[test]
    fn keeps_duplicates() {
        let groups: DownstreamGroups = [reference("o/r", 1), reference("o/r", 1)]
            .into_iter()
            .collect();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups.references().count(), 2);
    }

    #[test]
    fn traverses_by_repository_then_reference() {
        let groups: DownstreamGroups = [
            reference("a/x", 5),
            reference("b/y", 1),
            reference("a/x", 2),
            reference("c/z", 9),
            reference("b/y", 4),
        ]
        .into_iter()
        .collect();

        let order: Vec<String> = groups.references().map(ToString::to_string).collect();
        assert_eq!(order, vec!["a/x#5", "a/x#2", "b/y#1", "b/y#4", "c/z#9"]);
    }

    #[test]
    fn empty_grouping() {
        let groups = DownstreamGroups::new();
        assert!(groups.is_empty());
        assert_eq!(groups.references().count(), 0);
    }
}
