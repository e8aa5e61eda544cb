//! Ordered label axis with O(1) label → position lookup.

use serde::{Serialize, Serializer};
use std::collections::HashMap;

use super::{DomainError, DomainResult, ValidationError};

/// An ordered, duplicate-free list of labels.
///
/// Every table and matrix in the crate addresses its axes through a
/// `LabelIndex`, so two structures are only ever aligned by label and
/// never by position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelIndex {
    labels: Vec<String>,
    positions: HashMap<String, usize>,
}

impl LabelIndex {
    /// Builds an index, rejecting empty and duplicate labels.
    pub fn new(axis: &str, labels: Vec<String>) -> DomainResult<Self> {
        let mut positions = HashMap::with_capacity(labels.len());
        for (i, label) in labels.iter().enumerate() {
            if label.is_empty() {
                return Err(ValidationError::empty_field(format!("{} label", axis)).into());
            }
            if positions.insert(label.clone(), i).is_some() {
                return Err(DomainError::validation(
                    axis,
                    format!("Duplicate {} label '{}'", axis, label),
                ));
            }
        }
        Ok(Self { labels, positions })
    }

    /// Returns the position of `label`.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.positions.get(label).copied()
    }

    /// Returns the position of `label`, or a `MissingLabel` error.
    pub fn require(&self, axis: &str, label: &str) -> DomainResult<usize> {
        self.position(label)
            .ok_or_else(|| DomainError::missing_label(axis, label))
    }

    /// Returns the label at `position`.
    pub fn label(&self, position: usize) -> &str {
        &self.labels[position]
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.positions.contains_key(label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.labels.iter()
    }
}

impl Serialize for LabelIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.labels.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn positions_follow_insertion_order() {
        let index = LabelIndex::new("row", labels(&["a", "b", "c"])).unwrap();
        assert_eq!(index.position("a"), Some(0));
        assert_eq!(index.position("c"), Some(2));
        assert_eq!(index.label(1), "b");
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn duplicate_labels_are_rejected() {
        let err = LabelIndex::new("row", labels(&["a", "a"])).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn empty_label_is_rejected() {
        assert!(LabelIndex::new("row", labels(&["a", ""])).is_err());
    }

    #[test]
    fn require_reports_missing_label() {
        let index = LabelIndex::new("criterion", labels(&["g1"])).unwrap();
        let err = index.require("criterion", "g9").unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingLabel);
        assert_eq!(err.details.get("label"), Some(&"g9".to_string()));
    }

    #[test]
    fn serializes_as_plain_list() {
        let index = LabelIndex::new("row", labels(&["x", "y"])).unwrap();
        assert_eq!(serde_json::to_string(&index).unwrap(), r#"["x","y"]"#);
    }
}
