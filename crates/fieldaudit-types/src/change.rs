//! Change sets: the result of a comparison.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Textual snapshot of one field before and after a change.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiffEntry {
    pub old: Option<String>,
    pub new: Option<String>,
}

impl DiffEntry {
    pub fn new(old: Option<String>, new: Option<String>) -> Self {
        Self { old, new }
    }

    /// Entry where both sides are present.
    pub fn texts(old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            old: Some(old.into()),
            new: Some(new.into()),
        }
    }
}

/// Ordered mapping from field name to [`DiffEntry`].
///
/// Entries keep insertion order, which follows field declaration order for
/// object comparisons. Serializes as a JSON object in that order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeSet {
    entries: Vec<(String, DiffEntry)>,
}

impl ChangeSet {
    /// Create an empty change set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a change. Re-recording a field replaces its entry in place.
    pub fn insert(&mut self, field: impl Into<String>, entry: DiffEntry) {
        let field = field.into();
        match self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some((_, existing)) => *existing = entry,
            None => self.entries.push((field, entry)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&DiffEntry> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, entry)| entry)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Returns `true` if there are no changes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of changed fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Changed field names in order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DiffEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }
}

impl FromIterator<(String, DiffEntry)> for ChangeSet {
    fn from_iter<I: IntoIterator<Item = (String, DiffEntry)>>(iter: I) -> Self {
        let mut changes = Self::new();
        for (field, entry) in iter {
            changes.insert(field, entry);
        }
        changes
    }
}

impl IntoIterator for ChangeSet {
    type Item = (String, DiffEntry);
    type IntoIter = std::vec::IntoIter<(String, DiffEntry)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for ChangeSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, entry) in &self.entries {
            map.serialize_entry(field, entry)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ChangeSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ChangeSetVisitor;

        impl<'de> Visitor<'de> for ChangeSetVisitor {
            type Value = ChangeSet;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field names to diff entries")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<ChangeSet, A::Error> {
                let mut changes = ChangeSet::new();
                while let Some((field, entry)) = access.next_entry::<String, DiffEntry>()? {
                    changes.insert(field, entry);
                }
                Ok(changes)
            }
        }

        deserializer.deserialize_map(ChangeSetVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keeps_insertion_order() {
        let mut changes = ChangeSet::new();
        changes.insert("zeta", DiffEntry::texts("1", "2"));
        changes.insert("alpha", DiffEntry::texts("a", "b"));
        let fields: Vec<_> = changes.fields().collect();
        assert_eq!(fields, ["zeta", "alpha"]);
    }

    #[test]
    fn reinsert_replaces_in_place() {
        let mut changes = ChangeSet::new();
        changes.insert("a", DiffEntry::texts("1", "2"));
        changes.insert("b", DiffEntry::texts("1", "2"));
        changes.insert("a", DiffEntry::texts("3", "4"));
        assert_eq!(changes.len(), 2);
        assert_eq!(changes.get("a"), Some(&DiffEntry::texts("3", "4")));
        assert_eq!(changes.fields().next(), Some("a"));
    }

    #[test]
    fn serializes_as_ordered_object() {
        let mut changes = ChangeSet::new();
        changes.insert("zeta", DiffEntry::new(None, Some("x".into())));
        changes.insert("alpha", DiffEntry::texts("1", "2"));
        let text = serde_json::to_string(&changes).unwrap();
        assert_eq!(
            text,
            r#"{"zeta":{"old":null,"new":"x"},"alpha":{"old":"1","new":"2"}}"#
        );
    }

    #[test]
    fn deserializes_from_object() {
        let changes: ChangeSet =
            serde_json::from_value(json!({"b": {"old": "2", "new": "3"}})).unwrap();
        assert_eq!(changes.get("b"), Some(&DiffEntry::texts("2", "3")));
        assert!(!changes.contains("a"));
    }

    #[test]
    fn empty_change_set() {
        let changes = ChangeSet::new();
        assert!(changes.is_empty());
        assert_eq!(serde_json::to_value(&changes).unwrap(), json!({}));
    }
}
