//! Survey records and collection versions.

use serde::{Deserialize, Serialize};
use std::collections::{btree_map, BTreeMap, BTreeSet};

/// A single survey record: a flat mapping from field name to field value.
///
/// No schema is enforced. Fields absent from one record and present in
/// another are treated as empty strings for equality, so `PartialEq` is
/// implemented by hand over the union of both key sets rather than derived
/// from the underlying map.
///
/// # Example
///
/// ```
/// use trowel_model::Survey;
///
/// let mut a = Survey::new();
/// a.set("Type", "pottery");
/// a.set("Notes", "");
///
/// let mut b = Survey::new();
/// b.set("Type", "pottery");
///
/// // An explicit empty field equals a missing one.
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Survey(BTreeMap<String, String>);

impl Survey {
    /// Creates an empty survey.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value of `name`, or the empty string if the field is
    /// absent.
    #[must_use]
    pub fn field(&self, name: &str) -> &str {
        self.0.get(name).map(String::as_str).unwrap_or("")
    }

    /// Sets a field value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Returns the field names present in this record, in sorted order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Returns the number of fields present in this record.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl PartialEq for Survey {
    fn eq(&self, other: &Self) -> bool {
        // Union of both key sets, missing reads as "".
        let names: BTreeSet<&str> = self.field_names().chain(other.field_names()).collect();
        names.into_iter().all(|n| self.field(n) == other.field(n))
    }
}

impl Eq for Survey {}

impl FromIterator<(String, String)> for Survey {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Survey {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// The full set of survey records at one point in a trench's history,
/// keyed by record identifier.
///
/// Instances are immutable views once constructed from the storage engine or
/// a decoded request body; they are compared and diffed, never mutated in
/// place by the reconciler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurveySet(BTreeMap<String, Survey>);

impl SurveySet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the record with the given identifier, if present.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Survey> {
        self.0.get(id)
    }

    /// Inserts a record under the given identifier.
    pub fn insert(&mut self, id: impl Into<String>, survey: Survey) {
        self.0.insert(id.into(), survey);
    }

    /// Returns the record identifiers, in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Iterates over `(id, record)` pairs in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Survey)> {
        self.0.iter().map(|(id, s)| (id.as_str(), s))
    }

    /// Returns the number of records in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the set holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Survey)> for SurveySet {
    fn from_iter<I: IntoIterator<Item = (String, Survey)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn survey(fields: &[(&str, &str)]) -> Survey {
        fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn empty_surveys_are_equal() {
        assert_eq!(Survey::new(), Survey::new());
    }

    #[test]
    fn equality_is_reflexive() {
        let s = survey(&[("Type", "pottery"), ("Context", "013")]);
        assert_eq!(s, s.clone());
    }

    #[test]
    fn missing_field_reads_as_empty() {
        let a = survey(&[("Type", "pottery"), ("Notes", "")]);
        let b = survey(&[("Type", "pottery")]);
        assert_eq!(a, b);
        assert_eq!(b, a);
    }

    #[test]
    fn differing_value_is_unequal() {
        let a = survey(&[("Type", "pottery")]);
        let b = survey(&[("Type", "bone")]);
        assert_ne!(a, b);
    }

    #[test]
    fn extra_nonempty_field_is_unequal() {
        let a = survey(&[("Type", "pottery"), ("Context", "013")]);
        let b = survey(&[("Type", "pottery")]);
        assert_ne!(a, b);
        assert_ne!(b, a);
    }

    #[test]
    fn empty_record_vs_all_empty_fields() {
        let a = survey(&[("Type", ""), ("Notes", "")]);
        assert_eq!(a, Survey::new());
    }

    #[test]
    fn field_returns_empty_for_missing() {
        let s = survey(&[("Type", "pottery")]);
        assert_eq!(s.field("Type"), "pottery");
        assert_eq!(s.field("Missing"), "");
    }

    #[test]
    fn survey_set_ids_sorted() {
        let mut set = SurveySet::new();
        set.insert("b", Survey::new());
        set.insert("a", Survey::new());
        let ids: Vec<&str> = set.ids().collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn survey_json_round_trip() {
        let s = survey(&[("Type", "pottery"), ("Context", "013")]);
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, r#"{"Context":"013","Type":"pottery"}"#);
        let back: Survey = serde_json::from_str(&json).unwrap();
        assert_eq!(s, back);
    }

    #[test]
    fn survey_set_json_is_map_of_records() {
        let mut set = SurveySet::new();
        set.insert("r1", survey(&[("q1", "a")]));
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"{"r1":{"q1":"a"}}"#);
    }
}
