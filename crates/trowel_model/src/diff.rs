//! Field-level diffing between two collection versions.

use crate::survey::{Survey, SurveySet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A reported difference for one record between two collection versions.
///
/// Carries full record snapshots for both sides; a side on which the record
/// did not exist is represented by an empty [`Survey`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patch {
    /// The record identifier.
    pub id: String,
    /// The record as it stood in the old version (empty if absent).
    pub old: Survey,
    /// The record as it stands in the new version (empty if absent).
    pub new: Survey,
}

/// Computes the set of changed records between two collection versions.
///
/// For every identifier in the union of both versions' key sets, the record
/// is looked up on each side (absent means an empty record) and a [`Patch`]
/// is emitted iff the two sides are unequal under survey field equality.
/// The result is sorted by record identifier.
#[must_use]
pub fn diff(old: &SurveySet, new: &SurveySet) -> Vec<Patch> {
    let empty = Survey::new();
    let ids: BTreeSet<&str> = old.ids().chain(new.ids()).collect();

    ids.into_iter()
        .filter_map(|id| {
            let o = old.get(id).unwrap_or(&empty);
            let n = new.get(id).unwrap_or(&empty);
            (o != n).then(|| Patch {
                id: id.to_string(),
                old: o.clone(),
                new: n.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn survey(fields: &[(&str, &str)]) -> Survey {
        fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn set(records: &[(&str, Survey)]) -> SurveySet {
        records
            .iter()
            .map(|(id, s)| (id.to_string(), s.clone()))
            .collect()
    }

    #[test]
    fn diff_of_identical_sets_is_empty() {
        let v = set(&[("r1", survey(&[("q1", "a")])), ("r2", survey(&[]))]);
        assert!(diff(&v, &v).is_empty());
    }

    #[test]
    fn diff_reports_added_record() {
        let old = SurveySet::new();
        let new = set(&[("r1", survey(&[("q1", "a")]))]);

        let patches = diff(&old, &new);
        assert_eq!(patches.len(), 1);
        assert_eq!(patches[0].id, "r1");
        assert!(patches[0].old.is_empty());
        assert_eq!(patches[0].new.field("q1"), "a");
    }

    #[test]
    fn diff_reports_removed_record() {
        let old = set(&[("r1", survey(&[("q1", "a")]))]);
        let new = SurveySet::new();

        let patches = diff(&old, &new);
        assert_eq!(patches.len(), 1);
        assert_eq!(patches[0].old.field("q1"), "a");
        assert!(patches[0].new.is_empty());
    }

    #[test]
    fn diff_reports_changed_record_once() {
        let old = set(&[
            ("r1", survey(&[("q1", "a")])),
            ("r2", survey(&[("q1", "b")])),
        ]);
        let new = set(&[
            ("r1", survey(&[("q1", "a")])),
            ("r2", survey(&[("q1", "c")])),
        ]);

        let patches = diff(&old, &new);
        assert_eq!(patches.len(), 1);
        assert_eq!(patches[0].id, "r2");
    }

    #[test]
    fn absent_record_equals_all_empty_record() {
        let old = set(&[("r1", survey(&[("q1", "")]))]);
        let new = SurveySet::new();
        assert!(diff(&old, &new).is_empty());
    }

    #[test]
    fn diff_is_sorted_by_id() {
        let old = SurveySet::new();
        let new = set(&[
            ("zeta", survey(&[("q", "1")])),
            ("alpha", survey(&[("q", "2")])),
            ("mid", survey(&[("q", "3")])),
        ]);

        let ids: Vec<String> = diff(&old, &new).into_iter().map(|p| p.id).collect();
        assert_eq!(ids, ["alpha", "mid", "zeta"]);
    }

    #[test]
    fn patch_json_shape() {
        let patches = diff(&SurveySet::new(), &set(&[("r1", survey(&[("q1", "a")]))]));
        let json = serde_json::to_string(&patches).unwrap();
        assert_eq!(json, r#"[{"id":"r1","old":{},"new":{"q1":"a"}}]"#);
    }

    fn arb_survey() -> impl Strategy<Value = Survey> {
        proptest::collection::btree_map("[a-z]{1,4}", "[a-z]{0,4}", 0..4)
            .prop_map(|m| m.into_iter().collect())
    }

    fn arb_survey_set() -> impl Strategy<Value = SurveySet> {
        proptest::collection::btree_map("[a-z0-9]{1,4}", arb_survey(), 0..6)
            .prop_map(|m| m.into_iter().collect())
    }

    proptest! {
        #[test]
        fn diff_with_self_is_empty(v in arb_survey_set()) {
            prop_assert!(diff(&v, &v).is_empty());
        }

        #[test]
        fn survey_equality_is_symmetric(a in arb_survey(), b in arb_survey()) {
            prop_assert_eq!(a == b, b == a);
        }

        #[test]
        fn diff_is_complete(old in arb_survey_set(), new in arb_survey_set()) {
            let patches = diff(&old, &new);
            let patched: std::collections::BTreeSet<&str> =
                patches.iter().map(|p| p.id.as_str()).collect();
            let empty = Survey::new();

            let ids: std::collections::BTreeSet<&str> =
                old.ids().chain(new.ids()).collect();
            for id in ids {
                let o = old.get(id).unwrap_or(&empty);
                let n = new.get(id).unwrap_or(&empty);
                prop_assert_eq!(patched.contains(id), o != n);
            }
        }
    }
}
