//! Tie lookup built ahead of rendering
//!
//! A pitch element starts a tie when a `tied` marker pair is attached to it.
//! Only tie starts are recorded; the element that ends a tie is whatever
//! follows on the staff, so tie ends carry no information here.

use std::collections::HashSet;

use crate::models::Score;

/// Set of element identifiers that begin a tie
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TieIndex {
    starts: HashSet<String>,
}

impl TieIndex {
    /// Scan every element of every part once
    pub fn build(score: &Score) -> Self {
        let starts: HashSet<String> = score
            .elements()
            .filter(|elem| elem.has_tie_marker())
            .filter_map(|elem| elem.id.clone())
            .collect();

        log::debug!("Tie index: {} tie-starting elements", starts.len());
        Self { starts }
    }

    /// Whether the element with this identifier starts a tie
    pub fn starts_tie(&self, id: Option<&str>) -> bool {
        id.map_or(false, |id| self.starts.contains(id))
    }

    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }
}

impl FromIterator<String> for TieIndex {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            starts: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn score(value: serde_json::Value) -> Score {
        Score::from_value(value).unwrap()
    }

    #[test]
    fn test_collects_tied_elements_across_parts() {
        let score = score(json!({
            "parts": [
                {"measures": [
                    {"notes": [{"elems": [
                        {"id": "a", "pairs": [{"type": "tied"}]},
                        {"id": "b", "pairs": [{"type": "slur"}]},
                    ]}]},
                    {"notes": [{"elems": [{"id": "c", "tied": "end"}]}]},
                ]},
                {"measures": [
                    {"notes": [{"elems": [{"id": 7, "pairs": [{"type": "tied"}]}]}]},
                ]},
            ]
        }));

        let ties = TieIndex::build(&score);
        assert_eq!(ties.len(), 2);
        assert!(ties.starts_tie(Some("a")));
        assert!(ties.starts_tie(Some("7")));
        assert!(!ties.starts_tie(Some("b")));
        assert!(!ties.starts_tie(Some("c")));
    }

    #[test]
    fn test_elements_without_id_never_tie() {
        let score = score(json!({
            "parts": [{"measures": [{"notes": [{"elems": [
                {"pairs": [{"type": "tied"}]},
            ]}]}]}]
        }));

        let ties = TieIndex::build(&score);
        assert!(ties.is_empty());
        assert!(!ties.starts_tie(None));
    }

    #[test]
    fn test_duplicate_markers_recorded_once() {
        let score = score(json!({
            "parts": [{"measures": [{"notes": [{"elems": [
                {"id": "x", "pairs": [{"type": "tied"}, {"type": "tied"}]},
            ]}]}]}]
        }));

        assert_eq!(TieIndex::build(&score).len(), 1);
    }
}
