//! Chooses the academic terms a run exports.

use anyhow::Result;
use std::collections::BTreeSet;
use tracing::debug;

use crate::services::CourseManagement;

/// Returns `configured` verbatim when non-empty, otherwise the distinct eids
/// of the currently active terms.
///
/// An empty result is not an error; the run then exports no sites.
#[tracing::instrument(skip(course_management))]
pub fn resolve_terms(
    configured: &[String],
    course_management: &dyn CourseManagement,
) -> Result<Vec<String>> {
    if !configured.is_empty() {
        return Ok(configured.to_vec());
    }

    let sessions = course_management.current_terms()?;
    debug!(terms = sessions.len(), "Active terms fetched");

    let eids: BTreeSet<String> = sessions.into_iter().map(|term| term.eid).collect();
    for eid in &eids {
        debug!(term = %eid, "Active term");
    }

    Ok(eids.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{Membership, Term};

    struct ActiveTerms(Vec<&'static str>);

    impl CourseManagement for ActiveTerms {
        fn current_terms(&self) -> Result<Vec<Term>> {
            Ok(self
                .0
                .iter()
                .map(|eid| Term {
                    eid: eid.to_string(),
                })
                .collect())
        }

        fn section_memberships(&self, _section_eid: &str) -> Result<Vec<Membership>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_configured_terms_win() {
        let cm = ActiveTerms(vec!["2024SP"]);
        let configured = vec!["2024FA".to_string(), "2024SU".to_string()];

        assert_eq!(resolve_terms(&configured, &cm).unwrap(), configured);
    }

    #[test]
    fn test_active_terms_are_deduplicated() {
        let cm = ActiveTerms(vec!["2024FA", "2024SP", "2024FA"]);

        assert_eq!(resolve_terms(&[], &cm).unwrap(), vec!["2024FA", "2024SP"]);
    }

    #[test]
    fn test_no_active_terms_is_empty() {
        let cm = ActiveTerms(vec![]);

        assert!(resolve_terms(&[], &cm).unwrap().is_empty());
    }
}
