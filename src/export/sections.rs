//! Expands a site into its provider sections and their rosters.

use anyhow::Result;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

use crate::services::{CourseManagement, Site};

/// Section eid to the external ids of its members, in section order.
pub type SectionMembers = BTreeMap<String, HashSet<String>>;

/// Splits a packed provider id into its section eids.
pub fn unpack_provider_id(packed: &str) -> Vec<String> {
    packed
        .split('+')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

/// Resolves the roster of every section the site is provided by.
///
/// Returns an empty map when the site has no provider id, in which case
/// the site is exported with whole-site scoping.
pub fn expand_provider_sections(
    site: &Site,
    course_management: &dyn CourseManagement,
) -> Result<SectionMembers> {
    let mut sections = SectionMembers::new();

    let Some(packed) = site
        .provider_group_id
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
    else {
        debug!(site_id = %site.id, "Site has no provider id");
        return Ok(sections);
    };

    for section_eid in unpack_provider_id(packed) {
        let members: HashSet<String> = course_management
            .section_memberships(&section_eid)?
            .into_iter()
            .inspect(|m| {
                debug!(section = %section_eid, user = %m.user_id, status = ?m.status, "Member")
            })
            .map(|m| m.user_id)
            .collect();
        sections.insert(section_eid, members);
    }

    Ok(sections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{Membership, Term};
    use anyhow::bail;

    struct Rosters;

    impl CourseManagement for Rosters {
        fn current_terms(&self) -> Result<Vec<Term>> {
            Ok(Vec::new())
        }

        fn section_memberships(&self, section_eid: &str) -> Result<Vec<Membership>> {
            let members = match section_eid {
                "SEC-A" => vec!["jdoe", "asmith"],
                "SEC-B" => vec!["jdoe"],
                "SEC-EMPTY" => vec![],
                other => bail!("unknown section {other}"),
            };
            Ok(members
                .into_iter()
                .map(|user_id| Membership {
                    user_id: user_id.to_string(),
                    status: Some("enrolled".to_string()),
                })
                .collect())
        }
    }

    fn site(provider: Option<&str>) -> Site {
        Site {
            id: "SITE1".to_string(),
            provider_group_id: provider.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_unpack_provider_id() {
        assert_eq!(unpack_provider_id("SEC-A+SEC-B"), vec!["SEC-A", "SEC-B"]);
        assert_eq!(unpack_provider_id(" SEC-A + +SEC-B+"), vec!["SEC-A", "SEC-B"]);
        assert!(unpack_provider_id("").is_empty());
    }

    #[test]
    fn test_site_without_provider_is_unscoped() {
        assert!(expand_provider_sections(&site(None), &Rosters).unwrap().is_empty());
        assert!(expand_provider_sections(&site(Some("  ")), &Rosters).unwrap().is_empty());
    }

    #[test]
    fn test_each_section_gets_its_roster() {
        let sections =
            expand_provider_sections(&site(Some("SEC-B+SEC-A+SEC-EMPTY")), &Rosters).unwrap();

        let ids: Vec<_> = sections.keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["SEC-A", "SEC-B", "SEC-EMPTY"]);
        assert!(sections["SEC-A"].contains("asmith"));
        assert!(!sections["SEC-B"].contains("asmith"));
        assert!(sections["SEC-EMPTY"].is_empty());
    }

    #[test]
    fn test_roster_failure_is_reported() {
        assert!(expand_provider_sections(&site(Some("SEC-A+SEC-X")), &Rosters).is_err());
    }
}
