//! Academic terms and section rosters.

use anyhow::Result;

use super::types::{Membership, Term};

/// Abstraction over the institutional course management service.
pub trait CourseManagement {
    /// Returns the academic sessions that are currently active.
    fn current_terms(&self) -> Result<Vec<Term>>;

    /// Returns the roster of the section with external id `section_eid`.
    fn section_memberships(&self, section_eid: &str) -> Result<Vec<Membership>>;
}
