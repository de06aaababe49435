//! Gradebook storage and grade computation.

use anyhow::Result;
use std::collections::HashMap;

use super::types::{Assignment, GradeEntry, Gradebook};

/// Abstraction over the gradebook tool.
pub trait GradebookService {
    /// The site's gradebook, or `None` when the site has none.
    fn gradebook(&self, site_id: &str) -> Result<Option<Gradebook>>;

    fn assignments(&self, gradebook_uid: &str) -> Result<Vec<Assignment>>;

    /// The grade recorded for `user_id` (internal id) on one assignment.
    fn grade_definition(
        &self,
        gradebook_uid: &str,
        assignment_id: &str,
        user_id: &str,
    ) -> Result<Option<GradeEntry>>;

    /// Computed final course grades keyed by student external id.
    fn course_grades(&self, gradebook_uid: &str) -> Result<HashMap<String, Option<String>>>;
}
