//! On-disk layout of a platform snapshot.

use serde::Deserialize;
use std::collections::HashMap;

use crate::services::{Assignment, GradeEntry, Membership, Site, Term, User};

/// A point-in-time dump of everything an export run reads.
///
/// ```json
/// {
///   "active_terms": [{ "eid": "2024FA" }],
///   "sites": [{
///     "id": "SITE1",
///     "title": "Biology 101",
///     "provider_group_id": "BIO101-01+BIO101-02",
///     "properties": { "term_eid": "2024FA" },
///     "permissions": { "gradebook.viewOwnGrades": ["u1"] }
///   }],
///   "users": [{ "id": "u1", "eid": "jdoe" }],
///   "sections": { "BIO101-01": [{ "user_id": "jdoe", "status": "enrolled" }] },
///   "gradebooks": [{
///     "uid": "gb-1",
///     "site_id": "SITE1",
///     "assignments": [{ "id": "A1", "name": "Lab 1", "points": "100", "counted": true }],
///     "grades": [{ "assignment_id": "A1", "student_id": "u1", "grade": "95",
///                  "date_recorded": "2024-10-01T10:00:00" }],
///     "course_grades": { "jdoe": "91.2" }
///   }]
/// }
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct SnapshotDocument {
    #[serde(default)]
    pub active_terms: Vec<Term>,
    #[serde(default)]
    pub sites: Vec<SiteEntry>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub sections: HashMap<String, Vec<Membership>>,
    #[serde(default)]
    pub gradebooks: Vec<GradebookEntry>,
}

#[derive(Debug, Deserialize)]
pub struct SiteEntry {
    #[serde(flatten)]
    pub site: Site,
    /// Permission name to the internal ids of users holding it.
    #[serde(default)]
    pub permissions: HashMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct GradebookEntry {
    pub uid: String,
    pub site_id: String,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
    #[serde(default)]
    pub grades: Vec<GradeRow>,
    /// Student external id to computed course grade.
    #[serde(default)]
    pub course_grades: HashMap<String, Option<String>>,
}

#[derive(Debug, Deserialize)]
pub struct GradeRow {
    pub assignment_id: String,
    #[serde(flatten)]
    pub entry: GradeEntry,
}
