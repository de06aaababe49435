//! Platform collaborators backed by a JSON snapshot.
//!
//! The snapshot is read once, from a file or URL, and indexed in memory.
//! [`Snapshot`] implements every collaborator trait so it can back a whole
//! run via [`Collaborators::from_backend`](crate::services::Collaborators::from_backend).

mod document;

pub use document::{GradeRow, GradebookEntry, SiteEntry, SnapshotDocument};

use anyhow::{Context, Result, anyhow};
use std::collections::{HashMap, HashSet};
use tracing::info;

use crate::fetch::load_source;
use crate::services::{
    Assignment, CourseManagement, GradeEntry, Gradebook, GradebookService, Membership, Site,
    SiteDirectory, Term, User, UserDirectory,
};

type GradeKey = (String, String, String);

#[derive(Debug, Default)]
pub struct Snapshot {
    active_terms: Vec<Term>,
    sites: Vec<Site>,
    permissions: HashMap<String, HashMap<String, HashSet<String>>>,
    users: HashMap<String, User>,
    sections: HashMap<String, Vec<Membership>>,
    gradebooks: HashMap<String, String>,
    assignments: HashMap<String, Vec<Assignment>>,
    grades: HashMap<GradeKey, GradeEntry>,
    course_grades: HashMap<String, HashMap<String, Option<String>>>,
}

impl Snapshot {
    /// Loads and indexes the snapshot at `source` (path or URL).
    pub fn load(source: &str) -> Result<Self> {
        let bytes = load_source(source)?;
        let snapshot = Self::from_slice(&bytes)
            .with_context(|| format!("invalid snapshot '{source}'"))?;
        info!(
            source,
            sites = snapshot.sites.len(),
            users = snapshot.users.len(),
            gradebooks = snapshot.gradebooks.len(),
            "Snapshot loaded"
        );
        Ok(snapshot)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let document: SnapshotDocument = serde_json::from_slice(bytes)?;
        Ok(Self::from(document))
    }
}

impl From<SnapshotDocument> for Snapshot {
    fn from(document: SnapshotDocument) -> Self {
        let mut snapshot = Snapshot {
            active_terms: document.active_terms,
            sections: document.sections,
            ..Default::default()
        };

        for entry in document.sites {
            let permissions = entry
                .permissions
                .into_iter()
                .map(|(name, ids)| (name, ids.into_iter().collect()))
                .collect();
            snapshot.permissions.insert(entry.site.id.clone(), permissions);
            snapshot.sites.push(entry.site);
        }
        snapshot.sites.sort_by(|a, b| a.id.cmp(&b.id));

        snapshot.users = document
            .users
            .into_iter()
            .map(|user| (user.id.clone(), user))
            .collect();

        for gradebook in document.gradebooks {
            for row in gradebook.grades {
                let key = (
                    gradebook.uid.clone(),
                    row.assignment_id,
                    row.entry.student_id.clone(),
                );
                snapshot.grades.insert(key, row.entry);
            }
            snapshot
                .gradebooks
                .insert(gradebook.site_id, gradebook.uid.clone());
            snapshot
                .assignments
                .insert(gradebook.uid.clone(), gradebook.assignments);
            snapshot
                .course_grades
                .insert(gradebook.uid, gradebook.course_grades);
        }

        snapshot
    }
}

impl CourseManagement for Snapshot {
    fn current_terms(&self) -> Result<Vec<Term>> {
        Ok(self.active_terms.clone())
    }

    fn section_memberships(&self, section_eid: &str) -> Result<Vec<Membership>> {
        self.sections
            .get(section_eid)
            .cloned()
            .ok_or_else(|| anyhow!("no section with eid '{section_eid}'"))
    }
}

impl SiteDirectory for Snapshot {
    fn sites_with_property(&self, key: &str, value: &str) -> Result<Vec<Site>> {
        Ok(self
            .sites
            .iter()
            .filter(|site| site.property(key) == Some(value))
            .cloned()
            .collect())
    }

    fn users_allowed(&self, site_id: &str, permission: &str) -> Result<HashSet<String>> {
        let site = self
            .permissions
            .get(site_id)
            .ok_or_else(|| anyhow!("no site with id '{site_id}'"))?;
        Ok(site.get(permission).cloned().unwrap_or_default())
    }
}

impl UserDirectory for Snapshot {
    fn users(&self, ids: &HashSet<String>) -> Result<Vec<User>> {
        let mut users: Vec<User> = ids
            .iter()
            .filter_map(|id| self.users.get(id))
            .cloned()
            .collect();
        users.sort_unstable_by(|a, b| a.id.cmp(&b.id));
        Ok(users)
    }
}

impl GradebookService for Snapshot {
    fn gradebook(&self, site_id: &str) -> Result<Option<Gradebook>> {
        Ok(self
            .gradebooks
            .get(site_id)
            .map(|uid| Gradebook { uid: uid.clone() }))
    }

    fn assignments(&self, gradebook_uid: &str) -> Result<Vec<Assignment>> {
        self.assignments
            .get(gradebook_uid)
            .cloned()
            .ok_or_else(|| anyhow!("no gradebook with uid '{gradebook_uid}'"))
    }

    fn grade_definition(
        &self,
        gradebook_uid: &str,
        assignment_id: &str,
        user_id: &str,
    ) -> Result<Option<GradeEntry>> {
        let key = (
            gradebook_uid.to_string(),
            assignment_id.to_string(),
            user_id.to_string(),
        );
        Ok(self.grades.get(&key).cloned())
    }

    fn course_grades(&self, gradebook_uid: &str) -> Result<HashMap<String, Option<String>>> {
        self.course_grades
            .get(gradebook_uid)
            .cloned()
            .ok_or_else(|| anyhow!("no gradebook with uid '{gradebook_uid}'"))
    }
}
