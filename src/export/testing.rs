//! In-memory platform used by the export unit tests.

use anyhow::{Result, bail};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};

use super::sites::TERM_PROPERTY;
use crate::services::{
    Assignment, CourseManagement, GradeEntry, Gradebook, GradebookService, Membership, Site,
    SiteDirectory, Term, User, UserDirectory,
};

#[derive(Default)]
pub struct FakeLms {
    pub active_terms: Vec<String>,
    pub sites: Vec<Site>,
    pub users: Vec<User>,
    /// Site id to internal ids of users allowed to view their own grades.
    pub permissions: HashMap<String, HashSet<String>>,
    pub sections: HashMap<String, Vec<String>>,
    /// Site id to gradebook uid.
    pub gradebooks: HashMap<String, String>,
    pub assignments: HashMap<String, Vec<Assignment>>,
    pub grades: HashMap<(String, String, String), GradeEntry>,
    pub course_grades: HashMap<String, HashMap<String, Option<String>>>,
    /// Sites whose gradebook lookup fails outright.
    pub broken_sites: HashSet<String>,
    /// Internal user ids whose grade lookup fails.
    pub broken_grades: HashSet<String>,
    pub fail_user_lookup: bool,
}

pub fn recorded_at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 10, 1)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
}

impl FakeLms {
    /// Term 2024FA, site SITE1 with one assignment A1 worth 100 points and
    /// one student u1 graded 95 with a course grade of 91.2.
    pub fn scenario() -> Self {
        let mut lms = FakeLms {
            active_terms: vec!["2024FA".to_string()],
            users: vec![User {
                id: "u1".to_string(),
                eid: "u1".to_string(),
            }],
            ..Default::default()
        };
        lms.add_site("SITE1", "2024FA", &["u1"]);
        lms.grade("gb-SITE1", "A1", "u1", Some("95"), Some(recorded_at()));
        lms.course_grade("gb-SITE1", "u1", Some("91.2"));
        lms
    }

    /// Adds a site with a gradebook holding assignment A1.
    pub fn add_site(&mut self, site_id: &str, term: &str, students: &[&str]) {
        self.sites.push(Site {
            id: site_id.to_string(),
            title: format!("{site_id} title"),
            provider_group_id: None,
            properties: [(TERM_PROPERTY.to_string(), term.to_string())].into(),
        });
        self.permissions.insert(
            site_id.to_string(),
            students.iter().map(|s| s.to_string()).collect(),
        );

        let uid = format!("gb-{site_id}");
        self.gradebooks.insert(site_id.to_string(), uid.clone());
        self.assignments.insert(
            uid,
            vec![Assignment {
                id: "A1".to_string(),
                name: "Assignment 1".to_string(),
                due_date: None,
                points: Decimal::from(100),
                counted: true,
                external_app_name: None,
            }],
        );
    }

    pub fn site(&self, site_id: &str) -> Site {
        self.sites
            .iter()
            .find(|s| s.id == site_id)
            .cloned()
            .unwrap_or_else(|| panic!("no site {site_id}"))
    }

    pub fn grade(
        &mut self,
        gradebook_uid: &str,
        assignment_id: &str,
        user_id: &str,
        grade: Option<&str>,
        recorded: Option<NaiveDateTime>,
    ) {
        self.grades.insert(
            (
                gradebook_uid.to_string(),
                assignment_id.to_string(),
                user_id.to_string(),
            ),
            GradeEntry {
                student_id: user_id.to_string(),
                grade: grade.map(str::to_string),
                date_recorded: recorded,
            },
        );
    }

    pub fn course_grade(&mut self, gradebook_uid: &str, user_eid: &str, grade: Option<&str>) {
        self.course_grades
            .entry(gradebook_uid.to_string())
            .or_default()
            .insert(user_eid.to_string(), grade.map(str::to_string));
    }
}

impl CourseManagement for FakeLms {
    fn current_terms(&self) -> Result<Vec<Term>> {
        Ok(self
            .active_terms
            .iter()
            .map(|eid| Term { eid: eid.clone() })
            .collect())
    }

    fn section_memberships(&self, section_eid: &str) -> Result<Vec<Membership>> {
        let Some(members) = self.sections.get(section_eid) else {
            bail!("section {section_eid} not found");
        };
        Ok(members
            .iter()
            .map(|user_id| Membership {
                user_id: user_id.clone(),
                status: None,
            })
            .collect())
    }
}

impl SiteDirectory for FakeLms {
    fn sites_with_property(&self, key: &str, value: &str) -> Result<Vec<Site>> {
        Ok(self
            .sites
            .iter()
            .filter(|s| s.property(key) == Some(value))
            .cloned()
            .collect())
    }

    fn users_allowed(&self, site_id: &str, _permission: &str) -> Result<HashSet<String>> {
        Ok(self.permissions.get(site_id).cloned().unwrap_or_default())
    }
}

impl UserDirectory for FakeLms {
    fn users(&self, ids: &HashSet<String>) -> Result<Vec<User>> {
        if self.fail_user_lookup {
            bail!("user directory unavailable");
        }
        Ok(self
            .users
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }
}

impl GradebookService for FakeLms {
    fn gradebook(&self, site_id: &str) -> Result<Option<Gradebook>> {
        if self.broken_sites.contains(site_id) {
            bail!("gradebook storage error for {site_id}");
        }
        Ok(self
            .gradebooks
            .get(site_id)
            .map(|uid| Gradebook { uid: uid.clone() }))
    }

    fn assignments(&self, gradebook_uid: &str) -> Result<Vec<Assignment>> {
        Ok(self
            .assignments
            .get(gradebook_uid)
            .cloned()
            .unwrap_or_default())
    }

    fn grade_definition(
        &self,
        gradebook_uid: &str,
        assignment_id: &str,
        user_id: &str,
    ) -> Result<Option<GradeEntry>> {
        if self.broken_grades.contains(user_id) {
            bail!("grade lookup failed for {user_id}");
        }
        let key = (
            gradebook_uid.to_string(),
            assignment_id.to_string(),
            user_id.to_string(),
        );
        Ok(self.grades.get(&key).cloned())
    }

    fn course_grades(&self, gradebook_uid: &str) -> Result<HashMap<String, Option<String>>> {
        Ok(self
            .course_grades
            .get(gradebook_uid)
            .cloned()
            .unwrap_or_default())
    }
}
