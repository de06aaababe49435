//! Walks each site's gradebook and appends assessment and score rows.
//!
//! A site is exported either against its whole roster or, when section
//! scoping is active for it, once per provider section. [`Scope`] hides the
//! difference: every row is emitted once per scope that applies to it.

use anyhow::Result;
use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};

use super::course_grade::{
    course_grade_assessment, course_grade_id, exportable_grade, round_course_grade,
};
use super::records::{AssessmentRecord, RecordSet, ScoreRecord, integration_id};
use super::sections::SectionMembers;
use crate::services::{
    Assignment, Collaborators, Gradebook, GradebookService, Site, SiteDirectory, User,
    UserDirectory,
};

/// Permission that makes a user a student of the site.
pub const VIEW_OWN_GRADES: &str = "gradebook.viewOwnGrades";

/// Why a site produced no rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoEligibleUsers,
    NoGradebook,
    NoAssignments,
    MembershipUnavailable,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            SkipReason::NoEligibleUsers => "no eligible users",
            SkipReason::NoGradebook => "no gradebook",
            SkipReason::NoAssignments => "no assignments",
            SkipReason::MembershipUnavailable => "section membership unavailable",
        };
        f.write_str(reason)
    }
}

/// Result of processing one site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteOutcome {
    Exported { assessments: usize, scores: usize },
    Skipped(SkipReason),
}

/// The scopes a site's rows are written against.
#[derive(Debug, Clone, Copy)]
pub enum Scope<'a> {
    Site(&'a str),
    /// `anchor` is the last section in ascending order; every section's
    /// score rows reference the assessment written for it.
    Sections {
        members: &'a SectionMembers,
        anchor: &'a str,
    },
}

impl<'a> Scope<'a> {
    /// Section scoping when any section was resolved, otherwise the site.
    pub fn for_site(site_id: &'a str, sections: &'a SectionMembers) -> Self {
        match sections.keys().next_back() {
            Some(anchor) => Scope::Sections {
                members: sections,
                anchor: anchor.as_str(),
            },
            None => Scope::Site(site_id),
        }
    }

    /// Every scope id; one assessment row is written per entry.
    pub fn ids(self) -> Box<dyn Iterator<Item = &'a str> + 'a> {
        match self {
            Scope::Site(id) => Box::new(std::iter::once(id)),
            Scope::Sections { members, .. } => Box::new(members.keys().map(String::as_str)),
        }
    }

    /// Scope whose assessment ids the score rows reference.
    pub fn score_anchor(self) -> &'a str {
        match self {
            Scope::Site(id) => id,
            Scope::Sections { anchor, .. } => anchor,
        }
    }

    /// Scope ids the student belongs to; one score row is written per entry.
    pub fn ids_for<'u>(self, user_eid: &'u str) -> Box<dyn Iterator<Item = &'a str> + 'u>
    where
        'a: 'u,
    {
        match self {
            Scope::Site(id) => Box::new(std::iter::once(id)),
            Scope::Sections { members, .. } => Box::new(
                members
                    .iter()
                    .filter(move |(_, roster)| roster.contains(user_eid))
                    .map(|(id, _)| id.as_str()),
            ),
        }
    }
}

/// Builds the export rows for a sequence of sites.
///
/// The engine owns the [`RecordSet`] for the whole run. Rows appended for
/// a site stay in place even if a later step of that site fails.
pub struct TraversalEngine<'a> {
    sites: &'a dyn SiteDirectory,
    users: &'a dyn UserDirectory,
    gradebooks: &'a dyn GradebookService,
    run_started: NaiveDateTime,
    records: RecordSet,
}

impl<'a> TraversalEngine<'a> {
    /// `run_started` stamps every course-grade score.
    pub fn new(collaborators: Collaborators<'a>, run_started: NaiveDateTime) -> Self {
        Self {
            sites: collaborators.sites,
            users: collaborators.users,
            gradebooks: collaborators.gradebooks,
            run_started,
            records: RecordSet::new(),
        }
    }

    pub fn records(&self) -> &RecordSet {
        &self.records
    }

    pub fn into_records(self) -> RecordSet {
        self.records
    }

    /// Users allowed to view their own grades, ordered by internal id, or
    /// `None` if the lookup failed.
    fn eligible_users(&self, site_id: &str) -> Option<Vec<User>> {
        let lookup = self
            .sites
            .users_allowed(site_id, VIEW_OWN_GRADES)
            .and_then(|ids| self.users.users(&ids));

        match lookup {
            Ok(mut users) => {
                users.sort_unstable_by(|a, b| a.id.cmp(&b.id));
                Some(users)
            }
            Err(e) => {
                warn!(site_id, error = %e, "Error retrieving users");
                None
            }
        }
    }

    /// Appends every row for `site`.
    ///
    /// # Errors
    ///
    /// Returns the first collaborator failure or malformed course grade.
    /// Rows appended before the failure are kept.
    #[tracing::instrument(skip_all, fields(site_id = %site.id, sections = sections.len()))]
    pub fn process_site(&mut self, site: &Site, sections: &SectionMembers) -> Result<SiteOutcome> {
        let site_id = site.id.as_str();
        debug!(title = %site.title, "Processing site");

        let users = match self.eligible_users(site_id) {
            Some(users) if !users.is_empty() => users,
            _ => return Ok(SiteOutcome::Skipped(SkipReason::NoEligibleUsers)),
        };

        let Some(gradebook) = self.gradebooks.gradebook(site_id)? else {
            return Ok(SiteOutcome::Skipped(SkipReason::NoGradebook));
        };

        let assignments = self.gradebooks.assignments(&gradebook.uid)?;
        if assignments.is_empty() {
            return Ok(SiteOutcome::Skipped(SkipReason::NoAssignments));
        }
        debug!(assignments = assignments.len(), "Assignments found");

        let assessments_before = self.records.assessment_count();
        let scores_before = self.records.score_count();
        let scope = Scope::for_site(site_id, sections);

        for assignment in &assignments {
            self.export_assignment(&gradebook, assignment, &users, scope)?;
        }
        self.export_course_grades(&gradebook, scope)?;

        Ok(SiteOutcome::Exported {
            assessments: self.records.assessment_count() - assessments_before,
            scores: self.records.score_count() - scores_before,
        })
    }

    fn export_assignment(
        &mut self,
        gradebook: &Gradebook,
        assignment: &Assignment,
        users: &[User],
        scope: Scope<'_>,
    ) -> Result<()> {
        for scope_id in scope.ids() {
            let record = AssessmentRecord::for_assignment(scope_id, assignment);
            debug!(integration_id = %record.integration_id, "Assessment");
            self.records.push_assessment(record);
        }

        let assessment_id = integration_id(scope.score_anchor(), &assignment.id);
        for user in users {
            let entry =
                self.gradebooks
                    .grade_definition(&gradebook.uid, &assignment.id, &user.id)?;

            let Some((grade, recorded)) = entry.as_ref().and_then(|e| e.exportable()) else {
                continue;
            };

            for scope_id in scope.ids_for(&user.eid) {
                self.records.push_score(ScoreRecord::new(
                    assessment_id.clone(),
                    scope_id,
                    &user.eid,
                    grade,
                    recorded,
                ));
            }
        }

        Ok(())
    }

    fn export_course_grades(&mut self, gradebook: &Gradebook, scope: Scope<'_>) -> Result<()> {
        for scope_id in scope.ids() {
            self.records.push_assessment(course_grade_assessment(scope_id));
        }

        let course_grades: BTreeMap<_, _> = self
            .gradebooks
            .course_grades(&gradebook.uid)?
            .into_iter()
            .collect();
        let assessment_id = course_grade_id(scope.score_anchor());

        for (user_eid, raw) in &course_grades {
            let Some(raw) = exportable_grade(raw.as_deref()) else {
                continue;
            };
            let grade = round_course_grade(raw)?;

            for scope_id in scope.ids_for(user_eid) {
                self.records.push_score(ScoreRecord::new(
                    assessment_id.clone(),
                    scope_id,
                    user_eid,
                    &grade,
                    self.run_started,
                ));
            }
        }

        Ok(())
    }
}
