//! Interfaces to the learning-management platform.
//!
//! The export core depends only on these traits. [`Collaborators`] bundles
//! one implementation of each so a run can be wired from any backend, such
//! as the JSON snapshot in [`crate::infra::snapshot`] or in-memory fakes.

mod course_management;
mod gradebook;
mod site_directory;
pub mod types;

pub use course_management::CourseManagement;
pub use gradebook::GradebookService;
pub use site_directory::{SiteDirectory, UserDirectory};
pub use types::{Assignment, GradeEntry, Gradebook, Membership, Site, Term, User};

/// Borrowed handles to every collaborator a run needs.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub course_management: &'a dyn CourseManagement,
    pub sites: &'a dyn SiteDirectory,
    pub users: &'a dyn UserDirectory,
    pub gradebooks: &'a dyn GradebookService,
}

impl<'a> Collaborators<'a> {
    /// Uses a single backend for every collaborator.
    pub fn from_backend<B>(backend: &'a B) -> Self
    where
        B: CourseManagement + SiteDirectory + UserDirectory + GradebookService,
    {
        Self {
            course_management: backend,
            sites: backend,
            users: backend,
            gradebooks: backend,
        }
    }
}
