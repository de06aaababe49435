//! The export core.
//!
//! A run resolves its terms ([`terms`]), lists each term's sites
//! ([`sites`]), optionally expands sites into provider sections
//! ([`sections`]) and walks every gradebook ([`traversal`]). Rows collect in
//! a [`records::RecordSet`] that is sorted once before both artifacts are
//! written ([`run`]).

pub mod course_grade;
pub mod records;
pub mod run;
pub mod sections;
pub mod sites;
pub mod terms;
pub mod traversal;

#[cfg(test)]
pub(crate) mod testing;

pub use records::{AssessmentRecord, RecordSet, ScoreRecord, SortedRecords};
pub use run::{RunReport, SiteTally, collect_records, run_export};
pub use traversal::{SiteOutcome, SkipReason, TraversalEngine};
