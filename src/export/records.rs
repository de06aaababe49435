//! Export rows and the collection that accumulates them during a run.
//!
//! Both record types derive `Ord` with their sort key as the leading
//! fields, so sorting a collection yields the export order directly and
//! exact duplicates end up adjacent.

use std::fmt::Display;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};

use crate::services::Assignment;

/// Format of graded timestamps in the score file.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Format of due dates in the assessment file.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Builds the integration id of an item within a scope (site or section).
pub fn integration_id(scope_id: &str, item_id: impl Display) -> String {
    format!("{scope_id}-{item_id}")
}

pub fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

pub fn format_due_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

/// A row with a fixed, ordered column schema.
///
/// [`Self::COLUMNS`] lists the serialized field names in declaration order.
pub trait ExportRow: Serialize {
    const COLUMNS: &'static [&'static str];
}

fn flag<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(if *value { "1" } else { "0" })
}

/// One gradable item: an assignment or the synthetic course grade.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct AssessmentRecord {
    pub integration_id: String,
    pub scope_id: String,
    pub name: String,
    pub description: String,
    pub due_date: String,
    pub points: String,
    #[serde(serialize_with = "flag")]
    pub is_counted: bool,
    #[serde(serialize_with = "flag")]
    pub is_course_grade: bool,
    #[serde(serialize_with = "flag")]
    pub is_calculated: bool,
}

impl AssessmentRecord {
    pub fn for_assignment(scope_id: &str, assignment: &Assignment) -> Self {
        let description = assignment
            .external_app_name
            .as_deref()
            .map(|app| format!("From {app}"))
            .unwrap_or_default();

        Self {
            integration_id: integration_id(scope_id, &assignment.id),
            scope_id: scope_id.to_string(),
            name: assignment.name.clone(),
            description,
            due_date: format_due_date(assignment.due_date),
            points: assignment.points.to_string(),
            is_counted: assignment.counted,
            is_course_grade: false,
            is_calculated: false,
        }
    }
}

impl ExportRow for AssessmentRecord {
    const COLUMNS: &'static [&'static str] = &[
        "integration_id",
        "scope_id",
        "name",
        "description",
        "due_date",
        "points",
        "is_counted",
        "is_course_grade",
        "is_calculated",
    ];
}

/// One student's result against one [`AssessmentRecord`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct ScoreRecord {
    pub assessment_integration_id: String,
    pub scope_id: String,
    pub user_integration_id: String,
    pub grade: String,
    pub reserved: String,
    pub graded_timestamp: String,
}

impl ScoreRecord {
    pub fn new(
        assessment_integration_id: String,
        scope_id: &str,
        user_eid: &str,
        grade: &str,
        graded_at: NaiveDateTime,
    ) -> Self {
        Self {
            assessment_integration_id,
            scope_id: scope_id.to_string(),
            user_integration_id: user_eid.to_string(),
            grade: grade.to_string(),
            reserved: String::new(),
            graded_timestamp: format_timestamp(graded_at),
        }
    }
}

impl ExportRow for ScoreRecord {
    const COLUMNS: &'static [&'static str] = &[
        "assessment_integration_id",
        "scope_id",
        "user_integration_id",
        "grade",
        "reserved",
        "graded_timestamp",
    ];
}

/// Append-only accumulator owned by the traversal engine for one run.
#[derive(Debug, Default)]
pub struct RecordSet {
    assessments: Vec<AssessmentRecord>,
    scores: Vec<ScoreRecord>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_assessment(&mut self, record: AssessmentRecord) {
        self.assessments.push(record);
    }

    pub fn push_score(&mut self, record: ScoreRecord) {
        self.scores.push(record);
    }

    pub fn assessment_count(&self) -> usize {
        self.assessments.len()
    }

    pub fn score_count(&self) -> usize {
        self.scores.len()
    }

    /// Consumes the accumulator and returns both collections in export order.
    pub fn into_sorted(self) -> SortedRecords {
        SortedRecords {
            assessments: normalize(self.assessments),
            scores: normalize(self.scores),
        }
    }
}

/// Both collections, sorted and free of exact duplicates.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SortedRecords {
    pub assessments: Vec<AssessmentRecord>,
    pub scores: Vec<ScoreRecord>,
}

fn normalize<T: Ord>(mut records: Vec<T>) -> Vec<T> {
    records.sort_unstable();
    records.dedup();
    records
}
