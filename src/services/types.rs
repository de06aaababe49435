//! Read-only entities handed to the export core by its collaborators.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;

/// An academic session, identified by its external id.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Term {
    pub eid: String,
}

/// A course site as returned by the site directory.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Site {
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Packed provider id; several section eids joined with `+`.
    #[serde(default)]
    pub provider_group_id: Option<String>,
    #[serde(default)]
    pub properties: HashMap<String, String>,
}

impl Site {
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}

/// A platform user. Grades are looked up by `id`; exports use `eid`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub id: String,
    pub eid: String,
}

/// One row of a section's roster in the course management service.
#[derive(Debug, Clone, Deserialize)]
pub struct Membership {
    /// External id of the member.
    pub user_id: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Gradebook {
    pub uid: String,
}

/// A gradable item in a site's gradebook.
#[derive(Debug, Clone, Deserialize)]
pub struct Assignment {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    pub points: Decimal,
    #[serde(default)]
    pub counted: bool,
    /// Name of the tool that owns the item when it is externally maintained.
    #[serde(default)]
    pub external_app_name: Option<String>,
}

/// A single student's recorded grade for one assignment.
#[derive(Debug, Clone, Deserialize)]
pub struct GradeEntry {
    pub student_id: String,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub date_recorded: Option<NaiveDateTime>,
}

impl GradeEntry {
    /// Grade and timestamp, when both were recorded.
    pub fn exportable(&self) -> Option<(&str, NaiveDateTime)> {
        match (&self.grade, self.date_recorded) {
            (Some(grade), Some(recorded)) => Some((grade.as_str(), recorded)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(grade: Option<&str>, recorded: Option<NaiveDateTime>) -> GradeEntry {
        GradeEntry {
            student_id: "u1".to_string(),
            grade: grade.map(str::to_string),
            date_recorded: recorded,
        }
    }

    #[test]
    fn test_exportable_requires_grade_and_timestamp() {
        let ts = NaiveDate::from_ymd_opt(2024, 10, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();

        assert_eq!(entry(Some("95"), Some(ts)).exportable(), Some(("95", ts)));
        assert_eq!(entry(Some("95"), None).exportable(), None);
        assert_eq!(entry(None, Some(ts)).exportable(), None);
    }

    #[test]
    fn test_site_deserializes_with_defaults() {
        let site: Site = serde_json::from_str(r#"{"id": "SITE1"}"#).unwrap();
        assert_eq!(site.id, "SITE1");
        assert!(site.provider_group_id.is_none());
        assert!(site.property("term_eid").is_none());
    }
}
