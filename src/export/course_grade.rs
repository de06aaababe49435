//! The synthetic "Course Grade" assessment and its scores.

use anyhow::{Context, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use super::records::{AssessmentRecord, integration_id};

/// Item id used in place of an assignment id for the course grade.
pub const COURSE_GRADE_ITEM: &str = "CG";
/// Raw value the gradebook reports for a grade it has not computed yet.
pub const NOT_COMPUTED: &str = "0.0";

const NAME: &str = "Course Grade";
const DESCRIPTION: &str = "Calculated Course Grade";
const NOMINAL_POINTS: &str = "100";
const SCALE: u32 = 2;

/// Integration id of the course-grade assessment within a scope.
pub fn course_grade_id(scope_id: &str) -> String {
    integration_id(scope_id, COURSE_GRADE_ITEM)
}

/// The course-grade pseudo-assessment for one scope.
pub fn course_grade_assessment(scope_id: &str) -> AssessmentRecord {
    AssessmentRecord {
        integration_id: course_grade_id(scope_id),
        scope_id: scope_id.to_string(),
        name: NAME.to_string(),
        description: DESCRIPTION.to_string(),
        due_date: String::new(),
        points: NOMINAL_POINTS.to_string(),
        is_counted: false,
        is_course_grade: true,
        is_calculated: true,
    }
}

/// Returns the raw grade if it should be exported.
///
/// Absent grades and the `"0.0"` sentinel are skipped.
pub fn exportable_grade(raw: Option<&str>) -> Option<&str> {
    raw.filter(|grade| *grade != NOT_COMPUTED)
}

/// Rounds a computed course grade half-up to two decimal places.
///
/// The result always carries exactly two fractional digits.
///
/// # Errors
///
/// Returns an error if `raw` is not a decimal number.
pub fn round_course_grade(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let value = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .with_context(|| format!("course grade '{raw}' is not a number"))?;

    let mut rounded = value.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(SCALE);
    Ok(rounded.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_course_grade("87.005").unwrap(), "87.01");
        assert_eq!(round_course_grade("87.004").unwrap(), "87.00");
        assert_eq!(round_course_grade("91.2").unwrap(), "91.20");
        assert_eq!(round_course_grade("100").unwrap(), "100.00");
        assert_eq!(round_course_grade("-2.345").unwrap(), "-2.35");
    }

    #[test]
    fn test_round_accepts_scientific_notation() {
        assert_eq!(round_course_grade("9.1e1").unwrap(), "91.00");
    }

    #[test]
    fn test_round_rejects_non_numeric() {
        let err = round_course_grade("A-").unwrap_err();
        assert!(err.to_string().contains("A-"));
    }

    #[test]
    fn test_sentinel_and_absent_grades_are_skipped() {
        assert_eq!(exportable_grade(None), None);
        assert_eq!(exportable_grade(Some("0.0")), None);
        assert_eq!(exportable_grade(Some("0")), Some("0"));
        assert_eq!(exportable_grade(Some("91.2")), Some("91.2"));
    }

    #[test]
    fn test_course_grade_assessment_fields() {
        let record = course_grade_assessment("SITE1");

        assert_eq!(record.integration_id, "SITE1-CG");
        assert_eq!(record.scope_id, "SITE1");
        assert_eq!(record.name, "Course Grade");
        assert_eq!(record.description, "Calculated Course Grade");
        assert_eq!(record.due_date, "");
        assert_eq!(record.points, "100");
        assert!(!record.is_counted);
        assert!(record.is_course_grade);
        assert!(record.is_calculated);
    }

    proptest::proptest! {
        #[test]
        fn prop_rounded_grade_has_two_decimals(cents in 0i64..1_000_000, extra in 0u32..10) {
            let raw = format!("{}.{:02}{}", cents / 100, cents % 100, extra);
            let rounded = round_course_grade(&raw).unwrap();
            let (_, fraction) = rounded.split_once('.').unwrap();
            proptest::prop_assert_eq!(fraction.len(), 2);
        }
    }
}
