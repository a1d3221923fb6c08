//! Read-only audit of progress record invariants.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::core::record::{parse_date, parse_timestamp, ProgressRecord};

/// A single invariant violation found in a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationIssue {
    /// `xp` is below zero.
    NegativeXp { xp: i64 },
    /// `streak_days` is below zero.
    NegativeStreak { streak_days: i64 },
    /// A module appears more than once; reported once per extra occurrence.
    DuplicateModule { module: String },
    /// `last_active_date` is not a calendar date.
    InvalidDate { value: String },
    /// `updated_at` is not a timestamp.
    InvalidTimestamp { value: String },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeXp { xp } => write!(f, "Invalid XP: {} (must be >= 0)", xp),
            Self::NegativeStreak { streak_days } => {
                write!(f, "Invalid streak: {} (must be >= 0)", streak_days)
            }
            Self::DuplicateModule { module } => write!(f, "Duplicate module: {}", module),
            Self::InvalidDate { value } => write!(f, "Invalid date format: {}", value),
            Self::InvalidTimestamp { value } => write!(f, "Invalid datetime format: {}", value),
        }
    }
}

/// Result of validating a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Every issue found, in check order.
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// True when no issues were found.
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// Human-readable issue messages.
    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }

    /// Split into `(is_valid, messages)`.
    pub fn into_parts(self) -> (bool, Vec<String>) {
        (self.is_valid(), self.messages())
    }
}

/// Check every record invariant and collect all violations.
///
/// A record with issues is still usable; callers decide whether to warn.
pub fn validate(record: &ProgressRecord) -> ValidationReport {
    let mut issues = Vec::new();

    if record.xp < 0 {
        issues.push(ValidationIssue::NegativeXp { xp: record.xp });
    }

    if record.streak_days < 0 {
        issues.push(ValidationIssue::NegativeStreak {
            streak_days: record.streak_days,
        });
    }

    let mut seen = HashSet::new();
    for module in &record.completed_modules {
        if !seen.insert(module.as_str()) {
            issues.push(ValidationIssue::DuplicateModule {
                module: module.clone(),
            });
        }
    }

    if parse_date(&record.last_active_date).is_none() {
        issues.push(ValidationIssue::InvalidDate {
            value: record.last_active_date.clone(),
        });
    }

    if parse_timestamp(&record.updated_at).is_none() {
        issues.push(ValidationIssue::InvalidTimestamp {
            value: record.updated_at.clone(),
        });
    }

    ValidationReport { issues }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_record() -> ProgressRecord {
        ProgressRecord {
            xp: 200,
            completed_modules: vec!["A".to_string(), "B".to_string()],
            last_active_date: "2024-01-01".to_string(),
            streak_days: 2,
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_valid_record_has_no_issues() {
        let report = validate(&valid_record());
        assert!(report.is_valid());
        assert_eq!(report.into_parts(), (true, vec![]));
    }

    #[test]
    fn test_fresh_record_is_valid() {
        assert!(validate(&ProgressRecord::new()).is_valid());
    }

    #[test]
    fn test_collects_every_issue() {
        let record = ProgressRecord {
            xp: -5,
            completed_modules: vec!["A".to_string(), "A".to_string()],
            last_active_date: "not-a-date".to_string(),
            streak_days: 2,
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        };

        let report = validate(&record);
        assert!(!report.is_valid());
        assert_eq!(
            report.issues,
            vec![
                ValidationIssue::NegativeXp { xp: -5 },
                ValidationIssue::DuplicateModule {
                    module: "A".to_string()
                },
                ValidationIssue::InvalidDate {
                    value: "not-a-date".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_each_extra_duplicate_reported() {
        let mut record = valid_record();
        record.completed_modules = ["A", "B", "A", "A", "B"]
            .iter()
            .map(|m| m.to_string())
            .collect();

        let (is_valid, messages) = validate(&record).into_parts();
        assert!(!is_valid);
        assert_eq!(
            messages,
            vec![
                "Duplicate module: A",
                "Duplicate module: A",
                "Duplicate module: B"
            ]
        );
    }

    #[test]
    fn test_negative_streak_and_bad_timestamp() {
        let mut record = valid_record();
        record.streak_days = -1;
        record.updated_at = "sometime".to_string();

        let messages = validate(&record).messages();
        assert_eq!(
            messages,
            vec![
                "Invalid streak: -1 (must be >= 0)",
                "Invalid datetime format: sometime"
            ]
        );
    }

    #[test]
    fn test_accepts_iso_timestamp_forms() {
        for updated_at in [
            "2024-01-01T00:00+00:00",
            "2024-01-01",
            "2024-01-01T10",
            "2024-01-01T10:00:00.123456Z",
        ] {
            let mut record = valid_record();
            record.updated_at = updated_at.to_string();
            assert!(validate(&record).is_valid(), "{}", updated_at);
        }
    }

    #[test]
    fn test_rejects_unpadded_date() {
        let mut record = valid_record();
        record.last_active_date = "2024-1-5".to_string();
        assert_eq!(
            validate(&record).messages(),
            vec!["Invalid date format: 2024-1-5"]
        );
    }

    #[test]
    fn test_validate_does_not_mutate() {
        let mut record = valid_record();
        record.xp = -1;
        let before = record.clone();
        let _ = validate(&record);
        assert_eq!(record, before);
    }

    #[test]
    fn test_issue_serializes_with_kind_tag() {
        let issue = ValidationIssue::NegativeXp { xp: -3 };
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["kind"], "negative_xp");
        assert_eq!(json["xp"], -3);
    }
}
