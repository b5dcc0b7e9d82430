//! Student-to-job eligibility.
//!
//! A student is eligible for a posting iff
//! `cgpa >= minimum_cgpa`, `backlogs <= maximum_backlogs` and, when the
//! posting restricts branches, the student's branch is one of them. The
//! checks run in that order and the first failure is the reported reason.
//!
//! Year of study is evaluated too but only reported (`year_matches`); it
//! never makes a student ineligible.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

pub const ELIGIBLE: &str = "Eligible";
pub const BRANCH_NOT_ELIGIBLE: &str = "Branch not eligible";
pub const PROFILE_MISSING: &str = "Please complete your profile first.";

/// The academic record being checked
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub cgpa: Decimal,
    pub backlogs: i32,
    pub branch_code: &'a str,
    pub year: i16,
}

/// Thresholds set by a job posting
#[derive(Debug, Clone, Copy)]
pub struct Requirements<'a> {
    pub minimum_cgpa: Decimal,
    pub maximum_backlogs: i32,
    /// Empty means every branch may apply
    pub allowed_branches: &'a [String],
    /// Empty means every year may apply
    pub allowed_years: &'a [i16],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Eligibility {
    pub is_eligible: bool,
    pub eligibility_message: String,
    pub year_matches: bool,
}

impl Eligibility {
    /// Result shown to a student who has no profile yet
    pub fn profile_missing() -> Self {
        Self {
            is_eligible: false,
            eligibility_message: PROFILE_MISSING.to_string(),
            year_matches: false,
        }
    }
}

pub fn evaluate(candidate: &Candidate<'_>, requirements: &Requirements<'_>) -> Eligibility {
    let year_matches = requirements.allowed_years.is_empty()
        || requirements.allowed_years.contains(&candidate.year);

    let failure = if candidate.cgpa < requirements.minimum_cgpa {
        Some(format!(
            "CGPA requirement not met (Required: {})",
            requirements.minimum_cgpa
        ))
    } else if candidate.backlogs > requirements.maximum_backlogs {
        Some(format!(
            "Too many backlogs (Maximum allowed: {})",
            requirements.maximum_backlogs
        ))
    } else if !requirements.allowed_branches.is_empty()
        && !requirements
            .allowed_branches
            .iter()
            .any(|code| code.eq_ignore_ascii_case(candidate.branch_code))
    {
        Some(BRANCH_NOT_ELIGIBLE.to_string())
    } else {
        None
    };

    match failure {
        Some(reason) => Eligibility {
            is_eligible: false,
            eligibility_message: reason,
            year_matches,
        },
        None => Eligibility {
            is_eligible: true,
            eligibility_message: ELIGIBLE.to_string(),
            year_matches,
        },
    }
}

/// Applications are accepted while the posting is active and `now <= deadline`
pub fn is_open(is_active: bool, deadline: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    is_active && now <= deadline
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use fake::{Fake, Faker};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn candidate(cgpa: &str, backlogs: i32, branch: &'static str) -> Candidate<'static> {
        Candidate {
            cgpa: dec(cgpa),
            backlogs,
            branch_code: branch,
            year: 4,
        }
    }

    fn requirements<'a>(
        minimum_cgpa: &str,
        maximum_backlogs: i32,
        allowed_branches: &'a [String],
    ) -> Requirements<'a> {
        Requirements {
            minimum_cgpa: dec(minimum_cgpa),
            maximum_backlogs,
            allowed_branches,
            allowed_years: &[4],
        }
    }

    #[test]
    fn test_meets_all_thresholds() {
        let result = evaluate(&candidate("7.50", 0, "CSE"), &requirements("7.50", 0, &[]));
        assert!(result.is_eligible);
        assert_eq!(result.eligibility_message, ELIGIBLE);
        assert!(result.year_matches);
    }

    #[test]
    fn test_low_cgpa_reports_required_value() {
        let result = evaluate(&candidate("6.99", 0, "CSE"), &requirements("7.00", 0, &[]));
        assert!(!result.is_eligible);
        assert_eq!(
            result.eligibility_message,
            "CGPA requirement not met (Required: 7.00)"
        );
    }

    #[test]
    fn test_backlogs_checked_after_cgpa() {
        let result = evaluate(&candidate("9.00", 3, "CSE"), &requirements("6.00", 2, &[]));
        assert_eq!(
            result.eligibility_message,
            "Too many backlogs (Maximum allowed: 2)"
        );

        // both fail: cgpa is reported first
        let result = evaluate(&candidate("5.00", 3, "CSE"), &requirements("6.00", 2, &[]));
        assert!(result.eligibility_message.starts_with("CGPA"));
    }

    #[test]
    fn test_branch_restriction() {
        let allowed = vec!["CSE".to_string(), "IT".to_string()];
        let ok = evaluate(&candidate("8.00", 0, "IT"), &requirements("6.00", 0, &allowed));
        assert!(ok.is_eligible);

        let blocked = evaluate(&candidate("8.00", 0, "MECH"), &requirements("6.00", 0, &allowed));
        assert!(!blocked.is_eligible);
        assert_eq!(blocked.eligibility_message, BRANCH_NOT_ELIGIBLE);
    }

    #[test]
    fn test_year_mismatch_does_not_gate_eligibility() {
        let mut third_year = candidate("8.00", 0, "CSE");
        third_year.year = 3;
        let result = evaluate(&third_year, &requirements("6.00", 0, &[]));
        assert!(result.is_eligible);
        assert!(!result.year_matches);
    }

    #[test]
    fn test_eligibility_matches_rule_for_random_records() {
        let branches = ["CSE", "IT", "ECE", "MECH"];
        let allowed = vec!["CSE".to_string(), "ECE".to_string()];

        for _ in 0..500 {
            let cgpa = Decimal::new((0..=1000i64).fake::<i64>(), 2);
            let minimum = Decimal::new((0..=1000i64).fake::<i64>(), 2);
            let backlogs: i32 = (0..6).fake();
            let max_backlogs: i32 = (0..6).fake();
            let branch = branches[(0..branches.len()).fake::<usize>()];
            let restricted: bool = Faker.fake();
            let allowed_branches: &[String] = if restricted { &allowed } else { &[] };

            let result = evaluate(
                &Candidate {
                    cgpa,
                    backlogs,
                    branch_code: branch,
                    year: (1..=4i16).fake(),
                },
                &Requirements {
                    minimum_cgpa: minimum,
                    maximum_backlogs: max_backlogs,
                    allowed_branches,
                    allowed_years: &[4],
                },
            );

            let expected = cgpa >= minimum
                && backlogs <= max_backlogs
                && (!restricted || allowed.iter().any(|b| b == branch));
            assert_eq!(result.is_eligible, expected);
        }
    }

    #[test]
    fn test_open_window_includes_deadline_instant() {
        let now = Utc::now();
        assert!(is_open(true, now, now));
        assert!(is_open(true, now + Duration::hours(1), now));
        assert!(!is_open(true, now - Duration::seconds(1), now));
        assert!(!is_open(false, now + Duration::hours(1), now));
    }
}
