use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use validator::ValidationError;

lazy_static! {
    /// Login names: start with a letter, then letters, digits, `.`, `_` or `-`
    /// - Valid: "asha.k", "recruiter_01", "tpo-admin"
    /// - Invalid: "1asha", "_x", "asha k"
    pub static ref USERNAME_REGEX: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9._-]*$").unwrap();

    /// University enrollment numbers: uppercase letters, digits, `-` and `/`
    /// - Valid: "21CSE042", "2021/IT/17", "EN-1001"
    /// - Invalid: "21cse042", "EN 1001", "/21"
    pub static ref ENROLLMENT_REGEX: Regex = Regex::new(r"^[A-Z0-9][A-Z0-9/-]*$").unwrap();

    /// Branch codes: uppercase letters and digits
    pub static ref BRANCH_CODE_REGEX: Regex = Regex::new(r"^[A-Z][A-Z0-9]*$").unwrap();

    /// Phone numbers: optional leading `+`, then digits, spaces or dashes
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9][0-9 -]{5,13}[0-9]$").unwrap();
}

const MAX_CGPA: i64 = 10;
const MAX_PERCENTAGE: i64 = 100;

fn decimal_in_range(
    value: &Decimal,
    max: i64,
    code: &'static str,
    msg: &'static str,
) -> Result<(), ValidationError> {
    let negative = value.is_sign_negative() && !value.is_zero();
    if negative || *value > Decimal::from(max) || value.scale() > 2 {
        let mut err = ValidationError::new(code);
        err.message = Some(msg.into());
        return Err(err);
    }
    Ok(())
}

/// CGPA on a 0-10 scale with at most two decimal places
pub fn validate_cgpa(value: &Decimal) -> Result<(), ValidationError> {
    decimal_in_range(
        value,
        MAX_CGPA,
        "cgpa",
        "CGPA must be between 0 and 10 with at most 2 decimals",
    )
}

/// Percentage between 0 and 100 with at most two decimal places
pub fn validate_percentage(value: &Decimal) -> Result<(), ValidationError> {
    decimal_in_range(
        value,
        MAX_PERCENTAGE,
        "percentage",
        "Percentage must be between 0 and 100 with at most 2 decimals",
    )
}

/// Package amount in lakhs per annum: non-negative, two decimal places
pub fn validate_package(value: &Decimal) -> Result<(), ValidationError> {
    if (value.is_sign_negative() && !value.is_zero()) || value.scale() > 2 {
        let mut err = ValidationError::new("package");
        err.message = Some("Package must be a non-negative amount with at most 2 decimals".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_username_regex() {
        assert!(USERNAME_REGEX.is_match("asha.k"));
        assert!(USERNAME_REGEX.is_match("recruiter_01"));
        assert!(USERNAME_REGEX.is_match("tpo-admin"));
        assert!(!USERNAME_REGEX.is_match("1asha"));
        assert!(!USERNAME_REGEX.is_match("_x"));
        assert!(!USERNAME_REGEX.is_match("asha k"));
        assert!(!USERNAME_REGEX.is_match(""));
    }

    #[test]
    fn test_enrollment_regex() {
        assert!(ENROLLMENT_REGEX.is_match("21CSE042"));
        assert!(ENROLLMENT_REGEX.is_match("2021/IT/17"));
        assert!(ENROLLMENT_REGEX.is_match("EN-1001"));
        assert!(!ENROLLMENT_REGEX.is_match("21cse042"));
        assert!(!ENROLLMENT_REGEX.is_match("EN 1001"));
        assert!(!ENROLLMENT_REGEX.is_match("/21"));
    }

    #[test]
    fn test_branch_code_and_phone_regex() {
        assert!(BRANCH_CODE_REGEX.is_match("CSE"));
        assert!(BRANCH_CODE_REGEX.is_match("AI2"));
        assert!(!BRANCH_CODE_REGEX.is_match("cse"));
        assert!(!BRANCH_CODE_REGEX.is_match("2AI"));

        assert!(PHONE_REGEX.is_match("+91 98450 12345"));
        assert!(PHONE_REGEX.is_match("080-2345678"));
        assert!(!PHONE_REGEX.is_match("12"));
        assert!(!PHONE_REGEX.is_match("call me"));
    }

    #[test]
    fn test_validate_cgpa_bounds() {
        assert!(validate_cgpa(&dec("0")).is_ok());
        assert!(validate_cgpa(&dec("7.25")).is_ok());
        assert!(validate_cgpa(&dec("10.00")).is_ok());
        assert!(validate_cgpa(&dec("10.01")).is_err());
        assert!(validate_cgpa(&dec("-0.5")).is_err());
        assert!(validate_cgpa(&dec("8.125")).is_err());
    }

    #[test]
    fn test_validate_percentage_and_package() {
        assert!(validate_percentage(&dec("100")).is_ok());
        assert!(validate_percentage(&dec("100.5")).is_err());
        assert!(validate_package(&dec("12.50")).is_ok());
        assert!(validate_package(&dec("-1")).is_err());
    }
}
