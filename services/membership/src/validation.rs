//! Input validation utilities

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::sync::OnceLock;

/// Youngest age accepted at signup
pub const MIN_AGE: i32 = 18;
/// Oldest age accepted at signup
pub const MAX_AGE: i32 = 65;

/// True when any of the fields is empty or whitespace only
pub fn any_blank(fields: &[&str]) -> bool {
    fields.iter().any(|field| field.trim().is_empty())
}

/// Validate username characters: letters, digits and underscores only
pub fn is_valid_username(username: &str) -> bool {
    static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = USERNAME_REGEX
        .get_or_init(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("Failed to compile username regex"));

    regex.is_match(username)
}

/// Parse a `YYYY-MM-DD` date of birth
pub fn parse_date_of_birth(dob: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(dob.trim(), "%Y-%m-%d").ok()
}

/// Age in whole years on `today`
///
/// A birthday not yet reached this year does not count.
pub fn age_on(dob: NaiveDate, today: NaiveDate) -> i32 {
    let birthday_pending = (today.month(), today.day()) < (dob.month(), dob.day());
    today.year() - dob.year() - i32::from(birthday_pending)
}

/// True when the age is inside the accepted signup range
pub fn is_allowed_age(age: i32) -> bool {
    (MIN_AGE..=MAX_AGE).contains(&age)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_any_blank() {
        assert!(any_blank(&["alice", "   "]));
        assert!(any_blank(&["", "x"]));
        assert!(!any_blank(&["alice", " x "]));
    }

    #[test]
    fn test_username_characters() {
        assert!(is_valid_username("abc_123"));
        assert!(is_valid_username("ABC"));
        assert!(!is_valid_username("abc-123"));
        assert!(!is_valid_username("abc 123"));
        assert!(!is_valid_username(""));
    }

    #[test]
    fn test_age_counts_pending_birthday() {
        let dob = date(2000, 6, 15);
        assert_eq!(age_on(dob, date(2018, 6, 14)), 17);
        assert_eq!(age_on(dob, date(2018, 6, 15)), 18);
        assert_eq!(age_on(dob, date(2018, 12, 31)), 18);
    }

    #[test]
    fn test_age_bounds_are_inclusive() {
        assert!(!is_allowed_age(17));
        assert!(is_allowed_age(18));
        assert!(is_allowed_age(65));
        assert!(!is_allowed_age(66));
    }

    #[test]
    fn test_parse_date_of_birth() {
        assert_eq!(parse_date_of_birth("1990-02-28"), Some(date(1990, 2, 28)));
        assert_eq!(parse_date_of_birth("1990-02-30"), None);
        assert_eq!(parse_date_of_birth("28/02/1990"), None);
    }
}
