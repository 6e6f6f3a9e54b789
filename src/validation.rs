//! Input validation
//!
//! Checks applied before anything is written to the store.

use chrono::NaiveDate;

use crate::error::{AppError, AppResult};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Largest calorie figure accepted for an entry or a goal
pub const MAX_CALORIES: i64 = 1_000_000;

/// Parse a strict `YYYY-MM-DD` date
pub fn parse_date(value: &str) -> AppResult<NaiveDate> {
    let trimmed = value.trim();
    // chrono accepts unpadded fields, so pin the length too
    if trimmed.len() != 10 {
        return Err(invalid_date(value));
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| invalid_date(value))
}

fn invalid_date(value: &str) -> AppError {
    AppError::Validation(format!("'{}' is not a valid date (expected YYYY-MM-DD)", value))
}

/// Trim a required text field, rejecting empty values
pub fn required_text(field: &str, value: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}

/// Calorie figures must lie in `0..=MAX_CALORIES`
pub fn calories(field: &str, value: i64) -> AppResult<i64> {
    if value < 0 {
        return Err(AppError::Validation(format!(
            "{} must be a non-negative integer, got {}",
            field, value
        )));
    }
    if value > MAX_CALORIES {
        return Err(AppError::Validation(format!(
            "{} must be at most {}, got {}",
            field, MAX_CALORIES, value
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_parse_date_accepts_iso() {
        let date = parse_date("2024-01-01").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[rstest]
    #[case("2024-1-1")]
    #[case("01/01/2024")]
    #[case("2024-02-30")]
    #[case("")]
    #[case("yesterday")]
    fn test_parse_date_rejects_malformed(#[case] input: &str) {
        assert!(matches!(parse_date(input), Err(AppError::Validation(_))));
    }

    #[rstest]
    #[case("", false)]
    #[case("   ", false)]
    #[case(" eggs ", true)]
    fn test_required_text(#[case] input: &str, #[case] ok: bool) {
        assert_eq!(required_text("food", input).is_ok(), ok);
    }

    #[test]
    fn test_required_text_trims() {
        assert_eq!(required_text("name", "  alice ").unwrap(), "alice");
    }

    #[test]
    fn test_negative_calories_rejected() {
        assert!(calories("calories", -1).is_err());
        assert_eq!(calories("calories", 0).unwrap(), 0);
    }

    #[rstest]
    #[case(MAX_CALORIES, true)]
    #[case(MAX_CALORIES + 1, false)]
    #[case(100_000_000_000_000_000, false)]
    #[case(i64::MAX, false)]
    fn test_calories_upper_bound(#[case] value: i64, #[case] ok: bool) {
        assert_eq!(calories("calories", value).is_ok(), ok);
    }
}
