//! Parsing and validation of typed user input

use chrono::NaiveDate;

use crate::error::{EloError, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// True for a real calendar date written exactly as `YYYY-MM-DD`
pub fn validate_date(input: &str) -> bool {
    input.len() == 10 && NaiveDate::parse_from_str(input, DATE_FORMAT).is_ok()
}

pub fn require_date(input: &str) -> Result<()> {
    if validate_date(input) {
        Ok(())
    } else {
        Err(EloError::ValidationError(format!(
            "'{}' is not a valid date, use YYYY-MM-DD",
            input
        )))
    }
}

/// Parse a decimal number, accepting either `,` or `.` as separator
pub fn parse_decimal(input: &str) -> Result<f64> {
    let normalized = input.trim().replace(',', ".");
    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(EloError::ValidationError(format!("'{}' is not a number", input.trim()))),
    }
}

pub fn check_risk_ratio(value: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(EloError::ValidationError(format!(
            "risk area ratio must be between 0.0 and 1.0, got {}",
            value
        )))
    }
}

pub fn check_population_density(value: f64) -> Result<f64> {
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(EloError::ValidationError(format!(
            "population density cannot be negative, got {}",
            value
        )))
    }
}

pub fn parse_risk_ratio(input: &str) -> Result<f64> {
    check_risk_ratio(parse_decimal(input)?)
}

pub fn parse_population_density(input: &str) -> Result<f64> {
    check_population_density(parse_decimal(input)?)
}

/// Parse a row id typed by the user
pub fn parse_id(input: &str) -> Result<i64> {
    input
        .trim()
        .parse::<i64>()
        .map_err(|_| EloError::ValidationError(format!("'{}' is not a whole number", input.trim())))
}

pub fn require_non_empty(label: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(EloError::ValidationError(format!("{} cannot be empty", label)))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dates() {
        assert!(validate_date("2024-02-29"));
        assert!(validate_date("1999-12-31"));

        assert!(!validate_date("2023-02-29"));
        assert!(!validate_date("2024-13-01"));
        assert!(!validate_date("2024-1-5"));
        assert!(!validate_date("05/01/2024"));
        assert!(!validate_date(""));
        assert!(require_date("31-12-2024").is_err());
    }

    #[test]
    fn test_decimal_separators() {
        assert_eq!(parse_decimal("0,35").unwrap(), 0.35);
        assert_eq!(parse_decimal(" 0.35 ").unwrap(), 0.35);
        assert_eq!(parse_decimal("1200").unwrap(), 1200.0);
        assert!(parse_decimal("abc").is_err());
        assert!(parse_decimal("NaN").is_err());
        assert!(parse_decimal("").is_err());
    }

    #[test]
    fn test_ranges() {
        assert_eq!(parse_risk_ratio("1").unwrap(), 1.0);
        assert!(parse_risk_ratio("1,2").is_err());
        assert!(parse_risk_ratio("-0.1").is_err());

        assert_eq!(parse_population_density("0").unwrap(), 0.0);
        assert!(parse_population_density("-5").is_err());
    }

    #[test]
    fn test_ids() {
        assert_eq!(parse_id(" 42 ").unwrap(), 42);
        assert!(parse_id("4.2").is_err());
        assert!(parse_id("x").is_err());
    }

    #[test]
    fn test_non_empty() {
        assert!(require_non_empty("Name", "Centro").is_ok());
        assert!(require_non_empty("Name", "   ").is_err());
    }
}
