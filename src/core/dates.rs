use chrono::{Days, NaiveDate};

use crate::error::RetireError;

pub const DAYS_PER_YEAR: f64 = 365.25;
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, RetireError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| RetireError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

/// Fractional age in years on `date`.
pub fn age_on(birthdate: NaiveDate, date: NaiveDate) -> f64 {
    (date - birthdate).num_days() as f64 / DAYS_PER_YEAR
}

/// Day counts this close to a whole day are float noise from `age_on`.
const WHOLE_DAY_TOLERANCE: f64 = 1e-6;

/// Calendar date on which the owner turns `age`, truncated to whole days.
pub fn date_at_age(birthdate: NaiveDate, age: f64) -> Option<NaiveDate> {
    if !age.is_finite() || age < 0.0 {
        return None;
    }
    let days = age * DAYS_PER_YEAR;
    let nearest = days.round();
    let whole = if (days - nearest).abs() < WHOLE_DAY_TOLERANCE {
        nearest
    } else {
        days.floor()
    };
    birthdate.checked_add_days(Days::new(whole as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).expect("valid test date")
    }

    #[test]
    fn age_counts_julian_years() {
        let age = age_on(date("1990-01-01"), date("2020-01-01"));
        assert!((age - 10_957.0 / 365.25).abs() < 1e-12);
    }

    #[test]
    fn date_at_age_truncates_partial_days() {
        let birth = date("2000-01-01");
        assert_eq!(date_at_age(birth, 0.0), Some(birth));
        // 1.5 years = 547.875 days.
        assert_eq!(date_at_age(birth, 1.5), Some(date("2001-07-01")));
    }

    #[test]
    fn date_at_age_inverts_age_on() {
        let birth = date("1990-01-01");
        let mut day = date("1990-01-02");
        while day <= date("2100-12-31") {
            assert_eq!(date_at_age(birth, age_on(birth, day)), Some(day));
            day = day + Days::new(37);
        }
        assert_eq!(
            date_at_age(birth, age_on(birth, date("2024-06-01"))),
            Some(date("2024-06-01"))
        );
    }

    #[test]
    fn date_at_age_rejects_out_of_range_ages() {
        let birth = date("2000-01-01");
        assert_eq!(date_at_age(birth, -1.0), None);
        assert_eq!(date_at_age(birth, f64::INFINITY), None);
        assert_eq!(date_at_age(birth, 1e12), None);
    }

    #[test]
    fn parse_date_names_the_field() {
        let err = parse_date("--birthdate", "01/02/1990").expect_err("bad format");
        assert!(err.to_string().contains("--birthdate"));
        assert_eq!(
            parse_date("--birthdate", " 1990-02-01 ").expect("trimmed"),
            date("1990-02-01")
        );
    }
}
