//! Age derivation.
//!
//! Ages are never stored; they are computed from the birth date each time as
//! whole years of 365.25 days.

use chrono::{DateTime, Utc};

const MILLIS_PER_YEAR: f64 = 365.25 * 24.0 * 60.0 * 60.0 * 1000.0;

/// Whole years between `birth_date` and `at`, floored. Negative spans yield 0.
pub fn age_at(birth_date: DateTime<Utc>, at: DateTime<Utc>) -> i32 {
    let millis = (at - birth_date).num_milliseconds();
    if millis <= 0 {
        return 0;
    }
    (millis as f64 / MILLIS_PER_YEAR).floor() as i32
}

/// Current age in whole years.
pub fn age_in_years(birth_date: DateTime<Utc>) -> i32 {
    age_at(birth_date, Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_age_exact_years() {
        let birth = Utc.with_ymd_and_hms(2018, 3, 1, 0, 0, 0).unwrap();
        let at = Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap();
        assert_eq!(age_at(birth, at), 6);
    }

    #[test]
    fn test_age_day_before_birthday() {
        let birth = Utc.with_ymd_and_hms(2018, 6, 15, 0, 0, 0).unwrap();
        let at = Utc.with_ymd_and_hms(2024, 6, 10, 0, 0, 0).unwrap();
        assert_eq!(age_at(birth, at), 5);
    }

    #[test]
    fn test_age_uses_quarter_day_years() {
        let birth = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        // 365 days is short of a 365.25-day year
        assert_eq!(age_at(birth, birth + Duration::days(365)), 0);
        assert_eq!(age_at(birth, birth + Duration::hours(365 * 24 + 6)), 1);
    }

    #[test]
    fn test_age_future_birth_date_is_zero() {
        let now = Utc::now();
        assert_eq!(age_at(now + Duration::days(30), now), 0);
    }
}
