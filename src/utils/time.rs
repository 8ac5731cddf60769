//! Date utilities

use chrono::{Datelike, NaiveDate, Utc};

/// Current calendar day (UTC)
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Age in full years on `today`.
///
/// The year counts once the birthday's month and day have been reached.
/// People born on 29 February turn a year older on 1 March in common years.
pub fn full_age(birth_date: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth_date.year();
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        age -= 1;
    }
    age
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_birthday_reached_today() {
        assert_eq!(full_age(date(2012, 3, 15), date(2025, 3, 15)), 13);
    }

    #[test]
    fn test_day_before_birthday() {
        assert_eq!(full_age(date(2012, 3, 15), date(2025, 3, 14)), 12);
    }

    #[test]
    fn test_later_month_earlier_day() {
        assert_eq!(full_age(date(2012, 3, 15), date(2025, 4, 1)), 13);
    }

    #[test]
    fn test_leap_day_birthday() {
        assert_eq!(full_age(date(2008, 2, 29), date(2025, 2, 28)), 16);
        assert_eq!(full_age(date(2008, 2, 29), date(2025, 3, 1)), 17);
    }
}
