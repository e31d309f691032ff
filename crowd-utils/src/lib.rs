//! Shared utility functions for the crowd dashboard crates.

/// Year/month helpers used by the date pickers and the bootstrap defaults
pub mod dates {
    use chrono::{Datelike, Local, NaiveDate};

    /// First year the camera data covers.
    pub const EARLIEST_YEAR: i32 = 2021;

    /// Today's date in the local timezone.
    pub fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    /// The month a picker should land on for `year`.
    /// The current year opens on the current month, past years on December.
    pub fn default_month_for(year: &str, today: NaiveDate) -> String {
        if year.trim() == today.year().to_string() {
            today.month().to_string()
        } else {
            "12".to_string()
        }
    }

    fn parse_year_month(year: &str, month: &str) -> Option<(i32, u32)> {
        let year = year.trim().parse::<i32>().ok()?;
        let month = month.trim().parse::<u32>().ok()?;
        (1..=12).contains(&month).then_some((year, month))
    }

    /// The month before `year`/`month`, or `None` before January of [`EARLIEST_YEAR`].
    pub fn previous_month(year: &str, month: &str) -> Option<(String, String)> {
        let (mut y, mut m) = parse_year_month(year, month)?;
        if m == 1 {
            m = 12;
            y -= 1;
        } else {
            m -= 1;
        }
        if y < EARLIEST_YEAR {
            return None;
        }
        Some((y.to_string(), m.to_string()))
    }

    /// The month after `year`/`month`, or `None` past the month containing `today`.
    pub fn next_month(year: &str, month: &str, today: NaiveDate) -> Option<(String, String)> {
        let (mut y, mut m) = parse_year_month(year, month)?;
        if m == 12 {
            m = 1;
            y += 1;
        } else {
            m += 1;
        }
        if y > today.year() || (y == today.year() && m > today.month()) {
            return None;
        }
        Some((y.to_string(), m.to_string()))
    }

    /// Years a picker offers, oldest first.
    pub fn available_years(today: NaiveDate) -> Vec<String> {
        (EARLIEST_YEAR..=today.year()).map(|y| y.to_string()).collect()
    }

    /// Months a picker offers for `year`; the current year stops at the current month.
    pub fn available_months(year: &str, today: NaiveDate) -> Vec<String> {
        let last = if year.trim() == today.year().to_string() {
            today.month()
        } else {
            12
        };
        (1..=last).map(|m| m.to_string()).collect()
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn day(y: i32, m: u32, d: u32) -> NaiveDate {
            NaiveDate::from_ymd_opt(y, m, d).unwrap()
        }

        #[test]
        fn test_default_month_for() {
            let today = day(2025, 5, 20);
            assert_eq!(default_month_for("2025", today), "5");
            assert_eq!(default_month_for("2023", today), "12");
        }

        #[test]
        fn test_previous_month() {
            assert_eq!(
                previous_month("2024", "1"),
                Some(("2023".to_string(), "12".to_string()))
            );
            assert_eq!(
                previous_month("2024", "7"),
                Some(("2024".to_string(), "6".to_string()))
            );
            assert_eq!(previous_month("2021", "1"), None);
            assert_eq!(previous_month("2024", ""), None);
        }

        #[test]
        fn test_next_month() {
            let today = day(2025, 5, 20);
            assert_eq!(
                next_month("2024", "12", today),
                Some(("2025".to_string(), "1".to_string()))
            );
            assert_eq!(
                next_month("2025", "4", today),
                Some(("2025".to_string(), "5".to_string()))
            );
            assert_eq!(next_month("2025", "5", today), None);
        }

        #[test]
        fn test_available_ranges() {
            let today = day(2023, 3, 1);
            assert_eq!(available_years(today), vec!["2021", "2022", "2023"]);
            assert_eq!(available_months("2023", today), vec!["1", "2", "3"]);
            assert_eq!(available_months("2022", today).len(), 12);
        }
    }
}
