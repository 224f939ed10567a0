//! Name normalization and season helpers.

use chrono::{Datelike, NaiveDate, Utc};

/// Lowercase, trim, and collapse runs of whitespace.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// The NBA season containing `date`, e.g. "2024-25".
///
/// A season starts in October: from October on it is this year's season,
/// before that it is last year's.
pub fn season_for(date: NaiveDate) -> String {
    let start_year = if date.month() >= 10 {
        date.year()
    } else {
        date.year() - 1
    };
    format!("{start_year}-{:02}", (start_year + 1).rem_euclid(100))
}

/// The current NBA season (UTC).
pub fn current_season() -> String {
    season_for(Utc::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_whitespace() {
        assert_eq!(normalize_name("  LeBron   JAMES "), "lebron james");
        assert_eq!(normalize_name(""), "");
    }

    #[test]
    fn season_rolls_over_in_october() {
        let sept = NaiveDate::from_ymd_opt(2025, 9, 30).unwrap();
        let oct = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap();
        let feb = NaiveDate::from_ymd_opt(2025, 2, 14).unwrap();
        assert_eq!(season_for(sept), "2024-25");
        assert_eq!(season_for(oct), "2025-26");
        assert_eq!(season_for(feb), "2024-25");
    }

    #[test]
    fn century_boundary() {
        let date = NaiveDate::from_ymd_opt(2099, 11, 1).unwrap();
        assert_eq!(season_for(date), "2099-00");
    }

    #[test]
    fn current_season_has_expected_shape() {
        let season = current_season();
        assert_eq!(season.len(), 7);
        assert_eq!(&season[4..5], "-");
    }
}
