//! Calendar arithmetic for the day-grid views.

use chrono::{Datelike, NaiveDate, Weekday};

pub fn days_in_month(month: u32, year: i32) -> u32 {
    let first = match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(date) => date,
        None => return 0,
    };
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    match next {
        Some(date) => date.signed_duration_since(first).num_days() as u32,
        None => 0,
    }
}

/// Zero-padded day column keys for a month: "01".."31".
pub fn day_keys(month: u32, year: i32) -> Vec<String> {
    (1..=days_in_month(month, year))
        .map(|day| format!("{:02}", day))
        .collect()
}

/// Vietnamese day-of-week label: "T2".."T7" and "CN" for Sunday.
/// Empty on an invalid date.
pub fn day_label(day: u32, month: u32, year: i32) -> &'static str {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => match date.weekday() {
            Weekday::Mon => "T2",
            Weekday::Tue => "T3",
            Weekday::Wed => "T4",
            Weekday::Thu => "T5",
            Weekday::Fri => "T6",
            Weekday::Sat => "T7",
            Weekday::Sun => "CN",
        },
        None => "",
    }
}

/// Weekend days are tagged for styling only; they carry no
/// computational effect.
pub fn is_weekend_label(label: &str) -> bool {
    label == "T7" || label == "CN"
}

/// Whether a raw date cell refers to the given calendar day of the
/// given month. Accepts `-` or `/` separators and both token orders:
/// a 4-digit first token means year-month-day, otherwise day-month.
/// Unparseable dates match nothing.
pub fn date_matches_day(raw: &str, day: u32, month: u32) -> bool {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return false;
    }
    let parts: Vec<&str> = trimmed.split(['-', '/']).collect();
    if parts.len() < 2 {
        return false;
    }
    let (d, m) = if parts[0].len() == 4 {
        if parts.len() < 3 {
            return false;
        }
        (parts[2], parts[1])
    } else {
        (parts[0], parts[1])
    };
    match (d.trim().parse::<u32>(), m.trim().parse::<u32>()) {
        (Ok(parsed_day), Ok(parsed_month)) => parsed_day == day && parsed_month == month,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_lengths_including_leap_years() {
        assert_eq!(days_in_month(9, 2025), 30);
        assert_eq!(days_in_month(12, 2025), 31);
        assert_eq!(days_in_month(2, 2024), 29);
        assert_eq!(days_in_month(2, 2025), 28);
    }

    #[test]
    fn day_keys_are_padded() {
        let keys = day_keys(2, 2025);
        assert_eq!(keys.first().map(String::as_str), Some("01"));
        assert_eq!(keys.last().map(String::as_str), Some("28"));
    }

    #[test]
    fn labels_follow_the_calendar() {
        // 2025-09-01 is a Monday.
        assert_eq!(day_label(1, 9, 2025), "T2");
        assert_eq!(day_label(6, 9, 2025), "T7");
        assert_eq!(day_label(7, 9, 2025), "CN");
        assert_eq!(day_label(31, 9, 2025), "");
    }

    #[test]
    fn weekend_labels() {
        assert!(is_weekend_label("T7"));
        assert!(is_weekend_label("CN"));
        assert!(!is_weekend_label("T2"));
    }

    #[test]
    fn date_matching_accepts_both_token_orders() {
        assert!(date_matches_day("12-03", 12, 3));
        assert!(date_matches_day("2025-03-12", 12, 3));
        assert!(date_matches_day("12/03/2025", 12, 3));
        assert!(!date_matches_day("12-03", 3, 12));
        assert!(!date_matches_day("13-03", 12, 3));
    }

    #[test]
    fn junk_dates_match_nothing() {
        assert!(!date_matches_day("", 1, 1));
        assert!(!date_matches_day("hôm nay", 1, 1));
        assert!(!date_matches_day("2025", 1, 1));
    }
}
