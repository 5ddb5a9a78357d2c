use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;

pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

fn first_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month + 1, 1)
}

/// Number of days in `month` (0 = January), taken as the day before the
/// first of the following month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month >= 11 {
        (year.saturating_add(1), 0)
    } else {
        (year, month + 1)
    };

    first_of_month(next_year, next_month)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}

/// Weekday of the 1st of the month, 0 = Sunday.
pub fn first_weekday_of_month(year: i32, month: u32) -> u32 {
    first_of_month(year, month)
        .map(|first| first.weekday().num_days_from_sunday())
        .unwrap_or(0)
}

pub fn format_date_key(year: i32, month: u32, day: u32) -> String {
    format!("{year:04}-{:02}-{day:02}", month + 1)
}

/// The (year, month) pair currently shown. `month` is 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayedMonth {
    pub year: i32,
    pub month: u32,
}

impl DisplayedMonth {
    /// Builds a month from an arbitrary month index, carrying overflow into
    /// the year the way `Date` normalisation does. The result stays between
    /// January of `MIN_YEAR` and December of `MAX_YEAR`.
    pub fn normalized(year: i32, month: i64) -> Self {
        let first = i64::from(MIN_YEAR) * 12;
        let last = i64::from(MAX_YEAR) * 12 + 11;
        let total = i64::from(year)
            .saturating_mul(12)
            .saturating_add(month)
            .clamp(first, last);
        Self {
            year: total.div_euclid(12) as i32,
            month: total.rem_euclid(12) as u32,
        }
    }

    pub fn advance(self, offset: i64) -> Self {
        Self::normalized(self.year, i64::from(self.month).saturating_add(offset))
    }

    pub fn contains(&self, year: i32, month_number: u32) -> bool {
        self.year == year && self.month + 1 == month_number
    }

    pub fn month_number(&self) -> u32 {
        self.month + 1
    }

    pub fn label(&self) -> String {
        format!("{} {}", MONTH_NAMES[self.month as usize % 12], self.year)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CalendarCell {
    Blank,
    Day {
        day: u32,
        #[serde(rename = "dateKey")]
        date_key: String,
        wage: f64,
    },
}

impl CalendarCell {
    pub fn is_blank(&self) -> bool {
        matches!(self, CalendarCell::Blank)
    }
}

pub fn build_month_grid(month: DisplayedMonth, wages: &HashMap<String, f64>) -> Vec<CalendarCell> {
    let offset = first_weekday_of_month(month.year, month.month) as usize;
    let days = days_in_month(month.year, month.month);

    let mut cells = Vec::with_capacity(offset + days as usize);
    cells.extend(std::iter::repeat_n(CalendarCell::Blank, offset));
    for day in 1..=days {
        let date_key = format_date_key(month.year, month.month, day);
        let wage = wages.get(&date_key).copied().unwrap_or(0.0);
        cells.push(CalendarCell::Day {
            day,
            date_key,
            wage,
        });
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leap_years_follow_gregorian_rules() {
        assert_eq!(days_in_month(2024, 1), 29);
        assert_eq!(days_in_month(2023, 1), 28);
        assert_eq!(days_in_month(2000, 1), 29);
        assert_eq!(days_in_month(1900, 1), 28);
        assert_eq!(days_in_month(2023, 11), 31);
        assert_eq!(days_in_month(2023, 3), 30);
        assert_eq!(days_in_month(MAX_YEAR, 11), 31);
    }

    #[test]
    fn first_weekday_matches_known_dates() {
        // 2023-12-01 was a Friday, 2024-09-01 a Sunday.
        assert_eq!(first_weekday_of_month(2023, 11), 5);
        assert_eq!(first_weekday_of_month(2024, 8), 0);
        assert_eq!(first_weekday_of_month(2000, 0), 6);
    }

    #[test]
    fn date_keys_parse_back_to_their_parts() {
        for year in 1900..=2100 {
            for month in 0..12 {
                for day in 1..=days_in_month(year, month) {
                    let key = format_date_key(year, month, day);
                    let parsed = NaiveDate::parse_from_str(&key, "%Y-%m-%d").expect("valid key");
                    assert_eq!(
                        (parsed.year(), parsed.month(), parsed.day()),
                        (year, month + 1, day)
                    );
                }
            }
        }
        assert_eq!(format_date_key(987, 0, 5), "0987-01-05");
    }

    #[test]
    fn grid_is_offset_plus_days_long() {
        let wages = HashMap::new();
        for year in [1900, 2023, 2024, 2100] {
            for month in 0..12 {
                let displayed = DisplayedMonth { year, month };
                let cells = build_month_grid(displayed, &wages);
                let offset = first_weekday_of_month(year, month) as usize;
                let days = days_in_month(year, month) as usize;
                assert_eq!(cells.len(), offset + days);
                assert!(cells[..offset].iter().all(CalendarCell::is_blank));
                let numbered: Vec<u32> = cells[offset..]
                    .iter()
                    .filter_map(|cell| match cell {
                        CalendarCell::Day { day, .. } => Some(*day),
                        CalendarCell::Blank => None,
                    })
                    .collect();
                assert_eq!(numbered, (1..=days as u32).collect::<Vec<_>>());
            }
        }
    }

    #[test]
    fn grid_picks_up_indexed_wages() {
        let mut wages = HashMap::new();
        wages.insert("2023-12-01".to_string(), 350.0);
        wages.insert("2023-12-25".to_string(), 800.0);
        wages.insert("2023-11-30".to_string(), 99.0);

        let cells = build_month_grid(DisplayedMonth { year: 2023, month: 11 }, &wages);
        for cell in &cells {
            if let CalendarCell::Day { day, wage, .. } = cell {
                let expected = match day {
                    1 => 350.0,
                    25 => 800.0,
                    _ => 0.0,
                };
                assert_eq!(*wage, expected, "day {day}");
            }
        }
    }

    #[test]
    fn advance_rolls_over_years() {
        let december = DisplayedMonth { year: 2023, month: 11 };
        assert_eq!(december.advance(1), DisplayedMonth { year: 2024, month: 0 });

        let january = DisplayedMonth { year: 2023, month: 0 };
        assert_eq!(january.advance(-1), DisplayedMonth { year: 2022, month: 11 });

        assert_eq!(january.advance(-25), DisplayedMonth { year: 2020, month: 11 });
        assert_eq!(january.advance(0), january);
    }

    #[test]
    fn normalization_clamps_to_the_supported_range() {
        assert_eq!(DisplayedMonth::normalized(2023, 12), DisplayedMonth { year: 2024, month: 0 });
        assert_eq!(DisplayedMonth::normalized(2023, -1), DisplayedMonth { year: 2022, month: 11 });

        let earliest = DisplayedMonth { year: MIN_YEAR, month: 0 };
        let latest = DisplayedMonth { year: MAX_YEAR, month: 11 };
        assert_eq!(earliest.advance(-1), earliest);
        assert_eq!(earliest.advance(i64::MIN), earliest);
        assert_eq!(latest.advance(1), latest);
        assert_eq!(latest.advance(i64::MAX), latest);
        assert_eq!(DisplayedMonth::normalized(MAX_YEAR, 12), latest);
        assert_eq!(DisplayedMonth::normalized(i32::MIN, 5), earliest);
        assert_eq!(
            DisplayedMonth { year: MIN_YEAR, month: 1 }.advance(-1),
            earliest
        );
    }
}
