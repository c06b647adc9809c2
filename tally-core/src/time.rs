//! Calendar bucketing helpers shared by the loader and the aggregator.

use chrono::{Datelike, NaiveDateTime, Weekday};

/// Weekdays in report order
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Month bucket key, e.g. "2024-03"
pub fn month_key(ts: &NaiveDateTime) -> String {
    format!("{:04}-{:02}", ts.year(), ts.month())
}

/// Full English weekday name, e.g. "Monday"
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
