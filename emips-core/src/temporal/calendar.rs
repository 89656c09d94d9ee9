//! Calendar arithmetic for the weekly cascade.

use crate::errors::{EmipsError, EmipsResult};
use chrono::{Datelike, NaiveDate, Weekday};

fn first_of_month(year: i32, month: u32) -> EmipsResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or(EmipsError::InvalidDate { year, month })
}

/// Number of days in `month` of `year`.
pub fn month_days(year: i32, month: u32) -> EmipsResult<u32> {
    let first = first_of_month(year, month)?;
    let next = if month == 12 {
        first_of_month(year + 1, 1)?
    } else {
        first_of_month(year, month + 1)?
    };
    Ok((next - first).num_days() as u32)
}

pub fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 2, 29).is_some()
}

/// Number of days in `year`.
pub fn year_days(year: i32) -> u32 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// Occurrences of each weekday in the month, Monday first.
pub fn weekday_counts(year: i32, month: u32) -> EmipsResult<[u32; 7]> {
    let first = first_of_month(year, month)?;
    let mut counts = [0u32; 7];
    for day in first.iter_days().take(month_days(year, month)? as usize) {
        counts[day.weekday().num_days_from_monday() as usize] += 1;
    }
    Ok(counts)
}

/// Number of Saturdays and Sundays in the month.
pub fn weekend_days(year: i32, month: u32) -> EmipsResult<u32> {
    let counts = weekday_counts(year, month)?;
    Ok(counts[Weekday::Sat.num_days_from_monday() as usize]
        + counts[Weekday::Sun.num_days_from_monday() as usize])
}

/// Number of Monday to Friday days in the month.
pub fn weekday_days(year: i32, month: u32) -> EmipsResult<u32> {
    Ok(month_days(year, month)? - weekend_days(year, month)?)
}
