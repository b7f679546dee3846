use chrono::{Datelike, Duration, NaiveDate};

use crate::engine::ScheduleError;
use crate::engine::frequency::Frequency;

/// Produce the ordered disbursement dates for a plan.
///
/// Generated sequences are strictly increasing and deterministic for
/// identical inputs. For `Custom`, the supplied dates are returned sorted
/// ascending with repeats dropped; for every other frequency the sequence
/// is derived from `start_reference` and `installment_count`.
pub fn generate(
    frequency: Frequency,
    start_reference: NaiveDate,
    installment_count: usize,
    day_of_week: Option<u8>,
    custom_dates: &[NaiveDate],
) -> Result<Vec<NaiveDate>, ScheduleError> {
    if frequency.is_custom() {
        return generate_custom(custom_dates);
    }
    if installment_count == 0 {
        return Err(ScheduleError::InvalidDuration);
    }

    let dates = match frequency {
        Frequency::Daily => day_stepped(start_reference, 1, installment_count),
        Frequency::Weekly => day_stepped(start_reference, 7, installment_count),
        Frequency::Biweekly => day_stepped(start_reference, 14, installment_count),
        Frequency::WeeklySpecific => {
            let Some(day) = day_of_week else {
                return Err(ScheduleError::InvalidFrequencyConfig {
                    reason: "weekly_specific requires a day_of_week".to_string(),
                });
            };
            let first = align_to_weekday(start_reference, day);
            day_stepped(first, 7, installment_count)
        }
        Frequency::Monthly => month_stepped(start_reference, 1, installment_count),
        Frequency::Quarterly => month_stepped(start_reference, 3, installment_count),
        Frequency::Biannual => month_stepped(start_reference, 6, installment_count),
        Frequency::Annually => month_stepped(start_reference, 12, installment_count),
        Frequency::EndOfMonth => month_ends(start_reference, installment_count),
        Frequency::Custom => Vec::new(),
    };

    Ok(enforce_strictly_increasing(dates))
}

fn generate_custom(custom_dates: &[NaiveDate]) -> Result<Vec<NaiveDate>, ScheduleError> {
    if custom_dates.is_empty() {
        return Err(ScheduleError::InvalidFrequencyConfig {
            reason: "custom frequency requires at least one date".to_string(),
        });
    }
    let mut dates = custom_dates.to_vec();
    dates.sort_unstable();
    dates.dedup();
    Ok(dates)
}

fn day_stepped(first: NaiveDate, step_days: i64, count: usize) -> Vec<NaiveDate> {
    (0..count)
        .map(|index| first + Duration::days(step_days * index as i64))
        .collect()
}

/// Each date is computed from the anchor rather than from the previous
/// date, so a clamped short month does not erase the original day-of-month
/// (Jan 31 -> Feb 28 -> Mar 31).
fn month_stepped(anchor: NaiveDate, step_months: i32, count: usize) -> Vec<NaiveDate> {
    (0..count)
        .map(|index| add_months_clamped(anchor, step_months * index as i32))
        .collect()
}

fn month_ends(start_reference: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let first_of_start_month = start_reference.with_day(1).unwrap_or(start_reference);
    (0..count)
        .map(|index| end_of_month(add_months_clamped(first_of_start_month, index as i32)))
        .collect()
}

/// The schedule invariant is strictly-increasing dates; repair any
/// non-advancing date by skipping forward a day.
fn enforce_strictly_increasing(mut dates: Vec<NaiveDate>) -> Vec<NaiveDate> {
    for index in 1..dates.len() {
        if dates[index] <= dates[index - 1] {
            dates[index] = dates[index - 1] + Duration::days(1);
        }
    }
    dates
}

/// First occurrence of `day_of_week` (0 = Sunday) on or after `date`.
/// A date already on the target weekday is returned unchanged.
pub fn align_to_weekday(date: NaiveDate, day_of_week: u8) -> NaiveDate {
    let current = i64::from(date.weekday().num_days_from_sunday());
    let target = i64::from(day_of_week % 7);
    let offset = (target - current).rem_euclid(7);
    date + Duration::days(offset)
}

pub fn add_months_clamped(date: NaiveDate, months: i32) -> NaiveDate {
    let current_month = i32::try_from(date.month()).unwrap_or(1);
    let mut raw_month = current_month + months;
    let mut year = date.year();

    while raw_month > 12 {
        raw_month -= 12;
        year += 1;
    }
    while raw_month < 1 {
        raw_month += 12;
        year -= 1;
    }

    let month = u32::try_from(raw_month).unwrap_or(1);
    let day = date.day().min(days_in_month(year, month));
    if let Some(result) = NaiveDate::from_ymd_opt(year, month, day) {
        return result;
    }
    date
}

pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    let day = days_in_month(date.year(), date.month());
    date.with_day(day).unwrap_or(date)
}

pub fn format_iso_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    if !looks_like_iso_date(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

fn looks_like_iso_date(value: &str) -> bool {
    if value.len() != 10 {
        return false;
    }
    let bytes = value.as_bytes();
    if bytes[4] != b'-' || bytes[7] != b'-' {
        return false;
    }

    for index in [0usize, 1, 2, 3, 5, 6, 8, 9] {
        if !bytes[index].is_ascii_digit() {
            return false;
        }
    }
    true
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 31,
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}
