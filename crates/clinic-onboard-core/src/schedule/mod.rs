//! Clinic open/closed evaluation against the weekly operating hours.
//!
//! Shifts are half-open `[open, close)` intervals of `HH:MM` wall-clock
//! times. A shift whose close is before its open would cross midnight; such
//! shifts never match, and each `is_open` call logs a warning for every such
//! shift it meets.

use chrono::{Datelike, Duration, Local, NaiveDateTime, NaiveTime, Weekday};

use crate::models::{DaySchedule, OperatingHours, Shift, WeeklySchedule};

/// Parse a `HH:MM` time. Returns `None` when malformed.
pub fn parse_hhmm(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()
}

/// True when the shift's close time is before its open time.
pub fn crosses_midnight(shift: &Shift) -> bool {
    match (parse_hhmm(&shift.open), parse_hhmm(&shift.close)) {
        (Some(open), Some(close)) => close < open,
        _ => false,
    }
}

/// True when `time` falls in `[open, close)`.
pub fn shift_contains(shift: &Shift, time: NaiveTime) -> bool {
    match (parse_hhmm(&shift.open), parse_hhmm(&shift.close)) {
        (Some(open), Some(close)) => open <= time && time < close,
        _ => {
            tracing::debug!(open = %shift.open, close = %shift.close, "malformed shift ignored");
            false
        }
    }
}

/// Schedule entry for a weekday. Missing days count as closed.
pub fn day_schedule(schedule: &WeeklySchedule, weekday: Weekday) -> Option<&DaySchedule> {
    match weekday {
        Weekday::Mon => schedule.monday.as_ref(),
        Weekday::Tue => schedule.tuesday.as_ref(),
        Weekday::Wed => schedule.wednesday.as_ref(),
        Weekday::Thu => schedule.thursday.as_ref(),
        Weekday::Fri => schedule.friday.as_ref(),
        Weekday::Sat => schedule.saturday.as_ref(),
        Weekday::Sun => schedule.sunday.as_ref(),
    }
}

fn open_shifts(day: Option<&DaySchedule>) -> impl Iterator<Item = &Shift> {
    day.filter(|d| !d.is_closed)
        .into_iter()
        .flat_map(|d| d.shifts.iter())
}

/// Whether the clinic is open at `now` (local wall-clock time).
pub fn is_open(hours: &OperatingHours, now: NaiveDateTime) -> bool {
    if hours.open_24hrs {
        return true;
    }

    let day = day_schedule(&hours.schedule, now.weekday());
    let time = now.time();
    open_shifts(day).any(|shift| {
        if crosses_midnight(shift) {
            tracing::warn!(
                open = %shift.open,
                close = %shift.close,
                "shift crosses midnight and never matches"
            );
            return false;
        }
        shift_contains(shift, time)
    })
}

pub fn is_open_now(hours: &OperatingHours) -> bool {
    is_open(hours, Local::now().naive_local())
}

/// Next moment at or after `now` when the clinic is open, looking one week
/// ahead. Returns `now` itself when already open.
pub fn next_opening(hours: &OperatingHours, now: NaiveDateTime) -> Option<NaiveDateTime> {
    if is_open(hours, now) {
        return Some(now);
    }

    (0..=7).find_map(|offset| {
        let date = now.date() + Duration::days(offset);
        let day = day_schedule(&hours.schedule, date.weekday());
        open_shifts(day)
            .filter(|shift| !crosses_midnight(shift))
            .filter_map(|shift| parse_hhmm(&shift.open).zip(parse_hhmm(&shift.close)))
            .filter(|(open, close)| open < close)
            .map(|(open, _)| date.and_time(open))
            .filter(|start| *start > now)
            .min()
    })
}
