//! Due-date parsing and overdue detection.
//!
//! Due dates are stored as the `DD/MM/YYYY` text the user typed. They are
//! interpreted here, on demand, according to a [`DatePolicy`].

use chrono::{Days, Local, NaiveDate};

use crate::fields::DatePolicy;
use crate::task::Task;

/// Textual format of a due date.
pub const DUE_DATE_FORMAT: &str = "%d/%m/%Y";

/// Number of characters a stored due date always has.
pub const DUE_DATE_LEN: usize = 10;

/// Today's date in local time.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Format a calendar date the way due dates are typed.
pub fn format_due(date: NaiveDate) -> String {
    date.format(DUE_DATE_FORMAT).to_string()
}

/// Interpret a due-date string under the given policy.
pub fn parse_due(s: &str, policy: DatePolicy) -> Option<NaiveDate> {
    match policy {
        DatePolicy::Lenient => parse_lenient(s),
        DatePolicy::Strict => NaiveDate::parse_from_str(s.trim(), DUE_DATE_FORMAT).ok(),
    }
}

/// True iff the task is not done and its due date falls strictly before `today`.
pub fn is_overdue_on(task: &Task, today: NaiveDate, policy: DatePolicy) -> bool {
    if task.done {
        return false;
    }
    task.due_date
        .as_deref()
        .and_then(|d| parse_due(d, policy))
        .is_some_and(|due| due < today)
}

/// Positional day/month/year with rollover.
///
/// Each component is trimmed and read as a number: an empty component counts
/// as zero, `0x`/`0o`/`0b` prefixes are honoured and decimals are truncated
/// toward zero. Years 0..=99 land in the 1900s. Out-of-range days and months
/// carry into neighbouring months and years.
fn parse_lenient(s: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = s.split('/').collect();
    if parts.len() != 3 {
        return None;
    }
    let day = component(parts[0])?;
    let month = component(parts[1])?;
    let mut year = component(parts[2])?;
    if (0..=99).contains(&year) {
        year += 1900;
    }
    rollover(year, month.checked_sub(1)?, day)
}

fn component(s: &str) -> Option<i64> {
    let s = s.trim();
    if s.is_empty() {
        return Some(0);
    }
    if let Ok(n) = s.parse::<i64>() {
        return Some(n);
    }
    if let Some((radix, digits)) = radix_prefix(s) {
        return i64::from_str_radix(digits, radix).ok();
    }
    // f64 parsing also accepts "inf" and "NaN"; neither is a date part.
    s.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite() && n.abs() < i64::MAX as f64)
        .map(|n| n.trunc() as i64)
}

fn radix_prefix(s: &str) -> Option<(u32, &str)> {
    let (prefix, digits) = (s.get(..2)?, s.get(2..)?);
    let radix = match prefix.to_ascii_lowercase().as_str() {
        "0x" => 16,
        "0o" => 8,
        "0b" => 2,
        _ => return None,
    };
    // from_str_radix would accept a sign after the prefix.
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    Some((radix, digits))
}

fn rollover(year: i64, month0: i64, day: i64) -> Option<NaiveDate> {
    let year = year.checked_add(month0.div_euclid(12))?;
    let month = u32::try_from(month0.rem_euclid(12)).ok()? + 1;
    let first = NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, 1)?;
    if day >= 1 {
        first.checked_add_days(Days::new(u64::try_from(day - 1).ok()?))
    } else {
        first.checked_sub_days(Days::new(u64::try_from(1i64.checked_sub(day)?).ok()?))
    }
}

/// Format a due date relative to today ("today", "tomorrow", "in 3d", "2d late").
pub fn format_due_relative(due: Option<NaiveDate>, today: NaiveDate) -> String {
    match due {
        None => "-".into(),
        Some(d) => {
            let delta = (d - today).num_days();
            if delta == 0 {
                "today".into()
            } else if delta == 1 {
                "tomorrow".into()
            } else if delta > 1 {
                format!("in {}d", delta)
            } else {
                format!("{}d late", -delta)
            }
        }
    }
}
