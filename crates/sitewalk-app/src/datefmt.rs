// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime};

/// Rendered wherever a timestamp cannot be parsed. Malformed dates are
/// display noise, not errors.
pub const INVALID_DATE: &str = "Invalid Date";

const DATE_FORMAT: &[time::format_description::BorrowedFormatItem<'static>] =
    format_description!("[month repr:short] [day padding:none], [year]");
const TIME_FORMAT: &[time::format_description::BorrowedFormatItem<'static>] =
    format_description!("[hour repr:12 padding:none]:[minute] [period case:lower]");

fn parse_iso(iso: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(iso, &Rfc3339).ok()
}

pub fn format_date(iso: &str) -> String {
    parse_iso(iso)
        .and_then(|instant| instant.format(DATE_FORMAT).ok())
        .unwrap_or_else(|| INVALID_DATE.to_owned())
}

pub fn format_time(iso: &str) -> String {
    parse_iso(iso)
        .and_then(|instant| instant.format(TIME_FORMAT).ok())
        .unwrap_or_else(|| INVALID_DATE.to_owned())
}

pub fn format_date_time(iso: &str) -> String {
    match parse_iso(iso) {
        Some(_) => format!("{} {}", format_date(iso), format_time(iso)),
        None => INVALID_DATE.to_owned(),
    }
}

/// The `YYYY-MM-DD` prefix of an ISO timestamp, when it looks like one.
pub fn day_slice(iso: &str) -> Option<&str> {
    let slice = iso.get(..10)?;
    let bytes = slice.as_bytes();
    let shaped = bytes
        .iter()
        .enumerate()
        .all(|(index, byte)| match index {
            4 | 7 => *byte == b'-',
            _ => byte.is_ascii_digit(),
        });
    shaped.then_some(slice)
}

pub fn day_key(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Calendar-day bucket check: a string-level comparison of the date
/// slice, deliberately not timezone-aware.
pub fn same_day(iso: &str, reference: Date) -> bool {
    day_slice(iso).is_some_and(|slice| slice == day_key(reference))
}

pub fn shift_date_by_days(date: Date, days: i64) -> Option<Date> {
    date.checked_add(Duration::days(days))
}
