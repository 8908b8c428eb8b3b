use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, TimeZone, Utc};

pub fn parse_tz_offset_from_env() -> FixedOffset {
    let raw = std::env::var("TIFFIN_TZ_OFFSET").unwrap_or_else(|_| "+00:00".to_string());
    parse_tz_offset(&raw).unwrap_or_else(|| {
        warn!("Invalid TIFFIN_TZ_OFFSET '{}', defaulting to +00:00", raw);
        utc_offset()
    })
}

pub fn utc_offset() -> FixedOffset {
    FixedOffset::east_opt(0).expect("fixed offset")
}

pub fn parse_tz_offset(value: &str) -> Option<FixedOffset> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let sign = match trimmed.chars().next()? {
        '+' => 1,
        '-' => -1,
        _ => return None,
    };
    let rest = &trimmed[1..];
    let mut parts = rest.split(':');
    let hours: i32 = parts.next()?.parse().ok()?;
    let minutes: i32 = parts.next().unwrap_or("0").parse().ok()?;
    if !(0..=23).contains(&hours) || !(0..=59).contains(&minutes) {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Calendar date of `now` in the marketplace's local offset.
pub fn local_today(now: DateTime<Utc>, tz: FixedOffset) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}

pub fn local_date_of(at: DateTime<Utc>, tz: FixedOffset) -> NaiveDate {
    at.with_timezone(&tz).date_naive()
}

/// Half-open UTC range `[start, end)` covering the local calendar day.
/// `None` when local midnight falls outside the representable range.
pub fn day_bounds(date: NaiveDate, tz: FixedOffset) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = local_midnight(date, tz)?;
    let end = match date.succ_opt() {
        Some(next) => local_midnight(next, tz).unwrap_or(DateTime::<Utc>::MAX_UTC),
        None => DateTime::<Utc>::MAX_UTC,
    };
    Some((start, end))
}

fn local_midnight(date: NaiveDate, tz: FixedOffset) -> Option<DateTime<Utc>> {
    let naive = date.and_hms_opt(0, 0, 0)?;
    tz.from_local_datetime(&naive)
        .single()
        .map(|local| local.with_timezone(&Utc))
}

/// Parses an optional `YYYY-MM-DD` query value, falling back to today.
/// Only four digit years are accepted.
pub fn resolve_date(
    raw: Option<&str>,
    now: DateTime<Utc>,
    tz: FixedOffset,
) -> Result<NaiveDate, String> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(value) => {
            let invalid = || format!("Invalid date '{}', expected YYYY-MM-DD", value);
            let four_digit_year = value
                .split('-')
                .next()
                .is_some_and(|y| y.len() == 4 && y.bytes().all(|b| b.is_ascii_digit()));
            if !four_digit_year {
                return Err(invalid());
            }
            NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| invalid())
        }
        None => Ok(local_today(now, tz)),
    }
}

/// Resolves the query date and its UTC bounds in one step.
pub fn resolve_day(
    raw: Option<&str>,
    now: DateTime<Utc>,
    tz: FixedOffset,
) -> Result<(NaiveDate, DateTime<Utc>, DateTime<Utc>), String> {
    let day = resolve_date(raw, now, tz)?;
    let (from, until) =
        day_bounds(day, tz).ok_or_else(|| format!("Date {} is out of range", day))?;
    Ok((day, from, until))
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).expect("first day of month")
}

pub fn previous_month(date: NaiveDate) -> NaiveDate {
    let first = first_of_month(date);
    first
        .pred_opt()
        .map(first_of_month)
        .unwrap_or(first)
}
