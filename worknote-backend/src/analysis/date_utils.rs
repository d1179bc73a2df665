//! Date and time normalization for Korean date/time expressions.
//!
//! Every function takes an explicit reference instant so relative
//! expressions ("내일", "다음주 월요일") resolve deterministically.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use regex::Regex;
use std::sync::LazyLock;

/// Hour used when a time expression cannot be parsed
pub const DEFAULT_HOUR: u32 = 9;

const RELATIVE_KEYWORDS: [&str; 5] = ["오늘", "내일", "모레", "다음주", "다음달"];

static YEAR_MONTH_DAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4})년\s*(\d{1,2})월\s*(\d{1,2})일").unwrap());
static MONTH_DAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})월\s*(\d{1,2})일").unwrap());
static SLASH_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d{1,2})/(\d{1,2})\s*$").unwrap());
static ISO_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d{4})-(\d{1,2})-(\d{1,2})\s*$").unwrap());
static WEEK_DAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(다음주|이번주)\s*([월화수목금토일])요일").unwrap());

static PM_HOUR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"오후\s*(\d{1,2})시").unwrap());
static AM_HOUR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"오전\s*(\d{1,2})시").unwrap());
static HOUR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d{1,2})시").unwrap());
static MINUTE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d{1,2})분").unwrap());
static CLOCK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d{1,2}):(\d{2})").unwrap());

fn korean_weekday(c: &str) -> Option<Weekday> {
    match c {
        "월" => Some(Weekday::Mon),
        "화" => Some(Weekday::Tue),
        "수" => Some(Weekday::Wed),
        "목" => Some(Weekday::Thu),
        "금" => Some(Weekday::Fri),
        "토" => Some(Weekday::Sat),
        "일" => Some(Weekday::Sun),
        _ => None,
    }
}

fn monday_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

fn capture_u32(caps: &regex::Captures, idx: usize) -> Option<u32> {
    caps.get(idx)?.as_str().parse().ok()
}

/// Parse an absolute date ("2024년 1월 15일", "1월 15일", "1/15", "2024-01-15").
/// Month/day-only forms use the reference year.
fn parse_absolute_date(date_str: &str, reference: NaiveDate) -> Option<NaiveDate> {
    if let Some(caps) = YEAR_MONTH_DAY_RE.captures(date_str) {
        let year: i32 = caps.get(1)?.as_str().parse().ok()?;
        return NaiveDate::from_ymd_opt(year, capture_u32(&caps, 2)?, capture_u32(&caps, 3)?);
    }
    if let Some(caps) = MONTH_DAY_RE.captures(date_str) {
        return NaiveDate::from_ymd_opt(reference.year(), capture_u32(&caps, 1)?, capture_u32(&caps, 2)?);
    }
    if let Some(caps) = SLASH_DATE_RE.captures(date_str) {
        return NaiveDate::from_ymd_opt(reference.year(), capture_u32(&caps, 1)?, capture_u32(&caps, 2)?);
    }
    if let Some(caps) = ISO_DATE_RE.captures(date_str) {
        let year: i32 = caps.get(1)?.as_str().parse().ok()?;
        return NaiveDate::from_ymd_opt(year, capture_u32(&caps, 2)?, capture_u32(&caps, 3)?);
    }
    None
}

/// Parse a date expression. Relative expressions shift the reference;
/// absolute dates with a year resolve to midnight, month/day forms keep
/// the reference time. Anything unparseable yields the reference itself.
pub fn parse_date(date_str: &str, reference: NaiveDateTime) -> NaiveDateTime {
    if date_str.contains("다음주") {
        return reference + Duration::weeks(1);
    }
    if date_str.contains("내일") {
        return reference + Duration::days(1);
    }
    if date_str.contains("모레") {
        return reference + Duration::days(2);
    }
    if date_str.contains("오늘") {
        return reference;
    }
    if date_str.contains("다음달") {
        return reference + Duration::days(30);
    }

    let has_year = YEAR_MONTH_DAY_RE.is_match(date_str) || ISO_DATE_RE.is_match(date_str);
    match parse_absolute_date(date_str, reference.date()) {
        Some(date) if has_year => date.and_time(NaiveTime::MIN),
        Some(date) => date.and_time(reference.time()),
        None => reference,
    }
}

/// Parse a time expression onto the reference date.
/// 오후 adds 12 hours below noon, 오전 12시 is midnight; failures give 09:00.
pub fn parse_time(time_str: &str, reference: NaiveDateTime) -> NaiveDateTime {
    let fallback = reference
        .date()
        .and_hms_opt(DEFAULT_HOUR, 0, 0)
        .unwrap_or(reference);

    let is_afternoon = time_str.contains("오후");
    let is_morning = time_str.contains("오전");
    let clean = time_str.replace("오후", "").replace("오전", "");
    let clean = clean.trim();

    let parsed = if let Some(caps) = CLOCK_RE.captures(clean) {
        capture_u32(&caps, 1).zip(capture_u32(&caps, 2))
    } else if let Some(caps) = HOUR_RE.captures(clean) {
        let minute = MINUTE_RE
            .captures(clean)
            .and_then(|m| capture_u32(&m, 1))
            .unwrap_or(0);
        capture_u32(&caps, 1).map(|h| (h, minute))
    } else {
        None
    };

    let Some((mut hour, minute)) = parsed else {
        return fallback;
    };

    if is_afternoon && hour < 12 {
        hour += 12;
    } else if is_morning && hour == 12 {
        hour = 0;
    }

    reference.date().and_hms_opt(hour, minute, 0).unwrap_or(fallback)
}

/// Resolve the calendar day of an event from the first extracted date string.
pub fn resolve_event_date(dates: &[String], reference: NaiveDateTime) -> NaiveDate {
    let today = reference.date();
    let Some(date_str) = dates.first() else {
        return today;
    };

    if let Some(caps) = WEEK_DAY_RE.captures(date_str) {
        let weekday = caps.get(2).and_then(|m| korean_weekday(m.as_str()));
        if let Some(weekday) = weekday {
            let monday = monday_of_week(today);
            let monday = if &caps[1] == "다음주" {
                monday + Duration::weeks(1)
            } else {
                monday
            };
            return monday + Duration::days(weekday.num_days_from_monday() as i64);
        }
    }

    if date_str.contains("오늘") {
        today
    } else if date_str.contains("내일") {
        today + Duration::days(1)
    } else if date_str.contains("모레") {
        today + Duration::days(2)
    } else if date_str.contains("다음주") {
        monday_of_week(today) + Duration::weeks(1)
    } else if date_str.contains("다음달") {
        today + Duration::days(30)
    } else {
        parse_absolute_date(date_str, today).unwrap_or(today)
    }
}

/// Resolve (hour, minute) of an event from the first extracted time string.
/// A bare "N시" before 6 is read as afternoon. No times keeps the reference clock.
pub fn resolve_event_time(times: &[String], reference: NaiveDateTime) -> (u32, u32) {
    let Some(time_str) = times.first() else {
        return (reference.hour(), reference.minute());
    };

    let mut hour = reference.hour();
    let mut minute = 0;

    if let Some(h) = PM_HOUR_RE.captures(time_str).and_then(|c| capture_u32(&c, 1)) {
        hour = if h == 12 { h } else { h + 12 };
    } else if let Some(h) = AM_HOUR_RE.captures(time_str).and_then(|c| capture_u32(&c, 1)) {
        hour = if h == 12 { 0 } else { h };
    } else if let Some(h) = HOUR_RE.captures(time_str).and_then(|c| capture_u32(&c, 1)) {
        hour = if h < 6 { h + 12 } else { h };
    } else if let Some(caps) = CLOCK_RE.captures(time_str) {
        if let (Some(h), Some(m)) = (capture_u32(&caps, 1), capture_u32(&caps, 2)) {
            hour = if time_str.contains("오후") && h < 12 { h + 12 } else { h };
            minute = m;
        }
    }

    if let Some(m) = MINUTE_RE.captures(time_str).and_then(|c| capture_u32(&c, 1)) {
        minute = m;
    }

    if hour > 23 || minute > 59 {
        return (DEFAULT_HOUR, 0);
    }
    (hour, minute)
}

/// "2024년 1월 15일"
pub fn format_date_for_display(dt: &NaiveDateTime) -> String {
    dt.format("%Y년 %-m월 %-d일").to_string()
}

/// "14:30"
pub fn format_time_for_display(dt: &NaiveDateTime) -> String {
    dt.format("%H:%M").to_string()
}

pub fn is_relative_date(date_str: &str) -> bool {
    RELATIVE_KEYWORDS.iter().any(|kw| date_str.contains(kw))
}

/// Date range from two expressions; the end defaults to one week after the start.
pub fn get_date_range(
    start_date: &str,
    end_date: Option<&str>,
    reference: NaiveDateTime,
) -> (NaiveDateTime, NaiveDateTime) {
    let start = parse_date(start_date, reference);
    let end = match end_date {
        Some(end) => parse_date(end, reference),
        None => start + Duration::days(7),
    };
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Wednesday
    fn reference() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 6)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_relative_dates() {
        let r = reference();
        assert_eq!(parse_date("오늘", r), r);
        assert_eq!(parse_date("내일", r), r + Duration::days(1));
        assert_eq!(parse_date("모레", r), r + Duration::days(2));
        assert_eq!(parse_date("다음주", r), r + Duration::weeks(1));
        assert_eq!(parse_date("다음달", r), r + Duration::days(30));
    }

    #[test]
    fn test_parse_absolute_dates() {
        let r = reference();
        assert_eq!(parse_date("2024년 1월 15일", r), date(2024, 1, 15).and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(parse_date("12월 25일", r).date(), date(2024, 12, 25));
        assert_eq!(parse_date("12월 25일", r).time(), r.time());
        assert_eq!(parse_date("1/15", r).date(), date(2024, 1, 15));
        assert_eq!(parse_date("2023-11-02", r).date(), date(2023, 11, 2));
    }

    #[test]
    fn test_parse_date_falls_back_to_reference() {
        let r = reference();
        assert_eq!(parse_date("언젠가", r), r);
        assert_eq!(parse_date("13/45", r), r);
        assert_eq!(parse_date("2월 30일", r), r);
    }

    #[test]
    fn test_parse_time() {
        let r = reference();
        assert_eq!(parse_time("오후 2시", r).hour(), 14);
        assert_eq!(parse_time("오전 12시", r).hour(), 0);
        assert_eq!(parse_time("오후 12시", r).hour(), 12);
        let t = parse_time("14:30", r);
        assert_eq!((t.hour(), t.minute()), (14, 30));
        let t = parse_time("오후 3시 15분", r);
        assert_eq!((t.hour(), t.minute()), (15, 15));
        let t = parse_time("오후 4:45", r);
        assert_eq!((t.hour(), t.minute()), (16, 45));
        assert_eq!(parse_time("점심", r).hour(), DEFAULT_HOUR);
        assert_eq!(parse_time("25:00", r).hour(), DEFAULT_HOUR);
    }

    #[test]
    fn test_resolve_event_date() {
        let r = reference();
        let d = |s: &str| resolve_event_date(&[s.to_string()], r);
        assert_eq!(resolve_event_date(&[], r), date(2024, 3, 6));
        assert_eq!(d("내일"), date(2024, 3, 7));
        assert_eq!(d("모레"), date(2024, 3, 8));
        assert_eq!(d("다음주"), date(2024, 3, 11));
        assert_eq!(d("다음주 월요일"), date(2024, 3, 11));
        assert_eq!(d("다음주 금요일"), date(2024, 3, 15));
        assert_eq!(d("이번주 금요일"), date(2024, 3, 8));
        assert_eq!(d("3월 20일"), date(2024, 3, 20));
        assert_eq!(d("아무때나"), date(2024, 3, 6));
    }

    #[test]
    fn test_resolve_event_time() {
        let r = reference();
        let t = |s: &str| resolve_event_time(&[s.to_string()], r);
        assert_eq!(resolve_event_time(&[], r), (10, 30));
        assert_eq!(t("오후 4시"), (16, 0));
        assert_eq!(t("오후 12시"), (12, 0));
        assert_eq!(t("오전 12시"), (0, 0));
        assert_eq!(t("오전 9시"), (9, 0));
        assert_eq!(t("3시"), (15, 0));
        assert_eq!(t("10시 30분"), (10, 30));
        assert_eq!(t("14:30"), (14, 30));
        assert_eq!(t("오후"), (10, 0));
        assert_eq!(t("오후 13시"), (DEFAULT_HOUR, 0));
    }

    #[test]
    fn test_display_formats_and_helpers() {
        let r = reference();
        assert_eq!(format_date_for_display(&r), "2024년 3월 6일");
        assert_eq!(format_time_for_display(&r), "10:30");
        assert!(is_relative_date("다음주 월요일"));
        assert!(!is_relative_date("2024년 1월 15일"));

        let (start, end) = get_date_range("내일", None, r);
        assert_eq!(end - start, Duration::days(7));
        let (start, end) = get_date_range("1/10", Some("1/20"), r);
        assert_eq!(start.date(), date(2024, 1, 10));
        assert_eq!(end.date(), date(2024, 1, 20));
    }
}
