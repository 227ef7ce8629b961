//! Display helpers in Vietnamese conventions.

use crate::types::{Amount, TimestampMs};
use chrono::{DateTime, TimeZone, Utc};

/// Digits grouped by threes with `.`: 50000 -> "50.000".
pub fn format_amount(amount: Amount) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if amount < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// Amount with the dong sign: 50000 -> "50.000đ".
pub fn format_vnd(amount: Amount) -> String {
    format!("{}đ", format_amount(amount))
}

/// `HH:MM:SS` in the given zone. None if the timestamp is out of range.
pub fn format_time_of_day<Tz: TimeZone>(ts: TimestampMs, tz: &Tz) -> Option<String>
where
    Tz::Offset: std::fmt::Display,
{
    let utc = DateTime::<Utc>::from_timestamp_millis(ts)?;
    Some(utc.with_timezone(tz).format("%H:%M:%S").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn groups_thousands() {
        assert_eq!(format_amount(0), "0");
        assert_eq!(format_amount(999), "999");
        assert_eq!(format_amount(1000), "1.000");
        assert_eq!(format_amount(50_000), "50.000");
        assert_eq!(format_amount(1_234_567), "1.234.567");
        assert_eq!(format_amount(-20_000), "-20.000");
        assert_eq!(format_amount(i64::MIN), "-9.223.372.036.854.775.808");
    }

    #[test]
    fn appends_dong_sign() {
        assert_eq!(format_vnd(30_000), "30.000đ");
    }

    #[test]
    fn time_of_day_respects_zone() {
        // 2025-01-29T01:02:03Z
        let ts = 1_738_112_523_000;
        assert_eq!(format_time_of_day(ts, &Utc).as_deref(), Some("01:02:03"));

        let hanoi = FixedOffset::east_opt(7 * 3600).unwrap();
        assert_eq!(format_time_of_day(ts, &hanoi).as_deref(), Some("08:02:03"));
    }
}
