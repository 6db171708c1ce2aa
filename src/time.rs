/// Returned by `fmt_time` for inputs that cannot be a duration.
pub const INVALID_TIME: &str = "Invalid Time";

/// Parse a race time like `58:31.537` or `1:02:58.537` into milliseconds.
///
/// The accepted grammar is `[H+:]MM:SS.mmm`: an optional hour group of
/// one or more digits, minutes with one or two digits, seconds with
/// exactly two digits, and exactly three fractional digits. Inputs
/// without an hour group are the common case; the hour group has no
/// digit limit so that very long efforts still parse.
///
/// Returns `None` for anything that does not match the grammar.
pub fn try_parse_time(text: &str) -> Option<u64> {
    let mut parts = text.splitn(2, '.');
    let clock = parts.next()?;
    let millis = parts.next()?;
    if millis.len() != 3 {
        return None;
    }
    let millis = parse_digits(millis)?;

    let groups: Vec<&str> = clock.split(':').collect();
    let (hours, minutes, seconds) = match groups.as_slice() {
        [m, s] => (0, digit_group(m, 1, 2)?, digit_group(s, 2, 2)?),
        [h, m, s] => (
            parse_digits(h)?,
            digit_group(m, 1, 2)?,
            digit_group(s, 2, 2)?,
        ),
        _ => return None,
    };

    let secs = hours
        .checked_mul(3600)?
        .checked_add(minutes * 60 + seconds)?;
    secs.checked_mul(1000)?.checked_add(millis)
}

/// Like `try_parse_time`, but with the sentinel behavior every caller
/// that only displays times wants: malformed input logs a warning and
/// yields 0. Callers ranking by time must not treat that 0 as a valid
/// zero duration; they should use `try_parse_time` instead.
pub fn parse_time(text: &str) -> u64 {
    match try_parse_time(text) {
        Some(millis) => millis,
        None => {
            log::warn!("invalid duration format: {}", text);
            0
        }
    }
}

/// Turn milliseconds into a readable race time, f.e. `58:31.537` for
/// `3511537`. The hour group is omitted when there is none, and the
/// leading component carries no zero-padding (`1:02:58.537`, never
/// `01:02:58.537`), matching the upstream display convention.
///
/// Negative input yields `INVALID_TIME`.
pub fn fmt_time(millis: i64) -> String {
    if millis < 0 {
        return INVALID_TIME.to_string();
    }
    let hours = millis / 3_600_000;
    let minutes = (millis % 3_600_000) / 60_000;
    let seconds = (millis % 60_000) / 1000;
    let millis = millis % 1000;

    if hours > 0 {
        format!("{}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
    } else {
        format!("{}:{:02}.{:03}", minutes, seconds, millis)
    }
}

fn parse_digits(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn digit_group(s: &str, min_len: usize, max_len: usize) -> Option<u64> {
    if s.len() < min_len || s.len() > max_len {
        return None;
    }
    parse_digits(s)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_without_hours() {
        assert_eq!(Some(3_511_537), try_parse_time("58:31.537"));
        assert_eq!(Some(59_999), try_parse_time("0:59.999"));
        assert_eq!(Some(60_000), try_parse_time("1:00.000"));
    }

    #[test]
    fn test_parse_with_hours() {
        assert_eq!(Some(3_778_537), try_parse_time("1:02:58.537"));
        assert_eq!(Some(36_000_000), try_parse_time("10:00:00.000"));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(None, try_parse_time("invalid"));
        assert_eq!(None, try_parse_time(""));
        assert_eq!(None, try_parse_time("N/A"));
        assert_eq!(None, try_parse_time("99:99:99")); // no fractional digits
        assert_eq!(None, try_parse_time("0:5.123")); // seconds need two digits
        assert_eq!(None, try_parse_time("1:02:58.53")); // millis need three
        assert_eq!(None, try_parse_time("1:02:58.5370"));
        assert_eq!(None, try_parse_time("1:2:3:4.000"));
        assert_eq!(None, try_parse_time("-1:00.000"));
    }

    #[test]
    fn test_parse_sentinel() {
        assert_eq!(0, parse_time("invalid"));
        assert_eq!(3_511_537, parse_time("58:31.537"));
    }

    #[test]
    fn test_fmt() {
        assert_eq!("58:31.537", fmt_time(3_511_537));
        assert_eq!("1:02:58.537", fmt_time(3_778_537));
        assert_eq!("0:00.000", fmt_time(0));
        assert_eq!("0:00.005", fmt_time(5));
        assert_eq!("59:59.999", fmt_time(3_599_999));
        assert_eq!("1:00:00.000", fmt_time(3_600_000));
    }

    #[test]
    fn test_fmt_rejects_negative() {
        assert_eq!(INVALID_TIME, fmt_time(-5));
    }

    #[test]
    fn test_round_trip() {
        for millis in &[0, 1, 999, 59_999, 60_000, 3_511_537, 3_599_999, 3_600_000, 3_778_537, 86_400_000] {
            let text = fmt_time(*millis);
            assert_eq!(
                Some(*millis as u64),
                try_parse_time(&text),
                "round trip failed for {}",
                text
            );
        }
    }
}
