use std::fmt::Write as _;
use std::time::Duration;

const NANOS_PER_MILLI: u128 = 1_000_000;

/// Returns the line prefix for the given nesting depth.
pub(crate) fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

/// Rounds a duration to the nearest millisecond, halfway values rounding up.
pub fn round_to_millis(duration: Duration) -> Duration {
    let millis = (duration.as_nanos() + NANOS_PER_MILLI / 2) / NANOS_PER_MILLI;
    Duration::from_millis(u64::try_from(millis).unwrap_or(u64::MAX))
}

/// Renders a duration in short text form, rounded to milliseconds.
///
/// ```rust
/// use std::time::Duration;
/// use timed_task::format_duration;
///
/// assert_eq!(format_duration(Duration::ZERO), "0s");
/// assert_eq!(format_duration(Duration::from_millis(150)), "150ms");
/// assert_eq!(format_duration(Duration::from_millis(61_500)), "1m1.5s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let millis = round_to_millis(duration).as_millis();
    if millis == 0 {
        return "0s".to_string();
    }
    if millis < 1000 {
        return format!("{millis}ms");
    }

    let hours = millis / 3_600_000;
    let minutes = millis / 60_000 % 60;
    let seconds = millis / 1000 % 60;
    let fraction = millis % 1000;

    let mut out = String::new();
    if hours > 0 {
        let _ = write!(out, "{hours}h");
    }
    if hours > 0 || minutes > 0 {
        let _ = write!(out, "{minutes}m");
    }
    let _ = write!(out, "{seconds}");
    if fraction > 0 {
        let digits = format!("{fraction:03}");
        let _ = write!(out, ".{}", digits.trim_end_matches('0'));
    }
    out.push('s');
    out
}

/// Composes a note from an optional label. Returns `None` for empty notes.
pub(crate) fn compose_note(label: Option<&str>, note: &str) -> Option<String> {
    if note.is_empty() {
        return None;
    }
    match label {
        Some(label) if !label.is_empty() => Some(format!("{label}: {note}")),
        _ => Some(note.to_string()),
    }
}

/// Builds the parenthetical shown on completion lines: duration first, then
/// each note in insertion order.
pub(crate) fn suffix(duration: Duration, notes: &[String]) -> String {
    let mut out = format!("({}", format_duration(duration));
    for note in notes {
        out.push_str(", ");
        out.push_str(note);
    }
    out.push(')');
    out
}
