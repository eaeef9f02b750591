//! Minute-of-day time ranges and interval arithmetic.
//!
//! Slot labels look like `HH:MM-HH:MM`. Documents produced upstream mix
//! ASCII hyphens with en- and em-dashes, so the separator is normalized
//! before splitting. All arithmetic is integer minutes since midnight.

use serde::{Deserialize, Serialize};

/// Minutes in a day; all range endpoints are below this.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Half-open interval `[start, end)` in minutes since midnight.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TimeRange {
    pub start: u32,
    pub end: u32,
}

impl TimeRange {
    /// Create a range, rejecting empty, inverted, or out-of-day intervals.
    pub fn new(start: u32, end: u32) -> Option<Self> {
        if start < end && end < MINUTES_PER_DAY {
            Some(Self { start, end })
        } else {
            None
        }
    }

    /// Covered minutes.
    pub fn minutes(&self) -> u32 {
        self.end - self.start
    }

    /// True if this range lies entirely inside `outer`.
    pub fn within(&self, outer: &TimeRange) -> bool {
        self.start >= outer.start && self.end <= outer.end
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", format_minutes(self.start), format_minutes(self.end))
    }
}

/// Format minutes since midnight as `HH:MM`.
pub fn format_minutes(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

fn parse_hhmm(text: &str) -> Option<u32> {
    let (hours, minutes) = text.trim().split_once(':')?;
    let hours: u32 = hours.trim().parse().ok()?;
    let minutes: u32 = minutes.trim().parse().ok()?;
    if hours < 24 && minutes < 60 {
        Some(hours * 60 + minutes)
    } else {
        None
    }
}

/// Parse a slot label of the form `HH:MM-HH:MM`.
///
/// En-dash, em-dash and minus-sign separators are normalized to an ASCII
/// hyphen first. Returns `None` for labels that do not parse or where the
/// end does not come after the start.
pub fn parse_range(label: &str) -> Option<TimeRange> {
    let normalized: String = label
        .chars()
        .map(|c| match c {
            '\u{2013}' | '\u{2014}' | '\u{2212}' => '-',
            other => other,
        })
        .collect();
    let (start_text, end_text) = normalized.split_once('-')?;
    let start = parse_hhmm(start_text)?;
    let end = parse_hhmm(end_text)?;
    TimeRange::new(start, end)
}

/// Total minutes covered by the union of `ranges`.
///
/// Sorts by start and coalesces overlapping or adjacent intervals so that
/// double-booked entries for the same staff/day are not counted twice.
pub fn merge_minutes(ranges: &[TimeRange]) -> u32 {
    if ranges.is_empty() {
        return 0;
    }
    let mut sorted = ranges.to_vec();
    sorted.sort();

    let mut total = 0;
    let mut current = sorted[0];
    for range in &sorted[1..] {
        if range.start <= current.end {
            current.end = current.end.max(range.end);
        } else {
            total += current.minutes();
            current = *range;
        }
    }
    total + current.minutes()
}
