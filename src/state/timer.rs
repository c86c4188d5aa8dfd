//! Elapsed-time computation from match timestamps.
//!
//! Duration is always derived from the `matchStartTime`/`matchEndTime` pair
//! rather than an accumulated tick counter, so clients that were suspended
//! catch up correctly on resume. A 1 Hz redraw merely re-evaluates
//! [`elapsed_seconds`]; it never mutates the timestamps.

use time::OffsetDateTime;

/// Whole seconds elapsed between `start` and `end`, falling back to `now`
/// while the match is still running. Returns 0 when the match has not
/// started, and clamps negative spans (clock skew) to 0.
pub fn elapsed_seconds(
    start: Option<OffsetDateTime>,
    end: Option<OffsetDateTime>,
    now: OffsetDateTime,
) -> u64 {
    let Some(start) = start else {
        return 0;
    };
    let span = end.unwrap_or(now) - start;
    span.whole_seconds().max(0) as u64
}

/// Render a duration as `MM:SS`, switching to `HH:MM:SS` once a full hour
/// has elapsed.
pub fn format_clock(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}
