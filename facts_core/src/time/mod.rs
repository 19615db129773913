pub mod ticker;

use facts_schema::Millis;

/// Countdown cadence for timed runs.
pub const CLASSIC_TICK_MS: Millis = 1000;
/// Stopwatch cadence for the sprint display.
pub const SPRINT_TICK_MS: Millis = 100;
