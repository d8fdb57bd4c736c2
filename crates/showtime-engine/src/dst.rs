//! DST transition policies for slot labels.

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Policy for slot labels that fall into a DST gap.
///
/// Ambiguous local times (clocks falling back) always resolve to the earlier
/// instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DstPolicy {
    /// Drop the slot (e.g., 02:30 during spring forward)
    Skip,
    /// Move the slot to the first valid quarter hour after the gap
    #[default]
    ShiftForward,
}

/// Resolve a local wall-clock time in `tz` to a UTC instant.
pub fn resolve_local(tz: Tz, local: NaiveDateTime, policy: DstPolicy) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => match policy {
            DstPolicy::Skip => None,
            // Searches up to one hour past the requested time.
            DstPolicy::ShiftForward => (1..=4)
                .map(|quarters| local + Duration::minutes(15 * quarters))
                .find_map(|shifted| tz.from_local_datetime(&shifted).earliest())
                .map(|dt| dt.with_timezone(&Utc)),
        },
    }
}
