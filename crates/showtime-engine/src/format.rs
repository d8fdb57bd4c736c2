//! Projection formats and their scheduling policies.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// A projection format. Unknown names are kept verbatim and scheduled under the
/// default (2D-like) policy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Format {
    TwoD,
    ThreeD,
    FourDx,
    Imax,
    Other(String),
}

impl Format {
    pub fn name(&self) -> &str {
        match self {
            Format::TwoD => "2D",
            Format::ThreeD => "3D",
            Format::FourDx => "4DX",
            Format::Imax => "IMAX",
            Format::Other(name) => name,
        }
    }

    /// Minutes between consecutive rooms showing the same slot.
    pub fn inter_room_offset_minutes(&self) -> i64 {
        FormatPolicy::for_format(self).inter_room_offset_minutes
    }
}

impl FromStr for Format {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_uppercase().as_str() {
            "2D" => Format::TwoD,
            "3D" => Format::ThreeD,
            "4DX" => Format::FourDx,
            "IMAX" => Format::Imax,
            _ => Format::Other(s.trim().to_string()),
        })
    }
}

impl From<String> for Format {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(format) => format,
            Err(never) => match never {},
        }
    }
}

impl From<Format> for String {
    fn from(f: Format) -> Self {
        f.name().to_string()
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-format rules: daily cap, allowed start hours, and room stagger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatPolicy {
    pub format_name: &'static str,
    pub max_screenings_per_day: u32,
    /// First allowed start hour (inclusive).
    pub start_hour: u32,
    /// Last allowed start hour (exclusive).
    pub end_hour: u32,
    pub inter_room_offset_minutes: i64,
    /// The screening must also finish before midnight.
    pub must_end_same_day: bool,
}

const POLICIES: [FormatPolicy; 4] = [
    FormatPolicy {
        format_name: "2D",
        max_screenings_per_day: 8,
        start_hour: 0,
        end_hour: 24,
        inter_room_offset_minutes: 15,
        must_end_same_day: false,
    },
    FormatPolicy {
        format_name: "3D",
        max_screenings_per_day: 4,
        start_hour: 12,
        end_hour: 21,
        inter_room_offset_minutes: 15,
        must_end_same_day: false,
    },
    FormatPolicy {
        format_name: "4DX",
        max_screenings_per_day: 3,
        start_hour: 14,
        end_hour: 24,
        inter_room_offset_minutes: 20,
        must_end_same_day: false,
    },
    FormatPolicy {
        format_name: "IMAX",
        max_screenings_per_day: 3,
        start_hour: 18,
        end_hour: 24,
        inter_room_offset_minutes: 20,
        must_end_same_day: true,
    },
];

impl FormatPolicy {
    pub fn default_policy() -> Self {
        POLICIES[0]
    }

    pub fn for_format(format: &Format) -> Self {
        POLICIES
            .iter()
            .find(|p| p.format_name == format.name())
            .copied()
            .unwrap_or_else(Self::default_policy)
    }

    /// Whether a screening of `duration_minutes` may start at `start`.
    pub fn allows(&self, start: NaiveTime, duration_minutes: i64) -> bool {
        let hour = start.hour();
        if hour < self.start_hour || hour >= self.end_hour {
            return false;
        }
        if self.must_end_same_day {
            let start_minutes = i64::from(start.num_seconds_from_midnight() / 60);
            return start_minutes.saturating_add(duration_minutes) < 24 * 60;
        }
        true
    }
}

/// Parse an `"HH:MM"` slot label.
pub fn parse_slot_label(label: &str) -> Option<NaiveTime> {
    let (h, m) = label.trim().split_once(':')?;
    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if h.is_empty() || h.len() > 2 || m.len() != 2 || !digits(h) || !digits(m) {
        return None;
    }
    let hour: u32 = h.parse().ok()?;
    let minute: u32 = m.parse().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Labels that survived format filtering, plus the ones that could not be parsed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredSlots {
    pub allowed: Vec<(String, NaiveTime)>,
    pub malformed: Vec<String>,
}

/// Keep the slot labels a format may start at, in their original order.
///
/// `duration_minutes` only matters for formats that must end the same day.
///
/// Malformed labels are reported rather than failing the batch.
pub fn filter_slots_by_format_and_time(
    labels: &[String],
    format: &Format,
    duration_minutes: i64,
) -> FilteredSlots {
    let policy = FormatPolicy::for_format(format);
    let mut out = FilteredSlots::default();

    for label in labels {
        match parse_slot_label(label) {
            Some(time) if policy.allows(time, duration_minutes) => {
                out.allowed.push((label.clone(), time));
            }
            Some(_) => {}
            None => {
                tracing::debug!(label = %label, "skipping malformed slot label");
                out.malformed.push(label.clone());
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_format_uses_default_policy() {
        let policy = FormatPolicy::for_format(&Format::Other("ScreenX".into()));
        assert_eq!(policy, FormatPolicy::default_policy());
        assert_eq!(policy.max_screenings_per_day, 8);
        assert_eq!(policy.inter_room_offset_minutes, 15);
    }

    #[test]
    fn format_names_parse_case_insensitively() {
        assert_eq!("imax".parse::<Format>().unwrap(), Format::Imax);
        assert_eq!("4dx".parse::<Format>().unwrap(), Format::FourDx);
        assert_eq!(
            "Dolby".parse::<Format>().unwrap(),
            Format::Other("Dolby".into())
        );
    }

    #[test]
    fn slot_label_parsing() {
        assert_eq!(parse_slot_label("09:30"), NaiveTime::from_hms_opt(9, 30, 0));
        assert_eq!(parse_slot_label("9:05"), NaiveTime::from_hms_opt(9, 5, 0));
        assert_eq!(parse_slot_label("24:00"), None);
        assert_eq!(parse_slot_label("12:7"), None);
        assert_eq!(parse_slot_label("noon"), None);
        assert_eq!(parse_slot_label(""), None);
    }

    #[test]
    fn slot_label_rejects_signs() {
        assert_eq!(parse_slot_label("+9:30"), None);
        assert_eq!(parse_slot_label("09:+5"), None);
        assert_eq!(parse_slot_label("-1:00"), None);
    }
}
