//! Engine configuration, loadable from JSON with every field defaulted.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::calendar::DEFAULT_EARLY_ACCESS_DAYS;
use crate::conflict::DEFAULT_MIN_INTER_ROOM_GAP_MINUTES;
use crate::dst::DstPolicy;
use crate::error::{Result, ScheduleError};
use crate::pricing::PricingRules;

pub const DEFAULT_TIMEZONE: &str = "Asia/Ho_Chi_Minh";
pub const DEFAULT_NEARBY_GAP_MINUTES: i64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// IANA zone slot labels and pricing hours are read in.
    pub timezone: String,
    pub min_inter_room_gap_minutes: i64,
    /// Used when a request does not carry its own nearby-room gap.
    pub default_nearby_gap_minutes: i64,
    pub early_access_days: i64,
    pub dst_policy: DstPolicy,
    pub pricing: PricingRules,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_string(),
            min_inter_room_gap_minutes: DEFAULT_MIN_INTER_ROOM_GAP_MINUTES,
            default_nearby_gap_minutes: DEFAULT_NEARBY_GAP_MINUTES,
            early_access_days: DEFAULT_EARLY_ACCESS_DAYS,
            dst_policy: DstPolicy::default(),
            pricing: PricingRules::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.tz()?;
        Ok(config)
    }

    /// The configured timezone.
    ///
    /// # Errors
    /// Returns `ScheduleError::InvalidTimezone` if it is not a valid IANA name.
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse()
            .map_err(|_| ScheduleError::InvalidTimezone(self.timezone.clone()))
    }
}
