//! Dynamic ticket pricing.

use chrono::{DateTime, NaiveDate, Timelike};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::calendar;
use crate::format::Format;

/// Surcharge table in VND. Amounts are added, never multiplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingRules {
    pub base: i64,
    pub imax: i64,
    pub four_dx: i64,
    pub three_d: i64,
    /// Start hours `[peak_start_hour, peak_end_hour)` in local time.
    pub peak_start_hour: u32,
    pub peak_end_hour: u32,
    pub peak: i64,
    /// Added on top of `peak` for Vietnamese movies.
    pub peak_vietnamese: i64,
    /// Saturday and Sunday.
    pub weekend: i64,
}

impl Default for PricingRules {
    fn default() -> Self {
        Self {
            base: 50_000,
            imax: 20_000,
            four_dx: 10_000,
            three_d: 5_000,
            peak_start_hour: 18,
            peak_end_hour: 22,
            peak: 10_000,
            peak_vietnamese: 10_000,
            weekend: 20_000,
        }
    }
}

impl PricingRules {
    pub fn format_surcharge(&self, format: &Format) -> i64 {
        match format {
            Format::Imax => self.imax,
            Format::FourDx => self.four_dx,
            Format::ThreeD => self.three_d,
            Format::TwoD | Format::Other(_) => 0,
        }
    }

    pub fn price(
        &self,
        start: DateTime<Tz>,
        format: &Format,
        date: NaiveDate,
        is_vietnamese: bool,
    ) -> i64 {
        let mut amount = self.base + self.format_surcharge(format);

        if (self.peak_start_hour..self.peak_end_hour).contains(&start.hour()) {
            amount += self.peak;
            if is_vietnamese {
                amount += self.peak_vietnamese;
            }
        }
        if calendar::is_weekend(date) {
            amount += self.weekend;
        }

        amount
    }
}

/// Price with the default surcharge table.
pub fn price(start: DateTime<Tz>, format: &Format, date: NaiveDate, is_vietnamese: bool) -> i64 {
    PricingRules::default().price(start, format, date, is_vietnamese)
}
