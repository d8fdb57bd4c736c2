//! # showtime-engine
//!
//! Decides when and where a movie screens across a cinema's rooms, and what a
//! ticket for each screening costs.
//!
//! Calendar semantics that matter to a Vietnamese cinema (weekday buckets,
//! solar holidays, Tết via a Gregorian → lunar conversion, early-access
//! windows) are computed on demand. Showtime proposals are staggered across
//! rooms per format and rejected when they overlap or crowd another room
//! showing the same movie.
//!
//! ## Modules
//!
//! - [`lunar`] — Gregorian date → lunar date (1900–2100)
//! - [`calendar`] — date → [`CalendarDay`] attributes and tags
//! - [`format`] — per-format policies and slot-label filtering
//! - [`template`] — priority-based schedule template selection
//! - [`slot`] — staggered start times per room
//! - [`dst`] — DST gap handling for slot labels
//! - [`conflict`] — room overlap and same-movie gap rules
//! - [`pricing`] — dynamic ticket pricing
//! - [`scheduler`] — the batch generation workflow tying the above together
//! - [`ports`] — collaborator traits; [`memory`] implements them in memory
//! - [`config`] — engine configuration
//! - [`error`] — Error types

pub mod calendar;
pub mod config;
pub mod conflict;
pub mod dst;
pub mod error;
pub mod format;
pub mod lunar;
pub mod memory;
pub mod ports;
pub mod pricing;
pub mod scheduler;
pub mod slot;
pub mod template;

pub type RoomId = u64;
pub type CinemaId = u64;
pub type MovieId = u64;

pub use calendar::{early_access, CalendarDay, DayClassifier, HolidayKind, HolidayRecord};
pub use config::EngineConfig;
pub use conflict::{
    has_inter_room_gap, has_inter_room_gap_around, has_nearby_room_gap, has_room_overlap,
    ConflictChecker, ConflictVerdict, ExistingShowtime, ShowtimeCandidate, ShowtimeStatus,
};
pub use error::{LookupError, ScheduleError};
pub use format::{filter_slots_by_format_and_time, Format, FormatPolicy};
pub use lunar::{to_lunar, LunarDate, LunarTable};
pub use memory::InMemoryStore;
pub use pricing::{price, PricingRules};
pub use scheduler::{ScheduleOutcome, ScheduleRequest, Scheduler};
pub use slot::{build_start_time, SlotBuilder};
pub use template::{apply_template, max_per_day, select_template, MovieMeta, ScheduleTemplate};
