//! Error types for showtime-engine operations.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use thiserror::Error;

use crate::RoomId;

/// A collaborator (holiday table, template store, room catalog, showtime store)
/// could not answer a read.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{collaborator} lookup failed: {message}")]
pub struct LookupError {
    pub collaborator: &'static str,
    pub message: String,
}

impl LookupError {
    pub fn new(collaborator: &'static str, message: impl Into<String>) -> Self {
        Self {
            collaborator,
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Invalid slot label: {0:?} (expected HH:MM)")]
    InvalidSlotLabel(String),

    /// Building a staggered start time requires the room's position in the
    /// room order; a missing room would otherwise collide with the first room.
    #[error("Room {room_id} is not part of the room order")]
    RoomNotInOrder { room_id: RoomId },

    #[error("Invalid movie duration: {0} minutes")]
    InvalidDuration(i64),

    #[error("Showtime must end after it starts: {start} .. {end}")]
    InvalidInterval {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Unknown room: {0}")]
    UnknownRoom(RoomId),

    #[error("Local time {0} does not exist in the configured timezone")]
    NonexistentLocalTime(NaiveDateTime),

    #[error("Lunar conversion supports years 1900-2100, got {0}")]
    LunarOutOfRange(i32),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
