//! Read-only collaborator seams the engine consumes.
//!
//! Persistence, the holiday table and the template store live outside the
//! engine. Every read can fail with a [`LookupError`]; whether that failure is
//! fatal is decided by the caller of the port, not the port.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::HolidayRecord;
use crate::conflict::ExistingShowtime;
use crate::error::LookupError;
use crate::format::Format;
use crate::template::{ScheduleTemplate, TemplateQuery};
use crate::{CinemaId, MovieId, RoomId};

pub type LookupResult<T> = std::result::Result<T, LookupError>;

pub trait HolidayLookup {
    /// Holiday records that may apply to `date`. Absence is an empty list.
    fn holidays_on(&self, date: NaiveDate) -> LookupResult<Vec<HolidayRecord>>;
}

/// A screening room and the formats its equipment supports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    /// The cinema the room belongs to; scopes the nearby-room gap.
    pub cinema_id: CinemaId,
    /// Formats the room's projection and seating can show.
    pub formats: Vec<Format>,
}

impl Room {
    pub fn supports(&self, format: &Format) -> bool {
        self.formats.contains(format)
    }
}

pub trait RoomCatalog {
    /// Rooms for the given ids. Ids the catalog does not know are left out.
    fn rooms(&self, ids: &[RoomId]) -> LookupResult<Vec<Room>>;
}

pub trait TemplateLookup {
    /// Templates that may match `query`, in any order.
    fn templates(&self, query: &TemplateQuery) -> LookupResult<Vec<ScheduleTemplate>>;
}

pub trait ShowtimeReader {
    /// Showtimes in `room` intersecting `[from, to)`, whatever their status.
    fn in_room(
        &self,
        room: RoomId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> LookupResult<Vec<ExistingShowtime>>;

    /// Showtimes of `movie` starting in `[from, to]`, in any room.
    fn for_movie(
        &self,
        movie: MovieId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> LookupResult<Vec<ExistingShowtime>>;
}

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
