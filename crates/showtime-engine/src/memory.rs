//! In-memory implementation of every collaborator port.
//!
//! Used by tests and by the CLI, which loads it from a JSON "world" document.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::HolidayRecord;
use crate::conflict::{ExistingShowtime, ShowtimeCandidate, ShowtimeStatus};
use crate::error::{Result, ScheduleError};
use crate::ports::{
    HolidayLookup, LookupResult, Room, RoomCatalog, ShowtimeReader, TemplateLookup,
};
use crate::template::{ScheduleTemplate, TemplateQuery};
use crate::{MovieId, RoomId};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InMemoryStore {
    pub holidays: Vec<HolidayRecord>,
    pub rooms: Vec<Room>,
    pub templates: Vec<ScheduleTemplate>,
    pub showtimes: Vec<ExistingShowtime>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Persist accepted candidates as available showtimes, assigning fresh ids.
    ///
    /// # Errors
    /// Returns `ScheduleError::UnknownRoom` if a candidate's room is not in the
    /// store; nothing is written in that case.
    pub fn commit(&mut self, candidates: &[ShowtimeCandidate]) -> Result<Vec<u64>> {
        let rows = candidates
            .iter()
            .map(|c| {
                self.room(c.room_id)
                    .map(|room| c.as_existing(room.cinema_id))
                    .ok_or(ScheduleError::UnknownRoom(c.room_id))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut next_id = self.showtimes.iter().map(|s| s.id).max().unwrap_or(0);
        let mut ids = Vec::with_capacity(rows.len());
        for mut row in rows {
            next_id += 1;
            row.id = next_id;
            ids.push(next_id);
            self.showtimes.push(row);
        }

        tracing::info!(count = ids.len(), "committed showtimes");
        Ok(ids)
    }

    /// Mark showtimes that ended before `now` as expired. Rows are kept.
    pub fn expire_before(&mut self, now: DateTime<Utc>) -> usize {
        let mut expired = 0;
        for s in self
            .showtimes
            .iter_mut()
            .filter(|s| s.status == ShowtimeStatus::Available && s.end <= now)
        {
            s.status = ShowtimeStatus::Expired;
            expired += 1;
        }
        expired
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }
}

impl HolidayLookup for InMemoryStore {
    fn holidays_on(&self, date: NaiveDate) -> LookupResult<Vec<HolidayRecord>> {
        Ok(self
            .holidays
            .iter()
            .filter(|h| h.falls_on(date))
            .cloned()
            .collect())
    }
}

impl RoomCatalog for InMemoryStore {
    fn rooms(&self, ids: &[RoomId]) -> LookupResult<Vec<Room>> {
        Ok(ids.iter().filter_map(|&id| self.room(id)).cloned().collect())
    }
}

impl TemplateLookup for InMemoryStore {
    fn templates(&self, query: &TemplateQuery) -> LookupResult<Vec<ScheduleTemplate>> {
        Ok(self
            .templates
            .iter()
            .filter(|t| t.matches(query))
            .cloned()
            .collect())
    }
}

impl ShowtimeReader for InMemoryStore {
    fn in_room(
        &self,
        room: RoomId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> LookupResult<Vec<ExistingShowtime>> {
        Ok(self
            .showtimes
            .iter()
            .filter(|s| s.room_id == room && s.start < to && s.end > from)
            .cloned()
            .collect())
    }

    fn for_movie(
        &self,
        movie: MovieId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> LookupResult<Vec<ExistingShowtime>> {
        Ok(self
            .showtimes
            .iter()
            .filter(|s| s.movie_id == movie && s.start >= from && s.start <= to)
            .cloned()
            .collect())
    }
}
