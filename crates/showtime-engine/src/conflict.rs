//! Conflict checks for a proposed showtime against existing ones.
//!
//! Three independent rules, all of which must pass:
//!
//! - **Room overlap**: the room is occupied during `[start, end)`. Adjacent
//!   showtimes (one ends exactly when the other starts) do not overlap.
//! - **Inter-room gap**: the same movie started in another room less than the
//!   minimum gap before the candidate. Against proposals of the same batch the
//!   gap applies in both directions.
//! - **Nearby-room gap**: the same movie starts in another room of the same
//!   cinema within the caller's gap, before or after the candidate.
//!
//! Cancelled showtimes never block. Expired ones still do: expiry changes a
//! row's status but the screening still happened in that room.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::format::Format;
use crate::ports::ShowtimeReader;
use crate::{CinemaId, MovieId, RoomId};

pub const DEFAULT_MIN_INTER_ROOM_GAP_MINUTES: i64 = 75;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShowtimeStatus {
    #[default]
    Available,
    SoldOut,
    Expired,
    Cancelled,
}

impl ShowtimeStatus {
    pub fn blocks(self) -> bool {
        self != ShowtimeStatus::Cancelled
    }
}

/// A persisted showtime as seen by the checker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExistingShowtime {
    /// Store id; 0 for proposals of the current batch that are not persisted yet.
    pub id: u64,
    /// Room the screening occupies.
    pub room_id: RoomId,
    /// Cinema of that room.
    pub cinema_id: CinemaId,
    /// Movie being screened.
    pub movie_id: MovieId,
    /// Start of the screening.
    pub start: DateTime<Utc>,
    /// End of the screening (exclusive).
    pub end: DateTime<Utc>,
    /// Lifecycle status; only `cancelled` frees the room.
    #[serde(default)]
    pub status: ShowtimeStatus,
}

/// A proposed screening.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowtimeCandidate {
    /// Room the screening would occupy.
    pub room_id: RoomId,
    /// Movie to screen.
    pub movie_id: MovieId,
    /// Proposed start, staggered per room.
    pub start: DateTime<Utc>,
    /// Start plus the movie's running time; must be after `start`.
    pub end: DateTime<Utc>,
    /// Projection format; decides stagger, cap and surcharge.
    pub format: Format,
    /// Ticket base price in VND; 0 until priced.
    #[serde(default)]
    pub price: i64,
}

impl ShowtimeCandidate {
    pub fn as_existing(&self, cinema_id: CinemaId) -> ExistingShowtime {
        ExistingShowtime {
            id: 0,
            room_id: self.room_id,
            cinema_id,
            movie_id: self.movie_id,
            start: self.start,
            end: self.end,
            status: ShowtimeStatus::Available,
        }
    }
}

/// An existing showtime overlapping the candidate's room and time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomOverlap {
    pub showtime_id: u64,
    pub overlap_minutes: i64,
}

/// Outcome of the three rules for one candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConflictVerdict {
    pub room_overlap: bool,
    pub inter_room_gap: bool,
    pub nearby_room_gap: bool,
    /// The room's equipment cannot show the candidate's format. Only set by
    /// callers that know the room; the checker itself leaves it false.
    pub format_unsupported: bool,
    pub overlaps: Vec<RoomOverlap>,
}

impl ConflictVerdict {
    pub fn is_accepted(&self) -> bool {
        !(self.room_overlap
            || self.inter_room_gap
            || self.nearby_room_gap
            || self.format_unsupported)
    }
}

/// All blocking showtimes in the candidate's room that overlap it.
///
/// Two intervals overlap when `a.start < b.end && b.start < a.end`. The overlap
/// duration is `min(a.end, b.end) - max(a.start, b.start)`.
pub fn find_room_overlaps(
    candidate: &ShowtimeCandidate,
    existing: &[ExistingShowtime],
) -> Vec<RoomOverlap> {
    existing
        .iter()
        .filter(|e| e.status.blocks() && e.room_id == candidate.room_id)
        .filter(|e| e.start < candidate.end && e.end > candidate.start)
        .map(|e| RoomOverlap {
            showtime_id: e.id,
            overlap_minutes: (e.end.min(candidate.end) - e.start.max(candidate.start))
                .num_minutes(),
        })
        .collect()
}

pub fn has_room_overlap(candidate: &ShowtimeCandidate, existing: &[ExistingShowtime]) -> bool {
    !find_room_overlaps(candidate, existing).is_empty()
}

/// Same movie, different room, started less than `min_gap_minutes` before the
/// candidate. Exactly `min_gap_minutes` apart is fine.
pub fn has_inter_room_gap(
    candidate: &ShowtimeCandidate,
    existing: &[ExistingShowtime],
    min_gap_minutes: i64,
) -> bool {
    existing.iter().any(|e| {
        e.status.blocks()
            && e.movie_id == candidate.movie_id
            && e.room_id != candidate.room_id
            && e.start < candidate.start
            && (candidate.start - e.start).num_minutes() < min_gap_minutes
    })
}

/// Same movie, different room, starting less than `min_gap_minutes` before or
/// after the candidate.
///
/// Used for proposals of the batch being built: their order of acceptance says
/// nothing about their order in time, so the gap is enforced both ways.
pub fn has_inter_room_gap_around(
    candidate: &ShowtimeCandidate,
    existing: &[ExistingShowtime],
    min_gap_minutes: i64,
) -> bool {
    existing.iter().any(|e| {
        e.status.blocks()
            && e.movie_id == candidate.movie_id
            && e.room_id != candidate.room_id
            && (candidate.start - e.start).num_minutes().abs() < min_gap_minutes
    })
}

/// Same movie, different room of the same cinema, starting within
/// `gap_minutes` of the candidate in either direction.
pub fn has_nearby_room_gap(
    candidate: &ShowtimeCandidate,
    cinema_id: CinemaId,
    existing: &[ExistingShowtime],
    gap_minutes: i64,
) -> bool {
    existing.iter().any(|e| {
        e.status.blocks()
            && e.movie_id == candidate.movie_id
            && e.room_id != candidate.room_id
            && e.cinema_id == cinema_id
            && (candidate.start - e.start).num_minutes().abs() < gap_minutes
    })
}

/// Runs the three rules against a [`ShowtimeReader`] snapshot.
///
/// The checker holds no locks. Callers that insert accepted candidates must
/// serialize the whole check-then-insert sequence themselves, or two concurrent
/// batches can both pass for the same room and time.
pub struct ConflictChecker<'a, R: ShowtimeReader + ?Sized> {
    reader: &'a R,
    min_inter_room_gap_minutes: i64,
}

impl<'a, R: ShowtimeReader + ?Sized> ConflictChecker<'a, R> {
    pub fn new(reader: &'a R) -> Self {
        Self {
            reader,
            min_inter_room_gap_minutes: DEFAULT_MIN_INTER_ROOM_GAP_MINUTES,
        }
    }

    pub fn with_min_inter_room_gap(mut self, minutes: i64) -> Self {
        self.min_inter_room_gap_minutes = minutes;
        self
    }

    /// Evaluate `candidate` in a room of `cinema_id`.
    ///
    /// `pending` holds proposals of the same batch that are not in the store
    /// yet. They block the room like stored showtimes, and the inter-room gap
    /// is enforced against them in both directions.
    ///
    /// # Errors
    /// `InvalidInterval` if the candidate does not end after it starts, which
    /// no overlap test could catch. Otherwise propagates showtime store read
    /// failures.
    pub fn check(
        &self,
        candidate: &ShowtimeCandidate,
        cinema_id: CinemaId,
        nearby_gap_minutes: i64,
        pending: &[ExistingShowtime],
    ) -> Result<ConflictVerdict> {
        if candidate.end <= candidate.start {
            return Err(ScheduleError::InvalidInterval {
                start: candidate.start,
                end: candidate.end,
            });
        }
        let mut in_room = self
            .reader
            .in_room(candidate.room_id, candidate.start, candidate.end)?;
        in_room.extend_from_slice(pending);

        let lookback = Duration::minutes(self.min_inter_room_gap_minutes.max(nearby_gap_minutes));
        let lookahead = Duration::minutes(nearby_gap_minutes.max(0));
        let mut same_movie = self.reader.for_movie(
            candidate.movie_id,
            candidate.start - lookback,
            candidate.start + lookahead,
        )?;
        let inter_room_gap =
            has_inter_room_gap(candidate, &same_movie, self.min_inter_room_gap_minutes)
                || has_inter_room_gap_around(
                    candidate,
                    pending,
                    self.min_inter_room_gap_minutes,
                );
        same_movie.extend_from_slice(pending);

        let overlaps = find_room_overlaps(candidate, &in_room);
        let verdict = ConflictVerdict {
            room_overlap: !overlaps.is_empty(),
            inter_room_gap,
            nearby_room_gap: has_nearby_room_gap(
                candidate,
                cinema_id,
                &same_movie,
                nearby_gap_minutes,
            ),
            format_unsupported: false,
            overlaps,
        };

        tracing::debug!(
            room_id = candidate.room_id,
            start = %candidate.start,
            accepted = verdict.is_accepted(),
            room_overlap = verdict.room_overlap,
            inter_room_gap = verdict.inter_room_gap,
            nearby_room_gap = verdict.nearby_room_gap,
            "conflict check"
        );
        Ok(verdict)
    }
}
