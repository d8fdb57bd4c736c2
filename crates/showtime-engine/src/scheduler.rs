//! Batch showtime generation over a date range.
//!
//! Template selection → slot building → conflict checks → pricing. For each day
//! and format the allowed slot labels are walked in time order, and every room
//! tries each label in room order, so proposals come out label by label. A room
//! keeps the placements that pass every conflict rule, up to the daily cap. A
//! rejected slot is not moved; the room simply waits for the next label.
//!
//! Proposals of the batch are checked against each other in both directions,
//! so two rooms never start the same movie closer than the inter-room gap,
//! whichever of the two was placed first.
//!
//! The scheduler only proposes. Persisting the proposals, and serializing
//! concurrent batches while doing so, is left to the caller.

use chrono::{Duration, NaiveDate};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::conflict::{ConflictChecker, ConflictVerdict, ExistingShowtime, ShowtimeCandidate};
use crate::error::{Result, ScheduleError};
use crate::format::{filter_slots_by_format_and_time, Format};
use crate::ports::{Clock, Room, RoomCatalog, ShowtimeReader, TemplateLookup};
use crate::slot::SlotBuilder;
use crate::template::{apply_template, max_per_day, select_template, MovieMeta, SlotPlan};
use crate::RoomId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub movie: MovieMeta,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(flatten)]
    pub plan: SlotPlan,
    /// Minimum start distance between rooms of one cinema showing this movie.
    #[serde(default)]
    pub nearby_gap_minutes: Option<i64>,
}

/// A room that got no screening of `format` on `date`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExhaustedSlot {
    pub date: NaiveDate,
    pub room_id: RoomId,
    pub format: Format,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScheduleOutcome {
    pub template_id: Option<u64>,
    pub proposed: Vec<ShowtimeCandidate>,
    pub exhausted: Vec<ExhaustedSlot>,
    /// Slot labels that could not be parsed as `HH:MM`.
    pub skipped_labels: Vec<String>,
    /// Dates outside the movie's screening window.
    pub skipped_dates: Vec<NaiveDate>,
}

pub struct Scheduler<'a> {
    config: EngineConfig,
    tz: Tz,
    rooms: &'a dyn RoomCatalog,
    templates: &'a dyn TemplateLookup,
    showtimes: &'a dyn ShowtimeReader,
    clock: &'a dyn Clock,
}

impl<'a> Scheduler<'a> {
    /// # Errors
    /// Returns `ScheduleError::InvalidTimezone` if the configured zone is unknown.
    pub fn new<S>(config: EngineConfig, store: &'a S, clock: &'a dyn Clock) -> Result<Self>
    where
        S: RoomCatalog + TemplateLookup + ShowtimeReader + 'a,
    {
        let tz = config.tz()?;
        Ok(Self {
            config,
            tz,
            rooms: store,
            templates: store,
            showtimes: store,
            clock,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Whether the movie may be screened on `date`: from the start of its early
    /// access window through its end date.
    pub fn in_screening_window(&self, movie: &MovieMeta, date: NaiveDate) -> bool {
        let first = movie.release_date - Duration::days(self.config.early_access_days);
        date >= first && movie.end_date.is_none_or(|end| date <= end)
    }

    /// Propose showtimes for `request`.
    ///
    /// # Errors
    /// - `InvalidDateRange` if `start_date > end_date`.
    /// - `InvalidDuration` if the movie's running time is not positive or does
    ///   not fit a timestamp.
    /// - `UnknownRoom` if a requested room is not in the catalog.
    /// - `Lookup` if any collaborator read fails; the whole batch is abandoned.
    pub fn generate(&self, request: &ScheduleRequest) -> Result<ScheduleOutcome> {
        if request.start_date > request.end_date {
            return Err(ScheduleError::InvalidDateRange {
                start: request.start_date,
                end: request.end_date,
            });
        }

        let movie = &request.movie;
        let duration = movie_duration(movie)?;
        let mut plan = request.plan.clone();
        let template = select_template(
            self.templates,
            movie,
            request.start_date,
            request.end_date,
        )?;
        if let Some(t) = &template {
            apply_template(&mut plan, t);
        }

        let rooms = self.resolve_rooms(&plan.room_ids)?;
        let nearby_gap = request
            .nearby_gap_minutes
            .unwrap_or(self.config.default_nearby_gap_minutes);
        let now = self.clock.now();
        let checker = ConflictChecker::new(self.showtimes)
            .with_min_inter_room_gap(self.config.min_inter_room_gap_minutes);
        let builder = SlotBuilder::new(self.tz).with_dst_policy(self.config.dst_policy);

        let mut outcome = ScheduleOutcome {
            template_id: template.as_ref().map(|t| t.id),
            ..Default::default()
        };
        let mut pending: Vec<ExistingShowtime> = Vec::new();

        for date in request
            .start_date
            .iter_days()
            .take_while(|d| *d <= request.end_date)
        {
            if !self.in_screening_window(movie, date) {
                tracing::debug!(%date, movie_id = movie.id, "outside screening window");
                outcome.skipped_dates.push(date);
                continue;
            }

            for format in &plan.formats {
                let mut slots = filter_slots_by_format_and_time(
                    &plan.time_slots,
                    format,
                    movie.duration_minutes,
                );
                for label in slots.malformed {
                    if !outcome.skipped_labels.contains(&label) {
                        outcome.skipped_labels.push(label);
                    }
                }
                slots.allowed.sort_by_key(|(_, time)| *time);

                let capable: Vec<&Room> = rooms.iter().filter(|r| r.supports(format)).collect();
                if capable.is_empty() {
                    tracing::warn!(%format, %date, "no requested room supports format");
                    continue;
                }
                let room_order: Vec<RoomId> = capable.iter().map(|r| r.id).collect();
                let cap = max_per_day(format, template.as_ref());
                let mut accepted = vec![0u32; capable.len()];

                for (label, _) in &slots.allowed {
                    for (room, count) in capable.iter().zip(accepted.iter_mut()) {
                        if *count >= cap {
                            continue;
                        }
                        let start = match builder.build_start_time(
                            date,
                            label,
                            format,
                            &room_order,
                            room.id,
                        ) {
                            Ok(start) => start,
                            Err(ScheduleError::NonexistentLocalTime(local)) => {
                                tracing::debug!(%local, "slot falls in DST gap, skipped");
                                continue;
                            }
                            Err(e) => return Err(e),
                        };
                        if start <= now {
                            continue;
                        }
                        let end = start
                            .checked_add_signed(duration)
                            .ok_or(ScheduleError::InvalidDuration(movie.duration_minutes))?;

                        let mut candidate = ShowtimeCandidate {
                            room_id: room.id,
                            movie_id: movie.id,
                            start,
                            end,
                            format: format.clone(),
                            price: 0,
                        };
                        let verdict =
                            checker.check(&candidate, room.cinema_id, nearby_gap, &pending)?;
                        if !verdict.is_accepted() {
                            continue;
                        }

                        candidate.price = self.config.pricing.price(
                            start.with_timezone(&self.tz),
                            format,
                            date,
                            movie.is_vietnamese,
                        );
                        pending.push(candidate.as_existing(room.cinema_id));
                        outcome.proposed.push(candidate);
                        *count += 1;
                    }
                }

                for (room, count) in capable.iter().zip(&accepted) {
                    if *count == 0 {
                        tracing::warn!(
                            %date,
                            room_id = room.id,
                            %format,
                            "schedule exhausted for room"
                        );
                        outcome.exhausted.push(ExhaustedSlot {
                            date,
                            room_id: room.id,
                            format: format.clone(),
                        });
                    }
                }
            }
        }

        tracing::info!(
            movie_id = movie.id,
            template_id = ?outcome.template_id,
            proposed = outcome.proposed.len(),
            exhausted = outcome.exhausted.len(),
            "schedule generated"
        );
        Ok(outcome)
    }

    /// Conflict verdict for an ad-hoc placement, including whether the room can
    /// show the candidate's format.
    ///
    /// # Errors
    /// `InvalidInterval` if the candidate does not end after it starts,
    /// `UnknownRoom` if its room is not in the catalog, `Lookup` on store
    /// failures.
    pub fn check(
        &self,
        candidate: &ShowtimeCandidate,
        nearby_gap_minutes: Option<i64>,
    ) -> Result<ConflictVerdict> {
        let room = self
            .resolve_rooms(&[candidate.room_id])?
            .into_iter()
            .next()
            .ok_or(ScheduleError::UnknownRoom(candidate.room_id))?;
        let mut verdict = ConflictChecker::new(self.showtimes)
            .with_min_inter_room_gap(self.config.min_inter_room_gap_minutes)
            .check(
                candidate,
                room.cinema_id,
                nearby_gap_minutes.unwrap_or(self.config.default_nearby_gap_minutes),
                &[],
            )?;
        verdict.format_unsupported = !room.supports(&candidate.format);
        Ok(verdict)
    }

    /// Catalog rooms in requested order.
    fn resolve_rooms(&self, ids: &[RoomId]) -> Result<Vec<Room>> {
        let found = self.rooms.rooms(ids)?;
        ids.iter()
            .map(|id| {
                found
                    .iter()
                    .find(|r| r.id == *id)
                    .cloned()
                    .ok_or(ScheduleError::UnknownRoom(*id))
            })
            .collect()
    }
}

/// The movie's running time.
///
/// # Errors
/// `InvalidDuration` unless it is a positive number of minutes that fits a
/// [`Duration`].
fn movie_duration(movie: &MovieMeta) -> Result<Duration> {
    if movie.duration_minutes <= 0 {
        return Err(ScheduleError::InvalidDuration(movie.duration_minutes));
    }
    Duration::try_minutes(movie.duration_minutes)
        .ok_or(ScheduleError::InvalidDuration(movie.duration_minutes))
}
