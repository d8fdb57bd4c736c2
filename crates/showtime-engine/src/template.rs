//! Schedule templates and their priority-based selection.

use std::cmp::Reverse;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar;
use crate::error::Result;
use crate::format::{Format, FormatPolicy};
use crate::ports::TemplateLookup;
use crate::{MovieId, RoomId};

pub const TAG_VIETNAMESE: &str = "vietnamese";
pub const TAG_BLOCKBUSTER: &str = "blockbuster";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Genre {
    Action,
    #[serde(alias = "Sci-Fi", alias = "SciFi")]
    SciFi,
    Comedy,
    Drama,
    Horror,
    Romance,
    Animation,
    Documentary,
    #[serde(other)]
    Other,
}

impl Genre {
    pub fn is_blockbuster(self) -> bool {
        matches!(self, Genre::Action | Genre::SciFi)
    }
}

/// The movie metadata the scheduler needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieMeta {
    pub id: MovieId,
    /// Running time; must be positive.
    pub duration_minutes: i64,
    /// General release. Screenings may start `early_access_days` before it.
    pub release_date: NaiveDate,
    /// Last screening date, if the run is bounded.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    /// Vietnamese-language movie: picks "vietnamese" templates and pays the
    /// extra peak surcharge.
    #[serde(default)]
    pub is_vietnamese: bool,
}

impl MovieMeta {
    pub fn is_blockbuster(&self) -> bool {
        self.genres.iter().any(|g| g.is_blockbuster())
    }
}

/// A reusable scheduling recipe chosen by movie and day type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleTemplate {
    /// Store id; the lowest id wins a priority tie.
    pub id: u64,
    /// Display name for operators.
    #[serde(default)]
    pub name: String,
    /// Higher values win.
    pub priority: i32,
    /// Movie tags this template serves (e.g. "vietnamese", "blockbuster").
    #[serde(default)]
    pub movie_type_tags: Vec<String>,
    /// Day tags this template serves (e.g. "weekend").
    #[serde(default)]
    pub day_type_tags: Vec<String>,
    /// Start times as `"HH:MM"`. They are tried in time order.
    pub time_slots: Vec<String>,
    /// Formats to schedule, replacing the request's.
    pub allowed_formats: Vec<Format>,
    /// Only the first `max_rooms` requested rooms are used.
    pub max_rooms: usize,
    /// Daily screenings per room, replacing the format cap.
    pub max_per_day: u32,
}

impl ScheduleTemplate {
    pub fn matches(&self, query: &TemplateQuery) -> bool {
        let has = |tags: &[String], tag: &str| tags.iter().any(|t| t == tag);
        query
            .movie_type_tag
            .as_deref()
            .is_none_or(|tag| has(&self.movie_type_tags, tag))
            && query
                .day_type_tag
                .as_deref()
                .is_none_or(|tag| has(&self.day_type_tags, tag))
    }
}

/// Tag filters a template must carry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateQuery {
    pub movie_type_tag: Option<String>,
    pub day_type_tag: Option<String>,
}

impl TemplateQuery {
    /// Language first, then genre; weekend templates from Friday onwards.
    pub fn for_movie(movie: &MovieMeta, start_date: NaiveDate) -> Self {
        let movie_type_tag = if movie.is_vietnamese {
            Some(TAG_VIETNAMESE.to_string())
        } else if movie.is_blockbuster() {
            Some(TAG_BLOCKBUSTER.to_string())
        } else {
            None
        };
        let day_type_tag = calendar::is_weekend_or_friday(start_date)
            .then(|| calendar::TAG_WEEKEND.to_string());

        Self {
            movie_type_tag,
            day_type_tag,
        }
    }
}

/// Pick the highest-priority template for `movie` over `[start_date, end_date]`.
///
/// Ties on priority go to the lowest template id, so selection does not depend
/// on the order the collaborator returns rows in.
pub fn select_template<L: TemplateLookup + ?Sized>(
    lookup: &L,
    movie: &MovieMeta,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<Option<ScheduleTemplate>> {
    let query = TemplateQuery::for_movie(movie, start_date);
    let selected = lookup
        .templates(&query)?
        .into_iter()
        .filter(|t| t.matches(&query))
        .min_by_key(|t| (Reverse(t.priority), t.id));

    match &selected {
        Some(t) => tracing::debug!(
            template_id = t.id,
            priority = t.priority,
            %start_date,
            %end_date,
            "schedule template selected"
        ),
        None => tracing::debug!(?query, "no schedule template matched"),
    }
    Ok(selected)
}

/// The caller-editable part of a scheduling request a template overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotPlan {
    pub room_ids: Vec<RoomId>,
    pub time_slots: Vec<String>,
    pub formats: Vec<Format>,
}

/// Replace slots and formats with the template's and keep only the first
/// `max_rooms` rooms, in caller order.
pub fn apply_template(plan: &mut SlotPlan, template: &ScheduleTemplate) {
    plan.time_slots = template.time_slots.clone();
    plan.formats = template.allowed_formats.clone();
    plan.room_ids.truncate(template.max_rooms);
}

/// Daily screening cap per room for `format`.
pub fn max_per_day(format: &Format, template: Option<&ScheduleTemplate>) -> u32 {
    match template {
        Some(t) => t.max_per_day,
        None => FormatPolicy::for_format(format).max_screenings_per_day,
    }
}
