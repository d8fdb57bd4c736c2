//! Tests for template selection, application, and daily caps.

use chrono::NaiveDate;
use showtime_engine::error::{LookupError, ScheduleError};
use showtime_engine::ports::{LookupResult, TemplateLookup};
use showtime_engine::template::{
    apply_template, max_per_day, select_template, Genre, MovieMeta, ScheduleTemplate, SlotPlan,
    TemplateQuery,
};
use showtime_engine::{Format, InMemoryStore};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn movie(is_vietnamese: bool, genres: Vec<Genre>) -> MovieMeta {
    MovieMeta {
        id: 100,
        duration_minutes: 120,
        release_date: date(2025, 6, 1),
        end_date: None,
        genres,
        is_vietnamese,
    }
}

fn template(id: u64, priority: i32, movie_tags: &[&str], day_tags: &[&str]) -> ScheduleTemplate {
    ScheduleTemplate {
        id,
        name: format!("template-{id}"),
        priority,
        movie_type_tags: movie_tags.iter().map(|s| s.to_string()).collect(),
        day_type_tags: day_tags.iter().map(|s| s.to_string()).collect(),
        time_slots: vec!["10:00".into(), "14:00".into(), "19:00".into()],
        allowed_formats: vec![Format::TwoD, Format::Imax],
        max_rooms: 2,
        max_per_day: 5,
    }
}

fn store(templates: Vec<ScheduleTemplate>) -> InMemoryStore {
    InMemoryStore {
        templates,
        ..Default::default()
    }
}

struct ReversedLookup(Vec<ScheduleTemplate>);

impl TemplateLookup for ReversedLookup {
    fn templates(&self, _query: &TemplateQuery) -> LookupResult<Vec<ScheduleTemplate>> {
        Ok(self.0.iter().rev().cloned().collect())
    }
}

struct DownLookup;

impl TemplateLookup for DownLookup {
    fn templates(&self, _query: &TemplateQuery) -> LookupResult<Vec<ScheduleTemplate>> {
        Err(LookupError::new("template", "store offline"))
    }
}

// 2025-06-10 is a Tuesday, 2025-06-13 a Friday.
const TUESDAY: (i32, u32, u32) = (2025, 6, 10);
const FRIDAY: (i32, u32, u32) = (2025, 6, 13);

fn select(lookup: &dyn TemplateLookup, m: &MovieMeta, start: (i32, u32, u32)) -> Option<u64> {
    let start = date(start.0, start.1, start.2);
    select_template(lookup, m, start, start).unwrap().map(|t| t.id)
}

// ── Query construction ──────────────────────────────────────────────────────

#[test]
fn vietnamese_flag_takes_precedence_over_genre() {
    let q = TemplateQuery::for_movie(&movie(true, vec![Genre::Action]), date(2025, 6, 10));
    assert_eq!(q.movie_type_tag.as_deref(), Some("vietnamese"));
    assert_eq!(q.day_type_tag, None);
}

#[test]
fn action_and_scifi_are_blockbusters() {
    for genre in [Genre::Action, Genre::SciFi] {
        let q = TemplateQuery::for_movie(
            &movie(false, vec![Genre::Drama, genre]),
            date(2025, 6, 10),
        );
        assert_eq!(q.movie_type_tag.as_deref(), Some("blockbuster"));
    }
    let q = TemplateQuery::for_movie(&movie(false, vec![Genre::Drama]), date(2025, 6, 10));
    assert_eq!(q.movie_type_tag, None);
}

#[test]
fn friday_through_sunday_require_weekend_templates() {
    for day in 13..=15 {
        let q = TemplateQuery::for_movie(&movie(false, vec![]), date(2025, 6, day));
        assert_eq!(q.day_type_tag.as_deref(), Some("weekend"), "June {day}");
    }
}

#[test]
fn genre_names_deserialize_with_aliases() {
    let genres: Vec<Genre> = serde_json::from_str(r#"["Action", "Sci-Fi", "Musical"]"#).unwrap();
    assert_eq!(genres, vec![Genre::Action, Genre::SciFi, Genre::Other]);
}

// ── Selection ───────────────────────────────────────────────────────────────

#[test]
fn highest_priority_match_wins() {
    let s = store(vec![
        template(1, 10, &["vietnamese"], &[]),
        template(2, 50, &["vietnamese"], &[]),
        template(3, 99, &["blockbuster"], &[]),
    ]);
    assert_eq!(select(&s, &movie(true, vec![]), TUESDAY), Some(2));
}

#[test]
fn weekend_start_needs_weekend_tag() {
    let s = store(vec![
        template(1, 90, &["blockbuster"], &[]),
        template(2, 10, &["blockbuster"], &["weekend"]),
    ]);
    let m = movie(false, vec![Genre::SciFi]);
    assert_eq!(select(&s, &m, FRIDAY), Some(2));
    assert_eq!(select(&s, &m, TUESDAY), Some(1));
}

#[test]
fn no_match_returns_none() {
    let s = store(vec![template(1, 10, &["vietnamese"], &[])]);
    assert_eq!(select(&s, &movie(false, vec![Genre::Action]), TUESDAY), None);
}

#[test]
fn priority_ties_break_on_lowest_id_regardless_of_order() {
    let templates = vec![
        template(4, 50, &["vietnamese"], &[]),
        template(2, 50, &["vietnamese"], &[]),
        template(9, 50, &["vietnamese"], &[]),
    ];
    let m = movie(true, vec![]);
    assert_eq!(select(&store(templates.clone()), &m, TUESDAY), Some(2));
    assert_eq!(select(&ReversedLookup(templates), &m, TUESDAY), Some(2));
}

#[test]
fn selector_rechecks_tags_returned_by_collaborator() {
    let lookup = ReversedLookup(vec![template(1, 99, &["blockbuster"], &[])]);
    assert_eq!(select(&lookup, &movie(true, vec![]), TUESDAY), None);
}

#[test]
fn lookup_failure_propagates() {
    let err = select_template(
        &DownLookup,
        &movie(true, vec![]),
        date(2025, 6, 10),
        date(2025, 6, 10),
    )
    .unwrap_err();
    assert!(matches!(err, ScheduleError::Lookup(_)));
}

// ── Application ─────────────────────────────────────────────────────────────

#[test]
fn apply_overwrites_slots_and_formats_and_truncates_rooms() {
    let mut plan = SlotPlan {
        room_ids: vec![30, 10, 20],
        time_slots: vec!["08:00".into()],
        formats: vec![Format::ThreeD],
    };
    apply_template(&mut plan, &template(1, 1, &[], &[]));
    assert_eq!(plan.room_ids, vec![30, 10]);
    assert_eq!(plan.time_slots, vec!["10:00", "14:00", "19:00"]);
    assert_eq!(plan.formats, vec![Format::TwoD, Format::Imax]);
}

#[test]
fn apply_keeps_short_room_lists() {
    let mut plan = SlotPlan {
        room_ids: vec![5],
        time_slots: vec![],
        formats: vec![],
    };
    apply_template(&mut plan, &template(1, 1, &[], &[]));
    assert_eq!(plan.room_ids, vec![5]);
}

// ── Daily caps ──────────────────────────────────────────────────────────────

#[test]
fn default_caps_per_format() {
    assert_eq!(max_per_day(&Format::ThreeD, None), 4);
    assert_eq!(max_per_day(&Format::FourDx, None), 3);
    assert_eq!(max_per_day(&Format::Imax, None), 3);
    assert_eq!(max_per_day(&Format::TwoD, None), 8);
    assert_eq!(max_per_day(&Format::Other("Dolby".into()), None), 8);
}

#[test]
fn template_cap_overrides_format_default() {
    let t = template(1, 1, &[], &[]);
    assert_eq!(max_per_day(&Format::Imax, Some(&t)), 5);
}
