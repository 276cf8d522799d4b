//! Schema validation for user-submitted records.
//!
//! Every field rule runs; failures are collected into `FieldErrors` (one per
//! field) so the form can show them all at once. Pure apart from `now`.

use crate::domain::entities::{
    local_datetime, EntityId, EntityKind, NewMovie, NewRoom, NewShowing, NewTicket, TicketKind,
};
use crate::domain::errors::FieldErrors;
use crate::domain::scheduling::price_for;
use chrono::NaiveDateTime;

/// Minimum synopsis length, in characters.
pub const MIN_SYNOPSIS_CHARS: usize = 10;

/// Movie form state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieDraft {
    pub title: String,
    pub synopsis: String,
    pub rating: String,
    pub duration: i64,
    pub genre: String,
    pub release_date: String,
}

/// Room form state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoomDraft {
    pub number: i64,
    pub capacity: i64,
}

/// Showing form state. Selections are empty strings until chosen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShowingDraft {
    pub movie_id: String,
    pub room_id: String,
    pub starts_at: String,
}

/// Ticket sale request. Price is derived from `kind`, never supplied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketDraft {
    pub showing_id: String,
    pub kind: String,
}

/// Raw input tagged with the entity kind it should become.
#[derive(Debug, Clone, PartialEq)]
pub enum RawRecord {
    Movie(MovieDraft),
    Room(RoomDraft),
    Showing(ShowingDraft),
    Ticket(TicketDraft),
}

impl RawRecord {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Movie(_) => EntityKind::Movie,
            Self::Room(_) => EntityKind::Room,
            Self::Showing(_) => EntityKind::Showing,
            Self::Ticket(_) => EntityKind::Ticket,
        }
    }
}

/// Input that passed every rule, ready to be sent to the store.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidatedRecord {
    Movie(NewMovie),
    Room(NewRoom),
    Showing(NewShowing),
    Ticket(NewTicket),
}

impl ValidatedRecord {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Movie(_) => EntityKind::Movie,
            Self::Room(_) => EntityKind::Room,
            Self::Showing(_) => EntityKind::Showing,
            Self::Ticket(_) => EntityKind::Ticket,
        }
    }
}

/// Snapshot queries used by the reference rules.
pub trait ReferenceLookup {
    fn exists(&self, kind: EntityKind, id: &EntityId) -> bool;

    /// Start time of the showing with `id`, if it is present.
    fn showing_starts_at(&self, id: &EntityId) -> Option<NaiveDateTime>;
}

/// Validates `raw` against its kind's rules. `now` is the wall clock at the
/// moment of submission.
pub fn validate(raw: &RawRecord, now: NaiveDateTime) -> Result<ValidatedRecord, FieldErrors> {
    validate_record(raw, now, None)
}

/// Like [`validate`], and also checks that every selected reference is
/// present in `refs` and that a ticket's showing has not started yet.
/// Reference failures land on the reference field, in the same pass as the
/// other rules.
pub fn validate_referenced(
    raw: &RawRecord,
    now: NaiveDateTime,
    refs: &dyn ReferenceLookup,
) -> Result<ValidatedRecord, FieldErrors> {
    validate_record(raw, now, Some(refs))
}

fn validate_record(
    raw: &RawRecord,
    now: NaiveDateTime,
    refs: Option<&dyn ReferenceLookup>,
) -> Result<ValidatedRecord, FieldErrors> {
    match raw {
        RawRecord::Movie(draft) => validate_movie(draft).map(ValidatedRecord::Movie),
        RawRecord::Room(draft) => validate_room(draft).map(ValidatedRecord::Room),
        RawRecord::Showing(draft) => {
            check_showing(draft, now, refs).map(ValidatedRecord::Showing)
        }
        RawRecord::Ticket(draft) => check_ticket(draft, now, refs).map(ValidatedRecord::Ticket),
    }
}

pub fn validate_movie(draft: &MovieDraft) -> Result<NewMovie, FieldErrors> {
    let mut errors = FieldErrors::new();
    let title = draft.title.trim();
    let synopsis = draft.synopsis.trim();
    let rating = draft.rating.trim();
    let genre = draft.genre.trim();
    let release_date = draft.release_date.trim();

    if title.is_empty() {
        errors.add("title", "Title is required");
    }
    if synopsis.chars().count() < MIN_SYNOPSIS_CHARS {
        errors.add(
            "synopsis",
            format!("Synopsis must be at least {} characters", MIN_SYNOPSIS_CHARS),
        );
    }
    if rating.is_empty() {
        errors.add("rating", "Rating is required");
    }
    let duration = positive_u32(draft.duration);
    if duration.is_none() {
        errors.add("duration", "Duration must be greater than 0");
    }
    if genre.is_empty() {
        errors.add("genre", "Genre is required");
    }
    if release_date.is_empty() {
        errors.add("releaseDate", "Release date is required");
    }

    errors.into_result(|| NewMovie {
        title: title.to_string(),
        synopsis: synopsis.to_string(),
        rating: rating.to_string(),
        duration: duration.unwrap_or_default(),
        genre: genre.to_string(),
        release_date: release_date.to_string(),
    })
}

pub fn validate_room(draft: &RoomDraft) -> Result<NewRoom, FieldErrors> {
    let mut errors = FieldErrors::new();

    let number = positive_u32(draft.number);
    if number.is_none() {
        errors.add("number", "Room number must be at least 1");
    }
    let capacity = positive_u32(draft.capacity);
    if capacity.is_none() {
        errors.add("capacity", "Capacity must be greater than 0");
    }

    errors.into_result(|| NewRoom {
        number: number.unwrap_or_default(),
        capacity: capacity.unwrap_or_default(),
    })
}

pub fn validate_showing(
    draft: &ShowingDraft,
    now: NaiveDateTime,
) -> Result<NewShowing, FieldErrors> {
    check_showing(draft, now, None)
}

pub fn validate_ticket(draft: &TicketDraft) -> Result<NewTicket, FieldErrors> {
    check_ticket(draft, NaiveDateTime::MIN, None)
}

fn check_showing(
    draft: &ShowingDraft,
    now: NaiveDateTime,
    refs: Option<&dyn ReferenceLookup>,
) -> Result<NewShowing, FieldErrors> {
    let mut errors = FieldErrors::new();
    let movie_id = EntityId::new(draft.movie_id.trim());
    let room_id = EntityId::new(draft.room_id.trim());

    if movie_id.is_blank() {
        errors.add("movieId", "Select a movie");
    } else if refs.is_some_and(|r| !r.exists(EntityKind::Movie, &movie_id)) {
        errors.add("movieId", "Selected movie no longer exists");
    }
    if room_id.is_blank() {
        errors.add("roomId", "Select a room");
    } else if refs.is_some_and(|r| !r.exists(EntityKind::Room, &room_id)) {
        errors.add("roomId", "Selected room no longer exists");
    }
    let starts_at = match local_datetime::parse(&draft.starts_at) {
        Some(at) if at < now => {
            errors.add("startsAt", "Showing date cannot be in the past");
            None
        }
        Some(at) => Some(at),
        None => {
            errors.add("startsAt", "Enter a valid date and time");
            None
        }
    };

    match starts_at {
        Some(starts_at) if errors.is_empty() => Ok(NewShowing {
            movie_id,
            room_id,
            starts_at,
        }),
        _ => Err(errors),
    }
}

/// Tickets can only be sold while the showing has not started
/// (`starts_at` strictly after `now`).
fn check_ticket(
    draft: &TicketDraft,
    now: NaiveDateTime,
    refs: Option<&dyn ReferenceLookup>,
) -> Result<NewTicket, FieldErrors> {
    let mut errors = FieldErrors::new();
    let showing_id = EntityId::new(draft.showing_id.trim());

    if showing_id.is_blank() {
        errors.add("showingId", "Select a showing");
    } else if let Some(refs) = refs {
        match refs.showing_starts_at(&showing_id) {
            None => errors.add("showingId", "Selected showing no longer exists"),
            Some(at) if at <= now => errors.add("showingId", "Showing has already started"),
            Some(_) => {}
        }
    }
    let kind = draft.kind.parse::<TicketKind>().ok();
    if kind.is_none() {
        errors.add("kind", "Ticket kind must be Full or Half");
    }

    match kind {
        Some(kind) if errors.is_empty() => Ok(NewTicket {
            showing_id,
            kind,
            price: price_for(kind),
        }),
        _ => Err(errors),
    }
}

fn positive_u32(value: i64) -> Option<u32> {
    u32::try_from(value).ok().filter(|v| *v >= 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Money;
    use chrono::{Duration, NaiveDate};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2030, 6, 1)
            .and_then(|d| d.and_hms_opt(18, 0, 0))
            .unwrap()
    }

    fn dune() -> MovieDraft {
        MovieDraft {
            title: "Dune".into(),
            synopsis: "A noble family becomes embroiled in a war for Arrakis.".into(),
            rating: "12".into(),
            duration: 155,
            genre: "Sci-Fi".into(),
            release_date: "2024-03-01".into(),
        }
    }

    fn showing_at(at: NaiveDateTime) -> ShowingDraft {
        ShowingDraft {
            movie_id: "1".into(),
            room_id: "2".into(),
            starts_at: local_datetime::format(&at),
        }
    }

    #[test]
    fn test_valid_movie_passes() {
        let movie = validate_movie(&dune()).unwrap();
        assert_eq!(movie.title, "Dune");
        assert_eq!(movie.duration, 155);
    }

    #[test]
    fn test_zero_duration_is_the_only_error() {
        let draft = MovieDraft {
            duration: 0,
            ..dune()
        };
        let errors = validate_movie(&draft).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("duration"), Some("Duration must be greater than 0"));
    }

    #[test]
    fn test_movie_collects_every_failed_field() {
        let draft = MovieDraft {
            title: "   ".into(),
            synopsis: "short".into(),
            rating: String::new(),
            duration: -5,
            genre: String::new(),
            release_date: String::new(),
        };
        let errors = validate_movie(&draft).unwrap_err();
        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            ["title", "synopsis", "rating", "duration", "genre", "releaseDate"]
        );
    }

    #[test]
    fn test_synopsis_boundary_counts_chars() {
        let draft = MovieDraft {
            synopsis: "ação ação!".into(),
            ..dune()
        };
        assert!(validate_movie(&draft).is_ok());
        let draft = MovieDraft {
            synopsis: "123456789".into(),
            ..dune()
        };
        assert_eq!(validate_movie(&draft).unwrap_err().fields().count(), 1);
    }

    #[test]
    fn test_room_rules() {
        assert!(validate_room(&RoomDraft {
            number: 1,
            capacity: 80
        })
        .is_ok());
        let errors = validate_room(&RoomDraft {
            number: 0,
            capacity: 0,
        })
        .unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.get("number").is_some());
        assert!(errors.get("capacity").is_some());
    }

    #[test]
    fn test_showing_in_the_past_fails_only_on_datetime() {
        let errors =
            validate_showing(&showing_at(now() - Duration::hours(1)), now()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get("startsAt"),
            Some("Showing date cannot be in the past")
        );
    }

    #[test]
    fn test_showing_in_the_future_passes() {
        let at = now() + Duration::hours(1);
        let showing = validate_showing(&showing_at(at), now()).unwrap();
        assert_eq!(showing.starts_at, at);
        assert_eq!(showing.movie_id.as_str(), "1");
    }

    #[test]
    fn test_showing_at_exactly_now_passes() {
        assert!(validate_showing(&showing_at(now()), now()).is_ok());
    }

    #[test]
    fn test_showing_is_checked_against_validation_time() {
        let draft = showing_at(now() + Duration::minutes(5));
        assert!(validate_showing(&draft, now()).is_ok());
        // Form left open past the start time.
        assert!(validate_showing(&draft, now() + Duration::minutes(10)).is_err());
    }

    #[test]
    fn test_showing_missing_selections_and_bad_date() {
        let draft = ShowingDraft {
            movie_id: String::new(),
            room_id: String::new(),
            starts_at: "not a date".into(),
        };
        let errors = validate_showing(&draft, now()).unwrap_err();
        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            ["movieId", "roomId", "startsAt"]
        );
        assert_eq!(errors.get("startsAt"), Some("Enter a valid date and time"));
    }

    #[test]
    fn test_ticket_price_comes_from_tariff() {
        let full = validate_ticket(&TicketDraft {
            showing_id: "s1".into(),
            kind: "Full".into(),
        })
        .unwrap();
        let half = validate_ticket(&TicketDraft {
            showing_id: "s1".into(),
            kind: "Half".into(),
        })
        .unwrap();
        assert_eq!(full.price, Money::from_cents(2000));
        assert_eq!(half.price, Money::from_cents(1000));
    }

    #[test]
    fn test_ticket_unknown_kind() {
        let errors = validate_ticket(&TicketDraft {
            showing_id: "s1".into(),
            kind: "VIP".into(),
        })
        .unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), ["kind"]);
    }

    /// One movie "m1", one room "r1", showing "s1" at `now() + 1h` and
    /// showing "s0" that started at `now()`.
    struct Snapshot;

    impl ReferenceLookup for Snapshot {
        fn exists(&self, kind: EntityKind, id: &EntityId) -> bool {
            matches!(
                (kind, id.as_str()),
                (EntityKind::Movie, "m1") | (EntityKind::Room, "r1")
            )
        }

        fn showing_starts_at(&self, id: &EntityId) -> Option<NaiveDateTime> {
            match id.as_str() {
                "s1" => Some(now() + Duration::hours(1)),
                "s0" => Some(now()),
                _ => None,
            }
        }
    }

    #[test]
    fn test_dangling_reference_reported_with_other_field_errors() {
        let draft = ShowingDraft {
            movie_id: "deleted-movie".into(),
            room_id: "r1".into(),
            starts_at: local_datetime::format(&(now() - Duration::hours(1))),
        };
        let errors = validate_referenced(&RawRecord::Showing(draft), now(), &Snapshot)
            .unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), ["movieId", "startsAt"]);
        assert_eq!(errors.get("movieId"), Some("Selected movie no longer exists"));
    }

    #[test]
    fn test_empty_selection_wins_over_reference_rule() {
        let draft = ShowingDraft {
            movie_id: String::new(),
            room_id: "gone".into(),
            starts_at: local_datetime::format(&(now() + Duration::hours(1))),
        };
        let errors = validate_referenced(&RawRecord::Showing(draft), now(), &Snapshot)
            .unwrap_err();
        assert_eq!(errors.get("movieId"), Some("Select a movie"));
        assert_eq!(errors.get("roomId"), Some("Selected room no longer exists"));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_ticket_only_for_showings_not_yet_started() {
        let sell = |showing_id: &str| {
            validate_referenced(
                &RawRecord::Ticket(TicketDraft {
                    showing_id: showing_id.into(),
                    kind: "Full".into(),
                }),
                now(),
                &Snapshot,
            )
        };
        assert!(sell("s1").is_ok());
        assert_eq!(
            sell("s0").unwrap_err().get("showingId"),
            Some("Showing has already started")
        );
        assert_eq!(
            sell("gone").unwrap_err().get("showingId"),
            Some("Selected showing no longer exists")
        );
    }

    #[test]
    fn test_validate_dispatches_on_kind() {
        let raw = RawRecord::Room(RoomDraft {
            number: 3,
            capacity: 40,
        });
        assert_eq!(raw.kind(), EntityKind::Room);
        let validated = validate(&raw, now()).unwrap();
        assert_eq!(
            validated,
            ValidatedRecord::Room(NewRoom {
                number: 3,
                capacity: 40
            })
        );
    }
}
