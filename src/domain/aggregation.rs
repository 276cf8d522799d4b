//! Joins tickets -> showings -> movies/rooms into composite views.
//!
//! Tickets are financial records: one dangling reference fails the whole
//! batch. Showing listings are informational: a missing movie or room only
//! degrades that field.

use crate::domain::entities::{Entity, EntityId, EntityKind, Movie, Room, Showing, Ticket};
use crate::domain::errors::ReferenceError;
use std::collections::HashMap;
use std::fmt;

/// Display sentinel for a showing whose movie no longer exists.
pub const UNKNOWN_MOVIE: &str = "Unknown";
/// Display sentinel for a showing whose room no longer exists.
pub const UNKNOWN_ROOM: &str = "?";

/// Id-keyed view over a collection, built once per aggregation.
pub struct Index<'a, E: Entity> {
    by_id: HashMap<&'a EntityId, &'a E>,
}

impl<'a, E: Entity> Index<'a, E> {
    pub fn build(records: &'a [E]) -> Self {
        Self {
            by_id: records.iter().map(|r| (r.id(), r)).collect(),
        }
    }

    pub fn get(&self, id: &EntityId) -> Option<&'a E> {
        self.by_id.get(id).copied()
    }

    /// Resolves `id` or reports which record held the dangling reference.
    fn require(
        &self,
        id: &EntityId,
        referrer_kind: EntityKind,
        referrer_id: &EntityId,
    ) -> Result<&'a E, ReferenceError> {
        self.get(id).ok_or_else(|| ReferenceError {
            missing_kind: E::KIND,
            missing_id: id.clone(),
            referrer_kind,
            referrer_id: referrer_id.clone(),
        })
    }
}

/// Showing with its movie and room embedded.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedShowing {
    pub showing: Showing,
    pub movie: Movie,
    pub room: Room,
}

/// Ticket with its full showing context.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTicket {
    pub ticket: Ticket,
    pub showing: ResolvedShowing,
}

/// Resolves every ticket, in input order. Lookup order per ticket is showing,
/// then movie, then room; the first miss aborts with no partial output.
pub fn resolve_tickets(
    tickets: &[Ticket],
    showings: &[Showing],
    movies: &[Movie],
    rooms: &[Room],
) -> Result<Vec<ResolvedTicket>, ReferenceError> {
    let showings = Index::build(showings);
    let movies = Index::build(movies);
    let rooms = Index::build(rooms);

    tickets
        .iter()
        .map(|ticket| -> Result<ResolvedTicket, ReferenceError> {
            let showing = showings.require(
                &ticket.details.showing_id,
                EntityKind::Ticket,
                &ticket.id,
            )?;
            let showing = resolve_showing_with(showing, &movies, &rooms)?;
            Ok(ResolvedTicket {
                ticket: ticket.clone(),
                showing,
            })
        })
        .collect()
}

/// Strict resolution of a single showing.
pub fn resolve_showing(
    showing: &Showing,
    movies: &[Movie],
    rooms: &[Room],
) -> Result<ResolvedShowing, ReferenceError> {
    resolve_showing_with(showing, &Index::build(movies), &Index::build(rooms))
}

fn resolve_showing_with(
    showing: &Showing,
    movies: &Index<'_, Movie>,
    rooms: &Index<'_, Room>,
) -> Result<ResolvedShowing, ReferenceError> {
    let movie = movies.require(&showing.details.movie_id, EntityKind::Showing, &showing.id)?;
    let room = rooms.require(&showing.details.room_id, EntityKind::Showing, &showing.id)?;
    Ok(ResolvedShowing {
        showing: showing.clone(),
        movie: movie.clone(),
        room: room.clone(),
    })
}

/// Outcome of a lenient lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    Missing(EntityId),
}

impl<T> Lookup<T> {
    pub fn found(&self) -> Option<&T> {
        match self {
            Self::Found(value) => Some(value),
            Self::Missing(_) => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing(_))
    }
}

/// Showing list entry with movie title and room number resolved leniently.
#[derive(Debug, Clone, PartialEq)]
pub struct ShowingSummary {
    pub showing: Showing,
    pub movie: Lookup<Movie>,
    pub room: Lookup<Room>,
}

impl ShowingSummary {
    pub fn movie_title(&self) -> &str {
        self.movie
            .found()
            .map(|m| m.details.title.as_str())
            .unwrap_or(UNKNOWN_MOVIE)
    }

    pub fn room_label(&self) -> String {
        self.room
            .found()
            .map(|r| r.details.number.to_string())
            .unwrap_or_else(|| UNKNOWN_ROOM.to_string())
    }
}

impl fmt::Display for ShowingSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | Room {} | {}",
            self.movie_title(),
            self.room_label(),
            self.showing.details.starts_at.format("%Y-%m-%d %H:%M")
        )
    }
}

/// Summaries for `showings`, in input order. Never fails.
pub fn describe_showings(
    showings: &[Showing],
    movies: &[Movie],
    rooms: &[Room],
) -> Vec<ShowingSummary> {
    let movies = Index::build(movies);
    let rooms = Index::build(rooms);

    showings
        .iter()
        .map(|showing| {
            let movie = match movies.get(&showing.details.movie_id) {
                Some(m) => Lookup::Found(m.clone()),
                None => Lookup::Missing(showing.details.movie_id.clone()),
            };
            let room = match rooms.get(&showing.details.room_id) {
                Some(r) => Lookup::Found(r.clone()),
                None => Lookup::Missing(showing.details.room_id.clone()),
            };
            ShowingSummary {
                showing: showing.clone(),
                movie,
                room,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{
        Money, NewMovie, NewRoom, NewShowing, NewTicket, TicketKind,
    };
    use chrono::NaiveDate;

    fn movie(id: &str, title: &str) -> Movie {
        Movie {
            id: EntityId::new(id),
            details: NewMovie {
                title: title.into(),
                synopsis: "Long enough synopsis".into(),
                rating: "14".into(),
                duration: 120,
                genre: "Drama".into(),
                release_date: "2030-01-01".into(),
            },
        }
    }

    fn room(id: &str, number: u32) -> Room {
        Room {
            id: EntityId::new(id),
            details: NewRoom {
                number,
                capacity: 50,
            },
        }
    }

    fn showing(id: &str, movie_id: &str, room_id: &str) -> Showing {
        Showing {
            id: EntityId::new(id),
            details: NewShowing {
                movie_id: EntityId::new(movie_id),
                room_id: EntityId::new(room_id),
                starts_at: NaiveDate::from_ymd_opt(2030, 6, 1)
                    .and_then(|d| d.and_hms_opt(20, 0, 0))
                    .unwrap(),
            },
        }
    }

    fn ticket(id: &str, showing_id: &str) -> Ticket {
        Ticket {
            id: EntityId::new(id),
            details: NewTicket {
                showing_id: EntityId::new(showing_id),
                kind: TicketKind::Full,
                price: Money::from_cents(2000),
            },
        }
    }

    struct Fixture {
        movies: Vec<Movie>,
        rooms: Vec<Room>,
        showings: Vec<Showing>,
    }

    fn fixture() -> Fixture {
        Fixture {
            movies: vec![movie("m1", "Dune"), movie("m2", "Alien")],
            rooms: vec![room("r1", 1), room("r2", 2)],
            showings: vec![showing("s1", "m1", "r2"), showing("s2", "m2", "r1")],
        }
    }

    #[test]
    fn test_resolve_tickets_embeds_movie_and_room() {
        let f = fixture();
        let tickets = vec![ticket("t1", "s1"), ticket("t2", "s2"), ticket("t3", "s1")];
        let resolved = resolve_tickets(&tickets, &f.showings, &f.movies, &f.rooms).unwrap();

        assert_eq!(resolved.len(), 3);
        assert_eq!(resolved[0].ticket.id.as_str(), "t1");
        assert_eq!(resolved[0].showing.movie.details.title, "Dune");
        assert_eq!(resolved[0].showing.room.details.number, 2);
        assert_eq!(resolved[1].showing.movie.details.title, "Alien");
        assert_eq!(resolved[1].showing.room.details.number, 1);
        assert_eq!(resolved[2].showing.showing.id.as_str(), "s1");
    }

    #[test]
    fn test_resolve_tickets_fails_whole_batch_on_missing_showing() {
        let f = fixture();
        let tickets = vec![ticket("t1", "s1"), ticket("t2", "gone"), ticket("t3", "s2")];
        let err = resolve_tickets(&tickets, &f.showings, &f.movies, &f.rooms).unwrap_err();

        assert_eq!(err.missing_kind, EntityKind::Showing);
        assert_eq!(err.missing_id.as_str(), "gone");
        assert_eq!(err.referrer_kind, EntityKind::Ticket);
        assert_eq!(err.referrer_id.as_str(), "t2");
    }

    #[test]
    fn test_resolve_tickets_checks_movie_before_room() {
        let f = fixture();
        let showings = vec![showing("s9", "no-movie", "no-room")];
        let err = resolve_tickets(&[ticket("t1", "s9")], &showings, &f.movies, &f.rooms)
            .unwrap_err();
        assert_eq!(err.missing_kind, EntityKind::Movie);
        assert_eq!(err.referrer_kind, EntityKind::Showing);
        assert_eq!(err.referrer_id.as_str(), "s9");

        let showings = vec![showing("s9", "m1", "no-room")];
        let err = resolve_tickets(&[ticket("t1", "s9")], &showings, &f.movies, &f.rooms)
            .unwrap_err();
        assert_eq!(err.missing_kind, EntityKind::Room);
        assert_eq!(err.missing_id.as_str(), "no-room");
    }

    #[test]
    fn test_resolve_tickets_empty() {
        let f = fixture();
        assert!(resolve_tickets(&[], &f.showings, &f.movies, &f.rooms)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_describe_showings_degrades_missing_fields() {
        let f = fixture();
        let showings = vec![
            showing("s1", "m1", "r1"),
            showing("s2", "gone", "r2"),
            showing("s3", "m2", "gone"),
        ];
        let summaries = describe_showings(&showings, &f.movies, &f.rooms);

        assert_eq!(summaries.len(), 3);
        assert_eq!(summaries[0].movie_title(), "Dune");
        assert_eq!(summaries[0].room_label(), "1");
        assert_eq!(summaries[1].movie_title(), UNKNOWN_MOVIE);
        assert_eq!(summaries[1].movie, Lookup::Missing(EntityId::new("gone")));
        assert_eq!(summaries[1].room_label(), "2");
        assert_eq!(summaries[2].room_label(), UNKNOWN_ROOM);
        assert!(summaries[2].room.is_missing());
        assert_eq!(summaries[0].to_string(), "Dune | Room 1 | 2030-06-01 20:00");
    }

    #[test]
    fn test_resolve_showing_strict() {
        let f = fixture();
        let resolved = resolve_showing(&f.showings[0], &f.movies, &f.rooms).unwrap();
        assert_eq!(resolved.movie.id.as_str(), "m1");
        assert!(resolve_showing(&showing("s", "x", "r1"), &f.movies, &f.rooms).is_err());
    }
}
