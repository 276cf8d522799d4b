//! Scheduling rules derived from a catalog snapshot.
//!
//! Everything here is a pure function of the entities and `now`; nothing is
//! cached between calls.

use crate::domain::entities::{EntityId, Money, Movie, Showing, TicketKind};
use chrono::NaiveDateTime;
use std::collections::HashSet;

pub const FULL_PRICE: Money = Money::from_cents(2000);
pub const HALF_PRICE: Money = Money::from_cents(1000);

/// Tariff for a (validated) ticket kind. The only source of ticket prices;
/// client-supplied prices are never trusted.
pub fn price_for(kind: TicketKind) -> Money {
    match kind {
        TicketKind::Full => FULL_PRICE,
        TicketKind::Half => HALF_PRICE,
    }
}

/// Showings starting strictly after `now`, earliest first. Ties keep input order.
pub fn upcoming_showings(showings: &[Showing], now: NaiveDateTime) -> Vec<Showing> {
    let mut upcoming: Vec<Showing> = showings
        .iter()
        .filter(|s| s.details.starts_at > now)
        .cloned()
        .collect();
    // sort_by_key is stable
    upcoming.sort_by_key(|s| s.details.starts_at);
    upcoming
}

/// Movies with at least one showing strictly after `now`, in catalog order.
pub fn currently_showing(movies: &[Movie], showings: &[Showing], now: NaiveDateTime) -> Vec<Movie> {
    let scheduled: HashSet<&EntityId> = showings
        .iter()
        .filter(|s| s.details.starts_at > now)
        .map(|s| &s.details.movie_id)
        .collect();
    movies
        .iter()
        .filter(|m| scheduled.contains(&m.id))
        .cloned()
        .collect()
}

/// Headline movie for the home page: the first one currently showing.
pub fn featured_movie(movies: &[Movie], showings: &[Showing], now: NaiveDateTime) -> Option<Movie> {
    currently_showing(movies, showings, now).into_iter().next()
}

/// The first `limit` upcoming showings.
#[derive(Debug, Clone, PartialEq)]
pub struct UpcomingPreview {
    pub showings: Vec<Showing>,
    /// More upcoming showings exist beyond `limit`.
    pub has_more: bool,
}

pub fn upcoming_preview(showings: &[Showing], now: NaiveDateTime, limit: usize) -> UpcomingPreview {
    let mut upcoming = upcoming_showings(showings, now);
    let has_more = upcoming.len() > limit;
    upcoming.truncate(limit);
    UpcomingPreview {
        showings: upcoming,
        has_more,
    }
}
