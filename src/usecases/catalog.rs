//! Session-scoped snapshot of the four collections and the views derived from it.
//!
//! Loads run concurrently; a composite view is only built once every
//! collection it needs has settled. Engines only ever see `&Catalog`.

use crate::domain::aggregation::{describe_showings, resolve_tickets, ResolvedTicket, ShowingSummary};
use crate::domain::scheduling::{
    currently_showing, featured_movie, upcoming_preview, upcoming_showings,
};
use crate::domain::validation::ReferenceLookup;
use crate::domain::{
    Entity, EntityId, EntityKind, Movie, ReferenceError, Room, Showing, StoreError, StoredRecord,
    Ticket,
};
use crate::usecases::repository::EntityRepository;
use chrono::NaiveDateTime;
use tracing::{info, warn};

/// Owned, immutable-between-mutations copy of every collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub movies: Vec<Movie>,
    pub rooms: Vec<Room>,
    pub showings: Vec<Showing>,
    pub tickets: Vec<Ticket>,
}

/// Home page model.
#[derive(Debug, Clone, PartialEq)]
pub struct HomeView {
    pub featured: Option<Movie>,
    pub now_showing: Vec<Movie>,
    pub upcoming: Vec<ShowingSummary>,
    pub more_upcoming: bool,
}

impl Catalog {
    /// Loads all collections concurrently. Any failure fails the whole load.
    pub async fn load(repo: &EntityRepository) -> Result<Self, StoreError> {
        let (movies, rooms, showings, tickets) = tokio::try_join!(
            repo.list::<Movie>(),
            repo.list::<Room>(),
            repo.list::<Showing>(),
            repo.list::<Ticket>(),
        )
        .inspect_err(|e| warn!(error = %e, "catalog load failed"))?;

        info!(
            movies = movies.len(),
            rooms = rooms.len(),
            showings = showings.len(),
            tickets = tickets.len(),
            "catalog loaded"
        );
        Ok(Self {
            movies,
            rooms,
            showings,
            tickets,
        })
    }

    /// Re-reads one collection from the store, replacing the local copy only
    /// on success.
    pub async fn refresh(
        &mut self,
        repo: &EntityRepository,
        kind: EntityKind,
    ) -> Result<(), StoreError> {
        match kind {
            EntityKind::Movie => self.movies = repo.list().await?,
            EntityKind::Room => self.rooms = repo.list().await?,
            EntityKind::Showing => self.showings = repo.list().await?,
            EntityKind::Ticket => self.tickets = repo.list().await?,
        }
        Ok(())
    }

    /// Appends a record confirmed by the store.
    pub fn insert(&mut self, record: StoredRecord) {
        match record {
            StoredRecord::Movie(m) => self.movies.push(m),
            StoredRecord::Room(r) => self.rooms.push(r),
            StoredRecord::Showing(s) => self.showings.push(s),
            StoredRecord::Ticket(t) => self.tickets.push(t),
        }
    }

    /// Drops the record with `id`. Returns whether it was present.
    /// Records referencing it are left untouched.
    pub fn remove(&mut self, kind: EntityKind, id: &EntityId) -> bool {
        fn drop_id<E: Entity>(records: &mut Vec<E>, id: &EntityId) -> bool {
            let before = records.len();
            records.retain(|r| r.id() != id);
            records.len() != before
        }
        match kind {
            EntityKind::Movie => drop_id(&mut self.movies, id),
            EntityKind::Room => drop_id(&mut self.rooms, id),
            EntityKind::Showing => drop_id(&mut self.showings, id),
            EntityKind::Ticket => drop_id(&mut self.tickets, id),
        }
    }

    pub fn contains(&self, kind: EntityKind, id: &EntityId) -> bool {
        fn has<E: Entity>(records: &[E], id: &EntityId) -> bool {
            records.iter().any(|r| r.id() == id)
        }
        match kind {
            EntityKind::Movie => has(&self.movies, id),
            EntityKind::Room => has(&self.rooms, id),
            EntityKind::Showing => has(&self.showings, id),
            EntityKind::Ticket => has(&self.tickets, id),
        }
    }

    /// Tickets with showing, movie and room. Fails on any dangling reference.
    pub fn resolved_tickets(&self) -> Result<Vec<ResolvedTicket>, ReferenceError> {
        resolve_tickets(&self.tickets, &self.showings, &self.movies, &self.rooms)
            .inspect_err(|e| warn!(error = %e, "ticket view unavailable"))
    }

    /// All showings with lenient movie / room lookups, in catalog order.
    pub fn showing_summaries(&self) -> Vec<ShowingSummary> {
        describe_showings(&self.showings, &self.movies, &self.rooms)
    }

    /// Showings tickets can still be sold for, earliest first.
    pub fn sellable_showings(&self, now: NaiveDateTime) -> Vec<ShowingSummary> {
        describe_showings(
            &upcoming_showings(&self.showings, now),
            &self.movies,
            &self.rooms,
        )
    }

    pub fn home(&self, now: NaiveDateTime, preview_limit: usize) -> HomeView {
        let preview = upcoming_preview(&self.showings, now, preview_limit);
        HomeView {
            featured: featured_movie(&self.movies, &self.showings, now),
            now_showing: currently_showing(&self.movies, &self.showings, now),
            upcoming: describe_showings(&preview.showings, &self.movies, &self.rooms),
            more_upcoming: preview.has_more,
        }
    }
}

impl ReferenceLookup for Catalog {
    fn exists(&self, kind: EntityKind, id: &EntityId) -> bool {
        self.contains(kind, id)
    }

    fn showing_starts_at(&self, id: &EntityId) -> Option<NaiveDateTime> {
        self.showings
            .iter()
            .find(|s| &s.id == id)
            .map(|s| s.details.starts_at)
    }
}
