//! Core domain layer. No external I/O dependencies.
//!
//! Entities and business rules live here: schema validation, aggregation of
//! stored records into composite views, and scheduling. Dependencies flow inward.

pub mod aggregation;
pub mod entities;
pub mod errors;
pub mod scheduling;
pub mod validation;

pub use aggregation::{
    describe_showings, resolve_showing, resolve_tickets, Lookup, ResolvedShowing,
    ResolvedTicket, ShowingSummary,
};
pub use entities::{
    Entity, EntityId, EntityKind, Money, Movie, NewMovie, NewRoom, NewShowing, NewTicket, Room,
    Showing, StoredRecord, Ticket, TicketKind,
};
pub use errors::{DomainError, FieldError, FieldErrors, ReferenceError, StoreError};
pub use scheduling::{
    currently_showing, featured_movie, price_for, upcoming_preview, upcoming_showings,
    UpcomingPreview,
};
pub use validation::{
    validate, validate_referenced, MovieDraft, RawRecord, ReferenceLookup, RoomDraft,
    ShowingDraft, TicketDraft, ValidatedRecord,
};
