//! Domain entities. Pure data structures for the cinema catalog.
//!
//! Shapes mirror the record store's JSON (camelCase). No HTTP types here.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Opaque identifier assigned by the record store.
///
/// Stores disagree on whether ids are numbers or strings, so decoding accepts
/// both; encoding always emits a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Int(i64),
            Uint(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => EntityId(s),
            RawId::Int(n) => EntityId(n.to_string()),
            RawId::Uint(n) => EntityId(n.to_string()),
        })
    }
}

/// The four independently stored collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Movie,
    Room,
    Showing,
    Ticket,
}

impl EntityKind {
    /// Collection path segment on the record store (`/movies`, ...).
    pub fn collection(self) -> &'static str {
        match self {
            Self::Movie => "movies",
            Self::Room => "rooms",
            Self::Showing => "showings",
            Self::Ticket => "tickets",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Movie => "movie",
            Self::Room => "room",
            Self::Showing => "showing",
            Self::Ticket => "ticket",
        })
    }
}

/// Fixed ticket categories. Legacy records spelled them "Inteira" / "Meia".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TicketKind {
    #[serde(alias = "Inteira")]
    Full,
    #[serde(alias = "Meia")]
    Half,
}

impl TicketKind {
    pub const ALL: [TicketKind; 2] = [Self::Full, Self::Half];
}

impl fmt::Display for TicketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Full => "Full",
            Self::Half => "Half",
        })
    }
}

impl FromStr for TicketKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Full" | "Inteira" => Ok(Self::Full),
            "Half" | "Meia" => Ok(Self::Half),
            _ => Err(()),
        }
    }
}

/// Amount in cents. Travels over the wire as a decimal number (`20.0`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money {
    cents: i64,
}

impl Money {
    pub const ZERO: Money = Money { cents: 0 };

    pub const fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    pub const fn cents(self) -> i64 {
        self.cents
    }

    pub fn as_f64(self) -> f64 {
        self.cents as f64 / 100.0
    }
}

impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money::from_cents(self.cents + rhs.cents)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.cents < 0 { "-" } else { "" };
        let abs = self.cents.abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        Ok(Money::from_cents((value * 100.0).round() as i64))
    }
}

/// Local wall-clock datetimes as produced by a `datetime-local` input.
///
/// Encodes as `YYYY-MM-DDTHH:MM`; decodes with or without seconds, and also
/// accepts RFC 3339 (converted to local time).
pub mod local_datetime {
    use chrono::{DateTime, Local, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];
    const OUTPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

    pub fn parse(input: &str) -> Option<NaiveDateTime> {
        let input = input.trim();
        FORMATS
            .iter()
            .find_map(|f| NaiveDateTime::parse_from_str(input, f).ok())
            .or_else(|| {
                DateTime::parse_from_rfc3339(input)
                    .ok()
                    .map(|dt| dt.with_timezone(&Local).naive_local())
            })
    }

    pub fn format(value: &NaiveDateTime) -> String {
        value.format(OUTPUT_FORMAT).to_string()
    }

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format(value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid datetime: {}", raw)))
    }
}

/// A movie in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: EntityId,
    #[serde(flatten)]
    pub details: NewMovie,
}

/// Movie fields as submitted to the store (no id yet).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMovie {
    pub title: String,
    pub synopsis: String,
    pub rating: String,
    /// Minutes.
    pub duration: u32,
    pub genre: String,
    pub release_date: String,
}

/// A screening room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: EntityId,
    #[serde(flatten)]
    pub details: NewRoom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRoom {
    pub number: u32,
    pub capacity: u32,
}

/// A scheduled screening of one movie in one room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Showing {
    pub id: EntityId,
    #[serde(flatten)]
    pub details: NewShowing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewShowing {
    pub movie_id: EntityId,
    pub room_id: EntityId,
    #[serde(with = "local_datetime")]
    pub starts_at: NaiveDateTime,
}

/// A sold ticket. Financial record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: EntityId,
    #[serde(flatten)]
    pub details: NewTicket,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTicket {
    pub showing_id: EntityId,
    pub kind: TicketKind,
    pub price: Money,
}

/// Implemented by every stored entity so collections can be handled generically.
pub trait Entity: Clone + Serialize + serde::de::DeserializeOwned + Send + Sync {
    const KIND: EntityKind;

    fn id(&self) -> &EntityId;
}

impl Entity for Movie {
    const KIND: EntityKind = EntityKind::Movie;

    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Entity for Room {
    const KIND: EntityKind = EntityKind::Room;

    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Entity for Showing {
    const KIND: EntityKind = EntityKind::Showing;

    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Entity for Ticket {
    const KIND: EntityKind = EntityKind::Ticket;

    fn id(&self) -> &EntityId {
        &self.id
    }
}

/// Any record returned by the store after a create.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredRecord {
    Movie(Movie),
    Room(Room),
    Showing(Showing),
    Ticket(Ticket),
}

impl StoredRecord {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Movie(_) => EntityKind::Movie,
            Self::Room(_) => EntityKind::Room,
            Self::Showing(_) => EntityKind::Showing,
            Self::Ticket(_) => EntityKind::Ticket,
        }
    }

    pub fn id(&self) -> &EntityId {
        match self {
            Self::Movie(m) => &m.id,
            Self::Room(r) => &r.id,
            Self::Showing(s) => &s.id,
            Self::Ticket(t) => &t.id,
        }
    }
}
