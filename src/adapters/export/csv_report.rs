//! Ticket sales report. Uses the `csv` crate for safe serialization.
//!
//! Only a fully resolved ticket set can be exported; a dangling reference
//! fails the export upstream in the aggregation step.

use crate::domain::entities::local_datetime;
use crate::domain::{DomainError, Money, ResolvedTicket};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

/// Convert resolved tickets to a `;`-delimited CSV string with a total row.
///
/// Format: `Ticket;Movie;Room;StartsAt;Kind;Price`
pub fn tickets_to_csv(tickets: &[ResolvedTicket]) -> Result<String, csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .from_writer(Vec::new());

    wtr.write_record(["Ticket", "Movie", "Room", "StartsAt", "Kind", "Price"])?;

    for t in tickets {
        let room = t.showing.room.details.number.to_string();
        let starts_at = local_datetime::format(&t.showing.showing.details.starts_at);
        let kind = t.ticket.details.kind.to_string();
        let price = t.ticket.details.price.to_string();
        wtr.write_record([
            t.ticket.id.as_str(),
            t.showing.movie.details.title.as_str(),
            room.as_str(),
            starts_at.as_str(),
            kind.as_str(),
            price.as_str(),
        ])?;
    }

    let total: Money = tickets.iter().map(|t| t.ticket.details.price).sum();
    let total = total.to_string();
    wtr.write_record(["TOTAL", "", "", "", "", total.as_str()])?;

    wtr.flush()?;
    let bytes = wtr.into_inner().map_err(|e| {
        csv::Error::from(std::io::Error::new(
            std::io::ErrorKind::Other,
            e.to_string(),
        ))
    })?;

    String::from_utf8(bytes).map_err(|e| {
        csv::Error::from(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            e.to_string(),
        ))
    })
}

/// Write the sales report into `dir` (created if missing). Returns the file path.
pub async fn write_sales_report(
    dir: impl AsRef<Path>,
    file_stem: &str,
    tickets: &[ResolvedTicket],
) -> Result<PathBuf, DomainError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)
        .await
        .map_err(|e| DomainError::Export(format!("create report dir: {}", e)))?;

    let content =
        tickets_to_csv(tickets).map_err(|e| DomainError::Export(format!("build CSV: {}", e)))?;
    let path = dir.join(format!("{}.csv", file_stem));
    fs::write(&path, content)
        .await
        .map_err(|e| DomainError::Export(format!("write report: {}", e)))?;

    info!(path = %path.display(), tickets = tickets.len(), "sales report written");
    Ok(path)
}
