//! Implements InputPort. Inquire-based interactive menus over the catalog.
//!
//! Prompts only collect raw input; validation, persistence and
//! notifications belong to the orchestrator.

use crate::adapters::export::write_sales_report;
use crate::adapters::ui::progress::with_spinner;
use crate::domain::entities::local_datetime;
use crate::domain::validation::{MovieDraft, RawRecord, RoomDraft, ShowingDraft};
use crate::domain::{
    price_for, DomainError, EntityId, EntityKind, FieldErrors, Movie, ResolvedTicket, Room,
    ShowingSummary, TicketKind,
};
use crate::ports::InputPort;
use crate::usecases::{HomeView, MutationOrchestrator, MutationOutcome};
use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime};
use crossterm::ExecutableCommand;
use crossterm::style::{Color as TermColor, Print, ResetColor, SetForegroundColor};
use inquire::ui::{Color, RenderConfig, StyleSheet, Styled};
use inquire::{CustomType, InquireError, Select, Text};
use std::fmt;
use std::io::{Write, stdout};
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Applies the marquee theme to every subsequent inquire prompt.
pub fn apply_theme() {
    let config = RenderConfig::default()
        .with_prompt_prefix(Styled::new("›").with_fg(Color::LightRed))
        .with_highlighted_option_prefix(Styled::new("▶").with_fg(Color::LightYellow))
        .with_answer(StyleSheet::new().with_fg(Color::LightYellow))
        .with_help_message(StyleSheet::new().with_fg(Color::DarkGrey));
    inquire::set_global_render_config(config);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MainMenu {
    Home,
    Movies,
    Rooms,
    Showings,
    Tickets,
    ExportReport,
    Reload,
    Quit,
}

impl MainMenu {
    const ALL: [MainMenu; 8] = [
        MainMenu::Home,
        MainMenu::Movies,
        MainMenu::Rooms,
        MainMenu::Showings,
        MainMenu::Tickets,
        MainMenu::ExportReport,
        MainMenu::Reload,
        MainMenu::Quit,
    ];
}

impl fmt::Display for MainMenu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MainMenu::Home => "Home",
            MainMenu::Movies => "Movies",
            MainMenu::Rooms => "Rooms",
            MainMenu::Showings => "Showings",
            MainMenu::Tickets => "Tickets",
            MainMenu::ExportReport => "Export sales report (CSV)",
            MainMenu::Reload => "Reload from store",
            MainMenu::Quit => "Quit",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageAction {
    Add,
    SellTicket,
    Delete,
    Back,
}

impl PageAction {
    fn for_kind(kind: EntityKind) -> Vec<PageAction> {
        match kind {
            EntityKind::Movie | EntityKind::Room => {
                vec![PageAction::Add, PageAction::Delete, PageAction::Back]
            }
            EntityKind::Showing => vec![
                PageAction::Add,
                PageAction::SellTicket,
                PageAction::Delete,
                PageAction::Back,
            ],
            EntityKind::Ticket => {
                vec![PageAction::SellTicket, PageAction::Delete, PageAction::Back]
            }
        }
    }
}

impl fmt::Display for PageAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PageAction::Add => "Add",
            PageAction::SellTicket => "Sell ticket",
            PageAction::Delete => "Delete",
            PageAction::Back => "Back",
        };
        f.write_str(label)
    }
}

/// Selectable record: display label plus the id it stands for.
#[derive(Debug, Clone, PartialEq)]
struct Choice {
    id: EntityId,
    label: String,
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

fn movie_choices(movies: &[Movie]) -> Vec<Choice> {
    movies
        .iter()
        .map(|m| Choice {
            id: m.id.clone(),
            label: format!("{} ({} min, {})", m.details.title, m.details.duration, m.details.genre),
        })
        .collect()
}

fn room_choices(rooms: &[Room]) -> Vec<Choice> {
    rooms
        .iter()
        .map(|r| Choice {
            id: r.id.clone(),
            label: format!("Room {} ({} seats)", r.details.number, r.details.capacity),
        })
        .collect()
}

fn showing_choices(summaries: &[ShowingSummary]) -> Vec<Choice> {
    summaries
        .iter()
        .map(|s| Choice {
            id: s.showing.id.clone(),
            label: s.to_string(),
        })
        .collect()
}

fn ticket_choices(tickets: &[ResolvedTicket]) -> Vec<Choice> {
    tickets
        .iter()
        .map(|t| Choice {
            id: t.ticket.id.clone(),
            label: ticket_line(t),
        })
        .collect()
}

fn ticket_line(t: &ResolvedTicket) -> String {
    format!(
        "#{} {} | Room {} | {} | {} {}",
        t.ticket.id,
        t.showing.movie.details.title,
        t.showing.room.details.number,
        t.showing.showing.details.starts_at.format("%Y-%m-%d %H:%M"),
        t.ticket.details.kind,
        t.ticket.details.price
    )
}

fn home_lines(home: &HomeView) -> Vec<String> {
    let mut lines = Vec::new();
    match &home.featured {
        Some(m) => lines.push(format!(
            "Featured: {} ({}, {} min, rated {})",
            m.details.title, m.details.genre, m.details.duration, m.details.rating
        )),
        None => lines.push("Featured: nothing scheduled".to_string()),
    }
    lines.push(format!("Now showing ({}):", home.now_showing.len()));
    lines.extend(home.now_showing.iter().map(|m| format!("  {}", m.details.title)));
    lines.push("Upcoming showings:".to_string());
    if home.upcoming.is_empty() {
        lines.push("  none".to_string());
    }
    lines.extend(home.upcoming.iter().map(|s| format!("  {}", s)));
    if home.more_upcoming {
        lines.push("  ... more in Showings".to_string());
    }
    lines
}

fn field_error_lines(errors: &FieldErrors) -> Vec<String> {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect()
}

fn outcome_lines(outcome: &MutationOutcome) -> Vec<String> {
    match outcome {
        MutationOutcome::Invalid(errors) => field_error_lines(errors),
        MutationOutcome::Declined => vec!["Cancelled.".to_string()],
        MutationOutcome::Busy => vec!["Another request is still running.".to_string()],
        MutationOutcome::Persisted(_)
        | MutationOutcome::Deleted { .. }
        | MutationOutcome::Failed(_) => Vec::new(),
    }
}

fn print_lines(lines: &[String]) {
    let mut out = stdout();
    for line in lines {
        let _ = out.execute(Print(format!("{}\r\n", line)));
    }
    let _ = out.flush();
}

fn print_colored(lines: &[String], color: TermColor) {
    let mut out = stdout();
    let _ = out.execute(SetForegroundColor(color));
    for line in lines {
        let _ = out.execute(Print(format!("{}\r\n", line)));
    }
    let _ = out.execute(ResetColor);
    let _ = out.flush();
}

fn report(outcome: &MutationOutcome) {
    let lines = outcome_lines(outcome);
    match outcome {
        MutationOutcome::Invalid(_) => print_colored(&lines, TermColor::Red),
        _ => print_colored(&lines, TermColor::Yellow),
    }
}

/// Esc / Ctrl-C yield `None`; any other prompt failure is a UI error.
fn ask<T>(answer: Result<T, InquireError>) -> Result<Option<T>, DomainError> {
    match answer {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(DomainError::Ui(e.to_string())),
    }
}

/// Picks one record id. An empty list yields an empty selection so the
/// validator reports the missing choice.
fn pick(message: &str, choices: Vec<Choice>) -> Result<Option<String>, DomainError> {
    if choices.is_empty() {
        return Ok(Some(String::new()));
    }
    Ok(ask(Select::new(message, choices).prompt())?.map(|c| c.id.to_string()))
}

fn ask_text(message: &str, placeholder: &str) -> Result<Option<String>, DomainError> {
    ask(Text::new(message).with_placeholder(placeholder).prompt())
}

fn ask_number(message: &str) -> Result<Option<i64>, DomainError> {
    ask(CustomType::<i64>::new(message)
        .with_error_message("Enter a whole number")
        .prompt())
}

fn movie_form() -> Result<Option<MovieDraft>, DomainError> {
    let Some(title) = ask_text("Title:", "")? else {
        return Ok(None);
    };
    let Some(synopsis) = ask_text("Synopsis:", "at least 10 characters")? else {
        return Ok(None);
    };
    let Some(rating) = ask_text("Rating:", "e.g. 12, 16, L")? else {
        return Ok(None);
    };
    let Some(duration) = ask_number("Duration (minutes):")? else {
        return Ok(None);
    };
    let Some(genre) = ask_text("Genre:", "")? else {
        return Ok(None);
    };
    let Some(release_date) = ask_text("Release date:", "YYYY-MM-DD")? else {
        return Ok(None);
    };
    Ok(Some(MovieDraft {
        title,
        synopsis,
        rating,
        duration,
        genre,
        release_date,
    }))
}

fn room_form() -> Result<Option<RoomDraft>, DomainError> {
    let Some(number) = ask_number("Room number:")? else {
        return Ok(None);
    };
    let Some(capacity) = ask_number("Capacity:")? else {
        return Ok(None);
    };
    Ok(Some(RoomDraft { number, capacity }))
}

/// Tomorrow at 20:00, offered as the default start time.
fn suggested_start(now: NaiveDateTime) -> String {
    let tomorrow = (now + Duration::days(1)).date();
    tomorrow
        .and_hms_opt(20, 0, 0)
        .map(|dt| local_datetime::format(&dt))
        .unwrap_or_default()
}

fn showing_form(
    movies: &[Movie],
    rooms: &[Room],
    now: NaiveDateTime,
) -> Result<Option<ShowingDraft>, DomainError> {
    let Some(movie_id) = pick("Movie:", movie_choices(movies))? else {
        return Ok(None);
    };
    let Some(room_id) = pick("Room:", room_choices(rooms))? else {
        return Ok(None);
    };
    let default_start = suggested_start(now);
    let Some(starts_at) = ask(Text::new("Starts at:")
        .with_default(&default_start)
        .with_help_message("YYYY-MM-DDTHH:MM, local time")
        .prompt())?
    else {
        return Ok(None);
    };
    Ok(Some(ShowingDraft {
        movie_id,
        room_id,
        starts_at,
    }))
}

fn tariff_lines() -> Vec<String> {
    TicketKind::ALL
        .iter()
        .map(|kind| format!("{}: {}", kind, price_for(*kind)))
        .collect()
}

/// TUI adapter. Owns the orchestrator for the session.
pub struct TuiInputPort {
    orchestrator: Mutex<MutationOrchestrator>,
    preview_limit: usize,
    export_dir: PathBuf,
}

impl TuiInputPort {
    pub fn new(
        orchestrator: MutationOrchestrator,
        preview_limit: usize,
        export_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            orchestrator: Mutex::new(orchestrator),
            preview_limit,
            export_dir: export_dir.into(),
        }
    }

    async fn show_home(&self) -> Result<(), DomainError> {
        let orch = self.orchestrator.lock().await;
        let home = orch.catalog().home(orch.now(), self.preview_limit);
        print_lines(&home_lines(&home));
        Ok(())
    }

    fn listing(orch: &MutationOrchestrator, kind: EntityKind) -> Vec<String> {
        let catalog = orch.catalog();
        let lines: Vec<String> = match kind {
            EntityKind::Movie => movie_choices(&catalog.movies)
                .into_iter()
                .map(|c| c.label)
                .collect(),
            EntityKind::Room => room_choices(&catalog.rooms)
                .into_iter()
                .map(|c| c.label)
                .collect(),
            EntityKind::Showing => catalog
                .showing_summaries()
                .iter()
                .map(|s| s.to_string())
                .collect(),
            EntityKind::Ticket => match catalog.resolved_tickets() {
                Ok(tickets) => tickets.iter().map(ticket_line).collect(),
                Err(e) => vec![format!("Tickets unavailable: {}", e)],
            },
        };
        if lines.is_empty() {
            vec![format!("No {}s yet.", kind)]
        } else {
            lines
        }
    }

    async fn page(&self, kind: EntityKind) -> Result<(), DomainError> {
        loop {
            {
                let orch = self.orchestrator.lock().await;
                print_lines(&Self::listing(&orch, kind));
            }
            let action = ask(Select::new("Action:", PageAction::for_kind(kind)).prompt())?;
            match action {
                Some(PageAction::Add) => self.add(kind).await?,
                Some(PageAction::SellTicket) => self.sell_ticket().await?,
                Some(PageAction::Delete) => self.delete(kind).await?,
                Some(PageAction::Back) | None => return Ok(()),
            }
        }
    }

    async fn add(&self, kind: EntityKind) -> Result<(), DomainError> {
        let mut orch = self.orchestrator.lock().await;
        let raw = match kind {
            EntityKind::Movie => movie_form()?.map(RawRecord::Movie),
            EntityKind::Room => room_form()?.map(RawRecord::Room),
            EntityKind::Showing => {
                let catalog = orch.catalog();
                showing_form(&catalog.movies, &catalog.rooms, orch.now())?.map(RawRecord::Showing)
            }
            EntityKind::Ticket => return Ok(()),
        };
        let Some(raw) = raw else {
            return Ok(());
        };
        let outcome = orch.submit(raw).await;
        report(&outcome);
        Ok(())
    }

    async fn sell_ticket(&self) -> Result<(), DomainError> {
        let mut orch = self.orchestrator.lock().await;
        let summaries = orch.catalog().sellable_showings(orch.now());
        if summaries.is_empty() {
            print_lines(&["No upcoming showings to sell tickets for.".to_string()]);
            return Ok(());
        }
        let Some(showing) = ask(Select::new("Showing:", showing_choices(&summaries)).prompt())?
        else {
            return Ok(());
        };
        print_lines(&tariff_lines());
        let Some(kind) = ask(Select::new("Ticket kind:", TicketKind::ALL.to_vec()).prompt())? else {
            return Ok(());
        };
        let outcome = orch.sell_ticket(&showing.id, kind).await;
        report(&outcome);
        Ok(())
    }

    async fn delete(&self, kind: EntityKind) -> Result<(), DomainError> {
        let mut orch = self.orchestrator.lock().await;
        let catalog = orch.catalog();
        let choices = match kind {
            EntityKind::Movie => movie_choices(&catalog.movies),
            EntityKind::Room => room_choices(&catalog.rooms),
            EntityKind::Showing => showing_choices(&catalog.showing_summaries()),
            EntityKind::Ticket => match catalog.resolved_tickets() {
                Ok(tickets) => ticket_choices(&tickets),
                Err(_) => catalog
                    .tickets
                    .iter()
                    .map(|t| Choice {
                        id: t.id.clone(),
                        label: format!("#{} {} {}", t.id, t.details.kind, t.details.price),
                    })
                    .collect(),
            },
        };
        if choices.is_empty() {
            print_lines(&[format!("No {}s to delete.", kind)]);
            return Ok(());
        }
        let Some(choice) = ask(Select::new("Delete which?", choices).prompt())? else {
            return Ok(());
        };
        let outcome = orch.delete(kind, &choice.id).await;
        report(&outcome);
        Ok(())
    }

    async fn export_report(&self) -> Result<(), DomainError> {
        let tickets = {
            let orch = self.orchestrator.lock().await;
            orch.catalog().resolved_tickets()?
        };
        let stem = format!("sales-{}", chrono::Local::now().format("%Y%m%d-%H%M%S"));
        let path = write_sales_report(&self.export_dir, &stem, &tickets).await?;
        print_colored(
            &[format!("Report written to {}", path.display())],
            TermColor::Green,
        );
        Ok(())
    }

    async fn reload(&self) -> Result<(), DomainError> {
        let mut orch = self.orchestrator.lock().await;
        with_spinner("Loading catalog...", orch.reload()).await?;
        info!("catalog reloaded");
        Ok(())
    }
}

#[async_trait]
impl InputPort for TuiInputPort {
    async fn run(&self) -> Result<(), DomainError> {
        self.show_home().await?;
        loop {
            let choice = ask(Select::new("Main menu", MainMenu::ALL.to_vec()).prompt())?
                .unwrap_or(MainMenu::Quit);
            let result = match choice {
                MainMenu::Home => self.show_home().await,
                MainMenu::Movies => self.page(EntityKind::Movie).await,
                MainMenu::Rooms => self.page(EntityKind::Room).await,
                MainMenu::Showings => self.page(EntityKind::Showing).await,
                MainMenu::Tickets => self.page(EntityKind::Ticket).await,
                MainMenu::ExportReport => self.export_report().await,
                MainMenu::Reload => self.reload().await,
                MainMenu::Quit => return Ok(()),
            };
            if let Err(e) = result {
                warn!(error = %e, menu = %choice, "menu action failed");
                print_colored(&[e.to_string()], TermColor::Red);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewMovie, Money, StoreError, StoredRecord};
    use chrono::NaiveDate;

    fn movie(id: &str, title: &str) -> Movie {
        Movie {
            id: EntityId::new(id),
            details: NewMovie {
                title: title.into(),
                synopsis: "A long enough synopsis".into(),
                rating: "14".into(),
                duration: 120,
                genre: "Drama".into(),
                release_date: "2030-01-01".into(),
            },
        }
    }

    #[test]
    fn test_page_actions_per_kind() {
        assert!(!PageAction::for_kind(EntityKind::Ticket).contains(&PageAction::Add));
        assert!(PageAction::for_kind(EntityKind::Showing).contains(&PageAction::SellTicket));
        assert_eq!(PageAction::for_kind(EntityKind::Movie).last(), Some(&PageAction::Back));
    }

    #[test]
    fn test_movie_choice_keeps_id() {
        let choices = movie_choices(&[movie("7", "Dune")]);
        assert_eq!(choices[0].id, EntityId::new("7"));
        assert_eq!(choices[0].to_string(), "Dune (120 min, Drama)");
    }

    #[test]
    fn test_home_lines_without_featured() {
        let home = HomeView {
            featured: None,
            now_showing: vec![],
            upcoming: vec![],
            more_upcoming: false,
        };
        let lines = home_lines(&home);
        assert_eq!(lines[0], "Featured: nothing scheduled");
        assert!(lines.contains(&"  none".to_string()));
    }

    #[test]
    fn test_home_lines_flags_more_upcoming() {
        let home = HomeView {
            featured: Some(movie("1", "Dune")),
            now_showing: vec![movie("1", "Dune")],
            upcoming: vec![],
            more_upcoming: true,
        };
        let lines = home_lines(&home);
        assert!(lines[0].starts_with("Featured: Dune"));
        assert_eq!(lines.last().map(String::as_str), Some("  ... more in Showings"));
    }

    #[test]
    fn test_outcome_lines() {
        let mut errors = FieldErrors::new();
        errors.add("title", "Title is required");
        assert_eq!(
            outcome_lines(&MutationOutcome::Invalid(errors)),
            vec!["title: Title is required".to_string()]
        );
        assert_eq!(outcome_lines(&MutationOutcome::Declined), vec!["Cancelled.".to_string()]);
        assert!(outcome_lines(&MutationOutcome::Failed(StoreError::Transport("down".into())))
            .is_empty());
        assert!(outcome_lines(&MutationOutcome::Persisted(StoredRecord::Movie(movie("1", "X"))))
            .is_empty());
    }

    #[test]
    fn test_suggested_start_is_tomorrow_evening() {
        let now = NaiveDate::from_ymd_opt(2030, 6, 1)
            .and_then(|d| d.and_hms_opt(9, 15, 0))
            .unwrap();
        assert_eq!(suggested_start(now), "2030-06-02T20:00");
    }

    #[test]
    fn test_tariff_lines() {
        assert_eq!(
            tariff_lines(),
            vec![
                format!("Full: {}", Money::from_cents(2000)),
                format!("Half: {}", Money::from_cents(1000)),
            ]
        );
    }

    #[test]
    fn test_ask_maps_cancel_to_none() {
        let answer: Result<Option<i32>, _> = ask(Err(InquireError::OperationCanceled));
        assert!(matches!(answer, Ok(None)));
        let failed: Result<Option<i32>, _> = ask(Err(InquireError::NotTTY));
        assert!(matches!(failed, Err(DomainError::Ui(_))));
    }
}
