//! Console implementations of the Notifier and Confirmer ports.

use crate::ports::{Confirmer, Notification, NotificationLevel, Notifier};
use async_trait::async_trait;
use crossterm::ExecutableCommand;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use inquire::Confirm;
use std::io::{Write, stdout};
use tracing::debug;

fn color_for(level: NotificationLevel) -> Color {
    match level {
        NotificationLevel::Success => Color::Green,
        NotificationLevel::Failure => Color::Red,
    }
}

fn prefix_for(level: NotificationLevel) -> &'static str {
    match level {
        NotificationLevel::Success => "✔",
        NotificationLevel::Failure => "✘",
    }
}

/// Prints notifications as one colored line each.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        let mut out = stdout();
        let _ = out.execute(SetForegroundColor(color_for(notification.level)));
        let _ = out.execute(Print(format!(
            "{} {}\r\n",
            prefix_for(notification.level),
            notification.message
        )));
        let _ = out.execute(ResetColor);
        let _ = out.flush();
    }
}

/// Yes/no prompt. Defaults to "no"; a cancelled prompt counts as "no".
#[derive(Debug, Default, Clone, Copy)]
pub struct InquireConfirmer;

#[async_trait]
impl Confirmer for InquireConfirmer {
    async fn confirm(&self, question: &str) -> bool {
        match Confirm::new(question).with_default(false).prompt() {
            Ok(answer) => answer,
            Err(e) => {
                debug!(error = %e, "confirmation prompt aborted");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_map_to_distinct_styles() {
        assert_ne!(
            color_for(NotificationLevel::Success),
            color_for(NotificationLevel::Failure)
        );
        assert_eq!(prefix_for(NotificationLevel::Failure), "✘");
    }
}
