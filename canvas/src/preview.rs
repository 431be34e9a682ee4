//! Preview-mode action simulation and one-line summaries.
//!
//! Outside edit mode a tap on a region does not edit it; instead the host
//! shows what the action would do in a chat: a line in the simulated chat log
//! and, for actions that would leave the chat, a short-lived toast.

#[cfg(test)]
#[path = "preview_test.rs"]
mod preview_test;

use crate::consts::TOAST_DURATION_MS;
use crate::doc::Action;

/// What the simulated chat shows after a tap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewOutcome {
    /// Line appended to the chat log.
    pub chat: String,
    /// Transient notice, if the action would open something outside the chat.
    pub toast: Option<String>,
}

/// A visible toast and the time it should disappear.
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub message: String,
    pub expires_at_ms: f64,
}

impl Toast {
    /// A toast shown at `now_ms` for the standard duration.
    #[must_use]
    pub fn new(message: String, now_ms: f64) -> Self {
        Self { message, expires_at_ms: now_ms + TOAST_DURATION_MS }
    }

    #[must_use]
    pub fn is_expired(&self, now_ms: f64) -> bool {
        now_ms >= self.expires_at_ms
    }
}

/// Simulate tapping a region bound to `action`.
#[must_use]
pub fn simulate(action: &Action) -> PreviewOutcome {
    match action {
        Action::Message { text } => {
            let chat = if text.is_empty() { "(empty message)".to_owned() } else { text.clone() };
            PreviewOutcome { chat, toast: None }
        }
        Action::Uri { uri } => PreviewOutcome { chat: format!("Open link: {uri}"), toast: Some(format!("URI: {uri}")) },
        Action::Postback { data, display_text, .. } => {
            // The platform echoes displayText into the chat as the user's message.
            let chat = match display_text {
                Some(shown) if !shown.is_empty() => format!("{shown} (postback: {data})"),
                _ => format!("Postback: {data}"),
            };
            PreviewOutcome { chat, toast: None }
        }
        Action::DatetimePicker { data, mode, .. } => PreviewOutcome {
            chat: format!("Date/time picker ({}): {data}", mode.as_str()),
            toast: Some("Date/time picker".to_owned()),
        },
        Action::RichMenuSwitch { rich_menu_alias_id, .. } => {
            let target = if rich_menu_alias_id.is_empty() { "(unset)" } else { rich_menu_alias_id.as_str() };
            PreviewOutcome { chat: format!("Switch rich menu: {target}"), toast: Some("Rich menu switch".to_owned()) }
        }
    }
}

/// One-line description used as a region tooltip.
#[must_use]
pub fn summarize(action: &Action) -> String {
    match action {
        Action::Uri { uri } => format!("URI: {uri}"),
        Action::Message { text } => format!("Message: {text}"),
        Action::Postback { data, .. } => format!("Postback: {data}"),
        Action::DatetimePicker { mode, .. } => format!("Date/time picker ({})", mode.as_str()),
        Action::RichMenuSwitch { rich_menu_alias_id, .. } => format!("Rich menu switch: {rich_menu_alias_id}"),
    }
}
