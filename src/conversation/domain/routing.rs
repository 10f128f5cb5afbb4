//! Declarative routing of inbound events to handler groups.
//!
//! [`ROUTING_TABLE`] is evaluated top to bottom once per event; the first
//! matching row owns the event and later rows never see it.

use super::dialog::{DialogPhase, SKIP_COMMAND};
use super::event::InboundEvent;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handler group that consumes an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// Greeting, menu and help.
    Menu,
    /// Task list with filters.
    TaskList,
    /// Task-creation dialog.
    TaskDialog,
    /// Weekly board, digest, overdue list and meeting log.
    Planning,
    /// Button presses.
    Callback,
    /// Keyword detection on free text.
    KeywordDetector,
}

impl Route {
    /// Returns the label used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Menu => "menu",
            Self::TaskList => "task_list",
            Self::TaskDialog => "task_dialog",
            Self::Planning => "planning",
            Self::Callback => "callback",
            Self::KeywordDetector => "keyword_detector",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Condition of one routing row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventMatcher {
    /// Any command with one of these names.
    Commands(&'static [&'static str]),
    /// A command with this name while the sender's dialog is in `phase`.
    CommandInPhase {
        /// Command name.
        name: &'static str,
        /// Required dialog phase.
        phase: DialogPhase,
    },
    /// Free text while the sender has a dialog in progress.
    TextInActiveDialog,
    /// Any button press.
    AnyCallback,
    /// Any free text.
    AnyText,
}

impl EventMatcher {
    /// Returns whether the event satisfies this condition.
    #[must_use]
    pub fn matches(&self, event: &InboundEvent, phase: DialogPhase) -> bool {
        match (self, event) {
            (Self::Commands(names), InboundEvent::Command(command)) => {
                names.contains(&command.name.as_str())
            }
            (Self::CommandInPhase { name, phase: required }, InboundEvent::Command(command)) => {
                command.name == *name && phase == *required
            }
            (Self::TextInActiveDialog, InboundEvent::TextMessage(_)) => phase.is_active(),
            (Self::AnyCallback, InboundEvent::CallbackQuery(_))
            | (Self::AnyText, InboundEvent::TextMessage(_)) => true,
            _ => false,
        }
    }
}

/// One row of the routing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteRule {
    /// Condition.
    pub matcher: EventMatcher,
    /// Handler group receiving matching events.
    pub route: Route,
}

/// Command names handled by the menu group.
pub const MENU_COMMANDS: &[&str] = &["start", "menu", "help"];
/// Command names handled by the planning group.
pub const PLANNING_COMMANDS: &[&str] = &["week", "meeting", "meetings", "digest", "overdue"];

/// Ordered routing table; earlier rows take precedence.
pub const ROUTING_TABLE: &[RouteRule] = &[
    RouteRule {
        matcher: EventMatcher::Commands(MENU_COMMANDS),
        route: Route::Menu,
    },
    RouteRule {
        matcher: EventMatcher::Commands(&["tasks"]),
        route: Route::TaskList,
    },
    RouteRule {
        matcher: EventMatcher::Commands(&["task"]),
        route: Route::TaskDialog,
    },
    RouteRule {
        matcher: EventMatcher::CommandInPhase {
            name: SKIP_COMMAND,
            phase: DialogPhase::AwaitingDescription,
        },
        route: Route::TaskDialog,
    },
    RouteRule {
        matcher: EventMatcher::TextInActiveDialog,
        route: Route::TaskDialog,
    },
    RouteRule {
        matcher: EventMatcher::Commands(PLANNING_COMMANDS),
        route: Route::Planning,
    },
    RouteRule {
        matcher: EventMatcher::AnyCallback,
        route: Route::Callback,
    },
    RouteRule {
        matcher: EventMatcher::AnyText,
        route: Route::KeywordDetector,
    },
];

/// Returns the route owning `event`, or `None` when no row matches.
#[must_use]
pub fn resolve(event: &InboundEvent, phase: DialogPhase) -> Option<Route> {
    ROUTING_TABLE
        .iter()
        .find(|rule| rule.matcher.matches(event, phase))
        .map(|rule| rule.route)
}
