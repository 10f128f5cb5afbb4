//! Domain model for the conversational core.
//!
//! Everything here is pure: event classification, the dialog state
//! machine, keyword matching, callback decoding and the routing table.

mod action;
mod command;
mod dialog;
mod event;
mod proposal;
mod reply;
mod routing;

pub use action::{CallbackAction, CallbackDecodeError, ListFilter, MenuItem, TaskAction};
pub use command::{BotCommand, default_commands};
pub use dialog::{
    DescriptionInput, DialogDraft, DialogError, DialogPhase, DialogSession, SKIP_COMMAND,
    SessionKey,
};
pub use event::{CallbackEvent, CommandEvent, InboundEvent, Sender, TextEvent};
pub use proposal::{PendingProposal, ProposalKey, TriggerMatcher, TriggerMatcherError};
pub use reply::{Button, Keyboard, Reply};
pub use routing::{
    EventMatcher, MENU_COMMANDS, PLANNING_COMMANDS, ROUTING_TABLE, Route, RouteRule, resolve,
};
