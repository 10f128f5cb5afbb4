//! Handlers for the conversational core and the dispatcher that routes to
//! them.

mod callback;
mod context;
mod dialog;
mod dispatcher;
mod error;
mod feedback;
mod keyboards;
mod lanes;
mod listing;
mod menu;
mod planning;
mod proposal;
mod templates;

pub use callback::DEFAULT_BLOCK_REASON;
pub use context::{
    BotContext, BotPorts, DialogStore, DynClock, MeetingService, ProposalStore, SetupError,
    TaskService, TrackingService,
};
pub use dispatcher::{DispatchReport, EventDispatcher, GENERIC_FAILURE};
pub use error::{ConversationError, HandlerResult};
pub use feedback::{Delivery, Effect, Feedback, FeedbackLog, Outcome};
pub use keyboards::{
    assignee_menu, assignee_shortcuts, list_filters, main_menu, proposal_confirmation,
    status_emoji, task_actions,
};
pub use lanes::ChatLanes;
pub use templates::{RenderError, Templates};
