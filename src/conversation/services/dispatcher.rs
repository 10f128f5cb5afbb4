//! Entry point for inbound events.
//!
//! Each event is handled under its chat's lane: the sender is tracked, the
//! dialog phase is read, the routing table picks exactly one handler group
//! and the handler runs with a fresh [`FeedbackLog`]. Unexpected failures
//! are logged, the sender's dialog is reset and a generic notice is sent.

use super::context::BotContext;
use super::error::{ConversationError, HandlerResult};
use super::feedback::{Effect, FeedbackLog, Outcome};
use super::lanes::ChatLanes;
use super::listing::ListTarget;
use crate::conversation::domain::{
    DialogSession, InboundEvent, ListFilter, Reply, Route, SessionKey, resolve,
};
use crate::directory::services::TrackingOutcome;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Notice sent when handling fails unexpectedly.
pub const GENERIC_FAILURE: &str = "❌ Что-то пошло не так. Попробуйте ещё раз.";

/// What happened while dispatching one event.
#[derive(Debug, Clone)]
pub struct DispatchReport {
    /// Handler group that owned the event, if any.
    pub route: Option<Route>,
    /// Result of recording the sender.
    pub tracking: TrackingOutcome,
    /// Committed effect and delivered feedback.
    pub outcome: Outcome,
}

/// Routes inbound events to handlers, one chat at a time.
#[derive(Clone)]
pub struct EventDispatcher {
    context: Arc<BotContext>,
    lanes: Arc<ChatLanes>,
}

impl EventDispatcher {
    /// Creates a dispatcher over a fully wired context.
    #[must_use]
    pub fn new(context: BotContext) -> Self {
        Self {
            context: Arc::new(context),
            lanes: Arc::new(ChatLanes::new()),
        }
    }

    /// Returns the shared context.
    #[must_use]
    pub fn context(&self) -> &BotContext {
        &self.context
    }

    /// Handles one event to completion.
    ///
    /// Never fails: unexpected errors become [`Effect::Failed`] after the
    /// user has been told.
    pub async fn dispatch(&self, event: &InboundEvent) -> DispatchReport {
        let _lane = self.lanes.enter(event.chat_id()).await;
        let context = &*self.context;
        let sender = event.sender();
        let tracking = context.tracking.track(sender.profile(), sender.is_bot).await;

        let key = SessionKey::new(event.chat_id(), sender.id);
        let session = context.dialogs.get(&key).await.unwrap_or_else(|err| {
            warn!(session = %key, error = %err, "dialog state unavailable, treating as idle");
            None
        });
        let phase = session
            .as_ref()
            .map(DialogSession::phase)
            .unwrap_or_default();

        let Some(route) = resolve(event, phase) else {
            debug!(kind = event.kind(), "no route for event");
            return DispatchReport {
                route: None,
                tracking,
                outcome: Outcome::ignored(),
            };
        };

        let mut log = FeedbackLog::new(context.transport.as_ref());
        let effect = match context.route(route, event, session, &mut log).await {
            Ok(effect) => effect,
            Err(err) => context.recover(event, key, &err, &mut log).await,
        };
        info!(
            chat_id = %event.chat_id(),
            kind = event.kind(),
            route = %route,
            effect = ?effect,
            "event handled"
        );
        DispatchReport {
            route: Some(route),
            tracking,
            outcome: log.finish(effect),
        }
    }
}

impl BotContext {
    async fn route(
        &self,
        route: Route,
        event: &InboundEvent,
        session: Option<DialogSession>,
        log: &mut FeedbackLog<'_>,
    ) -> HandlerResult<Effect> {
        match (route, event) {
            (Route::Menu, InboundEvent::Command(command)) => {
                self.handle_menu_command(command, log).await
            }
            (Route::TaskList, InboundEvent::Command(command)) => {
                self.show_task_list(
                    command.chat_id,
                    command.sender.id,
                    ListFilter::All,
                    ListTarget::NewMessage,
                    log,
                )
                .await
            }
            (Route::TaskDialog, _) => self.handle_dialog(event, session, log).await,
            (Route::Planning, InboundEvent::Command(command)) => {
                self.handle_planning(
                    command.chat_id,
                    command.sender.id,
                    &command.name,
                    &command.args,
                    log,
                )
                .await
            }
            (Route::Callback, InboundEvent::CallbackQuery(callback)) => {
                self.handle_callback(callback, log).await
            }
            (Route::KeywordDetector, InboundEvent::TextMessage(message)) => {
                self.handle_keyword(message, log).await
            }
            _ => Ok(Effect::Ignored),
        }
    }

    async fn recover(
        &self,
        event: &InboundEvent,
        key: SessionKey,
        err: &ConversationError,
        log: &mut FeedbackLog<'_>,
    ) -> Effect {
        error!(
            chat_id = %event.chat_id(),
            kind = event.kind(),
            error = %err,
            "event handling failed"
        );
        if let Err(reset) = self.dialogs.delete(&key).await {
            warn!(session = %key, error = %reset, "dialog reset failed");
        }
        match event {
            InboundEvent::CallbackQuery(callback) => {
                log.answer(&callback.query_id, Some(GENERIC_FAILURE)).await;
            }
            InboundEvent::Command(_) | InboundEvent::TextMessage(_) => {
                log.send(event.chat_id(), &Reply::text(GENERIC_FAILURE))
                    .await;
            }
        }
        Effect::Failed
    }
}
