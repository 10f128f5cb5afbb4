//! Step-by-step task creation.

use super::context::BotContext;
use super::error::HandlerResult;
use super::feedback::{Effect, FeedbackLog};
use super::keyboards;
use crate::conversation::domain::{
    DescriptionInput, DialogError, DialogPhase, DialogSession, InboundEvent, Reply, SKIP_COMMAND,
    SessionKey,
};
use crate::task::domain::{ChatId, Task, TaskDomainError, TaskOrigin};
use crate::task::services::CreateTaskRequest;
use minijinja::context;
use tracing::{debug, error, info};

impl BotContext {
    /// Drives the creation dialog for `/task`, `/skip` and dialog text.
    pub(super) async fn handle_dialog(
        &self,
        event: &InboundEvent,
        session: Option<DialogSession>,
        log: &mut FeedbackLog<'_>,
    ) -> HandlerResult<Effect> {
        let key = SessionKey::new(event.chat_id(), event.sender().id);
        match (event, session) {
            (InboundEvent::Command(command), _) if command.name == "task" => {
                self.start_dialog(key, log).await
            }
            (InboundEvent::Command(command), Some(current)) if command.name == SKIP_COMMAND => {
                self.finish_dialog(key, current, DescriptionInput::Skip, log)
                    .await
            }
            (InboundEvent::TextMessage(message), Some(current)) => match current.phase() {
                DialogPhase::AwaitingTitle => {
                    self.accept_title(key, current, &message.text, log).await
                }
                DialogPhase::AwaitingDescription => {
                    let input = DescriptionInput::Text(message.text.clone());
                    self.finish_dialog(key, current, input, log).await
                }
                DialogPhase::Idle => Ok(Effect::Ignored),
            },
            _ => Ok(Effect::Ignored),
        }
    }

    /// Starts or restarts the dialog, discarding earlier scratch data.
    pub(super) async fn start_dialog(
        &self,
        key: SessionKey,
        log: &mut FeedbackLog<'_>,
    ) -> HandlerResult<Effect> {
        self.dialogs
            .set(key, DialogSession::start(), Some(self.config.dialog.ttl()))
            .await?;
        debug!(session = %key, "task dialog started");
        let text = self.templates.render("dialog.prompt_title", context! {})?;
        log.send(key.chat_id, &Reply::text(text)).await;
        Ok(Effect::DialogStarted)
    }

    async fn accept_title(
        &self,
        key: SessionKey,
        current: DialogSession,
        text: &str,
        log: &mut FeedbackLog<'_>,
    ) -> HandlerResult<Effect> {
        match current.submit_title(text) {
            Ok(next) => {
                let title = next.title().unwrap_or_default().to_owned();
                self.dialogs
                    .set(key, next, Some(self.config.dialog.ttl()))
                    .await?;
                let prompt = self.templates.render(
                    "dialog.prompt_description",
                    context! { title => title, skip => SKIP_COMMAND },
                )?;
                log.send(key.chat_id, &Reply::text(prompt)).await;
                Ok(Effect::DialogAdvanced)
            }
            Err(DialogError::InvalidTitle(reason)) => {
                let (length, max) = match reason {
                    TaskDomainError::TitleTooLong { length, max } => (length, max),
                    _ => (0, 0),
                };
                let prompt = self
                    .templates
                    .render("dialog.invalid_title", context! { length, max })?;
                log.send(key.chat_id, &Reply::text(prompt)).await;
                Ok(Effect::DialogReprompted)
            }
            Err(DialogError::MissingScratch | DialogError::OutOfPhase(_)) => Ok(Effect::Ignored),
        }
    }

    async fn finish_dialog(
        &self,
        key: SessionKey,
        current: DialogSession,
        input: DescriptionInput,
        log: &mut FeedbackLog<'_>,
    ) -> HandlerResult<Effect> {
        let draft = match current.complete(input) {
            Ok(draft) => draft,
            Err(DialogError::MissingScratch) => {
                error!(session = %key, "task dialog lost its title");
                self.dialogs.delete(&key).await?;
                let text = self.templates.render("dialog.lost", context! {})?;
                log.send(key.chat_id, &Reply::text(text)).await;
                return Ok(Effect::DialogAborted);
            }
            Err(DialogError::InvalidTitle(_) | DialogError::OutOfPhase(_)) => {
                return Ok(Effect::Ignored);
            }
        };

        // The dialog must be gone before the task commits.
        self.dialogs.delete(&key).await?;
        let mut request = CreateTaskRequest::new(draft.title, TaskOrigin::ManualCommand);
        if let Some(description) = draft.description {
            request = request.with_description(description);
        }
        let task = self.tasks.create(request).await?;
        info!(session = %key, task_id = %task.id(), "task created from dialog");

        self.announce_created(key.chat_id, &task, log).await?;
        Ok(Effect::TaskCreated(task.id()))
    }

    async fn announce_created(
        &self,
        chat_id: ChatId,
        task: &Task,
        log: &mut FeedbackLog<'_>,
    ) -> HandlerResult<()> {
        let text = self.templates.render(
            "task.created",
            context! {
                short_id => task.id().short(),
                title => task.title(),
                status => task.status().as_str(),
            },
        )?;
        let reply =
            Reply::text(text).with_keyboard(keyboards::task_actions(task.id(), task.status()));
        log.send(chat_id, &reply).await;
        Ok(())
    }
}
