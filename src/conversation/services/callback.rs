//! Button presses.

use super::context::BotContext;
use super::error::HandlerResult;
use super::feedback::{Effect, FeedbackLog};
use super::keyboards;
use super::listing::ListTarget;
use crate::conversation::domain::{
    CallbackAction, CallbackEvent, ListFilter, MenuItem, Reply, SessionKey, TaskAction,
};
use crate::directory::domain::ExternalUserId;
use crate::task::domain::{Task, TaskDomainError, TaskId, TaskStatus};
use crate::task::services::{TaskLifecycleError, TaskLifecycleResult};
use minijinja::context;
use tracing::{debug, warn};

/// Blocker reason recorded by the block button.
pub const DEFAULT_BLOCK_REASON: &str = "Заблокировано из чата";

impl BotContext {
    /// Decodes the payload once and runs the matching action.
    pub(super) async fn handle_callback(
        &self,
        callback: &CallbackEvent,
        log: &mut FeedbackLog<'_>,
    ) -> HandlerResult<Effect> {
        let action = match CallbackAction::decode(&callback.data) {
            Ok(action) => action,
            Err(err) => {
                warn!(data = %callback.data, error = %err, "undecodable callback");
                let text = self.templates.render("callback.invalid", context! {})?;
                log.answer(&callback.query_id, Some(&text)).await;
                return Ok(Effect::InvalidCallback(err));
            }
        };
        debug!(action = %action, "callback decoded");

        match action {
            CallbackAction::Task { task_id, action } => {
                self.apply_task_action(callback, task_id, action, log).await
            }
            CallbackAction::Assign {
                task_id,
                user_id,
                claim,
            } => {
                let target = if claim { callback.sender.id } else { user_id };
                self.assign_from_button(callback, task_id, target, claim, log)
                    .await
            }
            CallbackAction::AssignMenu(task_id) => {
                self.show_assignee_menu(callback, task_id, log).await
            }
            CallbackAction::AssignSkip(task_id) => {
                let text = self.templates.render(
                    "task.assign_skipped",
                    context! { short_id => task_id.short() },
                )?;
                log.edit(callback.chat_id, callback.message_id, &Reply::text(text))
                    .await;
                log.answer(&callback.query_id, None).await;
                Ok(Effect::AssignmentSkipped(task_id))
            }
            CallbackAction::TaskList(filter) => {
                log.answer(&callback.query_id, None).await;
                self.show_task_list(
                    callback.chat_id,
                    callback.sender.id,
                    filter,
                    ListTarget::Replace(callback.message_id),
                    log,
                )
                .await
            }
            CallbackAction::ConfirmProposal(source) => {
                self.confirm_proposal(callback, source, log).await
            }
            CallbackAction::CancelProposal(source) => {
                self.cancel_proposal(callback, source, log).await
            }
            CallbackAction::Menu(item) => self.open_menu_item(callback, item, log).await,
        }
    }

    async fn apply_task_action(
        &self,
        callback: &CallbackEvent,
        task_id: TaskId,
        action: TaskAction,
        log: &mut FeedbackLog<'_>,
    ) -> HandlerResult<Effect> {
        let result = match action {
            TaskAction::Start => self.tasks.change_status(task_id, TaskStatus::Doing).await,
            TaskAction::Done => self.tasks.change_status(task_id, TaskStatus::Done).await,
            TaskAction::Reopen => self.tasks.change_status(task_id, TaskStatus::Todo).await,
            TaskAction::Block => {
                self.tasks
                    .block(task_id, DEFAULT_BLOCK_REASON, Some(callback.sender.id))
                    .await
            }
        };
        let task = match self.recover_lookup(callback, result, log).await? {
            Ok(task) => task,
            Err(effect) => return Ok(effect),
        };

        let notice = self
            .templates
            .render("task.action_answer", context! { action => action.as_str() })?;
        log.answer(&callback.query_id, Some(&notice)).await;
        let text = self.templates.render(
            "task.action",
            context! {
                action => action.as_str(),
                short_id => task.id().short(),
                title => task.title(),
                status => task.status().as_str(),
            },
        )?;
        let reply =
            Reply::text(text).with_keyboard(keyboards::task_actions(task.id(), task.status()));
        log.edit(callback.chat_id, callback.message_id, &reply).await;
        Ok(Effect::TaskUpdated {
            task_id: task.id(),
            status: task.status(),
        })
    }

    async fn assign_from_button(
        &self,
        callback: &CallbackEvent,
        task_id: TaskId,
        target: ExternalUserId,
        claim: bool,
        log: &mut FeedbackLog<'_>,
    ) -> HandlerResult<Effect> {
        let Some(user) = self.users.find_by_external_id(target).await? else {
            let text = self.templates.render("user.not_found", context! {})?;
            log.answer(&callback.query_id, Some(&text)).await;
            return Ok(Effect::UserNotFound(target));
        };
        let result = if claim {
            self.tasks.take(task_id, &user).await
        } else {
            self.tasks.assign(task_id, &user).await
        };
        let task = match self.recover_lookup(callback, result, log).await? {
            Ok(task) => task,
            Err(effect) => return Ok(effect),
        };

        let name = user.display_name();
        let notice = self
            .templates
            .render("task.assigned_answer", context! { name => &name })?;
        log.answer(&callback.query_id, Some(&notice)).await;
        let text = self.templates.render(
            "task.assigned",
            context! {
                short_id => task.id().short(),
                name => &name,
                title => task.title(),
                status => task.status().as_str(),
            },
        )?;
        let reply =
            Reply::text(text).with_keyboard(keyboards::task_actions(task.id(), task.status()));
        log.edit(callback.chat_id, callback.message_id, &reply).await;
        Ok(Effect::TaskUpdated {
            task_id: task.id(),
            status: task.status(),
        })
    }

    async fn show_assignee_menu(
        &self,
        callback: &CallbackEvent,
        task_id: TaskId,
        log: &mut FeedbackLog<'_>,
    ) -> HandlerResult<Effect> {
        if self.tasks.find(task_id).await?.is_none() {
            let text = self.templates.render("task.not_found", context! {})?;
            log.answer(&callback.query_id, Some(&text)).await;
            return Ok(Effect::TaskNotFound(task_id));
        }
        let users = self.users.list_active().await?;
        if users.is_empty() {
            let text = self.templates.render("task.no_users", context! {})?;
            log.answer(&callback.query_id, Some(&text)).await;
            return Ok(Effect::NoAssignees(task_id));
        }
        log.answer(&callback.query_id, None).await;
        let text = self
            .templates
            .render("task.assign_menu", context! { short_id => task_id.short() })?;
        let keyboard =
            keyboards::assignee_menu(task_id, &users, self.config.listing.assign_menu_size);
        log.edit(
            callback.chat_id,
            callback.message_id,
            &Reply::text(text).with_keyboard(keyboard),
        )
        .await;
        Ok(Effect::AssigneeMenuShown(task_id))
    }

    async fn open_menu_item(
        &self,
        callback: &CallbackEvent,
        item: MenuItem,
        log: &mut FeedbackLog<'_>,
    ) -> HandlerResult<Effect> {
        log.answer(&callback.query_id, None).await;
        let chat_id = callback.chat_id;
        let author = callback.sender.id;
        match item {
            MenuItem::Task => self.start_dialog(SessionKey::new(chat_id, author), log).await,
            MenuItem::Tasks => {
                self.show_task_list(chat_id, author, ListFilter::All, ListTarget::NewMessage, log)
                    .await
            }
            MenuItem::Week
            | MenuItem::Digest
            | MenuItem::Overdue
            | MenuItem::Meeting
            | MenuItem::Meetings => {
                self.handle_planning(chat_id, author, item.as_str(), "", log)
                    .await
            }
        }
    }

    /// Turns expected lifecycle failures into user feedback.
    ///
    /// Returns `Ok(Err(effect))` when the failure was reported, and the
    /// original error for anything unexpected.
    async fn recover_lookup(
        &self,
        callback: &CallbackEvent,
        result: TaskLifecycleResult<Task>,
        log: &mut FeedbackLog<'_>,
    ) -> HandlerResult<Result<Task, Effect>> {
        match result {
            Ok(task) => Ok(Ok(task)),
            Err(TaskLifecycleError::NotFound(task_id)) => {
                let text = self.templates.render("task.not_found", context! {})?;
                log.answer(&callback.query_id, Some(&text)).await;
                Ok(Err(Effect::TaskNotFound(task_id)))
            }
            Err(TaskLifecycleError::Domain(TaskDomainError::InvalidStatusTransition {
                task_id,
                from,
                to,
            })) => {
                let text = self.templates.render(
                    "task.transition_rejected",
                    context! { from => from.as_str(), to => to.as_str() },
                )?;
                log.answer(&callback.query_id, Some(&text)).await;
                Ok(Err(Effect::TransitionRejected { task_id, from, to }))
            }
            Err(other) => Err(other.into()),
        }
    }
}
