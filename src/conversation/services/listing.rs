//! Filterable task list.

use super::context::BotContext;
use super::error::HandlerResult;
use super::feedback::{Effect, FeedbackLog};
use super::keyboards;
use crate::conversation::domain::{ListFilter, Reply};
use crate::directory::domain::ExternalUserId;
use crate::task::domain::{ChatId, MessageId, Task, TaskStatus};
use crate::task::ports::TaskFilter;
use minijinja::context;
use serde::Serialize;

/// One task as shown in lists and reports.
#[derive(Debug, Clone, Serialize)]
pub(super) struct TaskLine {
    emoji: &'static str,
    short_id: String,
    title: String,
    assignee: Option<String>,
    due: Option<String>,
}

impl TaskLine {
    pub(super) fn from_task(task: &Task) -> Self {
        Self {
            emoji: keyboards::status_emoji(task.status()),
            short_id: task.id().short(),
            title: task.title().to_owned(),
            assignee: task
                .assignee()
                .map(|assignee| assignee.display_name.clone()),
            due: task
                .due_date()
                .map(|due| due.format("%d.%m.%Y").to_string()),
        }
    }
}

/// Where a rendered list goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ListTarget {
    /// Post a new message.
    NewMessage,
    /// Replace an existing message.
    Replace(MessageId),
}

impl BotContext {
    /// Renders the task list for `viewer` using `filter`.
    pub(super) async fn show_task_list(
        &self,
        chat_id: ChatId,
        viewer: ExternalUserId,
        filter: ListFilter,
        target: ListTarget,
        log: &mut FeedbackLog<'_>,
    ) -> HandlerResult<Effect> {
        let shown = match filter {
            ListFilter::Refresh => ListFilter::All,
            other => other,
        };
        let query = match shown {
            ListFilter::Status(status) => TaskFilter::all().with_status(status),
            ListFilter::Mine => TaskFilter::all().with_assignee(viewer),
            ListFilter::All | ListFilter::Refresh => TaskFilter::all(),
        };
        let tasks = self.tasks.list(&query).await?;
        let page_size = self.config.listing.page_size;
        let lines: Vec<TaskLine> = tasks.iter().take(page_size).map(TaskLine::from_task).collect();
        let remaining = tasks.len().saturating_sub(page_size);

        let text = self.templates.render(
            "list.tasks",
            context! {
                tasks => lines,
                remaining => remaining,
                empty_label => empty_label(shown),
            },
        )?;
        let reply = Reply::text(text).with_keyboard(keyboards::list_filters(shown));
        match target {
            ListTarget::NewMessage => {
                log.send(chat_id, &reply).await;
            }
            ListTarget::Replace(message_id) => log.edit(chat_id, message_id, &reply).await,
        }
        Ok(Effect::TaskListShown)
    }
}

const fn empty_label(filter: ListFilter) -> &'static str {
    match filter {
        ListFilter::All | ListFilter::Refresh => "задач нет",
        ListFilter::Status(TaskStatus::Todo) => "задач в TODO нет",
        ListFilter::Status(TaskStatus::Doing) => "задач в работе нет",
        ListFilter::Status(TaskStatus::Done) => "выполненных задач нет",
        ListFilter::Status(TaskStatus::Blocked) => "заблокированных задач нет",
        ListFilter::Mine => "задач назначенных на вас нет",
    }
}
