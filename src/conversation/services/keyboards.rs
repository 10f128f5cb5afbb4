//! Inline keyboards attached to bot replies.

use crate::conversation::domain::{
    Button, CallbackAction, Keyboard, ListFilter, MenuItem, TaskAction,
};
use crate::directory::domain::{ChatUser, ExternalUserId};
use crate::task::domain::{MessageId, TaskId, TaskStatus};

/// Emoji shown next to a status.
#[must_use]
pub const fn status_emoji(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Todo => "📝",
        TaskStatus::Doing => "🔄",
        TaskStatus::Done => "✅",
        TaskStatus::Blocked => "🚫",
    }
}

/// Main menu shown by `/start` and `/menu`.
#[must_use]
pub fn main_menu() -> Keyboard {
    let item = |label: &str, entry: MenuItem| Button::new(label, CallbackAction::Menu(entry));
    Keyboard::new()
        .row([
            item("📝 Создать задачу", MenuItem::Task),
            item("📋 Список задач", MenuItem::Tasks),
        ])
        .row([
            item("📅 Недельная доска", MenuItem::Week),
            item("📊 Дайджест", MenuItem::Digest),
        ])
        .row([
            item("🤝 Фиксация встречи", MenuItem::Meeting),
            item("📋 История встреч", MenuItem::Meetings),
        ])
}

/// Actions available for a task in `status`.
#[must_use]
pub fn task_actions(task_id: TaskId, status: TaskStatus) -> Keyboard {
    let action = |label: &str, requested: TaskAction| {
        Button::new(
            label,
            CallbackAction::Task {
                task_id,
                action: requested,
            },
        )
    };
    let assign = || Button::new("👤 Назначить", CallbackAction::AssignMenu(task_id));
    match status {
        TaskStatus::Todo => {
            Keyboard::new().row([action("▶️ Взять в работу", TaskAction::Start), assign()])
        }
        TaskStatus::Doing => Keyboard::new()
            .row([action("✅ Выполнено", TaskAction::Done), assign()])
            .row([action("🚫 Заблокировать", TaskAction::Block)]),
        TaskStatus::Blocked => Keyboard::new().row([
            action("▶️ Возобновить", TaskAction::Start),
            action("✅ Выполнено", TaskAction::Done),
        ]),
        TaskStatus::Done => Keyboard::new().row([action("🔄 Переоткрыть", TaskAction::Reopen)]),
    }
}

/// Confirm and cancel buttons under a keyword proposal.
#[must_use]
pub fn proposal_confirmation(source: MessageId) -> Keyboard {
    Keyboard::new().row([
        Button::new("✅ Создать", CallbackAction::ConfirmProposal(source)),
        Button::new("❌ Отмена", CallbackAction::CancelProposal(source)),
    ])
}

/// Assignee shortcuts offered right after a proposal is confirmed.
///
/// The presser can claim the task; up to `shortcuts` other participants
/// follow two per row, then the skip button.
#[must_use]
pub fn assignee_shortcuts(
    task_id: TaskId,
    presser: ExternalUserId,
    users: &[ChatUser],
    shortcuts: usize,
) -> Keyboard {
    let claim = Button::new(
        "👤 Взять себе",
        CallbackAction::Assign {
            task_id,
            user_id: presser,
            claim: true,
        },
    );
    let others: Vec<Button> = users
        .iter()
        .filter(|user| user.external_id() != presser)
        .take(shortcuts)
        .map(|user| assign_button(task_id, user))
        .collect();
    let keyboard = others
        .chunks(2)
        .fold(Keyboard::new().row([claim]), |keyboard, pair| {
            keyboard.row(pair.iter().cloned())
        });
    keyboard.row([Button::new(
        "⏭ Без исполнителя",
        CallbackAction::AssignSkip(task_id),
    )])
}

/// Full assignee picker, one participant per row.
#[must_use]
pub fn assignee_menu(task_id: TaskId, users: &[ChatUser], limit: usize) -> Keyboard {
    users
        .iter()
        .take(limit)
        .fold(Keyboard::new(), |keyboard, user| {
            keyboard.row([assign_button(task_id, user)])
        })
        .row([Button::new(
            "↩️ Назад",
            CallbackAction::TaskList(ListFilter::All),
        )])
}

/// Filter buttons under the task list; `active` is marked.
#[must_use]
pub fn list_filters(active: ListFilter) -> Keyboard {
    let filter = |label: &str, choice: ListFilter| {
        let marked = if choice == active {
            format!("● {label}")
        } else {
            label.to_owned()
        };
        Button::new(marked, CallbackAction::TaskList(choice))
    };
    Keyboard::new()
        .row([
            filter("📋 Все", ListFilter::All),
            filter("🔄 В работе", ListFilter::Status(TaskStatus::Doing)),
            filter("📝 TODO", ListFilter::Status(TaskStatus::Todo)),
        ])
        .row([
            filter("✅ Готово", ListFilter::Status(TaskStatus::Done)),
            filter("🚫 Блок", ListFilter::Status(TaskStatus::Blocked)),
            filter("👤 Мои", ListFilter::Mine),
        ])
        .row([filter("🔄 Обновить", ListFilter::Refresh)])
}

fn assign_button(task_id: TaskId, user: &ChatUser) -> Button {
    Button::new(
        format!("👤 {}", user.display_name()),
        CallbackAction::Assign {
            task_id,
            user_id: user.external_id(),
            claim: false,
        },
    )
}
