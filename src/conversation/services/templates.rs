//! User-facing texts rendered with `minijinja`.

use minijinja::Environment;
use serde::Serialize;
use thiserror::Error;

/// Failure to register or render a template.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("template '{template}' failed: {reason}")]
pub struct RenderError {
    /// Template name.
    pub template: String,
    /// Engine message.
    pub reason: String,
}

const TEMPLATES: &[(&str, &str)] = &[
    (
        "menu.start",
        "👋 Привет! Я TeamFlow — бот для управления задачами команды.

Выберите действие из меню или используйте команды:
• /task — создать задачу
• /tasks — список задач
• /week — недельная доска
• /help — справка",
    ),
    ("menu.main", "📱 Главное меню TeamFlow\n\nВыберите действие:"),
    (
        "menu.help",
        "🤖 TeamFlow Bot — Справка

📝 Задачи:
• /task — создать новую задачу
• /tasks — список задач с фильтрами
• /week — недельная доска

🤝 Встречи:
• /meeting — зафиксировать встречу
• /meetings — история встреч

📊 Аналитика:
• /digest — еженедельный дайджест
• /overdue — просроченные задачи

💡 Автоматика:
Напишите в чат фразу с ключевым словом:
«нужно починить баг» или «todo: обновить доку»
Бот предложит создать задачу и назначить исполнителя.

🌐 Web UI: {{ web_url }}",
    ),
    (
        "dialog.prompt_title",
        "📝 Создание новой задачи\n\nВведите название задачи:",
    ),
    (
        "dialog.invalid_title",
        "{% if max %}❌ Название слишком длинное ({{ length }} из {{ max }} символов). Попробуйте ещё раз:{% else %}❌ Название не может быть пустым. Попробуйте ещё раз:{% endif %}",
    ),
    (
        "dialog.prompt_description",
        "✅ Название: {{ title }}

Теперь введите описание задачи
(или отправьте /{{ skip }} чтобы пропустить):",
    ),
    (
        "dialog.lost",
        "❌ Ошибка: название задачи потеряно.\nНачните заново с /task",
    ),
    (
        "task.created",
        "✅ Задача создана!\n\n#{{ short_id }} {{ title }}\nСтатус: {{ status }}",
    ),
    ("proposal.prompt", "📋 Создать задачу?\n\n{{ title }}"),
    (
        "proposal.created",
        "✅ Задача #{{ short_id }} создана!
{{ title }}

{% if has_users %}Назначить исполнителя?{% else %}Исполнитель не назначен. Используйте /tasks → Назначить{% endif %}",
    ),
    ("proposal.expired", "❌ Время истекло, попробуйте снова"),
    ("proposal.confirmed", "✅ Задача создана!"),
    ("proposal.cancelled", "Отменено"),
    (
        "task.action",
        "{% if action == \"start\" %}🔄 Задача #{{ short_id }} в работе{% elif action == \"done\" %}✅ Задача #{{ short_id }} выполнена{% elif action == \"block\" %}🚫 Задача #{{ short_id }} заблокирована{% else %}🔁 Задача #{{ short_id }} переоткрыта{% endif %}

{{ title }}
Статус: {{ status }}",
    ),
    (
        "task.action_answer",
        "{% if action == \"start\" %}✅ Задача взята в работу{% elif action == \"done\" %}✅ Задача выполнена!{% elif action == \"block\" %}🚫 Задача заблокирована{% else %}🔁 Задача переоткрыта{% endif %}",
    ),
    (
        "task.assigned",
        "✅ Задача #{{ short_id }} назначена на {{ name }}\n{{ title }}\nСтатус: {{ status }}",
    ),
    ("task.assigned_answer", "✅ Назначено на {{ name }}"),
    (
        "task.assign_skipped",
        "📋 Задача #{{ short_id }} создана без исполнителя\n\nИспользуйте /tasks чтобы назначить позже",
    ),
    (
        "task.assign_menu",
        "👤 Назначить задачу #{{ short_id }}\n\nВыберите исполнителя:",
    ),
    (
        "task.no_users",
        "❌ Нет пользователей. Попросите команду написать /start боту.",
    ),
    ("task.not_found", "❌ Задача не найдена"),
    ("user.not_found", "❌ Пользователь не найден"),
    (
        "task.transition_rejected",
        "❌ Нельзя перевести задачу из {{ from }} в {{ to }}",
    ),
    ("callback.invalid", "❌ Неверный формат команды"),
    (
        "list.tasks",
        "📋 Список задач
{% if tasks %}

{% for task in tasks %}
{{ task.emoji }} #{{ task.short_id }} {{ task.title }}{{ \" → \" ~ task.assignee if task.assignee }}
{% endfor %}
{% if remaining %}

...и ещё {{ remaining }} задач
{% endif %}
{% else %}

✨ {{ empty_label }}
{% endif %}",
    ),
    (
        "planning.week",
        "📅 Недельная доска (с {{ since }})
{% for group in groups %}

{{ group.emoji }} {{ group.label }} ({{ group.tasks|length }})
{% for task in group.tasks %}
• #{{ task.short_id }} {{ task.title }}{{ \" → \" ~ task.assignee if task.assignee }}
{% endfor %}
{% else %}

✨ За эту неделю задач нет
{% endfor %}",
    ),
    (
        "planning.digest",
        "📊 Дайджест недели (с {{ since }})

📝 Создано: {{ created }}
✅ Выполнено: {{ done }}
🔄 В работе: {{ doing }}
🚫 Заблокировано: {{ blocked }}
⏰ Просрочено: {{ overdue }}",
    ),
    (
        "planning.overdue",
        "⏰ Просроченные задачи
{% for task in tasks %}
{% if loop.first %}

{% endif %}
• #{{ task.short_id }} {{ task.title }} (до {{ task.due }}){{ \" → \" ~ task.assignee if task.assignee }}
{% else %}

✨ Просроченных задач нет
{% endfor %}",
    ),
    (
        "meeting.usage",
        "🤝 Чтобы зафиксировать встречу, отправьте:\n/meeting краткое содержание встречи",
    ),
    ("meeting.recorded", "🤝 Встреча зафиксирована\n\n{{ summary }}"),
    (
        "meeting.list",
        "📋 История встреч
{% for meeting in meetings %}
{% if loop.first %}

{% endif %}
• {{ meeting.held_at }} — {{ meeting.summary }}
{% else %}

✨ Встреч пока нет
{% endfor %}",
    ),
];

/// Registry of every user-facing text.
#[derive(Debug, Clone)]
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    /// Compiles the built-in templates.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] naming the first template that fails to
    /// compile.
    pub fn new() -> Result<Self, RenderError> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        for (name, source) in TEMPLATES {
            env.add_template(*name, *source).map_err(|err| RenderError {
                template: (*name).to_owned(),
                reason: err.to_string(),
            })?;
        }
        Ok(Self { env })
    }

    /// Renders `name` with `context`, trimming trailing whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] for unknown templates and render failures.
    pub fn render<S: Serialize>(&self, name: &str, context: S) -> Result<String, RenderError> {
        let failure = |err: minijinja::Error| RenderError {
            template: name.to_owned(),
            reason: err.to_string(),
        };
        let template = self.env.get_template(name).map_err(failure)?;
        let rendered = template.render(context).map_err(failure)?;
        Ok(rendered.trim_end().to_owned())
    }
}
