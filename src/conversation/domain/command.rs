//! Slash commands advertised to the chat transport.

/// Name and description of a registered command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BotCommand {
    /// Command name without the slash.
    pub name: &'static str,
    /// Description shown in the transport's command menu.
    pub description: &'static str,
}

/// Commands registered with the transport at startup.
#[must_use]
pub fn default_commands() -> Vec<BotCommand> {
    [
        ("task", "Создать новую задачу"),
        ("tasks", "Список задач с фильтрами"),
        ("week", "Недельная доска"),
        ("meeting", "Зафиксировать встречу"),
        ("meetings", "История встреч"),
        ("digest", "Еженедельный дайджест"),
        ("menu", "Главное меню"),
        ("help", "Справка"),
    ]
    .into_iter()
    .map(|(name, description)| BotCommand { name, description })
    .collect()
}
