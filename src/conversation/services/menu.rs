//! Greeting, main menu and help.

use super::context::BotContext;
use super::error::HandlerResult;
use super::feedback::{Effect, FeedbackLog};
use super::keyboards;
use crate::conversation::domain::{CommandEvent, Reply};
use minijinja::context;

impl BotContext {
    /// Answers `/start`, `/menu` and `/help`.
    pub(super) async fn handle_menu_command(
        &self,
        command: &CommandEvent,
        log: &mut FeedbackLog<'_>,
    ) -> HandlerResult<Effect> {
        let reply = match command.name.as_str() {
            "start" => Reply::text(self.templates.render("menu.start", context! {})?)
                .with_keyboard(keyboards::main_menu()),
            "menu" => Reply::text(self.templates.render("menu.main", context! {})?)
                .with_keyboard(keyboards::main_menu()),
            _ => Reply::text(self.templates.render(
                "menu.help",
                context! { web_url => &self.config.bot.web_url },
            )?)
            .with_keyboard(keyboards::main_menu()),
        };
        log.send(command.chat_id, &reply).await;
        Ok(Effect::MenuShown)
    }
}
