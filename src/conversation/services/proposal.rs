//! Keyword proposals: staging, confirmation and cancellation.

use super::context::BotContext;
use super::error::HandlerResult;
use super::feedback::{Effect, FeedbackLog};
use super::keyboards;
use crate::conversation::domain::{
    CallbackEvent, PendingProposal, ProposalKey, Reply, TextEvent,
};
use crate::task::domain::{MessageId, TaskOrigin};
use crate::task::services::CreateTaskRequest;
use minijinja::context;
use tracing::{debug, info, warn};

impl BotContext {
    /// Offers to create a task when free text carries a trigger phrase.
    pub(super) async fn handle_keyword(
        &self,
        message: &TextEvent,
        log: &mut FeedbackLog<'_>,
    ) -> HandlerResult<Effect> {
        let Some(title) = self.matcher.candidate(&message.text) else {
            return Ok(Effect::Ignored);
        };
        let key = ProposalKey::new(message.chat_id, message.message_id);
        self.proposals
            .set(
                key,
                PendingProposal {
                    title: title.clone(),
                },
                Some(self.config.proposals.ttl()),
            )
            .await?;
        debug!(proposal = %key, "keyword proposal staged");

        let text = self
            .templates
            .render("proposal.prompt", context! { title => title })?;
        let reply = Reply::text(text)
            .with_keyboard(keyboards::proposal_confirmation(message.message_id))
            .replying_to(message.message_id);
        log.send(message.chat_id, &reply).await;
        Ok(Effect::ProposalStaged(key))
    }

    /// Creates the proposed task; only the first press succeeds.
    pub(super) async fn confirm_proposal(
        &self,
        callback: &CallbackEvent,
        source: MessageId,
        log: &mut FeedbackLog<'_>,
    ) -> HandlerResult<Effect> {
        let key = ProposalKey::new(callback.chat_id, source);
        let Some(proposal) = self.proposals.take(&key).await? else {
            let text = self.templates.render("proposal.expired", context! {})?;
            log.answer(&callback.query_id, Some(&text)).await;
            return Ok(Effect::ProposalExpired(key));
        };

        let origin = TaskOrigin::AutoDetected {
            chat_id: callback.chat_id,
            message_id: source,
        };
        let task = self
            .tasks
            .create(CreateTaskRequest::new(proposal.title, origin))
            .await?;
        info!(proposal = %key, task_id = %task.id(), "keyword proposal confirmed");

        let users = self.users.list_active().await.unwrap_or_else(|err| {
            warn!(error = %err, "assignee shortcuts unavailable");
            Vec::new()
        });
        let text = self.templates.render(
            "proposal.created",
            context! {
                short_id => task.id().short(),
                title => task.title(),
                has_users => !users.is_empty(),
            },
        )?;
        let mut reply = Reply::text(text);
        if !users.is_empty() {
            reply = reply.with_keyboard(keyboards::assignee_shortcuts(
                task.id(),
                callback.sender.id,
                &users,
                self.config.proposals.assign_shortcuts,
            ));
        }
        log.edit(callback.chat_id, callback.message_id, &reply).await;
        let notice = self.templates.render("proposal.confirmed", context! {})?;
        log.answer(&callback.query_id, Some(&notice)).await;
        Ok(Effect::TaskCreated(task.id()))
    }

    /// Discards a proposal and removes its prompt.
    pub(super) async fn cancel_proposal(
        &self,
        callback: &CallbackEvent,
        source: MessageId,
        log: &mut FeedbackLog<'_>,
    ) -> HandlerResult<Effect> {
        let key = ProposalKey::new(callback.chat_id, source);
        if self.proposals.take(&key).await?.is_none() {
            log.answer(&callback.query_id, None).await;
            return Ok(Effect::Ignored);
        }
        debug!(proposal = %key, "keyword proposal cancelled");
        log.delete(callback.chat_id, callback.message_id).await;
        let notice = self.templates.render("proposal.cancelled", context! {})?;
        log.answer(&callback.query_id, Some(&notice)).await;
        Ok(Effect::ProposalCancelled(key))
    }
}
