//! Shared wiring for integration tests.

use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use teamflow::config::BotConfig;
use teamflow::conversation::adapters::memory::{
    InMemorySessionStore, RecordingTransport, TransportCall,
};
use teamflow::conversation::domain::{
    CallbackAction, CallbackEvent, InboundEvent, PendingProposal, ProposalKey, Sender,
};
use teamflow::conversation::services::{
    BotContext, BotPorts, DispatchReport, DynClock, EventDispatcher, SetupError,
};
use teamflow::directory::adapters::memory::InMemoryUserDirectory;
use teamflow::directory::domain::ExternalUserId;
use teamflow::meeting::adapters::memory::InMemoryMeetingRepository;
use teamflow::task::adapters::memory::InMemoryTaskRepository;
use teamflow::task::domain::{ChatId, MessageId};

/// Chat every scenario talks in.
pub const TEAM_CHAT: ChatId = ChatId::new(-42);

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Creates a clock frozen at `now`.
    pub const fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Clock for ManualClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Thursday 2026-03-12 09:30 UTC.
///
/// # Errors
///
/// Returns an error if the fixed timestamp is ambiguous.
pub fn thursday_morning() -> eyre::Result<DateTime<Utc>> {
    Utc.with_ymd_and_hms(2026, 3, 12, 9, 30, 0)
        .single()
        .ok_or_else(|| eyre::eyre!("fixed timestamp is ambiguous"))
}

/// Bot wired to in-memory adapters, with handles on every store.
pub struct InMemoryBot {
    /// Entry point under test.
    pub dispatcher: EventDispatcher,
    /// Records what the bot sent.
    pub transport: RecordingTransport,
    /// Task store.
    pub tasks: InMemoryTaskRepository,
    /// Participant directory.
    pub users: InMemoryUserDirectory,
    /// Pending keyword proposals.
    pub proposals: InMemorySessionStore<ProposalKey, PendingProposal>,
    /// Shared clock.
    pub clock: Arc<ManualClock>,
    next_message: AtomicI64,
    next_query: AtomicI64,
}

impl InMemoryBot {
    /// Wires a bot with `config`, starting the clock at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] when the configuration cannot be compiled.
    pub fn start(config: BotConfig, now: DateTime<Utc>) -> Result<Self, SetupError> {
        let clock = Arc::new(ManualClock::at(now));
        let shared_clock: Arc<DynClock> = clock.clone();
        let transport = RecordingTransport::new();
        let tasks = InMemoryTaskRepository::new();
        let users = InMemoryUserDirectory::new();
        let proposals = InMemorySessionStore::new(Arc::clone(&shared_clock));
        let ports = BotPorts {
            tasks: Arc::new(tasks.clone()),
            users: Arc::new(users.clone()),
            meetings: Arc::new(InMemoryMeetingRepository::new()),
            dialogs: Arc::new(InMemorySessionStore::new(Arc::clone(&shared_clock))),
            proposals: Arc::new(proposals.clone()),
            transport: Arc::new(transport.clone()),
            clock: shared_clock,
        };
        let context = BotContext::new(ports, config)?;
        Ok(Self {
            dispatcher: EventDispatcher::new(context),
            transport,
            tasks,
            users,
            proposals,
            clock,
            next_message: AtomicI64::new(1),
            next_query: AtomicI64::new(1),
        })
    }

    /// Builds a human participant.
    pub fn member(id: i64, first_name: &str) -> Sender {
        Sender::new(ExternalUserId::new(id), first_name)
    }

    /// Posts `text` as `sender` and returns the triggering message id with
    /// the dispatch report.
    pub async fn post(&self, sender: &Sender, text: &str) -> (MessageId, DispatchReport) {
        let message_id = MessageId::new(self.next_message.fetch_add(1, Ordering::SeqCst));
        let event = InboundEvent::from_message(TEAM_CHAT, message_id, sender.clone(), text);
        (message_id, self.dispatcher.dispatch(&event).await)
    }

    /// Posts `text` as `sender`.
    pub async fn say(&self, sender: &Sender, text: &str) -> DispatchReport {
        self.post(sender, text).await.1
    }

    /// Presses a button carrying `action` on `on_message`.
    pub async fn press(
        &self,
        sender: &Sender,
        on_message: MessageId,
        action: &CallbackAction,
    ) -> DispatchReport {
        self.press_raw(sender, on_message, &action.encode()).await
    }

    /// Presses a button carrying arbitrary callback data.
    pub async fn press_raw(
        &self,
        sender: &Sender,
        on_message: MessageId,
        data: &str,
    ) -> DispatchReport {
        let query = self.next_query.fetch_add(1, Ordering::SeqCst);
        let event = InboundEvent::CallbackQuery(CallbackEvent {
            chat_id: TEAM_CHAT,
            message_id: on_message,
            sender: sender.clone(),
            query_id: format!("q-{query}"),
            data: data.to_owned(),
        });
        self.dispatcher.dispatch(&event).await
    }

    /// Returns the most recent delivered transport call.
    ///
    /// # Errors
    ///
    /// Returns an error when nothing was delivered yet.
    pub fn last_call(&self) -> eyre::Result<TransportCall> {
        self.transport
            .calls()
            .last()
            .cloned()
            .ok_or_else(|| eyre::eyre!("no transport call recorded"))
    }

    /// Returns the identifier of the most recently sent message.
    ///
    /// # Errors
    ///
    /// Returns an error when no message was sent yet.
    pub fn last_sent_message(&self) -> eyre::Result<MessageId> {
        self.transport
            .calls()
            .iter()
            .rev()
            .find_map(|call| match call {
                TransportCall::Send { message_id, .. } => Some(*message_id),
                TransportCall::Edit { .. }
                | TransportCall::Delete { .. }
                | TransportCall::Answer { .. } => None,
            })
            .ok_or_else(|| eyre::eyre!("no message sent"))
    }
}
