//! Wiring of ports, services and configuration shared by every handler.

use super::templates::{RenderError, Templates};
use crate::config::BotConfig;
use crate::conversation::domain::{
    DialogSession, PendingProposal, ProposalKey, SessionKey, TriggerMatcher, TriggerMatcherError,
};
use crate::conversation::ports::{ChatTransport, SessionStore};
use crate::directory::ports::UserDirectory;
use crate::directory::services::UserTrackingService;
use crate::meeting::ports::MeetingRepository;
use crate::meeting::services::MeetingLogService;
use crate::task::ports::TaskRepository;
use crate::task::services::TaskLifecycleService;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Shared clock handle.
pub type DynClock = dyn Clock + Send + Sync;
/// Task lifecycle service over trait objects.
pub type TaskService = TaskLifecycleService<dyn TaskRepository, DynClock>;
/// Meeting log service over trait objects.
pub type MeetingService = MeetingLogService<dyn MeetingRepository, DynClock>;
/// Sender tracking service over trait objects.
pub type TrackingService = UserTrackingService<dyn UserDirectory, DynClock>;
/// Store of creation dialogs.
pub type DialogStore = dyn SessionStore<SessionKey, DialogSession>;
/// Store of keyword proposals.
pub type ProposalStore = dyn SessionStore<ProposalKey, PendingProposal>;

/// Adapters the conversational core runs against.
#[derive(Clone)]
pub struct BotPorts {
    /// Task persistence.
    pub tasks: Arc<dyn TaskRepository>,
    /// Participant directory.
    pub users: Arc<dyn UserDirectory>,
    /// Meeting persistence.
    pub meetings: Arc<dyn MeetingRepository>,
    /// Dialog sessions.
    pub dialogs: Arc<DialogStore>,
    /// Pending keyword proposals.
    pub proposals: Arc<ProposalStore>,
    /// Outgoing chat transport.
    pub transport: Arc<dyn ChatTransport>,
    /// Time source.
    pub clock: Arc<DynClock>,
}

/// Errors raised while assembling a [`BotContext`].
#[derive(Debug, Clone, Error)]
pub enum SetupError {
    /// The keyword phrase sets are unusable.
    #[error(transparent)]
    Triggers(#[from] TriggerMatcherError),
    /// A built-in template failed to compile.
    #[error(transparent)]
    Templates(#[from] RenderError),
}

/// Everything a handler needs, assembled once at start-up.
pub struct BotContext {
    pub(crate) tasks: TaskService,
    pub(crate) users: Arc<dyn UserDirectory>,
    pub(crate) tracking: TrackingService,
    pub(crate) meetings: MeetingService,
    pub(crate) dialogs: Arc<DialogStore>,
    pub(crate) proposals: Arc<ProposalStore>,
    pub(crate) transport: Arc<dyn ChatTransport>,
    pub(crate) clock: Arc<DynClock>,
    pub(crate) templates: Templates,
    pub(crate) matcher: TriggerMatcher,
    pub(crate) config: BotConfig,
}

impl BotContext {
    /// Builds the services over `ports` using `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] when the keyword matcher or the templates
    /// cannot be built.
    pub fn new(ports: BotPorts, config: BotConfig) -> Result<Self, SetupError> {
        let matcher = config.proposals.matcher()?;
        let templates = Templates::new()?;
        let tasks = TaskService::new(ports.tasks, Arc::clone(&ports.clock))
            .with_policy(config.lifecycle.transition_policy);
        let tracking = TrackingService::new(Arc::clone(&ports.users), Arc::clone(&ports.clock));
        let meetings = MeetingService::new(ports.meetings, Arc::clone(&ports.clock));
        Ok(Self {
            tasks,
            users: ports.users,
            tracking,
            meetings,
            dialogs: ports.dialogs,
            proposals: ports.proposals,
            transport: ports.transport,
            clock: ports.clock,
            templates,
            matcher,
            config,
        })
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &BotConfig {
        &self.config
    }

    /// Returns the task lifecycle service.
    #[must_use]
    pub const fn tasks(&self) -> &TaskService {
        &self.tasks
    }
}
