//! Best-effort participant tracking applied before every inbound event.

use crate::directory::{
    domain::{ChatUser, UserProfile},
    ports::{DirectoryError, UserDirectory},
};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, warn};

/// Result of tracking one event's sender.
///
/// Tracking never fails the event: a directory failure is reported here
/// and the caller carries on with the transport identity it already has.
#[derive(Debug, Clone)]
pub enum TrackingOutcome {
    /// The sender was created or refreshed.
    Tracked(ChatUser),
    /// The sender is a bot and is not recorded.
    SkippedBot,
    /// The directory rejected the upsert.
    Failed(DirectoryError),
}

impl TrackingOutcome {
    /// Returns the tracked participant, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&ChatUser> {
        match self {
            Self::Tracked(user) => Some(user),
            Self::SkippedBot | Self::Failed(_) => None,
        }
    }
}

/// Upserts the sender of each inbound event into the directory.
pub struct UserTrackingService<D, C>
where
    D: UserDirectory + ?Sized,
    C: Clock + Send + Sync + ?Sized,
{
    directory: Arc<D>,
    clock: Arc<C>,
}

impl<D, C> Clone for UserTrackingService<D, C>
where
    D: UserDirectory + ?Sized,
    C: Clock + Send + Sync + ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            directory: Arc::clone(&self.directory),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<D, C> UserTrackingService<D, C>
where
    D: UserDirectory + ?Sized,
    C: Clock + Send + Sync + ?Sized,
{
    /// Creates a tracking service.
    #[must_use]
    pub const fn new(directory: Arc<D>, clock: Arc<C>) -> Self {
        Self { directory, clock }
    }

    /// Records the sender of an event.
    pub async fn track(&self, profile: UserProfile, is_bot: bool) -> TrackingOutcome {
        if is_bot {
            return TrackingOutcome::SkippedBot;
        }
        let external_id = profile.external_id;
        match self.directory.upsert(profile, self.clock.utc()).await {
            Ok(user) => {
                debug!(user_id = %external_id, "chat user tracked");
                TrackingOutcome::Tracked(user)
            }
            Err(err) => {
                warn!(user_id = %external_id, error = %err, "user tracking failed");
                TrackingOutcome::Failed(err)
            }
        }
    }
}
