//! Domain model for chat participants.

mod ids;
mod user;

pub use ids::{ChatUserId, ExternalUserId};
pub use user::{ChatUser, PersistedChatUser, UserProfile};
