//! Port contracts for the conversational core.

pub mod session;
pub mod transport;

pub use session::{SessionResult, SessionStore, SessionStoreError};
pub use transport::{ChatTransport, TransportError, TransportOperation, TransportResult};
