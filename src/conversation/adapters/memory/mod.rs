//! In-memory adapter implementations for tests and single-process runs.

mod session;
mod transport;

pub use session::InMemorySessionStore;
pub use transport::{RecordingTransport, TransportCall};
