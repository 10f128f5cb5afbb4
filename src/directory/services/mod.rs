//! Application services for the participant directory.

mod tracking;

pub use tracking::{TrackingOutcome, UserTrackingService};
