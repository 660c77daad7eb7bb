pub mod cli;
pub mod pipeline;
pub mod router;
pub mod session;

#[cfg(test)]
mod tests;

pub use pipeline::{Dashboard, DashboardSnapshot, Fetcher, View};
pub use router::{
    Alert, AlertKind, ErrorReason, ErrorRouter, MemoryChannel, NotificationChannel,
    NotificationError, StderrChannel,
};
pub use session::{Completion, Generation, Session};
