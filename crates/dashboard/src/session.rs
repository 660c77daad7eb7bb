use scenario_core::{DashboardError, DashboardResult};
use std::sync::Arc;

/// Request-generation token handed out by [`Session::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// What happened to a finished request.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// The result replaced the current view.
    Applied,
    /// The request was current and failed; the caller routes the error.
    Failed(DashboardError),
    /// A newer request was started since; the outcome was dropped.
    Stale,
}

/// One view's current value plus the generation counter guarding it.
///
/// Only the latest request may touch the view: older responses are dropped
/// whether they succeeded or not. The value is swapped as a whole, so
/// readers holding the previous `Arc` keep a consistent copy.
#[derive(Debug)]
pub struct Session<T> {
    generation: u64,
    current: Option<Arc<T>>,
}

impl<T> Default for Session<T> {
    fn default() -> Self {
        Self {
            generation: 0,
            current: None,
        }
    }
}

impl<T> Session<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request; every earlier in-flight request becomes stale.
    pub fn begin(&mut self) -> Generation {
        self.generation += 1;
        Generation(self.generation)
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        generation.0 == self.generation
    }

    pub fn current(&self) -> Option<Arc<T>> {
        self.current.clone()
    }

    pub fn complete(&mut self, generation: Generation, outcome: DashboardResult<T>) -> Completion {
        if !self.is_current(generation) {
            tracing::warn!(
                "Discarding response for request #{} (latest is #{})",
                generation.0,
                self.generation
            );
            return Completion::Stale;
        }
        match outcome {
            Ok(value) => {
                self.current = Some(Arc::new(value));
                Completion::Applied
            }
            Err(e) => Completion::Failed(e),
        }
    }

    /// Drop the current value and invalidate anything in flight.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_request_applies() {
        let mut session: Session<&str> = Session::new();
        let g = session.begin();
        assert_eq!(session.complete(g, Ok("first")), Completion::Applied);
        assert_eq!(session.current().as_deref(), Some(&"first"));
    }

    #[test]
    fn test_superseded_response_is_discarded() {
        let mut session: Session<&str> = Session::new();
        let older = session.begin();
        let newer = session.begin();
        assert!(newer > older);

        assert_eq!(session.complete(newer, Ok("newer")), Completion::Applied);
        assert_eq!(session.complete(older, Ok("older")), Completion::Stale);
        assert_eq!(session.current().as_deref(), Some(&"newer"));
    }

    #[test]
    fn test_failure_keeps_previous_value() {
        let mut session: Session<&str> = Session::new();
        let g = session.begin();
        session.complete(g, Ok("kept"));

        let g = session.begin();
        let err = DashboardError::NetworkFailure("timeout".to_string());
        assert_eq!(session.complete(g, Err(err.clone())), Completion::Failed(err));
        assert_eq!(session.current().as_deref(), Some(&"kept"));
    }

    #[test]
    fn test_stale_failure_is_dropped() {
        let mut session: Session<&str> = Session::new();
        let older = session.begin();
        let _newer = session.begin();
        let err = DashboardError::NetworkFailure("late".to_string());
        assert_eq!(session.complete(older, Err(err)), Completion::Stale);
    }

    #[test]
    fn test_reset_clears_and_invalidates() {
        let mut session: Session<&str> = Session::new();
        let g = session.begin();
        session.complete(g, Ok("value"));

        let in_flight = session.begin();
        session.reset();
        assert!(session.current().is_none());
        assert_eq!(session.complete(in_flight, Ok("late")), Completion::Stale);
        assert!(session.current().is_none());
    }
}
