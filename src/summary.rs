use std::time::{Duration, Instant};

/// What happened when a task ran: when it started, when it ended, and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary<E> {
    pub start: Instant,
    pub end: Instant,
    pub result: Result<(), E>,
}

impl<E> Summary<E> {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// The error the task ended with, if any.
    pub fn err(&self) -> Option<&E> {
        self.result.as_ref().err()
    }

    pub fn failed(&self) -> bool {
        self.result.is_err()
    }

    pub fn into_result(self) -> Result<(), E> {
        self.result
    }
}
