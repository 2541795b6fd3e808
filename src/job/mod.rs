//! Waiting on asynchronous server-side jobs (outputs) until they settle.

pub mod poller;
pub mod status;

pub use self::{
    poller::{JobPoller, JobResult, PollOptions, PollProgress},
    status::JobStatus,
};

use std::fmt;

/// An output being generated on the server, polled on `outputs/{id}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle {
    id: String,
}

impl JobHandle {
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self { id: id.to_string() }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Path of the status resource, relative to the API root.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("outputs/{}", self.id)
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}
