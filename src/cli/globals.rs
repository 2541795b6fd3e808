use crate::job::PollOptions;
use std::time::Duration;

// Define the global arguments
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub quiet: bool,
    pub max_requests: u8,
    pub timeout: Option<Duration>,
    pub poll: PollOptions,
}

impl Default for GlobalArgs {
    fn default() -> Self {
        Self::new()
    }
}

impl GlobalArgs {
    #[must_use]
    pub fn new() -> Self {
        Self {
            quiet: false,
            max_requests: 1,
            timeout: None,
            poll: PollOptions::default(),
        }
    }

    /// 0 disables the deadline.
    pub fn set_timeout(&mut self, seconds: u64) {
        self.timeout = (seconds > 0).then(|| Duration::from_secs(seconds));
    }

    pub const fn set_attempts(&mut self, attempts: u32) {
        self.poll.max_attempts = attempts;
    }
}
