use serde_json::Value;
use std::fmt;

/// State of a job as reported by its `status` field. Only `Pending` keeps the
/// poller going, anything it does not recognise ends the wait as a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Success,
    Failed,
    Unknown(String),
}

impl JobStatus {
    #[must_use]
    pub fn parse(status: &str) -> Self {
        match status {
            "PENDING" => Self::Pending,
            "SUCCESS" => Self::Success,
            "FAILED" => Self::Failed,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Read the status out of a job body, a missing or non-string field is
    /// `Unknown("")`.
    #[must_use]
    pub fn from_body(body: &Value) -> Self {
        body.get("status")
            .and_then(Value::as_str)
            .map_or_else(|| Self::Unknown(String::new()), Self::parse)
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("PENDING"),
            Self::Success => f.write_str("SUCCESS"),
            Self::Failed => f.write_str("FAILED"),
            Self::Unknown(s) if s.is_empty() => f.write_str("<missing>"),
            Self::Unknown(s) => f.write_str(s),
        }
    }
}
