pub mod download;
pub mod output;
pub mod outputs;
pub mod upload;
pub mod wait;

use crate::error::{JobError, UploadError};
use std::path::PathBuf;

/// Exit status when the output ended in `FAILED` or an unknown status.
pub const EXIT_JOB_FAILED: i32 = 2;

/// Exit status when the output was still pending after the last attempt.
pub const EXIT_JOB_TIMED_OUT: i32 = 3;

/// Exit status after Ctrl-C or the `--timeout` deadline.
pub const EXIT_CANCELLED: i32 = 130;

#[derive(Debug)]
pub enum Action {
    Upload {
        product_id: String,
        file: PathBuf,
    },
    CreateOutput {
        variant_id: String,
        output_type: String,
        representation: Option<String>,
        version: Option<String>,
        wait: bool,
    },
    ListOutputs {
        variant_id: String,
    },
    WaitOutput {
        output_id: String,
    },
    Download {
        output_id: String,
    },
}

/// Map an error to the process exit status.
#[must_use]
pub fn exit_code(err: &anyhow::Error) -> i32 {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<JobError>() {
            return match e {
                JobError::Failed { .. } => EXIT_JOB_FAILED,
                JobError::TimedOut { .. } => EXIT_JOB_TIMED_OUT,
                JobError::Cancelled { .. } => EXIT_CANCELLED,
                JobError::Transport { .. } => 1,
            };
        }

        if let Some(UploadError::Cancelled { .. }) = cause.downcast_ref::<UploadError>() {
            return EXIT_CANCELLED;
        }
    }

    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use anyhow::Context;

    #[test]
    fn test_exit_code() {
        let err = anyhow::Error::from(JobError::Failed {
            status: "FAILED".to_string(),
            attempts: 2,
        });
        assert_eq!(exit_code(&err), EXIT_JOB_FAILED);

        let rs: Result<(), JobError> = Err(JobError::TimedOut {
            last_status: "PENDING".to_string(),
            attempts: 5,
        });
        let err = rs.context("waiting on output").unwrap_err();
        assert_eq!(exit_code(&err), EXIT_JOB_TIMED_OUT);

        let err = anyhow::Error::from(UploadError::Cancelled {
            phase: crate::error::UploadPhase::Transfer,
            completed: vec![0],
        });
        assert_eq!(exit_code(&err), EXIT_CANCELLED);

        let err = anyhow::Error::from(UploadError::Finalize(TransportError::from_status(
            500,
            String::new(),
        )));
        assert_eq!(exit_code(&err), 1);

        assert_eq!(exit_code(&anyhow::anyhow!("no token")), 1);
    }
}
