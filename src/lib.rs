//! Client for the Informed Design API: chunked uploads through presigned URLs
//! and waiting on asynchronously generated outputs.

pub mod api;
pub mod cli;
pub mod error;
pub mod job;
pub mod transport;
pub mod upload;
