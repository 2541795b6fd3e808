//! Chunked upload of a local file through presigned URLs.

pub mod plan;
pub mod session;
pub mod target;

pub use self::{
    plan::{ChunkPlan, ChunkRange, plan, plan_with},
    session::{UploadEvent, UploadOptions, UploadSession},
    target::UploadTarget,
};
