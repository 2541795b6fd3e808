//! Boundary between the transfer core and the network.
//!
//! [`UploadSession`](crate::upload::UploadSession) and
//! [`JobPoller`](crate::job::JobPoller) only talk to these traits; the HTTP
//! implementations below drive the API actions, tests plug in fakes.

use crate::{
    api::{
        Api,
        actions::{CompleteUpload, CompleteUploadRequest, GetOutput, GetUploadUrls, PutChunk},
        responses::{CompletedUpload, UploadReservation},
    },
    error::TransportError,
    job::JobHandle,
};
use async_trait::async_trait;
use bytes::Bytes;

#[async_trait]
pub trait UploadTransport: Send + Sync {
    /// Reserve `parts` presigned URLs for `file_name`.
    async fn reserve_upload(
        &self,
        file_name: &str,
        parts: u64,
    ) -> Result<UploadReservation, TransportError>;

    /// Send one chunk to its presigned URL, 2xx required.
    async fn put_chunk(&self, url: &str, index: u64, bytes: Bytes) -> Result<(), TransportError>;

    /// Commit the upload, returns the durable object key.
    async fn finalize_upload(
        &self,
        request: &CompleteUploadRequest,
    ) -> Result<CompletedUpload, TransportError>;
}

#[async_trait]
pub trait JobTransport: Send + Sync {
    /// Current body of the job resource, its `status` field drives the poller.
    async fn get_job_status(&self, handle: &JobHandle) -> Result<serde_json::Value, TransportError>;
}

/// Uploads scoped to one product.
#[derive(Debug, Clone)]
pub struct ProductUploads {
    api: Api,
    product_id: String,
}

impl ProductUploads {
    #[must_use]
    pub fn new(api: &Api, product_id: &str) -> Self {
        Self {
            api: api.clone(),
            product_id: product_id.to_string(),
        }
    }

    #[must_use]
    pub fn product_id(&self) -> &str {
        &self.product_id
    }
}

#[async_trait]
impl UploadTransport for ProductUploads {
    async fn reserve_upload(
        &self,
        file_name: &str,
        parts: u64,
    ) -> Result<UploadReservation, TransportError> {
        GetUploadUrls::new(&self.product_id, file_name, parts)
            .request(&self.api)
            .await
    }

    async fn put_chunk(&self, url: &str, index: u64, bytes: Bytes) -> Result<(), TransportError> {
        PutChunk::new(url, index, bytes)
            .request(self.api.client())
            .await
    }

    async fn finalize_upload(
        &self,
        request: &CompleteUploadRequest,
    ) -> Result<CompletedUpload, TransportError> {
        CompleteUpload::new(&self.product_id, request)
            .request(&self.api)
            .await
    }
}

#[async_trait]
impl JobTransport for Api {
    async fn get_job_status(&self, handle: &JobHandle) -> Result<serde_json::Value, TransportError> {
        GetOutput::new(handle.id()).request(self).await
    }
}
