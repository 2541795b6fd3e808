use crate::{api::request, error::TransportError};
use bytes::Bytes;

/// PUT one chunk to its presigned URL.
#[derive(Debug, Clone)]
pub struct PutChunk<'a> {
    url: &'a str,
    index: u64,
    bytes: Bytes,
}

impl<'a> PutChunk<'a> {
    #[must_use]
    pub const fn new(url: &'a str, index: u64, bytes: Bytes) -> Self {
        Self { url, index, bytes }
    }

    /// # Errors
    ///
    /// Will return `Err` if can not make the request or the response is not 2xx
    pub async fn request(self, client: &reqwest::Client) -> Result<(), TransportError> {
        let response = request::put_bytes(client, self.url, self.bytes).await?;

        if response.status().is_success() {
            log::debug!("chunk {} accepted: {}", self.index, response.status());
            Ok(())
        } else {
            Err(request::response_error(response).await)
        }
    }
}
