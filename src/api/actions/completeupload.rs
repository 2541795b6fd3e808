use crate::{
    api::Api,
    api::actions::Action,
    api::request::{self, CONTENT_TYPE_OCTET_STREAM},
    api::responses::CompletedUpload,
    error::TransportError,
};
use reqwest::Method;
use serde::Serialize;
use std::collections::BTreeMap;

/// Body of the complete-upload call, `object_key` and `upload_key` are echoed
/// back unchanged from the reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteUploadRequest {
    pub object_key: String,
    pub upload_key: String,
    pub file_name: String,
    pub file_size: u64,
    pub content_type: String,
}

impl CompleteUploadRequest {
    #[must_use]
    pub fn new(object_key: &str, upload_key: &str, file_name: &str, file_size: u64) -> Self {
        Self {
            object_key: object_key.to_string(),
            upload_key: upload_key.to_string(),
            file_name: file_name.to_string(),
            file_size,
            content_type: CONTENT_TYPE_OCTET_STREAM.to_string(),
        }
    }
}

#[derive(Debug)]
pub struct CompleteUpload<'a> {
    product_id: &'a str,
    body: &'a CompleteUploadRequest,
}

impl<'a> CompleteUpload<'a> {
    #[must_use]
    pub const fn new(product_id: &'a str, body: &'a CompleteUploadRequest) -> Self {
        Self { product_id, body }
    }

    /// # Errors
    ///
    /// Will return `Err` if can not make the request or the response is not 2xx
    pub async fn request(&self, api: &Api) -> Result<CompletedUpload, TransportError> {
        let url = self.url(api)?;
        let body = serde_json::to_vec(self.body)?;
        let response = request::request(api, url, self.http_method(), Some(body)).await?;
        request::json(response).await
    }
}

impl Action for CompleteUpload<'_> {
    fn http_method(&self) -> Method {
        Method::POST
    }

    fn query_pairs(&self) -> Option<BTreeMap<&str, &str>> {
        None
    }

    fn path(&self) -> Vec<&str> {
        vec!["products", self.product_id, "complete-upload"]
    }
}
