//! Reserve one presigned URL per part
//! Maximum number of parts per upload 25
//! Minimum part size 5 MiB (except the last part)

use crate::{
    api::actions::Action,
    api::responses::UploadReservation,
    api::{Api, request},
    error::TransportError,
};
use reqwest::Method;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Payload<'a> {
    file_name: &'a str,
    parts: u64,
}

#[derive(Debug, Default)]
pub struct GetUploadUrls<'a> {
    product_id: &'a str,
    file_name: &'a str,
    parts: u64,
}

impl<'a> GetUploadUrls<'a> {
    #[must_use]
    pub const fn new(product_id: &'a str, file_name: &'a str, parts: u64) -> Self {
        Self {
            product_id,
            file_name,
            parts,
        }
    }

    fn payload(&self) -> Result<Vec<u8>, TransportError> {
        Ok(serde_json::to_vec(&Payload {
            file_name: self.file_name,
            parts: self.parts,
        })?)
    }

    /// # Errors
    ///
    /// Will return `Err` if can not make the request or the response is not 2xx
    pub async fn request(&self, api: &Api) -> Result<UploadReservation, TransportError> {
        let url = self.url(api)?;
        let response = request::request(api, url, self.http_method(), Some(self.payload()?)).await?;
        request::json(response).await
    }
}

impl Action for GetUploadUrls<'_> {
    fn http_method(&self) -> Method {
        Method::POST
    }

    fn query_pairs(&self) -> Option<BTreeMap<&str, &str>> {
        None
    }

    fn path(&self) -> Vec<&str> {
        vec!["products", self.product_id, "upload-urls"]
    }
}
