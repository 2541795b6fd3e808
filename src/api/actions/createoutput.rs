use crate::{
    api::actions::Action,
    api::responses::CreateOutputsResult,
    api::{Api, request},
    error::TransportError,
};
use reqwest::Method;
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-type output settings, e.g. `RFA` outputs carry the Revit version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutputSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub representation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Serialize)]
struct OutputRequest<'a> {
    #[serde(rename = "type")]
    output_type: &'a str,
    settings: &'a OutputSettings,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Payload<'a> {
    variant_id: &'a str,
    outputs: [OutputRequest<'a>; 1],
}

#[derive(Debug)]
pub struct CreateOutput<'a> {
    variant_id: &'a str,
    output_type: &'a str,
    settings: &'a OutputSettings,
}

impl<'a> CreateOutput<'a> {
    #[must_use]
    pub const fn new(variant_id: &'a str, output_type: &'a str, settings: &'a OutputSettings) -> Self {
        Self {
            variant_id,
            output_type,
            settings,
        }
    }

    fn payload(&self) -> Result<Vec<u8>, TransportError> {
        Ok(serde_json::to_vec(&Payload {
            variant_id: self.variant_id,
            outputs: [OutputRequest {
                output_type: self.output_type,
                settings: self.settings,
            }],
        })?)
    }

    /// Returns the id of the created output.
    ///
    /// # Errors
    ///
    /// Will return `Err` if can not make the request, the response is not 2xx
    /// or no output was created
    pub async fn request(&self, api: &Api) -> Result<String, TransportError> {
        let url = self.url(api)?;
        let response = request::request(api, url, self.http_method(), Some(self.payload()?)).await?;
        let rs: CreateOutputsResult = request::json(response).await?;

        rs.outputs
            .into_iter()
            .next()
            .map(|output| output.id)
            .ok_or_else(|| TransportError::Response("no outputs returned".to_string()))
    }
}

impl Action for CreateOutput<'_> {
    fn http_method(&self) -> Method {
        Method::POST
    }

    fn query_pairs(&self) -> Option<BTreeMap<&str, &str>> {
        None
    }

    fn path(&self) -> Vec<&str> {
        vec!["outputs"]
    }
}
