use crate::{
    api::actions::Action,
    api::responses::{OutputSummary, OutputsResult},
    api::{Api, request},
    error::TransportError,
};
use reqwest::Method;
use std::collections::BTreeMap;

/// List the outputs generated for a variant.
#[derive(Debug, Default)]
pub struct ListOutputs<'a> {
    variant_id: &'a str,
}

impl<'a> ListOutputs<'a> {
    #[must_use]
    pub const fn new(variant_id: &'a str) -> Self {
        Self { variant_id }
    }

    /// # Errors
    ///
    /// Will return `Err` if can not make the request or the response is not 2xx
    pub async fn request(&self, api: &Api) -> Result<Vec<OutputSummary>, TransportError> {
        let url = self.url(api)?;
        let response = request::request(api, url, self.http_method(), None).await?;
        let rs: OutputsResult = request::json(response).await?;
        Ok(rs.results)
    }
}

impl Action for ListOutputs<'_> {
    fn http_method(&self) -> Method {
        Method::GET
    }

    fn query_pairs(&self) -> Option<BTreeMap<&str, &str>> {
        let mut map: BTreeMap<&str, &str> = BTreeMap::new();
        map.insert("filter[variantId]", self.variant_id);
        Some(map)
    }

    fn path(&self) -> Vec<&str> {
        vec!["outputs"]
    }
}
