use crate::{
    api::actions::Action,
    api::{Api, request},
    error::TransportError,
};
use reqwest::Method;
use std::collections::BTreeMap;

/// Fetch one output, the body's `status` tells whether it is ready.
#[derive(Debug, Default)]
pub struct GetOutput<'a> {
    output_id: &'a str,
}

impl<'a> GetOutput<'a> {
    #[must_use]
    pub const fn new(output_id: &'a str) -> Self {
        Self { output_id }
    }

    /// # Errors
    ///
    /// Will return `Err` if can not make the request or the response is not 2xx
    pub async fn request(&self, api: &Api) -> Result<serde_json::Value, TransportError> {
        let url = self.url(api)?;
        let response = request::request(api, url, self.http_method(), None).await?;
        request::json(response).await
    }
}

impl Action for GetOutput<'_> {
    fn http_method(&self) -> Method {
        Method::GET
    }

    fn query_pairs(&self) -> Option<BTreeMap<&str, &str>> {
        None
    }

    fn path(&self) -> Vec<&str> {
        vec!["outputs", self.output_id]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::api::actions::tests::api;

    #[test]
    fn test_url() {
        let action = GetOutput::new("out-1");
        assert_eq!(Method::GET, action.http_method());
        let url = action.url(&api()).unwrap();
        assert!(url.path().ends_with("/v1/outputs/out-1"));
        assert_eq!(url.query(), Some("accessType=ACC&accessId=1234%2Bfolder"));
    }
}
