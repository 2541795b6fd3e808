use crate::{
    api::actions::Action,
    api::responses::DownloadsResult,
    api::{Api, request},
    error::TransportError,
};
use reqwest::Method;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct GetDownloadUrl<'a> {
    output_id: &'a str,
}

impl<'a> GetDownloadUrl<'a> {
    #[must_use]
    pub const fn new(output_id: &'a str) -> Self {
        Self { output_id }
    }

    /// # Errors
    ///
    /// Will return `Err` if can not make the request, the response is not 2xx
    /// or there is no download for the output
    pub async fn request(&self, api: &Api) -> Result<String, TransportError> {
        let url = self.url(api)?;
        let response = request::request(api, url, self.http_method(), None).await?;
        let rs: DownloadsResult = request::json(response).await?;

        rs.results
            .into_iter()
            .next()
            .map(|download| download.url)
            .ok_or_else(|| {
                TransportError::Response(format!("no download available for output {}", self.output_id))
            })
    }
}

impl Action for GetDownloadUrl<'_> {
    fn http_method(&self) -> Method {
        Method::GET
    }

    fn query_pairs(&self) -> Option<BTreeMap<&str, &str>> {
        let mut map: BTreeMap<&str, &str> = BTreeMap::new();
        map.insert("outputIds", self.output_id);
        Some(map)
    }

    fn path(&self) -> Vec<&str> {
        vec!["downloads"]
    }
}
