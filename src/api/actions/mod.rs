//! Actions
//! <https://aps.autodesk.com/en/docs/informed-design/v1/reference/>

use crate::api::Api;
use crate::error::TransportError;
use reqwest::Method;
use std::collections::BTreeMap;
use url::Url;

// <https://aps.autodesk.com/en/docs/informed-design/v1/reference/quick_reference/informed-design-api-getuploadurls-POST/>
mod getuploadurls;
pub use self::getuploadurls::GetUploadUrls;

mod putchunk;
pub use self::putchunk::PutChunk;

// <https://aps.autodesk.com/en/docs/informed-design/v1/reference/quick_reference/informed-design-api-completeupload-POST/>
mod completeupload;
pub use self::completeupload::{CompleteUpload, CompleteUploadRequest};

// <https://aps.autodesk.com/en/docs/informed-design/v1/reference/quick_reference/informed-design-api-postoutputs-POST/>
mod createoutput;
pub use self::createoutput::{CreateOutput, OutputSettings};

// <https://aps.autodesk.com/en/docs/informed-design/v1/reference/quick_reference/informed-design-api-getoutputs-GET/>
mod listoutputs;
pub use self::listoutputs::ListOutputs;

// <https://aps.autodesk.com/en/docs/informed-design/v1/reference/quick_reference/informed-design-api-getoutput-GET/>
mod getoutput;
pub use self::getoutput::GetOutput;

// <https://aps.autodesk.com/en/docs/informed-design/v1/reference/quick_reference/informed-design-api-getdownloads-GET/>
mod getdownloadurl;
pub use self::getdownloadurl::GetDownloadUrl;

pub trait Action {
    // method to use GET/POST...
    fn http_method(&self) -> Method;

    // URL query pairs, the access context is added by `url`
    fn query_pairs(&self) -> Option<BTreeMap<&str, &str>>;

    // URL path, relative to the API base URL
    fn path(&self) -> Vec<&str>;

    /// # Errors
    ///
    /// Will return `Err` if the base URL cannot be a base
    fn url(&self, api: &Api) -> Result<Url, TransportError> {
        let mut url = api.base_url().clone();

        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| TransportError::Response(format!("cannot be base: {}", api.base_url())))?;
            segments.pop_if_empty();
            for p in self.path() {
                segments.push(p);
            }
        }

        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in api.access().query_pairs() {
                pairs.append_pair(k, v);
            }
            if let Some(query) = self.query_pairs() {
                for (k, v) in query {
                    pairs.append_pair(k, v);
                }
            }
        }

        Ok(url)
    }
}
