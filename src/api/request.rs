use crate::{api::Api, error::TransportError};
use bytes::Bytes;
use chrono::Utc;
use reqwest::{Method, Response, header::CONTENT_TYPE};
use url::Url;

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_OCTET_STREAM: &str = "application/octet-stream";

/// Authenticated API call, the body (if any) is sent as JSON.
///
/// # Errors
///
/// Will return `Err` if the credential is expired or can not make the request
pub async fn request(
    api: &Api,
    url: Url,
    method: Method,
    body: Option<Vec<u8>>,
) -> Result<Response, TransportError> {
    if let Some(expired_at) = api.credentials().expired(Utc::now()) {
        return Err(TransportError::Expired { expired_at });
    }

    log::debug!("{method} {url}");

    let request = api
        .client()
        .request(method, url)
        .bearer_auth(api.credentials().token());

    let request = match body {
        Some(body) => request.header(CONTENT_TYPE, CONTENT_TYPE_JSON).body(body),
        None => request,
    };

    Ok(request.send().await?)
}

/// Raw binary PUT to a presigned URL, the URL itself authorizes the request so
/// no bearer token is sent.
///
/// # Errors
///
/// Will return `Err` if can not make the request
pub async fn put_bytes(
    client: &reqwest::Client,
    url: &str,
    bytes: Bytes,
) -> Result<Response, TransportError> {
    let url = Url::parse(url)?;
    let length = bytes.len();

    log::debug!("PUT {} ({length} bytes)", url.path());

    let request = client
        .put(url)
        .header(CONTENT_TYPE, CONTENT_TYPE_OCTET_STREAM)
        .body(bytes);

    Ok(request.send().await?)
}

/// Turns a non-2xx response into a [`TransportError`] keeping status and body.
pub async fn response_error(response: Response) -> TransportError {
    let status = response.status().as_u16();
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            log::debug!("Could not read response body: {e}");
            format!("<unreadable body: {e}>")
        }
    };

    log::debug!("HTTP Status Code: {status}, Response: {body}");

    TransportError::from_status(status, body)
}

/// Reads the body of a successful response as JSON.
///
/// # Errors
///
/// Will return `Err` if the response is not 2xx or the body is not valid JSON
pub async fn json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, TransportError> {
    if response.status().is_success() {
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    } else {
        Err(response_error(response).await)
    }
}
