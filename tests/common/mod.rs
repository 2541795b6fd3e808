//! Common test helpers for the HTTP integration tests
//!
//! - `api`: an [`Api`] pointed at a `mockito` server
//! - `access_query`: matcher for the access context query pairs
//! - `bearer`: the authorization header the client is expected to send

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use ind::api::{AccessContext, Api, Credentials};
use mockito::Matcher;
use secrecy::SecretString;
use std::io::Write;
use tempfile::NamedTempFile;

pub const ACCESS_TYPE: &str = "ACC";
pub const ACCESS_ID: &str = "1234+folder";

pub fn api(server_url: &str) -> Api {
    api_with_credentials(
        server_url,
        &Credentials::new(&SecretString::new("token".into()), None),
    )
}

pub fn api_with_credentials(server_url: &str, credentials: &Credentials) -> Api {
    Api::new(
        &format!("{server_url}/v1"),
        &AccessContext::new(ACCESS_TYPE, ACCESS_ID),
        credentials,
    )
    .expect("valid base url")
}

/// `accessType` and `accessId`, plus any extra pairs.
pub fn access_query(extra: &[(&str, &str)]) -> Matcher {
    let mut pairs = vec![
        Matcher::UrlEncoded("accessType".into(), ACCESS_TYPE.into()),
        Matcher::UrlEncoded("accessId".into(), ACCESS_ID.into()),
    ];
    for (k, v) in extra {
        pairs.push(Matcher::UrlEncoded((*k).into(), (*v).into()));
    }
    Matcher::AllOf(pairs)
}

pub fn bearer(api: &Api) -> String {
    format!("Bearer {}", api.credentials().token())
}

pub fn create_test_file(content: &[u8]) -> NamedTempFile {
    let mut tmp_file = NamedTempFile::new().unwrap();
    tmp_file.write_all(content).unwrap();
    tmp_file.flush().unwrap();
    tmp_file
}
