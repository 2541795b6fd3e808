pub mod access;
pub mod actions;
pub mod credentials;
pub mod limits;
pub mod request;
pub mod responses;
pub use self::{access::AccessContext, credentials::Credentials};

use crate::error::TransportError;
use std::fmt;
use url::Url;

#[derive(Debug, Clone)]
pub struct Api {
    // API root, e.g. https://developer.api.autodesk.com/industrialized-construction/informed-design/v1
    base_url: Url,
    // accessType/accessId pair
    access: AccessContext,
    // bearer token
    credentials: Credentials,
    client: reqwest::Client,
}

// Informed Design API Reference
// <https://aps.autodesk.com/en/docs/informed-design/v1/reference/>
impl Api {
    /// # Errors
    ///
    /// Will return `Err` if the base URL can not be parsed or can not be a base
    pub fn new(
        base_url: &str,
        access: &AccessContext,
        credentials: &Credentials,
    ) -> Result<Self, TransportError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(TransportError::Response(format!(
                "base URL cannot be a base: {base_url}"
            )));
        }

        Ok(Self {
            base_url,
            access: access.clone(),
            credentials: credentials.clone(),
            client: reqwest::Client::new(),
        })
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub const fn access(&self) -> &AccessContext {
        &self.access
    }

    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    #[must_use]
    pub const fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

impl fmt::Display for Api {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "base url: {}", self.base_url)?;
        writeln!(f, "access: {}", self.access)?;
        match self.credentials.expires_at() {
            Some(at) => write!(f, "token expires: {at}"),
            None => write!(f, "token expires: unknown"),
        }
    }
}
