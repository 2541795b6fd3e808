use crate::{
    api::{AccessContext, Api, Credentials},
    job::PollOptions,
};
use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use std::{fs::File, path::PathBuf, time::Duration};

#[derive(Debug, Deserialize)]
pub struct Config {
    pub base_url: String,
    pub access_type: String,
    pub access_id: Option<String>,
    pub project: Option<String>,
    pub folder: Option<String>,
    pub delimiter: Option<String>,
    #[serde(default, deserialize_with = "secret")]
    pub token: Option<SecretString>,
    pub token_expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub poll: PollConfig,
}

#[derive(Debug, Default, Deserialize, Eq, PartialEq)]
pub struct PollConfig {
    pub max_attempts: Option<u32>,
    pub initial_delay_ms: Option<u64>,
    pub max_delay_ms: Option<u64>,
}

fn secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(SecretString::from))
}

impl Config {
    /// # Errors
    ///
    /// Will return `Err` if the file can not be opened or parsed
    pub fn new(config_path: PathBuf) -> Result<Self> {
        let file = File::open(&config_path)
            .with_context(|| format!("unable to open: {}", config_path.display()))?;

        let config: Self =
            serde_yaml_ng::from_reader(file).context("unable to parse config file")?;

        Ok(config)
    }

    /// `access_id` as configured, or derived from `project`, `folder` and
    /// `delimiter`.
    ///
    /// # Errors
    ///
    /// Will return `Err` if neither form is complete
    pub fn access(&self) -> Result<AccessContext> {
        if let Some(access_id) = &self.access_id {
            return Ok(AccessContext::new(&self.access_type, access_id));
        }

        match (&self.project, &self.folder, &self.delimiter) {
            (Some(project), Some(folder), Some(delimiter)) => Ok(AccessContext::for_folder(
                &self.access_type,
                project,
                folder,
                delimiter,
            )),
            _ => Err(anyhow!(
                "no access_id, set it or set project, folder and delimiter"
            )),
        }
    }

    /// The token from the file, `IND_TOKEN` takes precedence.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        let token = self
            .token
            .clone()
            .unwrap_or_else(|| SecretString::from(String::new()));

        Credentials::new(&token, self.token_expires_at)
    }

    /// # Errors
    ///
    /// Will return `Err` if the access context is incomplete, there is no token
    /// or the base URL is invalid
    pub fn api(&self) -> Result<Api> {
        let credentials = self.credentials();

        if credentials.token().is_empty() {
            return Err(anyhow!("no token, set token in the config file or IND_TOKEN"));
        }

        Api::new(&self.base_url, &self.access()?, &credentials)
            .with_context(|| format!("invalid base_url: {}", self.base_url))
    }
}

impl PollConfig {
    /// Poll options with the configured values over the defaults.
    #[must_use]
    pub fn options(&self) -> PollOptions {
        let defaults = PollOptions::default();

        PollOptions {
            max_attempts: self.max_attempts.unwrap_or(defaults.max_attempts),
            initial_delay: self
                .initial_delay_ms
                .map_or(defaults.initial_delay, Duration::from_millis),
            max_delay: self
                .max_delay_ms
                .map_or(defaults.max_delay, Duration::from_millis),
            multiplier: defaults.multiplier,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::api::credentials::TOKEN_ENV;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CONF: &str = r"---
base_url: https://developer.api.autodesk.com/industrialized-construction/informed-design/v1
access_type: ACC
access_id: 1234+folder
token: XXX
token_expires_at: 2030-01-01T00:00:00Z
poll:
  max_attempts: 10
  initial_delay_ms: 100";

    const CONF_FOLDER: &str = r"---
base_url: https://example.com/v1
access_type: ACC
project: b.1234-abcd
folder: urn:adsk.wipprod:fs.folder:co.XYZ
delimiter: '+'
token: XXX";

    const CONF_NO_ACCESS: &str = r"---
base_url: https://example.com/v1
access_type: ACC
project: b.1234-abcd";

    fn config(content: &str) -> Config {
        let mut tmp_file = NamedTempFile::new().unwrap();
        tmp_file.write_all(content.as_bytes()).unwrap();
        Config::new(tmp_file.into_temp_path().to_path_buf()).unwrap()
    }

    #[test]
    fn test_config() {
        let c = config(CONF);
        assert_eq!(c.access_type, "ACC");
        assert_eq!(c.access().unwrap(), AccessContext::new("ACC", "1234+folder"));
        assert_eq!(
            c.token_expires_at,
            Some("2030-01-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap())
        );

        let options = c.poll.options();
        assert_eq!(options.max_attempts, 10);
        assert_eq!(options.initial_delay, Duration::from_millis(100));
        assert_eq!(options.max_delay, PollOptions::default().max_delay);
    }

    #[test]
    fn test_config_credentials() {
        temp_env::with_var_unset(TOKEN_ENV, || {
            let c = config(CONF);
            assert_eq!(c.credentials().token(), "XXX");
            assert!(c.api().is_ok());
        });
    }

    #[test]
    fn test_config_access_from_folder() {
        let c = config(CONF_FOLDER);
        let access = c.access().unwrap();
        assert_eq!(
            access.access_id,
            "1234-abcd+urn:adsk.wipprod:fs.folder:co.XYZ"
        );
        assert_eq!(c.poll.options(), PollOptions::default());
    }

    #[test]
    fn test_config_missing_access_and_token() {
        temp_env::with_var_unset(TOKEN_ENV, || {
            let c = config(CONF_NO_ACCESS);
            assert!(c.access().is_err());
            assert!(c.api().is_err());
        });
    }

    #[test]
    fn test_config_token_from_env() {
        temp_env::with_var(TOKEN_ENV, Some("env-token"), || {
            let c = config(CONF_NO_ACCESS);
            assert_eq!(c.credentials().token(), "env-token");
        });
    }

    #[test]
    fn test_config_missing_file() {
        assert!(Config::new(PathBuf::from("/nonexistent/config.yml")).is_err());
    }

    #[test]
    fn test_config_invalid() {
        let mut tmp_file = NamedTempFile::new().unwrap();
        tmp_file.write_all(b"base_url: [").unwrap();
        assert!(Config::new(tmp_file.into_temp_path().to_path_buf()).is_err());
    }
}
