use std::io::Read;
use std::path::Path;
use std::time::Duration;
use anyhow::Context;
use once_cell::sync::OnceCell;
use regex::Regex;
use reqwest::Url;
use serde::Deserialize;

use crate::ids::{RuleId, Username, ZoneId};
use crate::logger::Logger;

pub const DEFAULT_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_STATUS_BASE_URL: &str = "http://127.0.0.1:8080/twitch";
pub const DEFAULT_PROVIDER_BASE_URL: &str = "https://api.cloudflare.com/client/v4";

#[derive(Debug, thiserror::Error)]
pub enum ExternalFileLoadError {
    #[error("cannot open {}", .0)]
    CannotOpen(String),
    #[error("cannot deserialize {}", .0)]
    CannotDeserialize(String)
}

#[derive(Debug, thiserror::Error, Eq, PartialEq)]
pub enum ValidationError {
    #[error("`{}` must not be empty.", .0)]
    EmptyField(&'static str),
    #[error("`{}` must be greater than zero.", .0)]
    ZeroDuration(&'static str),
    #[error("`{}` is not a valid url: {}", .0, .1)]
    InvalidUrl(&'static str, String),
    #[error("username list must contain at least one name.")]
    NoUsernames
}

/// What the scheduler does with a cycle that failed.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop the loop and exit the process with the error.
    Abort,
    /// Log the error and wait for the next tick.
    SkipCycle
}

impl Default for FailurePolicy {
    fn default() -> Self {
        FailurePolicy::Abort
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Configuration {
    api_key: String,
    #[serde(rename = "zone_identifier")]
    zone_id: ZoneId,
    #[serde(rename = "id")]
    rule_id: RuleId,
    #[serde(default = "default_interval_secs")]
    interval_secs: u64,
    #[serde(rename = "twitch_redis_cache_url", default = "default_status_base_url")]
    status_base_url: String,
    #[serde(default = "default_provider_base_url")]
    provider_base_url: String,
    #[serde(default)]
    on_failure: FailurePolicy,
    #[serde(default = "default_request_timeout_secs")]
    request_timeout_secs: u64
}

fn default_interval_secs() -> u64 { DEFAULT_INTERVAL_SECS }
fn default_request_timeout_secs() -> u64 { DEFAULT_REQUEST_TIMEOUT_SECS }
fn default_status_base_url() -> String { DEFAULT_STATUS_BASE_URL.to_string() }
fn default_provider_base_url() -> String { DEFAULT_PROVIDER_BASE_URL.to_string() }

impl Configuration {
    pub fn as_ref_api_key(&self) -> &str {
        &self.api_key
    }

    pub fn as_ref_zone_id(&self) -> &ZoneId {
        &self.zone_id
    }

    pub fn as_ref_rule_id(&self) -> &RuleId {
        &self.rule_id
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Status endpoint base without a trailing slash.
    pub fn as_ref_status_base_url(&self) -> &str {
        self.status_base_url.trim_end_matches('/')
    }

    /// Provider API base without a trailing slash.
    pub fn as_ref_provider_base_url(&self) -> &str {
        self.provider_base_url.trim_end_matches('/')
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.on_failure
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.api_key.trim().is_empty() {
            return Err(ValidationError::EmptyField("api_key"));
        }
        if self.zone_id.is_empty() {
            return Err(ValidationError::EmptyField("zone_identifier"));
        }
        if self.rule_id.is_empty() {
            return Err(ValidationError::EmptyField("id"));
        }
        if self.interval_secs == 0 {
            return Err(ValidationError::ZeroDuration("interval_secs"));
        }
        if self.request_timeout_secs == 0 {
            return Err(ValidationError::ZeroDuration("request_timeout_secs"));
        }
        for (field, url) in [("twitch_redis_cache_url", &self.status_base_url), ("provider_base_url", &self.provider_base_url)] {
            Url::parse(url)
                .map_err(|reason| ValidationError::InvalidUrl(field, reason.to_string()))?;
        }
        Ok(())
    }
}

impl Configuration {
    pub fn load_from<P>(path: P) -> anyhow::Result<Configuration>
      where P: AsRef<Path> {
        let config: Configuration = serde_json::from_str(&read_file(path.as_ref())?)
            .context(ExternalFileLoadError::CannotDeserialize(path.as_ref().display().to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

fn get_login_regex() -> &'static Regex {
    static REGEX: OnceCell<Regex> = OnceCell::new();
    REGEX.get_or_init(|| {
        Regex::new("^[A-Za-z0-9_]{1,25}$").expect("static login pattern")
    })
}

/// Ordered channel logins to track. Order is kept in the published link.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct UsernameList(Vec<Username>);

impl UsernameList {
    #[cfg(test)]
    pub fn new(names: Vec<Username>) -> UsernameList {
        Self(names)
    }

    pub fn as_slice(&self) -> &[Username] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn load_from<P>(path: P) -> anyhow::Result<UsernameList>
      where P: AsRef<Path> {
        let logger = Logger::new(Some("Usernames"));
        let list: UsernameList = serde_json::from_str(&read_file(path.as_ref())?)
            .context(ExternalFileLoadError::CannotDeserialize(path.as_ref().display().to_string()))?;
        if list.0.is_empty() {
            return Err(ValidationError::NoUsernames.into());
        }
        list.0.iter()
            .filter(|name| !get_login_regex().is_match(name.as_ref()))
            .for_each(|name| logger.caut(format!("`{}` does not look like a channel login", name)));
        Ok(list)
    }
}

fn read_file(path: &Path) -> anyhow::Result<String> {
    let mut buf = String::new();
    std::fs::File::open(path)
        .context(ExternalFileLoadError::CannotOpen(path.display().to_string()))?
        .read_to_string(&mut buf)
        .context(ExternalFileLoadError::CannotOpen(path.display().to_string()))?;
    Ok(buf)
}
