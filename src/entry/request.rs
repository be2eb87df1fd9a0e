use std::future::Future;
use anyhow::Context;
use reqwest::Client;
use serde::Deserialize;

use crate::ids::Username;
use crate::logger::Logger;
use crate::models::{Configuration, UsernameList};

#[derive(Debug, thiserror::Error)]
enum RequestError {
    #[error("failed get http request for `{}`.", .0)]
    HttpGet(String),
    #[error("cannot parse live status of `{}`. this data structure is wrong.", .0)]
    DataParse(String)
}

#[derive(Debug, Deserialize)]
struct LiveStatus {
    #[serde(rename = "isLive")]
    is_live: bool
}

/// Anything that can answer "is this channel broadcasting right now".
pub trait LiveStatusSource {
    fn is_live(&self, username: &Username) -> impl Future<Output = anyhow::Result<bool>>;
}

/// Status endpoint answering `GET {base}/{username}` with `{"isLive": bool}`.
pub struct StatusEndpoint {
    client: Client,
    base_url: String
}

impl StatusEndpoint {
    pub fn new(client: Client, config: &Configuration) -> StatusEndpoint {
        Self { client, base_url: config.as_ref_status_base_url().to_string() }
    }

    fn status_url(&self, username: &Username) -> String {
        format!("{}/{}", self.base_url, username)
    }
}

impl LiveStatusSource for StatusEndpoint {
    async fn is_live(&self, username: &Username) -> anyhow::Result<bool> {
        let status = self.client.get(self.status_url(username))
            .send().await
            .context(RequestError::HttpGet(username.to_string()))?
            .json::<LiveStatus>().await
            .context(RequestError::DataParse(username.to_string()))?;
        Ok(status.is_live)
    }
}

/// Queries every tracked channel in list order and keeps the live ones.
///
/// The first failing channel fails the whole check; nothing is skipped.
pub async fn request_live_channels<S>(source: &S, tracked: &UsernameList) -> anyhow::Result<Vec<Username>>
  where S: LiveStatusSource {
    let logger = Logger::new(Some("Live Status"));
    let mut live = Vec::new();
    for username in tracked.as_slice() {
        if source.is_live(username).await? {
            live.push(username.clone());
        }
    }

    let published = fallback_to_tracked(live, tracked);
    logger.info(format!("live >> [{}]", published.iter()
        .map(Username::as_ref)
        .collect::<Vec<&str>>()
        .join(", ")));
    Ok(published)
}

/// When nobody is live the link still points at every tracked channel,
/// so the published rule never degrades to an empty list.
pub fn fallback_to_tracked(live: Vec<Username>, tracked: &UsernameList) -> Vec<Username> {
    if live.is_empty() {
        tracked.as_slice().to_vec()
    } else {
        live
    }
}
