use anyhow::Context;
use once_cell::sync::OnceCell;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use crate::models::Configuration;

const DEFAULT_CONFIG_PATH: &str = "./config.json";
const DEFAULT_USERNAMES_PATH: &str = "./usernames.json";
const USER_AGENT_VALUE: &str = "multiview-forwarder (keeps a page rule pointed at the channels currently live)";

pub fn get_config_path() -> &'static str {
    static PATH: OnceCell<String> = OnceCell::new();
    PATH.get_or_init(|| {
        dotenv::var("CONFIG_PATH")
            .unwrap_or_else(|_| String::from(DEFAULT_CONFIG_PATH))
    })
}

pub fn get_usernames_path() -> &'static str {
    static PATH: OnceCell<String> = OnceCell::new();
    PATH.get_or_init(|| {
        dotenv::var("USERNAMES_PATH")
            .unwrap_or_else(|_| String::from(DEFAULT_USERNAMES_PATH))
    })
}

#[derive(Debug, thiserror::Error)]
pub enum ClientBuildError {
    #[error("cannot build http client.")]
    Build
}

/// One client for both endpoints, so connections are pooled across cycles.
pub fn build_http_client(config: &Configuration) -> anyhow::Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
    Client::builder()
        .default_headers(headers)
        .timeout(config.request_timeout())
        .build()
        .context(ClientBuildError::Build)
}
