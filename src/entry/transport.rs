use std::future::Future;
use anyhow::Context;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::ids::{RuleId, Username, ZoneId};
use crate::logger::Logger;
use crate::models::Configuration;

pub const MULTIVIEW_BASE: &str = "http://multitwitch.tv";
pub const FORWARDING_ACTION: &str = "forwarding_url";
pub const FORWARDING_STATUS: u16 = 302;

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("cannot serialize page rule.")]
    Serialize,
    #[error("failed put http request to {}.", .0)]
    HttpPut(String),
    #[error("cannot read provider response body.")]
    BodyRead
}

/// `http://multitwitch.tv/a/b/c` for `[a, b, c]`.
pub fn build_multiview_link(channels: &[Username]) -> String {
    let path = channels.iter()
        .map(Username::as_ref)
        .collect::<Vec<&str>>()
        .join("/");
    format!("{}/{}", MULTIVIEW_BASE, path)
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct PageRule {
    actions: Vec<Action>
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Action {
    id: String,
    value: ForwardingTarget
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ForwardingTarget {
    url: String,
    status_code: u16
}

impl PageRule {
    /// A rule with a single temporary redirect to `url`.
    pub fn forwarding(url: impl Into<String>) -> PageRule {
        Self {
            actions: vec![Action {
                id: FORWARDING_ACTION.to_string(),
                value: ForwardingTarget { url: url.into(), status_code: FORWARDING_STATUS }
            }]
        }
    }

    #[cfg(test)]
    pub fn as_ref_actions(&self) -> &[Action] {
        &self.actions
    }
}

#[cfg(test)]
impl Action {
    pub fn as_ref_id(&self) -> &str {
        &self.id
    }

    pub fn as_ref_url(&self) -> &str {
        &self.value.url
    }

    pub fn status_code(&self) -> u16 {
        self.value.status_code
    }
}

/// Destination for a built page rule. Returns the raw provider response.
pub trait RulePublisher {
    fn publish(&self, rule: &PageRule) -> impl Future<Output = anyhow::Result<String>>;
}

pub struct PageRuleEndpoint {
    client: Client,
    api_key: String,
    rule_url: String
}

pub fn build_rule_url(provider_base: &str, zone: &ZoneId, rule: &RuleId) -> String {
    format!("{}/zones/{}/pagerules/{}", provider_base, zone, rule)
}

impl PageRuleEndpoint {
    pub fn new(client: Client, config: &Configuration) -> PageRuleEndpoint {
        Self {
            client,
            api_key: config.as_ref_api_key().to_string(),
            rule_url: build_rule_url(config.as_ref_provider_base_url(), config.as_ref_zone_id(), config.as_ref_rule_id())
        }
    }
}

impl RulePublisher for PageRuleEndpoint {
    async fn publish(&self, rule: &PageRule) -> anyhow::Result<String> {
        let logger = Logger::new(Some("Page Rule"));
        let body = serde_json::to_vec(rule)
            .context(PublishError::Serialize)?;
        let response = self.client.put(&self.rule_url)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send().await
            .context(PublishError::HttpPut(self.rule_url.clone()))?;
        logger.debug(format!("PUT {} -> {}", self.rule_url, response.status()));
        response.text().await
            .context(PublishError::BodyRead)
    }
}


#[cfg(test)]
mod test {
    use crate::entry::test_server::{closed_address, config_for, local_client, serve_once};
    use crate::entry::transport::{build_multiview_link, build_rule_url, PageRule, PageRuleEndpoint, RulePublisher, FORWARDING_ACTION};
    use crate::ids::{RuleId, Username, ZoneId};

    fn users(names: &[&str]) -> Vec<Username> {
        names.iter().map(|n| Username::new(*n)).collect()
    }

    #[test]
    fn link_joins_with_slash() {
        assert_eq!(build_multiview_link(&users(&["a", "b", "c"])), "http://multitwitch.tv/a/b/c");
        assert_eq!(build_multiview_link(&users(&["b"])), "http://multitwitch.tv/b");
        assert!(!build_multiview_link(&users(&["a", "b"])).ends_with('/'));
    }

    #[test]
    fn duplicates_come_only_from_input() {
        assert_eq!(build_multiview_link(&users(&["a", "a"])), "http://multitwitch.tv/a/a");
    }

    #[test]
    fn payload_wire_shape() {
        let rule = PageRule::forwarding("http://multitwitch.tv/b");
        assert_eq!(serde_json::to_string(&rule).expect("serialize"),
                   r#"{"actions":[{"id":"forwarding_url","value":{"url":"http://multitwitch.tv/b","status_code":302}}]}"#);
    }

    #[test]
    fn payload_parses_back() {
        let link = build_multiview_link(&users(&["a", "c"]));
        let raw = serde_json::to_string(&PageRule::forwarding(link.clone())).expect("serialize");
        let parsed: PageRule = serde_json::from_str(&raw).expect("cannot parse.");

        assert_eq!(parsed.as_ref_actions().len(), 1);
        let action = &parsed.as_ref_actions()[0];
        assert_eq!(action.as_ref_id(), FORWARDING_ACTION);
        assert_eq!(action.status_code(), 302);
        assert_eq!(action.as_ref_url(), link);
    }

    #[test]
    fn rule_url_layout() {
        let url = build_rule_url("https://api.cloudflare.com/client/v4", &ZoneId::new("zone"), &RuleId::new("rule"));
        assert_eq!(url, "https://api.cloudflare.com/client/v4/zones/zone/pagerules/rule");
    }

    #[tokio::test]
    async fn publish_puts_rule_with_bearer() {
        let (base, server) = serve_once("200 OK", r#"{"success":true,"errors":[],"messages":[]}"#).await;
        let endpoint = PageRuleEndpoint::new(local_client(), &config_for("http://127.0.0.1:1/twitch", &base));

        let response = endpoint.publish(&PageRule::forwarding("http://multitwitch.tv/b")).await.expect("publish");
        let captured = server.await.expect("server");

        assert_eq!(response, r#"{"success":true,"errors":[],"messages":[]}"#);
        assert_eq!(captured.request_line, "PUT /zones/z/pagerules/r HTTP/1.1");
        assert!(captured.has_header("authorization: Bearer k"));
        assert!(captured.has_header("content-type: application/json"));
        assert_eq!(captured.body,
                   r#"{"actions":[{"id":"forwarding_url","value":{"url":"http://multitwitch.tv/b","status_code":302}}]}"#);
    }

    #[tokio::test]
    async fn error_status_body_is_returned_verbatim() {
        let (base, server) = serve_once("500 Internal Server Error", "oops!").await;
        let endpoint = PageRuleEndpoint::new(local_client(), &config_for("http://127.0.0.1:1/twitch", &base));

        let response = endpoint.publish(&PageRule::forwarding("http://multitwitch.tv/a")).await.expect("publish");
        server.await.expect("server");
        assert_eq!(response, "oops!");
    }

    #[tokio::test]
    async fn unreachable_provider_fails() {
        let base = format!("http://{}", closed_address().await);
        let endpoint = PageRuleEndpoint::new(local_client(), &config_for("http://127.0.0.1:1/twitch", &base));
        assert!(endpoint.publish(&PageRule::forwarding("http://multitwitch.tv/a")).await.is_err());
    }
}
