mod config;
mod request;
mod transport;
#[cfg(test)]
mod test_server;

use std::time::Instant;
use crate::logger::Logger;
use crate::models::UsernameList;

pub use config::{build_http_client, get_config_path, get_usernames_path};
pub use request::{LiveStatusSource, StatusEndpoint};
pub use transport::{PageRuleEndpoint, RulePublisher};

/// One poll cycle: check every tracked channel, then point the page rule at
/// the resulting multiview link. Returns the published link.
///
/// A failing status check returns before anything is sent to the provider.
pub async fn check_and_publish<S, P>(source: &S, publisher: &P, tracked: &UsernameList) -> anyhow::Result<String>
  where S: LiveStatusSource, P: RulePublisher {
    let logger = Logger::new(Some("Cycle"));
    let total = Instant::now();

    let live = request::request_live_channels(source, tracked).await?;
    let link = transport::build_multiview_link(&live);
    let response = publisher.publish(&transport::PageRule::forwarding(link.clone())).await?;

    logger.info(format!("forward -> {}", link));
    logger.info(response);
    logger.debug(format!("Total elapsed >>> {}sec", total.elapsed().as_secs_f32()));
    Ok(link)
}
