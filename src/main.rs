extern crate serde;

mod logger;
mod ids;
mod models;
mod entry;
mod scheduler;

use tokio_util::sync::CancellationToken;
use crate::entry::{PageRuleEndpoint, StatusEndpoint};
use crate::logger::Logger;
use crate::models::{Configuration, UsernameList};
use crate::scheduler::Scheduler;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let logger = Logger::new(Some("Main"));
    if let Err(reason) = run().await {
        logger.error_chain(&reason);
        std::process::exit(1);
    }
    logger.info("stopped.");
}

async fn run() -> anyhow::Result<()> {
    let logger = Logger::new(Some("Init"));
    let config = Configuration::load_from(entry::get_config_path())?;
    let tracked = UsernameList::load_from(entry::get_usernames_path())?;
    logger.info(format!("tracking {} channel(s), rule {} in zone {}",
        tracked.len(), config.as_ref_rule_id(), config.as_ref_zone_id()));

    let client = entry::build_http_client(&config)?;
    let source = StatusEndpoint::new(client.clone(), &config);
    let publisher = PageRuleEndpoint::new(client, &config);

    let token = CancellationToken::new();
    let shutdown = token.clone();
    tokio::spawn(async move {
        if scheduler::watch_interrupts(shutdown, tokio::signal::ctrl_c).await {
            std::process::exit(130);
        }
    });

    let (source, publisher, tracked) = (&source, &publisher, &tracked);
    Scheduler::new(config.interval(), config.failure_policy(), token)
        .run(move || entry::check_and_publish(source, publisher, tracked))
        .await
}
