use std::future::Future;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::logger::Logger;
use crate::models::FailurePolicy;

/// Runs a cycle immediately and then once per interval until the token is
/// cancelled. Cycles never overlap: a slow cycle pushes the next tick back.
pub struct Scheduler {
    every: Duration,
    policy: FailurePolicy,
    token: CancellationToken
}

impl Scheduler {
    pub fn new(every: Duration, policy: FailurePolicy, token: CancellationToken) -> Scheduler {
        Self { every, policy, token }
    }

    /// `Ok` once cancelled, `Err` with the cycle error under [`FailurePolicy::Abort`].
    pub async fn run<F, Fut>(&self, mut cycle: F) -> anyhow::Result<()>
      where F: FnMut() -> Fut, Fut: Future<Output = anyhow::Result<String>> {
        let logger = Logger::new(Some("Scheduler"));
        let mut ticker = interval(self.every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        logger.info(format!("polling every {}sec", self.every.as_secs()));
        let mut round: u64 = 0;
        loop {
            tokio::select! {
                biased;
                _ = self.token.cancelled() => {
                    logger.info(format!("cancelled after {} cycle(s).", round));
                    return Ok(());
                }
                _ = ticker.tick() => {}
            }

            round += 1;
            match cycle().await {
                Ok(_) => {},
                Err(reason) => match self.policy {
                    FailurePolicy::Abort => return Err(reason.context(format!("cycle {} failed", round))),
                    FailurePolicy::SkipCycle => {
                        logger.caut(format!("cycle {} failed, waiting for the next tick.", round));
                        logger.error_chain(&reason);
                    }
                }
            }
        }
    }
}

/// Cancels `token` on the first interrupt, then waits for a second one.
///
/// Returns `true` when the second interrupt arrived, meaning the caller should
/// exit without waiting for the in-flight cycle.
pub async fn watch_interrupts<S, Fut>(token: CancellationToken, mut interrupt: S) -> bool
  where S: FnMut() -> Fut, Fut: Future<Output = std::io::Result<()>> {
    let logger = Logger::new(Some("Signal"));
    if let Err(reason) = interrupt().await {
        logger.warn(format!("cannot listen for interrupts: {}", reason));
        return false;
    }
    logger.info("interrupt received, finishing current cycle. press Ctrl-C again to exit now.");
    token.cancel();

    match interrupt().await {
        Ok(()) => {
            logger.caut("second interrupt, exiting without waiting for the cycle.");
            true
        },
        Err(_) => false
    }
}
