//! The worker poll loop.
//!
//! Each cycle starts Idle, waits for the current backoff delay, then polls
//! the broker once:
//!
//! - `Found` -> validate -> wake (or discard) -> Idle, delay reset
//! - `NotFound` -> Idle, delay reset
//! - transport error -> Idle, delay grows by one step
//!
//! Polls never overlap, and a wake action blocks the loop until it finishes.
//! Shutdown is only observed while Idle.

use crate::worker::{client::Broker, wake::WakeAction};
use tokio_util::sync::CancellationToken;
use wakerelay::{Backoff, Claim, Error, InvalidMac, MacAddress};

/// Outcome of a single poll cycle.
#[derive(Debug)]
pub enum Cycle {
    /// A valid payload was claimed and woken.
    Woke(MacAddress),
    /// A payload was claimed but failed validation; nothing was woken.
    Discarded(InvalidMac),
    /// A valid payload was claimed but the wake action failed.
    WakeFailed(MacAddress, Error),
    /// Nothing pending.
    Empty,
    /// The broker could not be polled.
    TransportFailed(Error),
}

/// Polls `broker` for requests addressed to `id` and wakes them with `wake`.
pub struct Poller<B, W> {
    id: String,
    broker: B,
    wake: W,
    backoff: Backoff,
}

impl<B, W> Poller<B, W>
where
    B: Broker,
    W: WakeAction,
{
    pub fn new(id: impl Into<String>, broker: B, wake: W, backoff: Backoff) -> Self {
        Self {
            id: id.into(),
            broker,
            wake,
            backoff,
        }
    }

    /// Current retry delay state.
    pub const fn backoff(&self) -> &Backoff {
        &self.backoff
    }

    /// Runs one Polling cycle and updates the backoff.
    pub async fn step(&mut self) -> Cycle {
        match self.broker.claim(&self.id).await {
            Ok(Claim::Found(payload)) => {
                self.backoff.reset();
                self.act(&payload).await
            }
            Ok(Claim::NotFound) => {
                self.backoff.reset();
                Cycle::Empty
            }
            Err(err) => {
                self.backoff.fail();
                Cycle::TransportFailed(err)
            }
        }
    }

    async fn act(&self, payload: &str) -> Cycle {
        match MacAddress::parse(payload) {
            Ok(mac) => match self.wake.wake(&mac).await {
                Ok(()) => Cycle::Woke(mac),
                Err(err) => Cycle::WakeFailed(mac, err),
            },
            Err(invalid) => Cycle::Discarded(invalid),
        }
    }

    /// Polls until `shutdown` is cancelled.
    ///
    /// Cancellation is checked while waiting between polls; a poll or wake
    /// already in progress runs to completion first.
    #[tracing::instrument(skip_all, fields(id = %self.id))]
    pub async fn run(&mut self, shutdown: CancellationToken) {
        tracing::info!(
            floor_secs = self.backoff().floor_secs(),
            ceiling_secs = self.backoff().ceiling_secs(),
            "Polling broker"
        );

        loop {
            tokio::select! {
                biased;
                () = shutdown.cancelled() => break,
                () = tokio::time::sleep(self.backoff.delay()) => {}
            }

            match self.step().await {
                Cycle::Woke(mac) => tracing::info!(%mac, "Wake signal sent"),
                Cycle::Discarded(invalid) => {
                    tracing::warn!("Discarding claimed payload: {invalid}");
                }
                Cycle::WakeFailed(mac, err) => tracing::warn!(%mac, "Wake failed: {err}"),
                Cycle::Empty => tracing::trace!("Nothing pending"),
                Cycle::TransportFailed(err) => tracing::warn!(
                    retry_in_secs = self.backoff.current_secs(),
                    "Failed to reach broker: {err}"
                ),
            }
        }

        tracing::info!("Poll loop stopped");
    }
}
