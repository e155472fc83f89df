//! Periodic cycle loop and on-demand collage serving
//!
//! The scheduler owns the timing loop: one cycle immediately, then one per
//! configured interval until the cancellation token fires. Every outcome is
//! reported through the [`Publisher`]; no error stops the loop. The
//! on-demand query only ever reads the last fully persisted file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use super::pipeline::{CycleOutcome, ShopPipeline};
use super::publisher::Publisher;

/// Status message posted while a cycle is running, deleted afterwards.
pub const PREPARING_MESSAGE: &str = "Doc is preparing today's item shop...";

/// Reply to the on-demand query before the first collage exists.
pub const NOT_READY_MESSAGE: &str = "No image available. Please wait for the next update.";

/// Result of the on-demand "show latest" query.
#[derive(Debug, PartialEq, Eq)]
pub enum LatestCollage {
    Ready(PathBuf),
    NotReady,
}

/// Check for the most recently persisted collage.
///
/// Persistence is an atomic rename, so an existing file is always complete;
/// an in-progress cycle is never visible here.
pub fn latest_collage(output_path: &Path) -> LatestCollage {
    if output_path.exists() {
        LatestCollage::Ready(output_path.to_path_buf())
    } else {
        LatestCollage::NotReady
    }
}

/// Reply to the on-demand trigger with the latest collage or the
/// not-ready text. Called by the chat session when a non-bot sender posts
/// the trigger command.
pub async fn respond_with_latest<P: Publisher>(publisher: &P, output_path: &Path) {
    let result = match latest_collage(output_path) {
        LatestCollage::Ready(path) => publisher.send_file(&path).await,
        LatestCollage::NotReady => publisher.send_text(NOT_READY_MESSAGE).await,
    };
    if let Err(e) = result {
        warn!("Failed to answer show request: {e}");
    }
}

/// Drives the pipeline once per interval and publishes each outcome.
pub struct Scheduler<P: Publisher> {
    pipeline: Arc<ShopPipeline>,
    publisher: Arc<P>,
    cycle_interval: Duration,
    cancel: CancellationToken,
}

impl<P: Publisher + 'static> Scheduler<P> {
    pub fn new(
        pipeline: Arc<ShopPipeline>,
        publisher: Arc<P>,
        cycle_interval: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            pipeline,
            publisher,
            cycle_interval,
            cancel,
        }
    }

    /// Spawn the periodic loop. The first cycle starts immediately.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(self) {
        let mut ticker = interval(self.cycle_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = ticker.tick() => {
                    // Cancellation mid-cycle stops cleanly; the last-good
                    // collage file is never touched by an aborted cycle.
                    tokio::select! {
                        _ = self.cancel.cancelled() => break,
                        _ = self.run_once() => {}
                    }
                }
            }
        }

        info!("Scheduler stopped");
    }

    /// One cycle: status message, pipeline, result, status cleanup.
    ///
    /// Publisher failures are logged and swallowed; the loop must schedule
    /// the next cycle no matter what happened in this one.
    async fn run_once(&self) {
        let status = match self.publisher.send_text(PREPARING_MESSAGE).await {
            Ok(id) => Some(id),
            Err(e) => {
                warn!("Failed to send status message: {e}");
                None
            }
        };

        match self.pipeline.run_cycle().await {
            Ok(CycleOutcome::Collage {
                path,
                tile_count,
                failures,
            }) => {
                info!(
                    "Cycle produced {} tiles ({} dropped)",
                    tile_count,
                    failures.len()
                );
                if let Err(e) = self.publisher.send_file(&path).await {
                    error!("Failed to post collage: {e}");
                }
            }
            Ok(CycleOutcome::Empty { reason }) => {
                info!("Cycle produced nothing to post: {reason}");
                if let Err(e) = self.publisher.send_text(&reason).await {
                    error!("Failed to post empty-cycle message: {e}");
                }
            }
            Err(e) => {
                error!("Cycle failed: {e:#}");
                if let Err(send_err) = self
                    .publisher
                    .send_text(&format!("Shop update failed: {e:#}"))
                    .await
                {
                    error!("Failed to report cycle failure: {send_err}");
                }
            }
        }

        if let Some(id) = status {
            if let Err(e) = self.publisher.delete_message(&id).await {
                warn!("Failed to delete status message: {e}");
            }
        }

        let next = Utc::now()
            + chrono::Duration::from_std(self.cycle_interval)
                .unwrap_or_else(|_| chrono::Duration::zero());
        info!("Next cycle around {}", next.format("%Y-%m-%d %H:%M UTC"));
    }
}
