//! Background pairing and registry sweeps.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::services::coordinator::GameCoordinator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    pub pairing_interval: Duration,
    pub sweep_interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            pairing_interval: Duration::from_secs(20),
            sweep_interval: Duration::from_secs(10),
        }
    }
}

/// Handle to the two periodic tasks. Dropping it without calling
/// [`PairingScheduler::stop`] leaves the tasks running until the runtime ends.
pub struct PairingScheduler {
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl PairingScheduler {
    /// Spawn both loops. The first tick of each comes one full period after
    /// start.
    pub fn start(coordinator: Arc<GameCoordinator>, config: SchedulerConfig) -> Self {
        let cancel = CancellationToken::new();

        let pairing = {
            let coordinator = coordinator.clone();
            spawn_periodic(
                "pairing",
                config.pairing_interval,
                cancel.clone(),
                move || {
                    let coordinator = coordinator.clone();
                    async move {
                        if let Err(err) = coordinator.pair_queue().await {
                            error!(error = %err, "pairing sweep failed");
                        }
                    }
                },
            )
        };

        let sweep = spawn_periodic(
            "registry-sweep",
            config.sweep_interval,
            cancel.clone(),
            move || {
                let coordinator = coordinator.clone();
                async move {
                    match coordinator.sweep_registry().await {
                        Ok(removed) if removed > 0 => debug!(removed, "registry sweep"),
                        Ok(_) => {}
                        Err(err) => error!(error = %err, "registry sweep failed"),
                    }
                }
            },
        );

        info!(
            pairing_secs = config.pairing_interval.as_secs_f64(),
            sweep_secs = config.sweep_interval.as_secs_f64(),
            "scheduler started"
        );
        Self {
            cancel,
            tasks: vec![pairing, sweep],
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Cancel both loops and wait until they have exited. A sweep already
    /// running is allowed to finish first.
    pub async fn stop(self) {
        self.cancel.cancel();
        for task in self.tasks {
            if let Err(err) = task.await {
                error!(error = %err, "scheduler task ended abnormally");
            }
        }
        info!("scheduler stopped");
    }
}

fn spawn_periodic<F, Fut>(
    name: &'static str,
    period: Duration,
    cancel: CancellationToken,
    mut tick: F,
) -> JoinHandle<()>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = interval.tick() => tick().await,
            }
        }
        debug!(task = name, "periodic task exited");
    })
}
