//! Recurring timer driving the forecast refresher.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{error, info};

use super::FavouriteForecastRefresher;
use crate::domain::TraceId;

/// Runs fire every three hours by default.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(3 * 60 * 60);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshScheduleError {
    #[error("refresh interval must be greater than zero")]
    ZeroInterval,
}

/// Period between refresh runs. Always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshSchedule {
    interval: Duration,
}

impl RefreshSchedule {
    pub fn new(interval: Duration) -> Result<Self, RefreshScheduleError> {
        if interval.is_zero() {
            return Err(RefreshScheduleError::ZeroInterval);
        }
        Ok(Self { interval })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for RefreshSchedule {
    fn default() -> Self {
        Self {
            interval: DEFAULT_REFRESH_INTERVAL,
        }
    }
}

/// Drive `refresher` on `schedule` until `shutdown` resolves.
///
/// The first run happens one interval after start. Runs are awaited in place,
/// so a run that outlasts the interval delays the next one instead of
/// overlapping it. A run in progress completes before shutdown is observed.
pub async fn run_refresh_schedule<F>(
    refresher: Arc<FavouriteForecastRefresher>,
    schedule: RefreshSchedule,
    shutdown: F,
) where
    F: Future<Output = ()>,
{
    let mut ticker = interval_at(Instant::now() + schedule.interval, schedule.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    info!(
        interval_secs = schedule.interval.as_secs(),
        "forecast refresh schedule started"
    );
    loop {
        tokio::select! {
            biased;
            () = &mut shutdown => break,
            _ = ticker.tick() => {
                let trace_id = TraceId::generate();
                if let Err(err) = TraceId::scope(trace_id, refresher.run_once()).await {
                    error!(error = %err, %trace_id, "scheduled forecast refresh failed");
                }
            }
        }
    }
    info!("forecast refresh schedule stopped");
}
