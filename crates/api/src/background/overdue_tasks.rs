//! Periodic reclassification of past-due tasks as OVERDUE.
//!
//! The job is armed with [`OverdueTasksJob::start`] and fires once per
//! minute, on the minute. Each tick forks its own session from the store,
//! selects the current candidates, marks them in one flush and clears the
//! session. Eligibility is recomputed from persisted state on every tick, so
//! a failed tick needs no bookkeeping: the next one selects the same tasks
//! again.
//!
//! Ticks run inline in the scheduler loop. A tick that outlasts the cadence
//! delays the next fire time instead of overlapping with it.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::Utc;
use taskboard_core::types::{EntityId, Timestamp};
use taskboard_db::{Session, Store};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::error::AppResult;
use crate::services::TaskService;

/// Cadence equivalent to the cron expression `* * * * *`.
pub const EVERY_MINUTE: Duration = Duration::from_secs(60);

/// What a single tick did. Failures are reported here, never raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing was eligible; no write was issued.
    NoCandidates,
    /// `selected` ids were passed to the bulk mark; `updated` rows changed.
    Marked {
        selected: Vec<EntityId>,
        updated: usize,
    },
    /// The tick failed with this message and was abandoned.
    Failed(String),
}

struct Armed {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl Armed {
    fn is_alive(&self) -> bool {
        !self.handle.is_finished()
    }
}

/// Recurring overdue sweep over a [`Store`].
///
/// State machine: Stopped -> Running (armed) -> Stopped.
pub struct OverdueTasksJob<S: Store> {
    store: Arc<S>,
    cadence: Duration,
    armed: Mutex<Option<Armed>>,
}

impl<S: Store> OverdueTasksJob<S> {
    /// Create a stopped job on the every-minute cadence.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_cadence(store, EVERY_MINUTE)
    }

    /// Create a stopped job firing at every multiple of `cadence`.
    pub fn with_cadence(store: Arc<S>, cadence: Duration) -> Self {
        Self {
            store,
            cadence,
            armed: Mutex::new(None),
        }
    }

    /// Whether the scheduler loop is armed and alive. A loop that died from a
    /// panicking tick reports `false` even before [`stop`](Self::stop).
    pub fn is_running(&self) -> bool {
        self.armed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(Armed::is_alive)
    }

    /// Arm the recurring trigger. Calling this while already running is a
    /// no-op; a loop that has died is replaced.
    pub fn start(&self) {
        let mut armed = self.armed.lock().unwrap_or_else(PoisonError::into_inner);
        match armed.as_ref() {
            Some(current) if current.is_alive() => {
                tracing::warn!("Overdue tasks job already running; start ignored");
                return;
            }
            Some(_) => tracing::warn!("Overdue tasks job loop had exited; re-arming"),
            None => {}
        }

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_loop(
            Arc::clone(&self.store),
            self.cadence,
            cancel.clone(),
        ));
        *armed = Some(Armed { cancel, handle });

        tracing::info!(
            cadence_secs = self.cadence.as_secs_f64(),
            "Overdue tasks job started"
        );
    }

    /// Disarm the trigger so no further ticks are scheduled.
    ///
    /// A tick already in flight runs to completion. The returned handle
    /// resolves once it has, with a `JoinError` if a tick panicked and took
    /// the loop down; `None` means the job was never started.
    pub fn stop(&self) -> Option<JoinHandle<()>> {
        let armed = self
            .armed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()?;
        armed.cancel.cancel();
        Some(armed.handle)
    }

    /// Run one tick against `store` with `now` as the overdue cutoff.
    ///
    /// Never fails: errors are logged and reported as
    /// [`TickOutcome::Failed`]. The tick's session is cleared on every path.
    pub async fn run_tick(store: &S, now: Timestamp) -> TickOutcome {
        let span = tracing::info_span!("overdue_tasks_job", %now);
        async move {
            tracing::info!("Running overdue tasks check");
            let mut session = store.fork();

            let outcome = match reconcile(&mut session, now).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!(error = %e, "Error checking overdue tasks");
                    TickOutcome::Failed(e.to_string())
                }
            };

            session.clear();
            outcome
        }
        .instrument(span)
        .await
    }
}

async fn run_loop<S: Store>(store: Arc<S>, cadence: Duration, cancel: CancellationToken) {
    loop {
        let delay = delay_until_next_fire(Utc::now(), cadence);
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Overdue tasks job stopped");
                break;
            }
            _ = tokio::time::sleep(delay) => {
                OverdueTasksJob::<S>::run_tick(&store, Utc::now()).await;
            }
        }
    }
}

/// Select the candidates at `now` and mark them, inside one session.
async fn reconcile<Se: Session>(session: &mut Se, now: Timestamp) -> AppResult<TickOutcome> {
    let mut tasks = TaskService::new(session);

    let candidates = tasks.find_overdue_candidates(now).await?;
    if candidates.is_empty() {
        tracing::info!("No overdue tasks found");
        return Ok(TickOutcome::NoCandidates);
    }

    let selected: Vec<EntityId> = candidates.iter().map(|task| task.id).collect();
    let updated = tasks.mark_as_overdue(&selected).await?;

    tracing::info!(
        updated,
        selected = selected.len(),
        task_ids = ?selected,
        "Marked tasks as overdue"
    );
    Ok(TickOutcome::Marked { selected, updated })
}

/// Time from `now` until the next instant that is a whole multiple of
/// `cadence` since the Unix epoch. An instant exactly on a boundary waits a
/// full period.
pub fn delay_until_next_fire(now: Timestamp, cadence: Duration) -> Duration {
    let period = i64::try_from(cadence.as_millis()).unwrap_or(i64::MAX).max(1);
    let now_ms = now.timestamp_millis();
    let next = (now_ms.div_euclid(period) + 1) * period;
    Duration::from_millis(u64::try_from(next - now_ms).unwrap_or(0))
}
