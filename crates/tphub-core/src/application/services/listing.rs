//! Listing view: the published-template grid and its refresh loop.

use std::{
    fmt,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use serde::Serialize;
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};
use tracing::{debug, info, instrument, trace, warn};

use crate::{
    application::{ApplicationError, services::TemplateRepository},
    domain::TemplateSummary,
};

/// Re-fetch period used when the caller does not pick one.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

// ── State ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum ListingState {
    Loading,
    Loaded(Vec<TemplateSummary>),
    Empty,
    /// Remote error message, verbatim.
    Failed(String),
}

impl ListingState {
    /// Next state after a fetch completes.
    ///
    /// Pure: the previous state does not influence the outcome, so a late
    /// response simply overwrites whatever an earlier one produced.
    pub fn on_fetch(
        outcome: Result<Vec<TemplateSummary>, ApplicationError>,
        fallback: Option<&[TemplateSummary]>,
    ) -> Self {
        match outcome {
            Ok(templates) if templates.is_empty() => Self::Empty,
            Ok(templates) => Self::Loaded(templates),
            Err(err) => match fallback {
                Some(list) if !list.is_empty() => Self::Loaded(list.to_vec()),
                _ => Self::Failed(failure_message(err)),
            },
        }
    }

    pub fn templates(&self) -> &[TemplateSummary] {
        match self {
            Self::Loaded(templates) => templates,
            _ => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

impl fmt::Display for ListingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loading => f.write_str("Loading templates..."),
            Self::Loaded(templates) => write!(f, "{} templates", templates.len()),
            Self::Empty => f.write_str("No templates published yet"),
            Self::Failed(message) => write!(f, "Error loading templates: {message}"),
        }
    }
}

fn failure_message(err: ApplicationError) -> String {
    match err {
        ApplicationError::Fetch { message } => message,
        other => other.to_string(),
    }
}

// ── View ─────────────────────────────────────────────────────────────────────

/// Fetches the grid and derives [`ListingState`].
///
/// The fallback shown on failure is the last non-empty successful result,
/// or the sample catalog if one was supplied.
pub struct ListingView {
    repository: TemplateRepository,
    limit: Option<usize>,
    sample: Option<Vec<TemplateSummary>>,
    last_good: Mutex<Option<Vec<TemplateSummary>>>,
}

impl ListingView {
    pub fn new(repository: TemplateRepository) -> Self {
        Self {
            repository,
            limit: None,
            sample: None,
            last_good: Mutex::new(None),
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Show `sample` when a fetch fails and nothing has loaded yet.
    pub fn with_sample_fallback(mut self, sample: Vec<TemplateSummary>) -> Self {
        self.sample = Some(sample);
        self
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// One fetch, no state bookkeeping.
    pub async fn fetch(&self) -> Result<Vec<TemplateSummary>, ApplicationError> {
        let templates = self.repository.list_published(self.limit).await?;
        Ok(templates.iter().map(|t| t.summary()).collect())
    }

    /// Fetch and fold the outcome into a new state.
    #[instrument(skip(self), fields(limit = ?self.limit))]
    pub async fn refresh(&self) -> ListingState {
        let outcome = self.fetch().await;

        let mut last_good = self.last_good.lock().unwrap_or_else(PoisonError::into_inner);
        match &outcome {
            Ok(templates) if !templates.is_empty() => *last_good = Some(templates.clone()),
            Ok(_) => {}
            Err(err) => warn!(error = %err, "Listing fetch failed"),
        }

        let fallback = last_good
            .as_deref()
            .filter(|list| !list.is_empty())
            .or(self.sample.as_deref());

        let state = ListingState::on_fetch(outcome, fallback);
        debug!(state = %state, "Listing refreshed");
        state
    }

    /// Start the refresh loop. The first fetch is issued immediately.
    ///
    /// Each tick spawns its own fetch; a slow request is neither cancelled
    /// nor waited on, and whichever finishes last sets the state.
    pub fn mount(self: Arc<Self>, every: Duration) -> ListingHandle {
        let (tx, rx) = watch::channel(ListingState::Loading);
        info!(interval_secs = every.as_secs_f64(), "Mounting listing view");

        let timer = tokio::spawn(async move {
            let mut ticker = interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                let view = Arc::clone(&self);
                let tx = tx.clone();
                tokio::spawn(async move {
                    let state = view.refresh().await;
                    if tx.send(state).is_err() {
                        trace!("Listing unmounted, discarding fetch result");
                    }
                });
            }
        });

        ListingHandle { state: rx, timer }
    }
}

// ── Handle ───────────────────────────────────────────────────────────────────

/// A mounted listing. Dropping it has the same effect as [`unmount`].
///
/// [`unmount`]: ListingHandle::unmount
pub struct ListingHandle {
    state: watch::Receiver<ListingState>,
    timer: JoinHandle<()>,
}

impl ListingHandle {
    /// Latest state snapshot.
    pub fn current(&self) -> ListingState {
        self.state.borrow().clone()
    }

    /// Wait for the next state change. `None` once the loop has stopped and
    /// every pending fetch has finished.
    pub async fn changed(&mut self) -> Option<ListingState> {
        self.state.changed().await.ok()?;
        Some(self.state.borrow_and_update().clone())
    }

    /// Another observer of the same state stream.
    pub fn subscribe(&self) -> watch::Receiver<ListingState> {
        self.state.clone()
    }

    /// Stop the timer. Fetches already in flight are left to finish.
    pub fn unmount(self) {
        debug!("Unmounting listing view");
        // Drop does the work.
    }
}

impl Drop for ListingHandle {
    fn drop(&mut self) {
        self.timer.abort();
    }
}
