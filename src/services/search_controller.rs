//! Debounced search orchestration.
//!
//! The controller runs as one tokio task that exclusively owns [`SearchState`].
//! Input arrives through a [`SearchHandle`]; every state change is published on a
//! `watch` channel which is the only way the presentation layer observes it.
//!
//! Lifecycle of one query: `Idle -> Debouncing -> Fetching -> Succeeded | Failed`.
//! Every keystroke restarts the quiet-period timer. In-flight fetches are never
//! cancelled, so with several outstanding the last one to resolve wins unless
//! `discard_stale_responses` is set.

use crate::config::Config;
use crate::domain::SearchPhase;
use crate::models::{MovieSummary, TrendingEntry};
use crate::services::catalog::{FetchError, MovieCatalog};
use crate::services::trending_service::{StoreError, TrendingStore};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, warn};

/// Render-ready snapshot of the search screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchState {
    pub query: String,
    pub debounced_query: String,
    pub phase: SearchPhase,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub movies: Vec<MovieSummary>,
    pub trending: Vec<TrendingEntry>,
}

#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub debounce: Duration,
    pub discard_stale_responses: bool,
    pub trending_limit: u64,
    /// Settled query fetched as soon as the controller starts.
    pub initial_query: String,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            discard_stale_responses: false,
            trending_limit: 5,
            initial_query: String::new(),
        }
    }
}

impl From<&Config> for SearchSettings {
    fn from(config: &Config) -> Self {
        Self {
            debounce: Duration::from_millis(config.search.debounce_ms),
            discard_stale_responses: config.search.discard_stale_responses,
            trending_limit: config.trending.top_limit,
            initial_query: String::new(),
        }
    }
}

enum Command {
    SetQuery(String),
}

enum Completion {
    Catalog {
        seq: u64,
        query: String,
        result: Result<Vec<MovieSummary>, FetchError>,
    },
    Trending(Result<Vec<TrendingEntry>, StoreError>),
}

/// Cloneable entry point to a running controller.
///
/// The controller stops once every handle has been dropped.
#[derive(Clone)]
pub struct SearchHandle {
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<SearchState>,
}

impl SearchHandle {
    /// Replaces the query text. Returns `false` if the controller has stopped.
    pub fn set_query(&self, query: impl Into<String>) -> bool {
        self.commands.send(Command::SetQuery(query.into())).is_ok()
    }

    #[must_use]
    pub fn snapshot(&self) -> SearchState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.clone()
    }

    /// Waits until a published state satisfies `pred`.
    ///
    /// Returns `None` if the controller stops first.
    pub async fn wait_for(
        &self,
        mut pred: impl FnMut(&SearchState) -> bool,
    ) -> Option<SearchState> {
        let mut rx = self.state.clone();
        rx.wait_for(|s| pred(s)).await.ok().map(|s| s.clone())
    }

    /// Drops this handle and waits for the controller to exit, including any
    /// trending writes still in flight.
    ///
    /// Only returns once every other clone of the handle has been dropped too.
    pub async fn shutdown(self) {
        let Self {
            commands,
            mut state,
        } = self;
        drop(commands);
        while state.changed().await.is_ok() {}
    }
}

pub struct SearchController {
    catalog: Arc<dyn MovieCatalog>,
    trending: Arc<dyn TrendingStore>,
    settings: SearchSettings,
    state: SearchState,
    state_tx: watch::Sender<SearchState>,
    completions: mpsc::UnboundedSender<Completion>,
    deadline: Option<Instant>,
    /// Phase to return to if a settle turns out not to change the query.
    resume_phase: SearchPhase,
    issued_seq: u64,
    records: JoinSet<()>,
}

impl SearchController {
    /// Starts the controller task and returns a handle to it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(
        catalog: Arc<dyn MovieCatalog>,
        trending: Arc<dyn TrendingStore>,
        settings: SearchSettings,
    ) -> SearchHandle {
        let initial = SearchState {
            query: settings.initial_query.clone(),
            debounced_query: settings.initial_query.clone(),
            ..SearchState::default()
        };

        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(initial.clone());

        let controller = Self {
            catalog,
            trending,
            settings,
            state: initial,
            state_tx,
            completions: completions_tx,
            deadline: None,
            resume_phase: SearchPhase::Idle,
            issued_seq: 0,
            records: JoinSet::new(),
        };

        tokio::spawn(controller.run(commands_rx, completions_rx));

        SearchHandle {
            commands: commands_tx,
            state: state_rx,
        }
    }

    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut completions: mpsc::UnboundedReceiver<Completion>,
    ) {
        info!(
            debounce_ms = u64::try_from(self.settings.debounce.as_millis()).unwrap_or(u64::MAX),
            discard_stale = self.settings.discard_stale_responses,
            "Search controller started"
        );

        self.load_trending();
        let initial = self.state.debounced_query.clone();
        self.start_fetch(initial);

        loop {
            let deadline = self.deadline;
            let settle = async move {
                match deadline {
                    Some(at) => sleep_until(at).await,
                    None => std::future::pending::<()>().await,
                }
            };

            // Input is drained before the deadline so a keystroke that lands at
            // the same instant restarts the timer instead of settling old text.
            tokio::select! {
                biased;

                cmd = commands.recv() => match cmd {
                    Some(Command::SetQuery(query)) => self.on_input(query),
                    None => break,
                },
                Some(done) = completions.recv() => self.on_completion(done),
                () = settle => self.on_settle(),
                Some(_) = self.records.join_next(), if !self.records.is_empty() => {}
            }
        }

        while self.records.join_next().await.is_some() {}
        debug!("Search controller stopped");
    }

    fn publish(&self) {
        self.state_tx.send_replace(self.state.clone());
    }

    /// Sets the phase a finished fetch lands in without clobbering an ongoing debounce.
    fn land_in(&mut self, phase: SearchPhase) {
        if self.state.phase == SearchPhase::Debouncing {
            self.resume_phase = phase;
        } else {
            self.state.phase = phase;
        }
    }

    fn on_input(&mut self, query: String) {
        if query == self.state.query {
            return;
        }

        self.state.query = query;
        if self.state.phase != SearchPhase::Debouncing {
            self.resume_phase = self.state.phase;
            self.state.phase = SearchPhase::Debouncing;
        }
        self.deadline = Some(Instant::now() + self.settings.debounce);
        self.publish();
    }

    fn on_settle(&mut self) {
        self.deadline = None;

        let settled = self.state.query.clone();
        if settled == self.state.debounced_query {
            debug!(query = %settled, "Settled query unchanged, skipping fetch");
            self.state.phase = self.resume_phase;
            self.publish();
            return;
        }

        self.state.debounced_query = settled.clone();
        self.start_fetch(settled);
    }

    fn start_fetch(&mut self, query: String) {
        self.issued_seq += 1;
        let seq = self.issued_seq;

        self.state.is_loading = true;
        self.state.error_message = None;
        self.state.phase = SearchPhase::Fetching;
        self.publish();

        debug!(seq, query = %query, "Issuing catalog fetch");

        let catalog = Arc::clone(&self.catalog);
        let tx = self.completions.clone();
        tokio::spawn(async move {
            let result = catalog.search(&query).await;
            let _ = tx.send(Completion::Catalog { seq, query, result });
        });
    }

    fn load_trending(&self) {
        let trending = Arc::clone(&self.trending);
        let limit = self.settings.trending_limit;
        let tx = self.completions.clone();
        tokio::spawn(async move {
            let result = trending.top_entries(limit).await;
            let _ = tx.send(Completion::Trending(result));
        });
    }

    fn on_completion(&mut self, done: Completion) {
        match done {
            Completion::Catalog { seq, query, result } => self.on_catalog(seq, query, result),
            Completion::Trending(Ok(entries)) => {
                debug!(count = entries.len(), "Trending searches loaded");
                self.state.trending = entries;
                self.publish();
            }
            Completion::Trending(Err(e)) => {
                warn!(error = %e, "Failed to load trending searches");
            }
        }
    }

    fn on_catalog(
        &mut self,
        seq: u64,
        query: String,
        result: Result<Vec<MovieSummary>, FetchError>,
    ) {
        if self.settings.discard_stale_responses && seq != self.issued_seq {
            debug!(
                seq,
                latest = self.issued_seq,
                query = %query,
                "Discarding stale catalog response"
            );
            return;
        }

        match result {
            Ok(movies) => {
                if !query.is_empty()
                    && let Some(first) = movies.first()
                {
                    self.record_search(query, first.clone());
                }
                self.state.movies = movies;
                self.state.error_message = None;
                self.land_in(SearchPhase::Succeeded);
            }
            Err(e) => {
                warn!(query = %query, error = %e, "Search failed");
                self.state.error_message = Some(e.user_message());
                self.state.movies.clear();
                self.land_in(SearchPhase::Failed);
            }
        }

        self.state.is_loading = false;
        self.publish();
    }

    fn record_search(&mut self, term: String, representative: MovieSummary) {
        let trending = Arc::clone(&self.trending);
        self.records.spawn(async move {
            match trending.record_search(&term, &representative).await {
                Ok(()) => {
                    metrics::counter!("trending_records_total", "outcome" => "success")
                        .increment(1);
                    debug!(term = %term, movie_id = %representative.id, "Recorded trending search");
                }
                Err(e) => {
                    metrics::counter!("trending_records_total", "outcome" => "error").increment(1);
                    warn!(term = %term, error = %e, "Failed to record trending search");
                }
            }
        });
    }
}
