//! Debounced query controller for the advocate search page.
//!
//! [`SearchController`] owns the query state on a background task. Callers
//! push user inputs through it and watch [`Snapshot`]s come back. Free-text
//! edits settle after a quiet period, selector and page changes fetch at once,
//! and responses to superseded requests are dropped.

pub mod debounce;
pub mod source;
pub mod state;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until, timeout};

use crate::domain::query::{FilterOptions, ResultPage, Selection};
use crate::domain::types::{CityName, Specialty};

pub use source::{AdvocateSource, FetchError, HttpAdvocateSource, RepositorySource};
pub use state::{Input, Phase, QueryState, RequestToken, Snapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Quiet period before a typed search term is committed.
    pub debounce: Duration,
    /// Upper bound on a single fetch.
    pub fetch_timeout: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            fetch_timeout: Duration::from_secs(10),
        }
    }
}

enum Completed {
    Page(RequestToken, Result<ResultPage, FetchError>),
    Options(Result<FilterOptions, FetchError>),
}

/// Handle to a running controller task.
pub struct SearchController {
    inputs: mpsc::UnboundedSender<Input>,
    snapshots: watch::Receiver<Snapshot>,
    task: JoinHandle<()>,
}

impl SearchController {
    /// Starts the controller and immediately loads the first page and the
    /// selector options. Must be called from within a tokio runtime.
    pub fn spawn<S>(source: Arc<S>, config: ControllerConfig) -> Self
    where
        S: AdvocateSource + 'static,
    {
        let (inputs, rx) = mpsc::unbounded_channel();
        let mut state = QueryState::new(config.debounce);
        state.mount();

        let (tx, snapshots) = watch::channel(state.snapshot());
        let task = tokio::spawn(run(source, config, state, rx, tx));

        Self {
            inputs,
            snapshots,
            task,
        }
    }

    pub fn send(&self, input: Input) -> Result<(), FetchError> {
        self.inputs.send(input).map_err(|_| FetchError::Closed)
    }

    pub fn edit_term(&self, term: impl Into<String>) -> Result<(), FetchError> {
        self.send(Input::EditTerm(term.into()))
    }

    pub fn select_city(&self, city: Selection<CityName>) -> Result<(), FetchError> {
        self.send(Input::SelectCity(city))
    }

    pub fn select_specialty(&self, specialty: Selection<Specialty>) -> Result<(), FetchError> {
        self.send(Input::SelectSpecialty(specialty))
    }

    pub fn select_page(&self, page: usize) -> Result<(), FetchError> {
        self.send(Input::SelectPage(page))
    }

    /// A receiver that is notified whenever the visible state changes.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    /// Stops accepting inputs and waits for the task to wind down.
    /// Fetches still in flight are abandoned.
    pub async fn shutdown(self) {
        let Self { inputs, task, .. } = self;
        drop(inputs);
        if let Err(err) = task.await {
            log::error!("Search controller task failed: {err}");
        }
    }
}

async fn run<S>(
    source: Arc<S>,
    config: ControllerConfig,
    mut state: QueryState,
    mut inputs: mpsc::UnboundedReceiver<Input>,
    snapshots: watch::Sender<Snapshot>,
) where
    S: AdvocateSource + 'static,
{
    let (done_tx, mut done_rx) = mpsc::unbounded_channel();
    spawn_options_fetch(Arc::clone(&source), config.fetch_timeout, done_tx.clone());

    loop {
        if let Some(request) = state.flush() {
            log::debug!(
                "Fetching page {} for request {}",
                request.page.get(),
                request.token.get()
            );
            let source = Arc::clone(&source);
            let done = done_tx.clone();
            let limit = config.fetch_timeout;
            tokio::spawn(async move {
                let result = timeout(limit, source.fetch_page(&request.query, request.page))
                    .await
                    .unwrap_or(Err(FetchError::Timeout(limit)));
                let _ = done.send(Completed::Page(request.token, result));
            });
        }

        let next = state.snapshot();
        snapshots.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });

        let deadline = state.debounce_deadline();
        tokio::select! {
            input = inputs.recv() => {
                let Some(input) = input else { break };
                let now = Instant::now();
                state.input(input, now);
                // Everything already queued belongs to the same tick.
                while let Ok(input) = inputs.try_recv() {
                    state.input(input, now);
                }
            }
            Some(done) = done_rx.recv() => match done {
                Completed::Page(token, result) => state.complete(token, result),
                Completed::Options(Ok(options)) => state.set_filter_options(options),
                Completed::Options(Err(err)) => {
                    log::warn!("Filter options unavailable, deriving from results: {err}");
                }
            },
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                state.poll_debounce(Instant::now());
            }
        }
    }

    log::debug!("Search controller stopped");
}

fn spawn_options_fetch<S>(source: Arc<S>, limit: Duration, done: mpsc::UnboundedSender<Completed>)
where
    S: AdvocateSource + 'static,
{
    tokio::spawn(async move {
        let result = timeout(limit, source.fetch_filter_options())
            .await
            .unwrap_or(Err(FetchError::Timeout(limit)));
        let _ = done.send(Completed::Options(result));
    });
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::NaiveDateTime;
    use tokio::time::sleep;

    use super::*;
    use crate::domain::advocate::Advocate;
    use crate::domain::query::{PageRequest, QueryDescription};
    use crate::domain::types::{AdvocateId, Degree, PersonName, PhoneNumber, YearsOfExperience};

    /// Answers call `n` with a single advocate whose id is `n`, after the
    /// next scripted delay.
    #[derive(Default)]
    struct ScriptedSource {
        calls: Mutex<Vec<(QueryDescription, PageRequest)>>,
        delays: Mutex<VecDeque<Duration>>,
    }

    impl ScriptedSource {
        fn with_delays(delays: &[u64]) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::default(),
                delays: Mutex::new(delays.iter().map(|ms| Duration::from_millis(*ms)).collect()),
            })
        }

        fn calls(&self) -> Vec<(QueryDescription, PageRequest)> {
            self.calls.lock().unwrap().clone()
        }
    }

    fn advocate(id: i32) -> Advocate {
        Advocate {
            id: AdvocateId::new(id).unwrap(),
            first_name: PersonName::new("John").unwrap(),
            last_name: PersonName::new("Doe").unwrap(),
            city: CityName::new("Austin").unwrap(),
            degree: Degree::new("MD").unwrap(),
            specialties: vec![Specialty::new("Bipolar").unwrap()],
            years_of_experience: YearsOfExperience::new(3),
            phone_number: PhoneNumber::new("5551234567").unwrap(),
            created_at: NaiveDateTime::default(),
        }
    }

    #[async_trait]
    impl AdvocateSource for ScriptedSource {
        async fn fetch_page(
            &self,
            query: &QueryDescription,
            page: PageRequest,
        ) -> Result<ResultPage, FetchError> {
            let call = {
                let mut calls = self.calls.lock().unwrap();
                calls.push((query.clone(), page));
                calls.len() as i32
            };
            let delay = self.delays.lock().unwrap().pop_front().unwrap_or_default();
            sleep(delay).await;
            Ok(ResultPage::new(vec![advocate(call)], 20))
        }

        async fn fetch_filter_options(&self) -> Result<FilterOptions, FetchError> {
            Ok(FilterOptions::from_labels(["Austin", "Dallas"], ["Bipolar"]))
        }
    }

    async fn settle(
        rx: &mut watch::Receiver<Snapshot>,
        done: impl FnMut(&Snapshot) -> bool,
    ) -> Snapshot {
        timeout(Duration::from_secs(60), rx.wait_for(done))
            .await
            .expect("controller never settled")
            .expect("controller stopped")
            .clone()
    }

    fn shown_ids(snapshot: &Snapshot) -> Vec<i32> {
        snapshot.results.items.iter().map(|a| a.id.get()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn mount_loads_first_page_and_options() {
        let source = ScriptedSource::with_delays(&[]);
        let controller = SearchController::spawn(source.clone(), ControllerConfig::default());
        let mut rx = controller.subscribe();

        let snapshot = settle(&mut rx, |s| {
            s.phase == Phase::Ready && s.options.cities.len() == 3
        })
        .await;

        assert_eq!(snapshot.results.pages, vec![1, 2, 3, 4]);
        assert_eq!(snapshot.options.cities, vec!["All", "Austin", "Dallas"]);
        assert_eq!(
            source.calls(),
            vec![(QueryDescription::default(), PageRequest::FIRST)]
        );
        controller.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn typing_settles_into_one_fetch() {
        let source = ScriptedSource::with_delays(&[]);
        let controller = SearchController::spawn(source.clone(), ControllerConfig::default());
        let mut rx = controller.subscribe();
        settle(&mut rx, |s| s.phase == Phase::Ready).await;

        for term in ["J", "Jo", "John"] {
            controller.edit_term(term).unwrap();
            sleep(Duration::from_millis(150)).await;
        }
        sleep(Duration::from_millis(300)).await;
        assert_eq!(source.calls().len(), 1);
        assert_eq!(controller.snapshot().draft_term, "John");

        sleep(Duration::from_millis(100)).await;
        let snapshot = settle(&mut rx, |s| {
            s.phase == Phase::Ready && s.query.term == "John"
        })
        .await;

        let calls = source.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].0.term, "John");
        assert_eq!(calls[1].1, PageRequest::FIRST);
        assert_eq!(shown_ids(&snapshot), vec![2]);
        controller.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn slow_superseded_response_is_ignored() {
        let source = ScriptedSource::with_delays(&[0, 300, 10]);
        let controller = SearchController::spawn(source.clone(), ControllerConfig::default());
        let mut rx = controller.subscribe();
        settle(&mut rx, |s| s.phase == Phase::Ready).await;

        controller.select_page(2).unwrap();
        sleep(Duration::from_millis(1)).await;
        controller.select_page(3).unwrap();

        settle(&mut rx, |s| s.phase == Phase::Ready && s.results.page == 3).await;
        sleep(Duration::from_millis(500)).await;

        let snapshot = controller.snapshot();
        assert_eq!(source.calls().len(), 3);
        assert_eq!(snapshot.results.page, 3);
        assert_eq!(shown_ids(&snapshot), vec![3]);
        controller.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_reports_error_and_keeps_results() {
        let source = ScriptedSource::with_delays(&[0, 5_000]);
        let config = ControllerConfig {
            fetch_timeout: Duration::from_secs(1),
            ..ControllerConfig::default()
        };
        let controller = SearchController::spawn(source.clone(), config);
        let mut rx = controller.subscribe();
        settle(&mut rx, |s| s.phase == Phase::Ready).await;

        controller.select_page(2).unwrap();
        let snapshot = settle(&mut rx, |s| s.phase == Phase::Error).await;

        assert_eq!(shown_ids(&snapshot), vec![1]);
        assert_eq!(snapshot.page.get(), 2);
        assert!(snapshot.notice.unwrap().contains("timed out"));
        controller.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn same_tick_inputs_share_one_fetch() {
        let source = ScriptedSource::with_delays(&[]);
        let controller = SearchController::spawn(source.clone(), ControllerConfig::default());
        let mut rx = controller.subscribe();
        settle(&mut rx, |s| s.phase == Phase::Ready).await;

        let austin = Selection::Only(CityName::new("Austin").unwrap());
        controller.select_city(austin.clone()).unwrap();
        controller.select_page(2).unwrap();

        settle(&mut rx, |s| s.phase == Phase::Ready && s.results.page == 2).await;
        let calls = source.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].0.city, austin);
        assert_eq!(calls[1].1.get(), 2);
        controller.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn selector_change_returns_to_first_page() {
        let source = ScriptedSource::with_delays(&[]);
        let controller = SearchController::spawn(source.clone(), ControllerConfig::default());
        let mut rx = controller.subscribe();
        settle(&mut rx, |s| s.phase == Phase::Ready).await;

        controller.select_page(3).unwrap();
        settle(&mut rx, |s| s.phase == Phase::Ready && s.results.page == 3).await;

        controller
            .select_specialty(Selection::Only(Specialty::new("Bipolar").unwrap()))
            .unwrap();
        let snapshot = settle(&mut rx, |s| {
            s.phase == Phase::Ready && !s.query.specialty.is_all()
        })
        .await;

        assert_eq!(snapshot.page, PageRequest::FIRST);
        assert_eq!(source.calls()[2].1, PageRequest::FIRST);
        controller.shutdown().await;
    }
}
