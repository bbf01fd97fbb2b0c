//! Synchronous core of the query controller.
//!
//! [`QueryState`] is fed inputs, debounce polls and fetch completions one at a
//! time and answers with at most one [`FetchRequest`] per [`QueryState::flush`].
//! It never touches the runtime, so every transition can be driven directly
//! from tests.

use std::time::Duration;

use tokio::time::Instant;

use crate::controller::debounce::Debouncer;
use crate::controller::source::FetchError;
use crate::domain::advocate::Advocate;
use crate::domain::query::{FilterOptions, PageRequest, QueryDescription, ResultPage, Selection};
use crate::domain::types::{CityName, Specialty};
use crate::filter::filter_options;
use crate::pagination::{PAGE_SIZE, Paginated};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Fetching,
    Ready,
    Error,
}

/// Sequence number of an issued fetch. Later requests get larger tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub const fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub token: RequestToken,
    pub query: QueryDescription,
    pub page: PageRequest,
}

/// Something the user did.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// Raw keystroke-level change of the search box.
    EditTerm(String),
    SelectCity(Selection<CityName>),
    SelectSpecialty(Selection<Specialty>),
    SelectPage(usize),
}

/// Everything a renderer needs, detached from the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub phase: Phase,
    /// Query the shown results (or the in-flight request) belong to.
    pub query: QueryDescription,
    /// Search box contents, possibly not yet committed.
    pub draft_term: String,
    /// Active page cursor.
    pub page: PageRequest,
    /// Last successfully fetched page.
    pub results: Paginated<Advocate>,
    pub options: FilterOptions,
    /// Non-fatal problem with the latest fetch.
    pub notice: Option<String>,
}

#[derive(Debug)]
pub struct QueryState {
    query: QueryDescription,
    draft_term: String,
    page: PageRequest,
    debouncer: Debouncer<String>,
    dirty: bool,
    next_token: u64,
    latest: Option<FetchRequest>,
    phase: Phase,
    shown: Option<(PageRequest, ResultPage)>,
    notice: Option<String>,
    options: FilterOptions,
    store_options: bool,
}

impl QueryState {
    pub fn new(debounce: Duration) -> Self {
        Self {
            query: QueryDescription::default(),
            draft_term: String::new(),
            page: PageRequest::FIRST,
            debouncer: Debouncer::new(debounce),
            dirty: false,
            next_token: 0,
            latest: None,
            phase: Phase::Idle,
            shown: None,
            notice: None,
            options: FilterOptions::default(),
            store_options: false,
        }
    }

    /// Requests the initial load.
    pub fn mount(&mut self) {
        self.dirty = true;
    }

    pub fn input(&mut self, input: Input, now: Instant) {
        match input {
            Input::EditTerm(term) => {
                self.draft_term = term.clone();
                self.debouncer.push(term, now);
            }
            Input::SelectCity(city) => {
                if city != self.query.city {
                    self.query.city = city;
                    self.query_changed();
                }
            }
            Input::SelectSpecialty(specialty) => {
                if specialty != self.query.specialty {
                    self.query.specialty = specialty;
                    self.query_changed();
                }
            }
            Input::SelectPage(page) => {
                let page = PageRequest::new(page);
                if page != self.page {
                    self.page = page;
                    self.dirty = true;
                }
            }
        }
    }

    /// When the buffered search term will settle.
    pub fn debounce_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Commits the buffered term if its quiet period is over.
    pub fn poll_debounce(&mut self, now: Instant) {
        let Some(term) = self.debouncer.poll(now) else {
            return;
        };

        let changed = term.trim() != self.query.term.trim();
        log::debug!("Search term settled on {term:?} (changed: {changed})");
        self.query.term = term;
        if changed {
            self.query_changed();
        }
    }

    fn query_changed(&mut self) {
        self.page = PageRequest::FIRST;
        self.dirty = true;
    }

    /// Issues one request covering every change since the previous flush.
    pub fn flush(&mut self) -> Option<FetchRequest> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        self.next_token += 1;

        let request = FetchRequest {
            token: RequestToken(self.next_token),
            query: self.query.clone(),
            page: self.page,
        };
        self.latest = Some(request.clone());
        self.phase = Phase::Fetching;
        Some(request)
    }

    /// Applies a fetch result unless a newer request has been issued since.
    pub fn complete(&mut self, token: RequestToken, result: Result<ResultPage, FetchError>) {
        let page = match &self.latest {
            Some(latest) if latest.token == token => latest.page,
            _ => {
                log::debug!("Discarding stale response for request {}", token.get());
                return;
            }
        };

        match result {
            Ok(results) => {
                if !self.store_options {
                    self.options = filter_options(&results.advocates);
                }
                self.shown = Some((page, results));
                self.notice = None;
                self.phase = Phase::Ready;
            }
            Err(err) => {
                log::warn!("Failed to fetch advocates: {err}");
                self.notice = Some(err.to_string());
                self.phase = Phase::Error;
            }
        }
    }

    /// Installs selector options computed over the whole directory.
    pub fn set_filter_options(&mut self, options: FilterOptions) {
        self.options = options;
        self.store_options = true;
    }

    pub fn snapshot(&self) -> Snapshot {
        let results = match &self.shown {
            Some((page, results)) => Paginated::new(
                results.advocates.clone(),
                page.get(),
                results.total,
                PAGE_SIZE,
            ),
            None => Paginated::new(Vec::new(), 1, 0, PAGE_SIZE),
        };

        Snapshot {
            phase: self.phase,
            query: self.query.clone(),
            draft_term: self.draft_term.clone(),
            page: self.page,
            results,
            options: self.options.clone(),
            notice: self.notice.clone(),
        }
    }
}
