//! Query descriptions and the predicate they compile to.
//!
//! A [`QueryDescription`] is what the user sees: a free-text term and two
//! categorical selections, each of which may be the `All` sentinel. The
//! sentinel only exists at the parsing boundary; [`QueryDescription::to_filter`]
//! turns the description into an [`AdvocateFilter`] that carries nothing but
//! the clauses that are actually active.

use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::domain::advocate::Advocate;
use crate::domain::types::{CityName, Specialty};

/// Label used by the UI and the HTTP API to mean "no filter".
pub const ALL: &str = "All";

/// A categorical selection that is either unrestricted or a single value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Selection<T> {
    #[default]
    All,
    Only(T),
}

impl<T> Selection<T>
where
    T: for<'a> TryFrom<&'a str>,
{
    /// Parses a raw request parameter. Missing, blank and `All` values, as well
    /// as values the label type rejects, select everything.
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") | Some(ALL) => Selection::All,
            Some(value) => T::try_from(value).map_or(Selection::All, Selection::Only),
        }
    }
}

impl<T> Selection<T> {
    pub fn as_option(&self) -> Option<&T> {
        match self {
            Selection::All => None,
            Selection::Only(value) => Some(value),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }
}

impl<T: Deref<Target = str>> Selection<T> {
    /// Renders the selection the way the HTTP API expects it.
    pub fn as_param(&self) -> &str {
        match self {
            Selection::All => ALL,
            Selection::Only(value) => &**value,
        }
    }
}

impl<T> From<Option<T>> for Selection<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Selection::All, Selection::Only)
    }
}

/// Everything the user has asked for, except the page.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct QueryDescription {
    /// Free-text term as typed. Surrounding whitespace is ignored.
    pub term: String,
    pub city: Selection<CityName>,
    pub specialty: Selection<Specialty>,
}

impl QueryDescription {
    pub fn new(
        term: impl Into<String>,
        city: Selection<CityName>,
        specialty: Selection<Specialty>,
    ) -> Self {
        Self {
            term: term.into(),
            city,
            specialty,
        }
    }

    /// Compiles the description into a predicate.
    pub fn to_filter(&self) -> AdvocateFilter {
        AdvocateFilter {
            term: SearchTerm::new(&self.term),
            city: self.city.as_option().cloned(),
            specialty: self.specialty.as_option().cloned(),
        }
    }
}

/// Trimmed, non-empty free-text term.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SearchTerm {
    raw: String,
    folded: String,
}

impl SearchTerm {
    /// Returns `None` for blank input.
    pub fn new(value: &str) -> Option<Self> {
        let raw = value.trim();
        if raw.is_empty() {
            return None;
        }
        Some(Self {
            raw: raw.to_string(),
            folded: raw.to_lowercase(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The term lowercased with Unicode rules.
    pub fn folded(&self) -> &str {
        &self.folded
    }

    /// Case-insensitive substring test.
    pub fn found_in(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(self.folded())
    }
}

/// Conjunction of the active search clauses. An empty filter matches every
/// advocate.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct AdvocateFilter {
    /// Substring of first name, last name, city or any specialty label.
    pub term: Option<SearchTerm>,
    /// Exact city.
    pub city: Option<CityName>,
    /// Exact member of the specialty list.
    pub specialty: Option<Specialty>,
}

impl AdvocateFilter {
    pub fn is_empty(&self) -> bool {
        self.term.is_none() && self.city.is_none() && self.specialty.is_none()
    }

    pub fn matches(&self, advocate: &Advocate) -> bool {
        let term_ok = self.term.as_ref().is_none_or(|term| {
            term.found_in(&advocate.first_name)
                || term.found_in(&advocate.last_name)
                || term.found_in(&advocate.city)
                || advocate.specialties.iter().any(|s| term.found_in(s))
        });
        let city_ok = self.city.as_ref().is_none_or(|city| &advocate.city == city);
        let specialty_ok = self
            .specialty
            .as_ref()
            .is_none_or(|specialty| advocate.has_specialty(specialty));

        term_ok && city_ok && specialty_ok
    }
}

/// 1-based page number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageRequest(usize);

impl PageRequest {
    pub const FIRST: PageRequest = PageRequest(1);

    /// Page `0` is treated as the first page.
    pub fn new(page: usize) -> Self {
        Self(page.max(1))
    }

    /// Lenient parser for the `page` request parameter.
    pub fn from_param(raw: Option<&str>) -> Self {
        raw.and_then(|value| value.trim().parse::<usize>().ok())
            .map_or(Self::FIRST, Self::new)
    }

    pub const fn get(self) -> usize {
        self.0
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::FIRST
    }
}

/// One page of matches plus the number of matches across all pages.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResultPage {
    pub advocates: Vec<Advocate>,
    pub total: usize,
}

impl ResultPage {
    pub fn new(advocates: Vec<Advocate>, total: usize) -> Self {
        Self { advocates, total }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

/// Choices offered by the city and specialty selectors, each led by [`ALL`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub cities: Vec<String>,
    pub specialties: Vec<String>,
}

impl FilterOptions {
    /// Deduplicates both label lists, keeping first-seen order.
    pub fn from_labels<C, S>(cities: C, specialties: S) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Self {
            cities: with_sentinel(cities),
            specialties: with_sentinel(specialties),
        }
    }
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self::from_labels(Vec::<String>::new(), Vec::<String>::new())
    }
}

fn with_sentinel<I>(labels: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    let mut out = vec![ALL.to_string()];
    for label in labels {
        let label = label.into();
        if !out.contains(&label) {
            out.push(label);
        }
    }
    out
}
