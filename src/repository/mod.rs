use crate::db::{DbConnection, DbPool, get_connection};
use crate::domain::advocate::{Advocate, NewAdvocate};
use crate::domain::query::{AdvocateFilter, FilterOptions};
use crate::domain::types::AdvocateId;
use crate::repository::errors::RepositoryResult;

pub mod advocate;
pub mod errors;
pub mod memory;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;

pub use memory::InMemoryRepository;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

/// Filtered, optionally paginated listing of advocates.
///
/// The same `filter` drives both the page fetch and the total count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdvocateListQuery {
    pub filter: AdvocateFilter,
    pub pagination: Option<Pagination>,
}

impl AdvocateListQuery {
    pub fn new(filter: AdvocateFilter) -> Self {
        Self {
            filter,
            pagination: None,
        }
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination {
            page: page.max(1),
            per_page,
        });
        self
    }
}

pub trait AdvocateReader {
    fn get_advocate_by_id(&self, id: AdvocateId) -> RepositoryResult<Option<Advocate>>;
    /// Returns the number of matches across all pages and the requested page,
    /// ordered by ascending id.
    fn list_advocates(&self, query: AdvocateListQuery) -> RepositoryResult<(usize, Vec<Advocate>)>;
    /// Selector options computed over every stored advocate.
    fn list_filter_options(&self) -> RepositoryResult<FilterOptions>;
}

pub trait AdvocateWriter {
    fn create_advocates(&self, new_advocates: &[NewAdvocate]) -> RepositoryResult<usize>;
}

/// Diesel-backed record store sharing one connection pool.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(get_connection(&self.pool)?)
    }
}
