use crate::domain::advocate::{Advocate, NewAdvocate};
use crate::domain::query::{FilterOptions, PageRequest, QueryDescription, ResultPage};
use crate::domain::types::AdvocateId;
use crate::pagination::PAGE_SIZE;
use crate::repository::{AdvocateListQuery, AdvocateReader, AdvocateWriter};
use crate::services::{ServiceError, ServiceResult};

/// Returns one page of advocates matching `query` together with the total
/// number of matches.
pub fn search_advocates<R>(
    repo: &R,
    query: &QueryDescription,
    page: PageRequest,
) -> ServiceResult<ResultPage>
where
    R: AdvocateReader + ?Sized,
{
    let list_query = AdvocateListQuery::new(query.to_filter()).paginate(page.get(), PAGE_SIZE);

    let (total, advocates) = repo.list_advocates(list_query).map_err(|err| {
        log::error!("Failed to list advocates: {err}");
        err
    })?;

    Ok(ResultPage::new(advocates, total))
}

/// Selector options over the whole directory.
pub fn load_filter_options<R>(repo: &R) -> ServiceResult<FilterOptions>
where
    R: AdvocateReader + ?Sized,
{
    repo.list_filter_options().map_err(|err| {
        log::error!("Failed to load filter options: {err}");
        ServiceError::from(err)
    })
}

/// Fetches a single advocate by its raw identifier.
pub fn get_advocate<R>(repo: &R, id: i32) -> ServiceResult<Advocate>
where
    R: AdvocateReader + ?Sized,
{
    let id = AdvocateId::new(id)?;
    repo.get_advocate_by_id(id)
        .map_err(|err| {
            log::error!("Failed to get advocate {id}: {err}");
            err
        })?
        .ok_or(ServiceError::NotFound)
}

/// Inserts `advocates` unless the directory already holds records. Returns the
/// number of inserted advocates.
pub fn seed_advocates<R>(repo: &R, advocates: &[NewAdvocate]) -> ServiceResult<usize>
where
    R: AdvocateReader + AdvocateWriter + ?Sized,
{
    let (existing, _) = repo.list_advocates(AdvocateListQuery::default().paginate(1, 1))?;
    if existing > 0 {
        log::info!("Directory already holds {existing} advocates, skipping seed");
        return Ok(0);
    }

    let inserted = repo.create_advocates(advocates).map_err(|err| {
        log::error!("Failed to seed advocates: {err}");
        err
    })?;
    log::info!("Seeded {inserted} advocates");
    Ok(inserted)
}
