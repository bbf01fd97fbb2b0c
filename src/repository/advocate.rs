use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::db::fold_case;
use crate::domain::advocate::{Advocate, NewAdvocate};
use crate::domain::query::{AdvocateFilter, FilterOptions};
use crate::domain::types::AdvocateId;
use crate::models::advocate::{
    Advocate as DbAdvocate, AdvocateSpecialty, NewAdvocate as DbNewAdvocate, specialty_rows,
};
use crate::pagination::page_offset;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    AdvocateListQuery, AdvocateReader, AdvocateWriter, DieselRepository, Pagination,
};
use crate::schema::{advocate_specialties, advocates};

/// Escapes LIKE wildcards so user input only ever matches literally.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Lowers `filter` onto the advocates table. Used for both the page and the
/// count so the two can never describe different queries.
///
/// The term is matched against `fold_case` of each column, so case is ignored
/// beyond ASCII as well.
fn filtered(filter: &AdvocateFilter) -> advocates::BoxedQuery<'static, Sqlite> {
    let mut query = advocates::table.into_boxed();

    if let Some(term) = &filter.term {
        let pattern = like_pattern(term.folded());
        let specialty_hits = advocate_specialties::table
            .filter(
                fold_case(advocate_specialties::specialty)
                    .like(pattern.clone())
                    .escape('\\'),
            )
            .select(advocate_specialties::advocate_id);

        query = query.filter(
            fold_case(advocates::first_name)
                .like(pattern.clone())
                .escape('\\')
                .or(fold_case(advocates::last_name)
                    .like(pattern.clone())
                    .escape('\\'))
                .or(fold_case(advocates::city).like(pattern).escape('\\'))
                .or(advocates::id.eq_any(specialty_hits)),
        );
    }

    if let Some(city) = &filter.city {
        query = query.filter(advocates::city.eq(city.as_str().to_string()));
    }

    if let Some(specialty) = &filter.specialty {
        let members = advocate_specialties::table
            .filter(advocate_specialties::specialty.eq(specialty.as_str().to_string()))
            .select(advocate_specialties::advocate_id);
        query = query.filter(advocates::id.eq_any(members));
    }

    query
}

/// LIMIT and OFFSET for `pagination`, or `None` when the page starts past the
/// last of `total` matches.
fn page_window(pagination: &Pagination, total: usize) -> Option<(i64, i64)> {
    let offset = page_offset(pagination.page, pagination.per_page);
    if offset >= total {
        return None;
    }
    let limit = i64::try_from(pagination.per_page).unwrap_or(i64::MAX);
    Some((limit, i64::try_from(offset).ok()?))
}

/// Attaches ordered specialty lists to advocate rows.
fn with_specialties(
    conn: &mut SqliteConnection,
    rows: Vec<DbAdvocate>,
) -> RepositoryResult<Vec<Advocate>> {
    let specialties = AdvocateSpecialty::belonging_to(&rows)
        .select(AdvocateSpecialty::as_select())
        .order((
            advocate_specialties::advocate_id.asc(),
            advocate_specialties::position.asc(),
        ))
        .load::<AdvocateSpecialty>(conn)?
        .grouped_by(&rows);

    rows.into_iter()
        .zip(specialties)
        .map(|(row, specialties)| row.into_domain(specialties).map_err(RepositoryError::from))
        .collect()
}

impl AdvocateReader for DieselRepository {
    fn get_advocate_by_id(&self, id: AdvocateId) -> RepositoryResult<Option<Advocate>> {
        let mut conn = self.conn()?;

        let row = advocates::table
            .find(id.get())
            .select(DbAdvocate::as_select())
            .first::<DbAdvocate>(&mut conn)
            .optional()?;

        match row {
            Some(row) => Ok(with_specialties(&mut conn, vec![row])?.pop()),
            None => Ok(None),
        }
    }

    fn list_advocates(&self, query: AdvocateListQuery) -> RepositoryResult<(usize, Vec<Advocate>)> {
        let mut conn = self.conn()?;

        conn.transaction::<_, RepositoryError, _>(|conn| {
            let total: i64 = filtered(&query.filter).count().get_result(conn)?;
            let total = usize::try_from(total).unwrap_or_default();

            let mut items = filtered(&query.filter).order(advocates::id.asc());
            if let Some(pagination) = &query.pagination {
                let Some((limit, offset)) = page_window(pagination, total) else {
                    return Ok((total, Vec::new()));
                };
                items = items.limit(limit).offset(offset);
            }

            let rows = items.load::<DbAdvocate>(conn)?;
            let advocates = with_specialties(conn, rows)?;

            Ok((total, advocates))
        })
    }

    fn list_filter_options(&self) -> RepositoryResult<FilterOptions> {
        let mut conn = self.conn()?;

        let cities = advocates::table
            .select(advocates::city)
            .order(advocates::id.asc())
            .load::<String>(&mut conn)?;
        let specialties = advocate_specialties::table
            .select(advocate_specialties::specialty)
            .order((
                advocate_specialties::advocate_id.asc(),
                advocate_specialties::position.asc(),
            ))
            .load::<String>(&mut conn)?;

        Ok(FilterOptions::from_labels(cities, specialties))
    }
}

impl AdvocateWriter for DieselRepository {
    fn create_advocates(&self, new_advocates: &[NewAdvocate]) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;

        conn.transaction::<_, RepositoryError, _>(|conn| {
            for advocate in new_advocates {
                let id = diesel::insert_into(advocates::table)
                    .values(DbNewAdvocate::from(advocate))
                    .returning(advocates::id)
                    .get_result::<i32>(conn)?;

                let rows = specialty_rows(id, advocate);
                if !rows.is_empty() {
                    diesel::insert_into(advocate_specialties::table)
                        .values(&rows)
                        .execute(conn)?;
                }
            }
            Ok(new_advocates.len())
        })
    }
}
