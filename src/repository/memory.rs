//! Record store that keeps every advocate in memory and answers queries with
//! the filter engine. Behaves like [`super::DieselRepository`] for the same
//! data, which makes it a drop-in for embedding and tests.

use std::sync::{RwLock, RwLockReadGuard};

use chrono::Utc;

use crate::domain::advocate::{Advocate, NewAdvocate};
use crate::domain::query::FilterOptions;
use crate::domain::types::AdvocateId;
use crate::filter::{filter_advocates, filter_options};
use crate::pagination::slice;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{AdvocateListQuery, AdvocateReader, AdvocateWriter};

#[derive(Debug, Default)]
pub struct InMemoryRepository {
    advocates: RwLock<Vec<Advocate>>,
}

impl InMemoryRepository {
    /// Wraps already identified advocates; they are kept sorted by id.
    pub fn new(mut advocates: Vec<Advocate>) -> Self {
        advocates.sort_by_key(|a| a.id);
        Self {
            advocates: RwLock::new(advocates),
        }
    }

    fn read(&self) -> RepositoryResult<RwLockReadGuard<'_, Vec<Advocate>>> {
        self.advocates
            .read()
            .map_err(|_| RepositoryError::Unexpected("advocate store lock poisoned".to_string()))
    }
}

impl AdvocateReader for InMemoryRepository {
    fn get_advocate_by_id(&self, id: AdvocateId) -> RepositoryResult<Option<Advocate>> {
        Ok(self.read()?.iter().find(|a| a.id == id).cloned())
    }

    fn list_advocates(&self, query: AdvocateListQuery) -> RepositoryResult<(usize, Vec<Advocate>)> {
        let matches = filter_advocates(&query.filter, &self.read()?);
        let total = matches.len();

        let items = match query.pagination {
            Some(pagination) => slice(&matches, pagination.page, pagination.per_page).to_vec(),
            None => matches,
        };

        Ok((total, items))
    }

    fn list_filter_options(&self) -> RepositoryResult<FilterOptions> {
        Ok(filter_options(&self.read()?))
    }
}

impl AdvocateWriter for InMemoryRepository {
    fn create_advocates(&self, new_advocates: &[NewAdvocate]) -> RepositoryResult<usize> {
        let mut advocates = self
            .advocates
            .write()
            .map_err(|_| RepositoryError::Unexpected("advocate store lock poisoned".to_string()))?;

        let mut next_id = advocates.last().map_or(0, |a| a.id.get());
        let created_at = Utc::now().naive_utc();

        for new in new_advocates {
            next_id += 1;
            advocates.push(Advocate {
                id: AdvocateId::new(next_id)?,
                first_name: new.first_name.clone(),
                last_name: new.last_name.clone(),
                city: new.city.clone(),
                degree: new.degree.clone(),
                specialties: new.specialties.clone(),
                years_of_experience: new.years_of_experience,
                phone_number: new.phone_number.clone(),
                created_at,
            });
        }

        Ok(new_advocates.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::query::{QueryDescription, Selection};
    use crate::domain::types::{
        CityName, Degree, PersonName, PhoneNumber, Specialty, YearsOfExperience,
    };
    use crate::pagination::PAGE_SIZE;

    fn new_advocate(first: &str, city: &str) -> NewAdvocate {
        NewAdvocate::new(
            PersonName::new(first).unwrap(),
            PersonName::new("Doe").unwrap(),
            CityName::new(city).unwrap(),
            Degree::new("MD").unwrap(),
            vec![Specialty::new("Bipolar").unwrap()],
            YearsOfExperience::new(2),
            PhoneNumber::new("5550001111").unwrap(),
        )
    }

    fn seeded(count: usize) -> InMemoryRepository {
        let repo = InMemoryRepository::default();
        let batch: Vec<NewAdvocate> = (0..count)
            .map(|i| new_advocate(&format!("Person{i}"), if i % 2 == 0 { "Austin" } else { "Dallas" }))
            .collect();
        repo.create_advocates(&batch).unwrap();
        repo
    }

    #[test]
    fn create_assigns_sequential_ids() {
        let repo = seeded(3);
        let (_, items) = repo.list_advocates(AdvocateListQuery::default()).unwrap();
        let ids: Vec<i32> = items.iter().map(|a| a.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn pages_share_the_filtered_total() {
        let repo = seeded(13);
        let query = AdvocateListQuery::default();

        let (total, first) = repo.list_advocates(query.clone().paginate(1, PAGE_SIZE)).unwrap();
        assert_eq!(total, 13);
        assert_eq!(first.len(), 6);

        let (total, last) = repo.list_advocates(query.clone().paginate(3, PAGE_SIZE)).unwrap();
        assert_eq!(total, 13);
        assert_eq!(last.len(), 1);

        let (total, beyond) = repo.list_advocates(query.paginate(4, PAGE_SIZE)).unwrap();
        assert_eq!(total, 13);
        assert!(beyond.is_empty());
    }

    #[test]
    fn city_filter_applies_before_pagination() {
        let repo = seeded(13);
        let filter = QueryDescription::new(
            "",
            Selection::Only(CityName::new("Dallas").unwrap()),
            Selection::All,
        )
        .to_filter();

        let (total, items) = repo
            .list_advocates(AdvocateListQuery::new(filter).paginate(1, PAGE_SIZE))
            .unwrap();
        assert_eq!(total, 6);
        assert!(items.iter().all(|a| a.city.as_str() == "Dallas"));
    }

    #[test]
    fn get_by_id_finds_stored_advocate() {
        let repo = seeded(2);
        let found = repo
            .get_advocate_by_id(AdvocateId::new(2).unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(found.first_name.as_str(), "Person1");
        assert!(
            repo.get_advocate_by_id(AdvocateId::new(9).unwrap())
                .unwrap()
                .is_none()
        );
    }
}
