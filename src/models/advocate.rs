use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::advocate::{Advocate as DomainAdvocate, NewAdvocate as DomainNewAdvocate};
use crate::domain::types::{
    AdvocateId, CityName, Degree, PersonName, PhoneNumber, Specialty, TypeConstraintError,
    YearsOfExperience,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::advocates)]
/// Diesel model for [`crate::domain::advocate::Advocate`] without its specialties.
pub struct Advocate {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub city: String,
    pub degree: String,
    pub years_of_experience: i32,
    pub phone_number: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::advocates)]
/// Insertable form of [`Advocate`].
pub struct NewAdvocate<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub city: &'a str,
    pub degree: &'a str,
    pub years_of_experience: i32,
    pub phone_number: &'a str,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations, Insertable)]
#[diesel(table_name = crate::schema::advocate_specialties)]
#[diesel(belongs_to(Advocate, foreign_key = advocate_id))]
#[diesel(primary_key(advocate_id, position))]
/// One specialty label of an advocate; `position` preserves list order.
pub struct AdvocateSpecialty {
    pub advocate_id: i32,
    pub position: i32,
    pub specialty: String,
}

impl Advocate {
    /// Joins the row with its specialty rows, which must already be sorted by
    /// position.
    pub fn into_domain(
        self,
        specialties: Vec<AdvocateSpecialty>,
    ) -> Result<DomainAdvocate, TypeConstraintError> {
        Ok(DomainAdvocate {
            id: AdvocateId::new(self.id)?,
            first_name: PersonName::new(self.first_name)?,
            last_name: PersonName::new(self.last_name)?,
            city: CityName::new(self.city)?,
            degree: Degree::new(self.degree)?,
            specialties: specialties
                .into_iter()
                .map(|row| Specialty::new(row.specialty))
                .collect::<Result<Vec<_>, _>>()?,
            years_of_experience: YearsOfExperience::try_from(self.years_of_experience)?,
            phone_number: PhoneNumber::new(self.phone_number)?,
            created_at: self.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewAdvocate> for NewAdvocate<'a> {
    fn from(advocate: &'a DomainNewAdvocate) -> Self {
        Self {
            first_name: advocate.first_name.as_str(),
            last_name: advocate.last_name.as_str(),
            city: advocate.city.as_str(),
            degree: advocate.degree.as_str(),
            years_of_experience: advocate.years_of_experience.into(),
            phone_number: advocate.phone_number.as_str(),
        }
    }
}

/// Specialty rows for a freshly inserted advocate.
pub fn specialty_rows(advocate_id: i32, advocate: &DomainNewAdvocate) -> Vec<AdvocateSpecialty> {
    advocate
        .specialties
        .iter()
        .zip(0..)
        .map(|(specialty, position)| AdvocateSpecialty {
            advocate_id,
            position,
            specialty: specialty.as_str().to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_domain_new() -> DomainNewAdvocate {
        DomainNewAdvocate::new(
            PersonName::new("John").unwrap(),
            PersonName::new("Doe").unwrap(),
            CityName::new("New York").unwrap(),
            Degree::new("MD").unwrap(),
            vec![
                Specialty::new("Bipolar").unwrap(),
                Specialty::new("LGBTQ").unwrap(),
            ],
            YearsOfExperience::new(10),
            PhoneNumber::new("5551234567").unwrap(),
        )
    }

    #[test]
    fn from_domain_new_creates_new_advocate() {
        let domain = sample_domain_new();
        let new: NewAdvocate = (&domain).into();
        assert_eq!(new.first_name, "John");
        assert_eq!(new.city, "New York");
        assert_eq!(new.years_of_experience, 10);
        assert_eq!(new.phone_number, "+15551234567");
    }

    #[test]
    fn specialty_rows_keep_order() {
        let rows = specialty_rows(4, &sample_domain_new());
        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].advocate_id, rows[0].position), (4, 0));
        assert_eq!(rows[1].specialty, "LGBTQ");
        assert_eq!(rows[1].position, 1);
    }

    #[test]
    fn advocate_into_domain() {
        let now: NaiveDateTime = Utc::now().naive_utc();
        let row = Advocate {
            id: 7,
            first_name: "Jane".to_string(),
            last_name: "Roe".to_string(),
            city: "Austin".to_string(),
            degree: "PhD".to_string(),
            years_of_experience: 4,
            phone_number: "555 000 1111".to_string(),
            created_at: now,
        };
        let specialties = vec![AdvocateSpecialty {
            advocate_id: 7,
            position: 0,
            specialty: "Trauma".to_string(),
        }];

        let domain = row.into_domain(specialties).unwrap();
        assert_eq!(domain.id.get(), 7);
        assert_eq!(domain.city.as_str(), "Austin");
        assert_eq!(domain.specialties[0].as_str(), "Trauma");
        assert_eq!(domain.phone_number.as_str(), "+15550001111");
        assert_eq!(domain.created_at, now);
    }

    #[test]
    fn invalid_row_is_rejected() {
        let row = Advocate {
            id: 1,
            first_name: "Jane".to_string(),
            last_name: "Roe".to_string(),
            city: "Austin".to_string(),
            degree: "PhD".to_string(),
            years_of_experience: -1,
            phone_number: "5550001111".to_string(),
            created_at: NaiveDateTime::default(),
        };
        assert_eq!(
            row.into_domain(vec![]).unwrap_err(),
            TypeConstraintError::NegativeValue
        );
    }
}
