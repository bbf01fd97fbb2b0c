use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    AdvocateId, CityName, Degree, PersonName, PhoneNumber, Specialty, YearsOfExperience,
};

/// Directory entry describing a person available for matching.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Advocate {
    pub id: AdvocateId,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub city: CityName,
    pub degree: Degree,
    /// Specialty labels in the order they were recorded.
    pub specialties: Vec<Specialty>,
    pub years_of_experience: YearsOfExperience,
    pub phone_number: PhoneNumber,
    pub created_at: NaiveDateTime,
}

impl Advocate {
    /// Returns `true` when `specialty` is one of the advocate's labels.
    pub fn has_specialty(&self, specialty: &Specialty) -> bool {
        self.specialties.iter().any(|s| s == specialty)
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAdvocate {
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub city: CityName,
    pub degree: Degree,
    pub specialties: Vec<Specialty>,
    pub years_of_experience: YearsOfExperience,
    pub phone_number: PhoneNumber,
}

impl NewAdvocate {
    /// Builds an insertable advocate, dropping repeated specialty labels while
    /// keeping the first occurrence of each.
    #[must_use]
    pub fn new(
        first_name: PersonName,
        last_name: PersonName,
        city: CityName,
        degree: Degree,
        specialties: Vec<Specialty>,
        years_of_experience: YearsOfExperience,
        phone_number: PhoneNumber,
    ) -> Self {
        let mut unique: Vec<Specialty> = Vec::with_capacity(specialties.len());
        for specialty in specialties {
            if !unique.contains(&specialty) {
                unique.push(specialty);
            }
        }

        Self {
            first_name,
            last_name,
            city,
            degree,
            specialties: unique,
            years_of_experience,
            phone_number,
        }
    }
}
