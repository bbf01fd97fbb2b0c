//! Populates an empty directory with a built-in sample of advocates.

use dotenvy::dotenv;

use advocate_directory::db::establish_connection_pool;
use advocate_directory::domain::advocate::NewAdvocate;
use advocate_directory::domain::types::{
    CityName, Degree, PersonName, PhoneNumber, Specialty, TypeConstraintError, YearsOfExperience,
};
use advocate_directory::models::config::ServerConfig;
use advocate_directory::repository::DieselRepository;
use advocate_directory::services::advocates::seed_advocates;

struct SampleAdvocate {
    first_name: &'static str,
    last_name: &'static str,
    city: &'static str,
    degree: &'static str,
    specialties: &'static [&'static str],
    years_of_experience: u16,
    phone_number: &'static str,
}

const SAMPLE: &[SampleAdvocate] = &[
    SampleAdvocate {
        first_name: "John",
        last_name: "Doe",
        city: "New York",
        degree: "MD",
        specialties: &["Bipolar", "LGBTQ", "Medication/Prescribing"],
        years_of_experience: 10,
        phone_number: "555-123-4567",
    },
    SampleAdvocate {
        first_name: "Jane",
        last_name: "Smith",
        city: "Los Angeles",
        degree: "PhD",
        specialties: &["Trauma & PTSD", "Personality disorders"],
        years_of_experience: 8,
        phone_number: "555-987-6543",
    },
    SampleAdvocate {
        first_name: "Alice",
        last_name: "Johnson",
        city: "Chicago",
        degree: "MSW",
        specialties: &["Relationship Issues (family, friends, couple, etc)", "Personal growth"],
        years_of_experience: 5,
        phone_number: "555-456-7890",
    },
    SampleAdvocate {
        first_name: "Michael",
        last_name: "Brown",
        city: "Houston",
        degree: "MD",
        specialties: &["Pediatrics", "Chronic pain"],
        years_of_experience: 12,
        phone_number: "555-321-9876",
    },
    SampleAdvocate {
        first_name: "Emily",
        last_name: "Davis",
        city: "Phoenix",
        degree: "PhD",
        specialties: &["Eating disorders", "Weight loss & nutrition"],
        years_of_experience: 7,
        phone_number: "555-654-3210",
    },
    SampleAdvocate {
        first_name: "Chris",
        last_name: "Martinez",
        city: "Philadelphia",
        degree: "MSW",
        specialties: &["Substance use/abuse", "Men's issues"],
        years_of_experience: 9,
        phone_number: "555-789-0123",
    },
    SampleAdvocate {
        first_name: "Jessica",
        last_name: "Taylor",
        city: "San Antonio",
        degree: "MD",
        specialties: &["Sleep issues", "Attention and Hyperactivity (ADHD)"],
        years_of_experience: 11,
        phone_number: "555-234-5678",
    },
    SampleAdvocate {
        first_name: "David",
        last_name: "Harris",
        city: "San Diego",
        degree: "PhD",
        specialties: &["Obsessive-compulsive disorders", "Trauma & PTSD"],
        years_of_experience: 6,
        phone_number: "555-876-5432",
    },
    SampleAdvocate {
        first_name: "Laura",
        last_name: "Clark",
        city: "Dallas",
        degree: "MSW",
        specialties: &["Domestic abuse", "Women's issues (post-partum, infertility, family planning)"],
        years_of_experience: 4,
        phone_number: "555-345-6789",
    },
    SampleAdvocate {
        first_name: "Daniel",
        last_name: "Lewis",
        city: "San Jose",
        degree: "MD",
        specialties: &["Schizophrenia and psychotic disorders", "Medication/Prescribing"],
        years_of_experience: 13,
        phone_number: "555-765-4321",
    },
    SampleAdvocate {
        first_name: "Sarah",
        last_name: "Lee",
        city: "Austin",
        degree: "PhD",
        specialties: &["Learning disorders", "Pediatrics"],
        years_of_experience: 10,
        phone_number: "555-543-2109",
    },
    SampleAdvocate {
        first_name: "James",
        last_name: "King",
        city: "Jacksonville",
        degree: "MSW",
        specialties: &["Life coaching", "Personal growth"],
        years_of_experience: 5,
        phone_number: "555-432-1098",
    },
    SampleAdvocate {
        first_name: "Megan",
        last_name: "Scott",
        city: "San Francisco",
        degree: "MD",
        specialties: &["Diabetic Diet and nutrition", "Weight loss & nutrition"],
        years_of_experience: 14,
        phone_number: "555-210-9876",
    },
    SampleAdvocate {
        first_name: "Joshua",
        last_name: "Green",
        city: "Columbus",
        degree: "PhD",
        specialties: &["Suicide History/Attempts", "Bipolar"],
        years_of_experience: 6,
        phone_number: "555-109-8765",
    },
    SampleAdvocate {
        first_name: "Amanda",
        last_name: "Baker",
        city: "Austin",
        degree: "MSW",
        specialties: &["LGBTQ", "Relationship Issues (family, friends, couple, etc)"],
        years_of_experience: 3,
        phone_number: "555-098-7654",
    },
];

fn build_sample() -> Result<Vec<NewAdvocate>, TypeConstraintError> {
    SAMPLE
        .iter()
        .map(|s| {
            Ok(NewAdvocate::new(
                PersonName::new(s.first_name)?,
                PersonName::new(s.last_name)?,
                CityName::new(s.city)?,
                Degree::new(s.degree)?,
                s.specialties
                    .iter()
                    .map(|label| Specialty::new(*label))
                    .collect::<Result<Vec<_>, _>>()?,
                YearsOfExperience::new(s.years_of_experience),
                PhoneNumber::new(s.phone_number)?,
            ))
        })
        .collect()
}

fn main() {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let server_config = match ServerConfig::load() {
        Ok(server_config) => server_config,
        Err(err) => {
            log::error!("Error loading server config: {err}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&server_config.database_url, 1) {
        Ok(pool) => pool,
        Err(err) => {
            log::error!("Failed to establish database connection: {err}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    let sample = match build_sample() {
        Ok(sample) => sample,
        Err(err) => {
            log::error!("Invalid sample advocate: {err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = seed_advocates(&repo, &sample) {
        log::error!("Seeding failed: {err}");
        std::process::exit(1);
    }
}
