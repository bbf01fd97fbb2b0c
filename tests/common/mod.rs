#![allow(dead_code)]

use advocate_directory::db::{DbPool, establish_connection_pool};
use advocate_directory::domain::advocate::NewAdvocate;
use advocate_directory::domain::types::{
    CityName, Degree, PersonName, PhoneNumber, Specialty, YearsOfExperience,
};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tempfile::TempDir;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Migrated SQLite file living in its own temporary directory.
pub struct TestDb {
    _dir: TempDir,
    pool: DbPool,
}

impl TestDb {
    pub fn new(name: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join(name);
        let pool = establish_connection_pool(path.to_str().expect("utf-8 path"), 2)
            .expect("create pool");

        let mut conn = pool.get().expect("get connection");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("run migrations");

        Self { _dir: dir, pool }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }
}

pub fn new_advocate(first: &str, last: &str, city: &str, specialties: &[&str]) -> NewAdvocate {
    NewAdvocate::new(
        PersonName::new(first).unwrap(),
        PersonName::new(last).unwrap(),
        CityName::new(city).unwrap(),
        Degree::new("MD").unwrap(),
        specialties
            .iter()
            .map(|label| Specialty::new(*label).unwrap())
            .collect(),
        YearsOfExperience::new(5),
        PhoneNumber::new("555-123-4567").unwrap(),
    )
}
