use diesel::connection::SimpleConnection;

mod common;

#[test]
fn test_migrated_db_accepts_connections() {
    let test_db = common::TestDb::new("test_migrated_db_accepts_connections.db");
    let conn = test_db.pool().get();
    assert!(conn.is_ok());
}

#[test]
fn test_negative_experience_is_rejected_by_schema() {
    let test_db = common::TestDb::new("test_negative_experience.db");
    let mut conn = test_db.pool().get().unwrap();

    let result = conn.batch_execute(
        "INSERT INTO advocates (first_name, last_name, city, degree, years_of_experience, phone_number) \
         VALUES ('A', 'B', 'C', 'MD', -1, '5551234567');",
    );
    assert!(result.is_err());
}
