//! Integration tests for Users domain
//!
//! These tests use real PostgreSQL via testcontainers to ensure:
//! - The migration and the entity agree on the schema
//! - The unique email index is enforced and reported as a conflict
//! - Whole-record updates and deletes behave as expected

use chrono::NaiveDate;
use domain_users::*;
use test_utils::{TestDataBuilder, TestDatabase, assertions::*};

fn new_user(builder: &TestDataBuilder, suffix: &str) -> NewUser {
    NewUser {
        first_name: builder.name("first", suffix),
        last_name: Some(builder.name("last", suffix)),
        email: builder.email(suffix),
        date_of_birth: NaiveDate::from_ymd_opt(1985, 12, 10).unwrap(),
        phone_number: builder.phone(),
    }
}

// ============================================================================
// Repository Tests
// ============================================================================

#[tokio::test]
async fn test_create_and_get_user() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("create_and_get");

    let input = new_user(&builder, "main");
    let created = repo.create(input.clone()).await.unwrap();

    assert!(created.id > 0);
    assert_eq!(created.email, input.email);

    let retrieved = assert_some(repo.get_by_id(created.id).await.unwrap(), "user should exist");
    assert_id_eq(retrieved.id, created.id, "retrieved user id");
    assert_eq!(retrieved, created);
}

#[tokio::test]
async fn test_duplicate_email_violation_is_conflict() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("duplicate_email");

    repo.create(new_user(&builder, "dup")).await.unwrap();

    // No pre-check here: the unique index alone must reject the row.
    let result = repo.create(new_user(&builder, "dup")).await;

    assert!(
        matches!(result, Err(UserError::Conflict(ref m)) if m == error::EMAIL_EXISTS),
        "unexpected result: {result:?}"
    );
    assert_eq!(repo.get_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_update_into_taken_email_is_conflict() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("update_conflict");

    let first = repo.create(new_user(&builder, "first")).await.unwrap();
    let second = repo.create(new_user(&builder, "second")).await.unwrap();

    let result = repo
        .update(User {
            email: first.email.clone(),
            ..second.clone()
        })
        .await;

    assert!(matches!(result, Err(UserError::Conflict(_))));
    assert_eq!(repo.get_by_id(second.id).await.unwrap(), Some(second));
}

#[tokio::test]
async fn test_update_replaces_every_field() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("update_replace");

    let created = repo.create(new_user(&builder, "main")).await.unwrap();
    let replacement = User {
        id: created.id,
        first_name: "Augusta".to_string(),
        last_name: None,
        email: builder.email("renamed"),
        date_of_birth: NaiveDate::from_ymd_opt(1970, 1, 1).unwrap(),
        phone_number: "5550000000".to_string(),
    };

    repo.update(replacement.clone()).await.unwrap();

    assert_eq!(repo.get_by_id(created.id).await.unwrap(), Some(replacement));
}

#[tokio::test]
async fn test_delete_removes_row_and_is_idempotent() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("delete");

    let created = repo.create(new_user(&builder, "main")).await.unwrap();

    repo.delete(created.id).await.unwrap();
    repo.delete(created.id).await.unwrap();

    assert_eq!(repo.get_by_id(created.id).await.unwrap(), None);
    assert!(!repo.email_exists(&created.email).await.unwrap());
}

#[tokio::test]
async fn test_get_all_orders_by_id() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("get_all");

    let a = repo.create(new_user(&builder, "a")).await.unwrap();
    let b = repo.create(new_user(&builder, "b")).await.unwrap();
    let c = repo.create(new_user(&builder, "c")).await.unwrap();

    let ids: Vec<i32> = repo.get_all().await.unwrap().iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![a.id, b.id, c.id]);
}

#[tokio::test]
async fn test_email_exists_is_exact_match() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("email_exists");

    let created = repo.create(new_user(&builder, "main")).await.unwrap();

    assert!(repo.email_exists(&created.email).await.unwrap());
    assert!(!repo.email_exists(&created.email.to_uppercase()).await.unwrap());
}

#[test]
fn test_entity_and_migration_agree_on_index_name() {
    assert_eq!(entity::EMAIL_UNIQUE_INDEX, migration::USERS_EMAIL_UNIQUE_INDEX);
}

// ============================================================================
// Service Tests (real store)
// ============================================================================

#[tokio::test]
async fn test_service_round_trip() {
    let db = TestDatabase::new().await;
    let service = UserService::new(PgUserRepository::new(db.connection()));
    let builder = TestDataBuilder::from_test_name("service_round_trip");

    let request = CreateUserRequest {
        first_name: "Ada".to_string(),
        last_name: None,
        email: builder.email("main"),
        date_of_birth: NaiveDate::from_ymd_opt(1985, 12, 10).unwrap(),
        phone_number: builder.phone(),
    };

    let created = service.create_user(request.clone()).await.unwrap();
    let fetched = service.get_user(created.id).await.unwrap();
    assert_eq!(fetched, created);

    let again = service.create_user(request).await;
    assert!(matches!(again, Err(UserError::Conflict(_))));

    service.delete_user(created.id).await.unwrap();
    assert!(matches!(
        service.get_user(created.id).await,
        Err(UserError::NotFound(_))
    ));
}
