// The harness matchers running against SQLite-backed entities

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{setup_db, setup_file_db, DestroyUser, UserForm};
use recordx_core::prelude::*;
use recordx_store::{SqlitePersistence, SqliteRecord, SqliteRepo};

#[test]
fn test_update_through_delegate_passes() {
    // Given: Sophia, aged 20, stored in SQLite
    let conn = setup_db();
    let user = SqliteRecord::create(
        &conn,
        "User",
        [("name", Value::from("Sophia")), ("age", Value::from(20))],
    )
    .unwrap();
    let id = user.id();

    // When: A UserForm writes the new age
    let verdict = expect_block(|scope| {
        let mut form = scope.intercept(UserForm::new(&conn, id.clone()).set("age", 30));
        form.execute().unwrap();
    })
    .to(update_record(&user, Expectation::new().attr("age", 30)).using_delegate::<UserForm>())
    .unwrap();

    // Then: The change is seen after reload and attributed to the form
    assert!(verdict.is_success(), "{:?}", verdict.failure_message());
    assert_eq!(user.read("age").unwrap(), Value::from(30));
}

#[test]
fn test_direct_write_is_flagged_when_form_required() {
    let conn = setup_db();
    let user = SqliteRecord::create(
        &conn,
        "User",
        [("name", Value::from("Sophia")), ("age", Value::from(20))],
    )
    .unwrap();
    let id = user.id();

    let verdict = expect_block(|scope| {
        SqliteRepo::update_attributes(&conn, "User", &id, [("age", Value::from(30))]).unwrap();
        let mut form = scope.intercept(UserForm::new(&conn, id.clone()).set("name", "Emily"));
        form.execute().unwrap();
    })
    .to(update_record(
        &user,
        Expectation::new().attr("name", "Emily").attr("age", 30),
    )
    .using_delegate::<UserForm>())
    .unwrap();

    assert_eq!(
        verdict.failure_message(),
        Some(
            "Expected a record of a User class with id = 1 to be updated using UserForm, but the following attribute was changed by some other means:\n\"age\""
        )
    );
}

#[test]
fn test_unsaved_assignment_is_not_persisted() {
    let conn = setup_db();
    let user = SqliteRecord::create(&conn, "User", [("age", Value::from(20))]).unwrap();

    let verdict = expect_block(|_scope| {
        user.assign("age", 30).unwrap();
    })
    .to(update_record(&user, Expectation::new().attr("age", 30)))
    .unwrap();

    assert_eq!(
        verdict.failure_message(),
        Some(
            "Expected a record of a User class with id = 1 to be updated, but the following attribute was not properly changed:\n\"age\" from 20 to 30"
        )
    );
}

#[test]
fn test_destroy_through_service_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let conn = setup_file_db(&dir.path().join("harness.db"));
    let user = SqliteRecord::create(&conn, "User", [("name", Value::from("Sophia"))]).unwrap();
    let persistence = SqlitePersistence::new(&conn);
    let id = user.id();

    let verdict = expect_block(|scope| {
        let mut service = scope.intercept(DestroyUser::new(&conn, id.clone()));
        service.execute().unwrap();
    })
    .to(destroy_record(&user, &persistence).using_service::<DestroyUser>())
    .unwrap();

    assert!(verdict.is_success(), "{:?}", verdict.failure_message());
    assert!(!SqliteRepo::exists(&conn, "User", &id).unwrap());
}

#[test]
fn test_destroy_bypassing_service_fails() {
    let conn = setup_db();
    let user = SqliteRecord::create(&conn, "User", [("name", Value::from("Sophia"))]).unwrap();
    let persistence = SqlitePersistence::new(&conn);

    let verdict = expect_block(|_scope| {
        SqliteRepo::delete_record(&conn, "User", &user.id()).unwrap();
    })
    .to(destroy_record(&user, &persistence).using_service::<DestroyUser>())
    .unwrap();

    assert_eq!(
        verdict.failure_message(),
        Some("Expected a record of User class to be destroyed with service object DestroyUser, but was not")
    );
}

#[test]
fn test_destroy_then_insert_replacement_passes() {
    // Given: Sophia is the only, and so the highest-id, user
    let conn = setup_db();
    let user = SqliteRecord::create(&conn, "User", [("name", Value::from("Sophia"))]).unwrap();
    let persistence = SqlitePersistence::new(&conn);
    let replacement = std::cell::Cell::new(None);

    // When: The action deletes her and stores a replacement user
    let verdict = expect_block(|_scope| {
        SqliteRepo::delete_record(&conn, "User", &user.id()).unwrap();
        let id = SqliteRepo::insert_record(&conn, "User", [("name", Value::from("Emily"))]).unwrap();
        replacement.set(Some(id));
    })
    .to(destroy_record(&user, &persistence))
    .unwrap();

    // Then: The replacement gets a fresh id and the destroy is seen
    assert!(verdict.is_success(), "{:?}", verdict.failure_message());
    assert_eq!(replacement.take(), Some(EntityId::from(2)));
}

#[test]
fn test_be_record_across_handles() {
    let conn = setup_db();
    let user = SqliteRecord::create(&conn, "User", [("name", Value::from("Sophia"))]).unwrap();
    let other = SqliteRecord::create(&conn, "User", [("name", Value::from("Emily"))]).unwrap();
    let again = SqliteRecord::load(&conn, "User", user.id()).unwrap();

    assert!(expect_entity(&again).to(be_record(&user)).unwrap().is_success());
    assert_eq!(
        expect_entity(&other)
            .to(be_record(&user))
            .unwrap()
            .failure_message(),
        Some("Expected id of the record to eql 1 but was 2")
    );
}
