mod helpers;

use zerin_core::db::open_db_in_memory;
use zerin_core::{NewUser, SqliteKvStore, Tier, User, UserDirectory, UserPatch, UserStatus};

#[test]
fn seed_default_user_exists_after_any_listing_from_empty_storage() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKvStore::try_new(&conn).unwrap();
    let directory = UserDirectory::new(&kv);

    let users = directory.list_users().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].email, "info@ab.com");
    assert_eq!(users[0].tier, Tier::Enterprise);
    assert_eq!(users[0].status, UserStatus::Active);

    // The restore is persisted, not just returned.
    let again = directory.list_users().unwrap();
    assert_eq!(again, users);
}

#[test]
fn seed_is_reinserted_after_deletion_keeping_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKvStore::try_new(&conn).unwrap();
    let directory = UserDirectory::new(&kv);

    let seed_id = User::seed_default().id;
    let registered = directory.register(sample_user("first@example.com")).unwrap();
    directory.delete_user(&seed_id).unwrap();

    let users = directory.list_users().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].id, registered.id);
    // Recreated seed is appended, not necessarily first.
    assert_eq!(users[1].email, "info@ab.com");
}

#[test]
fn register_then_login_succeeds_with_either_credential() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKvStore::try_new(&conn).unwrap();
    let directory = UserDirectory::new(&kv);

    let user = directory.register(sample_user("kona@example.com")).unwrap();

    let by_password = directory
        .login("kona@example.com", Some("secret"), None)
        .unwrap()
        .unwrap();
    assert_eq!(by_password.id, user.id);

    let by_pin = directory
        .login("kona@example.com", None, Some("4321"))
        .unwrap()
        .unwrap();
    assert_eq!(by_pin.id, user.id);
}

#[test]
fn login_fails_on_unknown_email_or_wrong_credentials() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKvStore::try_new(&conn).unwrap();
    let directory = UserDirectory::new(&kv);

    directory.register(sample_user("kona@example.com")).unwrap();

    assert!(directory
        .login("nobody@example.com", Some("secret"), Some("4321"))
        .unwrap()
        .is_none());
    assert!(directory
        .login("kona@example.com", Some("wrong"), None)
        .unwrap()
        .is_none());
    assert!(directory
        .login("kona@example.com", None, Some("0000"))
        .unwrap()
        .is_none());
}

#[test]
fn duplicate_email_registration_is_permitted() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKvStore::try_new(&conn).unwrap();
    let directory = UserDirectory::new(&kv);

    let first = directory.register(sample_user("dup@example.com")).unwrap();
    let second = directory.register(sample_user("dup@example.com")).unwrap();
    assert_ne!(first.id, second.id);

    let duplicates = directory
        .list_users()
        .unwrap()
        .into_iter()
        .filter(|user| user.email == "dup@example.com")
        .count();
    assert_eq!(duplicates, 2);
}

#[test]
fn register_forces_free_tier_and_active_status() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKvStore::try_new(&conn).unwrap();
    let directory = UserDirectory::new(&kv);

    let mut input = sample_user("vip@example.com");
    input.tier = Tier::Enterprise;
    input.status = UserStatus::Revoked;

    let user = directory.register(input).unwrap();
    assert_eq!(user.tier, Tier::Free);
    assert_eq!(user.status, UserStatus::Active);
}

#[test]
fn revoked_user_cannot_login_with_correct_credentials() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKvStore::try_new(&conn).unwrap();
    let directory = UserDirectory::new(&kv);

    let user = directory.register(sample_user("gone@example.com")).unwrap();
    directory
        .update_user(&user.id, &UserPatch::status(UserStatus::Revoked))
        .unwrap();

    assert!(directory
        .login("gone@example.com", Some("secret"), None)
        .unwrap()
        .is_none());
    assert!(directory
        .login("gone@example.com", None, Some("4321"))
        .unwrap()
        .is_none());
}

#[test]
fn update_user_refreshes_matching_session_snapshot() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKvStore::try_new(&conn).unwrap();
    let directory = UserDirectory::new(&kv);

    let user = directory.register(sample_user("kona@example.com")).unwrap();
    directory.set_current_user(Some(&user)).unwrap();

    directory
        .update_user(&user.id, &UserPatch::tier(Tier::Pro))
        .unwrap();

    let stored = find_by_id(&directory, &user.id);
    assert_eq!(stored.tier, Tier::Pro);
    let snapshot = directory.current_user().unwrap().unwrap();
    assert_eq!(snapshot.tier, Tier::Pro);
}

#[test]
fn update_user_with_unknown_id_changes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKvStore::try_new(&conn).unwrap();
    let directory = UserDirectory::new(&kv);

    let user = directory.register(sample_user("kona@example.com")).unwrap();
    directory.set_current_user(Some(&user)).unwrap();
    let before = directory.list_users().unwrap();

    directory
        .update_user("no-such-id", &UserPatch::tier(Tier::Pro))
        .unwrap();

    assert_eq!(directory.list_users().unwrap(), before);
    assert_eq!(
        directory.current_user().unwrap().unwrap().tier,
        Tier::Free
    );
}

#[test]
fn update_user_leaves_other_sessions_snapshot_alone() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKvStore::try_new(&conn).unwrap();
    let directory = UserDirectory::new(&kv);

    let logged_in = directory.register(sample_user("a@example.com")).unwrap();
    let other = directory.register(sample_user("b@example.com")).unwrap();
    directory.set_current_user(Some(&logged_in)).unwrap();

    directory
        .update_user(&other.id, &UserPatch::tier(Tier::Pro))
        .unwrap();

    let snapshot = directory.current_user().unwrap().unwrap();
    assert_eq!(snapshot.id, logged_in.id);
    assert_eq!(snapshot.tier, Tier::Free);
}

#[test]
fn delete_user_leaves_session_snapshot_stale() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKvStore::try_new(&conn).unwrap();
    let directory = UserDirectory::new(&kv);

    let user = directory.register(sample_user("kona@example.com")).unwrap();
    directory.set_current_user(Some(&user)).unwrap();
    directory.delete_user(&user.id).unwrap();

    assert!(directory
        .list_users()
        .unwrap()
        .iter()
        .all(|stored| stored.id != user.id));

    // Snapshot survives and still verifies its pin; documented gap.
    let verified = directory.verify_pin("4321").unwrap().unwrap();
    assert_eq!(verified.id, user.id);
}

#[test]
fn verify_pin_only_matches_snapshot_pin() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKvStore::try_new(&conn).unwrap();
    let directory = UserDirectory::new(&kv);

    assert!(directory.verify_pin("1234").unwrap().is_none());

    let user = directory.register(sample_user("kona@example.com")).unwrap();
    directory.set_current_user(Some(&user)).unwrap();

    assert!(directory.verify_pin("0000").unwrap().is_none());
    assert!(directory.verify_pin("4321").unwrap().is_some());
}

#[test]
fn reset_pin_returns_stored_pin_for_known_email_only() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKvStore::try_new(&conn).unwrap();
    let directory = UserDirectory::new(&kv);

    directory.register(sample_user("kona@example.com")).unwrap();

    assert_eq!(
        directory.reset_pin("kona@example.com").unwrap().as_deref(),
        Some("4321")
    );
    assert!(directory.reset_pin("nobody@example.com").unwrap().is_none());
}

fn sample_user(email: &str) -> NewUser {
    NewUser {
        email: email.to_string(),
        password: Some("secret".to_string()),
        pin: "4321".to_string(),
        mobile: "0123456789".to_string(),
        name: "Kona".to_string(),
        ..NewUser::default()
    }
}

fn find_by_id<S: zerin_core::KvStore>(directory: &UserDirectory<'_, S>, id: &str) -> User {
    directory
        .list_users()
        .unwrap()
        .into_iter()
        .find(|user| user.id == id)
        .expect("user should exist")
}
