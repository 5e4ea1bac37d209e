use super::*;
use crate::storage::MemoryStorage;

fn store() -> (Arc<MemoryStorage>, SessionStore) {
    let storage = Arc::new(MemoryStorage::new());
    (storage.clone(), SessionStore::new(storage))
}

fn student() -> UserProfile {
    UserProfile {
        id: 7,
        email: "ann@school.test".to_owned(),
        full_name: "Ann Petrova".to_owned(),
        role: "student".to_owned(),
        created_at: None,
        is_active: Some(true),
    }
}

#[test]
fn role_round_trips_through_wire_spelling() {
    for role in [Role::Student, Role::Cook, Role::Admin] {
        assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
    }
    assert_eq!("Student".parse::<Role>(), Err(UnknownRole("Student".to_owned())));
}

#[test]
fn landing_paths_per_role() {
    assert_eq!(Role::Student.landing_path(), "/student/dashboard");
    assert_eq!(Role::Cook.landing_path(), "/cook/dashboard");
    assert_eq!(Role::Admin.landing_path(), "/admin/dashboard");
}

#[test]
fn is_authenticated_tracks_access_token_presence_only() {
    let (storage, session) = store();
    assert!(!session.is_authenticated());

    storage.set(ACCESS_TOKEN_KEY, "not-even-a-jwt");
    assert!(session.is_authenticated());

    storage.remove(ACCESS_TOKEN_KEY);
    storage.set(REFRESH_TOKEN_KEY, "refresh-only");
    assert!(!session.is_authenticated());
}

#[test]
fn empty_access_token_counts_as_absent() {
    let (storage, session) = store();
    storage.set(ACCESS_TOKEN_KEY, "");
    assert_eq!(session.access_token(), None);
    assert!(!session.is_authenticated());
}

#[test]
fn has_role_matches_only_exact_role() {
    let (_, session) = store();
    session.set_user(&student());

    assert!(session.has_role(Role::Student));
    assert!(!session.has_role(Role::Cook));
    assert!(!session.has_role(Role::Admin));
}

#[test]
fn has_role_is_case_sensitive() {
    let (_, session) = store();
    session.set_user(&UserProfile { role: "Student".to_owned(), ..student() });

    assert!(!session.has_role(Role::Student));
    assert_eq!(session.user().unwrap().role(), None);
}

#[test]
fn has_role_without_user_is_false() {
    let (_, session) = store();
    assert!(!session.has_role(Role::Student));
}

#[test]
fn malformed_user_json_reads_as_absent() {
    let (storage, session) = store();
    storage.set(USER_KEY, "{\"id\": \"seven\"");
    assert_eq!(session.user(), None);
    assert!(!session.has_role(Role::Student));

    storage.set(USER_KEY, "null");
    assert_eq!(session.user(), None);
}

#[test]
fn user_accepts_backend_shape_with_extra_fields() {
    let (storage, session) = store();
    storage.set(
        USER_KEY,
        r#"{"id":3,"email":"c@k.test","full_name":"Chef","role":"cook","created_at":"2024-01-01T00:00:00","is_active":true,"extra":1}"#,
    );

    let user = session.user().unwrap();
    assert_eq!(user.full_name, "Chef");
    assert_eq!(user.role(), Some(Role::Cook));
}

#[test]
fn save_login_then_clear_leaves_empty_session() {
    let (_, session) = store();
    session.save_login("acc", "ref", &student());

    let snap = session.snapshot();
    assert_eq!(snap.access_token.as_deref(), Some("acc"));
    assert_eq!(snap.refresh_token.as_deref(), Some("ref"));
    assert_eq!(snap.user, Some(student()));

    session.clear();
    assert!(session.snapshot().is_empty());
}

#[test]
fn clones_share_backend() {
    let (_, session) = store();
    let other = session.clone();
    other.set_access_token("shared");
    assert_eq!(session.access_token().as_deref(), Some("shared"));
}
