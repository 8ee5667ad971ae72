use dos_core::model::notification::NewNotification;
use dos_core::repo::backend_types::{CODE_FORBIDDEN, CODE_NOT_FOUND};
use dos_core::service::admin::{MSG_ADMIN_GRANTED, MSG_ADMIN_REVOKED, MSG_USER_DELETED};
use dos_core::service::notifications::{MSG_ALL_READ, MSG_UPDATE_FAILED};
use dos_core::{
    open_db_in_memory, AccountStore, AdminDashboard, AuthBackend, FixedClock, NotificationCenter,
    NotificationKind, NotificationStore, NoticeLevel, Role, SqliteBackend, UserId,
};
use std::sync::Arc;
use uuid::Uuid;

const START_MS: i64 = 1_700_000_000_000;

#[test]
fn center_lists_newest_first_and_tracks_unread() {
    let conn = open_db_in_memory().unwrap();
    let clock = Arc::new(FixedClock::new(START_MS));
    let backend = SqliteBackend::try_with_clock(&conn, clock.clone()).unwrap();
    let user = Uuid::new_v4();

    for title in ["Bienvenue", "Rappel", "Projet complété !"] {
        backend.insert_notification(&notification(user, title)).unwrap();
        clock.advance(1_000);
    }
    backend
        .insert_notification(&notification(Uuid::new_v4(), "Autre compte"))
        .unwrap();

    let mut center = NotificationCenter::new(&backend, user);
    center.refresh().unwrap();

    let titles: Vec<&str> = center.items().iter().map(|n| n.title.as_str()).collect();
    assert_eq!(titles, vec!["Projet complété !", "Rappel", "Bienvenue"]);
    assert_eq!(center.unread_count(), 3);

    let first = center.items()[0].id;
    center.mark_read(first).unwrap();
    assert_eq!(center.unread_count(), 2);

    center.mark_all_read().unwrap();
    assert_eq!(center.unread_count(), 0);
    center.refresh().unwrap();
    assert!(center.items().iter().all(|n| n.read));

    let notices = center.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].message, MSG_ALL_READ);
}

#[test]
fn center_delete_removes_row_and_failures_keep_the_list() {
    let conn = open_db_in_memory().unwrap();
    let backend = SqliteBackend::try_new(&conn).unwrap();
    let user = Uuid::new_v4();
    backend.insert_notification(&notification(user, "Bienvenue")).unwrap();

    let mut center = NotificationCenter::new(&backend, user);
    center.refresh().unwrap();
    let id = center.items()[0].id;

    let err = center.mark_read(Uuid::new_v4()).unwrap_err();
    assert_eq!(err.code, CODE_NOT_FOUND);
    assert_eq!(center.unread_count(), 1);
    let notices = center.take_notices();
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert_eq!(notices[0].message, MSG_UPDATE_FAILED);

    center.delete(id).unwrap();
    assert!(center.items().is_empty());
    assert!(backend.list_notifications(user, 20).unwrap().is_empty());
}

#[test]
fn non_admin_cannot_open_dashboard() {
    let conn = open_db_in_memory().unwrap();
    let backend = SqliteBackend::try_new(&conn).unwrap();
    let member = sign_up(&backend, "membre@example.fr");

    let err = match AdminDashboard::open(&backend, member) {
        Ok(_) => panic!("member opened the admin dashboard"),
        Err(err) => err,
    };
    assert_eq!(err.code, CODE_FORBIDDEN);
}

#[test]
fn admin_toggles_roles_and_deletes_profiles() {
    let conn = open_db_in_memory().unwrap();
    let clock = Arc::new(FixedClock::new(START_MS));
    let backend = SqliteBackend::try_with_clock(&conn, clock.clone()).unwrap();
    let admin = sign_up(&backend, "admin@example.fr");
    clock.advance(1_000);
    let member = sign_up(&backend, "membre@example.fr");
    backend.grant_role(admin, Role::Admin).unwrap();

    let mut dashboard = AdminDashboard::open(&backend, admin).unwrap();
    assert_eq!(dashboard.users().len(), 2);
    assert_eq!(dashboard.users()[0].profile.user_id, member);
    assert_eq!(dashboard.admin_count(), 1);
    assert_eq!(dashboard.member_count(), 1);

    dashboard.toggle_admin(member, false).unwrap();
    assert_eq!(dashboard.admin_count(), 2);
    dashboard.toggle_admin(member, true).unwrap();
    assert_eq!(dashboard.admin_count(), 1);

    dashboard.delete_user(member).unwrap();
    assert_eq!(dashboard.users().len(), 1);
    assert!(backend
        .list_roles()
        .unwrap()
        .iter()
        .all(|assignment| assignment.user_id == admin));

    let messages: Vec<String> = dashboard
        .take_notices()
        .into_iter()
        .map(|notice| notice.message)
        .collect();
    assert_eq!(
        messages,
        vec![MSG_ADMIN_GRANTED, MSG_ADMIN_REVOKED, MSG_USER_DELETED]
    );
}

fn sign_up(backend: &SqliteBackend<'_>, email: &str) -> UserId {
    backend.sign_up(email, "secret-123", None).unwrap().user_id
}

fn notification(user_id: UserId, title: &str) -> NewNotification {
    NewNotification {
        user_id,
        title: title.to_string(),
        message: format!("{title} - détail"),
        kind: NotificationKind::Info,
    }
}
