//! Notification store contract and SQLite implementation.
//!
//! # Invariants
//! - Lists are newest first (`created_at DESC`, ties by latest insertion).
//! - New rows start unread.

use crate::model::account::UserId;
use crate::model::notification::{
    NewNotification, Notification, NotificationId, NotificationKind,
};
use crate::repo::backend_types::{
    BackendError, BackendResult, BackendStage, StorageContext, Table,
};
use crate::repo::sqlite_backend::{parse_flag, parse_uuid, SqliteBackend};
use crate::sync::change_feed::{ChangeKind, ChangeRow};
use log::info;
use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

const NOTIFICATION_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    title,
    message,
    type,
    read,
    created_at
FROM notifications";

/// Remote notification rows.
pub trait NotificationStore {
    fn list_notifications(&self, user_id: UserId, limit: u32) -> BackendResult<Vec<Notification>>;
    fn insert_notification(&self, notification: &NewNotification) -> BackendResult<Notification>;
    fn mark_notification_read(&self, id: NotificationId) -> BackendResult<()>;
    /// Marks every unread row of `user_id` read; returns how many changed.
    fn mark_all_notifications_read(&self, user_id: UserId) -> BackendResult<usize>;
    fn delete_notification(&self, id: NotificationId) -> BackendResult<()>;
}

impl NotificationStore for SqliteBackend<'_> {
    fn list_notifications(&self, user_id: UserId, limit: u32) -> BackendResult<Vec<Notification>> {
        select_notifications(
            self,
            &format!(
                "{NOTIFICATION_SELECT_SQL}
                 WHERE user_id = ?1
                 ORDER BY created_at DESC, rowid DESC
                 LIMIT ?2;"
            ),
            params![user_id.to_string(), i64::from(limit)],
            BackendStage::Select,
        )
    }

    fn insert_notification(&self, notification: &NewNotification) -> BackendResult<Notification> {
        let row = Notification {
            id: Uuid::new_v4(),
            user_id: notification.user_id,
            title: notification.title.clone(),
            message: notification.message.clone(),
            kind: notification.kind,
            read: false,
            created_at_ms: self.now_ms(),
        };
        self.conn()
            .execute(
                "INSERT INTO notifications (id, user_id, title, message, type, read, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6);",
                params![
                    row.id.to_string(),
                    row.user_id.to_string(),
                    row.title.as_str(),
                    row.message.as_str(),
                    row.kind.as_str(),
                    row.created_at_ms,
                ],
            )
            .at(Table::Notifications, BackendStage::Insert)?;

        info!(
            "event=notification_insert module=repo status=ok notification_id={} kind={}",
            row.id,
            row.kind.as_str()
        );
        self.publish(ChangeKind::Insert, ChangeRow::Notification(row.clone()));
        Ok(row)
    }

    fn mark_notification_read(&self, id: NotificationId) -> BackendResult<()> {
        let changed = self
            .conn()
            .execute(
                "UPDATE notifications SET read = 1 WHERE id = ?1;",
                [id.to_string()],
            )
            .at(Table::Notifications, BackendStage::Update)?;
        if changed == 0 {
            return Err(BackendError::not_found(
                Table::Notifications,
                BackendStage::Update,
                id,
            ));
        }

        let row = get_notification(self, id, BackendStage::Update)?;
        self.publish(ChangeKind::Update, ChangeRow::Notification(row));
        Ok(())
    }

    fn mark_all_notifications_read(&self, user_id: UserId) -> BackendResult<usize> {
        let unread = select_notifications(
            self,
            &format!(
                "{NOTIFICATION_SELECT_SQL}
                 WHERE user_id = ?1 AND read = 0
                 ORDER BY created_at DESC, rowid DESC;"
            ),
            params![user_id.to_string()],
            BackendStage::Update,
        )?;
        self.conn()
            .execute(
                "UPDATE notifications SET read = 1 WHERE user_id = ?1 AND read = 0;",
                [user_id.to_string()],
            )
            .at(Table::Notifications, BackendStage::Update)?;

        let changed = unread.len();
        for mut row in unread {
            row.read = true;
            self.publish(ChangeKind::Update, ChangeRow::Notification(row));
        }
        info!("event=notifications_mark_all module=repo status=ok changed={changed}");
        Ok(changed)
    }

    fn delete_notification(&self, id: NotificationId) -> BackendResult<()> {
        let row = get_notification(self, id, BackendStage::Delete)?;
        self.conn()
            .execute("DELETE FROM notifications WHERE id = ?1;", [id.to_string()])
            .at(Table::Notifications, BackendStage::Delete)?;
        self.publish(ChangeKind::Delete, ChangeRow::Notification(row));
        Ok(())
    }
}

fn select_notifications(
    backend: &SqliteBackend<'_>,
    sql: &str,
    params: &[&dyn rusqlite::ToSql],
    stage: BackendStage,
) -> BackendResult<Vec<Notification>> {
    let mut stmt = backend
        .conn()
        .prepare(sql)
        .at(Table::Notifications, stage)?;
    let mut rows = stmt.query(params).at(Table::Notifications, stage)?;

    let mut notifications = Vec::new();
    while let Some(row) = rows.next().at(Table::Notifications, stage)? {
        notifications.push(parse_notification_row(row)?);
    }
    Ok(notifications)
}

fn get_notification(
    backend: &SqliteBackend<'_>,
    id: NotificationId,
    stage: BackendStage,
) -> BackendResult<Notification> {
    let row = backend
        .conn()
        .query_row(
            &format!("{NOTIFICATION_SELECT_SQL} WHERE id = ?1;"),
            [id.to_string()],
            |row| Ok(parse_notification_row(row)),
        )
        .optional()
        .at(Table::Notifications, stage)?;
    match row {
        Some(notification) => notification,
        None => Err(BackendError::not_found(Table::Notifications, stage, id)),
    }
}

fn parse_notification_row(row: &Row<'_>) -> BackendResult<Notification> {
    let select = |err: rusqlite::Error| {
        BackendError::storage(Table::Notifications, BackendStage::Select, err)
    };

    let id_text: String = row.get("id").map_err(select)?;
    let user_text: String = row.get("user_id").map_err(select)?;
    let kind_text: String = row.get("type").map_err(select)?;
    let read: i64 = row.get("read").map_err(select)?;

    Ok(Notification {
        id: parse_uuid(Table::Notifications, "id", &id_text)?,
        user_id: parse_uuid(Table::Notifications, "user_id", &user_text)?,
        title: row.get("title").map_err(select)?,
        message: row.get("message").map_err(select)?,
        kind: NotificationKind::parse_lenient(&kind_text),
        read: parse_flag(Table::Notifications, "read", read)?,
        created_at_ms: row.get("created_at").map_err(select)?,
    })
}
