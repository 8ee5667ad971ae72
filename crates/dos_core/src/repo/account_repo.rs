//! Authentication and account administration contracts.
//!
//! # Responsibility
//! - `AuthBackend`: email/password sign-up, sign-in, sign-out.
//! - `AccountStore`: profile listing and role management for admins.
//!
//! # Invariants
//! - Emails are compared trimmed and lowercased.
//! - Passwords are stored as argon2 PHC strings only.
//! - Every new account gets a `user` role row.

use crate::model::account::{Profile, Role, RoleAssignment, Session, UserId};
use crate::repo::backend_types::{
    BackendError, BackendResult, BackendStage, StorageContext, Table, CODE_CONFLICT,
    CODE_INVALID_CREDENTIALS, CODE_INVALID_INPUT,
};
use crate::repo::sqlite_backend::{parse_uuid, SqliteBackend};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use log::{info, warn};
use rusqlite::{params, OptionalExtension};
use uuid::Uuid;

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_CHARS: usize = 6;

/// Authentication service.
pub trait AuthBackend {
    fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> BackendResult<Session>;
    fn sign_in(&self, email: &str, password: &str) -> BackendResult<Session>;
    fn sign_out(&self, session: &Session) -> BackendResult<()>;
}

/// Profile and role administration.
pub trait AccountStore {
    /// All profiles, newest first.
    fn list_profiles(&self) -> BackendResult<Vec<Profile>>;
    fn list_roles(&self) -> BackendResult<Vec<RoleAssignment>>;
    fn grant_role(&self, user_id: UserId, role: Role) -> BackendResult<()>;
    fn revoke_role(&self, user_id: UserId, role: Role) -> BackendResult<()>;
    /// Removes the profile row; credentials and roles cascade.
    fn delete_profile(&self, user_id: UserId) -> BackendResult<()>;
}

impl AuthBackend for SqliteBackend<'_> {
    fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> BackendResult<Session> {
        let email = normalize_email(email);
        if email.is_empty() || !email.contains('@') {
            return Err(auth_error(CODE_INVALID_INPUT, "email is required"));
        }
        if password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(auth_error(
                CODE_INVALID_INPUT,
                format!("password must contain at least {MIN_PASSWORD_CHARS} characters"),
            ));
        }

        let existing: Option<String> = self
            .conn()
            .query_row(
                "SELECT user_id FROM credentials WHERE email = ?1;",
                [email.as_str()],
                |row| row.get(0),
            )
            .optional()
            .at(Table::Credentials, BackendStage::Auth)?;
        if existing.is_some() {
            warn!("event=auth_sign_up module=repo status=error error_code={CODE_CONFLICT}");
            return Err(auth_error(CODE_CONFLICT, "email already registered"));
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| BackendError::storage(Table::Credentials, BackendStage::Auth, err))?
            .to_string();

        let user_id = Uuid::new_v4();
        let now_ms = self.now_ms();
        let full_name = full_name
            .map(str::trim)
            .filter(|value| !value.is_empty());

        let tx = self
            .conn()
            .unchecked_transaction()
            .at(Table::Profiles, BackendStage::Auth)?;
        tx.execute(
            "INSERT INTO profiles (user_id, email, full_name, created_at) VALUES (?1, ?2, ?3, ?4);",
            params![user_id.to_string(), email.as_str(), full_name, now_ms],
        )
        .at(Table::Profiles, BackendStage::Auth)?;
        tx.execute(
            "INSERT INTO credentials (user_id, email, password_hash) VALUES (?1, ?2, ?3);",
            params![user_id.to_string(), email.as_str(), password_hash],
        )
        .at(Table::Credentials, BackendStage::Auth)?;
        tx.execute(
            "INSERT INTO user_roles (user_id, role) VALUES (?1, ?2);",
            params![user_id.to_string(), Role::User.as_str()],
        )
        .at(Table::UserRoles, BackendStage::Auth)?;
        tx.commit().at(Table::Profiles, BackendStage::Auth)?;

        info!("event=auth_sign_up module=repo status=ok user_id={user_id}");
        Ok(Session {
            user_id,
            email,
            issued_at_ms: now_ms,
        })
    }

    fn sign_in(&self, email: &str, password: &str) -> BackendResult<Session> {
        let email = normalize_email(email);
        let stored: Option<(String, String)> = self
            .conn()
            .query_row(
                "SELECT user_id, password_hash FROM credentials WHERE email = ?1;",
                [email.as_str()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .at(Table::Credentials, BackendStage::Auth)?;

        let Some((user_text, password_hash)) = stored else {
            warn!("event=auth_sign_in module=repo status=error error_code={CODE_INVALID_CREDENTIALS}");
            return Err(invalid_credentials());
        };
        let parsed_hash = PasswordHash::new(&password_hash).map_err(|err| {
            BackendError::invalid_data(
                Table::Credentials,
                format!("invalid hash in credentials.password_hash: {err}"),
            )
        })?;
        if Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_err()
        {
            warn!("event=auth_sign_in module=repo status=error error_code={CODE_INVALID_CREDENTIALS}");
            return Err(invalid_credentials());
        }

        let user_id = parse_uuid(Table::Credentials, "user_id", &user_text)?;
        info!("event=auth_sign_in module=repo status=ok user_id={user_id}");
        Ok(Session {
            user_id,
            email,
            issued_at_ms: self.now_ms(),
        })
    }

    fn sign_out(&self, session: &Session) -> BackendResult<()> {
        info!(
            "event=auth_sign_out module=repo status=ok user_id={}",
            session.user_id
        );
        Ok(())
    }
}

impl AccountStore for SqliteBackend<'_> {
    fn list_profiles(&self) -> BackendResult<Vec<Profile>> {
        let mut stmt = self
            .conn()
            .prepare(
                "SELECT user_id, email, full_name, created_at
                 FROM profiles
                 ORDER BY created_at DESC, rowid DESC;",
            )
            .at(Table::Profiles, BackendStage::Select)?;
        let mut rows = stmt.query([]).at(Table::Profiles, BackendStage::Select)?;

        let mut profiles = Vec::new();
        while let Some(row) = rows.next().at(Table::Profiles, BackendStage::Select)? {
            let user_text: String = row.get(0).at(Table::Profiles, BackendStage::Select)?;
            profiles.push(Profile {
                user_id: parse_uuid(Table::Profiles, "user_id", &user_text)?,
                email: row.get(1).at(Table::Profiles, BackendStage::Select)?,
                full_name: row.get(2).at(Table::Profiles, BackendStage::Select)?,
                created_at_ms: row.get(3).at(Table::Profiles, BackendStage::Select)?,
            });
        }
        Ok(profiles)
    }

    fn list_roles(&self) -> BackendResult<Vec<RoleAssignment>> {
        let mut stmt = self
            .conn()
            .prepare("SELECT user_id, role FROM user_roles ORDER BY rowid ASC;")
            .at(Table::UserRoles, BackendStage::Select)?;
        let mut rows = stmt.query([]).at(Table::UserRoles, BackendStage::Select)?;

        let mut roles = Vec::new();
        while let Some(row) = rows.next().at(Table::UserRoles, BackendStage::Select)? {
            let user_text: String = row.get(0).at(Table::UserRoles, BackendStage::Select)?;
            let role_text: String = row.get(1).at(Table::UserRoles, BackendStage::Select)?;
            let role = Role::parse(&role_text).ok_or_else(|| {
                BackendError::invalid_data(
                    Table::UserRoles,
                    format!("invalid role `{role_text}` in user_roles.role"),
                )
            })?;
            roles.push(RoleAssignment {
                user_id: parse_uuid(Table::UserRoles, "user_id", &user_text)?,
                role,
            });
        }
        Ok(roles)
    }

    fn grant_role(&self, user_id: UserId, role: Role) -> BackendResult<()> {
        let result = self.conn().execute(
            "INSERT INTO user_roles (user_id, role) VALUES (?1, ?2);",
            params![user_id.to_string(), role.as_str()],
        );
        match result {
            Ok(_) => {
                info!(
                    "event=role_grant module=repo status=ok user_id={} role={}",
                    user_id,
                    role.as_str()
                );
                Ok(())
            }
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(BackendError::new(
                    Table::UserRoles,
                    BackendStage::Insert,
                    CODE_CONFLICT,
                    format!("role `{}` rejected for user {user_id}", role.as_str()),
                    false,
                ))
            }
            Err(err) => Err(BackendError::storage(
                Table::UserRoles,
                BackendStage::Insert,
                err,
            )),
        }
    }

    fn revoke_role(&self, user_id: UserId, role: Role) -> BackendResult<()> {
        let changed = self
            .conn()
            .execute(
                "DELETE FROM user_roles WHERE user_id = ?1 AND role = ?2;",
                params![user_id.to_string(), role.as_str()],
            )
            .at(Table::UserRoles, BackendStage::Delete)?;
        if changed == 0 {
            return Err(BackendError::not_found(
                Table::UserRoles,
                BackendStage::Delete,
                user_id,
            ));
        }
        info!(
            "event=role_revoke module=repo status=ok user_id={} role={}",
            user_id,
            role.as_str()
        );
        Ok(())
    }

    fn delete_profile(&self, user_id: UserId) -> BackendResult<()> {
        let changed = self
            .conn()
            .execute(
                "DELETE FROM profiles WHERE user_id = ?1;",
                [user_id.to_string()],
            )
            .at(Table::Profiles, BackendStage::Delete)?;
        if changed == 0 {
            return Err(BackendError::not_found(
                Table::Profiles,
                BackendStage::Delete,
                user_id,
            ));
        }
        info!("event=profile_delete module=repo status=ok user_id={user_id}");
        Ok(())
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn auth_error(code: &'static str, message: impl Into<String>) -> BackendError {
    BackendError::new(Table::Credentials, BackendStage::Auth, code, message, false)
}

fn invalid_credentials() -> BackendError {
    auth_error(CODE_INVALID_CREDENTIALS, "invalid email or password")
}

#[cfg(test)]
mod tests {
    use super::normalize_email;

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email("  Alice@Example.FR "), "alice@example.fr");
    }
}
