//! Account, session and role records.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier issued by the auth service.
pub type UserId = Uuid;

/// Authenticated session handed out by sign-in/sign-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: UserId,
    pub email: String,
    pub issued_at_ms: i64,
}

/// Public profile row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: UserId,
    pub email: String,
    pub full_name: Option<String>,
    pub created_at_ms: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Self::Admin),
            "user" => Some(Self::User),
            _ => None,
        }
    }
}

/// One `user_roles` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleAssignment {
    pub user_id: UserId,
    pub role: Role,
}

/// Profile merged with its admin flag for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub profile: Profile,
    pub is_admin: bool,
}
