//! Admin dashboard: user listing and admin role management.
//!
//! # Invariants
//! - Only a caller holding the admin role may load or change anything.
//! - Every successful change is followed by a reload of the user list.

use crate::model::account::{Role, UserId, UserSummary};
use crate::repo::account_repo::AccountStore;
use crate::repo::backend_types::{
    BackendError, BackendResult, BackendStage, Table, CODE_FORBIDDEN,
};
use crate::service::notice::Notice;
use log::{error, info, warn};
use std::collections::BTreeSet;

pub const MSG_ACCESS_DENIED: &str = "Accès refusé : vous n'êtes pas administrateur";
pub const MSG_LOAD_FAILED: &str = "Erreur lors du chargement des utilisateurs";
pub const MSG_ADMIN_REVOKED: &str = "Rôle admin retiré";
pub const MSG_ADMIN_REVOKE_FAILED: &str = "Erreur lors de la suppression du rôle admin";
pub const MSG_ADMIN_GRANTED: &str = "Rôle admin ajouté";
pub const MSG_ADMIN_GRANT_FAILED: &str = "Erreur lors de l'ajout du rôle admin";
pub const MSG_USER_DELETED: &str = "Profil utilisateur supprimé";
pub const MSG_USER_DELETE_FAILED: &str = "Erreur lors de la suppression de l'utilisateur";

/// Whether `user_id` holds the admin role.
pub fn is_admin<A: AccountStore + ?Sized>(accounts: &A, user_id: UserId) -> BackendResult<bool> {
    Ok(accounts
        .list_roles()?
        .iter()
        .any(|assignment| assignment.user_id == user_id && assignment.role == Role::Admin))
}

pub struct AdminDashboard<'a, A: AccountStore + ?Sized> {
    accounts: &'a A,
    users: Vec<UserSummary>,
    notices: Vec<Notice>,
}

impl<'a, A: AccountStore + ?Sized> AdminDashboard<'a, A> {
    /// Opens the dashboard for `viewer`; non-admins are turned away.
    pub fn open(accounts: &'a A, viewer: UserId) -> BackendResult<Self> {
        if !is_admin(accounts, viewer)? {
            warn!("event=admin_open module=service status=denied user_id={viewer}");
            return Err(BackendError::new(
                Table::UserRoles,
                BackendStage::Select,
                CODE_FORBIDDEN,
                MSG_ACCESS_DENIED,
                false,
            ));
        }
        let mut dashboard = Self {
            accounts,
            users: Vec::new(),
            notices: Vec::new(),
        };
        dashboard.refresh();
        Ok(dashboard)
    }

    /// Reloads profiles merged with their admin flag, newest first.
    pub fn refresh(&mut self) {
        let profiles = match self.accounts.list_profiles() {
            Ok(profiles) => profiles,
            Err(err) => {
                error!(
                    "event=admin_users_load module=service status=error error_code={}",
                    err.code
                );
                self.notices.push(Notice::error(MSG_LOAD_FAILED));
                return;
            }
        };
        // A failed role fetch shows everyone as non-admin.
        let admins: BTreeSet<UserId> = self
            .accounts
            .list_roles()
            .unwrap_or_default()
            .into_iter()
            .filter(|assignment| assignment.role == Role::Admin)
            .map(|assignment| assignment.user_id)
            .collect();

        self.users = profiles
            .into_iter()
            .map(|profile| UserSummary {
                is_admin: admins.contains(&profile.user_id),
                profile,
            })
            .collect();
        info!(
            "event=admin_users_load module=service status=ok count={}",
            self.users.len()
        );
    }

    pub fn users(&self) -> &[UserSummary] {
        &self.users
    }

    pub fn admin_count(&self) -> usize {
        self.users.iter().filter(|user| user.is_admin).count()
    }

    pub fn member_count(&self) -> usize {
        self.users.len() - self.admin_count()
    }

    /// Grants or revokes the admin role depending on `currently_admin`.
    pub fn toggle_admin(&mut self, user_id: UserId, currently_admin: bool) -> BackendResult<()> {
        let (result, ok_message, failed_message) = if currently_admin {
            (
                self.accounts.revoke_role(user_id, Role::Admin),
                MSG_ADMIN_REVOKED,
                MSG_ADMIN_REVOKE_FAILED,
            )
        } else {
            (
                self.accounts.grant_role(user_id, Role::Admin),
                MSG_ADMIN_GRANTED,
                MSG_ADMIN_GRANT_FAILED,
            )
        };
        self.finish("admin_toggle", result, ok_message, failed_message)
    }

    /// Deletes a user's profile (the auth identity itself is kept).
    pub fn delete_user(&mut self, user_id: UserId) -> BackendResult<()> {
        let result = self.accounts.delete_profile(user_id);
        self.finish("admin_user_delete", result, MSG_USER_DELETED, MSG_USER_DELETE_FAILED)
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn finish(
        &mut self,
        event: &str,
        result: BackendResult<()>,
        ok_message: &str,
        failed_message: &str,
    ) -> BackendResult<()> {
        match result {
            Ok(()) => {
                info!("event={event} module=service status=ok");
                self.notices.push(Notice::success(ok_message));
                self.refresh();
                Ok(())
            }
            Err(err) => {
                error!(
                    "event={event} module=service status=error error_code={}",
                    err.code
                );
                self.notices.push(Notice::error(failed_message));
                Err(err)
            }
        }
    }
}
