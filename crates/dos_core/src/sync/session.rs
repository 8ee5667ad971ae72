//! Single session provider.
//!
//! # Responsibility
//! - Own the current authenticated session for the process.
//! - Notify subscribers when the session starts or ends.
//!
//! # Invariants
//! - `current_user()` is `Some` iff the last successful auth call was a
//!   sign-in or sign-up.
//! - Subscribers whose receiver was dropped are pruned on the next notify.

use crate::model::account::{Session, UserId};
use crate::repo::account_repo::AuthBackend;
use crate::repo::backend_types::BackendResult;
use log::{error, info};
use std::sync::mpsc::{channel, Receiver, Sender};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionChange {
    SignedIn(Session),
    SignedOut,
}

pub struct SessionProvider<'a, A: AuthBackend + ?Sized> {
    auth: &'a A,
    current: Option<Session>,
    listeners: Vec<Sender<SessionChange>>,
}

impl<'a, A: AuthBackend + ?Sized> SessionProvider<'a, A> {
    pub fn new(auth: &'a A) -> Self {
        Self {
            auth,
            current: None,
            listeners: Vec::new(),
        }
    }

    /// Registers a listener for future session changes.
    pub fn subscribe(&mut self) -> Receiver<SessionChange> {
        let (sender, receiver) = channel();
        self.listeners.push(sender);
        receiver
    }

    pub fn current_session(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn current_user(&self) -> Option<UserId> {
        self.current.as_ref().map(|session| session.user_id)
    }

    pub fn sign_in(&mut self, email: &str, password: &str) -> BackendResult<Session> {
        match self.auth.sign_in(email, password) {
            Ok(session) => {
                self.start(session.clone());
                Ok(session)
            }
            Err(err) => {
                error!(
                    "event=session_sign_in module=sync status=error error_code={}",
                    err.code
                );
                Err(err)
            }
        }
    }

    pub fn sign_up(
        &mut self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> BackendResult<Session> {
        match self.auth.sign_up(email, password, full_name) {
            Ok(session) => {
                self.start(session.clone());
                Ok(session)
            }
            Err(err) => {
                error!(
                    "event=session_sign_up module=sync status=error error_code={}",
                    err.code
                );
                Err(err)
            }
        }
    }

    /// Ends the current session. No-op when signed out.
    pub fn sign_out(&mut self) -> BackendResult<()> {
        let Some(session) = self.current.as_ref() else {
            return Ok(());
        };
        self.auth.sign_out(session)?;
        self.current = None;
        info!("event=session_end module=sync status=ok");
        self.notify(SessionChange::SignedOut);
        Ok(())
    }

    /// Adopts a session restored by the shell (e.g. from secure storage).
    pub fn restore(&mut self, session: Session) {
        self.start(session);
    }

    fn start(&mut self, session: Session) {
        info!(
            "event=session_start module=sync status=ok user_id={}",
            session.user_id
        );
        self.current = Some(session.clone());
        self.notify(SessionChange::SignedIn(session));
    }

    fn notify(&mut self, change: SessionChange) {
        self.listeners
            .retain(|listener| listener.send(change.clone()).is_ok());
    }
}
