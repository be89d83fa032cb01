//! The centralized session identity.
//!
//! `App` owns one `Session`: resolved once at startup, set on sign-in and
//! sign-up, cleared on sign-out. Workflows receive it by reference instead
//! of asking the gateway on their own.

use crate::event::{Event, UserId};
use crate::gateway::{AuthGateway, AuthUser};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user: Option<AuthUser>,
}

impl Session {
    pub fn anonymous() -> Self {
        Session { user: None }
    }

    pub fn signed_in(user: AuthUser) -> Self {
        Session { user: Some(user) }
    }

    /// Ask the gateway who is signed in. A failed lookup is treated as
    /// signed out.
    pub async fn resolve<A>(auth: &A) -> Self
    where
        A: AuthGateway + ?Sized,
    {
        match auth.current_user().await {
            Ok(user) => Session { user },
            Err(e) => {
                tracing::warn!(error = %e, "Could not resolve current user");
                Session::anonymous()
            }
        }
    }

    pub fn identity(&self) -> Option<&UserId> {
        self.user.as_ref().map(|u| &u.id)
    }

    pub fn user(&self) -> Option<&AuthUser> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn owns(&self, event: &Event) -> bool {
        event.is_owned_by(self.identity())
    }

    pub(crate) fn set(&mut self, user: AuthUser) {
        self.user = Some(user);
    }

    pub(crate) fn clear(&mut self) {
        self.user = None;
    }
}
