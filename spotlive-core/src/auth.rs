//! Sign-up, sign-in and sign-out.
//!
//! These only talk to the auth gateway. Updating the shared `Session` and
//! triggering a refresh is left to `App`.

use validator::Validate;

use crate::error::{GatewayError, ValidationError, WorkflowError, WorkflowResult};
use crate::gateway::{AuthGateway, AuthUser, SignUpRequest};

/// Shown when the auth service could not be reached at all.
pub const AUTH_FAILED: &str = "An error occurred. Please try again.";

/// User-facing text for a failed auth workflow. Messages from the auth
/// service are passed through as they are.
pub fn notice(err: &WorkflowError) -> String {
    match err {
        WorkflowError::Gateway(GatewayError::Auth(message))
        | WorkflowError::Gateway(GatewayError::Api { message, .. }) => message.clone(),
        WorkflowError::Gateway(_) => AUTH_FAILED.to_string(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, Default, Validate)]
pub struct SignUpForm {
    pub name: String,
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
    #[validate(must_match(other = "password"))]
    pub confirm_password: String,
}

impl SignUpForm {
    /// Local checks: the confirmation must match, then the password must be
    /// long enough.
    pub fn check(&self) -> Result<(), ValidationError> {
        let Err(errors) = self.validate() else {
            return Ok(());
        };
        let invalid = errors.field_errors();

        if invalid.contains_key("confirm_password") {
            return Err(ValidationError::PasswordMismatch);
        }
        if invalid.contains_key("password") {
            return Err(ValidationError::PasswordTooShort);
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        *self = SignUpForm::default();
    }

    /// Register the account. The form is cleared once the service accepts
    /// it. Returns the new user when the service signed them in right away.
    pub async fn submit<A>(&mut self, auth: &A) -> WorkflowResult<Option<AuthUser>>
    where
        A: AuthGateway + ?Sized,
    {
        self.check()?;

        let request = SignUpRequest {
            email: self.email.clone(),
            password: self.password.clone(),
            display_name: self.name.clone(),
        };

        match auth.sign_up(&request).await {
            Ok(user) => {
                tracing::info!(email = %request.email, confirmed = user.is_some(), "Signed up");
                self.clear();
                Ok(user)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Sign-up failed");
                Err(e.into())
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

impl SignInForm {
    /// Credentials are checked by the auth service only.
    pub async fn submit<A>(&mut self, auth: &A) -> WorkflowResult<AuthUser>
    where
        A: AuthGateway + ?Sized,
    {
        match auth.sign_in(&self.email, &self.password).await {
            Ok(user) => {
                tracing::info!(user = %user.id, "Signed in");
                self.password.clear();
                Ok(user)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Sign-in failed");
                Err(e.into())
            }
        }
    }
}

/// End the gateway session.
pub async fn sign_out<A>(auth: &A) -> WorkflowResult<()>
where
    A: AuthGateway + ?Sized,
{
    auth.sign_out().await?;
    tracing::info!("Signed out");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::test::{Call, Op, TestGateway};

    fn sign_up_form(password: &str, confirm: &str) -> SignUpForm {
        SignUpForm {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password: password.into(),
            confirm_password: confirm.into(),
        }
    }

    #[tokio::test]
    async fn mismatch_is_reported_before_length_without_network() {
        let gateway = TestGateway::new();

        let mut form = sign_up_form("abc", "abd");
        let err = form.submit(&gateway).await.unwrap_err();
        assert_eq!(notice(&err), "Passwords do not match");

        let mut form = sign_up_form("abc", "abc");
        let err = form.submit(&gateway).await.unwrap_err();
        assert_eq!(notice(&err), "Password must be at least 6 characters");

        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn successful_sign_up_clears_form() {
        let gateway = TestGateway::new();
        let mut form = sign_up_form("secret1", "secret1");

        let user = form.submit(&gateway).await.unwrap();

        assert!(user.is_some());
        assert_eq!(gateway.calls(), vec![Call::SignUp("ada@example.com".into())]);
        assert!(form.email.is_empty());
        assert!(form.password.is_empty());
    }

    #[tokio::test]
    async fn auth_service_message_is_shown_verbatim() {
        let gateway = TestGateway::new().with_account("ada@example.com", "secret1", "u1");
        let mut form = sign_up_form("secret1", "secret1");

        let err = form.submit(&gateway).await.unwrap_err();

        assert_eq!(notice(&err), "User already registered");
        // Kept so the user can correct it
        assert_eq!(form.email, "ada@example.com");
    }

    #[tokio::test]
    async fn unreachable_service_gets_generic_notice() {
        let err = WorkflowError::Gateway(GatewayError::Transport("connection refused".into()));
        assert_eq!(notice(&err), AUTH_FAILED);

        let gateway = TestGateway::new().failing(Op::SignIn);
        let mut form = SignInForm {
            email: "ada@example.com".into(),
            password: "secret1".into(),
        };
        // Injected failures are 500s with a body message
        let err = form.submit(&gateway).await.unwrap_err();
        assert_eq!(notice(&err), "SignIn failed");
    }

    #[tokio::test]
    async fn sign_in_with_wrong_password() {
        let gateway = TestGateway::new().with_account("ada@example.com", "secret1", "u1");
        let mut form = SignInForm {
            email: "ada@example.com".into(),
            password: "nope".into(),
        };

        let err = form.submit(&gateway).await.unwrap_err();
        assert_eq!(notice(&err), "Invalid login credentials");

        form.password = "secret1".into();
        let user = form.submit(&gateway).await.unwrap();
        assert_eq!(user.id.as_str(), "u1");
    }

    #[tokio::test]
    async fn sign_out_ends_gateway_session() {
        let gateway = TestGateway::new().signed_in_as("u1");
        sign_out(&gateway).await.unwrap();

        assert_eq!(gateway.calls(), vec![Call::SignOut]);
        assert_eq!(gateway.current_user().await.unwrap(), None);
    }
}
