use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::client::{ApiFuture, RestClient};
use crate::targets;
use crate::{AuthError, Registration, Role, Session};

pub const REGISTER_PATH: &str = "/api/auth/register";
pub const MIN_PASSWORD_LEN: usize = 6;

pub type AuthFuture<'a> = Pin<Box<dyn Future<Output = Result<Session, AuthError>> + Send + 'a>>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Turns credentials into a session. The UI only sees this capability.
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, credentials: Credentials) -> AuthFuture<'_>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoUser {
    pub username: String,
    pub password: String,
    pub role: Role,
}

impl DemoUser {
    pub fn new(username: &str, password: &str, role: Role) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            role,
        }
    }

    pub fn defaults() -> Vec<DemoUser> {
        vec![
            DemoUser::new("admin", "admin123", Role::Admin),
            DemoUser::new("manager", "manager123", Role::Manager),
        ]
    }
}

/// Checks credentials against a configured list of demo accounts.
#[derive(Debug, Clone)]
pub struct DemoAuthenticator {
    users: Vec<DemoUser>,
}

impl DemoAuthenticator {
    pub fn new(users: Vec<DemoUser>) -> Self {
        Self { users }
    }

    fn check(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        let username = credentials.username.trim();
        let matched = self
            .users
            .iter()
            .find(|user| user.username == username && user.password == credentials.password);

        match matched {
            Some(user) => Ok(Session {
                username: user.username.clone(),
                email: None,
                role: user.role.clone(),
            }),
            None => Err(AuthError::InvalidCredentials { hint: self.hint() }),
        }
    }

    fn hint(&self) -> Option<String> {
        if self.users.is_empty() {
            return None;
        }
        let names: Vec<&str> = self.users.iter().map(|user| user.username.as_str()).collect();
        Some(format!("Demo accounts: {}.", names.join(", ")))
    }
}

impl Authenticator for DemoAuthenticator {
    fn authenticate(&self, credentials: Credentials) -> AuthFuture<'_> {
        let outcome = self.check(&credentials);
        match &outcome {
            Ok(session) => info!(
                target: targets::AUTH,
                username = %session.username,
                role = %session.role,
                "Signed in"
            ),
            Err(_) => warn!(
                target: targets::AUTH,
                username = %credentials.username.trim(),
                "Sign-in rejected"
            ),
        }
        Box::pin(async move { outcome })
    }
}

/// Creates accounts on the backend.
pub trait Registrar: Send + Sync {
    fn register(&self, registration: Registration) -> ApiFuture<'_, Session>;
}

impl Registrar for RestClient {
    fn register(&self, registration: Registration) -> ApiFuture<'_, Session> {
        Box::pin(async move {
            self.send_json(Method::POST, REGISTER_PATH, &registration)
                .await
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub role: Role,
}

impl SignupForm {
    pub fn validate(&self) -> Result<Registration, AuthError> {
        let username = self.username.trim();
        let email = self.email.trim();
        if username.is_empty() || email.is_empty() || self.password.is_empty() {
            return Err(AuthError::Validation(
                "Username, email and password are required.".to_string(),
            ));
        }
        if self.password != self.confirm_password {
            return Err(AuthError::Validation("Passwords do not match".to_string()));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::Validation(
                "Password must be at least 6 characters".to_string(),
            ));
        }

        Ok(Registration {
            username: username.to_string(),
            email: email.to_string(),
            password: self.password.clone(),
            role: self.role.clone(),
        })
    }
}

/// Validates locally, registers, and hands back the session to log in with.
pub async fn sign_up(
    registrar: Arc<dyn Registrar>,
    form: SignupForm,
) -> Result<Session, AuthError> {
    let registration = form.validate()?;
    let username = registration.username.clone();

    match registrar.register(registration).await {
        Ok(session) => {
            info!(target: targets::AUTH, username = %session.username, "Account registered");
            Ok(session)
        }
        Err(error) => {
            warn!(
                target: targets::AUTH,
                username = %username,
                "Registration failed: {}",
                error.technical_detail()
            );
            Err(AuthError::Registration(error))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ApiError;

    fn run_future<T>(future: impl Future<Output = T>) -> T {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("tokio runtime");
        runtime.block_on(future)
    }

    struct FixedRegistrar(Result<Session, ApiError>);

    impl Registrar for FixedRegistrar {
        fn register(&self, _registration: Registration) -> ApiFuture<'_, Session> {
            let answer = self.0.clone();
            Box::pin(async move { answer })
        }
    }

    fn credentials(username: &str, password: &str) -> Credentials {
        Credentials {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    fn filled_form() -> SignupForm {
        SignupForm {
            username: "jdoe".to_string(),
            email: "jdoe@example.com".to_string(),
            password: "secret1".to_string(),
            confirm_password: "secret1".to_string(),
            role: Role::Manager,
        }
    }

    #[test]
    fn demo_accounts_sign_in_with_roles() {
        let auth = DemoAuthenticator::new(DemoUser::defaults());

        let admin = run_future(auth.authenticate(credentials("admin", "admin123"))).expect("admin");
        assert_eq!(admin.role, Role::Admin);

        let manager =
            run_future(auth.authenticate(credentials(" manager ", "manager123"))).expect("manager");
        assert_eq!(manager.role, Role::Manager);
    }

    #[test]
    fn wrong_password_is_rejected_with_hint() {
        let auth = DemoAuthenticator::new(DemoUser::defaults());
        let error =
            run_future(auth.authenticate(credentials("admin", "nope"))).expect_err("reject");
        assert_eq!(
            error.user_summary(),
            "Invalid credentials. Demo accounts: admin, manager."
        );
    }

    #[test]
    fn signup_validation_messages() {
        let mut form = filled_form();
        form.confirm_password = "other".to_string();
        assert_eq!(
            form.validate(),
            Err(AuthError::Validation("Passwords do not match".to_string()))
        );

        let mut form = filled_form();
        form.password = "abc".to_string();
        form.confirm_password = "abc".to_string();
        assert_eq!(
            form.validate(),
            Err(AuthError::Validation(
                "Password must be at least 6 characters".to_string()
            ))
        );

        let mut form = filled_form();
        form.email.clear();
        assert!(form.validate().is_err());
    }

    #[test]
    fn signup_form_defaults_to_manager() {
        assert_eq!(SignupForm::default().role, Role::Manager);
    }

    #[test]
    fn sign_up_returns_registered_session() {
        let registrar = FixedRegistrar(Ok(Session {
            username: "jdoe".to_string(),
            email: Some("jdoe@example.com".to_string()),
            role: Role::Manager,
        }));
        let session = run_future(sign_up(Arc::new(registrar), filled_form())).expect("session");
        assert_eq!(session.username, "jdoe");
    }

    #[test]
    fn sign_up_surfaces_server_detail_and_fallback() {
        let taken = FixedRegistrar(Err(ApiError::Validation {
            endpoint: "POST /api/auth/register".to_string(),
            status: 400,
            detail: "Username already registered".to_string(),
        }));
        let error = run_future(sign_up(Arc::new(taken), filled_form())).expect_err("taken");
        assert_eq!(error.user_summary(), "Username already registered");

        let broken = FixedRegistrar(Err(ApiError::UnknownServer {
            endpoint: "POST /api/auth/register".to_string(),
            status: 500,
        }));
        let error = run_future(sign_up(Arc::new(broken), filled_form())).expect_err("broken");
        assert_eq!(error.user_summary(), "Registration failed. Please try again.");
    }
}
