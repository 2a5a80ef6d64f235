//! Sign-in form and the app shell header it feeds.

use thiserror::Error;

use campus_auth::{Role, Route, Session, StoreError};

use crate::api::{ApiError, Authenticator, LoginRequest};

pub const LOGIN_OK: &str = "Login successful";
pub const LOGIN_FAILED: &str = "Login failed check your email or password.";

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("login rejected: {0}")]
    Rejected(#[from] ApiError),
    #[error("could not persist credential: {0}")]
    Store(#[from] StoreError),
}

/// Email/password form with a single status line.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    message: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            message: String::new(),
        }
    }

    /// Status line of the last submission; empty before the first.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Exchange the credentials for a token and store it.
    ///
    /// Every failure yields the same message; the store is left untouched
    /// unless the server accepted the login.
    pub async fn submit<A>(&mut self, auth: &A, session: &Session) -> Result<(), LoginError>
    where
        A: Authenticator + ?Sized,
    {
        self.message.clear();
        let request = LoginRequest {
            email: self.email.clone(),
            password: self.password.clone(),
        };

        let outcome = match auth.login(&request).await {
            Ok(token) => session.login(&token).map_err(LoginError::from),
            Err(err) => Err(err.into()),
        };

        match &outcome {
            Ok(()) => self.message = LOGIN_OK.to_string(),
            Err(err) => {
                tracing::warn!(email = %self.email, "login failed: {err}");
                self.message = LOGIN_FAILED.to_string();
            }
        }
        outcome
    }
}

/// Header state of the app shell, derived from the session on demand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShellState {
    pub is_logged_in: bool,
    pub user_name: Option<String>,
    pub user_role: Option<Role>,
}

impl ShellState {
    pub fn from_session(session: &Session) -> Self {
        if session.credential().is_none() {
            return Self::default();
        }
        Self {
            is_logged_in: true,
            user_name: session.display_name(),
            user_role: session.role(),
        }
    }

    /// Clear the credential and reset the header.
    pub fn logout(&mut self, session: &Session) -> Result<(), StoreError> {
        session.logout()?;
        *self = Self::default();
        Ok(())
    }

    /// Dashboard matching the signed-in role.
    pub fn home(&self) -> Option<Route> {
        match self.user_role? {
            Role::Student => Some(Route::StudentDashboard),
            Role::Teacher => Some(Route::TeacherDashboard),
            Role::Admin => Some(Route::AdminDashboard),
        }
    }
}
