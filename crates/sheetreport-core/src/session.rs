//! Authentication state and the login/logout transitions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ValidationError;
use crate::api::ApiError;

/// Reason shown when the server rejects a login without saying why.
pub const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Process-wide authentication flag. Starts unauthenticated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub authenticated: bool,
}

/// Login credentials. The email is trimmed; the password is kept verbatim.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    email: String,
    password: String,
}

impl Credentials {
    /// Validate and build credentials. Empty fields never reach the network.
    pub fn new(email: &str, password: &str) -> Result<Self, ValidationError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(ValidationError::EmptyCredentials);
        }
        Ok(Self {
            email: email.to_string(),
            password: password.to_string(),
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Owns [`SessionState`] and decides how login/logout results change it.
///
/// The cascade reset that follows a logout is the workflow's job; this type
/// only reports whether the session ended.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionController {
    state: SessionState,
    login_in_flight: bool,
    logout_in_flight: bool,
}

impl SessionController {
    pub fn is_authenticated(&self) -> bool {
        self.state.authenticated
    }

    pub fn is_busy(&self) -> bool {
        self.login_in_flight || self.logout_in_flight
    }

    /// Validate input for a login request. An authenticated session has to
    /// log out first.
    pub fn begin_login(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<Credentials, ValidationError> {
        if self.state.authenticated {
            return Err(ValidationError::AlreadyAuthenticated);
        }
        let credentials = Credentials::new(email, password)?;
        self.login_in_flight = true;
        Ok(credentials)
    }

    /// Fold the server's answer to a login. On failure returns the reason to
    /// show; the session stays unauthenticated.
    pub fn finish_login(&mut self, result: Result<(), ApiError>) -> Result<(), String> {
        self.login_in_flight = false;
        match result {
            Ok(()) => {
                self.state.authenticated = true;
                tracing::info!("session authenticated");
                Ok(())
            }
            Err(e) => {
                tracing::info!(error = %e, "login rejected");
                Err(e.reason_or(INVALID_CREDENTIALS))
            }
        }
    }

    /// Logout is only offered to an authenticated session.
    pub fn begin_logout(&mut self) -> Result<(), ValidationError> {
        if !self.state.authenticated {
            return Err(ValidationError::NotAuthenticated);
        }
        self.logout_in_flight = true;
        Ok(())
    }

    /// Fold the server's answer to a logout. On failure the session is left
    /// exactly as it was.
    pub fn finish_logout(&mut self, result: Result<(), ApiError>) -> Result<(), ApiError> {
        self.logout_in_flight = false;
        result?;
        self.state.authenticated = false;
        tracing::info!("session ended by logout");
        Ok(())
    }

    /// Forget requests still in flight; their completions belong to an ended
    /// epoch and will never be folded in.
    pub(crate) fn abandon_requests(&mut self) {
        self.login_in_flight = false;
        self.logout_in_flight = false;
    }

    /// The server rejected a request as unauthorized. Returns true if this
    /// ended an authenticated session.
    pub fn expire(&mut self) -> bool {
        let was = self.state.authenticated;
        self.state.authenticated = false;
        self.login_in_flight = false;
        self.logout_in_flight = false;
        if was {
            tracing::info!("session expired");
        }
        was
    }
}
