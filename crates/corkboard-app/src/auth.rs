//! Identity-provider client contract.
//!
//! Authentication is delegated to an external provider; this module
//! defines the call contract the board depends on and the fixed mapping
//! from provider error codes to user-readable messages. Raw provider
//! errors never surface past this layer.

use corkboard_core::storage::BoxFuture;
use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;

/// An authenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub email: String,
    pub email_verified: bool,
}

/// The closed set of authentication failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("invalid email")]
    InvalidEmail,
    #[error("weak password")]
    WeakPassword,
    #[error("wrong password")]
    WrongPassword,
    #[error("user not found")]
    UserNotFound,
    #[error("email already in use")]
    EmailAlreadyInUse,
    /// Anything else the provider reports; carried opaquely.
    #[error("provider error: {0}")]
    Provider(String),
}

impl AuthError {
    /// The user-readable message for this error.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::InvalidEmail => "Please enter a valid email address.".to_string(),
            AuthError::WeakPassword => {
                "The password must contain at least 6 characters.".to_string()
            }
            AuthError::WrongPassword => "Incorrect password.".to_string(),
            AuthError::UserNotFound => "No account is associated with this email.".to_string(),
            AuthError::EmailAlreadyInUse => "This email is already in use.".to_string(),
            AuthError::Provider(_) => "Something went wrong. Please try again.".to_string(),
        }
    }
}

/// Result type for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// Trait for identity providers.
pub trait IdentityProvider: Send + Sync {
    /// Sign in with email and password.
    fn sign_in(&self, email: &str, password: &str) -> BoxFuture<'_, AuthResult<Session>>;

    /// Create an account and sign in.
    fn sign_up(&self, email: &str, password: &str) -> BoxFuture<'_, AuthResult<Session>>;

    /// Send a password reset email.
    fn reset_password(&self, email: &str) -> BoxFuture<'_, AuthResult<()>>;

    /// End the current session.
    fn sign_out(&self) -> BoxFuture<'_, AuthResult<()>>;

    /// The current session, if signed in.
    fn current_session(&self) -> Option<Session>;
}

type SessionListener = Box<dyn FnMut(Option<&Session>)>;

/// Observable current-session value gating board access.
#[derive(Default)]
pub struct SessionGate {
    session: Option<Session>,
    listeners: Vec<SessionListener>,
}

impl SessionGate {
    /// Create a signed-out gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a session is active (the board is reachable).
    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }

    /// Whether the signed-in user verified their email.
    pub fn email_verified(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.email_verified)
    }

    /// The current session.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Replace the session and notify listeners.
    pub fn set_session(&mut self, session: Option<Session>) {
        self.session = session;
        for listener in &mut self.listeners {
            listener(self.session.as_ref());
        }
    }

    /// Register a listener for session changes.
    pub fn on_change(&mut self, listener: SessionListener) {
        self.listeners.push(listener);
    }
}

/// In-memory identity provider for tests and offline development.
#[derive(Default)]
pub struct MockIdentityProvider {
    accounts: Mutex<HashMap<String, String>>,
    current: Mutex<Option<Session>>,
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an account's email as verified.
    pub fn mark_verified(&self, email: &str) {
        let mut current = self.lock_current();
        if let Some(session) = current.as_mut() {
            if session.email == email {
                session.email_verified = true;
            }
        }
    }

    fn lock_accounts(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        match self.accounts.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn lock_current(&self) -> std::sync::MutexGuard<'_, Option<Session>> {
        match self.current.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn validate_email(email: &str) -> AuthResult<()> {
    let valid = email.contains('@') && email.contains('.') && !email.contains(char::is_whitespace);
    if valid { Ok(()) } else { Err(AuthError::InvalidEmail) }
}

impl IdentityProvider for MockIdentityProvider {
    fn sign_in(&self, email: &str, password: &str) -> BoxFuture<'_, AuthResult<Session>> {
        let email = email.to_string();
        let password = password.to_string();
        Box::pin(async move {
            validate_email(&email)?;
            {
                let accounts = self.lock_accounts();
                match accounts.get(&email) {
                    None => return Err(AuthError::UserNotFound),
                    Some(stored) if *stored != password => {
                        return Err(AuthError::WrongPassword);
                    }
                    Some(_) => {}
                }
            }

            let session = Session {
                email,
                email_verified: false,
            };
            *self.lock_current() = Some(session.clone());
            Ok(session)
        })
    }

    fn sign_up(&self, email: &str, password: &str) -> BoxFuture<'_, AuthResult<Session>> {
        let email = email.to_string();
        let password = password.to_string();
        Box::pin(async move {
            validate_email(&email)?;
            if password.len() < 6 {
                return Err(AuthError::WeakPassword);
            }
            let mut accounts = self.lock_accounts();
            if accounts.contains_key(&email) {
                return Err(AuthError::EmailAlreadyInUse);
            }
            accounts.insert(email.clone(), password);
            drop(accounts);

            let session = Session {
                email,
                email_verified: false,
            };
            *self.lock_current() = Some(session.clone());
            Ok(session)
        })
    }

    fn reset_password(&self, email: &str) -> BoxFuture<'_, AuthResult<()>> {
        let email = email.to_string();
        Box::pin(async move {
            validate_email(&email)?;
            if self.lock_accounts().contains_key(&email) {
                Ok(())
            } else {
                Err(AuthError::UserNotFound)
            }
        })
    }

    fn sign_out(&self) -> BoxFuture<'_, AuthResult<()>> {
        Box::pin(async move {
            *self.lock_current() = None;
            Ok(())
        })
    }

    fn current_session(&self) -> Option<Session> {
        self.lock_current().clone()
    }
}
