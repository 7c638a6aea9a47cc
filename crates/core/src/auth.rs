//! Admin credential check.
//!
//! The admin panel is gated by a single username/password pair.

use secrecy::{ExposeSecret, SecretString};

/// Built-in username used when none is configured.
pub const DEFAULT_USERNAME: &str = "Admin";

/// Built-in password used when none is configured.
pub const DEFAULT_PASSWORD: &str = "12345678";

/// Login failures.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginError {
    #[error("Preencha usuário e senha.")]
    MissingFields,
    #[error("Usuário ou senha incorretos!")]
    InvalidCredentials,
}

/// The credential pair that unlocks the admin panel.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    username: String,
    password: SecretString,
}

impl AdminCredentials {
    #[must_use]
    pub const fn new(username: String, password: SecretString) -> Self {
        Self { username, password }
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Whether this is the built-in pair.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.username == DEFAULT_USERNAME && self.password.expose_secret() == DEFAULT_PASSWORD
    }

    /// Check a login attempt. Both inputs are trimmed first.
    ///
    /// # Errors
    ///
    /// `MissingFields` if either input is blank, `InvalidCredentials` if the
    /// pair does not match.
    pub fn verify(&self, username: &str, password: &str) -> Result<(), LoginError> {
        let username = username.trim();
        let password = password.trim();
        if username.is_empty() || password.is_empty() {
            return Err(LoginError::MissingFields);
        }
        if username == self.username && password == self.password.expose_secret() {
            Ok(())
        } else {
            Err(LoginError::InvalidCredentials)
        }
    }
}

impl Default for AdminCredentials {
    fn default() -> Self {
        Self::new(
            DEFAULT_USERNAME.to_owned(),
            SecretString::from(DEFAULT_PASSWORD),
        )
    }
}
