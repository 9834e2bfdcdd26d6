//! Password value object.
//!
//! Registrations never persist the plain text the applicant typed; the
//! aggregate is converted into a row carrying an Argon2 hash instead.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::constants::MIN_PASSWORD_LENGTH;
use crate::error::{DomainError, DomainResult};

/// Hashed password, compared by value.
#[derive(Clone)]
pub struct Password {
    hash: String,
}

// Don't expose hash in debug output
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Hash a plain text password.
    ///
    /// # Errors
    /// Returns a password error if the plain text is shorter than
    /// [`MIN_PASSWORD_LENGTH`] characters or hashing fails.
    pub fn new(plain_text: &str) -> DomainResult<Self> {
        if plain_text.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(DomainError::password(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| DomainError::internal(format!("Password hash failed: {}", e)))?
            .to_string();

        Ok(Self { hash })
    }

    /// Wrap an existing hash (read back from storage).
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    pub fn as_str(&self) -> &str {
        &self.hash
    }

    pub fn into_string(self) -> String {
        self.hash
    }

    /// Verify a plain text password against this hash.
    pub fn verify(&self, plain_text: &str) -> bool {
        PasswordHash::new(&self.hash)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(plain_text.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }
}

impl From<Password> for String {
    fn from(password: Password) -> Self {
        password.hash
    }
}

impl PartialEq for Password {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Password {}
