//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::{Config, Identity};
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("identity.username is required")]
    MissingUsername,
    #[error("identity.credential is required")]
    MissingCredential,
    #[error("identity.channel_name is required")]
    MissingChannel,
    #[error("server.host must not be empty")]
    EmptyHost,
    #[error("storage.save_interval_secs must be greater than zero")]
    ZeroSaveInterval,
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = validate_identity(&config.identity);

    if config.server.host.trim().is_empty() {
        errors.push(ValidationError::EmptyHost);
    }
    if config.storage.save_interval_secs == 0 {
        errors.push(ValidationError::ZeroSaveInterval);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check the login identity. Whitespace-only values count as empty.
pub fn validate_identity(identity: &Identity) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if identity.username.trim().is_empty() {
        errors.push(ValidationError::MissingUsername);
    }
    if identity.credential.trim().is_empty() {
        errors.push(ValidationError::MissingCredential);
    }
    if identity.channel().is_empty() {
        errors.push(ValidationError::MissingChannel);
    }

    errors
}
