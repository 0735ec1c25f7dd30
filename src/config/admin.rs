//! Admin endpoint configuration

use secrecy::SecretString;
use serde::Deserialize;

use super::error::ValidationError;

/// Shared key guarding the settings and token-refresh endpoints.
///
/// Without a key the admin endpoints reject every request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminConfig {
    pub api_key: Option<SecretString>,
}

impl AdminConfig {
    pub fn validate(&self, production: bool) -> Result<(), ValidationError> {
        if production && self.api_key.is_none() {
            return Err(ValidationError::AdminKeyRequired);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_fine_in_development() {
        assert!(AdminConfig::default().validate(false).is_ok());
    }

    #[test]
    fn missing_key_fails_in_production() {
        assert!(matches!(
            AdminConfig::default().validate(true),
            Err(ValidationError::AdminKeyRequired)
        ));
    }

    #[test]
    fn key_satisfies_production() {
        let config = AdminConfig {
            api_key: Some(SecretString::new("admin-key".to_string())),
        };
        assert!(config.validate(true).is_ok());
    }
}
