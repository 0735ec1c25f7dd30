//! UpdateCredentialsHandler - Command handler for the admin credential update.

use std::sync::Arc;

use tracing::info;

use crate::domain::payment::{CredentialsUpdate, PaymentError, PaymobSettings};
use crate::ports::CredentialStore;

/// Acknowledgement returned on success.
pub const CREDENTIALS_UPDATED: &str = "Paymob Credentials Updated Successfully";

/// Command to replace some or all stored credentials.
#[derive(Debug, Clone)]
pub struct UpdateCredentialsCommand {
    pub update: CredentialsUpdate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCredentialsResult {
    pub message: String,
}

pub struct UpdateCredentialsHandler {
    store: Arc<dyn CredentialStore>,
}

impl UpdateCredentialsHandler {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Applies the update and drops the cached token.
    ///
    /// The first update must supply every required credential.
    pub async fn handle(
        &self,
        cmd: UpdateCredentialsCommand,
    ) -> Result<UpdateCredentialsResult, PaymentError> {
        if cmd.update.is_empty() {
            return Err(PaymentError::validation(
                "credentials",
                "at least one field is required",
            ));
        }

        let settings = match self.store.load().await? {
            Some(existing) => cmd.update.apply(existing),
            None => PaymobSettings::new(cmd.update.into_credentials()?),
        };
        settings.credentials.validate()?;

        self.store.save(&settings).await?;

        info!(
            iframe_id = %settings.credentials.iframe_id,
            integration_id = settings.credentials.integration_id,
            "Paymob credentials updated"
        );

        Ok(UpdateCredentialsResult {
            message: CREDENTIALS_UPDATED.to_string(),
        })
    }
}
