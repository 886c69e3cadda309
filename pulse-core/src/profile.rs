use crate::backend::{BackendClient, User};
use crate::error::{PulseError, Result};
use crate::validation;

/// Account settings behind the Profile tab.
pub struct ProfileFlow {
    backend: BackendClient,
}

impl ProfileFlow {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }

    pub async fn load(&self) -> Result<User> {
        self.backend
            .get_current_user()
            .await?
            .ok_or_else(|| PulseError::Unauthorized(String::new()))
    }

    pub async fn update_name(&self, name: &str) -> Result<User> {
        validation::name_update(name)?;
        self.backend.update_user_name(name.trim()).await
    }

    pub async fn update_email(&self, email: &str, current_password: &str) -> Result<User> {
        validation::email_update(email, current_password)?;
        self.backend
            .update_user_email(email.trim(), current_password)
            .await
    }

    pub async fn reset_password(&self, old_password: &str, new_password: &str) -> Result<User> {
        validation::password_reset(old_password, new_password)?;
        self.backend
            .reset_user_password(old_password, new_password)
            .await
    }
}
