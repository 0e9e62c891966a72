use thiserror::Error;

/// Business errors for customer workflows
#[derive(Debug, Error)]
pub enum CustomerError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    EmailUnavailable(String),
    #[error("repository error: {0}")]
    Repository(String),
}

impl CustomerError {
    pub fn not_found(id: i64) -> Self {
        Self::NotFound(format!("Customer with id {} does not exist", id))
    }

    pub fn email_unavailable(email: &str) -> Self {
        Self::EmailUnavailable(format!("The email {} is already taken.", email))
    }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            CustomerError::NotFound(_) => 2001,
            CustomerError::EmailUnavailable(_) => 2002,
            CustomerError::Repository(_) => 2100,
        }
    }
}

impl From<models::errors::ModelError> for CustomerError {
    fn from(e: models::errors::ModelError) -> Self { CustomerError::Repository(e.to_string()) }
}

impl From<sea_orm::DbErr> for CustomerError {
    fn from(e: sea_orm::DbErr) -> Self { CustomerError::Repository(e.to_string()) }
}
