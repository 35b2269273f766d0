use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("api error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::Validation(_) => 1001,
            ServiceError::NotFound(_) => 1003,
            ServiceError::Model(_) => 1010,
            ServiceError::Storage(_) => 1200,
            ServiceError::Serialization(_) => 1201,
            ServiceError::Network(_) => 1300,
            ServiceError::Api { .. } => 1301,
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(e: serde_json::Error) -> Self { Self::Serialization(e.to_string()) }
}

impl From<reqwest::Error> for ServiceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Serialization(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_errors_convert_with_code() {
        let err: ServiceError = models::ModelError::required("city").into();
        assert_eq!(err.code(), 1010);
        assert_eq!(err.to_string(), "model error: validation error: city is required");
    }

    #[test]
    fn api_error_displays_status() {
        let err = ServiceError::Api { status: 409, message: "insufficient stock".into() };
        assert_eq!(err.to_string(), "api error (409): insufficient stock");
    }
}
