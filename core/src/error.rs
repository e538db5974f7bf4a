use std::fmt;

pub const CONNECTION_FAILURE: &str = "Cannot connect to server. Ensure the backend is running.";

/// Failure of a call against the REST backend.
///
/// Carried inside UI messages, so it only holds owned text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("cannot connect to {endpoint}")]
    Network { endpoint: String, details: String },
    #[error("{endpoint} rejected the request ({status})")]
    Validation {
        endpoint: String,
        status: u16,
        detail: String,
    },
    #[error("{endpoint} not found")]
    NotFound {
        endpoint: String,
        detail: Option<String>,
    },
    #[error("{endpoint} failed with status {status}")]
    UnknownServer { endpoint: String, status: u16 },
    #[error("unexpected response from {endpoint}")]
    Decode { endpoint: String, details: String },
}

impl ApiError {
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }

    pub fn endpoint(&self) -> &str {
        match self {
            ApiError::Network { endpoint, .. }
            | ApiError::Validation { endpoint, .. }
            | ApiError::NotFound { endpoint, .. }
            | ApiError::UnknownServer { endpoint, .. }
            | ApiError::Decode { endpoint, .. } => endpoint,
        }
    }

    /// Text shown to the user. `fallback` covers responses without a usable `detail`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Network { .. } => CONNECTION_FAILURE.to_string(),
            ApiError::Validation { detail, .. } => detail.clone(),
            ApiError::NotFound {
                detail: Some(detail),
                ..
            } => detail.clone(),
            ApiError::NotFound { detail: None, .. } => {
                "The record no longer exists on the server.".to_string()
            }
            ApiError::UnknownServer { .. } => fallback.to_string(),
            ApiError::Decode { .. } => "Unexpected response from server.".to_string(),
        }
    }

    pub fn user_summary(&self) -> String {
        self.user_message("Server error.")
    }

    pub fn technical_detail(&self) -> String {
        match self {
            ApiError::Network { endpoint, details } => {
                format!("Network failure for {endpoint}: {details}")
            }
            ApiError::Validation {
                endpoint,
                status,
                detail,
            } => format!("HTTP {status} from {endpoint}: {detail}"),
            ApiError::NotFound { endpoint, detail } => {
                let detail = detail
                    .as_ref()
                    .map(|text| format!(": {text}"))
                    .unwrap_or_default();
                format!("HTTP 404 from {endpoint}{detail}")
            }
            ApiError::UnknownServer { endpoint, status } => {
                format!("HTTP {status} from {endpoint} without detail.")
            }
            ApiError::Decode { endpoint, details } => {
                format!("Decode failure for {endpoint}: {details}")
            }
        }
    }
}

/// Local validation failure raised before any network call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct FormError {
    pub field: &'static str,
    pub message: String,
}

impl FormError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials { hint: Option<String> },
    #[error("{0}")]
    Validation(String),
    #[error("registration failed")]
    Registration(#[source] ApiError),
}

impl AuthError {
    pub fn user_summary(&self) -> String {
        match self {
            AuthError::InvalidCredentials { hint: Some(hint) } => {
                format!("Invalid credentials. {hint}")
            }
            AuthError::InvalidCredentials { hint: None } => "Invalid credentials.".to_string(),
            AuthError::Validation(message) => message.clone(),
            AuthError::Registration(error) => {
                error.user_message("Registration failed. Please try again.")
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("RON {action} error")]
    Ron {
        action: StorageAction,
        path: Option<String>,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("RON encode error")]
    Encode {
        path: Option<String>,
        #[source]
        source: ron::Error,
    },
    #[error("Storage {action} error")]
    StorageIo {
        action: StorageAction,
        path: Option<String>,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageAction {
    Load,
    Save,
}

impl fmt::Display for StorageAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageAction::Load => f.write_str("load"),
            StorageAction::Save => f.write_str("save"),
        }
    }
}

impl ConfigError {
    pub fn user_summary(&self) -> String {
        match self {
            ConfigError::Ron { action, .. } => format!("Failed to {action} configuration data."),
            ConfigError::Encode { .. } => "Failed to encode configuration.".to_string(),
            ConfigError::StorageIo { action, .. } => {
                format!("Failed to {action} configuration file.")
            }
        }
    }

    pub fn technical_detail(&self) -> String {
        match self {
            ConfigError::Ron {
                action,
                path,
                source,
            } => format!("RON {action} error.{} {source}", path_label(path)),
            ConfigError::Encode { path, source } => {
                format!("RON encode error.{} {source}", path_label(path))
            }
            ConfigError::StorageIo {
                action,
                path,
                source,
            } => format!("Storage {action} error.{} {source}", path_label(path)),
        }
    }
}

fn path_label(path: &Option<String>) -> String {
    path.as_ref()
        .map(|value| format!(" path={value}."))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_error_reads_as_connection_failure() {
        let error = ApiError::Network {
            endpoint: "GET /api/inventory".to_string(),
            details: "connection refused".to_string(),
        };
        let message = error.user_message("Failed to save item.");
        assert!(message.to_lowercase().contains("cannot connect to server"));
        assert!(error.is_network());
    }

    #[test]
    fn validation_detail_is_shown_verbatim() {
        let error = ApiError::Validation {
            endpoint: "POST /api/inventory".to_string(),
            status: 400,
            detail: "SKU already exists".to_string(),
        };
        assert_eq!(error.user_message("Failed to save item."), "SKU already exists");
    }

    #[test]
    fn unknown_server_error_uses_fallback() {
        let error = ApiError::UnknownServer {
            endpoint: "PUT /api/printers/3".to_string(),
            status: 500,
        };
        assert_eq!(
            error.user_message("Failed to save printer."),
            "Failed to save printer."
        );
        assert!(error.technical_detail().contains("500"));
    }

    #[test]
    fn registration_error_falls_back_to_generic_text() {
        let error = AuthError::Registration(ApiError::UnknownServer {
            endpoint: "POST /api/auth/register".to_string(),
            status: 502,
        });
        assert_eq!(
            error.user_summary(),
            "Registration failed. Please try again."
        );
    }
}
