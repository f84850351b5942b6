use thiserror::Error;

/// Failures raised by a `SubscriptionStore` implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("No stored record with id {id}")]
    MissingRecord { id: u64 },

    #[error("Store call exceeded deadline of {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Store unavailable: {message}")]
    Unavailable { message: String },
}

/// Closed set of error kinds the transport layer maps to status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MissingField,
    InvalidFormat,
    AlreadyExists,
    NotFound,
    StorageFailure,
    Configuration,
}

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidFormat {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Subscription already exists: {message}")]
    AlreadyExists { message: String },

    #[error("Subscription not found: {message}")]
    NotFound { message: String },

    #[error("Storage failure during {operation}: {source}")]
    StorageFailure {
        operation: String,
        #[source]
        source: StoreError,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl LedgerError {
    pub fn missing(field: &str) -> Self {
        Self::MissingField {
            field: field.to_string(),
        }
    }

    pub fn invalid(field: &str, value: &str, reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn storage(operation: &str, source: StoreError) -> Self {
        Self::StorageFailure {
            operation: operation.to_string(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingField { .. } => ErrorKind::MissingField,
            Self::InvalidFormat { .. } => ErrorKind::InvalidFormat,
            Self::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::StorageFailure { .. } => ErrorKind::StorageFailure,
            Self::Config { .. } => ErrorKind::Configuration,
        }
    }

    /// Short message suitable for an end user; hides store internals.
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::MissingField { field } => format!("Field '{}' is required", field),
            Self::InvalidFormat { field, value, .. } => {
                format!("Value '{}' is not valid for '{}'", value, field)
            }
            Self::AlreadyExists { .. } => {
                "An overlapping subscription for this user and provider already exists".to_string()
            }
            Self::NotFound { message } => message.clone(),
            Self::StorageFailure { .. } => "The subscription store is unavailable".to_string(),
            Self::Config { message } => format!("Invalid configuration: {}", message),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.kind() {
            ErrorKind::MissingField => "Supply user_id, service_name, price and start_date",
            ErrorKind::InvalidFormat => "Dates must use the MM-YYYY format, e.g. 07-2025",
            ErrorKind::AlreadyExists => "Set an end_date on the existing subscription first",
            ErrorKind::NotFound => "List subscriptions to find a valid id",
            ErrorKind::StorageFailure => "Check the store path and permissions, then retry",
            ErrorKind::Configuration => "Review the TOML config file and CLI flags",
        }
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
