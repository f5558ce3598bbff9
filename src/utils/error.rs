use thiserror::Error;

#[derive(Error, Debug)]
pub enum MpError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid query '{expression}': {message}")]
    QueryError { expression: String, message: String },

    #[error("{operation} failed: {message}")]
    ApiError {
        operation: &'static str,
        code: Option<String>,
        message: String,
    },

    #[error("Unable to build request: {message}")]
    BuildError { message: String },

    #[error("{what} not found")]
    NotFound { what: String },

    #[error("Change set still conflicts after {checks} rechecks: {message}")]
    ChangeSetConflict { checks: u32, message: String },

    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<MpError>,
    },
}

pub const RESOURCE_IN_USE: &str = "ResourceInUseException";

impl MpError {
    pub fn api(operation: &'static str, code: Option<&str>, message: impl Into<String>) -> Self {
        MpError::ApiError {
            operation,
            code: code.map(str::to_owned),
            message: message.into(),
        }
    }

    /// Wraps the error with a leading description of what was attempted.
    pub fn context(self, context: impl Into<String>) -> Self {
        MpError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// True when the catalog rejected a change because another change set
    /// currently locks one of its entities.
    pub fn is_resource_in_use(&self) -> bool {
        match self {
            MpError::ApiError { code, .. } => code.as_deref() == Some(RESOURCE_IN_USE),
            MpError::Context { source, .. } => source.is_resource_in_use(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, MpError>;
