use thiserror::Error;

#[derive(Error, Debug)]
pub enum RentalError {
    #[error("Invalid argument for {field}: {reason}")]
    InvalidArgument { field: String, reason: String },

    #[error("Malformed document{}: {reason}", location(.context))]
    MalformedDocument { context: String, reason: String },

    #[error("{what} #{index} does not exist")]
    NotFound { what: String, index: usize },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Data,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl RentalError {
    pub fn invalid_argument(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn malformed(context: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::MalformedDocument {
            context: context.into(),
            reason: reason.to_string(),
        }
    }

    pub fn not_found(what: impl Into<String>, index: usize) -> Self {
        Self::NotFound {
            what: what.into(),
            index,
        }
    }

    /// Prefixes the location of a malformed entry with the document key that
    /// encloses it, so `vehicule` under the third contract reads
    /// `contrats[2].vehicule`. An empty context is the entry itself.
    /// An invalid argument raised while decoding becomes a malformed document;
    /// other variants pass through untouched.
    pub fn within(self, parent: &str) -> Self {
        match self {
            Self::MalformedDocument { context, reason } => Self::MalformedDocument {
                context: join_path(parent, &context),
                reason,
            },
            Self::InvalidArgument { field, reason } => Self::MalformedDocument {
                context: join_path(parent, &field),
                reason,
            },
            other => other,
        }
    }

    /// Turns a field check failed while decoding into a malformed document
    /// located at that field.
    pub fn in_document(self) -> Self {
        self.within("")
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidArgument { .. } | Self::NotFound { .. } => ErrorCategory::Input,
            Self::MalformedDocument { .. } | Self::SerializationError(_) => ErrorCategory::Data,
            Self::IoError(_) => ErrorCategory::Storage,
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::InvalidArgument { .. } => "Check the command arguments and try again",
            Self::NotFound { .. } => "List the entries first and use one of the displayed numbers",
            Self::MalformedDocument { .. } | Self::SerializationError(_) => {
                "Fix or restore the data file; the named entry could not be read"
            }
            Self::IoError(_) => "Check that the data directory exists and is writable",
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                "Review the configuration file and CLI flags"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("Request rejected: {}", self),
            ErrorCategory::Data => format!("Stored data is unreadable: {}", self),
            ErrorCategory::Storage => format!("Storage unavailable: {}", self),
            ErrorCategory::Configuration => format!("Bad configuration: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, RentalError>;

fn join_path(parent: &str, child: &str) -> String {
    match (parent.is_empty(), child.is_empty()) {
        (true, _) => child.to_string(),
        (_, true) => parent.to_string(),
        _ => format!("{}.{}", parent, child),
    }
}

fn location(context: &str) -> String {
    if context.is_empty() {
        String::new()
    } else {
        format!(" at {}", context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context_of(err: RentalError) -> String {
        match err {
            RentalError::MalformedDocument { context, .. } => context,
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_within_nests_malformed_context() {
        let err =
            RentalError::malformed("vehicule", "missing field `marque`").within("contrats[2]");
        assert_eq!(context_of(err), "contrats[2].vehicule");
    }

    #[test]
    fn test_entry_level_error_takes_the_entry_path() {
        let err = RentalError::malformed("", "invalid type: string").within("clients[1]");
        assert_eq!(context_of(err), "clients[1]");

        let root = RentalError::malformed("", "expected value at line 1 column 1");
        assert_eq!(root.to_string(), "Malformed document: expected value at line 1 column 1");
    }

    #[test]
    fn test_field_check_becomes_malformed_field() {
        let err = RentalError::invalid_argument("prix_journalier", "must not be negative")
            .in_document()
            .within("vehicule")
            .within("contrats[1]");
        assert_eq!(context_of(err), "contrats[1].vehicule.prix_journalier");
    }

    #[test]
    fn test_within_keeps_io_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = RentalError::from(io).within("vehicules[0]");
        assert_eq!(err.category(), ErrorCategory::Storage);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_invalid_argument_is_input_error() {
        let err = RentalError::invalid_argument("available", "expected a boolean");
        assert_eq!(err.category(), ErrorCategory::Input);
        assert!(err.user_friendly_message().contains("expected a boolean"));
    }
}
