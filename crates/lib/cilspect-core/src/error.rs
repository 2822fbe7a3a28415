use std::error::Error;
use std::fmt;

use cilspect_engine::EngineError;

/// Closed fault taxonomy for every capability.
///
/// Every failure that crosses the capability boundary is exactly one of
/// these kinds; no engine-internal fault ever escapes raw. Nothing here is
/// retried: a missing type stays missing, and the engine call behind a
/// timeout cannot be safely interrupted or resumed.
#[derive(Debug)]
pub enum InspectError {
    /// Malformed path or type name, detected before any engine contact.
    InvalidInput(String),
    /// The engine could not open or parse the binary.
    AssemblyLoadFailed {
        path: String,
        source: EngineError,
    },
    TypeNotFound {
        type_name: String,
        assembly: String,
    },
    MethodNotFound {
        method_name: String,
        type_name: String,
    },
    /// The configured default duration elapsed while waiting for a result.
    Timeout {
        seconds: u64,
    },
    /// The caller withdrew the request.
    Cancelled,
    Internal(String),
}

impl InspectError {
    /// Stable error code, part of the public capability contract.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::AssemblyLoadFailed { .. } => "ASSEMBLY_LOAD_FAILED",
            Self::TypeNotFound { .. } => "TYPE_NOT_FOUND",
            Self::MethodNotFound { .. } => "METHOD_NOT_FOUND",
            Self::Timeout { .. } => "TIMEOUT",
            Self::Cancelled => "CANCELLED",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub(crate) fn load_failed(path: impl Into<String>, source: EngineError) -> Self {
        Self::AssemblyLoadFailed {
            path: path.into(),
            source,
        }
    }
}

impl fmt::Display for InspectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(message) | Self::Internal(message) => write!(f, "{message}"),
            Self::AssemblyLoadFailed { path, .. } => {
                write!(f, "Failed to load assembly '{path}'")
            }
            Self::TypeNotFound {
                type_name,
                assembly,
            } => write!(f, "Type '{type_name}' not found in assembly '{assembly}'"),
            Self::MethodNotFound {
                method_name,
                type_name,
            } => write!(f, "Method '{method_name}' not found in type '{type_name}'"),
            Self::Timeout { seconds } => {
                write!(f, "Operation timed out after {seconds} seconds")
            }
            Self::Cancelled => write!(f, "The operation was cancelled"),
        }
    }
}

impl Error for InspectError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::AssemblyLoadFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type InspectResult<T> = Result<T, InspectError>;
