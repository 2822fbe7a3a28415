use std::borrow::Cow;

use cilspect_core::error::InspectError;
use rmcp::ErrorData;
use rmcp::model::ErrorCode;
use serde_json::json;

/// Maps a taxonomy failure to the wire error.
///
/// The stable capability code travels in `data.code`; the JSON-RPC code is
/// the closest protocol-level classification. Timeout, cancellation, and
/// internal faults get fixed human-readable texts so no engine detail leaks
/// to the client.
#[must_use]
pub fn tool_error(err: &InspectError) -> ErrorData {
    let code = match err {
        InspectError::InvalidInput(_) => ErrorCode::INVALID_PARAMS,
        InspectError::TypeNotFound { .. } | InspectError::MethodNotFound { .. } => {
            ErrorCode::RESOURCE_NOT_FOUND
        }
        InspectError::AssemblyLoadFailed { .. }
        | InspectError::Timeout { .. }
        | InspectError::Cancelled
        | InspectError::Internal(_) => ErrorCode::INTERNAL_ERROR,
    };
    ErrorData {
        code,
        message: Cow::Owned(public_message(err)),
        data: Some(json!({ "code": err.code() })),
    }
}

fn public_message(err: &InspectError) -> String {
    match err {
        InspectError::Timeout { .. } => {
            "The operation timed out. The assembly may be too large or the operation took too long."
                .to_string()
        }
        InspectError::Cancelled => "The operation was cancelled.".to_string(),
        InspectError::Internal(_) => {
            "An unexpected error occurred while processing the request.".to_string()
        }
        other => other.to_string(),
    }
}
