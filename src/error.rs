//
// Copyright (c) 2024 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use aws_sdk_dynamodb::error::{BuildError, DisplayErrorContext, ProvideErrorMetadata, SdkError};

include!(concat!(env!("OUT_DIR"), "/ua.rs"));

pub(crate) fn crate_version() -> &'static str {
    CRATE_VERSION
}

pub(crate) fn user_agent() -> &'static str {
    USER_AGENT
}

/// The error returned by every operation in this library.
///
/// Errors coming from the cloud services are propagated unchanged: the `message`
/// carries the service's own text, and `code` classifies it.
#[derive(Debug, Clone)]
pub struct DataAccessError {
    pub code: DataAccessErrorCode,
    pub message: String,
}

impl std::error::Error for DataAccessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

impl std::fmt::Display for DataAccessError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "code={:?} message=\"{}\"", self.code, self.message)
    }
}

impl DataAccessError {
    pub fn new(code: DataAccessErrorCode, msg: &str) -> DataAccessError {
        DataAccessError {
            code,
            message: msg.to_string(),
        }
    }

    // Map a BigQuery error "reason" string (and http status, if any) to a code.
    pub(crate) fn from_reason(reason: &str, status: u16, msg: &str) -> DataAccessError {
        let code = match reason {
            "notFound" => DataAccessErrorCode::ResourceNotFound,
            "duplicate" => DataAccessErrorCode::ResourceExists,
            "invalidQuery" | "invalid" => DataAccessErrorCode::InvalidQuery,
            "accessDenied" => DataAccessErrorCode::PermissionDenied,
            _ => match status {
                401 => DataAccessErrorCode::AuthenticationFailed,
                403 => DataAccessErrorCode::PermissionDenied,
                404 => DataAccessErrorCode::ResourceNotFound,
                409 => DataAccessErrorCode::ResourceExists,
                400 => DataAccessErrorCode::InvalidQuery,
                _ => DataAccessErrorCode::ServerError,
            },
        };
        DataAccessError {
            code,
            message: msg.to_string(),
        }
    }

    /// Re-tag an error with a different code, keeping its message.
    pub(crate) fn with_code(mut self, code: DataAccessErrorCode) -> DataAccessError {
        self.code = code;
        self
    }
}

macro_rules! ia_error {
    ($($t:tt)*) => {{
        let m = format!($($t)*);
        DataAccessError {
            code: crate::error::DataAccessErrorCode::IllegalArgument,
            message: format!("{} ({})", m, crate::error::crate_version()),
        }
    }};
}

pub(crate) use ia_error;

macro_rules! ia_err {
    ($($t:tt)*) => {{
        let m = format!($($t)*);
        Err(DataAccessError {
            code: crate::error::DataAccessErrorCode::IllegalArgument,
            message: format!("{} ({})", m, crate::error::crate_version()),
        })
    }};
}

pub(crate) use ia_err;

macro_rules! bad_response {
    ($($t:tt)*) => {{
        DataAccessError {
            code: crate::error::DataAccessErrorCode::BadResponse,
            message: format!($($t)*),
        }
    }};
}

pub(crate) use bad_response;

impl From<reqwest::Error> for DataAccessError {
    fn from(e: reqwest::Error) -> Self {
        let code = if e.is_decode() {
            DataAccessErrorCode::BadResponse
        } else {
            DataAccessErrorCode::ConnectionError
        };
        DataAccessError {
            code,
            message: format!("reqwest error: {} ({})", e, crate_version()),
        }
    }
}

impl From<reqwest::header::InvalidHeaderValue> for DataAccessError {
    fn from(e: reqwest::header::InvalidHeaderValue) -> Self {
        ia_error!("invalid header value: {}", e)
    }
}

impl From<url::ParseError> for DataAccessError {
    fn from(e: url::ParseError) -> Self {
        ia_error!("error parsing url: {}", e)
    }
}

impl From<serde_json::Error> for DataAccessError {
    fn from(e: serde_json::Error) -> Self {
        bad_response!("invalid json in service response: {}", e)
    }
}

impl From<gcp_auth::Error> for DataAccessError {
    fn from(e: gcp_auth::Error) -> Self {
        DataAccessError {
            code: DataAccessErrorCode::AuthenticationFailed,
            message: format!("error getting google cloud credentials: {}", e),
        }
    }
}

impl From<BuildError> for DataAccessError {
    fn from(e: BuildError) -> Self {
        ia_error!("invalid dynamodb request: {}", e)
    }
}

impl<E, R> From<SdkError<E, R>> for DataAccessError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    fn from(e: SdkError<E, R>) -> Self {
        let code = match &e {
            SdkError::ServiceError(se) => match se.err().code() {
                Some("ResourceNotFoundException") => DataAccessErrorCode::ResourceNotFound,
                Some("ResourceInUseException") => DataAccessErrorCode::ResourceExists,
                Some("ValidationException") => DataAccessErrorCode::IllegalArgument,
                Some("AccessDeniedException") => DataAccessErrorCode::PermissionDenied,
                Some("UnrecognizedClientException") => DataAccessErrorCode::AuthenticationFailed,
                _ => DataAccessErrorCode::ServerError,
            },
            SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) => {
                DataAccessErrorCode::ConnectionError
            }
            SdkError::ResponseError(_) => DataAccessErrorCode::BadResponse,
            SdkError::ConstructionFailure(_) => DataAccessErrorCode::IllegalArgument,
            _ => DataAccessErrorCode::UnknownError,
        };
        DataAccessError {
            code,
            message: format!("dynamodb error: {}", DisplayErrorContext(&e)),
        }
    }
}

/// Classification of a [`DataAccessError`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DataAccessErrorCode {
    /// The application provided an illegal argument for the operation.
    IllegalArgument,

    /// The service could not be reached, or the connection failed mid-request.
    ConnectionError,

    /// Credentials could not be obtained or were rejected by the service.
    AuthenticationFailed,

    /// The caller is authenticated but not allowed to perform the operation.
    PermissionDenied,

    /// The service rejected the query text or its configuration.
    InvalidQuery,

    /// A dataset, table, job or item does not exist.
    ///
    /// Also returned for a create-never disposition against a missing table.
    ResourceNotFound,

    /// The resource already exists.
    ///
    /// Also returned for a write-empty disposition against a non-empty table.
    ResourceExists,

    /// A query option could not be applied, for example a destination table
    /// option whose dataset could not be found.
    OptionFailed,

    /// Fetching a page of query results failed after the query had completed.
    RowIteration,

    /// The service returned something this library could not interpret.
    BadResponse,

    /// The service reported an internal problem.
    ServerError,

    UnknownError,
}
