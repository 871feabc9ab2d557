// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use internal_error::InternalError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use wallet_auth::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub const INTERNAL_ERROR_CODE: &str = "InternalCollaboratorError";

/// Request body or query string could not be decoded at all
pub const MALFORMED_REQUEST_CODE: &str = "MalformedRequest";

/// Unifies error handling and logging in HTTP handlers.
///
/// The typical usage pattern is:
///
/// ```
/// async fn handler() -> Result<(), ApiError> {
///     operation().await.api_err()?;
///     Ok(())
/// }
/// ```
///
/// Conversion from domain errors is explicit on purpose: it's too easy to put
/// a question mark operator on a fallible operation without thinking what
/// status code it will actually produce.
#[derive(Debug, Error)]
#[error("api error {status_code:?}")]
pub struct ApiError {
    pub status_code: http::StatusCode,
    pub code: &'static str,
    source: Box<dyn std::error::Error + Send + Sync + 'static>,
}

impl ApiError {
    pub fn new(
        source: impl std::error::Error + Send + Sync + 'static,
        status_code: http::StatusCode,
        code: &'static str,
    ) -> Self {
        Self {
            status_code,
            code,
            source: source.into(),
        }
    }

    pub fn bad_request(
        source: impl std::error::Error + Send + Sync + 'static,
        code: &'static str,
    ) -> Self {
        Self::new(source, http::StatusCode::BAD_REQUEST, code)
    }

    pub fn malformed_request(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::bad_request(source, MALFORMED_REQUEST_CODE)
    }

    pub fn unauthorized(
        source: impl std::error::Error + Send + Sync + 'static,
        code: &'static str,
    ) -> Self {
        Self::new(source, http::StatusCode::UNAUTHORIZED, code)
    }

    pub fn new_unauthorized() -> Self {
        Self {
            status_code: http::StatusCode::UNAUTHORIZED,
            code: "Unauthorized",
            source: "Unauthorized access".into(),
        }
    }

    /// Storage or any other collaborator failed: details are logged, never
    /// returned to the client
    pub fn service_unavailable(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::new(
            source,
            http::StatusCode::SERVICE_UNAVAILABLE,
            INTERNAL_ERROR_CODE,
        )
    }
}

impl From<InternalError> for ApiError {
    fn from(e: InternalError) -> Self {
        e.api_err()
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, utoipa::ToSchema)]
pub struct ApiErrorResponse {
    pub code: String,
    pub message: String,
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let message = if self.status_code.is_server_error() {
            tracing::error!(
                error = ?self.source,
                error_msg = %self.source,
                status_code = %self.status_code,
                code = self.code,
                "Internal API error",
            );
            String::new()
        } else {
            tracing::warn!(
                error = ?self.source,
                error_msg = %self.source,
                status_code = %self.status_code,
                code = self.code,
                "API error",
            );
            self.source.to_string()
        };

        let response_body = axum::response::Json(ApiErrorResponse {
            code: self.code.to_string(),
            message,
        });

        (self.status_code, response_body).into_response()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Provides explicit conversion into [`ApiError`]
pub trait IntoApiError {
    fn api_err(self) -> ApiError;
}

/// Allows using `.api_err()` method on [Result] types
pub trait ResultIntoApiError<K, E>
where
    E: IntoApiError,
{
    fn api_err(self) -> Result<K, ApiError>;
}

impl<K, E> ResultIntoApiError<K, E> for Result<K, E>
where
    E: IntoApiError,
{
    fn api_err(self) -> Result<K, ApiError> {
        self.map_err(IntoApiError::api_err)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

impl IntoApiError for InternalError {
    fn api_err(self) -> ApiError {
        ApiError::service_unavailable(self)
    }
}

impl IntoApiError for WalletLoginError {
    fn api_err(self) -> ApiError {
        let code = self.code();
        match self {
            Self::MissingField(_) | Self::InvalidIdentity(_) | Self::NonceExtractionFailed(_) => {
                ApiError::bad_request(self, code)
            }
            Self::InvalidNonce(_) | Self::SignatureInvalid(_) | Self::IdentityMismatch(_) => {
                ApiError::unauthorized(self, code)
            }
            Self::Internal(e) => e.api_err(),
        }
    }
}

impl IntoApiError for CreateNonceError {
    fn api_err(self) -> ApiError {
        match self {
            Self::Internal(e) => e.api_err(),
        }
    }
}

impl IntoApiError for GetUserByTokenError {
    fn api_err(self) -> ApiError {
        match self {
            Self::AccessToken(_) | Self::UserUnresolved => ApiError::unauthorized(self, "Unauthorized"),
            Self::Internal(e) => e.api_err(),
        }
    }
}

impl IntoApiError for UsersCountError {
    fn api_err(self) -> ApiError {
        match self {
            Self::Internal(e) => e.api_err(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
