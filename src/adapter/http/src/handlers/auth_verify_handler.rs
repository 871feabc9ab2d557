// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use axum::extract::rejection::JsonRejection;
use axum::{Extension, Json};
use dill::Catalog;
use internal_error::ResultIntoInternal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wallet_auth::{EvmWalletAddressConvertor, WalletLoginRequest, Web3AuthService};

use crate::{ApiError, ClientInfo, ResultIntoApiError};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Absent and `null` fields are accepted here and reported as missing by the
/// login itself
#[derive(Debug, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct VerifyRequest {
    /// Signed challenge text, must contain a `Nonce: <value>` line
    #[serde(default)]
    pub message: Option<String>,
    /// Hex encoded 65-byte `personal_sign` signature
    #[serde(default)]
    pub signature: Option<String>,
    /// Wallet claimed by the client, any letter case
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub token: String,
    pub address: String,
    pub user_id: Uuid,
}

/// Exchange a signed challenge for a session token
#[utoipa::path(
    post,
    path = "/auth/verify",
    request_body = VerifyRequest,
    responses(
        (status = OK, body = VerifyResponse),
        (status = BAD_REQUEST, body = crate::ApiErrorResponse),
        (status = UNAUTHORIZED, body = crate::ApiErrorResponse),
        (status = SERVICE_UNAVAILABLE, body = crate::ApiErrorResponse),
    ),
    tag = "auth",
)]
pub async fn auth_verify_handler(
    Extension(catalog): Extension<Catalog>,
    client_info: ClientInfo,
    request: Result<Json<VerifyRequest>, JsonRejection>,
) -> Result<Json<VerifyResponse>, ApiError> {
    let Json(request) = request.map_err(ApiError::malformed_request)?;

    let auth_service = catalog.get_one::<dyn Web3AuthService>().int_err()?;

    let response = auth_service
        .login(
            WalletLoginRequest {
                message: request.message.unwrap_or_default(),
                signature: request.signature.unwrap_or_default(),
                wallet_address: request.address.unwrap_or_default(),
            },
            client_info.into(),
        )
        .await
        .api_err()?;

    Ok(Json(VerifyResponse {
        token: response.access_token,
        address: EvmWalletAddressConvertor::canonical_string(&response.wallet),
        user_id: response.user_id,
    }))
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
