// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use axum::extract::Query;
use axum::extract::rejection::QueryRejection;
use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use dill::Catalog;
use internal_error::ResultIntoInternal;
use serde::{Deserialize, Serialize};
use wallet_auth::{EvmWalletAddressConvertor, Web3NonceService};

use crate::{ApiError, ResultIntoApiError};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NonceQuery {
    /// Wallet the nonce should be reserved for. A blank value is the same as
    /// no value.
    pub address: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NonceResponse {
    pub nonce: String,
    pub bind_address: Option<String>,
    pub expires_at: DateTime<Utc>,
}

/// Issue a one-time challenge nonce
#[utoipa::path(
    get,
    path = "/auth/nonce",
    params(NonceQuery),
    responses(
        (status = OK, body = NonceResponse),
        (status = BAD_REQUEST, body = crate::ApiErrorResponse),
        (status = SERVICE_UNAVAILABLE, body = crate::ApiErrorResponse),
    ),
    tag = "auth",
)]
pub async fn auth_nonce_handler(
    Extension(catalog): Extension<Catalog>,
    query: Result<Query<NonceQuery>, QueryRejection>,
) -> Result<Json<NonceResponse>, ApiError> {
    let Query(query) = query.map_err(ApiError::malformed_request)?;

    let maybe_bind_wallet = match query.address.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(address) => Some(
            EvmWalletAddressConvertor::parse(address)
                .map_err(|e| ApiError::bad_request(e, "InvalidIdentity"))?,
        ),
    };

    let nonce_service = catalog.get_one::<dyn Web3NonceService>().int_err()?;
    let entity = nonce_service
        .create_nonce(maybe_bind_wallet)
        .await
        .api_err()?;

    Ok(Json(NonceResponse {
        nonce: entity.nonce.to_string(),
        bind_address: entity
            .bound_wallet
            .as_ref()
            .map(EvmWalletAddressConvertor::canonical_string),
        expires_at: entity.expires_at,
    }))
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
