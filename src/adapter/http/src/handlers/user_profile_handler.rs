// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use dill::Catalog;
use http::HeaderMap;
use internal_error::ResultIntoInternal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wallet_auth::{EvmWalletAddressConvertor, User, Web3AuthService};

use crate::{ApiError, ResultIntoApiError};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileResponse {
    pub id: Uuid,
    pub address: String,
    pub is_active: bool,
    pub login_count: u64,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserProfileResponse {
    fn from(value: User) -> Self {
        Self {
            id: value.id,
            address: EvmWalletAddressConvertor::canonical_string(&value.wallet_address),
            is_active: value.is_active,
            login_count: value.login_count,
            last_login_at: value.last_login_at,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// Profile of the user the session token was issued to
#[utoipa::path(
    get,
    path = "/user/profile",
    responses(
        (status = OK, body = UserProfileResponse),
        (status = UNAUTHORIZED, body = crate::ApiErrorResponse),
        (status = SERVICE_UNAVAILABLE, body = crate::ApiErrorResponse),
    ),
    tag = "user",
)]
pub async fn user_profile_handler(
    Extension(catalog): Extension<Catalog>,
    headers: HeaderMap,
) -> Result<Json<UserProfileResponse>, ApiError> {
    let Some(access_token) = bearer_token(&headers) else {
        return Err(ApiError::new_unauthorized());
    };

    let auth_service = catalog.get_one::<dyn Web3AuthService>().int_err()?;
    let user = auth_service.user_by_token(access_token).await.api_err()?;

    Ok(Json(user.into()))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(http::header::AUTHORIZATION)?.to_str().ok()?;

    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    Some(token.trim()).filter(|token| !token.is_empty())
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
