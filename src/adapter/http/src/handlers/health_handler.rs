// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use axum::{Extension, Json};
use dill::Catalog;
use internal_error::ResultIntoInternal;
use serde::{Deserialize, Serialize};
use wallet_auth::UserRepository;

use crate::{ApiError, ResultIntoApiError};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Liveness probe that also touches the user store
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = OK, body = HealthResponse),
        (status = SERVICE_UNAVAILABLE, body = crate::ApiErrorResponse),
    ),
    tag = "system",
)]
pub async fn health_handler(
    Extension(catalog): Extension<Catalog>,
) -> Result<Json<HealthResponse>, ApiError> {
    let user_repo = catalog.get_one::<dyn UserRepository>().int_err()?;

    let users_count = user_repo.users_count().await.api_err()?;
    tracing::debug!(users_count, "Health check passed");

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
    }))
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
