// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use axum::Extension;
use dill::Catalog;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub fn root_router() -> OpenApiRouter {
    use crate::handlers;

    OpenApiRouter::new()
        .routes(routes!(handlers::auth_nonce_handler))
        .routes(routes!(handlers::auth_verify_handler))
        .routes(routes!(handlers::user_profile_handler))
        .routes(routes!(handlers::health_handler))
}

/// Ready to serve router: all routes, the `/openapi.json` document and the
/// catalog the handlers resolve their services from
pub fn build_router(catalog: Catalog) -> axum::Router {
    let (router, api) = root_router().split_for_parts();
    let api = Arc::new(api);

    router
        .route(
            "/openapi.json",
            axum::routing::get(move || {
                let api = api.clone();
                async move { axum::Json(api.as_ref().clone()) }
            }),
        )
        .layer(Extension(catalog))
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
