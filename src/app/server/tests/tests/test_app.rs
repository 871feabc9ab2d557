// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use axum::body::Body;
use clap::Parser;
use http::{Request, StatusCode};
use pretty_assertions::assert_eq;
use tower::ServiceExt;
use wallet_auth_server::{Cli, build_app, build_catalog};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

async fn get_json(app: &axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn assert_serves_requests(args: &[&str]) {
    let cli = Cli::try_parse_from(args).unwrap();
    let catalog = build_catalog(&cli).await.unwrap();
    let app = build_app(catalog);

    let (status, body) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body, serde_json::json!({"status": "ok"}));

    let (status, body) = get_json(&app, "/auth/nonce").await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert!(body["nonce"].is_string());
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_inmem_storage() {
    assert_serves_requests(&["wallet-auth-server", "--storage", "inmem"]).await;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_sqlite_storage() {
    assert_serves_requests(&[
        "wallet-auth-server",
        "--storage",
        "sqlite",
        "--database-url",
        "sqlite::memory:",
    ])
    .await;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
