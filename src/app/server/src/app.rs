// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::str::FromStr;

use dill::{Catalog, CatalogBuilder};
use internal_error::{InternalError, ResultIntoInternal};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use time_source::SystemTimeSourceDefault;
use wallet_auth_services::ExpiredNoncesSweeper;

use crate::{Cli, StorageBackend};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn run(cli: Cli) -> Result<(), InternalError> {
    let catalog = build_catalog(&cli).await?;

    let sweeper = catalog.get_one::<ExpiredNoncesSweeper>().int_err()?;
    // Leftovers of a previous run are purged before accepting requests
    let purged = sweeper.run_once().await?;
    tracing::info!(purged, "Startup nonce sweep finished");

    let sweeper_task = tokio::spawn(async move { sweeper.run().await });

    let app = build_app(catalog);

    let listener = tokio::net::TcpListener::bind(cli.listen).await.int_err()?;
    tracing::info!(
        address = %listener.local_addr().int_err()?,
        storage = ?cli.storage,
        "Wallet authentication server is listening",
    );

    let res = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .int_err();

    sweeper_task.abort();
    tracing::info!("Wallet authentication server stopped");

    res
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn build_catalog(cli: &Cli) -> Result<Catalog, InternalError> {
    let mut b = CatalogBuilder::new();

    b.add::<SystemTimeSourceDefault>()
        .add_value(cli.web3_auth_config())
        .add_value(cli.jwt_authentication_config())
        .add_value(cli.client_info_config());

    match cli.storage {
        StorageBackend::Inmem => {
            b.add::<wallet_auth_inmem::InMemoryWeb3AuthNonceRepository>()
                .add::<wallet_auth_inmem::InMemoryUserRepository>()
                .add::<wallet_auth_inmem::InMemoryLoginHistoryRepository>();
        }
        StorageBackend::Sqlite => {
            let sqlite_pool = connect_sqlite(&cli.database_url).await?;

            b.add_value(sqlite_pool)
                .add::<wallet_auth_sqlite::SqliteWeb3AuthNonceRepository>()
                .add::<wallet_auth_sqlite::SqliteUserRepository>()
                .add::<wallet_auth_sqlite::SqliteLoginHistoryRepository>();
        }
    }

    wallet_auth_services::register_dependencies(&mut b);

    Ok(b.build())
}

pub fn build_app(catalog: Catalog) -> axum::Router {
    use tower_http::catch_panic::CatchPanicLayer;
    use tower_http::cors::{Any, CorsLayer};
    use tower_http::trace::TraceLayer;

    wallet_auth_adapter_http::build_router(catalog).layer(
        tower::ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CatchPanicLayer::new())
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(vec![http::Method::GET, http::Method::POST])
                    .allow_headers(Any),
            ),
    )
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

async fn connect_sqlite(database_url: &str) -> Result<SqlitePool, InternalError> {
    let connect_options = SqliteConnectOptions::from_str(database_url)
        .int_err()?
        .create_if_missing(true);

    let pool_options = if database_url.contains(":memory:") {
        // Every connection to an in-memory database sees its own copy
        SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new()
    };

    let sqlite_pool = pool_options.connect_with(connect_options).await.int_err()?;

    wallet_auth_sqlite::MIGRATOR
        .run(&sqlite_pool)
        .await
        .int_err()?;

    tracing::info!(database_url, "Connected to SQLite database");

    Ok(sqlite_pool)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => tracing::error!(error = ?e, "Failed to listen for the shutdown signal"),
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
