// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use internal_error::{InternalError, ResultIntoInternal};
use time_source::SystemTimeSource;
use wallet_auth::{Web3AuthConfig, Web3AuthNonceRepository};

use crate::with_collaborator_timeout;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Purges expired nonces from the store. Expired entries are already
/// rejected on consumption, the sweep only keeps the store from growing.
#[dill::component]
pub struct ExpiredNoncesSweeper {
    nonce_repo: Arc<dyn Web3AuthNonceRepository>,
    time_source: Arc<dyn SystemTimeSource>,
    config: Arc<Web3AuthConfig>,
}

impl ExpiredNoncesSweeper {
    #[tracing::instrument(level = "debug", skip_all)]
    pub async fn run_once(&self) -> Result<usize, InternalError> {
        let now = self.time_source.now();

        let purged = with_collaborator_timeout(
            "cleanup_expired_nonces",
            self.config.collaborator_timeout,
            self.nonce_repo.cleanup_expired_nonces(now),
        )
        .await?
        .int_err()?;

        if purged > 0 {
            tracing::debug!(purged, "Expired nonces purged");
        }

        Ok(purged)
    }

    /// Sweeps every `sweep_interval` until the task is dropped
    pub async fn run(&self) {
        tracing::info!(interval = %self.config.sweep_interval, "Starting expired nonces sweeper");

        loop {
            self.time_source.sleep(self.config.sweep_interval).await;

            if let Err(e) = self.run_once().await {
                tracing::error!(error = ?e, "Expired nonces sweep failed");
            }
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
