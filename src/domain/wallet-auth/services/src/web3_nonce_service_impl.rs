// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use internal_error::InternalError;
use time_source::SystemTimeSource;
use wallet_auth::*;

use crate::with_collaborator_timeout;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

const MAX_NONCE_GENERATION_ATTEMPTS: usize = 3;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[dill::component]
#[dill::interface(dyn Web3NonceService)]
pub struct Web3NonceServiceImpl {
    nonce_repo: Arc<dyn Web3AuthNonceRepository>,
    time_source: Arc<dyn SystemTimeSource>,
    config: Arc<Web3AuthConfig>,
}

impl Web3NonceServiceImpl {
    async fn store_nonce(&self, entity: &Web3AuthNonceEntity) -> Result<(), SetNonceError> {
        with_collaborator_timeout(
            "set_nonce",
            self.config.collaborator_timeout,
            self.nonce_repo.set_nonce(entity),
        )
        .await?
    }

    async fn put_back_for_bound_owner(&self, entity: &Web3AuthNonceEntity) {
        if let Err(e) = self.store_nonce(entity).await {
            tracing::warn!(
                nonce = %entity.nonce,
                error = ?e,
                "Failed to put back a nonce for its bound owner"
            );
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait]
impl Web3NonceService for Web3NonceServiceImpl {
    #[tracing::instrument(level = "debug", skip_all, fields(bound_wallet = ?bound_wallet))]
    async fn create_nonce(
        &self,
        bound_wallet: Option<EvmWalletAddress>,
    ) -> Result<Web3AuthNonceEntity, CreateNonceError> {
        let issued_at = self.time_source.now();
        let expires_at = issued_at + self.config.nonce_ttl;

        for _ in 0..MAX_NONCE_GENERATION_ATTEMPTS {
            let entity = Web3AuthNonceEntity {
                nonce: Web3AuthNonce::new(),
                bound_wallet,
                issued_at,
                expires_at,
            };

            match self.store_nonce(&entity).await {
                Ok(()) => {
                    tracing::debug!(nonce = %entity.nonce, %expires_at, "Nonce issued");
                    return Ok(entity);
                }
                Err(SetNonceError::Duplicate { nonce }) => {
                    tracing::warn!(%nonce, "Generated nonce collides with an outstanding one");
                }
                Err(SetNonceError::Internal(e)) => return Err(CreateNonceError::Internal(e)),
            }
        }

        InternalError::bail("Could not generate a unique nonce").map_err(CreateNonceError::Internal)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(%nonce, %claimed_wallet))]
    async fn consume_nonce(
        &self,
        nonce: &Web3AuthNonce,
        claimed_wallet: &EvmWalletAddress,
    ) -> Result<Web3AuthNonceEntity, ConsumeWalletNonceError> {
        let now = self.time_source.now();

        let entity = with_collaborator_timeout(
            "consume_nonce",
            self.config.collaborator_timeout,
            self.nonce_repo.consume_nonce(nonce, now),
        )
        .await?
        .map_err(|e| match e {
            ConsumeNonceError::NotFound(e) => ConsumeWalletNonceError::NotFound(e),
            ConsumeNonceError::Internal(e) => ConsumeWalletNonceError::Internal(e),
        })?;

        match entity.bound_wallet {
            Some(bound_wallet) if bound_wallet != *claimed_wallet => {
                if self.config.allow_bound_owner_retry {
                    self.put_back_for_bound_owner(&entity).await;
                }

                Err(ConsumeWalletNonceError::IdentityMismatch(
                    NonceIdentityMismatchError {
                        nonce: entity.nonce,
                        bound_wallet,
                        claimed_wallet: *claimed_wallet,
                    },
                ))
            }
            _ => Ok(entity),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
