// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use internal_error::InternalError;
use thiserror::Error;

use crate::{EvmWalletAddress, NonceNotFoundError, Web3AuthNonce, Web3AuthNonceEntity};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg_attr(any(feature = "testing", test), mockall::automock)]
#[async_trait::async_trait]
pub trait Web3NonceService: Send + Sync {
    /// Issues a fresh single-use nonce, optionally reserved for one wallet
    async fn create_nonce(
        &self,
        bound_wallet: Option<EvmWalletAddress>,
    ) -> Result<Web3AuthNonceEntity, CreateNonceError>;

    /// Uses the nonce up on behalf of `claimed_wallet`. Whatever the outcome,
    /// the nonce can no longer be presented by `claimed_wallet`.
    async fn consume_nonce(
        &self,
        nonce: &Web3AuthNonce,
        claimed_wallet: &EvmWalletAddress,
    ) -> Result<Web3AuthNonceEntity, ConsumeWalletNonceError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum CreateNonceError {
    #[error(transparent)]
    Internal(#[from] InternalError),
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum ConsumeWalletNonceError {
    #[error(transparent)]
    NotFound(NonceNotFoundError),

    #[error(transparent)]
    IdentityMismatch(NonceIdentityMismatchError),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Nonce '{nonce}' is bound to wallet {bound_wallet}, but was presented by {claimed_wallet}")]
pub struct NonceIdentityMismatchError {
    pub nonce: Web3AuthNonce,
    pub bound_wallet: EvmWalletAddress,
    pub claimed_wallet: EvmWalletAddress,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
