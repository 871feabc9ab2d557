// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::{DateTime, Utc};
use internal_error::InternalError;
use thiserror::Error;

use crate::{Web3AuthNonce, Web3AuthNonceEntity};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg_attr(any(feature = "testing", test), mockall::automock)]
#[async_trait::async_trait]
pub trait Web3AuthNonceRepository: Send + Sync {
    /// Stores a freshly issued nonce. Values are unique among outstanding
    /// nonces, an attempt to store an existing value is a `Duplicate`.
    async fn set_nonce(&self, entity: &Web3AuthNonceEntity) -> Result<(), SetNonceError>;

    /// Atomically looks up and removes the nonce. Entries expired at `now`
    /// are reported as `NotFound` and removed as well.
    async fn consume_nonce(
        &self,
        nonce: &Web3AuthNonce,
        now: DateTime<Utc>,
    ) -> Result<Web3AuthNonceEntity, ConsumeNonceError>;

    async fn delete_nonce(&self, nonce: &Web3AuthNonce) -> Result<(), DeleteNonceError>;

    /// Returns the number of purged entries
    async fn cleanup_expired_nonces(
        &self,
        now: DateTime<Utc>,
    ) -> Result<usize, CleanupExpiredNoncesError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum SetNonceError {
    #[error("Nonce '{nonce}' already exists")]
    Duplicate { nonce: Web3AuthNonce },

    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl PartialEq for SetNonceError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Duplicate { nonce: a }, Self::Duplicate { nonce: b }) => a == b,
            (Self::Internal(a), Self::Internal(b)) => a.reason().eq(&b.reason()),
            (_, _) => false,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum ConsumeNonceError {
    #[error(transparent)]
    NotFound(NonceNotFoundError),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl PartialEq for ConsumeNonceError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::Internal(a), Self::Internal(b)) => a.reason().eq(&b.reason()),
            (_, _) => false,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Nonce '{nonce}' not found or expired")]
pub struct NonceNotFoundError {
    pub nonce: Web3AuthNonce,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum DeleteNonceError {
    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl PartialEq for DeleteNonceError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Internal(a), Self::Internal(b)) => a.reason().eq(&b.reason()),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum CleanupExpiredNoncesError {
    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl PartialEq for CleanupExpiredNoncesError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Internal(a), Self::Internal(b)) => a.reason().eq(&b.reason()),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
