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

use crate::{
    AccessTokenError,
    ConsumeWalletNonceError,
    EvmWalletAddress,
    ExtractNonceError,
    InvalidEvmWalletAddressError,
    LoginContext,
    SignatureError,
    User,
    UserId,
};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg_attr(any(feature = "testing", test), mockall::automock)]
#[async_trait::async_trait]
pub trait Web3AuthService: Send + Sync {
    /// Verifies a signed challenge and, when it proves control of the claimed
    /// wallet, issues a session token for the wallet's user.
    async fn login(
        &self,
        request: WalletLoginRequest,
        context: LoginContext,
    ) -> Result<WalletLoginResponse, WalletLoginError>;

    /// Resolves the user a session token was issued to
    async fn user_by_token(&self, access_token: &str) -> Result<User, GetUserByTokenError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Raw client input, validated by the service
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletLoginRequest {
    pub message: String,
    pub signature: String,
    pub wallet_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletLoginResponse {
    pub access_token: String,
    pub wallet: EvmWalletAddress,
    pub user_id: UserId,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Error)]
pub enum WalletLoginError {
    #[error(transparent)]
    MissingField(MissingFieldError),

    #[error(transparent)]
    InvalidIdentity(InvalidEvmWalletAddressError),

    #[error(transparent)]
    NonceExtractionFailed(ExtractNonceError),

    #[error("Invalid or expired nonce")]
    InvalidNonce(#[source] ConsumeWalletNonceError),

    #[error("Invalid signature")]
    SignatureInvalid(#[source] SignatureError),

    #[error(transparent)]
    IdentityMismatch(IdentityMismatchError),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl WalletLoginError {
    /// Stable name of the failure kind, exposed to API clients
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "MissingField",
            Self::InvalidIdentity(_) => "InvalidIdentity",
            Self::NonceExtractionFailed(_) => "NonceExtractionFailed",
            Self::InvalidNonce(_) => "InvalidNonce",
            Self::SignatureInvalid(_) => "SignatureInvalid",
            Self::IdentityMismatch(_) => "IdentityMismatch",
            Self::Internal(_) => "InternalCollaboratorError",
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Missing required field '{field}'")]
pub struct MissingFieldError {
    pub field: &'static str,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Signature was produced by {recovered_wallet}, not by the claimed {claimed_wallet}")]
pub struct IdentityMismatchError {
    pub claimed_wallet: EvmWalletAddress,
    pub recovered_wallet: EvmWalletAddress,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Error)]
pub enum GetUserByTokenError {
    #[error(transparent)]
    AccessToken(AccessTokenError),

    #[error("User pointed by the token could not be resolved")]
    UserUnresolved,

    #[error(transparent)]
    Internal(#[from] InternalError),
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
