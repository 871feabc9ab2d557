// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::{DateTime, Utc};
use internal_error::{BoxedError, InternalError};
use thiserror::Error;

use crate::{EvmWalletAddress, UserId};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg_attr(any(feature = "testing", test), mockall::automock)]
pub trait TokenIssuer: Send + Sync {
    fn issue_token(
        &self,
        user_id: &UserId,
        wallet: &EvmWalletAddress,
    ) -> Result<String, InternalError>;

    fn decode_token(&self, token: &str) -> Result<SessionToken, AccessTokenError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    pub user_id: UserId,
    pub wallet: EvmWalletAddress,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Error)]
pub enum AccessTokenError {
    #[error("Invalid access token")]
    Invalid(#[source] BoxedError),

    #[error("Expired access token")]
    Expired,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
