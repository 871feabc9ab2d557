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

use crate::{EvmWalletAddress, User, UserId};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg_attr(any(feature = "testing", test), mockall::automock)]
#[async_trait::async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_user_by_wallet(
        &self,
        wallet: &EvmWalletAddress,
    ) -> Result<Option<User>, FindUserError>;

    async fn find_user_by_id(&self, user_id: &UserId) -> Result<Option<User>, FindUserError>;

    /// Returns the user owning the wallet, registering a new active one if
    /// there is none yet. Concurrent calls for the same wallet converge on a
    /// single user.
    async fn upsert_user(
        &self,
        wallet: &EvmWalletAddress,
        now: DateTime<Utc>,
    ) -> Result<User, UpsertUserError>;

    /// Atomically increments the login counter and sets the last login time
    async fn record_login(&self, user_id: &UserId, at: DateTime<Utc>)
    -> Result<User, RecordLoginError>;

    async fn users_count(&self) -> Result<usize, UsersCountError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum FindUserError {
    #[error(transparent)]
    Internal(#[from] InternalError),
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum UsersCountError {
    #[error(transparent)]
    Internal(#[from] InternalError),
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum UpsertUserError {
    #[error(transparent)]
    Internal(#[from] InternalError),
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum RecordLoginError {
    #[error(transparent)]
    NotFound(UserNotFoundError),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("User '{user_id}' not found")]
pub struct UserNotFoundError {
    pub user_id: UserId,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
