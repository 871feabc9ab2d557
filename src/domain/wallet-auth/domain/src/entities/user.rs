// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::EvmWalletAddress;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub type UserId = Uuid;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub wallet_address: EvmWalletAddress,
    pub is_active: bool,
    pub login_count: u64,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// A user that has just been registered by its first wallet login
    pub fn new(wallet_address: EvmWalletAddress, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            wallet_address,
            is_active: true,
            login_count: 0,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn record_login(&mut self, at: DateTime<Utc>) {
        self.login_count += 1;
        self.last_login_at = Some(at);
        self.updated_at = at;
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
