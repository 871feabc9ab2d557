// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use dill::*;

use crate::domain::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct InMemoryUserRepository {
    state: Arc<Mutex<State>>,
}

#[derive(Default)]
struct State {
    users_by_id: HashMap<UserId, User>,
    user_id_by_wallet: HashMap<EvmWalletAddress, UserId>,
}

impl State {
    fn new() -> Self {
        Self::default()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[component(pub)]
#[interface(dyn UserRepository)]
#[scope(Singleton)]
impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State::new())),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_user_by_wallet(
        &self,
        wallet: &EvmWalletAddress,
    ) -> Result<Option<User>, FindUserError> {
        let guard = self.state.lock().unwrap();

        Ok(guard
            .user_id_by_wallet
            .get(wallet)
            .and_then(|user_id| guard.users_by_id.get(user_id))
            .cloned())
    }

    async fn find_user_by_id(&self, user_id: &UserId) -> Result<Option<User>, FindUserError> {
        let guard = self.state.lock().unwrap();

        Ok(guard.users_by_id.get(user_id).cloned())
    }

    async fn upsert_user(
        &self,
        wallet: &EvmWalletAddress,
        now: DateTime<Utc>,
    ) -> Result<User, UpsertUserError> {
        let mut guard = self.state.lock().unwrap();

        if let Some(user) = guard
            .user_id_by_wallet
            .get(wallet)
            .and_then(|user_id| guard.users_by_id.get(user_id))
        {
            return Ok(user.clone());
        }

        let user = User::new(*wallet, now);
        guard.user_id_by_wallet.insert(*wallet, user.id);
        guard.users_by_id.insert(user.id, user.clone());

        Ok(user)
    }

    async fn record_login(
        &self,
        user_id: &UserId,
        at: DateTime<Utc>,
    ) -> Result<User, RecordLoginError> {
        let mut guard = self.state.lock().unwrap();

        let Some(user) = guard.users_by_id.get_mut(user_id) else {
            return Err(RecordLoginError::NotFound(UserNotFoundError {
                user_id: *user_id,
            }));
        };

        user.record_login(at);

        Ok(user.clone())
    }

    async fn users_count(&self) -> Result<usize, UsersCountError> {
        let guard = self.state.lock().unwrap();

        Ok(guard.users_by_id.len())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
