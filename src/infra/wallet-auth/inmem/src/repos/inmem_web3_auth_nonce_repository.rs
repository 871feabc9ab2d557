// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use dill::*;

use crate::domain::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct InMemoryWeb3AuthNonceRepository {
    state: Arc<Mutex<State>>,
}

#[derive(Default)]
struct State {
    nonces: HashMap<Web3AuthNonce, Web3AuthNonceEntity>,
}

impl State {
    fn new() -> Self {
        Self::default()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[component(pub)]
#[interface(dyn Web3AuthNonceRepository)]
#[scope(Singleton)]
impl InMemoryWeb3AuthNonceRepository {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State::new())),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait]
impl Web3AuthNonceRepository for InMemoryWeb3AuthNonceRepository {
    async fn set_nonce(&self, entity: &Web3AuthNonceEntity) -> Result<(), SetNonceError> {
        let mut guard = self.state.lock().unwrap();

        match guard.nonces.entry(entity.nonce.clone()) {
            Entry::Occupied(_) => Err(SetNonceError::Duplicate {
                nonce: entity.nonce.clone(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(entity.clone());
                Ok(())
            }
        }
    }

    async fn consume_nonce(
        &self,
        nonce: &Web3AuthNonce,
        now: DateTime<Utc>,
    ) -> Result<Web3AuthNonceEntity, ConsumeNonceError> {
        let maybe_entity = {
            let mut guard = self.state.lock().unwrap();
            guard.nonces.remove(nonce)
        };

        match maybe_entity {
            Some(entity) if !entity.is_expired(now) => Ok(entity),
            _ => Err(ConsumeNonceError::NotFound(NonceNotFoundError {
                nonce: nonce.clone(),
            })),
        }
    }

    async fn delete_nonce(&self, nonce: &Web3AuthNonce) -> Result<(), DeleteNonceError> {
        let mut guard = self.state.lock().unwrap();
        guard.nonces.remove(nonce);

        Ok(())
    }

    async fn cleanup_expired_nonces(
        &self,
        now: DateTime<Utc>,
    ) -> Result<usize, CleanupExpiredNoncesError> {
        let mut guard = self.state.lock().unwrap();

        let count_before = guard.nonces.len();
        guard.nonces.retain(|_, entity| !entity.is_expired(now));

        Ok(count_before - guard.nonces.len())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
