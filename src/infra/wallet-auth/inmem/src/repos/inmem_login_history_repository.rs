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

use dill::*;

use crate::domain::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct InMemoryLoginHistoryRepository {
    state: Arc<Mutex<State>>,
}

#[derive(Default)]
struct State {
    // Kept in insertion order
    records_by_user: HashMap<UserId, Vec<LoginHistoryRecord>>,
}

impl State {
    fn new() -> Self {
        Self::default()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[component(pub)]
#[interface(dyn LoginHistoryRepository)]
#[scope(Singleton)]
impl InMemoryLoginHistoryRepository {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State::new())),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait]
impl LoginHistoryRepository for InMemoryLoginHistoryRepository {
    async fn append(&self, record: &LoginHistoryRecord) -> Result<(), AppendLoginHistoryError> {
        let mut guard = self.state.lock().unwrap();

        guard
            .records_by_user
            .entry(record.user_id)
            .or_default()
            .push(record.clone());

        Ok(())
    }

    async fn get_user_login_history(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<LoginHistoryRecord>, GetLoginHistoryError> {
        let guard = self.state.lock().unwrap();

        let Some(records) = guard.records_by_user.get(user_id) else {
            return Ok(vec![]);
        };

        // Newest first, ties keep reverse insertion order
        let mut records = records.iter().rev().cloned().collect::<Vec<_>>();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records.truncate(limit);

        Ok(records)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
