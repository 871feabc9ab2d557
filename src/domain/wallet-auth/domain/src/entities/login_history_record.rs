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

use crate::UserId;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub const LOGIN_FAILURE_REASON_IDENTITY_MISMATCH: &str = "identity mismatch";

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginContext {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginHistoryRecord {
    pub id: Uuid,
    pub user_id: UserId,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub success: bool,
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl LoginHistoryRecord {
    pub fn success(user_id: UserId, context: &LoginContext, created_at: DateTime<Utc>) -> Self {
        Self::new(user_id, context, None, created_at)
    }

    pub fn failure(
        user_id: UserId,
        context: &LoginContext,
        reason: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self::new(user_id, context, Some(reason.into()), created_at)
    }

    fn new(
        user_id: UserId,
        context: &LoginContext,
        failure_reason: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            ip_address: context.ip_address.clone(),
            user_agent: context.user_agent.clone(),
            success: failure_reason.is_none(),
            failure_reason,
            created_at,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
