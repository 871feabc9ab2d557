// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use dill::{component, interface};
use internal_error::{InternalError, ResultIntoInternal};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::domain::*;
use crate::timestamps::{from_micros, to_micros};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct SqliteLoginHistoryRepository {
    pool: SqlitePool,
}

#[component(pub)]
#[interface(dyn LoginHistoryRepository)]
impl SqliteLoginHistoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait]
impl LoginHistoryRepository for SqliteLoginHistoryRepository {
    async fn append(&self, record: &LoginHistoryRecord) -> Result<(), AppendLoginHistoryError> {
        sqlx::query(
            r#"
            INSERT INTO login_history (id, user_id, ip_address, user_agent, success, failure_reason, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(record.id.to_string())
        .bind(record.user_id.to_string())
        .bind(record.ip_address.as_deref())
        .bind(record.user_agent.as_deref())
        .bind(record.success)
        .bind(record.failure_reason.as_deref())
        .bind(to_micros(record.created_at))
        .execute(&self.pool)
        .await
        .int_err()?;

        Ok(())
    }

    async fn get_user_login_history(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<LoginHistoryRecord>, GetLoginHistoryError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let rows = sqlx::query_as::<_, LoginHistoryRecordRowModel>(
            r#"
            SELECT id, user_id, ip_address, user_agent, success, failure_reason, created_at
            FROM login_history
            WHERE user_id = $1
            ORDER BY created_at DESC, rowid DESC
            LIMIT $2
            "#,
        )
        .bind(user_id.to_string())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .int_err()?;

        Ok(rows
            .into_iter()
            .map(LoginHistoryRecord::try_from)
            .collect::<Result<Vec<_>, _>>()?)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(sqlx::FromRow)]
struct LoginHistoryRecordRowModel {
    id: String,
    user_id: String,
    ip_address: Option<String>,
    user_agent: Option<String>,
    success: bool,
    failure_reason: Option<String>,
    created_at: i64,
}

impl TryFrom<LoginHistoryRecordRowModel> for LoginHistoryRecord {
    type Error = InternalError;

    fn try_from(row: LoginHistoryRecordRowModel) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&row.id).int_err()?,
            user_id: Uuid::parse_str(&row.user_id).int_err()?,
            ip_address: row.ip_address,
            user_agent: row.user_agent,
            success: row.success,
            failure_reason: row.failure_reason,
            created_at: from_micros(row.created_at)?,
        })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
