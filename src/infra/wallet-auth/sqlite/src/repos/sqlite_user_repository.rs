// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::{DateTime, Utc};
use dill::{component, interface};
use internal_error::{InternalError, ResultIntoInternal};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::domain::*;
use crate::timestamps::{from_micros, to_micros};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct SqliteUserRepository {
    pool: SqlitePool,
}

#[component(pub)]
#[interface(dyn UserRepository)]
impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait]
impl UserRepository for SqliteUserRepository {
    async fn find_user_by_wallet(
        &self,
        wallet: &EvmWalletAddress,
    ) -> Result<Option<User>, FindUserError> {
        let maybe_row = sqlx::query_as::<_, UserRowModel>(
            r#"
            SELECT id, wallet_address, is_active, login_count, last_login_at, created_at, updated_at
            FROM users
            WHERE wallet_address = $1
            "#,
        )
        .bind(EvmWalletAddressConvertor::canonical_string(wallet))
        .fetch_optional(&self.pool)
        .await
        .int_err()?;

        Ok(maybe_row.map(User::try_from).transpose()?)
    }

    async fn find_user_by_id(&self, user_id: &UserId) -> Result<Option<User>, FindUserError> {
        let maybe_row = sqlx::query_as::<_, UserRowModel>(
            r#"
            SELECT id, wallet_address, is_active, login_count, last_login_at, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .int_err()?;

        Ok(maybe_row.map(User::try_from).transpose()?)
    }

    async fn upsert_user(
        &self,
        wallet: &EvmWalletAddress,
        now: DateTime<Utc>,
    ) -> Result<User, UpsertUserError> {
        let wallet_address = EvmWalletAddressConvertor::canonical_string(wallet);
        let new_user = User::new(*wallet, now);

        // Concurrent first logins of one wallet race on the unique address,
        // the losers read back the winner's row
        sqlx::query(
            r#"
            INSERT INTO users (id, wallet_address, is_active, login_count, last_login_at, created_at, updated_at)
                VALUES ($1, $2, $3, $4, NULL, $5, $6)
                ON CONFLICT (wallet_address) DO NOTHING
            "#,
        )
        .bind(new_user.id.to_string())
        .bind(&wallet_address)
        .bind(new_user.is_active)
        .bind(0_i64)
        .bind(to_micros(new_user.created_at))
        .bind(to_micros(new_user.updated_at))
        .execute(&self.pool)
        .await
        .int_err()?;

        let row = sqlx::query_as::<_, UserRowModel>(
            r#"
            SELECT id, wallet_address, is_active, login_count, last_login_at, created_at, updated_at
            FROM users
            WHERE wallet_address = $1
            "#,
        )
        .bind(&wallet_address)
        .fetch_one(&self.pool)
        .await
        .int_err()?;

        Ok(User::try_from(row)?)
    }

    async fn record_login(
        &self,
        user_id: &UserId,
        at: DateTime<Utc>,
    ) -> Result<User, RecordLoginError> {
        let maybe_row = sqlx::query_as::<_, UserRowModel>(
            r#"
            UPDATE users
            SET login_count   = login_count + 1,
                last_login_at = $2,
                updated_at    = $2
            WHERE id = $1
            RETURNING id, wallet_address, is_active, login_count, last_login_at, created_at, updated_at
            "#,
        )
        .bind(user_id.to_string())
        .bind(to_micros(at))
        .fetch_optional(&self.pool)
        .await
        .int_err()?;

        match maybe_row {
            Some(row) => Ok(User::try_from(row)?),
            None => Err(RecordLoginError::NotFound(UserNotFoundError {
                user_id: *user_id,
            })),
        }
    }

    async fn users_count(&self) -> Result<usize, UsersCountError> {
        let users_count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM users
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .int_err()?;

        Ok(usize::try_from(users_count).int_err()?)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(sqlx::FromRow)]
struct UserRowModel {
    id: String,
    wallet_address: String,
    is_active: bool,
    login_count: i64,
    last_login_at: Option<i64>,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<UserRowModel> for User {
    type Error = InternalError;

    fn try_from(row: UserRowModel) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&row.id).int_err()?,
            wallet_address: EvmWalletAddressConvertor::parse(&row.wallet_address).int_err()?,
            is_active: row.is_active,
            login_count: u64::try_from(row.login_count).int_err()?,
            last_login_at: row.last_login_at.map(from_micros).transpose()?,
            created_at: from_micros(row.created_at)?,
            updated_at: from_micros(row.updated_at)?,
        })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
