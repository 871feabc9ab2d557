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
use internal_error::{ErrorIntoInternal, InternalError, ResultIntoInternal};
use sqlx::SqlitePool;

use crate::domain::*;
use crate::timestamps::{from_micros, to_micros};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct SqliteWeb3AuthNonceRepository {
    pool: SqlitePool,
}

#[component(pub)]
#[interface(dyn Web3AuthNonceRepository)]
impl SqliteWeb3AuthNonceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait]
impl Web3AuthNonceRepository for SqliteWeb3AuthNonceRepository {
    async fn set_nonce(&self, entity: &Web3AuthNonceEntity) -> Result<(), SetNonceError> {
        sqlx::query(
            r#"
            INSERT INTO web3_auth_nonces (nonce, bound_wallet, issued_at, expires_at)
                VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(entity.nonce.as_ref())
        .bind(
            entity
                .bound_wallet
                .as_ref()
                .map(EvmWalletAddressConvertor::canonical_string),
        )
        .bind(to_micros(entity.issued_at))
        .bind(to_micros(entity.expires_at))
        .execute(&self.pool)
        .await
        .map_err(|e: sqlx::Error| match e {
            sqlx::Error::Database(e) if e.is_unique_violation() => SetNonceError::Duplicate {
                nonce: entity.nonce.clone(),
            },
            _ => SetNonceError::Internal(e.int_err()),
        })?;

        Ok(())
    }

    async fn consume_nonce(
        &self,
        nonce: &Web3AuthNonce,
        now: DateTime<Utc>,
    ) -> Result<Web3AuthNonceEntity, ConsumeNonceError> {
        // Removal and read happen in one statement, so concurrent consumers
        // can never both receive the row
        let maybe_row = sqlx::query_as::<_, Web3AuthNonceRowModel>(
            r#"
            DELETE
            FROM web3_auth_nonces
            WHERE nonce = $1
            RETURNING nonce, bound_wallet, issued_at, expires_at
            "#,
        )
        .bind(nonce.as_ref())
        .fetch_optional(&self.pool)
        .await
        .int_err()?;

        let maybe_entity = maybe_row
            .map(Web3AuthNonceEntity::try_from)
            .transpose()?;

        match maybe_entity {
            Some(entity) if !entity.is_expired(now) => Ok(entity),
            _ => Err(ConsumeNonceError::NotFound(NonceNotFoundError {
                nonce: nonce.clone(),
            })),
        }
    }

    async fn delete_nonce(&self, nonce: &Web3AuthNonce) -> Result<(), DeleteNonceError> {
        sqlx::query(
            r#"
            DELETE
            FROM web3_auth_nonces
            WHERE nonce = $1
            "#,
        )
        .bind(nonce.as_ref())
        .execute(&self.pool)
        .await
        .int_err()?;

        Ok(())
    }

    async fn cleanup_expired_nonces(
        &self,
        now: DateTime<Utc>,
    ) -> Result<usize, CleanupExpiredNoncesError> {
        let delete_result = sqlx::query(
            r#"
            DELETE
            FROM web3_auth_nonces
            WHERE expires_at <= $1
            "#,
        )
        .bind(to_micros(now))
        .execute(&self.pool)
        .await
        .int_err()?;

        usize::try_from(delete_result.rows_affected())
            .int_err()
            .map_err(Into::into)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(sqlx::FromRow)]
struct Web3AuthNonceRowModel {
    nonce: String,
    bound_wallet: Option<String>,
    issued_at: i64,
    expires_at: i64,
}

impl TryFrom<Web3AuthNonceRowModel> for Web3AuthNonceEntity {
    type Error = InternalError;

    fn try_from(row: Web3AuthNonceRowModel) -> Result<Self, Self::Error> {
        Ok(Self {
            nonce: Web3AuthNonce::try_new(row.nonce).int_err()?,
            bound_wallet: row
                .bound_wallet
                .as_deref()
                .map(EvmWalletAddressConvertor::parse)
                .transpose()
                .int_err()?,
            issued_at: from_micros(row.issued_at)?,
            expires_at: from_micros(row.expires_at)?,
        })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
