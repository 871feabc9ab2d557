// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::Duration;
use rand::Rng;
use rand::distributions::Alphanumeric;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub const ENV_VAR_WALLET_AUTH_JWT_SECRET: &str = "WALLET_AUTH_JWT_SECRET";

pub const DEFAULT_NONCE_TTL_SECONDS: i64 = 5 * 60;
pub const DEFAULT_SWEEP_INTERVAL_SECONDS: i64 = 60;
pub const DEFAULT_COLLABORATOR_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);

pub const DEFAULT_JWT_ISSUER: &str = "wallet-auth";
pub const DEFAULT_TOKEN_LIFETIME_SECONDS: i64 = 24 * 60 * 60;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone)]
pub struct Web3AuthConfig {
    /// How long an issued nonce stays usable
    pub nonce_ttl: Duration,

    /// Period of the background purge of expired nonces
    pub sweep_interval: Duration,

    /// Upper bound for every storage call made while serving a single request
    pub collaborator_timeout: std::time::Duration,

    /// When a nonce bound to wallet A is presented by wallet B, the attempt
    /// always fails. With this flag the nonce is put back so that A can still
    /// use it until it expires, otherwise it is gone for good.
    pub allow_bound_owner_retry: bool,
}

impl Default for Web3AuthConfig {
    fn default() -> Self {
        Self {
            nonce_ttl: Duration::seconds(DEFAULT_NONCE_TTL_SECONDS),
            sweep_interval: Duration::seconds(DEFAULT_SWEEP_INTERVAL_SECONDS),
            collaborator_timeout: DEFAULT_COLLABORATOR_TIMEOUT,
            allow_bound_owner_retry: false,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone)]
pub struct JwtAuthenticationConfig {
    pub jwt_secret: String,
    pub issuer: String,
    pub token_lifetime: Duration,
}

impl JwtAuthenticationConfig {
    pub fn new(maybe_jwt_secret: Option<String>) -> Self {
        Self {
            jwt_secret: maybe_jwt_secret.unwrap_or_else(generate_random_secret),
            issuer: DEFAULT_JWT_ISSUER.to_string(),
            token_lifetime: Duration::seconds(DEFAULT_TOKEN_LIFETIME_SECONDS),
        }
    }

    pub fn load_from_env() -> Self {
        let maybe_jwt_secret = std::env::var(ENV_VAR_WALLET_AUTH_JWT_SECRET)
            .ok()
            .filter(|secret| !secret.is_empty());

        if maybe_jwt_secret.is_none() {
            tracing::warn!(
                "{ENV_VAR_WALLET_AUTH_JWT_SECRET} is not set, using a random secret: issued tokens \
                 will not survive a restart"
            );
        }

        Self::new(maybe_jwt_secret)
    }
}

impl Default for JwtAuthenticationConfig {
    fn default() -> Self {
        Self::new(None)
    }
}

fn generate_random_secret() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
