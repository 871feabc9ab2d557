// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::net::SocketAddr;

use chrono::Duration;
use wallet_auth_adapter_http::ClientInfoConfig;
use wallet_auth::{
    DEFAULT_COLLABORATOR_TIMEOUT,
    DEFAULT_NONCE_TTL_SECONDS,
    DEFAULT_SWEEP_INTERVAL_SECONDS,
    DEFAULT_TOKEN_LIFETIME_SECONDS,
    JwtAuthenticationConfig,
    Web3AuthConfig,
};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub const BINARY_NAME: &str = "wallet-auth-server";

/// Challenge-response authentication for EVM wallets
#[derive(Debug, clap::Parser)]
#[command(name = BINARY_NAME, version, about)]
pub struct Cli {
    /// Address to listen on
    #[arg(long, env = "WALLET_AUTH_LISTEN", default_value = "127.0.0.1:3000")]
    pub listen: SocketAddr,

    /// Where nonces, users and login history are kept
    #[arg(
        long,
        env = "WALLET_AUTH_STORAGE",
        value_enum,
        default_value_t = StorageBackend::Inmem
    )]
    pub storage: StorageBackend,

    /// Database to use with the `sqlite` storage
    #[arg(
        long,
        env = "WALLET_AUTH_DATABASE_URL",
        default_value = "sqlite://wallet-auth.db"
    )]
    pub database_url: String,

    /// How long an issued nonce stays usable
    #[arg(
        long,
        env = "WALLET_AUTH_NONCE_TTL",
        value_parser = clap::value_parser!(i64).range(1..),
        default_value_t = DEFAULT_NONCE_TTL_SECONDS
    )]
    pub nonce_ttl_seconds: i64,

    /// Period of the expired nonces purge
    #[arg(
        long,
        env = "WALLET_AUTH_SWEEP_INTERVAL",
        value_parser = clap::value_parser!(i64).range(1..),
        default_value_t = DEFAULT_SWEEP_INTERVAL_SECONDS
    )]
    pub sweep_interval_seconds: i64,

    /// Upper bound for a single storage call
    #[arg(
        long,
        env = "WALLET_AUTH_STORAGE_TIMEOUT_MS",
        default_value_t = u64::try_from(DEFAULT_COLLABORATOR_TIMEOUT.as_millis()).unwrap_or(u64::MAX)
    )]
    pub storage_timeout_ms: u64,

    /// Keep a wallet-bound nonce usable by its owner after another wallet
    /// has presented it
    #[arg(long, env = "WALLET_AUTH_ALLOW_BOUND_OWNER_RETRY")]
    pub allow_bound_owner_retry: bool,

    /// Record the first `X-Forwarded-For` hop as the client address. Enable
    /// only behind a reverse proxy that sets the header.
    #[arg(long, env = "WALLET_AUTH_TRUST_FORWARDED_FOR")]
    pub trust_forwarded_for: bool,

    /// Lifetime of issued session tokens
    #[arg(
        long,
        env = "WALLET_AUTH_TOKEN_LIFETIME",
        value_parser = clap::value_parser!(i64).range(1..),
        default_value_t = DEFAULT_TOKEN_LIFETIME_SECONDS
    )]
    pub token_lifetime_seconds: i64,

    /// Sets the level of verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Format of log records written to STDERR
    #[arg(
        long,
        env = "WALLET_AUTH_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Text
    )]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StorageBackend {
    Inmem,
    Sqlite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

impl Cli {
    pub fn web3_auth_config(&self) -> Web3AuthConfig {
        Web3AuthConfig {
            nonce_ttl: Duration::seconds(self.nonce_ttl_seconds),
            sweep_interval: Duration::seconds(self.sweep_interval_seconds),
            collaborator_timeout: std::time::Duration::from_millis(self.storage_timeout_ms),
            allow_bound_owner_retry: self.allow_bound_owner_retry,
        }
    }

    pub fn client_info_config(&self) -> ClientInfoConfig {
        ClientInfoConfig {
            trust_forwarded_for: self.trust_forwarded_for,
        }
    }

    /// The signing secret comes from the environment only
    pub fn jwt_authentication_config(&self) -> JwtAuthenticationConfig {
        JwtAuthenticationConfig {
            token_lifetime: Duration::seconds(self.token_lifetime_seconds),
            ..JwtAuthenticationConfig::load_from_env()
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
