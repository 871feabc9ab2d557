// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use rand::RngCore;
use regex::Regex;

use crate::EvmWalletAddress;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

const NONCE_BYTES: usize = 16;

static WEB3_AUTH_NONCE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^(?:0[xX])?[0-9a-fA-F]+$").unwrap());

#[nutype::nutype(
    validate(regex = WEB3_AUTH_NONCE_REGEX),
    derive(AsRef, Clone, Debug, Display, Eq, PartialEq, Hash, TryFrom)
)]
pub struct Web3AuthNonce(String);

impl Web3AuthNonce {
    pub fn new() -> Self {
        let mut bytes = [0u8; NONCE_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);

        Self::try_new(hex::encode(bytes)).expect("Invalid nonce generated")
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Web3AuthNonceEntity {
    pub nonce: Web3AuthNonce,
    /// When set, only this wallet may consume the nonce
    pub bound_wallet: Option<EvmWalletAddress>,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Web3AuthNonceEntity {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////


////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
