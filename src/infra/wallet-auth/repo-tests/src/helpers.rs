// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::{DateTime, Duration, TimeZone, Utc};
use wallet_auth::{EvmWalletAddress, LoginContext, Web3AuthNonce, Web3AuthNonceEntity};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub(crate) const NONCE_TTL_SECONDS: i64 = 300;

pub(crate) fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2050, 1, 2, 12, 0, 0).unwrap()
}

pub(crate) fn wallet(byte: u8) -> EvmWalletAddress {
    EvmWalletAddress::repeat_byte(byte)
}

pub(crate) fn new_nonce_entity(
    issued_at: DateTime<Utc>,
    bound_wallet: Option<EvmWalletAddress>,
) -> Web3AuthNonceEntity {
    Web3AuthNonceEntity {
        nonce: Web3AuthNonce::new(),
        bound_wallet,
        issued_at,
        expires_at: issued_at + Duration::seconds(NONCE_TTL_SECONDS),
    }
}

pub(crate) fn login_context(ip_address: &str) -> LoginContext {
    LoginContext {
        ip_address: Some(ip_address.to_string()),
        user_agent: Some("repo-tests".to_string()),
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
