// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;
use time_source::SystemTimeSourceStub;
use wallet_auth::*;
use wallet_auth_services::JwtTokenIssuer;

use crate::tests::utils::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

fn make_issuer(jwt_secret: &str, time_source: SystemTimeSourceStub) -> JwtTokenIssuer {
    JwtTokenIssuer::new(
        Arc::new(JwtAuthenticationConfig::new(Some(jwt_secret.to_string()))),
        Arc::new(time_source),
    )
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test]
fn test_issue_and_decode_token() {
    let issuer = make_issuer(TEST_JWT_SECRET, SystemTimeSourceStub::new_set(t0()));

    let user_id = UserId::new_v4();
    let wallet = TestWallet::from_seed(0x01).address;

    let token = issuer.issue_token(&user_id, &wallet).unwrap();
    let decoded = issuer.decode_token(&token).unwrap();

    assert_eq!(
        decoded,
        SessionToken {
            user_id,
            wallet,
            issued_at: t0(),
            expires_at: t0() + Duration::seconds(DEFAULT_TOKEN_LIFETIME_SECONDS),
        }
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test]
fn test_decode_expired_token() {
    let long_ago = Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0).unwrap();
    let issuer = make_issuer(TEST_JWT_SECRET, SystemTimeSourceStub::new_set(long_ago));

    let token = issuer
        .issue_token(&UserId::new_v4(), &TestWallet::from_seed(0x01).address)
        .unwrap();

    assert!(matches!(
        issuer.decode_token(&token),
        Err(AccessTokenError::Expired)
    ));
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test]
fn test_decode_token_signed_with_another_secret() {
    let foreign_issuer = make_issuer("another-secret", SystemTimeSourceStub::new_set(t0()));
    let issuer = make_issuer(TEST_JWT_SECRET, SystemTimeSourceStub::new_set(t0()));

    let token = foreign_issuer
        .issue_token(&UserId::new_v4(), &TestWallet::from_seed(0x01).address)
        .unwrap();

    assert!(matches!(
        issuer.decode_token(&token),
        Err(AccessTokenError::Invalid(_))
    ));
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test]
fn test_decode_garbage() {
    let issuer = make_issuer(TEST_JWT_SECRET, SystemTimeSourceStub::new_set(t0()));

    for token in ["", "abc", "a.b.c"] {
        assert!(
            matches!(issuer.decode_token(token), Err(AccessTokenError::Invalid(_))),
            "{token}"
        );
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
