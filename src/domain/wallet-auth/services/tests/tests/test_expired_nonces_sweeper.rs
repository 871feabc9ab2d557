// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::Duration;
use pretty_assertions::assert_eq;
use time_source::SystemTimeSource;
use wallet_auth::*;
use wallet_auth_services::ExpiredNoncesSweeper;

use crate::tests::utils::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_run_once_purges_only_expired() {
    let harness = Web3AuthHarness::new();
    let sweeper = harness.catalog.get_one::<ExpiredNoncesSweeper>().unwrap();

    let old = harness.nonce_service.create_nonce(None).await.unwrap();
    harness.time_source.advance(Duration::seconds(200));
    let fresh = harness.nonce_service.create_nonce(None).await.unwrap();

    assert_eq!(sweeper.run_once().await.unwrap(), 0);

    harness.time_source.advance(Duration::seconds(100));
    assert_eq!(sweeper.run_once().await.unwrap(), 1);
    assert_eq!(sweeper.run_once().await.unwrap(), 0);

    let wallet = TestWallet::from_seed(0x01);
    assert!(
        harness
            .nonce_service
            .consume_nonce(&fresh.nonce, &wallet.address)
            .await
            .is_ok()
    );
    assert!(matches!(
        harness
            .nonce_service
            .consume_nonce(&old.nonce, &wallet.address)
            .await,
        Err(ConsumeWalletNonceError::NotFound(_))
    ));
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_run_sweeps_periodically() {
    let harness = Web3AuthHarness::new();
    let sweeper = harness.catalog.get_one::<ExpiredNoncesSweeper>().unwrap();
    let nonce_repo = harness
        .catalog
        .get_one::<dyn Web3AuthNonceRepository>()
        .unwrap();

    harness.nonce_service.create_nonce(None).await.unwrap();

    let sweeper_task = tokio::spawn(async move { sweeper.run().await });

    while harness.time_source.sleepers_count() == 0 {
        tokio::task::yield_now().await;
    }

    // Wakes up the sweeper, which purges and goes back to sleep
    harness
        .time_source
        .advance(Duration::seconds(DEFAULT_NONCE_TTL_SECONDS));
    while harness.time_source.sleepers_count() == 0 {
        tokio::task::yield_now().await;
    }

    assert_eq!(
        nonce_repo
            .cleanup_expired_nonces(harness.time_source.now())
            .await,
        Ok(0)
    );

    sweeper_task.abort();
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_run_once_times_out() {
    let harness = Web3AuthHarness::with_stalled_nonce_repo(Web3AuthConfig {
        collaborator_timeout: std::time::Duration::from_millis(20),
        ..Default::default()
    });
    let sweeper = harness.catalog.get_one::<ExpiredNoncesSweeper>().unwrap();

    assert!(sweeper.run_once().await.is_err());
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
