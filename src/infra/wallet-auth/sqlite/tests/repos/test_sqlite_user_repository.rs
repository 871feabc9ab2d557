// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::repos::sqlite_harness::SqliteRepositoryHarness;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_no_users_initially() {
    let harness = SqliteRepositoryHarness::new().await;
    wallet_auth_repo_tests::test_no_users_initially(&harness.catalog).await;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_upsert_user_creates_once() {
    let harness = SqliteRepositoryHarness::new().await;
    wallet_auth_repo_tests::test_upsert_user_creates_once(&harness.catalog).await;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_upsert_distinct_wallets() {
    let harness = SqliteRepositoryHarness::new().await;
    wallet_auth_repo_tests::test_upsert_distinct_wallets(&harness.catalog).await;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_record_login() {
    let harness = SqliteRepositoryHarness::new().await;
    wallet_auth_repo_tests::test_record_login(&harness.catalog).await;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_record_login_of_unknown_user() {
    let harness = SqliteRepositoryHarness::new().await;
    wallet_auth_repo_tests::test_record_login_of_unknown_user(&harness.catalog).await;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_concurrent_upsert_converges() {
    let harness = SqliteRepositoryHarness::new().await;
    wallet_auth_repo_tests::test_concurrent_upsert_converges(&harness.catalog).await;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test(flavor = "multi_thread", worker_threads = 4))]
async fn test_concurrent_upsert_converges_across_connections() {
    let harness = SqliteRepositoryHarness::new_file_backed().await;
    wallet_auth_repo_tests::test_concurrent_upsert_converges(&harness.catalog).await;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
