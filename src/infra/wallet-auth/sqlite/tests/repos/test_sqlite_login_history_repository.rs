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
async fn test_no_login_history_initially() {
    let harness = SqliteRepositoryHarness::new().await;
    wallet_auth_repo_tests::test_no_login_history_initially(&harness.catalog).await;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_append_login_history() {
    let harness = SqliteRepositoryHarness::new().await;
    wallet_auth_repo_tests::test_append_login_history(&harness.catalog).await;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_login_history_requires_existing_user() {
    use wallet_auth::{LoginContext, LoginHistoryRecord, LoginHistoryRepository, UserId};

    let harness = SqliteRepositoryHarness::new().await;
    let login_history_repo = harness
        .catalog
        .get_one::<dyn LoginHistoryRepository>()
        .unwrap();

    let record = LoginHistoryRecord::success(
        UserId::new_v4(),
        &LoginContext::default(),
        chrono::Utc::now(),
    );

    assert!(login_history_repo.append(&record).await.is_err());
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
