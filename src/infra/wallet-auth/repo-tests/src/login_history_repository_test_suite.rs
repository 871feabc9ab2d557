// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::Duration;
use dill::Catalog;
use pretty_assertions::assert_eq;
use wallet_auth::*;

use crate::helpers::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_no_login_history_initially(catalog: &Catalog) {
    let user_repo = catalog.get_one::<dyn UserRepository>().unwrap();
    let login_history_repo = catalog.get_one::<dyn LoginHistoryRepository>().unwrap();

    let user = user_repo.upsert_user(&wallet(0xAA), t0()).await.unwrap();

    assert_eq!(
        login_history_repo
            .get_user_login_history(&user.id, 10)
            .await
            .unwrap(),
        vec![]
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_append_login_history(catalog: &Catalog) {
    let user_repo = catalog.get_one::<dyn UserRepository>().unwrap();
    let login_history_repo = catalog.get_one::<dyn LoginHistoryRepository>().unwrap();

    let user_a = user_repo.upsert_user(&wallet(0xAA), t0()).await.unwrap();
    let user_b = user_repo.upsert_user(&wallet(0xBB), t0()).await.unwrap();

    let first = LoginHistoryRecord::success(
        user_a.id,
        &login_context("10.0.0.1"),
        t0() + Duration::seconds(1),
    );
    let second = LoginHistoryRecord::failure(
        user_a.id,
        &LoginContext::default(),
        LOGIN_FAILURE_REASON_IDENTITY_MISMATCH,
        t0() + Duration::seconds(2),
    );
    let third = LoginHistoryRecord::success(
        user_a.id,
        &login_context("10.0.0.3"),
        t0() + Duration::seconds(3),
    );
    let other_user = LoginHistoryRecord::success(
        user_b.id,
        &login_context("10.0.0.4"),
        t0() + Duration::seconds(4),
    );

    for record in [&first, &second, &third, &other_user] {
        login_history_repo.append(record).await.unwrap();
    }

    assert_eq!(
        login_history_repo
            .get_user_login_history(&user_a.id, 10)
            .await
            .unwrap(),
        vec![third.clone(), second.clone(), first]
    );
    assert_eq!(
        login_history_repo
            .get_user_login_history(&user_a.id, 2)
            .await
            .unwrap(),
        vec![third, second]
    );
    assert_eq!(
        login_history_repo
            .get_user_login_history(&user_b.id, 10)
            .await
            .unwrap(),
        vec![other_user]
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
