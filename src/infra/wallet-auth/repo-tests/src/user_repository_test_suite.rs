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

pub async fn test_no_users_initially(catalog: &Catalog) {
    let user_repo = catalog.get_one::<dyn UserRepository>().unwrap();

    assert_eq!(user_repo.users_count().await.unwrap(), 0);
    assert_eq!(
        user_repo.find_user_by_wallet(&wallet(0x01)).await.unwrap(),
        None
    );
    assert_eq!(
        user_repo.find_user_by_id(&UserId::new_v4()).await.unwrap(),
        None
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_upsert_user_creates_once(catalog: &Catalog) {
    let user_repo = catalog.get_one::<dyn UserRepository>().unwrap();

    let wallet_a = wallet(0xAA);

    let created = user_repo.upsert_user(&wallet_a, t0()).await.unwrap();
    assert_eq!(created.wallet_address, wallet_a);
    assert!(created.is_active);
    assert_eq!(created.login_count, 0);
    assert_eq!(created.last_login_at, None);
    assert_eq!(created.created_at, t0());
    assert_eq!(created.updated_at, t0());

    // Second upsert returns the existing user untouched
    let existing = user_repo
        .upsert_user(&wallet_a, t0() + Duration::seconds(60))
        .await
        .unwrap();
    assert_eq!(existing, created);

    assert_eq!(user_repo.users_count().await.unwrap(), 1);
    assert_eq!(
        user_repo.find_user_by_wallet(&wallet_a).await.unwrap(),
        Some(created.clone())
    );
    assert_eq!(
        user_repo.find_user_by_id(&created.id).await.unwrap(),
        Some(created)
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_upsert_distinct_wallets(catalog: &Catalog) {
    let user_repo = catalog.get_one::<dyn UserRepository>().unwrap();

    let user_a = user_repo.upsert_user(&wallet(0xAA), t0()).await.unwrap();
    let user_b = user_repo.upsert_user(&wallet(0xBB), t0()).await.unwrap();

    assert_ne!(user_a.id, user_b.id);
    assert_eq!(user_repo.users_count().await.unwrap(), 2);
    assert_eq!(
        user_repo
            .find_user_by_wallet(&wallet(0xBB))
            .await
            .unwrap()
            .map(|user| user.id),
        Some(user_b.id)
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_record_login(catalog: &Catalog) {
    let user_repo = catalog.get_one::<dyn UserRepository>().unwrap();

    let user = user_repo.upsert_user(&wallet(0xAA), t0()).await.unwrap();

    let first_login_at = t0() + Duration::seconds(1);
    let second_login_at = t0() + Duration::seconds(2);

    let after_first = user_repo.record_login(&user.id, first_login_at).await.unwrap();
    assert_eq!(after_first.login_count, 1);
    assert_eq!(after_first.last_login_at, Some(first_login_at));
    assert_eq!(after_first.updated_at, first_login_at);
    assert_eq!(after_first.created_at, t0());

    let after_second = user_repo
        .record_login(&user.id, second_login_at)
        .await
        .unwrap();
    assert_eq!(after_second.login_count, 2);
    assert_eq!(after_second.last_login_at, Some(second_login_at));

    assert_eq!(
        user_repo.find_user_by_id(&user.id).await.unwrap(),
        Some(after_second)
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_record_login_of_unknown_user(catalog: &Catalog) {
    let user_repo = catalog.get_one::<dyn UserRepository>().unwrap();

    let user_id = UserId::new_v4();
    let res = user_repo.record_login(&user_id, t0()).await;

    assert!(
        matches!(res, Err(RecordLoginError::NotFound(UserNotFoundError { user_id: id })) if id == user_id),
        "{res:?}"
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_concurrent_upsert_converges(catalog: &Catalog) {
    const ATTEMPTS: usize = 8;

    let user_repo = catalog.get_one::<dyn UserRepository>().unwrap();

    let wallet_a = wallet(0xAA);
    let users = futures::future::join_all(
        (0..ATTEMPTS).map(|_| user_repo.upsert_user(&wallet_a, t0())),
    )
    .await
    .into_iter()
    .map(Result::unwrap)
    .collect::<Vec<_>>();

    let first_id = users[0].id;
    assert!(users.iter().all(|user| user.id == first_id));
    assert_eq!(user_repo.users_count().await.unwrap(), 1);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
