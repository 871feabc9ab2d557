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

pub async fn test_consume_unknown_nonce(catalog: &Catalog) {
    let nonce_repo = catalog.get_one::<dyn Web3AuthNonceRepository>().unwrap();

    let nonce = Web3AuthNonce::new();
    let res = nonce_repo.consume_nonce(&nonce, t0()).await;

    assert_eq!(
        res,
        Err(ConsumeNonceError::NotFound(NonceNotFoundError { nonce }))
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_set_and_consume_nonce(catalog: &Catalog) {
    let nonce_repo = catalog.get_one::<dyn Web3AuthNonceRepository>().unwrap();

    let unbound = new_nonce_entity(t0(), None);
    let bound = new_nonce_entity(t0(), Some(wallet(0xAA)));

    assert_eq!(nonce_repo.set_nonce(&unbound).await, Ok(()));
    assert_eq!(nonce_repo.set_nonce(&bound).await, Ok(()));

    let now = t0() + Duration::seconds(10);

    assert_eq!(
        nonce_repo.consume_nonce(&bound.nonce, now).await,
        Ok(bound.clone())
    );
    assert_eq!(
        nonce_repo.consume_nonce(&unbound.nonce, now).await,
        Ok(unbound.clone())
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_consume_nonce_only_once(catalog: &Catalog) {
    let nonce_repo = catalog.get_one::<dyn Web3AuthNonceRepository>().unwrap();

    let entity = new_nonce_entity(t0(), None);
    nonce_repo.set_nonce(&entity).await.unwrap();

    let now = t0() + Duration::seconds(1);

    assert_eq!(
        nonce_repo.consume_nonce(&entity.nonce, now).await,
        Ok(entity.clone())
    );
    assert_eq!(
        nonce_repo.consume_nonce(&entity.nonce, now).await,
        Err(ConsumeNonceError::NotFound(NonceNotFoundError {
            nonce: entity.nonce.clone()
        }))
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_set_duplicate_nonce(catalog: &Catalog) {
    let nonce_repo = catalog.get_one::<dyn Web3AuthNonceRepository>().unwrap();

    let entity = new_nonce_entity(t0(), None);
    nonce_repo.set_nonce(&entity).await.unwrap();

    let duplicate = Web3AuthNonceEntity {
        bound_wallet: Some(wallet(0xBB)),
        ..entity.clone()
    };

    assert_eq!(
        nonce_repo.set_nonce(&duplicate).await,
        Err(SetNonceError::Duplicate {
            nonce: entity.nonce.clone()
        })
    );

    // The original entry is untouched
    assert_eq!(
        nonce_repo.consume_nonce(&entity.nonce, t0()).await,
        Ok(entity)
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_consume_expired_nonce(catalog: &Catalog) {
    let nonce_repo = catalog.get_one::<dyn Web3AuthNonceRepository>().unwrap();

    let almost_expired = new_nonce_entity(t0(), None);
    let expired = new_nonce_entity(t0(), None);

    nonce_repo.set_nonce(&almost_expired).await.unwrap();
    nonce_repo.set_nonce(&expired).await.unwrap();

    let last_valid_moment = almost_expired.expires_at - Duration::seconds(1);
    assert_eq!(
        nonce_repo
            .consume_nonce(&almost_expired.nonce, last_valid_moment)
            .await,
        Ok(almost_expired)
    );

    // A nonce is no longer valid exactly at its expiry time
    assert_eq!(
        nonce_repo
            .consume_nonce(&expired.nonce, expired.expires_at)
            .await,
        Err(ConsumeNonceError::NotFound(NonceNotFoundError {
            nonce: expired.nonce.clone()
        }))
    );

    // Expired entries do not come back when the clock is wrong
    assert_eq!(
        nonce_repo.consume_nonce(&expired.nonce, t0()).await,
        Err(ConsumeNonceError::NotFound(NonceNotFoundError {
            nonce: expired.nonce.clone()
        }))
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_delete_nonce(catalog: &Catalog) {
    let nonce_repo = catalog.get_one::<dyn Web3AuthNonceRepository>().unwrap();

    let entity = new_nonce_entity(t0(), None);
    nonce_repo.set_nonce(&entity).await.unwrap();

    assert_eq!(nonce_repo.delete_nonce(&entity.nonce).await, Ok(()));
    // Deleting a missing nonce is not an error
    assert_eq!(nonce_repo.delete_nonce(&entity.nonce).await, Ok(()));

    assert_eq!(
        nonce_repo.consume_nonce(&entity.nonce, t0()).await,
        Err(ConsumeNonceError::NotFound(NonceNotFoundError {
            nonce: entity.nonce.clone()
        }))
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_cleanup_expired_nonces(catalog: &Catalog) {
    let nonce_repo = catalog.get_one::<dyn Web3AuthNonceRepository>().unwrap();

    let old_1 = new_nonce_entity(t0(), None);
    let old_2 = new_nonce_entity(t0(), Some(wallet(0x01)));
    let fresh = new_nonce_entity(t0() + Duration::seconds(200), None);

    for entity in [&old_1, &old_2, &fresh] {
        nonce_repo.set_nonce(entity).await.unwrap();
    }

    assert_eq!(nonce_repo.cleanup_expired_nonces(t0()).await, Ok(0));

    let now = old_1.expires_at;
    assert_eq!(nonce_repo.cleanup_expired_nonces(now).await, Ok(2));
    assert_eq!(nonce_repo.cleanup_expired_nonces(now).await, Ok(0));

    assert_eq!(
        nonce_repo.consume_nonce(&old_1.nonce, t0()).await,
        Err(ConsumeNonceError::NotFound(NonceNotFoundError {
            nonce: old_1.nonce.clone()
        }))
    );
    assert_eq!(nonce_repo.consume_nonce(&fresh.nonce, now).await, Ok(fresh));
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_concurrent_consume_single_winner(catalog: &Catalog) {
    const ATTEMPTS: usize = 16;

    let nonce_repo = catalog.get_one::<dyn Web3AuthNonceRepository>().unwrap();

    let entity = new_nonce_entity(t0(), None);
    nonce_repo.set_nonce(&entity).await.unwrap();

    let now = t0() + Duration::seconds(5);
    let results = futures::future::join_all(
        (0..ATTEMPTS).map(|_| nonce_repo.consume_nonce(&entity.nonce, now)),
    )
    .await;

    let successes = results.iter().filter(|res| res.is_ok()).count();
    let not_found = results
        .iter()
        .filter(|res| matches!(res, Err(ConsumeNonceError::NotFound(_))))
        .count();

    assert_eq!(successes, 1);
    assert_eq!(not_found, ATTEMPTS - 1);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
