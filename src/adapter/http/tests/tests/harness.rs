// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::net::SocketAddr;

use alloy_primitives::{Address, eip191_hash_message};
use axum::body::Body;
use axum::extract::ConnectInfo;
use chrono::{DateTime, TimeZone, Utc};
use dill::{Catalog, CatalogBuilder};
use http::{Request, StatusCode};
use k256::ecdsa::SigningKey;
use time_source::{SystemTimeSource, SystemTimeSourceStub};
use tower::ServiceExt;
use wallet_auth::*;
use wallet_auth_adapter_http::ClientInfoConfig;
use wallet_auth_inmem::{
    InMemoryLoginHistoryRepository,
    InMemoryUserRepository,
    InMemoryWeb3AuthNonceRepository,
};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub(crate) fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2050, 1, 2, 12, 0, 0).unwrap()
}

pub(crate) const TEST_USER_AGENT: &str = "wallet-auth-http-tests/1.0";

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub(crate) struct TestWallet {
    signing_key: SigningKey,
    pub address: EvmWalletAddress,
}

impl TestWallet {
    pub fn from_seed(seed: u8) -> Self {
        let signing_key = SigningKey::from_slice(&[seed; 32]).unwrap();
        let address = Address::from_private_key(&signing_key);

        Self {
            signing_key,
            address,
        }
    }

    pub fn address_lowercase(&self) -> String {
        EvmWalletAddressConvertor::canonical_string(&self.address)
    }

    pub fn sign(&self, message: &str) -> String {
        let hash = eip191_hash_message(message);
        let (signature, recovery_id) = self
            .signing_key
            .sign_prehash_recoverable(hash.as_slice())
            .unwrap();

        let mut bytes = signature.to_bytes().to_vec();
        bytes.push(27 + recovery_id.to_byte());

        format!("0x{}", hex::encode(bytes))
    }
}

pub(crate) fn challenge_message(nonce: &str) -> String {
    format!("Welcome!\n\nSign this message to log in.\n\nNonce: {nonce}\n")
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub(crate) struct ApiHarness {
    pub catalog: Catalog,
    router: axum::Router,
}

impl ApiHarness {
    pub fn new() -> Self {
        Self::with_client_info_config(ClientInfoConfig::default())
    }

    pub fn with_client_info_config(client_info_config: ClientInfoConfig) -> Self {
        Self::build(client_info_config, |b| {
            b.add::<InMemoryWeb3AuthNonceRepository>()
                .add::<InMemoryUserRepository>();
        })
    }

    /// Every storage call fails
    pub fn with_failing_storage() -> Self {
        let mut nonce_repo = MockWeb3AuthNonceRepository::new();
        nonce_repo.expect_set_nonce().returning(|_| {
            Err(SetNonceError::Internal(
                internal_error::InternalError::new("storage is down"),
            ))
        });
        nonce_repo.expect_consume_nonce().returning(|_, _| {
            Err(ConsumeNonceError::Internal(
                internal_error::InternalError::new("storage is down"),
            ))
        });

        let mut user_repo = MockUserRepository::new();
        user_repo.expect_users_count().returning(|| {
            Err(UsersCountError::Internal(
                internal_error::InternalError::new("storage is down"),
            ))
        });

        Self::build(ClientInfoConfig::default(), move |b| {
            b.add_value(nonce_repo)
                .bind::<dyn Web3AuthNonceRepository, MockWeb3AuthNonceRepository>()
                .add_value(user_repo)
                .bind::<dyn UserRepository, MockUserRepository>();
        })
    }

    fn build(
        client_info_config: ClientInfoConfig,
        add_repos: impl FnOnce(&mut CatalogBuilder),
    ) -> Self {
        let time_source = SystemTimeSourceStub::new_set(t0());

        let mut b = CatalogBuilder::new();
        b.add_value(time_source)
            .bind::<dyn SystemTimeSource, SystemTimeSourceStub>()
            .add_value(Web3AuthConfig::default())
            .add_value(JwtAuthenticationConfig::new(Some(
                "wallet-auth-http-test-secret".to_string(),
            )))
            .add_value(client_info_config)
            .add::<InMemoryLoginHistoryRepository>();
        add_repos(&mut b);

        wallet_auth_services::register_dependencies(&mut b);

        let catalog = b.build();

        Self {
            router: wallet_auth_adapter_http::build_router(catalog.clone()),
            catalog,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let body = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn get_nonce(&self, maybe_address: Option<&str>) -> String {
        let uri = match maybe_address {
            Some(address) => format!("/auth/nonce?address={address}"),
            None => "/auth/nonce".to_string(),
        };

        let (status, body) = self.get(&uri).await;
        assert_eq!(status, StatusCode::OK, "{body}");

        body["nonce"].as_str().unwrap().to_string()
    }

    pub async fn verify(&self, body: &serde_json::Value) -> (StatusCode, serde_json::Value) {
        self.send(verify_request(body)).await
    }

    /// Fetches a nonce, signs it and logs in
    pub async fn login(&self, wallet: &TestWallet) -> serde_json::Value {
        let nonce = self.get_nonce(None).await;
        let message = challenge_message(&nonce);

        let (status, body) = self
            .verify(&serde_json::json!({
                "message": message,
                "signature": wallet.sign(&message),
                "address": wallet.address_lowercase(),
            }))
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");

        body
    }
}

pub(crate) fn verify_request(body: &serde_json::Value) -> Request<Body> {
    Request::post("/auth/verify")
        .header(http::header::CONTENT_TYPE, "application/json")
        .header(http::header::USER_AGENT, TEST_USER_AGENT)
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub(crate) fn with_peer(mut request: Request<Body>, peer: &str) -> Request<Body> {
    let addr: SocketAddr = peer.parse().unwrap();
    request.extensions_mut().insert(ConnectInfo(addr));
    request
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
