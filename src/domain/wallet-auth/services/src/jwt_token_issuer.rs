// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use internal_error::{ErrorIntoInternal, InternalError};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time_source::SystemTimeSource;
use uuid::Uuid;
use wallet_auth::{
    AccessTokenError,
    EvmWalletAddress,
    EvmWalletAddressConvertor,
    JwtAuthenticationConfig,
    SessionToken,
    TokenIssuer,
    UserId,
};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

const WALLET_AUTH_JWT_ALGORITHM: Algorithm = Algorithm::HS384;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct JwtTokenIssuer {
    time_source: Arc<dyn SystemTimeSource>,
    issuer: String,
    token_lifetime: chrono::Duration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

#[dill::component(pub)]
#[dill::interface(dyn TokenIssuer)]
impl JwtTokenIssuer {
    pub fn new(
        config: Arc<JwtAuthenticationConfig>,
        time_source: Arc<dyn SystemTimeSource>,
    ) -> Self {
        Self {
            time_source,
            issuer: config.issuer.clone(),
            token_lifetime: config.token_lifetime,
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        }
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue_token(
        &self,
        user_id: &UserId,
        wallet: &EvmWalletAddress,
    ) -> Result<String, InternalError> {
        let iat = self.time_source.now().timestamp();
        let exp = iat + self.token_lifetime.num_seconds();
        let claims = WalletAccessTokenClaims {
            iat,
            exp,
            iss: self.issuer.clone(),
            sub: user_id.to_string(),
            address: EvmWalletAddressConvertor::canonical_string(wallet),
        };

        encode(
            &Header::new(WALLET_AUTH_JWT_ALGORITHM),
            &claims,
            &self.encoding_key,
        )
        .map_err(ErrorIntoInternal::int_err)
    }

    fn decode_token(&self, token: &str) -> Result<SessionToken, AccessTokenError> {
        let mut validation = Validation::new(WALLET_AUTH_JWT_ALGORITHM);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        let token_data = decode::<WalletAccessTokenClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| match *e.kind() {
                ErrorKind::ExpiredSignature => AccessTokenError::Expired,
                _ => AccessTokenError::Invalid(Box::new(e)),
            })?;

        token_data.claims.try_into()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Serialize, Deserialize)]
struct WalletAccessTokenClaims {
    exp: i64,
    iat: i64,
    iss: String,
    sub: String,
    address: String,
}

impl TryFrom<WalletAccessTokenClaims> for SessionToken {
    type Error = AccessTokenError;

    fn try_from(claims: WalletAccessTokenClaims) -> Result<Self, Self::Error> {
        let invalid = |reason: &'static str| {
            AccessTokenError::Invalid(Box::new(MalformedTokenClaimsError { reason }))
        };

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| invalid("subject is not a user id"))?;
        let wallet = EvmWalletAddressConvertor::parse(&claims.address)
            .map_err(|_| invalid("address is not a wallet address"))?;
        let issued_at =
            DateTime::<Utc>::from_timestamp(claims.iat, 0).ok_or_else(|| invalid("bad iat"))?;
        let expires_at =
            DateTime::<Utc>::from_timestamp(claims.exp, 0).ok_or_else(|| invalid("bad exp"))?;

        Ok(SessionToken {
            user_id,
            wallet,
            issued_at,
            expires_at,
        })
    }
}

#[derive(Error, Debug)]
#[error("Malformed token claims: {reason}")]
struct MalformedTokenClaimsError {
    reason: &'static str,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
