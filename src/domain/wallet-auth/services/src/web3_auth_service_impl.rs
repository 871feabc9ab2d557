// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use internal_error::ResultIntoInternal;
use thiserror::Error;
use time_source::SystemTimeSource;
use wallet_auth::*;

use crate::with_collaborator_timeout;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[dill::component]
#[dill::interface(dyn Web3AuthService)]
pub struct Web3AuthServiceImpl {
    nonce_service: Arc<dyn Web3NonceService>,
    signature_verifier: Arc<dyn SignatureVerifier>,
    token_issuer: Arc<dyn TokenIssuer>,
    user_repo: Arc<dyn UserRepository>,
    login_history_repo: Arc<dyn LoginHistoryRepository>,
    time_source: Arc<dyn SystemTimeSource>,
    config: Arc<Web3AuthConfig>,
}

impl Web3AuthServiceImpl {
    fn required_field<'a>(
        field: &'static str,
        value: &'a str,
    ) -> Result<&'a str, WalletLoginError> {
        if value.trim().is_empty() {
            Err(WalletLoginError::MissingField(MissingFieldError { field }))
        } else {
            Ok(value)
        }
    }

    async fn record_identity_mismatch(
        &self,
        claimed_wallet: &EvmWalletAddress,
        context: &LoginContext,
    ) -> Result<(), WalletLoginError> {
        let timeout = self.config.collaborator_timeout;

        // A failed attempt never registers a user, it is only recorded for an
        // already known one
        let maybe_user = with_collaborator_timeout(
            "find_user_by_wallet",
            timeout,
            self.user_repo.find_user_by_wallet(claimed_wallet),
        )
        .await?
        .int_err()?;

        if let Some(user) = maybe_user {
            let record = LoginHistoryRecord::failure(
                user.id,
                context,
                LOGIN_FAILURE_REASON_IDENTITY_MISMATCH,
                self.time_source.now(),
            );

            with_collaborator_timeout(
                "append_login_history",
                timeout,
                self.login_history_repo.append(&record),
            )
            .await?
            .int_err()?;
        }

        Ok(())
    }

    async fn complete_login(
        &self,
        wallet: &EvmWalletAddress,
        context: &LoginContext,
    ) -> Result<WalletLoginResponse, WalletLoginError> {
        let timeout = self.config.collaborator_timeout;
        let now = self.time_source.now();

        let user = with_collaborator_timeout(
            "upsert_user",
            timeout,
            self.user_repo.upsert_user(wallet, now),
        )
        .await?
        .int_err()?;

        let record = LoginHistoryRecord::success(user.id, context, now);
        with_collaborator_timeout(
            "append_login_history",
            timeout,
            self.login_history_repo.append(&record),
        )
        .await?
        .int_err()?;

        let user = with_collaborator_timeout(
            "record_login",
            timeout,
            self.user_repo.record_login(&user.id, now),
        )
        .await?
        .int_err()?;

        let access_token = self.token_issuer.issue_token(&user.id, &user.wallet_address)?;

        tracing::info!(
            user_id = %user.id,
            wallet = %EvmWalletAddressConvertor::canonical_string(&user.wallet_address),
            login_count = user.login_count,
            "Wallet login succeeded"
        );

        Ok(WalletLoginResponse {
            access_token,
            wallet: user.wallet_address,
            user_id: user.id,
        })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait]
impl Web3AuthService for Web3AuthServiceImpl {
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(wallet = %request.wallet_address, ip = ?context.ip_address)
    )]
    async fn login(
        &self,
        request: WalletLoginRequest,
        context: LoginContext,
    ) -> Result<WalletLoginResponse, WalletLoginError> {
        let message = Self::required_field("message", &request.message)?;
        let signature = Self::required_field("signature", &request.signature)?;
        let wallet_address = Self::required_field("address", &request.wallet_address)?;

        let claimed_wallet = EvmWalletAddressConvertor::parse(wallet_address)
            .map_err(WalletLoginError::InvalidIdentity)?;

        let nonce = extract_nonce(message).map_err(WalletLoginError::NonceExtractionFailed)?;

        // Past this point the nonce is gone, whatever the outcome
        self.nonce_service
            .consume_nonce(&nonce, &claimed_wallet)
            .await
            .map_err(|e| match e {
                ConsumeWalletNonceError::Internal(e) => WalletLoginError::Internal(e),
                e => {
                    tracing::warn!(error = %e, "Nonce rejected");
                    WalletLoginError::InvalidNonce(e)
                }
            })?;

        let recovered_wallet = self
            .signature_verifier
            .recover_wallet(message, signature)
            .map_err(|e| {
                tracing::warn!(error = %e, "Signature rejected");
                WalletLoginError::SignatureInvalid(e)
            })?;

        if recovered_wallet != claimed_wallet {
            tracing::warn!(
                %recovered_wallet,
                %claimed_wallet,
                "Signer does not match the claimed wallet"
            );

            self.record_identity_mismatch(&claimed_wallet, &context)
                .await?;

            return Err(WalletLoginError::IdentityMismatch(IdentityMismatchError {
                claimed_wallet,
                recovered_wallet,
            }));
        }

        self.complete_login(&claimed_wallet, &context).await
    }

    #[tracing::instrument(level = "debug", skip_all)]
    async fn user_by_token(&self, access_token: &str) -> Result<User, GetUserByTokenError> {
        let session_token = self
            .token_issuer
            .decode_token(access_token)
            .map_err(GetUserByTokenError::AccessToken)?;

        let maybe_user = with_collaborator_timeout(
            "find_user_by_id",
            self.config.collaborator_timeout,
            self.user_repo.find_user_by_id(&session_token.user_id),
        )
        .await?
        .int_err()?;

        let Some(user) = maybe_user else {
            return Err(GetUserByTokenError::UserUnresolved);
        };

        if user.wallet_address != session_token.wallet {
            return Err(GetUserByTokenError::AccessToken(AccessTokenError::Invalid(
                Box::new(TokenWalletMismatchError {
                    user_id: user.id,
                    token_wallet: session_token.wallet,
                }),
            )));
        }

        Ok(user)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
#[error("Token of user '{user_id}' names wallet {token_wallet}, which is not the user's wallet")]
struct TokenWalletMismatchError {
    user_id: UserId,
    token_wallet: EvmWalletAddress,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
