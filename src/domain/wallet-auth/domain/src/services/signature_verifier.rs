// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use thiserror::Error;

use crate::EvmWalletAddress;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg_attr(any(feature = "testing", test), mockall::automock)]
pub trait SignatureVerifier: Send + Sync {
    /// Recovers the address of the key that produced `signature` over the
    /// `personal_sign` (EIP-191) form of `message`.
    ///
    /// The signature is a hex string (`0x` prefix optional) of 65 bytes
    /// `r || s || v`.
    fn recover_wallet(
        &self,
        message: &str,
        signature: &str,
    ) -> Result<EvmWalletAddress, SignatureError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    #[error("Malformed signature: {reason}")]
    MalformedSignature { reason: String },
}

impl SignatureError {
    pub fn malformed(reason: impl std::fmt::Display) -> Self {
        Self::MalformedSignature {
            reason: reason.to_string(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
