// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use alloy_primitives::Signature;
use wallet_auth::{EvmWalletAddress, SignatureError, SignatureVerifier};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

const SIGNATURE_BYTES: usize = 65;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Recovers signers of `personal_sign` (EIP-191) messages on secp256k1
#[dill::component]
#[dill::interface(dyn SignatureVerifier)]
pub struct EvmSignatureVerifier;

impl EvmSignatureVerifier {
    fn decode_signature(signature: &str) -> Result<Signature, SignatureError> {
        let hex_part = signature
            .strip_prefix("0x")
            .or_else(|| signature.strip_prefix("0X"))
            .unwrap_or(signature);

        let bytes = hex::decode(hex_part).map_err(SignatureError::malformed)?;
        if bytes.len() != SIGNATURE_BYTES {
            return Err(SignatureError::malformed(format!(
                "expected {SIGNATURE_BYTES} bytes, got {}",
                bytes.len()
            )));
        }

        // Accepts v in {0, 1, 27, 28} as well as EIP-155 encoded values
        Signature::from_raw(&bytes).map_err(SignatureError::malformed)
    }
}

impl SignatureVerifier for EvmSignatureVerifier {
    fn recover_wallet(
        &self,
        message: &str,
        signature: &str,
    ) -> Result<EvmWalletAddress, SignatureError> {
        let signature = Self::decode_signature(signature.trim())?;

        signature
            .recover_address_from_msg(message.as_bytes())
            .map_err(SignatureError::malformed)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
