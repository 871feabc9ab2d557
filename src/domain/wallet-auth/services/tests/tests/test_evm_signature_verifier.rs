// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use pretty_assertions::assert_eq;
use wallet_auth::{EvmWalletAddressConvertor, SignatureError, SignatureVerifier};
use wallet_auth_services::EvmSignatureVerifier;

use crate::tests::utils::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test]
fn test_recover_known_key() {
    let wallet = TestWallet::known();
    assert_eq!(
        wallet.address,
        EvmWalletAddressConvertor::parse(KNOWN_ADDRESS).unwrap()
    );

    let message = "Sign in\nNonce: ab12ff";
    let signature = wallet.sign(message);

    assert_eq!(
        EvmSignatureVerifier.recover_wallet(message, &signature),
        Ok(wallet.address)
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test]
fn test_recover_accepts_all_encodings_of_v() {
    let wallet = TestWallet::from_seed(0x11);
    let message = "Nonce: 0123456789abcdef";

    let signature = wallet.sign(message);
    let mut bytes = hex::decode(signature.trim_start_matches("0x")).unwrap();
    let v = bytes[64];

    // Recovery id as 0/1
    bytes[64] = v - 27;
    let raw_recovery_id = hex::encode(&bytes);

    // Upper-case hex without prefix, v as 27/28
    bytes[64] = v;
    let upper_case = hex::encode_upper(&bytes);

    for signature in [signature, raw_recovery_id, upper_case] {
        assert_eq!(
            EvmSignatureVerifier.recover_wallet(message, &signature),
            Ok(wallet.address),
            "{signature}"
        );
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test]
fn test_recover_is_deterministic() {
    let wallet = TestWallet::from_seed(0x22);
    let message = "Nonce: 42";
    let signature = wallet.sign(message);

    let first = EvmSignatureVerifier.recover_wallet(message, &signature);
    let second = EvmSignatureVerifier.recover_wallet(message, &signature);

    assert_eq!(first, second);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test]
fn test_malformed_signatures() {
    let wallet = TestWallet::from_seed(0x33);
    let message = "Nonce: 42";
    let signature = wallet.sign(message);
    let bytes = hex::decode(signature.trim_start_matches("0x")).unwrap();

    let mut bad_v = bytes.clone();
    bad_v[64] = 5;

    for malformed in [
        String::new(),
        "0x".to_string(),
        "not hex at all".to_string(),
        format!("0x{}", hex::encode(&bytes[..64])),
        format!("0x{}00", hex::encode(&bytes)),
        format!("{}z", &signature[..signature.len() - 1]),
        format!("0x{}", hex::encode(bad_v)),
    ] {
        let res = EvmSignatureVerifier.recover_wallet(message, &malformed);
        assert!(
            matches!(res, Err(SignatureError::MalformedSignature { .. })),
            "{malformed}: {res:?}"
        );
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test]
fn test_tampered_signature_never_yields_signer() {
    let wallet = TestWallet::from_seed(0x44);
    let message = "Sign in\nNonce: ab12ff";
    let signature = wallet.sign(message);
    let bytes = hex::decode(signature.trim_start_matches("0x")).unwrap();

    // Every single-bit flip of r and s
    for bit in 0..(64 * 8) {
        let mut tampered = bytes.clone();
        tampered[bit / 8] ^= 1 << (bit % 8);

        let res = EvmSignatureVerifier.recover_wallet(message, &hex::encode(&tampered));
        assert_ne!(res, Ok(wallet.address), "bit {bit}");
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test]
fn test_tampered_message_never_yields_signer() {
    let wallet = TestWallet::from_seed(0x55);
    let message = "Sign in\nNonce: ab12ff";
    let signature = wallet.sign(message);

    for tampered in [
        "Sign in\nNonce: ab12fe",
        "sign in\nNonce: ab12ff",
        "Sign in\nNonce: ab12ff\n",
        "Sign in \nNonce: ab12ff",
    ] {
        let res = EvmSignatureVerifier.recover_wallet(tampered, &signature);
        assert_ne!(res, Ok(wallet.address), "{tampered:?}");
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
