// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::Web3AuthNonce;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

// `$` in multi-line mode does not match before "\r\n", hence the optional "\r"
static NONCE_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*nonce:[ \t]*((?:0x)?[0-9a-f]+)[ \t]*\r?$").unwrap()
});

/// Finds the first `Nonce: <hex>` line of a signed challenge message and
/// returns the token exactly as written there.
pub fn extract_nonce(message: &str) -> Result<Web3AuthNonce, ExtractNonceError> {
    let token = NONCE_LINE_REGEX
        .captures(message)
        .and_then(|captures| captures.get(1))
        .map(|token| token.as_str())
        .ok_or(ExtractNonceError::NonceMarkerNotFound)?;

    Web3AuthNonce::try_new(token).map_err(|_| ExtractNonceError::NonceMarkerNotFound)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractNonceError {
    #[error("Message does not contain a 'Nonce: <hex>' line")]
    NonceMarkerNotFound,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////


////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
