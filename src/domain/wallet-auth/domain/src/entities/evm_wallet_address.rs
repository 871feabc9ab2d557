// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub type EvmWalletAddress = alloy_primitives::Address;

const EVM_WALLET_ADDRESS_HEX_LEN: usize = 40;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Text representation of wallet addresses.
///
/// Addresses are accepted in any letter case (EIP-55 checksums are not
/// enforced) and always rendered in the canonical lower-case form, which is
/// also the form used as a unique key in storage.
pub struct EvmWalletAddressConvertor;

impl EvmWalletAddressConvertor {
    pub fn parse(value: &str) -> Result<EvmWalletAddress, InvalidEvmWalletAddressError> {
        let trimmed = value.trim();
        let hex_part = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if hex_part.len() != EVM_WALLET_ADDRESS_HEX_LEN {
            return Err(InvalidEvmWalletAddressError::new(value));
        }

        let bytes = hex::decode(hex_part).map_err(|_| InvalidEvmWalletAddressError::new(value))?;

        Ok(EvmWalletAddress::from_slice(&bytes))
    }

    pub fn canonical_string(wallet: &EvmWalletAddress) -> String {
        format!("0x{}", hex::encode(wallet.as_slice()))
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid wallet address: '{value}'")]
pub struct InvalidEvmWalletAddressError {
    pub value: String,
}

impl InvalidEvmWalletAddressError {
    fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////


////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
