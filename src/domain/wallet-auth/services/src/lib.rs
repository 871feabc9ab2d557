// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

// Re-exports
pub use wallet_auth as domain;

mod collaborator_timeout;
mod dependencies;
mod evm_signature_verifier;
mod expired_nonces_sweeper;
mod jwt_token_issuer;
mod web3_auth_service_impl;
mod web3_nonce_service_impl;

pub use collaborator_timeout::*;
pub use dependencies::*;
pub use evm_signature_verifier::*;
pub use expired_nonces_sweeper::*;
pub use jwt_token_issuer::*;
pub use web3_auth_service_impl::*;
pub use web3_nonce_service_impl::*;
