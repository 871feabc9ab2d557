// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod challenge_parser;
mod signature_verifier;
mod token_issuer;
mod web3_auth_service;
mod web3_nonce_service;

pub use challenge_parser::*;
pub use signature_verifier::*;
pub use token_issuer::*;
pub use web3_auth_service::*;
pub use web3_nonce_service::*;
