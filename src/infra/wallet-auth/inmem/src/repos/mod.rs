// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod inmem_login_history_repository;
mod inmem_user_repository;
mod inmem_web3_auth_nonce_repository;

pub use inmem_login_history_repository::*;
pub use inmem_user_repository::*;
pub use inmem_web3_auth_nonce_repository::*;
