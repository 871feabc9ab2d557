// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod helpers;
mod login_history_repository_test_suite;
mod user_repository_test_suite;
mod web3_auth_nonce_repository_test_suite;

pub use login_history_repository_test_suite::*;
pub use user_repository_test_suite::*;
pub use web3_auth_nonce_repository_test_suite::*;
