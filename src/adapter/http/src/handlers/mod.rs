// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod auth_nonce_handler;
mod auth_verify_handler;
mod health_handler;
mod user_profile_handler;

pub use auth_nonce_handler::*;
pub use auth_verify_handler::*;
pub use health_handler::*;
pub use user_profile_handler::*;
