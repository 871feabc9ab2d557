// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod api_error;
mod client_info;
pub mod handlers;
mod router;

pub use api_error::*;
pub use client_info::*;
pub use router::*;
