// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::future::Future;
use std::time::Duration;

use internal_error::{ErrorIntoInternal, InternalError};
use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Awaits a call into storage, failing with an internal error if it does not
/// complete within `timeout`
pub async fn with_collaborator_timeout<F, T>(
    operation: &'static str,
    timeout: Duration,
    future: F,
) -> Result<T, InternalError>
where
    F: Future<Output = T>,
{
    tokio::time::timeout(timeout, future).await.map_err(|_| {
        tracing::error!(operation, ?timeout, "Collaborator call timed out");

        CollaboratorTimeoutError { operation, timeout }.int_err()
    })
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
#[error("Operation '{operation}' did not complete within {timeout:?}")]
pub struct CollaboratorTimeoutError {
    pub operation: &'static str,
    pub timeout: Duration,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
