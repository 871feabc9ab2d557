// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::{DateTime, Utc};
use internal_error::{InternalError, ResultIntoInternal};
use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

// Timestamps are stored as microseconds since the epoch, so that range
// comparisons in SQL do not depend on the text form of dates

pub(crate) fn to_micros(t: DateTime<Utc>) -> i64 {
    t.timestamp_micros()
}

pub(crate) fn from_micros(micros: i64) -> Result<DateTime<Utc>, InternalError> {
    DateTime::<Utc>::from_timestamp_micros(micros)
        .ok_or(TimestampOutOfRangeError { micros })
        .int_err()
}

#[derive(Error, Debug)]
#[error("Stored timestamp {micros} is out of range")]
struct TimestampOutOfRangeError {
    micros: i64,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
