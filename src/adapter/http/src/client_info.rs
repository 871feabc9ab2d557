// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use dill::Catalog;
use http::request::Parts;
use wallet_auth::LoginContext;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// How the caller address is determined. Registered in the catalog; when
/// absent the forwarded header is ignored.
#[derive(Debug, Clone, Default)]
pub struct ClientInfoConfig {
    /// Take the first hop of `X-Forwarded-For` instead of the socket peer.
    /// Only safe behind a proxy that overwrites the header.
    pub trust_forwarded_for: bool,
}

/// Who is calling: the socket peer (or the first `X-Forwarded-For` hop when
/// trusted), plus the `User-Agent` header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInfo {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl From<ClientInfo> for LoginContext {
    fn from(value: ClientInfo) -> Self {
        LoginContext {
            ip_address: value.ip_address,
            user_agent: value.user_agent,
        }
    }
}

impl<S> FromRequestParts<S> for ClientInfo
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let trust_forwarded_for = parts
            .extensions
            .get::<Catalog>()
            .and_then(|catalog| catalog.get_one::<ClientInfoConfig>().ok())
            .is_some_and(|config| config.trust_forwarded_for);

        let forwarded_ip = if trust_forwarded_for {
            header_str(parts, X_FORWARDED_FOR)
                .and_then(|value| value.split(',').next())
                .map(str::trim)
                .filter(|hop| !hop.is_empty())
                .map(ToString::to_string)
        } else {
            None
        };

        // Only present when served with `into_make_service_with_connect_info`
        let peer_ip = || {
            parts
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        };

        Ok(Self {
            ip_address: forwarded_ip.or_else(peer_ip),
            user_agent: header_str(parts, http::header::USER_AGENT.as_str()).map(ToString::to_string),
        })
    }
}

fn header_str<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
