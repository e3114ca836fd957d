// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP client for the Beds24 v2 authentication endpoints.
//!
//! All three endpoints are GETs carrying the secret in a request header:
//! `code` for invite setup, `refreshToken` for token refresh, `token` for
//! validation. A 2xx response whose body lacks the expected token field is
//! a failure; the server signals rejection both ways.

use std::time::Duration;

use anyhow::bail;
use reqwest::Client;
use serde::Deserialize;

/// Seconds an access token lives when the server omits `expiresIn`.
pub const DEFAULT_EXPIRES_IN: i64 = 86_400;

/// Longest `expiresIn` the client accepts, ten years in seconds.
pub const MAX_EXPIRES_IN: i64 = 315_360_000;

/// Client for the hosting API's authentication endpoints.
#[derive(Debug, Clone)]
pub struct AuthGateway {
    base_url: String,
    client: Client,
}

/// Fresh access token from a refresh call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGrant {
    pub token: String,
    pub expires_in: i64,
}

/// Token pair from invite-code setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupGrant {
    pub token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: Option<String>,
    #[serde(rename = "refreshToken")]
    refresh_token: Option<String>,
    #[serde(rename = "expiresIn")]
    expires_in: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    #[serde(rename = "validToken", default)]
    valid_token: bool,
}

impl AuthGateway {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder().timeout(timeout).build().unwrap_or_default();
        Self { base_url: base_url.into(), client }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_auth(
        &self,
        path: &str,
        header: &'static str,
        secret: &str,
    ) -> anyhow::Result<AuthResponse> {
        let resp = self
            .client
            .get(self.url(path))
            .header("accept", "application/json")
            .header(header, secret)
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            bail!("{path} failed (HTTP {status}): {body}");
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// Exchange an invite code for an access and refresh token pair.
    pub async fn setup(&self, invite_code: &str) -> anyhow::Result<SetupGrant> {
        let resp = self.get_auth("/authentication/setup", "code", invite_code).await?;
        let Some(token) = resp.token.filter(|t| !t.is_empty()) else {
            bail!("setup response is missing a token");
        };
        let Some(refresh_token) = resp.refresh_token.filter(|t| !t.is_empty()) else {
            bail!("setup response is missing a refresh token");
        };
        Ok(SetupGrant {
            token,
            refresh_token,
            expires_in: grant_lifetime("setup", resp.expires_in)?,
        })
    }

    /// Exchange a refresh token for a fresh access token.
    pub async fn refresh(&self, refresh_token: &str) -> anyhow::Result<TokenGrant> {
        let resp = self.get_auth("/authentication/token", "refreshToken", refresh_token).await?;
        let Some(token) = resp.token.filter(|t| !t.is_empty()) else {
            bail!("token response is missing a token");
        };
        Ok(TokenGrant { token, expires_in: grant_lifetime("token", resp.expires_in)? })
    }

    /// Ask the server whether `token` is currently accepted.
    ///
    /// A 2xx body without `validToken` counts as a rejection.
    pub async fn validate(&self, token: &str) -> anyhow::Result<bool> {
        let resp = self
            .client
            .get(self.url("/authentication/details"))
            .header("accept", "application/json")
            .header("token", token)
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            bail!("/authentication/details failed (HTTP {status}): {body}");
        }
        let details: DetailsResponse = serde_json::from_str(&body)?;
        Ok(details.valid_token)
    }
}

/// Server-supplied token lifetime, defaulted when absent. A lifetime
/// outside `0..=MAX_EXPIRES_IN` is treated like a missing field.
fn grant_lifetime(what: &str, expires_in: Option<i64>) -> anyhow::Result<i64> {
    let secs = expires_in.unwrap_or(DEFAULT_EXPIRES_IN);
    if !(0..=MAX_EXPIRES_IN).contains(&secs) {
        bail!("{what} response carries an out-of-range expiresIn: {secs}");
    }
    Ok(secs)
}

#[cfg(test)]
#[path = "gateway_tests.rs"]
mod tests;
