// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Credential fallback orchestration.
//!
//! [`AuthManager::valid_token`] walks the three tiers in priority order: a
//! stored access token that has not expired, then a refresh-token exchange,
//! then one-time invite setup. Records are re-read from the store at the
//! moment of use so edits to the data directory between invocations are
//! picked up. At most one credential-producing remote call is made per
//! invocation; remote failures fall through to the next tier, persistence
//! failures are the only hard errors.

use anyhow::bail;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::gateway::AuthGateway;
use crate::record::{CredentialRecord, Slot};
use crate::store::RecordStore;

/// How a returned access token was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenSource {
    /// Stored record was still valid.
    Stored,
    /// Exchanged via the refresh token.
    Refreshed,
    /// Bootstrapped from a one-time invite code.
    Setup,
}

/// A usable access token and the tier that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObtainedToken {
    pub token: String,
    pub source: TokenSource,
}

/// Point-in-time view of one slot. Diagnostic only; fallback decisions
/// re-derive from freshly loaded records.
#[derive(Debug, Clone, Serialize)]
pub struct SlotStatus {
    pub exists: bool,
    pub valid: bool,
    pub expired: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration: Option<DateTime<Utc>>,
}

/// Status of all three slots.
#[derive(Debug, Clone, Serialize)]
pub struct AuthStatus {
    pub access_token: SlotStatus,
    pub refresh_token: SlotStatus,
    pub invite_code: SlotStatus,
}

/// Failure split for the credential-producing tiers: remote rejection falls
/// through the chain, a failed persist is a hard error.
enum TierError {
    Remote(anyhow::Error),
    Persist(anyhow::Error),
}

impl TierError {
    fn into_inner(self) -> anyhow::Error {
        match self {
            TierError::Remote(err) | TierError::Persist(err) => err,
        }
    }
}

/// Orchestrates the three credential tiers over a store and gateway.
pub struct AuthManager {
    store: RecordStore,
    gateway: AuthGateway,
    refresh_ttl: chrono::Duration,
    validate_remote: bool,
}

impl AuthManager {
    pub fn new(
        store: RecordStore,
        gateway: AuthGateway,
        refresh_ttl: chrono::Duration,
        validate_remote: bool,
    ) -> Self {
        Self { store, gateway, refresh_ttl, validate_remote }
    }

    /// Run the fallback machine once and return a usable access token.
    ///
    /// `Ok(None)` means every tier was exhausted; an `Err` is returned only
    /// when a newly obtained credential could not be persisted.
    pub async fn valid_token(&self) -> anyhow::Result<Option<ObtainedToken>> {
        let now = Utc::now();
        if let Some(record) = self.store.load(Slot::AccessToken) {
            if record.is_valid(now) {
                if !self.validate_remote {
                    debug!("using stored access token, expires {}", record.expiration);
                    return Ok(Some(ObtainedToken {
                        token: record.value,
                        source: TokenSource::Stored,
                    }));
                }
                match self.gateway.validate(&record.value).await {
                    Ok(true) => {
                        debug!("stored access token confirmed by server");
                        return Ok(Some(ObtainedToken {
                            token: record.value,
                            source: TokenSource::Stored,
                        }));
                    }
                    Ok(false) => warn!("stored access token rejected by server"),
                    Err(err) => warn!("token validation call failed: {err:#}"),
                }
            } else {
                debug!("stored access token expired at {}", record.expiration);
            }
        }

        if let Some(token) = self.try_refresh().await? {
            return Ok(Some(token));
        }
        if let Some(token) = self.try_setup().await? {
            return Ok(Some(token));
        }

        warn!("no valid authentication method available");
        Ok(None)
    }

    /// Tier 2: exchange a stored, unexpired refresh token for a new access
    /// token. Remote failure leaves the refresh token in place.
    async fn try_refresh(&self) -> anyhow::Result<Option<ObtainedToken>> {
        let Some(record) = self.usable_refresh_token() else {
            return Ok(None);
        };
        info!("refreshing access token");
        match self.do_refresh(&record.value).await {
            Ok(token) => Ok(Some(token)),
            Err(TierError::Remote(err)) => {
                // May be transient, so nothing is deleted here.
                warn!("token refresh failed: {err:#}");
                Ok(None)
            }
            Err(TierError::Persist(err)) => Err(err),
        }
    }

    /// Exchange the stored refresh token for a fresh access token and
    /// persist it. `Ok(None)` when no unexpired refresh token is stored.
    pub async fn refresh(&self) -> anyhow::Result<Option<ObtainedToken>> {
        let Some(record) = self.usable_refresh_token() else {
            return Ok(None);
        };
        self.do_refresh(&record.value).await.map(Some).map_err(TierError::into_inner)
    }

    /// Stored refresh token, if present and unexpired.
    fn usable_refresh_token(&self) -> Option<CredentialRecord> {
        let record = self.store.load(Slot::RefreshToken)?;
        if record.is_expired(Utc::now()) {
            debug!("refresh token expired at {}", record.expiration);
            return None;
        }
        Some(record)
    }

    async fn do_refresh(&self, refresh_token: &str) -> Result<ObtainedToken, TierError> {
        let grant = self.gateway.refresh(refresh_token).await.map_err(TierError::Remote)?;
        let issued = Utc::now();
        let access = CredentialRecord::issued(
            grant.token,
            issued,
            chrono::Duration::seconds(grant.expires_in),
        );
        self.store.save(Slot::AccessToken, &access).map_err(TierError::Persist)?;
        info!("access token refreshed, expires {}", access.expiration);
        Ok(ObtainedToken { token: access.value, source: TokenSource::Refreshed })
    }

    /// Tier 3: bootstrap both tokens from a stored, unexpired invite code.
    async fn try_setup(&self) -> anyhow::Result<Option<ObtainedToken>> {
        let now = Utc::now();
        let Some(record) = self.store.load(Slot::InviteCode) else {
            return Ok(None);
        };
        if record.is_expired(now) {
            // Expiry is not consumption; the record stays for diagnostics.
            debug!("invite code expired at {}", record.expiration);
            return Ok(None);
        }

        info!("attempting setup with stored invite code");
        match self.do_setup(&record.value).await {
            Ok(token) => Ok(Some(token)),
            Err(TierError::Remote(err)) => {
                warn!("invite setup failed: {err:#}");
                Ok(None)
            }
            Err(TierError::Persist(err)) => Err(err),
        }
    }

    /// Exchange `code` for a fresh token pair, persist both, and consume
    /// any stored invite code.
    pub async fn setup(&self, code: &str) -> anyhow::Result<ObtainedToken> {
        self.do_setup(code).await.map_err(TierError::into_inner)
    }

    async fn do_setup(&self, code: &str) -> Result<ObtainedToken, TierError> {
        let grant = self.gateway.setup(code).await.map_err(TierError::Remote)?;
        let issued = Utc::now();
        let access = CredentialRecord::issued(
            grant.token,
            issued,
            chrono::Duration::seconds(grant.expires_in),
        );
        let refresh = CredentialRecord::issued(grant.refresh_token, issued, self.refresh_ttl);
        self.store.save(Slot::AccessToken, &access).map_err(TierError::Persist)?;
        self.store.save(Slot::RefreshToken, &refresh).map_err(TierError::Persist)?;
        // A successful setup consumes the invite code wherever it came from.
        self.store.delete(Slot::InviteCode).map_err(TierError::Persist)?;
        info!("setup complete, access token expires {}", access.expiration);
        Ok(ObtainedToken { token: access.value, source: TokenSource::Setup })
    }

    /// Store an invite code for later setup, valid for `ttl`.
    pub fn store_invite(&self, code: &str, ttl: chrono::Duration) -> anyhow::Result<CredentialRecord> {
        let record = CredentialRecord::issued(code, Utc::now(), ttl);
        self.store.save(Slot::InviteCode, &record)?;
        info!("invite code stored, expires {}", record.expiration);
        Ok(record)
    }

    /// Check a token against the server. With no explicit token, the stored
    /// access token is checked, expired or not.
    pub async fn validate(&self, token: Option<&str>) -> anyhow::Result<bool> {
        let token = match token {
            Some(token) => token.to_owned(),
            None => match self.store.load(Slot::AccessToken) {
                Some(record) => record.value,
                None => bail!("no stored access token to validate"),
            },
        };
        self.gateway.validate(&token).await
    }

    /// Snapshot of all three slots.
    pub fn status(&self) -> AuthStatus {
        let now = Utc::now();
        AuthStatus {
            access_token: self.slot_status(Slot::AccessToken, now),
            refresh_token: self.slot_status(Slot::RefreshToken, now),
            invite_code: self.slot_status(Slot::InviteCode, now),
        }
    }

    fn slot_status(&self, slot: Slot, now: DateTime<Utc>) -> SlotStatus {
        match self.store.load(slot) {
            Some(record) => SlotStatus {
                exists: true,
                valid: record.is_valid(now),
                expired: record.is_expired(now),
                expiration: Some(record.expiration),
            },
            None => SlotStatus { exists: false, valid: false, expired: false, expiration: None },
        }
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
