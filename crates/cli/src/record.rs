// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Credential records and the slots they occupy.
//!
//! Each slot holds at most one record: a secret value plus its issue and
//! expiry instants. Validity is derived at read time from the expiry
//! instant; nothing mutates a record once written.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, SubsecRound, Utc};

/// Storage slot for one credential tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Short-lived bearer token sent on API requests.
    AccessToken,
    /// Medium-lived token exchanged for fresh access tokens.
    RefreshToken,
    /// Single-use invite code issued from the account dashboard.
    InviteCode,
}

impl Slot {
    /// Fallback priority order, highest tier first.
    pub const ALL: [Slot; 3] = [Slot::AccessToken, Slot::RefreshToken, Slot::InviteCode];

    /// File name under the data directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Slot::AccessToken => "beds24_auth_token.json",
            Slot::RefreshToken => "beds24_refresh_token.json",
            Slot::InviteCode => "beds24_invite_code.json",
        }
    }

    /// Name of the JSON field carrying the secret itself.
    pub fn value_field(self) -> &'static str {
        match self {
            Slot::AccessToken => "access_token",
            Slot::RefreshToken => "refresh_token",
            Slot::InviteCode => "invite_code",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.value_field())
    }
}

/// One stored credential: the secret plus its lifetime bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub value: String,
    pub created: DateTime<Utc>,
    pub expiration: DateTime<Utc>,
}

impl CredentialRecord {
    /// Record issued at `now`, expiring once `ttl` has elapsed.
    ///
    /// Both instants are trimmed to microseconds, the precision the stored
    /// form carries, so a saved record loads back equal. A lifetime past
    /// either end of the calendar clamps to that end.
    pub fn issued(value: impl Into<String>, now: DateTime<Utc>, ttl: chrono::Duration) -> Self {
        let created = now.trunc_subsecs(6);
        let expiration = match created.checked_add_signed(ttl) {
            Some(instant) => instant.trunc_subsecs(6),
            None if ttl < chrono::Duration::zero() => DateTime::<Utc>::MIN_UTC,
            None => DateTime::<Utc>::MAX_UTC.trunc_subsecs(6),
        };
        Self { value: value.into(), created, expiration }
    }

    /// A record is expired once `now` reaches its expiration instant.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expiration
    }

    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        !self.is_expired(now)
    }

    /// Serialize to the on-disk shape for `slot`.
    pub fn encode(&self, slot: Slot) -> serde_json::Value {
        serde_json::json!({
            slot.value_field(): self.value,
            "created": self.created.to_rfc3339_opts(SecondsFormat::Micros, true),
            "expiration": self.expiration.to_rfc3339_opts(SecondsFormat::Micros, true),
        })
    }

    /// Parse the on-disk shape for `slot`.
    ///
    /// Returns `None` when any field is missing, empty, or unparseable. A
    /// record that cannot be read in full is treated as absent.
    pub fn decode(slot: Slot, raw: &serde_json::Value) -> Option<Self> {
        let value = raw
            .get(slot.value_field())
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())?;
        let created = parse_instant(raw.get("created")?.as_str()?)?;
        let expiration = parse_instant(raw.get("expiration")?.as_str()?)?;
        Some(Self {
            value: value.to_string(),
            created,
            expiration,
        })
    }
}

/// Parse an ISO-8601 instant. Naive timestamps are taken as UTC.
fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|t| t.and_utc())
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
