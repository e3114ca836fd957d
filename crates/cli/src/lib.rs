// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Credential keeper for the Beds24 API.
//!
//! Three credential slots back a fallback chain: a short-lived access
//! token, a refresh token that can mint new access tokens, and a
//! one-time invite code that bootstraps both. [`manager::AuthManager`]
//! walks the chain; [`store::RecordStore`] keeps each slot in its own
//! JSON file under the data directory.

pub mod command;
pub mod config;
pub mod gateway;
pub mod manager;
pub mod record;
pub mod store;
