// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI subcommands: `token`, `status`, `setup`, `invite`, `validate`.

pub mod invite;
pub mod setup;
pub mod status;
pub mod token;
pub mod validate;

use crate::config::Config;
use crate::gateway::AuthGateway;
use crate::manager::AuthManager;
use crate::store::RecordStore;

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Obtain a usable access token, refreshing or bootstrapping as needed.
    Token(token::TokenArgs),
    /// Show the state of all three credential slots.
    Status(status::StatusArgs),
    /// Exchange an invite code for a fresh token pair.
    Setup(setup::SetupArgs),
    /// Store an invite code for later setup.
    Invite(invite::InviteArgs),
    /// Check an access token against the server.
    Validate(validate::ValidateArgs),
}

/// Dispatch a subcommand. Returns a process exit code.
pub async fn run(config: &Config, command: &Command) -> i32 {
    match command {
        Command::Token(args) => token::run(config, args).await,
        Command::Status(args) => status::run(config, args).await,
        Command::Setup(args) => setup::run(config, args).await,
        Command::Invite(args) => invite::run(config, args).await,
        Command::Validate(args) => validate::run(config, args).await,
    }
}

/// Build the manager every subcommand drives.
fn manager(config: &Config) -> AuthManager {
    let store = RecordStore::new(&config.data_dir);
    let gateway = AuthGateway::new(config.base_url(), config.http_timeout());
    AuthManager::new(store, gateway, config.refresh_ttl(), config.validate_remote)
}
