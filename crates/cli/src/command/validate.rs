// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `roost validate`: check a token against the server.

use crate::config::Config;

#[derive(Debug, clap::Args)]
pub struct ValidateArgs {
    /// Token to validate. Uses the stored access token when omitted.
    pub token: Option<String>,
}

pub async fn run(config: &Config, args: &ValidateArgs) -> i32 {
    match super::manager(config).validate(args.token.as_deref()).await {
        Ok(true) => {
            println!("token is valid");
            0
        }
        Ok(false) => {
            println!("token is invalid");
            1
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            1
        }
    }
}
