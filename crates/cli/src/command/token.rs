// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `roost token`: run the fallback chain and print a usable access token.

use crate::config::Config;

#[derive(Debug, clap::Args)]
pub struct TokenArgs {
    /// Print the result as JSON with the token and its source tier.
    #[arg(long)]
    pub json: bool,
}

pub async fn run(config: &Config, args: &TokenArgs) -> i32 {
    match super::manager(config).valid_token().await {
        Ok(Some(obtained)) => {
            if args.json {
                println!(
                    "{}",
                    serde_json::json!({
                        "token": obtained.token,
                        "source": obtained.source,
                    })
                );
            } else {
                println!("{}", obtained.token);
            }
            0
        }
        Ok(None) => {
            eprintln!("error: no valid authentication method available");
            1
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            1
        }
    }
}
