// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `roost status`: report the state of all three credential slots.

use crate::config::Config;
use crate::record::Slot;

#[derive(Debug, clap::Args)]
pub struct StatusArgs {
    /// Print the snapshot as JSON.
    #[arg(long)]
    pub json: bool,
}

pub async fn run(config: &Config, args: &StatusArgs) -> i32 {
    let status = super::manager(config).status();
    if args.json {
        match serde_json::to_string_pretty(&status) {
            Ok(text) => {
                println!("{text}");
                0
            }
            Err(e) => {
                eprintln!("error: {e}");
                1
            }
        }
    } else {
        println!("{:<15} {:<8} {:<8} {:<8}", "SLOT", "EXISTS", "VALID", "EXPIRED");
        println!("{}", "-".repeat(42));
        let slots = [&status.access_token, &status.refresh_token, &status.invite_code];
        for (slot, info) in Slot::ALL.into_iter().zip(slots) {
            println!(
                "{slot:<15} {:<8} {:<8} {:<8}",
                yes_no(info.exists),
                yes_no(info.valid),
                yes_no(info.expired)
            );
        }
        0
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}
