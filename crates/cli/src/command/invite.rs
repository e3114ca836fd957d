// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `roost invite`: store an invite code for later setup.

use chrono::SecondsFormat;

use crate::config::Config;

#[derive(Debug, clap::Args)]
pub struct InviteArgs {
    /// Invite code obtained from the Beds24 control panel.
    pub code: String,

    /// Hours until the stored code is considered expired.
    #[arg(long, default_value_t = 24)]
    pub ttl_hours: i64,
}

pub async fn run(config: &Config, args: &InviteArgs) -> i32 {
    if !(1..=8760).contains(&args.ttl_hours) {
        eprintln!("error: --ttl-hours must be between 1 and 8760");
        return 2;
    }
    let ttl = chrono::Duration::hours(args.ttl_hours);
    match super::manager(config).store_invite(&args.code, ttl) {
        Ok(record) => {
            println!(
                "invite code stored, expires {}",
                record.expiration.to_rfc3339_opts(SecondsFormat::Secs, true)
            );
            0
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            1
        }
    }
}
