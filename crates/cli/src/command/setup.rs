// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `roost setup`: exchange an invite code for a fresh token pair.

use chrono::Utc;

use crate::config::Config;
use crate::record::Slot;
use crate::store::RecordStore;

#[derive(Debug, clap::Args)]
pub struct SetupArgs {
    /// Invite code to exchange. Uses the stored one when omitted.
    pub code: Option<String>,
}

pub async fn run(config: &Config, args: &SetupArgs) -> i32 {
    let code = match &args.code {
        Some(code) => code.clone(),
        None => {
            let store = RecordStore::new(&config.data_dir);
            match store.load(Slot::InviteCode) {
                Some(record) if record.is_valid(Utc::now()) => record.value,
                Some(_) => {
                    eprintln!("error: stored invite code has expired");
                    return 1;
                }
                None => {
                    eprintln!("error: no invite code given and none stored");
                    return 1;
                }
            }
        }
    };

    match super::manager(config).setup(&code).await {
        Ok(_) => {
            println!("setup complete");
            0
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            1
        }
    }
}
