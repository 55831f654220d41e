//! Out-of-band admin flag management against the durable store.
//!
//! Ephemeral servers cannot be reached from here; they take their admin from
//! `ADMIN_EMAIL` at startup instead.

use std::time::Duration;

use tastetrail_core::mode::{ModeOptions, connect_durable};
use tastetrail_core::store::Store;
use tastetrail_core::store::postgres::PgStore;

use crate::cli::AdminArgs;
use crate::{Error, Result};

pub fn set_admin(args: &AdminArgs, is_admin: bool) -> Result<()> {
    let url = args
        .database_url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| Error::Custom("DATABASE_URL is required to change admin flags".into()))?;
    let options = ModeOptions {
        connect_timeout: Duration::from_secs(args.connect_timeout_secs),
        max_connections: 1,
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let pool = connect_durable(url, &options).await?;
        let store = PgStore::new(pool);
        let user = store
            .set_admin(&args.email, is_admin)
            .await?
            .ok_or_else(|| Error::Custom(format!("no user with email {}", args.email)))?;
        log::info!(
            "{} is {} an admin",
            user.email,
            if user.is_admin { "now" } else { "no longer" }
        );
        Ok::<(), Error>(())
    })
}
