//! Admin credential helpers.

use clap::{Args, Subcommand};

use seatbook_auth::hash_admin_key;
use seatbook_core::error::AppError;

use crate::output;

/// Arguments for admin commands
#[derive(Debug, Args)]
pub struct AdminArgs {
    /// Admin subcommand
    #[command(subcommand)]
    pub command: AdminCommand,
}

/// Admin subcommands
#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Print the digest to put in `admin.key_hashes` for a key
    HashKey {
        /// Admin key to hash
        key: String,
    },
}

/// Execute admin commands
pub fn execute(args: &AdminArgs) -> Result<(), AppError> {
    match &args.command {
        AdminCommand::HashKey { key } => {
            if key.trim().len() < 16 {
                return Err(AppError::validation("Admin keys must be at least 16 characters"));
            }
            output::print_kv("key_hash", &hash_admin_key(key.trim()));
        }
    }
    Ok(())
}
