use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "tastetrail_cli", version, about = "TasteTrail administration")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the CLI version.
    Version,

    /// Give an existing user the admin flag.
    GrantAdmin(AdminArgs),

    /// Remove the admin flag from a user.
    RevokeAdmin(AdminArgs),
}

#[derive(clap::Args, Debug)]
pub struct AdminArgs {
    /// Email of the user, matched exactly.
    pub email: String,

    /// PostgreSQL connection URL of the durable store.
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Seconds to wait for the database connection.
    #[arg(long, default_value_t = 5)]
    pub connect_timeout_secs: u64,
}
