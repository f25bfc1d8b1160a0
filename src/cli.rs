//! Command-line interface for the Reversi server.

use clap::Parser;

/// Reversi game server with turn-sourced persistence.
#[derive(Parser, Debug)]
#[command(name = "reversi_server")]
#[command(about = "Reversi game server with turn-sourced persistence", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the SQLite database file (created if it doesn't exist).
    #[arg(long, env = "DATABASE_URL", default_value = "reversi.db")]
    pub database_url: String,

    /// Host to bind to.
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind to.
    #[arg(short, long, default_value = "3000")]
    pub port: u16,
}
