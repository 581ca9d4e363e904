//! Command-line interface for casetrack.

mod commands;

pub use commands::cmd_add_user;

use clap::{Parser, Subcommand};

/// casetrack - case and proceedings tracker
#[derive(Parser)]
#[command(name = "casetrack")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the web server (default)
    #[command(alias = "run")]
    Serve,

    /// Create a default config.toml
    Init,

    /// Create a login
    #[command(alias = "useradd")]
    AddUser {
        username: String,
        password: String,
    },
}
