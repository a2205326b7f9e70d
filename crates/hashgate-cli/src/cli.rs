use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "hashgate",
    about = "hashgate — content-addressed blob gateway over S3-compatible storage",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP gateway
    Serve(ServeArgs),
    /// Print the object key a payload would be stored under
    Key(KeyArgs),
    /// Show the resolved configuration
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// Address to listen on (overrides BIND_ADDR and the config file)
    #[arg(long)]
    pub bind: Option<String>,
    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Keep objects in memory instead of talking to S3
    #[arg(long)]
    pub memory: bool,
}

#[derive(Args)]
pub struct KeyArgs {
    /// Payload text, or a path when --file is given
    pub data: String,
    #[arg(short, long)]
    pub ext: String,
    #[arg(short, long, default_value = "sha256")]
    pub algorithm: String,
    /// Treat DATA as a path and hash the file's bytes
    #[arg(long)]
    pub file: bool,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[arg(long)]
    pub config: Option<PathBuf>,
}
