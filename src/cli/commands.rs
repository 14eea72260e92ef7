use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "jot", about = concat!("jot v", env!("CARGO_PKG_VERSION"), " - a drag-and-drop to-do list for the terminal"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use this data directory instead of the nearest .jot/
    #[arg(short = 'C', long = "data-dir", global = true)]
    pub data_dir: Option<String>,

    /// Write diagnostic logs to this file (filter with RUST_LOG)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the stored list
    List(ListArgs),
}

#[derive(Args)]
pub struct ListArgs {
    /// Only show items containing this text (case-insensitive)
    pub query: Option<String>,
}
