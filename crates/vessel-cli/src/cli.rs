use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "vessel",
    about = "Lockable, named containers backed by one shared registry",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log registry activity at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the put / lock / fetch / nesting walkthrough
    Demo(DemoArgs),
    /// Build vessels from a TOML manifest and print the registry
    Load(LoadArgs),
}

#[derive(Args)]
pub struct DemoArgs {
    /// Print the registry before the final `empty`
    #[arg(long)]
    pub show_registry: bool,
}

#[derive(Args)]
pub struct LoadArgs {
    /// Path to the manifest
    pub manifest: PathBuf,
    /// Include entry hashes in the output
    #[arg(long)]
    pub hashes: bool,
}
