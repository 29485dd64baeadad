use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Print the SHA-256 digest of files.
    Hash(HashArgs),
    /// Report whether a dataset is up to date with its sources and params.
    Status(LineageArgs),
    /// Record the current lineage of a dataset without rebuilding it.
    Stamp(LineageArgs),
    /// Run a build command unless the dataset is already up to date.
    Run(RunArgs),
    /// Inspect a lineage sidecar or a dataset directory.
    Show(ShowArgs),
    /// Print the JSON Schema of lineage sidecars.
    Schema,
}

/// Arguments for `tinyvoc hash`.
#[derive(Clone, Debug, Args)]
pub struct HashArgs {
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}

/// Describes the dataset being produced and what it is produced from.
#[derive(Clone, Debug, Args)]
pub struct LineageArgs {
    /// Input file, annotation zip, or dataset directory. Order is significant.
    #[arg(short, long = "source", required = true)]
    pub sources: Vec<PathBuf>,

    /// Dataset directory being produced.
    #[arg(short, long)]
    pub destination: PathBuf,

    /// Keep the lineage file next to the destination instead of inside it.
    #[arg(long)]
    pub frames: bool,

    /// Build parameter as key=value; true/false and integers are typed.
    #[arg(short, long = "param")]
    pub params: Vec<String>,
}

/// Arguments for `tinyvoc run`.
#[derive(Clone, Debug, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub lineage: LineageArgs,

    /// Build command and its arguments, given after `--`.
    #[arg(last = true, required = true)]
    pub command: Vec<String>,
}

/// Arguments for `tinyvoc show`.
#[derive(Clone, Debug, Args)]
pub struct ShowArgs {
    /// Lineage file, or a dataset directory containing one.
    pub path: PathBuf,
}
