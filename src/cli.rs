use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "voto-match",
    version,
    about = "Candidate affinity scoring for the Voto2026 questionnaires"
)]
pub struct Cli {
    /// Configuration file to use instead of config/default.toml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score a session request (JSON) and print the ranked result
    Score(ScoreCommand),
    /// Live debate standings for a possibly incomplete session
    Standings(ScoreCommand),
    /// Parse the catalogs and verify the debate roster partition
    CheckCatalogs(CheckCommand),
}

#[derive(Args)]
pub struct ScoreCommand {
    /// Request file, or `-` for stdin
    pub request: PathBuf,
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args)]
pub struct CheckCommand {
    #[arg(long)]
    pub pretty: bool,
}
