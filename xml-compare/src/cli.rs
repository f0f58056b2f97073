use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "xml-compare")]
#[command(about = "Rule-driven structural comparison of XML documents")]
pub struct Cli {
    /// Log comparison internals to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Compare two XML files and list their differences.
    Diff(DiffArgs),
    /// Show the parsed structure of a single XML file.
    Inspect(InspectArgs),
    /// Load a rules file and show the resolved rules.
    Rules(RulesArgs),
}

#[derive(Parser, Debug)]
pub struct DiffArgs {
    pub left: PathBuf,
    pub right: PathBuf,
    /// Rules file (`.xml` or `.toml`).
    #[arg(long)]
    pub rules: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Print only the summary line.
    #[arg(long)]
    pub summary: bool,
    /// Print the comparison tree instead of the difference list.
    #[arg(long)]
    pub tree: bool,
    /// With --tree, include unchanged subtrees.
    #[arg(long)]
    pub all: bool,
    /// Exit with an error when any difference is found.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Parser, Debug)]
pub struct InspectArgs {
    pub file: PathBuf,
    #[arg(long, default_value_t = 3)]
    pub depth: usize,
}

#[derive(Parser, Debug)]
pub struct RulesArgs {
    pub file: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
