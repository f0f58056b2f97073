use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use xml_compare::inspect::render_tree;
use xml_compare::report::{render_summary, render_text, render_tree as render_comparison_tree};
use xml_compare::rules_view::{render_config_errors, render_rules};
use xml_compare_core::{
    compare, format_json, load_rules, parse_file, ConfigError, RuleSet, TracingSink,
};

mod cli;

use cli::{Cli, Command, DiffArgs, InspectArgs, OutputFormat, RulesArgs};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Diff(args) => run_diff(args),
        Command::Inspect(args) => run_inspect(args),
        Command::Rules(args) => run_rules(args),
    }
}

/// `RUST_LOG` wins; otherwise `--verbose` selects debug output.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run_diff(args: DiffArgs) -> Result<()> {
    let rules = match &args.rules {
        Some(path) => load_rules(path, &mut TracingSink)
            .with_context(|| format!("failed to load rules {}", path.display()))?,
        None => RuleSet::default(),
    };
    let left = parse_file(&args.left)
        .with_context(|| format!("failed to parse {}", args.left.display()))?;
    let right = parse_file(&args.right)
        .with_context(|| format!("failed to parse {}", args.right.display()))?;

    let graph = compare(&left, &right, &rules);
    debug!(nodes = graph.len(), "comparison graph built");

    if args.summary {
        println!("{}", render_summary(&graph));
    } else {
        match args.format {
            OutputFormat::Json => println!("{}", format_json(&graph)),
            OutputFormat::Text => {
                if args.tree {
                    println!("{}", render_comparison_tree(&graph, args.all));
                } else {
                    println!("{}", render_text(&graph));
                }
                println!("{}", render_summary(&graph));
            }
        }
    }

    if args.strict && !graph.differences().is_empty() {
        bail!(
            "strict mode failed: {} difference(s) found",
            graph.differences().len()
        );
    }
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    let root = parse_file(&args.file)
        .with_context(|| format!("failed to parse {}", args.file.display()))?;
    print!("{}", render_tree(&root, args.depth));
    Ok(())
}

fn run_rules(args: RulesArgs) -> Result<()> {
    let mut errors: Vec<ConfigError> = Vec::new();
    let rules = load_rules(&args.file, &mut errors)
        .with_context(|| format!("failed to load rules {}", args.file.display()))?;

    println!("{}", render_rules(&rules));
    if !errors.is_empty() {
        eprintln!("{}", render_config_errors(&errors));
    }
    Ok(())
}
