use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use regex::Regex;
use std::path::PathBuf;
use stdlib_conformance::{find_suite, suites, Config, EngineKind, Seed, Suite};
use stdlib_conformance_cli::report::{Report, SuiteReport};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Property-based conformance tests for regular expression engines
#[derive(Parser)]
#[command(name = "stdlib-conformance", version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the conformance suites
    List {
        /// Output format (list, json)
        #[arg(short, long, default_value = "list")]
        format: String,
    },

    /// Run conformance suites against an engine
    #[command(alias = "r")]
    Run(RunArgs),

    /// Print generated patterns with matching and non-matching strings
    Sample {
        /// Suite to draw from
        #[arg(short, long)]
        suite: String,

        /// Number of patterns to print
        #[arg(short, long, default_value_t = 5)]
        count: u64,

        /// Seed of the first pattern; later ones count up from it
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Run suites and write a report
    Report {
        /// Output format (json, markdown)
        #[arg(short, long, default_value = "markdown")]
        format: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        run: RunArgs,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Only run suites whose name matches this regular expression
    #[arg(long)]
    filter: Option<String>,

    /// Engine under test (fancy, regex)
    #[arg(short, long, default_value = "fancy")]
    engine: EngineKind,

    /// Cases per suite
    #[arg(short = 'n', long)]
    tests: Option<usize>,

    /// Run seed (default: random, or CONFORMANCE_SEED)
    #[arg(long)]
    seed: Option<u64>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let should_use_colors = atty::is(atty::Stream::Stdout)
        || std::env::var("FORCE_COLOR").is_ok()
        || (std::env::var("NO_COLOR").is_err()
            && std::env::var("TERM").unwrap_or_default() != "dumb");

    colored::control::set_override(should_use_colors);

    let cli = Cli::parse();
    init_tracing(verbose(&cli.command));

    match cli.command {
        Commands::List { format } => list_suites(&format),
        Commands::Run(args) => run_suites(&args),
        Commands::Sample { suite, count, seed } => sample_suite(&suite, count, seed),
        Commands::Report {
            format,
            output,
            run,
        } => generate_report(&format, output, &run),
    }
}

fn verbose(command: &Commands) -> bool {
    match command {
        Commands::Run(args) | Commands::Report { run: args, .. } => args.verbose,
        _ => false,
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn list_suites(format: &str) -> Result<()> {
    match format {
        "list" => {
            println!("{}", "Conformance Suites".bright_cyan().bold());
            println!("{}", "==================".bright_cyan());
            println!();
            for suite in suites() {
                println!("{}", stdlib_conformance_cli::format_suite_listing(suite));
            }
            println!(
                "Total: {} suites",
                suites().len().to_string().bright_green().bold()
            );
        }
        "json" => {
            let json_output = serde_json::json!({
                "suites": suites().iter().map(|suite| {
                    serde_json::json!({
                        "name": suite.name,
                        "description": suite.description,
                        "uses_backreferences": suite.uses_backreferences,
                    })
                }).collect::<Vec<_>>(),
                "total": suites().len()
            });
            println!("{}", serde_json::to_string_pretty(&json_output)?);
        }
        _ => {
            anyhow::bail!("Unsupported format: {}. Use 'list' or 'json'", format);
        }
    }

    Ok(())
}

/// Defaults, then `CONFORMANCE_*` variables, then flags. Always pins a seed
/// so the run can be reported and replayed.
fn run_config(args: &RunArgs) -> Result<Config> {
    let mut config = Config::from_env().context("reading CONFORMANCE_* environment")?;
    if let Some(tests) = args.tests {
        config = config.with_tests(tests);
    }
    let seed = args
        .seed
        .or(config.seed)
        .unwrap_or_else(Seed::random_value);
    Ok(config.with_seed(seed))
}

fn selected_suites(filter: Option<&str>) -> Result<Vec<&'static Suite>> {
    let pattern = filter
        .map(Regex::new)
        .transpose()
        .context("invalid --filter pattern")?;
    Ok(suites()
        .iter()
        .filter(|suite| pattern.as_ref().map_or(true, |p| p.is_match(suite.name)))
        .collect())
}

/// Run every selected suite, printing as it goes.
fn execute(args: &RunArgs) -> Result<Report> {
    let config = run_config(args)?;
    let seed = config.seed.unwrap_or_default();
    let engine = args.engine.build();
    let selected = selected_suites(args.filter.as_deref())?;

    println!(
        "{}",
        stdlib_conformance_cli::format_header(engine.name(), seed)
    );

    if selected.is_empty() {
        println!("No suites found matching criteria");
    }

    let mut reports = Vec::with_capacity(selected.len());
    for suite in selected {
        if !suite.supported_by(engine.as_ref()) {
            println!(
                "{}",
                stdlib_conformance_cli::format_skipped(suite, engine.name())
            );
            reports.push(SuiteReport::skipped(suite));
            continue;
        }

        if args.verbose {
            println!("Running {}...", suite.name);
        }
        let result = suite.run(engine.clone(), &config);
        debug!(suite = suite.name, passed = result.is_pass(), "suite done");
        println!(
            "{}",
            stdlib_conformance_cli::highlight_result(&result.to_string())
        );
        reports.push(SuiteReport::from_result(suite, &result));
    }

    Ok(Report::new(engine.name(), seed, reports))
}

fn run_suites(args: &RunArgs) -> Result<()> {
    let report = execute(args)?;
    let summary = &report.summary;

    println!();
    if summary.is_success() {
        println!("{}", stdlib_conformance_cli::format_success());
        println!(
            "Suites run: {}, Passed: {}, Skipped: {}",
            summary.total_suites, summary.passed, summary.skipped
        );
    } else {
        println!("{}", stdlib_conformance_cli::format_failure());
        println!(
            "Suites run: {}, Passed: {}, Failed: {}, Gave up: {}, Skipped: {}",
            summary.total_suites,
            summary.passed,
            summary.failed,
            summary.discarded,
            summary.skipped
        );
        let failed: Vec<&str> = report
            .suites
            .iter()
            .filter(|suite| suite.counterexample.is_some())
            .map(|suite| suite.name.as_str())
            .collect();
        if !failed.is_empty() {
            println!("Failed suites: {}", failed.join(", "));
        }
        std::process::exit(1);
    }

    Ok(())
}

fn sample_suite(name: &str, count: u64, seed: Option<u64>) -> Result<()> {
    let suite = find_suite(name).with_context(|| format!("Unknown suite: {name}"))?;
    let first = seed.unwrap_or_else(Seed::random_value);

    println!("{} {}", "Samples from".bright_cyan().bold(), suite.name.bold());
    println!();
    for seed in (0..count).map(|offset| first.wrapping_add(offset)) {
        match suite.sample(seed) {
            Ok(sample) => print!("{}", stdlib_conformance_cli::format_sample(seed, &sample)),
            Err(error) => println!("{} (seed: {}): {}", "discarded".yellow(), seed, error),
        }
    }

    Ok(())
}

fn generate_report(format: &str, output: Option<PathBuf>, run: &RunArgs) -> Result<()> {
    if format != "json" && format != "markdown" {
        anyhow::bail!("Unsupported format: {}. Use json or markdown", format);
    }

    println!("{}", stdlib_conformance_cli::format_report_message());
    let report = execute(run)?;

    let rendered = match format {
        "json" => serde_json::to_string_pretty(&report)?,
        _ => report.to_markdown(),
    };

    if let Some(path) = output {
        std::fs::write(&path, rendered)
            .with_context(|| format!("writing report to {}", path.display()))?;
    } else {
        println!("{}", rendered);
    }

    println!("{}", "Report generated successfully!".bright_green());
    Ok(())
}
