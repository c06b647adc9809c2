use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tally_finance::Aggregator;
use tally_core::Ledger;
use tally_ingest::LedgerSource;

mod config;
mod render;
mod state;

#[derive(Parser, Debug)]
#[command(
    name = "tally",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("TALLY_BUILD_SHA"), ")"),
    about = "Categorize a transaction ledger and summarize cash flow"
)]
struct Cli {
    /// Config file (default: ~/.tally/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the ledger and print the summary report
    Report {
        /// Ledger CSV (overrides [data].path)
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Emit the report as JSON
        #[arg(long)]
        json: bool,

        /// Number of top expenses to list (overrides [report].top)
        #[arg(long)]
        top: Option<usize>,

        /// Label locale, e.g. en or es (overrides [report].locale)
        #[arg(long)]
        locale: Option<String>,

        /// Drop rows with an unparseable timestamp or amount
        #[arg(long)]
        skip_invalid: bool,

        /// Keep running and re-print whenever the CSV changes (poll interval in seconds)
        #[arg(long, value_name = "SECS")]
        watch: Option<u64>,
    },

    /// Show which category each description falls into
    Classify {
        #[arg(required = true)]
        descriptions: Vec<String>,
    },

    /// List categories with their colors and keywords, in match order
    Categories {
        #[arg(long)]
        locale: Option<String>,
    },

    /// Config file commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a config file with the default settings and rule table
    Init,
    /// Print the config file location
    Path,
    /// Print the effective config
    Show,
}

struct ReportArgs {
    csv: Option<PathBuf>,
    json: bool,
    top: Option<usize>,
    locale: Option<String>,
    skip_invalid: bool,
    watch: Option<u64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .compact()
                .with_writer(std::io::stderr),
        )
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Command::Report {
            csv,
            json,
            top,
            locale,
            skip_invalid,
            watch,
        } => {
            let args = ReportArgs {
                csv,
                json,
                top,
                locale,
                skip_invalid,
                watch,
            };
            report(config_path, args)?;
        }

        Command::Classify { descriptions } => {
            let cfg = config::load_config(config_path)?;
            let rules = cfg.rule_table()?;
            for desc in &descriptions {
                println!("{} -> {}", desc, rules.classify(desc));
            }
        }

        Command::Categories { locale } => {
            let cfg = config::load_config(config_path)?;
            let rules = cfg.rule_table()?;
            let locales = cfg.locale_table();
            let labels = locales.get(locale.as_deref().unwrap_or(&cfg.report.locale));
            print!("{}", render::CategoryList::new(&rules, labels));
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config(config_path)?,
            ConfigCommand::Path => match config_path {
                Some(p) => println!("{}", p.display()),
                None => println!("{}", config::config_path()?.display()),
            },
            ConfigCommand::Show => {
                let cfg = config::load_config(config_path)?;
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn report(config_path: Option<&Path>, args: ReportArgs) -> Result<()> {
    let cfg = config::load_config(config_path)?;
    let rules = cfg.rule_table()?;
    let csv_path = args.csv.unwrap_or_else(|| cfg.data.path.clone());

    let mut options = cfg.load_options();
    options.skip_invalid |= args.skip_invalid;

    let aggregator = Aggregator::with_top(args.top.unwrap_or(cfg.report.top));
    let locales = cfg.locale_table();
    let labels = locales.get(args.locale.as_deref().unwrap_or(&cfg.report.locale));

    let mut source = LedgerSource::new(&csv_path, rules, options);
    let mut printed = 0;
    if let Some(secs) = args.watch {
        info!("watching {} (every {}s)", csv_path.display(), secs);
    }

    loop {
        let fresh = fresh_snapshot(&mut source, printed)
            .with_context(|| format!("data unavailable: {}", csv_path.display()))?;

        if let Some(ledger) = fresh {
            let report = aggregator.summarize(ledger).rounded();
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render::ReportView::new(&report, labels));
            }
            printed = source.generation();
        }

        match args.watch {
            Some(secs) => std::thread::sleep(Duration::from_secs(secs.max(1))),
            None => break,
        }
    }

    Ok(())
}

/// The ledger if it was rebuilt since generation `printed`, `None` when unchanged
fn fresh_snapshot(source: &mut LedgerSource, printed: u64) -> tally_ingest::Result<Option<&Ledger>> {
    source.ledger()?;
    let generation = source.generation();
    Ok(source.current().filter(|_| generation != printed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tally_core::RuleTable;
    use tally_ingest::LoadOptions;

    const HEADER: &str = "timestamp,description,amount\n";

    #[test]
    fn test_watch_prints_only_new_snapshots() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("finance_data.csv");
        std::fs::write(&path, format!("{HEADER}2024-01-06 08:00:00,Coffee Shop,-4.50\n")).unwrap();

        let mut source = LedgerSource::new(&path, RuleTable::default(), LoadOptions::default());
        let first = fresh_snapshot(&mut source, 0).unwrap().map(Ledger::len);
        assert_eq!(first, Some(1));
        let printed = source.generation();

        // Unchanged file: nothing to print
        assert!(fresh_snapshot(&mut source, printed).unwrap().is_none());

        let mut file = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
        file.write_all(b"2024-02-01 18:30:00,Uber Ride,-22.00\n").unwrap();
        file.sync_all().unwrap();

        let second = fresh_snapshot(&mut source, printed).unwrap().map(Ledger::len);
        assert_eq!(second, Some(2));
    }

    #[test]
    fn test_watch_stops_when_file_disappears() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("finance_data.csv");
        std::fs::write(&path, HEADER).unwrap();

        let mut source = LedgerSource::new(&path, RuleTable::default(), LoadOptions::default());
        assert!(fresh_snapshot(&mut source, 0).unwrap().is_some());

        let printed = source.generation();
        std::fs::remove_file(&path).unwrap();
        assert!(fresh_snapshot(&mut source, printed).is_err());
    }
}
