mod cli;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use wiresnap::config::ExtractorConfig;
use wiresnap::extractor::{Extraction, SnapshotExtractor};
use wiresnap::links::LinkFinder;
use wiresnap::types::{decode_error_line, Outcome};

fn init_tracing() {
    // Diagnostics go to stderr; stdout is reserved for the report lines.
    let filter = EnvFilter::try_from_env("WIRESNAP_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut cfg = ExtractorConfig::load(cli.config.as_deref())?;
    cfg.apply_env();
    cli.command.apply_to(&mut cfg);

    let extractor = SnapshotExtractor::new(cfg)?;
    let input = extractor.config().require_input()?.to_path_buf();

    match cli.command {
        Commands::Extract { .. } => {
            let outcome = extractor.extract(&input)?;
            print_report(&outcome);
        }
        Commands::Links { .. } => match extractor.inspect(&input)? {
            Extraction::Parsed(snapshot) => {
                let links = LinkFinder::new()?.find(&snapshot);
                if links.is_empty() {
                    tracing::warn!(input = %input.display(), "no stream links in snapshot");
                }
                for link in links {
                    println!("{}", link);
                }
            }
            Extraction::Invalid { error, .. } => println!("{}", decode_error_line(&error)),
            Extraction::NotFound => print_report(&Outcome::NotFound),
        },
    }
    Ok(())
}

fn print_report(outcome: &Outcome) {
    for line in outcome.report_lines() {
        println!("{}", line);
    }
}
