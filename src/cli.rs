use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use wiresnap::config::ExtractorConfig;

/// Pull the Livewire `wire:snapshot` state out of saved HTML pages
#[derive(Debug, Parser)]
#[command(name = "wiresnap")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (TOML). Defaults to the per-user config.toml when present.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Decode the snapshot and write it as pretty JSON (or raw text if it is not JSON)
    Extract {
        #[command(flatten)]
        input: InputArg,

        /// Directory for the output file
        #[arg(short, long, value_name = "DIR")]
        out_dir: Option<PathBuf>,

        /// File name used when the payload parses as JSON
        #[arg(long, value_name = "NAME")]
        json_file: Option<String>,

        /// File name used when the payload is not valid JSON
        #[arg(long, value_name = "NAME")]
        raw_file: Option<String>,
    },
    /// Print the stream links found in the snapshot without writing anything
    Links {
        #[command(flatten)]
        input: InputArg,
    },
}

#[derive(Debug, Args)]
pub struct InputArg {
    /// Saved HTML page. Falls back to WIRESNAP_INPUT or `input` in the config file.
    #[arg(value_name = "INPUT")]
    pub path: Option<PathBuf>,
}

impl Commands {
    /// Overlay command-line values on top of file and env configuration.
    pub fn apply_to(&self, cfg: &mut ExtractorConfig) {
        match self {
            Commands::Extract { input, out_dir, json_file, raw_file } => {
                if let Some(p) = &input.path { cfg.input = Some(p.clone()); }
                if let Some(d) = out_dir { cfg.output_dir = d.clone(); }
                if let Some(n) = json_file { cfg.json_file = n.clone(); }
                if let Some(n) = raw_file { cfg.raw_file = n.clone(); }
            }
            Commands::Links { input } => {
                if let Some(p) = &input.path { cfg.input = Some(p.clone()); }
            }
        }
    }
}
