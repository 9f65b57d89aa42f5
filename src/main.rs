use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

mod discover;
mod generate;
mod logging;
mod types;

use types::CityPage;

pub const DEFAULT_DIST_DIR: &str = "dist";
pub const DEFAULT_OUTPUT_FILE: &str = "home.html";

#[derive(Parser)]
#[command(name = "careers-home")]
#[command(about = "Home page generator for the city job listing pages")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Build the home page linking every city page (default)
    Generate {
        /// Directory holding the generated city pages
        #[arg(short, long, default_value = DEFAULT_DIST_DIR)]
        dist: PathBuf,
        /// Home page file to write
        #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
        output: PathBuf,
    },
    /// Print the city pages the home page would link to
    List {
        /// Directory holding the generated city pages
        #[arg(short, long, default_value = DEFAULT_DIST_DIR)]
        dist: PathBuf,
        /// Print a JSON array instead of tab-separated lines
        #[arg(long)]
        json: bool,
    },
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Generate {
            dist: PathBuf::from(DEFAULT_DIST_DIR),
            output: PathBuf::from(DEFAULT_OUTPUT_FILE),
        }
    }
}

/// Tab-separated `label\tpath` lines, or a pretty JSON array (`[]` when empty)
fn format_list(pages: &[CityPage], json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(pages)? + "\n");
    }

    Ok(pages
        .iter()
        .map(|page| format!("{}\t{}\n", page.label, page.path))
        .collect())
}

fn run_list(dist: &Path, json: bool) -> Result<()> {
    let pages = discover::discover_city_pages(dist)?;
    print!("{}", format_list(&pages, json)?);
    Ok(())
}

fn main() -> Result<()> {
    logging::init_logging();
    let cli = Cli::parse();

    match cli.command.unwrap_or_default() {
        Commands::Generate { dist, output } => generate::run_generate(&dist, &output),
        Commands::List { dist, json } => run_list(&dist, json),
    }
}
