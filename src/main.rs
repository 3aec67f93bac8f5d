//! Fragrance Finder CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use fragrance_finder::models::{ListItem, ListKind, ScanSummary};
use fragrance_finder::storage::{JsonFileStore, ListStore};
use fragrance_finder::utils::search::search_url_with;
use fragrance_finder::{report, scan_snapshot, ScanConfig};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "fragrance-finder")]
#[command(about = "Find fragrance bottle photos in page snapshots and manage saved lists", long_about = None)]
#[command(version)]
struct Cli {
    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Scan configuration (JSON5)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan page snapshots for fragrance containers
    Scan {
        /// Snapshot file, or a directory of snapshot .json files
        #[arg(short, long)]
        input: PathBuf,

        /// Write a Markdown report to this path
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// Print the results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the Fragrantica search URL for a name
    SearchUrl {
        name: String,
    },

    /// Manage the wishlist and collection
    List {
        /// JSON file holding both lists
        #[arg(short, long, default_value = "fragrance-lists.json")]
        store: PathBuf,

        #[command(subcommand)]
        action: ListAction,
    },
}

#[derive(Subcommand)]
enum ListAction {
    /// Show one list, or both
    Show {
        #[arg(short, long)]
        list: Option<ListKind>,
    },

    /// Append an item
    Add {
        #[arg(short, long)]
        list: ListKind,

        #[arg(short, long)]
        name: String,

        /// Defaults to the Fragrantica search URL for the name
        #[arg(short, long)]
        url: Option<String>,

        #[arg(long, default_value = "")]
        image: String,
    },

    /// Remove the item at a zero-based index
    Remove {
        #[arg(short, long)]
        list: ListKind,

        #[arg(short, long)]
        index: usize,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}", "❌ Command failed!".red().bold());
        eprintln!("{}", format!("Error: {:#}", e).red());
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("fragrance_finder=debug")
    } else {
        EnvFilter::new("fragrance_finder=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => ScanConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ScanConfig::default(),
    };

    match cli.command {
        Commands::Scan { input, report, json } => run_scan(&input, report.as_deref(), json, &config),
        Commands::SearchUrl { name } => {
            println!("{}", search_url_with(&config.search_url_template, &name));
            Ok(())
        }
        Commands::List { store, action } => run_list(&store, action, &config),
    }
}

fn run_scan(input: &Path, report_path: Option<&Path>, json: bool, config: &ScanConfig) -> Result<()> {
    let snapshots = collect_snapshots(input)?;
    if snapshots.is_empty() {
        anyhow::bail!("No snapshot files found in {}", input.display());
    }

    let mut summaries = Vec::with_capacity(snapshots.len());
    for path in &snapshots {
        summaries.push(scan_snapshot(path, config)?);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    } else {
        for summary in &summaries {
            print_summary(summary);
        }
    }

    if let Some(path) = report_path {
        let content = report::generate_report(&summaries)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        println!("📝 Report: {}", path.display());
    }

    Ok(())
}

fn collect_snapshots(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }

    if !input.is_dir() {
        anyhow::bail!("Input not found: {}", input.display());
    }

    let mut paths = Vec::new();
    for entry in WalkDir::new(input).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file()
            && entry.path().extension().and_then(|e| e.to_str()) == Some("json")
        {
            paths.push(entry.into_path());
        }
    }
    Ok(paths)
}

fn print_summary(summary: &ScanSummary) {
    println!("{}", format!("🔍 {}", summary.source).bold().blue());
    println!("{}", "=".repeat(50).blue());
    println!("  Images: {}  Candidates: {}  Containers: {}",
        summary.images_seen, summary.candidates, summary.containers.len());

    if summary.containers.is_empty() {
        println!("  {}", "No fragrance images found".yellow());
    }

    for container in &summary.containers {
        let marker = if container.button_attached { "✅".green() } else { "⏭️ ".yellow() };
        println!("  {} {} {}", marker, container.name.bold(), format!("[{}]", container.element).dimmed());
        println!("     {}", container.search_url.dimmed());
    }
    println!();
}

fn run_list(store: &Path, action: ListAction, config: &ScanConfig) -> Result<()> {
    let mut lists = ListStore::new(JsonFileStore::new(store));

    match action {
        ListAction::Show { list } => {
            let kinds: Vec<ListKind> = match list {
                Some(kind) => vec![kind],
                None => ListKind::ALL.to_vec(),
            };
            for kind in kinds {
                let items = lists.items(kind)?;
                println!("{}", format!("{} ({})", kind, items.len()).bold().blue());
                if items.is_empty() {
                    println!("  {}", "(empty)".dimmed());
                }
                for (index, item) in items.iter().enumerate() {
                    println!("  {:>3}. {} {}", index, item.name.bold(), item.url.dimmed());
                }
            }
        }
        ListAction::Add { list, name, url, image } => {
            let url = url.unwrap_or_else(|| search_url_with(&config.search_url_template, &name));
            let len = lists.add(list, ListItem::new(name.clone(), url, image))?;
            println!("{}", format!("✅ Added {} to {} ({} items)", name, list, len).green());
        }
        ListAction::Remove { list, index } => match lists.remove_at(list, index)? {
            Some(item) => println!("{}", format!("🗑️  Removed {} from {}", item.name, list).green()),
            None => println!("{}", format!("No item at index {} in {}", index, list).yellow()),
        },
    }

    Ok(())
}
