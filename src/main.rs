//! datalib - browse flat file listings as a virtual folder tree.
//!
//! Usage:
//!   datalib ls PAGES.. [--path P]        List a folder
//!   datalib search PAGES.. -q QUERY      Search every file path
//!   datalib stats PAGES..                Summarize the tree
//!   datalib export PAGES..               Export the tree to JSON
//!   datalib --help                       Show help
//!
//! Each PAGE is a JSON file saved from the imaging API. Pages are merged in
//! the order given, the same way paginated fetches are.

mod input;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result, eyre};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use datalib_core::{NodeRef, PathTree, TreeConfig, TreeError};
use datalib_search::{MatchTarget, SearchConfig, Searcher};

use crate::input::{FileRecord, file_size, load_tree};

#[derive(Parser)]
#[command(
    name = "datalib",
    version,
    about = "Browse flat file listings as a virtual folder tree",
    long_about = "datalib turns the flat file listings returned by the imaging API \
                  into a navigable folder tree.\n\n\
                  Pass one or more saved JSON pages; they are merged in order."
)]
struct Cli {
    /// Increase log verbosity (-v, -vv); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Treat this character as an extra path separator (e.g. '\')
    #[arg(long, global = true)]
    alt_separator: Vec<char>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the contents of a folder
    Ls {
        /// Record pages to load
        #[arg(required = true)]
        pages: Vec<PathBuf>,

        /// Folder to list (defaults to the root)
        #[arg(short, long, default_value = "")]
        path: String,

        /// Levels to display below the folder (0 = the folder itself only)
        #[arg(short, long, default_value = "1")]
        depth: u32,

        /// Only show folders
        #[arg(long)]
        folders: bool,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Search all file paths for a substring
    Search {
        /// Record pages to load
        #[arg(required = true)]
        pages: Vec<PathBuf>,

        /// Text to look for
        #[arg(short, long)]
        query: String,

        /// Match file names only instead of full paths
        #[arg(long)]
        name: bool,

        /// Match case exactly
        #[arg(long)]
        case_sensitive: bool,

        /// Maximum number of matching files (0 = unlimited)
        #[arg(short = 'n', long, default_value = "0")]
        limit: usize,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Show tree statistics and build warnings
    Stats {
        /// Record pages to load
        #[arg(required = true)]
        pages: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Export the tree as nested JSON
    Export {
        /// Record pages to load
        #[arg(required = true)]
        pages: Vec<PathBuf>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Nested JSON form of a node.
#[derive(Serialize)]
struct ExportNode<'a> {
    name: &'a str,
    path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    record: Option<&'a FileRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<ExportNode<'a>>,
}

impl<'a> ExportNode<'a> {
    fn from_node(node: NodeRef<'a, FileRecord>, max_depth: u32) -> Self {
        let children = if max_depth == 0 {
            Vec::new()
        } else {
            node.dir().map(|child| Self::from_node(child, max_depth - 1)).collect()
        };
        Self {
            name: node.name(),
            path: node.full_path().unwrap_or_default(),
            record: node.payload(),
            children,
        }
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = TreeConfig::builder()
        .alt_separators(cli.alt_separator)
        .build()
        .map_err(TreeError::from)
        .context("Invalid tree configuration")?;

    match cli.command {
        Command::Ls {
            pages,
            path,
            depth,
            folders,
            format,
        } => {
            let tree = load_tree(&pages, config)?;
            run_ls(&tree, &path, depth, folders, format)?;
        }
        Command::Search {
            pages,
            query,
            name,
            case_sensitive,
            limit,
            format,
        } => {
            let tree = load_tree(&pages, config)?;
            let search_config = SearchConfig::builder()
                .target(if name { MatchTarget::Name } else { MatchTarget::FullPath })
                .case_sensitive(case_sensitive)
                .max_matches(limit)
                .build()
                .map_err(|e| eyre!("Invalid search configuration: {e}"))?;
            run_search(&tree, &query, search_config, format)?;
        }
        Command::Stats { pages, format } => {
            let tree = load_tree(&pages, config)?;
            run_stats(&tree, format)?;
        }
        Command::Export { pages, output } => {
            let tree = load_tree(&pages, config)?;
            run_export(&tree, output)?;
        }
    }

    Ok(())
}

/// Install a stderr subscriber honoring RUST_LOG.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// List a folder.
fn run_ls(
    tree: &PathTree<FileRecord>,
    path: &str,
    depth: u32,
    folders_only: bool,
    format: OutputFormat,
) -> Result<()> {
    let folder = tree.child(path);
    if !folder.exists() {
        eprintln!("No such folder: {path}");
    }

    let (entries, max_depth) = listing(folder, depth, folders_only);

    match format {
        OutputFormat::Text => {
            if entries.is_empty() {
                println!(" (empty)");
            }
            for entry in entries {
                print_node(entry, 0, max_depth);
            }
        }
        OutputFormat::Json => {
            let entries: Vec<_> = entries
                .into_iter()
                .map(|n| ExportNode::from_node(n, max_depth))
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
    }

    Ok(())
}

/// Top-level entries of a listing and how many levels to descend below them.
///
/// Depth 0 lists the folder itself without its contents.
fn listing<'a>(
    folder: NodeRef<'a, FileRecord>,
    depth: u32,
    folders_only: bool,
) -> (Vec<NodeRef<'a, FileRecord>>, u32) {
    if depth == 0 {
        let entries = if folder.exists() { vec![folder] } else { Vec::new() };
        return (entries, 0);
    }
    let entries = if folders_only {
        folder.folders().collect()
    } else {
        folder.dir().collect()
    };
    (entries, depth - 1)
}

/// Search the tree and print the projected result.
fn run_search(
    tree: &PathTree<FileRecord>,
    query: &str,
    config: SearchConfig,
    format: OutputFormat,
) -> Result<()> {
    let results = Searcher::with_config(config).search(tree, query);

    match format {
        OutputFormat::Text => {
            if results.is_empty() {
                println!(" Couldn't find any results for {query:?}.");
                return Ok(());
            }
            println!(
                " {} matching file(s) for {query:?}",
                results.leaf_paths().count()
            );
            println!();
            for entry in results.dir() {
                print_node(entry, 0, u32::MAX);
            }
        }
        OutputFormat::Json => {
            let export = ExportNode::from_node(results.root_ref(), u32::MAX);
            println!("{}", serde_json::to_string_pretty(&export)?);
        }
    }

    Ok(())
}

/// Print tree statistics.
fn run_stats(tree: &PathTree<FileRecord>, format: OutputFormat) -> Result<()> {
    let stats = tree.stats();
    let total_size: u64 = tree
        .walk()
        .filter_map(|n| n.payload())
        .filter_map(file_size)
        .sum();

    match format {
        OutputFormat::Text => {
            println!("{}", "─".repeat(60));
            println!(
                " {} files, {} directories, {}",
                stats.total_files,
                stats.total_dirs,
                format_size(total_size)
            );
            println!(" Maximum depth: {}", stats.max_depth);
            println!("{}", "─".repeat(60));

            if tree.has_warnings() {
                println!();
                println!(" {} warning(s) while building:", tree.warnings().len());
                for warning in tree.warnings() {
                    println!("   {}", warning.message);
                }
            }
        }
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct StatsReport<'a> {
                #[serde(flatten)]
                stats: &'a datalib_core::TreeStats,
                total_size: u64,
                warnings: &'a [datalib_core::BuildWarning],
            }
            let report = StatsReport {
                stats: &stats,
                total_size,
                warnings: tree.warnings(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

/// Export the whole tree to JSON.
fn run_export(tree: &PathTree<FileRecord>, output: Option<PathBuf>) -> Result<()> {
    let export = ExportNode::from_node(tree.root_ref(), u32::MAX);
    let json = serde_json::to_string_pretty(&export)?;

    match output {
        Some(output_path) => {
            std::fs::write(&output_path, json)
                .with_context(|| format!("Failed to write {}", output_path.display()))?;
            eprintln!("Exported to {}", output_path.display());
        }
        None => {
            println!("{}", json);
        }
    }

    Ok(())
}

/// Print a node and, up to `max_depth` levels, its children.
fn print_node(node: NodeRef<'_, FileRecord>, depth: u32, max_depth: u32) {
    let indent = "  ".repeat(depth as usize);

    if node.has_children() {
        println!(
            "{}▼ {:<40} {:>6} items",
            indent,
            truncate(&format!("{}/", node.name()), 40),
            node.dir().count()
        );
        if depth < max_depth {
            for child in node.dir() {
                print_node(child, depth + 1, max_depth);
            }
        }
    } else {
        let size = node
            .payload()
            .and_then(file_size)
            .map(format_size)
            .unwrap_or_default();
        println!("{}  {:<40} {:>12}", indent, truncate(node.name(), 40), size);
    }
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

/// Truncate a string to max length.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 1).collect();
        format!("{kept}…")
    }
}
