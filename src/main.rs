//! pathnet - curate pathway node/edge tables and plan network layouts.

mod batch;
mod commands;
mod config;
mod prompt;

use clap::{Parser, Subcommand, ValueEnum};
use commands::Context;
use pathnet_core::storage::BackupNaming;
use pathnet_engine::engine::CellRange;
use pathnet_engine::layout::LayoutStrategy;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pathnet")]
#[command(about = "Curate pathway node/edge tables and plan network layouts")]
#[command(version)]
struct Cli {
    /// Config file (defaults to pathnet.toml in the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Answer yes to every confirmation
    #[arg(short, long, global = true)]
    yes: bool,

    /// Treat the first line of each table as data
    #[arg(long, global = true)]
    no_header: bool,

    /// Do not copy a table before changing it in place
    #[arg(long, global = true)]
    no_backup: bool,

    /// How backup copies are named
    #[arg(long, global = true)]
    backup_naming: Option<BackupNaming>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Direction {
    /// Node ids that no edge uses
    Nodes,
    /// Edge endpoints with no node row
    Edges,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ZeroTarget {
    /// Listed values become blank
    Blank,
    /// Blank cells get the fill value
    Zero,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Report node ids repeated in the first column
    Repeats {
        /// Node table
        node: Option<PathBuf>,
    },
    /// Report (and optionally remove) duplicate edge rows
    Duplicates {
        /// Edge table
        edge: Option<PathBuf>,
        /// Number of leading columns that must match
        #[arg(long, default_value_t = 2)]
        key_cols: usize,
        /// Remove the highest-numbered row of each group
        #[arg(long)]
        remove: bool,
        /// Only list the duplicate row numbers
        #[arg(long)]
        brief: bool,
    },
    /// Compare node ids with edge endpoints
    Missing {
        node: Option<PathBuf>,
        edge: Option<PathBuf>,
        /// Report one direction only
        #[arg(long, value_enum)]
        direction: Option<Direction>,
        /// Delete node rows no edge uses
        #[arg(long, conflicts_with = "append")]
        prune: bool,
        /// Add node rows for unknown edge endpoints
        #[arg(long)]
        append: bool,
    },
    /// Sort the node table: common first, then by pathway columns
    Sort { node: Option<PathBuf> },
    /// Turn zeros into blanks (or blanks into zeros) inside the data area
    Zeros {
        file: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = ZeroTarget::Blank)]
        to: ZeroTarget,
        /// Value to blank; repeatable
        #[arg(long = "value")]
        values: Vec<String>,
        /// Value written into blank cells
        #[arg(long, default_value = "0")]
        fill: String,
        /// Work on this block (e.g. B2:K400) instead of the data area
        #[arg(long)]
        range: Option<CellRange>,
    },
    /// Fill Pathway: columns of the node table from the edge table
    Mark {
        node: Option<PathBuf>,
        edge: Option<PathBuf>,
    },
    /// Plan node positions for each pathway
    Layout {
        node: Option<PathBuf>,
        edge: Option<PathBuf>,
        /// Lay out one pathway only
        #[arg(long)]
        pathway: Option<String>,
        #[arg(long)]
        strategy: Option<LayoutStrategy>,
        /// Positioned-node ledger
        #[arg(long)]
        ledger: Option<PathBuf>,
        /// Forget every positioned node first
        #[arg(long)]
        reset_ledger: bool,
        /// Plan file (printed to stdout without it)
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Plan visual style overrides for nodes and edges
    Style {
        node: Option<PathBuf>,
        edge: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        json: bool,
        /// Keep every override instead of the winning one per property
        #[arg(long)]
        all: bool,
    },
    /// Export a table to markdown
    Export {
        file: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Run every script in a directory, one after another
    Batch {
        dir: PathBuf,
        /// Seconds to wait between scripts
        #[arg(long)]
        delay: Option<f64>,
        #[arg(long)]
        stop_on_error: bool,
        /// Also run this program if it sits in the directory
        #[arg(long)]
        include_self: bool,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

/// Returns Ok(false) when the command ran but did not fully succeed.
fn run(cli: Cli) -> anyhow::Result<bool> {
    let (config, warnings) = config::load_config(cli.config.as_deref());
    for warning in warnings {
        tracing::warn!("{}", warning);
    }
    let ctx = Context::new(config, &cli);

    match cli.command {
        Commands::Repeats { node } => commands::hygiene::repeats(&ctx, node),
        Commands::Duplicates {
            edge,
            key_cols,
            remove,
            brief,
        } => commands::hygiene::duplicates(&ctx, edge, key_cols, remove, brief),
        Commands::Missing {
            node,
            edge,
            direction,
            prune,
            append,
        } => commands::hygiene::missing(&ctx, node, edge, direction, prune, append),
        Commands::Sort { node } => commands::hygiene::sort(&ctx, node),
        Commands::Zeros {
            file,
            to,
            values,
            fill,
            range,
        } => commands::hygiene::zeros(&ctx, file, to, values, &fill, range.as_ref()),
        Commands::Mark { node, edge } => commands::network::mark(&ctx, node, edge),
        Commands::Layout {
            node,
            edge,
            pathway,
            strategy,
            ledger,
            reset_ledger,
            output,
            json,
        } => commands::network::layout(
            &ctx,
            commands::network::LayoutArgs {
                node,
                edge,
                pathway,
                strategy,
                ledger,
                reset_ledger,
                output,
                json,
            },
        ),
        Commands::Style {
            node,
            edge,
            output,
            json,
            all,
        } => commands::network::style(&ctx, node, edge, output, json, all),
        Commands::Export { file, output } => commands::export(&ctx, &file, &output),
        Commands::Batch {
            dir,
            delay,
            stop_on_error,
            include_self,
        } => commands::run_batch(&ctx, &dir, delay, stop_on_error, include_self),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
