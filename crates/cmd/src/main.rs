use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pparchive::Averaging;

mod commands;
mod config;

use commands::path::PathArgs;
use config::Context;

#[derive(Parser)]
#[command(name = "ppq")]
#[command(author, version, about = "Query and stage postprocessed model output", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Archive root (the postprocess directory); overrides the config
    /// file and PP_ROOT
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Config file; defaults to $PPQ_CONFIG when set
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the collections under the archive root
    Collections,
    /// List variables, for one collection or the whole archive
    Vars {
        /// Collection to list; omit to index every collection
        collection: Option<String>,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Find the collections that provide a variable
    Find {
        /// Variable name, e.g. tos
        variable: String,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show a collection's native time frequency
    Freq {
        /// Collection to inspect
        collection: String,
    },
    /// Show a collection's local chunking scheme
    Local {
        /// Collection to inspect
        collection: String,
        /// Averaging subtree to inspect: ts or av
        #[arg(long, default_value = "ts")]
        mode: Averaging,
    },
    /// Resolve a query to archive file paths
    Path(PathArgs),
    /// Ask the tape library to recall files to disk
    Stage {
        /// Files to stage
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Poll until every file is on disk
        #[arg(long)]
        wait: bool,
    },
    /// Show outstanding staging requests
    Queue {
        /// Queue owner; defaults to the config `user`, then $USER
        user: Option<String>,
    },
    /// Report which files are on disk rather than tape
    Resident {
        /// Files to check
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    diagnostics::init_diagnostics();
    let cli = Cli::parse();
    let ctx = Context::load(cli.root, cli.config)?;

    match cli.command {
        Commands::Collections => commands::collections_command(&ctx),
        Commands::Vars { collection, json } => {
            commands::vars_command(&ctx, collection.as_deref(), json)
        }
        Commands::Find { variable, json } => commands::find_command(&ctx, &variable, json),
        Commands::Freq { collection } => commands::freq_command(&ctx, &collection),
        Commands::Local { collection, mode } => commands::local_command(&ctx, &collection, mode),
        Commands::Path(args) => commands::path_command(&ctx, &args),
        Commands::Stage { paths, wait } => commands::stage_command(&ctx, paths, wait),
        Commands::Queue { user } => commands::queue_command(&ctx, user),
        Commands::Resident { paths, json } => commands::resident_command(paths, json),
    }
}
