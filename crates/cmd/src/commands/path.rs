use anyhow::Result;
use clap::Args;
use pparchive::path::resolve;
use pparchive::{ArchiveQuery, Averaging, Suffix, archive};

use crate::config::Context;

/// One dataset query, spelled the way the archive lays files out.
#[derive(Args, Debug)]
pub struct PathArgs {
    /// Collection name, e.g. ocean_monthly
    pub collection: String,

    /// Filename suffixes: variable names for ts, climatology labels for
    /// av; `*` matches any
    #[arg(default_value = "*")]
    pub suffixes: Vec<String>,

    /// Averaging subtree: ts or av
    #[arg(long, default_value = "ts")]
    pub mode: Averaging,

    /// Chunking scheme, e.g. monthly/5yr; discovered when omitted
    #[arg(long)]
    pub chunking: Option<String>,

    /// Time label, e.g. 185001-185412; `*` matches any
    #[arg(long, default_value = "*")]
    pub time: String,

    /// Append the collection's static grid file
    #[arg(long = "static")]
    pub include_static: bool,

    /// Emit the patterns searched and the paths found as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn path_command(ctx: &Context, args: &PathArgs) -> Result<()> {
    let root = ctx.archive_root()?;
    let chunking = match &args.chunking {
        Some(chunking) => chunking.clone(),
        None => archive::chunking_scheme(&root, &args.collection, args.mode)?,
    };
    let query = ArchiveQuery {
        root,
        collection: args.collection.clone(),
        averaging: args.mode,
        chunking,
        time: args.time.clone(),
        suffix: Suffix::from(args.suffixes.clone()),
    };
    let resolved = resolve(&query, args.include_static)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&resolved)?);
    } else {
        for path in &resolved.paths {
            println!("{}", path.display());
        }
    }
    Ok(())
}
