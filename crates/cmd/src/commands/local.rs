use anyhow::Result;
use pparchive::{Averaging, archive};

use crate::config::Context;

pub fn local_command(ctx: &Context, collection: &str, mode: Averaging) -> Result<()> {
    let root = ctx.archive_root()?;
    println!("{}", archive::chunking_scheme(&root, collection, mode)?);
    Ok(())
}
