use anyhow::Result;
use pparchive::archive;

use crate::config::Context;

pub fn freq_command(ctx: &Context, collection: &str) -> Result<()> {
    let root = ctx.archive_root()?;
    println!("{}", archive::time_frequency(&root, collection)?);
    Ok(())
}
