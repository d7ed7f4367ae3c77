use anyhow::Result;
use pparchive::archive;

use crate::config::Context;

pub fn collections_command(ctx: &Context) -> Result<()> {
    let root = ctx.archive_root()?;
    for collection in archive::list_collections(&root)? {
        println!("{collection}");
    }
    Ok(())
}
