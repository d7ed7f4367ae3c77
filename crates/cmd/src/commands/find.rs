use anyhow::Result;
use pparchive::catalog;

use crate::config::Context;

pub fn find_command(ctx: &Context, variable: &str, json: bool) -> Result<()> {
    let root = ctx.archive_root()?;
    let found = catalog::find_variable(&root, variable)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&found)?);
    } else {
        for collection in found {
            println!("{collection}");
        }
    }
    Ok(())
}
