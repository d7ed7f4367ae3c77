use anyhow::{Result, bail};
use pparchive::{Catalog, catalog};

use crate::config::Context;

pub fn vars_command(ctx: &Context, collection: Option<&str>, json: bool) -> Result<()> {
    let root = ctx.archive_root()?;
    match collection {
        Some(collection) => {
            let Some(variables) = catalog::variables_of(&root, collection)? else {
                bail!("collection {collection} has no timeseries data");
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&variables)?);
            } else {
                for variable in variables {
                    println!("{variable}");
                }
            }
        }
        None => {
            let catalog = Catalog::build(&root)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&catalog)?);
            } else {
                for (collection, variables) in catalog.iter() {
                    println!("{collection}: {}", variables.join(" "));
                }
            }
        }
    }
    Ok(())
}
