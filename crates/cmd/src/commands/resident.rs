use std::path::PathBuf;

use anyhow::Result;
use pparchive::Stager;

pub fn resident_command(paths: Vec<PathBuf>, json: bool) -> Result<()> {
    let residency = Stager::dmf().residency(&paths)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&residency)?);
    } else {
        for (path, resident) in residency.iter() {
            let state = if resident { "disk" } else { "tape" };
            println!("{state}  {}", path.display());
        }
    }
    Ok(())
}
