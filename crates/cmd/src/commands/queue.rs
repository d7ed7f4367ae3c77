use anyhow::Result;
use pparchive::Stager;

use crate::config::Context;

pub fn queue_command(ctx: &Context, user: Option<String>) -> Result<()> {
    let user = ctx.queue_user(user)?;
    let status = Stager::dmf().queue_status(&user)?;
    if status.pending {
        println!("{}", status.raw);
    } else {
        println!("no staging requests queued for {user}");
    }
    Ok(())
}
